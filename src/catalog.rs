//! Track piece catalogue
//!
//! Maps a piece code (e.g. `R600`) to the shape parameters the geometry
//! engine needs. The built-in library covers the common Hornby OO set-track
//! range; custom catalogues can be loaded from TOML.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading a catalogue
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalogue file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse catalogue TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Duplicate piece code '{0}' in catalogue")]
    DuplicateCode(String),
}

/// Display category of a catalogue piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Straight,
    Curve,
    Point,
    Crossover,
    Accessory,
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceKind::Straight => "Straight",
            PieceKind::Curve => "Curve",
            PieceKind::Point => "Point",
            PieceKind::Crossover => "Crossover",
            PieceKind::Accessory => "Accessory",
        };
        f.write_str(name)
    }
}

/// Geometry of a piece.
///
/// Points and crossovers are approximated as two-ended straights of their
/// nominal length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PieceShape {
    /// Straight run of `length` mm
    Straight { length: f64 },
    /// Arc of `angle` degrees on a circle of `radius` mm
    Curve { radius: f64, angle: f64 },
}

impl PieceShape {
    /// Travel distance along the centre line.
    ///
    /// Degenerate curves report zero.
    pub fn run_length(&self) -> f64 {
        match *self {
            PieceShape::Straight { length } => length.max(0.0),
            PieceShape::Curve { radius, angle } => {
                if radius > 0.0 && angle > 0.0 {
                    radius * angle.to_radians()
                } else {
                    0.0
                }
            }
        }
    }
}

/// One catalogue item
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub code: String,
    pub name: String,
    pub kind: PieceKind,
    pub shape: PieceShape,
    pub notes: Option<String>,
}

impl CatalogEntry {
    pub fn straight(code: &str, name: &str, length: f64) -> Self {
        Self::with_kind(code, name, PieceKind::Straight, PieceShape::Straight { length })
    }

    pub fn curve(code: &str, name: &str, angle: f64, radius: f64) -> Self {
        Self::with_kind(code, name, PieceKind::Curve, PieceShape::Curve { radius, angle })
    }

    pub fn with_kind(code: &str, name: &str, kind: PieceKind, shape: PieceShape) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            kind,
            shape,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }

    /// Length shown to the user: arc length for curves, nominal length otherwise
    pub fn display_length(&self) -> f64 {
        self.shape.run_length()
    }
}

/// Lookup of catalogue entries by piece code
pub trait Catalog {
    fn lookup(&self, code: &str) -> Option<&CatalogEntry>;
}

/// A catalogue held in memory, ordered by code
#[derive(Debug, Clone, Default)]
pub struct TrackLibrary {
    entries: BTreeMap<String, CatalogEntry>,
}

/// TOML structure for deserializing catalogues
#[derive(Deserialize)]
struct TomlCatalog {
    #[serde(default)]
    pieces: Vec<TomlPiece>,
}

#[derive(Deserialize)]
struct TomlPiece {
    code: String,
    name: Option<String>,
    kind: PieceKind,
    #[serde(default)]
    length: f64,
    angle: Option<f64>,
    radius: Option<f64>,
    notes: Option<String>,
}

impl From<TomlPiece> for CatalogEntry {
    fn from(piece: TomlPiece) -> Self {
        // Only the curve category carries arc geometry; a curve missing its
        // radius or angle stays a curve and resolves to no endpoints
        let shape = match piece.kind {
            PieceKind::Curve => PieceShape::Curve {
                radius: piece.radius.unwrap_or(0.0),
                angle: piece.angle.unwrap_or(0.0),
            },
            _ => PieceShape::Straight {
                length: piece.length,
            },
        };
        CatalogEntry {
            name: piece.name.unwrap_or_else(|| piece.code.clone()),
            code: piece.code,
            kind: piece.kind,
            shape,
            notes: piece.notes,
        }
    }
}

impl TrackLibrary {
    /// Create an empty catalogue
    pub fn new() -> Self {
        Self::default()
    }

    /// Load catalogue from TOML file
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load catalogue from TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let parsed: TomlCatalog = toml::from_str(content)?;
        let mut library = Self::new();
        for piece in parsed.pieces {
            let entry = CatalogEntry::from(piece);
            if library.entries.contains_key(&entry.code) {
                return Err(CatalogError::DuplicateCode(entry.code));
            }
            library.insert(entry);
        }
        Ok(library)
    }

    /// Add or replace an entry
    pub fn insert(&mut self, entry: CatalogEntry) {
        self.entries.insert(entry.code.clone(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in code order
    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    /// All entries of one category, in code order
    pub fn by_kind(&self, kind: PieceKind) -> Vec<&CatalogEntry> {
        self.entries.values().filter(|e| e.kind == kind).collect()
    }

    /// The Hornby OO gauge set-track range
    pub fn hornby_oo() -> Self {
        use PieceKind::*;

        let mut library = Self::new();
        let straights = [
            ("R600", "Standard Straight", 168.0),
            ("R601", "Double Straight", 335.5),
            ("R602", "Short Straight", 112.0),
            ("R603", "Half Straight", 83.5),
            ("R604", "Quarter Straight", 41.75),
            ("R622", "Isolating Track", 168.0),
            ("R8201", "Power Track (DCC)", 168.0),
            ("R8202", "Link Wire Track", 168.0),
        ];
        for (code, name, length) in straights {
            library.insert(CatalogEntry::straight(code, name, length));
        }
        library.insert(
            CatalogEntry::straight("R605", "Power Track", 168.0).with_notes("Insulated, power feed"),
        );

        let curves = [
            ("R606", "1st Radius Curve (45°)", 45.0, 371.0),
            ("R607", "2nd Radius Curve (45°)", 45.0, 438.0),
            ("R608", "3rd Radius Curve (45°)", 45.0, 505.0),
            ("R609", "4th Radius Curve (45°)", 45.0, 572.0),
            ("R610", "1st Radius Curve (22.5°)", 22.5, 371.0),
            ("R611", "2nd Radius Curve (22.5°)", 22.5, 438.0),
            ("R612", "3rd Radius Curve (22.5°)", 22.5, 505.0),
            ("R613", "4th Radius Curve (22.5°)", 22.5, 572.0),
            ("R620", "Half Curve (22.5°)", 22.5, 371.0),
        ];
        for (code, name, angle, radius) in curves {
            library.insert(CatalogEntry::curve(code, name, angle, radius));
        }
        library.insert(
            CatalogEntry::curve("R615", "Double Curve (22.5°)", 22.5, 438.0)
                .with_notes("Superelevated"),
        );

        let nominal = [
            ("R614", "90° Crossing", Crossover, 168.0),
            ("R617", "Level Crossing", Accessory, 168.0),
            ("R618", "Buffer Stop", Accessory, 30.0),
            ("R8072", "Left-hand Point", Point, 168.0),
            ("R8073", "Right-hand Point", Point, 168.0),
            ("R8074", "Y Point", Point, 168.0),
            // Curved points have no nominal straight length
            ("R8075", "Curved Point Left", Point, 0.0),
            ("R8076", "Curved Point Right", Point, 0.0),
            ("R8077", "Diamond Crossing (12°)", Crossover, 185.0),
            ("R8078", "Double Slip", Crossover, 185.0),
            ("R8079", "Single Slip", Crossover, 185.0),
            ("R8232", "Diamond Crossing (R2)", Crossover, 168.0),
            ("R8233", "Double Track Level Crossing", Accessory, 168.0),
        ];
        for (code, name, kind, length) in nominal {
            library.insert(CatalogEntry::with_kind(
                code,
                name,
                kind,
                PieceShape::Straight { length },
            ));
        }

        library
    }
}

impl Catalog for TrackLibrary {
    fn lookup(&self, code: &str) -> Option<&CatalogEntry> {
        self.entries.get(code)
    }
}
