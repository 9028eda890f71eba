//! Error types for loading layouts

use thiserror::Error;

/// Structural problems that reject a layout document outright.
///
/// Field-level defects never surface here; they are repaired while loading.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read layout file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Layout is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Layout JSON must contain a list of placements")]
    PlacementsNotAList,

    #[error("No valid placements were found in the layout JSON")]
    NoValidPlacements,
}
