//! Track Planner CLI
//!
//! Usage:
//!   track-planner [OPTIONS] <COMMAND>
//!
//! Commands:
//!   catalog                       List the pieces in the catalogue
//!   summary [FILE]                Piece counts, run length and sections
//!   snap [FILE] --piece ID        Snap a piece onto its nearest neighbour
//!   grid [FILE] --piece ID        Snap a piece onto the grid
//!   rotate-board [FILE] --degrees Rotate the board and everything on it
//!
//! Options:
//!   -c, --catalog <FILE>  Catalogue file (TOML format)
//!   --config <FILE>       Planner settings (TOML format)
//!   -d, --debug           Verbose logging to stderr

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use env_logger::Env;

use track_planner::{
    layout_to_json, parse_layout, Layout, PieceKind, Planner, PlannerConfig, TrackLibrary,
};

#[derive(Parser)]
#[command(name = "track-planner")]
#[command(about = "Geometry tools for model-railway track plans")]
struct Cli {
    /// Catalogue file (TOML format); defaults to the built-in Hornby OO list
    #[arg(short, long, global = true)]
    catalog: Option<PathBuf>,

    /// Planner settings file (TOML format)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug mode: log solver and traversal decisions
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the pieces in the catalogue
    Catalog,

    /// Print piece counts, total run length and connected sections
    Summary {
        /// Layout file (reads from stdin if not provided)
        input: Option<PathBuf>,
    },

    /// Snap a piece onto the nearest compatible neighbour
    Snap {
        input: Option<PathBuf>,

        /// Id of the piece to move
        #[arg(short, long)]
        piece: String,

        /// Move the piece's whole connected section with it
        #[arg(short, long)]
        section: bool,
    },

    /// Snap a piece to the grid pitch and angle step
    Grid {
        input: Option<PathBuf>,

        #[arg(short, long)]
        piece: String,

        #[arg(short, long)]
        section: bool,
    },

    /// Rotate the board, its pieces and guide circles about the board centre
    RotateBoard {
        input: Option<PathBuf>,

        /// Rotation in degrees; positive turns from +x towards +y
        #[arg(long, allow_negative_numbers = true)]
        degrees: f64,
    },
}

fn main() {
    let cli = Cli::parse();

    let env = Env::default().default_filter_or(if cli.debug { "debug" } else { "warn" });
    env_logger::Builder::from_env(env).init();

    let catalog = match &cli.catalog {
        Some(path) => match TrackLibrary::from_file(path) {
            Ok(c) => c,
            Err(e) => fail(&format!("Error loading catalogue '{}': {}", path.display(), e)),
        },
        None => TrackLibrary::hornby_oo(),
    };

    let config = match &cli.config {
        Some(path) => match PlannerConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => fail(&format!("Error loading config '{}': {}", path.display(), e)),
        },
        None => PlannerConfig::default(),
    };

    match cli.command {
        Command::Catalog => print_catalog(&catalog),
        Command::Summary { input } => {
            let planner = Planner::new(read_layout(input.as_deref()), catalog, config);
            print_summary(&planner);
        }
        Command::Snap {
            input,
            piece,
            section,
        } => {
            let mut planner = Planner::new(read_layout(input.as_deref()), catalog, config);
            select_piece(&mut planner, &piece, section);
            if planner.snap_selected().is_none() {
                log::warn!("no snap target in range for '{}'", piece);
            }
            print_layout(planner.layout());
        }
        Command::Grid {
            input,
            piece,
            section,
        } => {
            let mut planner = Planner::new(read_layout(input.as_deref()), catalog, config);
            select_piece(&mut planner, &piece, section);
            if planner.snap_selected_to_grid().is_none() {
                log::warn!("could not grid-snap '{}'", piece);
            }
            print_layout(planner.layout());
        }
        Command::RotateBoard { input, degrees } => {
            let mut planner = Planner::new(read_layout(input.as_deref()), catalog, config);
            planner.rotate_board(degrees);
            print_layout(planner.layout());
        }
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}

fn read_layout(input: Option<&Path>) -> Layout {
    let source = match input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => fail(&format!("Error reading file '{}': {}", path.display(), e)),
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => fail(&format!("Error reading from stdin: {}", e)),
            }
        }
    };
    match parse_layout(&source) {
        Ok(layout) => layout,
        Err(e) => fail(&format!("Error: {}", e)),
    }
}

fn select_piece(planner: &mut Planner, id: &str, section: bool) {
    if !planner.select(id) {
        fail(&format!("Error: no piece with id '{}'", id));
    }
    planner.set_section_mode(section);
}

fn print_layout(layout: &Layout) {
    match layout_to_json(layout) {
        Ok(json) => println!("{}", json),
        Err(e) => fail(&format!("Error: {}", e)),
    }
}

fn print_catalog(catalog: &TrackLibrary) {
    for kind in [
        PieceKind::Straight,
        PieceKind::Curve,
        PieceKind::Point,
        PieceKind::Crossover,
        PieceKind::Accessory,
    ] {
        let entries = catalog.by_kind(kind);
        if entries.is_empty() {
            continue;
        }
        println!("{}:", kind);
        for entry in entries {
            println!(
                "  {:<8} {:<40} {:>8.1} mm",
                entry.code,
                entry.name,
                entry.display_length()
            );
        }
    }
}

fn print_summary(planner: &Planner) {
    println!("Pieces: {}", planner.placements().len());
    for (code, count) in planner.inventory() {
        println!("  {:<8} x{}", code, count);
    }
    println!("Total run length: {:.1} mm", planner.total_run_length_mm());

    let sections = planner.sections();
    println!("Sections: {}", sections.len());
    for section in &sections {
        println!("  {}", section.ids.join(", "));
    }

    let unresolved = planner.unresolved();
    if !unresolved.is_empty() {
        println!("Unknown codes:");
        for placement in unresolved {
            println!("  {} ({})", placement.id, placement.code);
        }
    }
}
