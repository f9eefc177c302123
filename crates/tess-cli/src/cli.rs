// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Command-line surface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tess_graph::Category;

/// Top-level arguments.
#[derive(Parser, Debug)]
#[command(name = "tess", author, version, about = "Inspect, check and create saved tile graphs")]
pub struct Cli {
    /// Directory holding editor preferences (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print settings and a table of every block in a saved graph
    Inspect {
        /// Saved graph (JSON)
        file: PathBuf,
    },
    /// Decode a saved graph and verify its structural invariants
    Check {
        /// Saved graph (JSON)
        file: PathBuf,
    },
    /// Re-encode a saved graph in normalized form
    Fmt {
        /// Saved graph (JSON)
        file: PathBuf,
        /// Write here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Create a new graph holding a single root tile
    New {
        /// Root tile category (defaults to the preferred root)
        #[arg(long)]
        root: Option<Category>,
        /// Write here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the effective editor preferences as JSON
    Prefs {
        /// Save the effective preferences to the config directory
        #[arg(long)]
        save: bool,
    },
}
