use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `pitchcoach` - Rubric-based feedback for startup pitches.
#[derive(Parser, Debug)]
#[command(name = "pitchcoach")]
#[command(version)]
#[command(about = "Score a startup pitch against a rubric and track it across revisions.", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.pitchcoach/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate a single pitch and print the feedback report
    Evaluate {
        /// Read the pitch from this file
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Pitch text (reads stdin when neither --file nor --text is given)
        #[arg(short, long)]
        text: Option<String>,

        /// Print the raw JSON report
        #[arg(long)]
        json: bool,
    },

    /// Revise a pitch interactively; end each revision with a line containing only ---
    Session {
        /// Print raw JSON reports
        #[arg(long)]
        json: bool,
    },

    /// Start the HTTP gateway
    Gateway {
        /// Port to listen on (use 0 for random available port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
    },

    /// Print the active rubric
    Rubric {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}
