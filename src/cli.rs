//! Command-line interface for lectometro
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Reading fluency evaluation service
#[derive(Parser, Debug)]
#[command(name = "lectometro", version, about = "Reading fluency evaluation service")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose logging (-v: debug, -vv: trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Directory holding fluidez_2A.txt and fluidez_2B.txt
    #[arg(long, global = true, value_name = "DIR")]
    pub texts_dir: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP evaluation service
    Serve {
        /// Address to bind (default: 127.0.0.1:8000)
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },

    /// Evaluate a local WAV file and print the result as JSON
    Evaluate {
        /// Recording to evaluate (.wav)
        file: PathBuf,

        /// Task type: FL (fluency) or DEC (decoding)
        #[arg(long, short = 't', value_name = "TASK")]
        task: String,

        /// Exam form: 2A or 2B
        #[arg(long, short = 'f', value_name = "FORM")]
        form: String,

        /// Subject identifier echoed in the result
        #[arg(long, short = 's', value_name = "ID", default_value = "")]
        subject: String,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Check that every canonical text is provisioned
    Check,

    /// View configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration (file + environment + flags) as TOML
    Dump,
    /// Print the default configuration file path
    Path,
}
