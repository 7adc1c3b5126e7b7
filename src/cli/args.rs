//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Parse, inspect and rewrite SGF game records
#[derive(Parser, Debug)]
#[command(name = "sgftree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output on stderr (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Fail on malformed input instead of skipping it
    #[arg(long, global = true)]
    pub strict: bool,

    /// Extra config file (merged over the global one)
    #[arg(short, long, global = true, env = "SGFTREE_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the variation tree
    Tree {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Show node, depth and variation counts
    Info {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Rewrite a record in canonical SGF form
    Fmt {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Output file (default: stdout)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Dump the token stream
    Tokens {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Show decoded property values of the main line
    Props {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// All nodes in document order instead of the main line
        #[arg(short, long)]
        all: bool,
    },

    /// Strictly parse a file or every .sgf file below a directory
    Check {
        #[arg(value_hint = ValueHint::AnyPath)]
        path: PathBuf,
    },

    /// Escape text for use as an SGF value
    Escape {
        text: String,
        /// SimpleText: drop line breaks
        #[arg(short, long)]
        simple: bool,
    },

    /// Unescape an SGF value for display
    Unescape { text: String },

    /// Print the effective configuration
    Config,

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
