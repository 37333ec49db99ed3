use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use pageforge_edit::{InsertPosition, ValidationMode};

#[derive(Parser)]
#[command(name = "pageforge")]
#[command(about = "Inspect each edit stage of a page, or replay a recorded edit end to end.")]
pub(crate) struct Cli {
    /// Override config directory (user settings live in `<conf>/pageforge/settings.yaml`).
    #[arg(long, global = true)]
    pub(crate) conf: Option<PathBuf>,

    /// Debug logging on stderr (RUST_LOG still wins).
    #[arg(long, short, global = true)]
    pub(crate) verbose: bool,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum ModeArg {
    /// Section merge and insertion checks.
    Section,
    /// Full-document replacement checks.
    Full,
}

impl From<ModeArg> for ValidationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Section => Self::Section,
            ModeArg::Full => Self::FullDocument,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum PositionArg {
    Before,
    After,
}

impl From<PositionArg> for InsertPosition {
    fn from(position: PositionArg) -> Self {
        match position {
            PositionArg::Before => Self::Before,
            PositionArg::After => Self::After,
        }
    }
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Classify an instruction against a document.
    Classify {
        /// HTML document path
        #[arg(long)]
        document: PathBuf,

        /// Edit instruction
        #[arg(long)]
        instruction: String,
    },
    /// Show the section(s) an instruction would send to the generation service.
    Locate {
        /// HTML document path
        #[arg(long)]
        document: PathBuf,

        /// Edit instruction
        #[arg(long)]
        instruction: String,
    },
    /// Show the composed prompt plan.
    Prompt {
        /// HTML document path
        #[arg(long)]
        document: PathBuf,

        /// Edit instruction
        #[arg(long)]
        instruction: String,
    },
    /// Resolve an insertion anchor to a byte offset.
    Anchor {
        /// HTML document path
        #[arg(long)]
        document: PathBuf,

        /// Anchor name (hero, footer, pricing, or an id/class fragment)
        #[arg(long)]
        anchor: String,

        /// Side of the anchor
        #[arg(long, value_enum, default_value_t = PositionArg::After)]
        position: PositionArg,
    },
    /// Replace an old section with a new one through the merge cascade.
    Merge {
        /// HTML document path
        #[arg(long)]
        document: PathBuf,

        /// File holding the section as it was sent
        #[arg(long)]
        old: PathBuf,

        /// File holding the regenerated section
        #[arg(long)]
        new: PathBuf,

        /// Write the merged document here
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Run the integrity validators on a candidate document.
    Validate {
        /// Pre-edit document path
        #[arg(long)]
        original: PathBuf,

        /// Candidate document path
        #[arg(long)]
        candidate: PathBuf,

        /// Which validator to run
        #[arg(long, value_enum, default_value_t = ModeArg::Section)]
        mode: ModeArg,
    },
    /// Run a full edit, replaying recorded service responses.
    Apply {
        /// HTML document path
        #[arg(long)]
        document: PathBuf,

        /// Edit instruction
        #[arg(long)]
        instruction: String,

        /// Recorded response file; repeat once per prompt, in dispatch order
        #[arg(long = "response", required = true)]
        responses: Vec<PathBuf>,

        /// Write the edited document here (default: include it in the JSON report)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Append accepted edits to this JSON Lines history file
        #[arg(long)]
        history: Option<PathBuf>,
    },
}
