use clap::{Parser, Subcommand};
use inkboard_core::store::FileId;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "inkboard")]
#[command(about = "Annotation canvas documents from the command line", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file to use instead of the default location
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Use the local document directory instead of the remote API
    #[arg(long, global = true)]
    pub local: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List documents, newest first
    #[command(alias = "ls")]
    List,

    /// Create an empty document
    #[command(alias = "n")]
    Create {
        /// Name of the document
        name: String,
    },

    /// Show a document's summary
    #[command(alias = "v")]
    Show { id: FileId },

    /// Delete a document
    #[command(alias = "rm")]
    Delete {
        id: FileId,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Feed a JSON script of tool, style, pointer and key steps into a
    /// document, then save it
    Replay {
        id: FileId,

        /// Path to the script
        script: PathBuf,
    },

    /// Render a document to a PNG file
    Export {
        id: FileId,

        /// Output path
        output: PathBuf,

        #[arg(long, default_value_t = 1280)]
        width: u32,

        #[arg(long, default_value_t = 800)]
        height: u32,

        /// View scale; fits the drawing to the image when omitted
        #[arg(long)]
        scale: Option<f64>,

        /// View offset in pixels (ignored when fitting)
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        offset_x: f64,

        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        offset_y: f64,
    },
}
