use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// hostlabels — manage host metadata labels and render them with live
/// system facts substituted for `$(token)` placeholders.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Label file to read and update.
    #[arg(long, default_value = "labels.conf", env = "HOSTLABELS_FILE")]
    pub labels_file: PathBuf,

    /// JSON fact fixture to expand against instead of querying the system.
    #[arg(long, env = "HOSTLABELS_FACTS_FILE")]
    pub facts_file: Option<PathBuf>,

    /// Maximum size in bytes of the rendered label output.
    #[arg(long, default_value = "65536")]
    pub capacity: usize,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print every label with placeholders expanded.
    Render,

    /// Print the value of the first label with the given key.
    Get {
        key: String,

        /// Expand placeholders in the value.
        #[arg(long)]
        expand: bool,
    },

    /// Set a label and save the label file.
    Set {
        key: String,
        value: String,

        /// Mark the label hidden.
        #[arg(long)]
        hidden: bool,

        /// Append a new entry even if the key already exists.
        #[arg(long)]
        append: bool,
    },

    /// Expand an arbitrary template string.
    Expand { template: String },

    /// Print the gathered system facts as JSON.
    Facts,

    /// List label keys.
    List {
        /// Include hidden labels.
        #[arg(long)]
        all: bool,
    },
}
