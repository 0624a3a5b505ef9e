//! Command line arguments

use clap::Parser;
use std::path::PathBuf;

/// Finds social posts talking about recently active repositories.
#[derive(Debug, Parser)]
#[clap(author, version, about)]
pub struct Args {
    /// Settings file to use instead of the default lookup locations
    #[clap(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Repository search term used to seed the project list
    #[clap(short, long, default_value = "reactive")]
    pub query: String,
}
