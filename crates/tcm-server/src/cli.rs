use clap::{Args, Parser, Subcommand};

/// Top-level CLI parser for the `tcm` binary.
#[derive(Debug, Parser)]
#[command(name = "tcm", version, about = "TCM - test case management server")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Quiet mode (warnings and errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the web server
    Serve(ServeArgs),
    /// Insert the predefined tag taxonomy
    SeedTags(SeedArgs),
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override `server.host`
    #[arg(long)]
    pub host: Option<String>,

    /// Override `server.port`
    #[arg(long)]
    pub port: Option<u16>,
}

#[derive(Debug, Args)]
pub struct SeedArgs {
    /// Delete every existing tag first
    #[arg(long)]
    pub clear: bool,
}
