use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "daybook")]
#[command(about = "Daybook - track billable time against clients and projects", long_about = None)]
pub struct Args {
    /// Data directory (overrides the config file)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log level
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage clients
    Client {
        #[command(subcommand)]
        action: ClientCommand,
    },
    /// Manage projects
    Project {
        #[command(subcommand)]
        action: ProjectCommand,
    },
    /// Start timing a project (stops any other timer)
    Start {
        /// Project name or id
        project: String,
        /// Client name or id, when the project name is ambiguous
        #[arg(short, long)]
        client: Option<String>,
    },
    /// Pause the running timer and record the time
    Pause,
    /// Stop the running timer and record the time
    Stop,
    /// Show the running timer
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Follow the running timer second by second until Ctrl-C
    Watch,
    /// List recorded time entries, newest first
    Entries {
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,
    },
    /// Hours and earnings per project and client
    Report,
    /// Export all time entries as CSV
    Export {
        /// Directory to write the file to
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Show configuration
    Config,
}

#[derive(Subcommand, Debug)]
pub enum ClientCommand {
    Add { name: String },
    List,
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    Add {
        name: String,
        /// Owning client, by name or id
        #[arg(short, long)]
        client: String,
        /// Hourly rate, 0 to 10000
        #[arg(short, long)]
        rate: Option<String>,
    },
    List,
}
