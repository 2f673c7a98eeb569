use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for rcheckin
/// Conference check-in, CE credit reports and badge sheets on SQLite
#[derive(Parser)]
#[command(
    name = "rcheckin",
    version = env!("CARGO_PKG_VERSION"),
    about = "Conference check-in CLI: register attendees, log badge scans, build CE credit reports and print badges",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view, check or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields to the configuration file")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/vim/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Print or manage the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Register an attendee and assign the next badge number
    Register {
        /// Full name printed on the badge
        name: String,

        /// Contact email
        email: String,
    },

    /// Record a badge scan (manual check-in)
    Scan {
        /// Badge number as read from the badge
        badge: String,

        #[arg(
            long = "at",
            value_name = "TIMESTAMP",
            help = "Scan time (YYYY-MM-DD HH:MM[:SS]); defaults to now"
        )]
        at: Option<String>,
    },

    /// List registered attendees
    Attendees {
        #[arg(long = "scans", help = "Show every scan of each attendee on one line")]
        scans: bool,
    },

    /// List the configured CE sessions
    Sessions {
        #[arg(long = "date", value_name = "YYYY-MM-DD", help = "Only sessions on this day")]
        date: Option<String>,
    },

    /// Export the CE credit report (attendee × session)
    Report {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(
            long = "date",
            value_name = "YYYY-MM-DD",
            help = "Only credit sessions starting on this day"
        )]
        date: Option<String>,

        #[arg(long = "save", help = "Store the report in the database")]
        save: bool,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Show a CE report stored with `report --save`
    Saved {
        #[arg(long = "date", value_name = "YYYY-MM-DD")]
        date: String,
    },

    /// Export every badge's scans in timestamp columns
    History {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Export registered attendees with all scans on one line
    Summary {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Dump the scan log as stored
    Raw {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Print the badge sheet PDF for all registered attendees
    Badges {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, short = 'f')]
        force: bool,
    },
}
