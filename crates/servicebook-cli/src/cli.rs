//! CLI definition using clap

use clap::{Parser, Subcommand};
use servicebook_types::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "servicebook")]
#[command(author = "david")]
#[command(version)]
#[command(about = "Vehicle service record keeping - register, review, edit, print, export")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Sign in with an auth token instead of the stored anonymous identity
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Store directory override
    #[arg(long, global = true)]
    pub store_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register a new vehicle service record
    Register {
        /// Registration number
        #[arg(long)]
        reg_number: String,

        #[arg(long)]
        brand: String,

        #[arg(long)]
        model: String,

        #[arg(long)]
        year: String,

        #[arg(long)]
        kilometers: String,

        /// Gearbox (Auto, Manual)
        #[arg(long)]
        gearbox: Option<String>,

        /// Motive power (Petrol, Diesel, Gas, Hybrid, PHEV, HEV)
        #[arg(long)]
        motive_power: Option<String>,

        /// Drive mode (Rear, Front, 4x4)
        #[arg(long)]
        drive_mode: Option<String>,
    },

    /// List all records, newest first
    List {
        /// Limit number of records shown
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },

    /// Show one record in full
    Show {
        /// Record id
        id: String,
    },

    /// Edit a record's fields and service flags
    Edit {
        /// Record id
        id: String,

        #[arg(long)]
        reg_number: Option<String>,

        #[arg(long)]
        brand: Option<String>,

        #[arg(long)]
        model: Option<String>,

        #[arg(long)]
        year: Option<String>,

        #[arg(long)]
        kilometers: Option<String>,

        /// Gearbox (Auto, Manual)
        #[arg(long)]
        gearbox: Option<String>,

        /// Motive power (Petrol, Diesel, Gas, Hybrid, PHEV, HEV)
        #[arg(long)]
        motive_power: Option<String>,

        /// Drive mode (Rear, Front, 4x4)
        #[arg(long)]
        drive_mode: Option<String>,

        /// Free-text notes; line breaks are preserved
        #[arg(long)]
        additional_info: Option<String>,

        #[arg(long)]
        brake_front_left: Option<String>,

        #[arg(long)]
        brake_front_right: Option<String>,

        #[arg(long)]
        brake_rear_left: Option<String>,

        #[arg(long)]
        brake_rear_right: Option<String>,

        /// Free-text type of the single scanning entry
        #[arg(long)]
        scan_type: Option<String>,

        /// Toggle a service flag, e.g. engine:0:done or scanning:0:urgent (repeatable)
        #[arg(long = "toggle")]
        toggles: Vec<String>,
    },

    /// Delete a record (asks for confirmation)
    Delete {
        /// Record id
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Export all records to CSV
    Export {
        /// Output file path (default: vehicle_service_records_<date>.csv)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Render a record as a printable HTML document
    Print {
        /// Record id
        id: String,

        /// Output file path (default: service_record_<reg>.html)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Import raw record documents from a JSON backup file
    Import {
        /// Path to a JSON array of record documents
        file: PathBuf,

        /// Dry run - show what would be imported without importing
        #[arg(long)]
        dry_run: bool,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set the application id (tenant scope)
        #[arg(long)]
        set_app_id: Option<String>,

        /// Set the store directory
        #[arg(long)]
        set_store_dir: Option<PathBuf>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}
