pub mod demo;
pub mod export;
pub mod import;
pub mod init;
pub mod reconcile;
pub mod report;
pub mod status;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::error::{DaftarError, Result};

/// Resolve an optional `--as-of YYYY-MM-DD` flag, defaulting to today.
/// Every windowed metric downstream takes this as an explicit parameter.
pub(crate) fn parse_as_of(as_of: &Option<String>) -> Result<NaiveDate> {
    match as_of {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| DaftarError::Validation(format!("invalid --as-of date: {raw} (want YYYY-MM-DD)"))),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

#[derive(Parser)]
#[command(
    name = "daftar",
    about = "Sales-ledger analysis and inventory transfer CLI for small distributors."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up daftar: choose a data directory and initialize the database.
    Init {
        /// Path for daftar data (default: ~/Documents/daftar)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Import CSV exports into the local database.
    Import {
        #[command(subcommand)]
        command: ImportCommands,
    },
    /// Run analysis reports.
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
    /// Export reports to CSV.
    Export {
        #[command(subcommand)]
        command: ExportCommands,
    },
    /// Mark a customer's month as reconciled.
    Reconcile {
        /// Customer name as it appears in the ledger
        customer: String,
        /// Month: YYYY-MM
        #[arg(long)]
        month: String,
        /// Free-form note stored with the mark
        #[arg(long)]
        note: Option<String>,
    },
    /// Load a sample dataset to explore daftar.
    Demo,
    /// Show current database and summary statistics.
    Status,
    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
pub enum ImportCommands {
    /// Import a sales/debit ledger CSV (Customer, Sales Rep, Date, Number, Debit, Credit, Matching).
    Ledger { file: String },
    /// Import an inventory transfer log CSV (Date, From, To, Barcode, Product, Qty, ...).
    Transfers { file: String },
    /// Import or update the product catalog CSV (Barcode, Name, PcsInCtn).
    Products { file: String },
    /// Import the closed-customer list (one name per line).
    Closed { file: String },
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Per-customer debt totals with risk ratings.
    Customers {
        /// Evaluation date for trailing-window metrics (default: today)
        #[arg(long = "as-of")]
        as_of: Option<String>,
    },
    /// Per-sales-rep rollup: totals, collection rate, rating tallies.
    Reps {
        #[arg(long = "as-of")]
        as_of: Option<String>,
    },
    /// Per-person inventory balances from the transfer log.
    Inventory {
        /// Show one person's full product breakdown
        #[arg(long)]
        person: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ExportCommands {
    /// Export the customer risk report to CSV.
    Customers {
        #[arg(long = "as-of")]
        as_of: Option<String>,
        /// Output file path (default: <data_dir>/exports/customers-<date>.csv)
        #[arg(long)]
        output: Option<String>,
    },
    /// Export the sales-rep rollup to CSV.
    Reps {
        #[arg(long = "as-of")]
        as_of: Option<String>,
        #[arg(long)]
        output: Option<String>,
    },
    /// Export per-person inventory balances to CSV.
    Inventory {
        #[arg(long)]
        output: Option<String>,
    },
}
