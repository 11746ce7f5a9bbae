mod aggregate;
mod cli;
mod db;
mod error;
mod fmt;
mod importer;
mod inventory;
mod models;
mod normalize;
mod rating;
mod reconciler;
mod rollup;
mod settings;

use clap::{CommandFactory, Parser};

use cli::{parse_as_of, Cli, Commands, ExportCommands, ImportCommands, ReportCommands};
use importer::ImportKind;

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Import { command } => match command {
            ImportCommands::Ledger { file } => cli::import::run(&file, ImportKind::Ledger),
            ImportCommands::Transfers { file } => cli::import::run(&file, ImportKind::Transfers),
            ImportCommands::Products { file } => cli::import::run(&file, ImportKind::Products),
            ImportCommands::Closed { file } => cli::import::run(&file, ImportKind::Closed),
        },
        Commands::Report { command } => match command {
            ReportCommands::Customers { as_of } => {
                parse_as_of(&as_of).and_then(cli::report::customers)
            }
            ReportCommands::Reps { as_of } => parse_as_of(&as_of).and_then(cli::report::reps),
            ReportCommands::Inventory { person } => cli::report::inventory(person.as_deref()),
        },
        Commands::Export { command } => match command {
            ExportCommands::Customers { as_of, output } => {
                parse_as_of(&as_of).and_then(|d| cli::export::customers(d, output))
            }
            ExportCommands::Reps { as_of, output } => {
                parse_as_of(&as_of).and_then(|d| cli::export::reps(d, output))
            }
            ExportCommands::Inventory { output } => cli::export::inventory(output),
        },
        Commands::Reconcile { customer, month, note } => {
            cli::reconcile::run(&customer, &month, note.as_deref())
        }
        Commands::Demo => cli::demo::run(),
        Commands::Status => cli::status::run(),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "daftar", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
