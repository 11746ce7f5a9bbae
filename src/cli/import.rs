use std::path::Path;

use crate::db::get_connection;
use crate::error::Result;
use crate::importer::{import_file, ImportKind};
use crate::settings::Settings;

pub fn run(file: &str, kind: ImportKind) -> Result<()> {
    let conn = get_connection(&Settings::load().db_path())?;
    let result = import_file(&conn, Path::new(file), kind)?;

    if result.duplicate_file {
        println!("Skipped: this file was already imported (identical checksum).");
        return Ok(());
    }
    println!("Imported {} {} rows ({} duplicates skipped).", result.imported, kind.key(), result.skipped);
    Ok(())
}
