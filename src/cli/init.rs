use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::settings::{expand_path, Settings};

pub fn run(data_dir: Option<String>) -> Result<()> {
    let mut settings = Settings::load();
    if let Some(dir) = data_dir {
        settings.data_dir = expand_path(&dir);
    }
    settings.save()?;

    std::fs::create_dir_all(settings.data_dir())?;
    std::fs::create_dir_all(settings.exports_dir())?;

    let conn = get_connection(&settings.db_path())?;
    init_db(&conn)?;

    println!("Initialized daftar at {}", settings.data_dir().display());
    Ok(())
}
