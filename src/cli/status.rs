use crate::db::get_connection;
use crate::error::Result;
use crate::settings::Settings;

pub fn run() -> Result<()> {
    let settings = Settings::load();
    let data_dir = settings.data_dir();
    let db_path = settings.db_path();

    println!("User:       {}", if settings.current_user.is_empty() { "(not set)" } else { &settings.current_user });
    println!("Data dir:   {}", data_dir.display());
    println!("Database:   {}", db_path.display());

    if db_path.exists() {
        let conn = get_connection(&db_path)?;
        let ledger: i64 = conn.query_row("SELECT count(*) FROM ledger_rows", [], |r| r.get(0))?;
        let transfers: i64 = conn.query_row("SELECT count(*) FROM transfer_rows", [], |r| r.get(0))?;
        let products: i64 = conn.query_row("SELECT count(*) FROM products", [], |r| r.get(0))?;
        let closed: i64 = conn.query_row("SELECT count(*) FROM closed_customers", [], |r| r.get(0))?;
        let reconciled: i64 = conn.query_row("SELECT count(*) FROM reconciliations", [], |r| r.get(0))?;

        println!();
        println!("Ledger rows:      {ledger}");
        println!("Transfer rows:    {transfers}");
        println!("Products:         {products}");
        println!("Closed customers: {closed}");
        println!("Reconciled:       {reconciled}");
    } else {
        println!();
        println!("Database not found. Run `daftar init` to set up.");
    }

    Ok(())
}
