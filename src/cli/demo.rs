use chrono::{Duration, Local};
use rusqlite::Connection;

use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::settings::Settings;

/// Ledger line relative to today: (customer, rep, days_ago, code, debit, credit).
const LEDGER: &[(&str, &str, i64, &str, f64, f64)] = &[
    ("Basit Traders", "Omar", 75, "SAL101", 12000.0, 0.0),
    ("Basit Traders", "Omar", 60, "BNK201", 0.0, 8000.0),
    ("Basit Traders", "Omar", 20, "SAL102", 4000.0, 0.0),
    ("Basit Traders", "Omar", 5, "BNK202", 0.0, 3500.0),
    ("City Mart", "Omar", 50, "SAL103", 30000.0, 0.0),
    ("City Mart", "Omar", 45, "RSAL10", 0.0, 2000.0),
    ("Gulf Stores", "Hina", 120, "SAL104", 25000.0, 0.0),
    ("Gulf Stores", "Hina", 110, "BNK203", 0.0, 5000.0),
    ("Noor Kiryana", "Hina", 10, "SAL105", 1500.0, 0.0),
    ("Noor Kiryana", "Hina", 3, "BNK204", 0.0, 1500.0),
    ("Old Shop", "Omar", 200, "SAL106", 9000.0, 0.0),
];

/// Transfer line: (days_ago, from, to, barcode, product, qty).
const TRANSFERS: &[(i64, &str, &str, &str, &str, f64)] = &[
    (30, "Main Inventory", "Ali", "8001", "Chips 40g", 240.0),
    (25, "Ali", "Customer", "8001", "Chips 40g", 96.0),
    (20, "Ali", "Bashir", "8001", "Chips 40g", 48.0),
    (18, "Bashir", "Customer", "8001", "Chips 40g", 24.0),
    (15, "IN", "Ali", "8002", "Chips 80g", 120.0),
    (12, "OUT", "Ali", "8002", "Chips 80g", 60.0),
    (10, "Only Transfer", "Ali", "8001", "Chips 40g", 500.0),
    (8, "Ali", "Frozen", "8002", "Chips 80g", 500.0),
];

const PRODUCTS: &[(&str, &str, f64)] = &[
    ("8001", "Chips 40g", 24.0),
    ("8002", "Chips 80g", 12.0),
];

const CLOSED: &[&str] = &["Old Shop"];

fn load(conn: &Connection) -> Result<usize> {
    let today = Local::now().date_naive();
    let mut count = 0usize;

    for (customer, rep, days_ago, code, debit, credit) in LEDGER {
        let date = (today - Duration::days(*days_ago)).to_string();
        conn.execute(
            "INSERT INTO ledger_rows (customer_name, sales_rep, date, number, debit, credit) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![customer, rep, date, code, debit, credit],
        )?;
        count += 1;
    }

    for (days_ago, from, to, barcode, product, qty) in TRANSFERS {
        let date = (today - Duration::days(*days_ago)).to_string();
        conn.execute(
            "INSERT INTO transfer_rows (date, loc_from, loc_to, barcode, product_name, qty_pcs, number) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, '')",
            rusqlite::params![date, from, to, barcode, product, qty],
        )?;
        count += 1;
    }

    for (barcode, name, pcs) in PRODUCTS {
        conn.execute(
            "INSERT OR REPLACE INTO products (barcode, name, pcs_in_ctn) VALUES (?1, ?2, ?3)",
            rusqlite::params![barcode, name, pcs],
        )?;
    }
    for name in CLOSED {
        conn.execute("INSERT OR IGNORE INTO closed_customers (name) VALUES (?1)", [name])?;
    }

    Ok(count)
}

pub fn run() -> Result<()> {
    let settings = Settings::load();
    std::fs::create_dir_all(settings.data_dir())?;
    let conn = get_connection(&settings.db_path())?;
    init_db(&conn)?;

    let count = load(&conn)?;
    println!("Loaded {count} sample rows.");
    println!("Try: daftar report customers, daftar report reps, daftar report inventory");
    Ok(())
}
