use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;
use crate::models::{LedgerRow, Product, TransferRow};

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS ledger_rows (
    id INTEGER PRIMARY KEY,
    customer_name TEXT NOT NULL,
    sales_rep TEXT NOT NULL DEFAULT '',
    date TEXT NOT NULL DEFAULT '',
    number TEXT NOT NULL DEFAULT '',
    debit REAL NOT NULL DEFAULT 0,
    credit REAL NOT NULL DEFAULT 0,
    matching TEXT,
    import_id INTEGER,
    created_at TEXT DEFAULT (datetime('now')),
    FOREIGN KEY (import_id) REFERENCES imports(id)
);

CREATE TABLE IF NOT EXISTS transfer_rows (
    id INTEGER PRIMARY KEY,
    date TEXT NOT NULL DEFAULT '',
    loc_from TEXT NOT NULL,
    loc_to TEXT NOT NULL,
    barcode TEXT NOT NULL,
    product_name TEXT NOT NULL DEFAULT '',
    qty_pcs REAL NOT NULL DEFAULT 0,
    customer_name TEXT,
    receiver_name TEXT,
    number TEXT NOT NULL DEFAULT '',
    description TEXT,
    import_id INTEGER,
    created_at TEXT DEFAULT (datetime('now')),
    FOREIGN KEY (import_id) REFERENCES imports(id)
);

CREATE TABLE IF NOT EXISTS products (
    barcode TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    pcs_in_ctn REAL NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS closed_customers (
    name TEXT PRIMARY KEY
);

CREATE TABLE IF NOT EXISTS imports (
    id INTEGER PRIMARY KEY,
    filename TEXT NOT NULL,
    kind TEXT NOT NULL,
    import_date TEXT DEFAULT (datetime('now')),
    record_count INTEGER,
    checksum TEXT
);

CREATE TABLE IF NOT EXISTS reconciliations (
    id INTEGER PRIMARY KEY,
    customer_name TEXT NOT NULL,
    month TEXT NOT NULL,
    note TEXT,
    reconciled_at TEXT DEFAULT (datetime('now')),
    UNIQUE (customer_name, month)
);
";

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Loaders — bulk reads feeding the in-memory aggregation pipelines
// ---------------------------------------------------------------------------

pub fn load_ledger_rows(conn: &Connection) -> Result<Vec<LedgerRow>> {
    let mut stmt = conn.prepare(
        "SELECT customer_name, sales_rep, date, number, debit, credit, matching \
         FROM ledger_rows ORDER BY id",
    )?;
    let rows: Vec<LedgerRow> = stmt
        .query_map([], |row| {
            Ok(LedgerRow {
                customer_name: row.get(0)?,
                sales_rep: row.get(1)?,
                date: row.get(2)?,
                number: row.get(3)?,
                debit: row.get(4)?,
                credit: row.get(5)?,
                matching: row.get(6)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn load_transfer_rows(conn: &Connection) -> Result<Vec<TransferRow>> {
    let mut stmt = conn.prepare(
        "SELECT date, loc_from, loc_to, barcode, product_name, qty_pcs, \
                customer_name, receiver_name, number, description \
         FROM transfer_rows ORDER BY id",
    )?;
    let rows: Vec<TransferRow> = stmt
        .query_map([], |row| {
            Ok(TransferRow {
                date: row.get(0)?,
                loc_from: row.get(1)?,
                loc_to: row.get(2)?,
                barcode: row.get(3)?,
                product_name: row.get(4)?,
                qty_pcs: row.get(5)?,
                customer_name: row.get(6)?,
                receiver_name: row.get(7)?,
                number: row.get(8)?,
                description: row.get(9)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn load_products(conn: &Connection) -> Result<Vec<Product>> {
    let mut stmt = conn.prepare("SELECT barcode, name, pcs_in_ctn FROM products ORDER BY name")?;
    let rows: Vec<Product> = stmt
        .query_map([], |row| {
            Ok(Product {
                barcode: row.get(0)?,
                name: row.get(1)?,
                pcs_in_ctn: row.get(2)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn load_closed_customers(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM closed_customers")?;
    let rows: Vec<String> = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    #[test]
    fn test_init_db_creates_tables() {
        let (_dir, conn) = test_db();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        for expected in &[
            "ledger_rows",
            "transfer_rows",
            "products",
            "closed_customers",
            "imports",
            "reconciliations",
        ] {
            assert!(tables.contains(&expected.to_string()), "missing table: {expected}");
        }
    }

    #[test]
    fn test_init_db_is_idempotent() {
        let (_dir, conn) = test_db();
        init_db(&conn).unwrap();
    }

    #[test]
    fn test_ledger_roundtrip() {
        let (_dir, conn) = test_db();
        conn.execute(
            "INSERT INTO ledger_rows (customer_name, sales_rep, date, number, debit, credit) \
             VALUES ('Acme Co', 'Rep A', '2024-05-01', 'SAL001', 1000.0, 0.0)",
            [],
        )
        .unwrap();
        let rows = load_ledger_rows(&conn).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].customer_name, "Acme Co");
        assert_eq!(rows[0].debit, 1000.0);
        assert_eq!(rows[0].matching, None);
    }

    #[test]
    fn test_transfer_roundtrip() {
        let (_dir, conn) = test_db();
        conn.execute(
            "INSERT INTO transfer_rows (date, loc_from, loc_to, barcode, product_name, qty_pcs, number) \
             VALUES ('2024-05-01', 'Main Inventory', 'Ali', '123', 'Chips 40g', 50.0, 'TRF001')",
            [],
        )
        .unwrap();
        let rows = load_transfer_rows(&conn).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].loc_to, "Ali");
        assert_eq!(rows[0].qty_pcs, 50.0);
    }

    #[test]
    fn test_products_and_closed_customers() {
        let (_dir, conn) = test_db();
        conn.execute(
            "INSERT INTO products (barcode, name, pcs_in_ctn) VALUES ('123', 'Chips 40g', 24)",
            [],
        )
        .unwrap();
        conn.execute("INSERT INTO closed_customers (name) VALUES ('Old Shop')", [])
            .unwrap();
        assert_eq!(load_products(&conn).unwrap().len(), 1);
        assert_eq!(load_closed_customers(&conn).unwrap(), vec!["Old Shop".to_string()]);
    }
}
