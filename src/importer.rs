use std::path::Path;

use rusqlite::Connection;
use sha2::{Digest, Sha256};

use crate::error::{DaftarError, Result};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub fn parse_amount(raw: &str) -> f64 {
    let s = raw.replace(',', "").replace('"', "");
    let s = s.trim();
    if let Some(inner) = s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        return -inner.trim().parse::<f64>().unwrap_or(0.0);
    }
    s.parse().unwrap_or(0.0)
}

fn opt(raw: &str) -> Option<String> {
    let s = raw.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

fn field<'a>(record: &'a csv::StringRecord, idx: usize) -> &'a str {
    record.get(idx).unwrap_or("").trim()
}

fn compute_checksum(file_path: &Path) -> Result<String> {
    let data = std::fs::read(file_path)?;
    let mut hasher = Sha256::new();
    hasher.update(&data);
    Ok(hex::encode(hasher.finalize()))
}

fn reader(file_path: &Path) -> Result<csv::Reader<std::io::BufReader<std::fs::File>>> {
    let file = std::fs::File::open(file_path)?;
    Ok(csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(std::io::BufReader::new(file)))
}

// ---------------------------------------------------------------------------
// Import kinds — enum dispatch instead of trait objects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImportKind {
    Ledger,
    Transfers,
    Products,
    Closed,
}

impl ImportKind {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Ledger => "ledger",
            Self::Transfers => "transfers",
            Self::Products => "products",
            Self::Closed => "closed",
        }
    }

    fn import(&self, conn: &Connection, file_path: &Path, import_id: i64) -> Result<ImportCounts> {
        match self {
            Self::Ledger => import_ledger(conn, file_path, import_id),
            Self::Transfers => import_transfers(conn, file_path, import_id),
            Self::Products => import_products(conn, file_path),
            Self::Closed => import_closed(conn, file_path),
        }
    }
}

// ---------------------------------------------------------------------------
// import_file
// ---------------------------------------------------------------------------

struct ImportCounts {
    imported: usize,
    skipped: usize,
}

pub struct ImportResult {
    pub imported: usize,
    pub skipped: usize,
    pub duplicate_file: bool,
}

pub fn import_file(conn: &Connection, file_path: &Path, kind: ImportKind) -> Result<ImportResult> {
    let checksum = compute_checksum(file_path)?;
    {
        let mut stmt = conn.prepare("SELECT 1 FROM imports WHERE checksum = ?1 AND kind = ?2")?;
        if stmt.exists(rusqlite::params![checksum, kind.key()])? {
            return Ok(ImportResult {
                imported: 0,
                skipped: 0,
                duplicate_file: true,
            });
        }
    }

    conn.execute(
        "INSERT INTO imports (filename, kind, checksum) VALUES (?1, ?2, ?3)",
        rusqlite::params![
            file_path.file_name().and_then(|n| n.to_str()).unwrap_or(""),
            kind.key(),
            checksum,
        ],
    )?;
    let import_id = conn.last_insert_rowid();

    let counts = kind.import(conn, file_path, import_id)?;

    conn.execute(
        "UPDATE imports SET record_count = ?1 WHERE id = ?2",
        rusqlite::params![counts.imported as i64, import_id],
    )?;

    Ok(ImportResult {
        imported: counts.imported,
        skipped: counts.skipped,
        duplicate_file: false,
    })
}

// ---------------------------------------------------------------------------
// Ledger CSV: Customer, Sales Rep, Date, Number, Debit, Credit, Matching
// ---------------------------------------------------------------------------

fn import_ledger(conn: &Connection, file_path: &Path, import_id: i64) -> Result<ImportCounts> {
    let mut rdr = reader(file_path)?;
    let mut found_header = false;
    let (mut idx_customer, mut idx_rep, mut idx_date, mut idx_number) = (0, 1, 2, 3);
    let (mut idx_debit, mut idx_credit, mut idx_matching) = (4, 5, 6);
    let mut imported = 0usize;
    let mut skipped = 0usize;

    for result in rdr.records() {
        let Ok(record) = result else { continue };
        if !found_header {
            if record.iter().any(|f| f.trim().eq_ignore_ascii_case("Customer"))
                && record.iter().any(|f| f.trim().eq_ignore_ascii_case("Debit"))
            {
                for (i, f) in record.iter().enumerate() {
                    match f.trim().to_lowercase().as_str() {
                        "customer" => idx_customer = i,
                        "sales rep" => idx_rep = i,
                        "date" => idx_date = i,
                        "number" => idx_number = i,
                        "debit" => idx_debit = i,
                        "credit" => idx_credit = i,
                        "matching" => idx_matching = i,
                        _ => {}
                    }
                }
                found_header = true;
            }
            continue;
        }

        let customer = field(&record, idx_customer);
        if customer.is_empty() {
            continue;
        }
        let date = field(&record, idx_date);
        let number = field(&record, idx_number);
        let debit = parse_amount(field(&record, idx_debit));
        let credit = parse_amount(field(&record, idx_credit));

        let exists: bool = conn
            .prepare_cached(
                "SELECT 1 FROM ledger_rows WHERE customer_name = ?1 AND date = ?2 \
                 AND number = ?3 AND debit = ?4 AND credit = ?5",
            )?
            .exists(rusqlite::params![customer, date, number, debit, credit])?;
        if exists {
            skipped += 1;
            continue;
        }

        conn.execute(
            "INSERT INTO ledger_rows (customer_name, sales_rep, date, number, debit, credit, matching, import_id) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                customer,
                field(&record, idx_rep),
                date,
                number,
                debit,
                credit,
                opt(field(&record, idx_matching)),
                import_id,
            ],
        )?;
        imported += 1;
    }

    if !found_header {
        return Err(DaftarError::Other(format!(
            "No ledger header row found in {}",
            file_path.display()
        )));
    }
    Ok(ImportCounts { imported, skipped })
}

// ---------------------------------------------------------------------------
// Transfer CSV: Date, From, To, Barcode, Product, Qty, Customer, Receiver,
// Number, Description
// ---------------------------------------------------------------------------

fn import_transfers(conn: &Connection, file_path: &Path, import_id: i64) -> Result<ImportCounts> {
    let mut rdr = reader(file_path)?;
    let mut found_header = false;
    let (mut idx_date, mut idx_from, mut idx_to, mut idx_barcode, mut idx_product) = (0, 1, 2, 3, 4);
    let (mut idx_qty, mut idx_customer, mut idx_receiver, mut idx_number, mut idx_desc) =
        (5, 6, 7, 8, 9);
    let mut imported = 0usize;
    let mut skipped = 0usize;

    for result in rdr.records() {
        let Ok(record) = result else { continue };
        if !found_header {
            if record.iter().any(|f| f.trim().eq_ignore_ascii_case("Barcode"))
                && record.iter().any(|f| f.trim().eq_ignore_ascii_case("Qty"))
            {
                for (i, f) in record.iter().enumerate() {
                    match f.trim().to_lowercase().as_str() {
                        "date" => idx_date = i,
                        "from" => idx_from = i,
                        "to" => idx_to = i,
                        "barcode" => idx_barcode = i,
                        "product" => idx_product = i,
                        "qty" => idx_qty = i,
                        "customer" => idx_customer = i,
                        "receiver" => idx_receiver = i,
                        "number" => idx_number = i,
                        "description" => idx_desc = i,
                        _ => {}
                    }
                }
                found_header = true;
            }
            continue;
        }

        let barcode = field(&record, idx_barcode);
        if barcode.is_empty() {
            continue;
        }
        let date = field(&record, idx_date);
        let number = field(&record, idx_number);
        let qty = parse_amount(field(&record, idx_qty));

        let exists: bool = conn
            .prepare_cached(
                "SELECT 1 FROM transfer_rows WHERE date = ?1 AND loc_from = ?2 AND loc_to = ?3 \
                 AND barcode = ?4 AND qty_pcs = ?5 AND number = ?6",
            )?
            .exists(rusqlite::params![
                date,
                field(&record, idx_from),
                field(&record, idx_to),
                barcode,
                qty,
                number,
            ])?;
        if exists {
            skipped += 1;
            continue;
        }

        conn.execute(
            "INSERT INTO transfer_rows (date, loc_from, loc_to, barcode, product_name, qty_pcs, \
             customer_name, receiver_name, number, description, import_id) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            rusqlite::params![
                date,
                field(&record, idx_from),
                field(&record, idx_to),
                barcode,
                field(&record, idx_product),
                qty,
                opt(field(&record, idx_customer)),
                opt(field(&record, idx_receiver)),
                number,
                opt(field(&record, idx_desc)),
                import_id,
            ],
        )?;
        imported += 1;
    }

    if !found_header {
        return Err(DaftarError::Other(format!(
            "No transfer header row found in {}",
            file_path.display()
        )));
    }
    Ok(ImportCounts { imported, skipped })
}

// ---------------------------------------------------------------------------
// Product catalog CSV: Barcode, Name, PcsInCtn — upsert by barcode
// ---------------------------------------------------------------------------

fn import_products(conn: &Connection, file_path: &Path) -> Result<ImportCounts> {
    let mut rdr = reader(file_path)?;
    let mut found_header = false;
    let (mut idx_barcode, mut idx_name, mut idx_pcs) = (0, 1, 2);
    let mut imported = 0usize;

    for result in rdr.records() {
        let Ok(record) = result else { continue };
        if !found_header {
            if record.iter().any(|f| f.trim().eq_ignore_ascii_case("Barcode")) {
                for (i, f) in record.iter().enumerate() {
                    match f.trim().to_lowercase().as_str() {
                        "barcode" => idx_barcode = i,
                        "name" => idx_name = i,
                        "pcsinctn" => idx_pcs = i,
                        _ => {}
                    }
                }
                found_header = true;
            }
            continue;
        }

        let barcode = field(&record, idx_barcode);
        if barcode.is_empty() {
            continue;
        }
        conn.execute(
            "INSERT INTO products (barcode, name, pcs_in_ctn) VALUES (?1, ?2, ?3) \
             ON CONFLICT (barcode) DO UPDATE SET name = ?2, pcs_in_ctn = ?3",
            rusqlite::params![
                barcode,
                field(&record, idx_name),
                parse_amount(field(&record, idx_pcs)),
            ],
        )?;
        imported += 1;
    }

    if !found_header {
        return Err(DaftarError::Other(format!(
            "No product header row found in {}",
            file_path.display()
        )));
    }
    Ok(ImportCounts { imported, skipped: 0 })
}

// ---------------------------------------------------------------------------
// Closed-customer list: one name per line, no header required
// ---------------------------------------------------------------------------

fn import_closed(conn: &Connection, file_path: &Path) -> Result<ImportCounts> {
    let content = std::fs::read_to_string(file_path)?;
    let mut imported = 0usize;
    let mut skipped = 0usize;
    for line in content.lines() {
        let name = line.trim().trim_matches('"');
        if name.is_empty() || name.eq_ignore_ascii_case("customer") {
            continue;
        }
        let changed = conn.execute(
            "INSERT OR IGNORE INTO closed_customers (name) VALUES (?1)",
            [name],
        )?;
        if changed == 0 {
            skipped += 1;
        } else {
            imported += 1;
        }
    }
    Ok(ImportCounts { imported, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{get_connection, init_db, load_ledger_rows, load_transfer_rows};

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    fn write_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    const LEDGER_CSV: &str = "\
Customer,Sales Rep,Date,Number,Debit,Credit,Matching
Acme Co,Rep A,15/03/2024,SAL001,\"1,000.00\",0,
Acme Co,Rep A,20/03/2024,BNK01,0,1000.00,M-7
";

    const TRANSFER_CSV: &str = "\
Date,From,To,Barcode,Product,Qty,Customer,Receiver,Number,Description
2024-05-01,Main Inventory,Ali,123,Chips 40g,50,,,TRF001,
2024-05-02,Ali,CUSTOMER,123,Chips 40g,20,Acme Co,Ali,TRF002,van sale
";

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,234.56"), 1234.56);
        assert_eq!(parse_amount("\"500.00\""), 500.0);
        assert_eq!(parse_amount("(250.00)"), -250.0);
        assert_eq!(parse_amount("  -42.50  "), -42.5);
        assert_eq!(parse_amount("not_a_number"), 0.0);
    }

    #[test]
    fn test_import_ledger() {
        let (dir, conn) = test_db();
        let path = write_file(dir.path(), "ledger.csv", LEDGER_CSV);
        let result = import_file(&conn, &path, ImportKind::Ledger).unwrap();
        assert_eq!(result.imported, 2);
        assert!(!result.duplicate_file);

        let rows = load_ledger_rows(&conn).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].customer_name, "Acme Co");
        assert_eq!(rows[0].debit, 1000.0);
        assert_eq!(rows[0].matching, None);
        assert_eq!(rows[1].matching.as_deref(), Some("M-7"));
    }

    #[test]
    fn test_import_ledger_skips_preamble_before_header() {
        let (dir, conn) = test_db();
        let content = format!("Exported by SheetSync\n\n{LEDGER_CSV}");
        let path = write_file(dir.path(), "ledger.csv", &content);
        let result = import_file(&conn, &path, ImportKind::Ledger).unwrap();
        assert_eq!(result.imported, 2);
    }

    #[test]
    fn test_import_ledger_detects_duplicate_file() {
        let (dir, conn) = test_db();
        let path = write_file(dir.path(), "ledger.csv", LEDGER_CSV);
        import_file(&conn, &path, ImportKind::Ledger).unwrap();
        let again = import_file(&conn, &path, ImportKind::Ledger).unwrap();
        assert!(again.duplicate_file);
        assert_eq!(again.imported, 0);
    }

    #[test]
    fn test_import_ledger_skips_duplicate_rows() {
        let (dir, conn) = test_db();
        let first = write_file(dir.path(), "a.csv", LEDGER_CSV);
        import_file(&conn, &first, ImportKind::Ledger).unwrap();
        // Same rows plus one new, in a distinct file.
        let overlap = format!("{LEDGER_CSV}Basit Traders,Rep B,01/04/2024,SAL002,700.00,0,\n");
        let second = write_file(dir.path(), "b.csv", &overlap);
        let result = import_file(&conn, &second, ImportKind::Ledger).unwrap();
        assert_eq!(result.imported, 1);
        assert_eq!(result.skipped, 2);
    }

    #[test]
    fn test_import_ledger_requires_header() {
        let (dir, conn) = test_db();
        let path = write_file(dir.path(), "bad.csv", "no,header,here\n1,2,3\n");
        assert!(import_file(&conn, &path, ImportKind::Ledger).is_err());
    }

    #[test]
    fn test_import_transfers() {
        let (dir, conn) = test_db();
        let path = write_file(dir.path(), "transfers.csv", TRANSFER_CSV);
        let result = import_file(&conn, &path, ImportKind::Transfers).unwrap();
        assert_eq!(result.imported, 2);

        let rows = load_transfer_rows(&conn).unwrap();
        assert_eq!(rows[0].loc_to, "Ali");
        assert_eq!(rows[0].qty_pcs, 50.0);
        assert_eq!(rows[1].customer_name.as_deref(), Some("Acme Co"));
        assert_eq!(rows[1].description.as_deref(), Some("van sale"));
    }

    #[test]
    fn test_import_products_upserts() {
        let (dir, conn) = test_db();
        let v1 = write_file(dir.path(), "p1.csv", "Barcode,Name,PcsInCtn\n123,Chips 40g,24\n");
        import_file(&conn, &v1, ImportKind::Products).unwrap();
        let v2 = write_file(dir.path(), "p2.csv", "Barcode,Name,PcsInCtn\n123,Chips 40g New,12\n");
        import_file(&conn, &v2, ImportKind::Products).unwrap();

        let count: i64 = conn.query_row("SELECT count(*) FROM products", [], |r| r.get(0)).unwrap();
        assert_eq!(count, 1);
        let pcs: f64 = conn
            .query_row("SELECT pcs_in_ctn FROM products WHERE barcode = '123'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(pcs, 12.0);
    }

    #[test]
    fn test_import_closed_list() {
        let (dir, conn) = test_db();
        let path = write_file(dir.path(), "closed.csv", "Customer\nOld Shop\n\nGone Mart\nOld Shop\n");
        let result = import_file(&conn, &path, ImportKind::Closed).unwrap();
        assert_eq!(result.imported, 2);
        assert_eq!(result.skipped, 1);
    }

    #[test]
    fn test_imports_batch_recorded() {
        let (dir, conn) = test_db();
        let path = write_file(dir.path(), "ledger.csv", LEDGER_CSV);
        import_file(&conn, &path, ImportKind::Ledger).unwrap();
        let (kind, count): (String, i64) = conn
            .query_row("SELECT kind, record_count FROM imports LIMIT 1", [], |r| {
                Ok((r.get(0)?, r.get(1)?))
            })
            .unwrap();
        assert_eq!(kind, "ledger");
        assert_eq!(count, 2);
    }
}
