use rusqlite::Connection;

use crate::error::{DaftarError, Result};

#[derive(Debug)]
pub struct ReconcileMark {
    pub customer_name: String,
    pub month: String,
    pub already_marked: bool,
}

/// Record that a customer's month has been checked off against the ledger.
/// Pure pass-through bookkeeping: no balance math happens here.
pub fn mark_reconciled(
    conn: &Connection,
    customer_name: &str,
    month: &str,
    note: Option<&str>,
) -> Result<ReconcileMark> {
    let customer_name = customer_name.trim();
    if customer_name.is_empty() {
        return Err(DaftarError::Validation("customer name is required".to_string()));
    }
    let month = month.trim();
    if month.is_empty() {
        return Err(DaftarError::Validation("month (YYYY-MM) is required".to_string()));
    }

    let exists: bool = conn
        .prepare("SELECT 1 FROM reconciliations WHERE customer_name = ?1 AND month = ?2")?
        .exists(rusqlite::params![customer_name, month])?;

    conn.execute(
        "INSERT INTO reconciliations (customer_name, month, note) VALUES (?1, ?2, ?3) \
         ON CONFLICT (customer_name, month) DO UPDATE SET note = ?3, reconciled_at = datetime('now')",
        rusqlite::params![customer_name, month, note],
    )?;

    Ok(ReconcileMark {
        customer_name: customer_name.to_string(),
        month: month.to_string(),
        already_marked: exists,
    })
}

pub fn reconciled_months(conn: &Connection, customer_name: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT month FROM reconciliations WHERE customer_name = ?1 ORDER BY month",
    )?;
    let months: Vec<String> = stmt
        .query_map([customer_name], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(months)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{get_connection, init_db};

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    #[test]
    fn test_mark_and_list() {
        let (_dir, conn) = test_db();
        let mark = mark_reconciled(&conn, "Acme Co", "2024-05", None).unwrap();
        assert!(!mark.already_marked);
        mark_reconciled(&conn, "Acme Co", "2024-04", Some("checked by A.")).unwrap();
        assert_eq!(
            reconciled_months(&conn, "Acme Co").unwrap(),
            vec!["2024-04".to_string(), "2024-05".to_string()]
        );
    }

    #[test]
    fn test_remark_upserts() {
        let (_dir, conn) = test_db();
        mark_reconciled(&conn, "Acme Co", "2024-05", None).unwrap();
        let again = mark_reconciled(&conn, "Acme Co", "2024-05", Some("recheck")).unwrap();
        assert!(again.already_marked);
        let count: i64 = conn
            .query_row("SELECT count(*) FROM reconciliations", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        let (_dir, conn) = test_db();
        let err = mark_reconciled(&conn, "  ", "2024-05", None).unwrap_err();
        assert!(err.to_string().contains("customer name"), "got: {err}");
        let err = mark_reconciled(&conn, "Acme Co", "", None).unwrap_err();
        assert!(err.to_string().contains("month"), "got: {err}");
    }
}
