use std::collections::BTreeMap;

use crate::models::{Product, TransferRow};
use crate::normalize::{canonicalize_locations, is_paper_only, is_person};

/// Running totals for one person/product pair.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProductBalance {
    pub received: f64,
    pub distributed: f64,
    pub balance: f64,
}

/// Per-person inventory position across all products, keyed by barcode.
#[derive(Debug, Clone, Default)]
pub struct PersonLedger {
    pub person: String,
    pub products: BTreeMap<String, ProductBalance>,
}

impl PersonLedger {
    fn is_all_zero(&self) -> bool {
        self.products
            .values()
            .all(|p| p.received == 0.0 && p.distributed == 0.0 && p.balance == 0.0)
    }
}

/// Product catalog lookup for carton/piece conversion. Unknown barcodes and
/// zero pack sizes fall back to 1.
pub struct Catalog {
    by_barcode: BTreeMap<String, Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            by_barcode: products.into_iter().map(|p| (p.barcode.clone(), p)).collect(),
        }
    }

    pub fn pcs_in_ctn(&self, barcode: &str) -> f64 {
        match self.by_barcode.get(barcode) {
            Some(p) if p.pcs_in_ctn > 0.0 => p.pcs_in_ctn,
            _ => 1.0,
        }
    }

    pub fn product_name(&self, barcode: &str) -> Option<&str> {
        self.by_barcode.get(barcode).map(|p| p.name.as_str())
    }
}

/// Fold the flat transfer log into per-person ledgers. Legacy sentinel rows
/// are canonicalized first; paperwork-only rows never touch a balance. A
/// single row can credit one person and debit another when both ends are
/// persons. Persons whose every line nets to zero are dropped.
pub fn resolve_person_ledgers(rows: &[TransferRow]) -> Vec<PersonLedger> {
    let mut by_person: BTreeMap<String, PersonLedger> = BTreeMap::new();

    for row in rows {
        let (from, to) = canonicalize_locations(&row.loc_from, &row.loc_to);
        if is_paper_only(&from, &to) {
            continue;
        }

        if is_person(&to) {
            let ledger = by_person.entry(to.clone()).or_insert_with(|| PersonLedger {
                person: to.clone(),
                ..Default::default()
            });
            let entry = ledger.products.entry(row.barcode.clone()).or_default();
            entry.received += row.qty_pcs;
            entry.balance += row.qty_pcs;
        }
        if is_person(&from) {
            let ledger = by_person.entry(from.clone()).or_insert_with(|| PersonLedger {
                person: from.clone(),
                ..Default::default()
            });
            let entry = ledger.products.entry(row.barcode.clone()).or_default();
            entry.distributed += row.qty_pcs;
            entry.balance -= row.qty_pcs;
        }
    }

    by_person
        .into_values()
        .filter(|l| !l.is_all_zero())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{CUSTOMER, FROZEN, MAIN_INVENTORY, ONLY_TRANSFER};

    fn transfer(from: &str, to: &str, barcode: &str, qty: f64) -> TransferRow {
        TransferRow {
            date: "2024-05-10".to_string(),
            loc_from: from.to_string(),
            loc_to: to.to_string(),
            barcode: barcode.to_string(),
            product_name: "Chips".to_string(),
            qty_pcs: qty,
            customer_name: None,
            receiver_name: None,
            number: "TRF001".to_string(),
            description: None,
        }
    }

    fn balance<'a>(ledgers: &'a [PersonLedger], person: &str, barcode: &str) -> &'a ProductBalance {
        ledgers
            .iter()
            .find(|l| l.person == person)
            .unwrap()
            .products
            .get(barcode)
            .unwrap()
    }

    #[test]
    fn test_receive_then_return() {
        let rows = vec![
            transfer(MAIN_INVENTORY, "Ali", "123", 50.0),
            transfer("Ali", MAIN_INVENTORY, "123", 20.0),
        ];
        let ledgers = resolve_person_ledgers(&rows);
        let b = balance(&ledgers, "Ali", "123");
        assert_eq!(b.received, 50.0);
        assert_eq!(b.distributed, 20.0);
        assert_eq!(b.balance, 30.0);
    }

    #[test]
    fn test_person_to_person_hits_both_ledgers() {
        let rows = vec![transfer("Ali", "Bashir", "123", 10.0)];
        let ledgers = resolve_person_ledgers(&rows);
        assert_eq!(balance(&ledgers, "Ali", "123").balance, -10.0);
        assert_eq!(balance(&ledgers, "Bashir", "123").balance, 10.0);
    }

    #[test]
    fn test_legacy_in_row_receives_from_main() {
        let rows = vec![transfer("IN", "Ali", "123", 12.0)];
        let ledgers = resolve_person_ledgers(&rows);
        assert_eq!(balance(&ledgers, "Ali", "123").received, 12.0);
    }

    #[test]
    fn test_legacy_out_row_distributes_to_customer() {
        // Legacy OUT rows carry the person in loc_to; the goods leave them.
        let rows = vec![transfer("OUT", "Ali", "123", 12.0)];
        let ledgers = resolve_person_ledgers(&rows);
        let b = balance(&ledgers, "Ali", "123");
        assert_eq!(b.distributed, 12.0);
        assert_eq!(b.balance, -12.0);
    }

    #[test]
    fn test_paper_only_rows_are_invisible() {
        let rows = vec![
            transfer(ONLY_TRANSFER, "Ali", "123", 99.0),
            transfer("Ali", FROZEN, "123", 99.0),
        ];
        assert!(resolve_person_ledgers(&rows).is_empty());
    }

    #[test]
    fn test_main_and_customer_get_no_ledger() {
        let rows = vec![transfer(MAIN_INVENTORY, CUSTOMER, "123", 5.0)];
        assert!(resolve_person_ledgers(&rows).is_empty());
    }

    #[test]
    fn test_all_zero_person_is_dropped() {
        let rows = vec![
            transfer(MAIN_INVENTORY, "Ali", "123", 0.0),
        ];
        assert!(resolve_person_ledgers(&rows).is_empty());
    }

    #[test]
    fn test_conservation_per_barcode() {
        let rows = vec![
            transfer(MAIN_INVENTORY, "Ali", "123", 50.0),
            transfer("Ali", "Bashir", "123", 15.0),
            transfer("Bashir", CUSTOMER, "123", 5.0),
            transfer(ONLY_TRANSFER, "Ali", "123", 77.0), // excluded
        ];
        let ledgers = resolve_person_ledgers(&rows);
        let net: f64 = ledgers
            .iter()
            .filter_map(|l| l.products.get("123"))
            .map(|p| p.received - p.distributed)
            .sum();
        // 50 in from main, 5 out to customer; the person-to-person leg nets out.
        assert_eq!(net, 45.0);
    }

    #[test]
    fn test_catalog_lookup_and_defaults() {
        let catalog = Catalog::new(vec![
            Product { barcode: "123".into(), name: "Chips 40g".into(), pcs_in_ctn: 24.0 },
            Product { barcode: "999".into(), name: "Odd".into(), pcs_in_ctn: 0.0 },
        ]);
        assert_eq!(catalog.pcs_in_ctn("123"), 24.0);
        assert_eq!(catalog.pcs_in_ctn("999"), 1.0);
        assert_eq!(catalog.pcs_in_ctn("missing"), 1.0);
        assert_eq!(catalog.product_name("123"), Some("Chips 40g"));
    }
}
