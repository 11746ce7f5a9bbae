use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;

use crate::aggregate::CustomerAggregate;
use crate::models::LedgerRow;
use crate::normalize::{is_return_code, is_sale_code};
use crate::rating::{calculate_debt_rating, ClosedCustomerSet, Rating};

/// Per-representative rollup. A customer is attributed to every rep that
/// appears on at least one of its rows, so rating tallies are not mutually
/// exclusive across reps.
#[derive(Debug, Clone, Default)]
pub struct SalesRepAggregate {
    pub sales_rep: String,
    pub total_debit: f64,
    pub total_credit: f64,
    pub net_debt: f64,
    pub net_sales: f64,
    pub transaction_count: usize,
    pub customer_count: usize,
    pub good_customers: usize,
    pub medium_customers: usize,
    pub bad_customers: usize,
}

impl SalesRepAggregate {
    /// Percentage of issued debit recovered as credit; 0 when nothing was
    /// ever debited.
    pub fn collection_rate(&self) -> f64 {
        if self.total_debit == 0.0 {
            0.0
        } else {
            self.total_credit / self.total_debit * 100.0
        }
    }
}

/// Fold rows into per-rep totals, then tally each rep's attributed customer
/// ratings. `customers` must be the aggregates built from the same `rows`.
pub fn rollup_reps(
    rows: &[LedgerRow],
    customers: &[CustomerAggregate],
    closed: &ClosedCustomerSet,
    as_of: NaiveDate,
) -> Vec<SalesRepAggregate> {
    let mut by_rep: HashMap<String, SalesRepAggregate> = HashMap::new();
    let mut rep_customers: HashMap<String, BTreeSet<String>> = HashMap::new();

    for row in rows {
        let rep = row.sales_rep.trim();
        if rep.is_empty() {
            continue;
        }
        let agg = by_rep.entry(rep.to_string()).or_insert_with(|| SalesRepAggregate {
            sales_rep: rep.to_string(),
            ..Default::default()
        });
        agg.total_debit += row.debit;
        agg.total_credit += row.credit;
        agg.net_debt = agg.total_debit - agg.total_credit;
        agg.transaction_count += 1;
        if is_sale_code(&row.number) {
            agg.net_sales += row.debit;
        } else if is_return_code(&row.number) {
            agg.net_sales -= row.credit;
        }
        rep_customers
            .entry(rep.to_string())
            .or_default()
            .insert(row.customer_name.clone());
    }

    let ratings: HashMap<&str, Rating> = customers
        .iter()
        .map(|c| (c.customer_name.as_str(), calculate_debt_rating(c, closed, as_of)))
        .collect();

    for (rep, names) in &rep_customers {
        let Some(agg) = by_rep.get_mut(rep) else { continue };
        agg.customer_count = names.len();
        for name in names {
            match ratings.get(name.as_str()) {
                Some(Rating::Good) => agg.good_customers += 1,
                Some(Rating::Medium) => agg.medium_customers += 1,
                Some(Rating::Bad) => agg.bad_customers += 1,
                None => {}
            }
        }
    }

    let mut reps: Vec<SalesRepAggregate> = by_rep.into_values().collect();
    reps.sort_by(|a, b| {
        b.net_debt
            .partial_cmp(&a.net_debt)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    reps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate_customers;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn row(customer: &str, rep: &str, number: &str, debit: f64, credit: f64) -> LedgerRow {
        LedgerRow::new(customer, rep, "2024-05-10", number, debit, credit)
    }

    fn build(rows: &[LedgerRow]) -> Vec<SalesRepAggregate> {
        let customers = aggregate_customers(rows, as_of());
        rollup_reps(rows, &customers, &ClosedCustomerSet::default(), as_of())
    }

    #[test]
    fn test_totals_and_distinct_customers() {
        let rows = vec![
            row("X", "Rep A", "SAL001", 1000.0, 0.0),
            row("X", "Rep A", "BNK01", 0.0, 400.0),
            row("Y", "Rep A", "SAL002", 500.0, 0.0),
        ];
        let reps = build(&rows);
        assert_eq!(reps.len(), 1);
        let a = &reps[0];
        assert_eq!(a.customer_count, 2);
        assert_eq!(a.total_debit, 1500.0);
        assert_eq!(a.total_credit, 400.0);
        assert_eq!(a.net_debt, 1100.0);
        assert_eq!(a.net_sales, 1500.0);
    }

    #[test]
    fn test_shared_customer_counted_for_both_reps() {
        let rows = vec![
            row("X", "Rep A", "SAL001", 1000.0, 0.0),
            row("X", "Rep B", "BNK01", 0.0, 1000.0),
        ];
        let reps = build(&rows);
        assert_eq!(reps.len(), 2);
        let total_tallies: usize = reps
            .iter()
            .map(|r| r.good_customers + r.medium_customers + r.bad_customers)
            .sum();
        // Customer X is rated once per attributed rep.
        assert_eq!(total_tallies, 2);
    }

    #[test]
    fn test_collection_rate() {
        let rows = vec![
            row("X", "Rep A", "SAL001", 1000.0, 0.0),
            row("X", "Rep A", "BNK01", 0.0, 800.0),
        ];
        let reps = build(&rows);
        assert_eq!(reps[0].collection_rate(), 80.0);
    }

    #[test]
    fn test_collection_rate_zero_when_no_debit() {
        let agg = SalesRepAggregate::default();
        assert_eq!(agg.collection_rate(), 0.0);
    }

    #[test]
    fn test_rows_without_rep_are_skipped() {
        let rows = vec![
            row("X", "", "SAL001", 1000.0, 0.0),
            row("X", "  ", "SAL002", 1000.0, 0.0),
        ];
        let reps = build(&rows);
        assert!(reps.is_empty());
    }

    #[test]
    fn test_sorted_descending_by_net_debt() {
        let rows = vec![
            row("X", "Rep A", "SAL001", 100.0, 0.0),
            row("Y", "Rep B", "SAL002", 900.0, 0.0),
        ];
        let reps = build(&rows);
        assert_eq!(reps[0].sales_rep, "Rep B");
        assert_eq!(reps[1].sales_rep, "Rep A");
    }
}
