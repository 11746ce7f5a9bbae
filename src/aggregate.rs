use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};

use crate::models::LedgerRow;
use crate::normalize::{
    is_payment_txn, is_return_code, is_sale_code, parse_date, payment_amount,
};

/// Days covered by the trailing window metrics, inclusive of `as_of`.
pub const WINDOW_DAYS: i64 = 90;

/// Per-customer totals derived from the full row set. Rebuilt from scratch
/// on every run; never persisted.
#[derive(Debug, Clone, Default)]
pub struct CustomerAggregate {
    pub customer_name: String,
    pub total_debit: f64,
    pub total_credit: f64,
    pub net_debt: f64,
    pub net_sales: f64,
    pub transaction_count: usize,
    pub sales_reps: BTreeSet<String>,
    pub invoice_numbers: BTreeSet<String>,
    pub last_payment_date: Option<NaiveDate>,
    pub last_payment_amount: f64,
    pub last_payment_matching: Option<String>,
    pub last_sales_date: Option<NaiveDate>,
    pub last_sales_amount: f64,
    // Trailing-90-day window, [as_of - 90d, as_of].
    pub sales_3m: f64,
    pub sales_count_3m: usize,
    pub payments_3m: f64,
    pub payments_count_3m: i64,
}

fn in_window(date: NaiveDate, as_of: NaiveDate) -> bool {
    date >= as_of - Duration::days(WINDOW_DAYS) && date <= as_of
}

/// Fold the flat row list into per-customer aggregates, keyed by the raw
/// customer name. Rows with unparseable dates still count toward lifetime
/// totals but are invisible to the trailing-window metrics.
pub fn aggregate_customers(rows: &[LedgerRow], as_of: NaiveDate) -> Vec<CustomerAggregate> {
    let mut by_customer: Vec<CustomerAggregate> = Vec::new();
    let mut index: std::collections::HashMap<String, usize> = std::collections::HashMap::new();

    for row in rows {
        let idx = *index.entry(row.customer_name.clone()).or_insert_with(|| {
            by_customer.push(CustomerAggregate {
                customer_name: row.customer_name.clone(),
                ..Default::default()
            });
            by_customer.len() - 1
        });
        let agg = &mut by_customer[idx];

        agg.total_debit += row.debit;
        agg.total_credit += row.credit;
        agg.net_debt = agg.total_debit - agg.total_credit;
        agg.transaction_count += 1;
        if !row.sales_rep.trim().is_empty() {
            agg.sales_reps.insert(row.sales_rep.clone());
        }
        if !row.number.trim().is_empty() {
            agg.invoice_numbers.insert(row.number.clone());
        }

        if is_sale_code(&row.number) {
            agg.net_sales += row.debit;
        } else if is_return_code(&row.number) {
            agg.net_sales -= row.credit;
        }

        let date = parse_date(&row.date);

        if is_payment_txn(&row.number, row.credit) && row.credit > 0.01 {
            if let Some(d) = date {
                if agg.last_payment_date.map_or(true, |prev| d > prev) {
                    agg.last_payment_date = Some(d);
                    agg.last_payment_amount = payment_amount(row.debit, row.credit);
                    agg.last_payment_matching = row.matching.clone();
                }
            }
        }
        if is_sale_code(&row.number) && row.debit > 0.0 {
            if let Some(d) = date {
                if agg.last_sales_date.map_or(true, |prev| d > prev) {
                    agg.last_sales_date = Some(d);
                    agg.last_sales_amount = row.debit;
                }
            }
        }
    }

    // Second pass: trailing-window metrics.
    for row in rows {
        let Some(date) = parse_date(&row.date) else {
            continue;
        };
        if !in_window(date, as_of) {
            continue;
        }
        let agg = &mut by_customer[index[&row.customer_name]];

        if is_sale_code(&row.number) {
            agg.sales_3m += row.debit;
            agg.sales_count_3m += 1;
        } else if is_return_code(&row.number) {
            agg.sales_3m -= row.credit;
        }

        if is_payment_txn(&row.number, row.credit) {
            agg.payments_3m += payment_amount(row.debit, row.credit);
            if row.credit > 0.01 {
                agg.payments_count_3m += 1;
            } else if row.debit > 0.01 {
                agg.payments_count_3m -= 1;
            }
        }
    }

    by_customer.sort_by(|a, b| {
        b.net_debt
            .partial_cmp(&a.net_debt)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    by_customer
}
