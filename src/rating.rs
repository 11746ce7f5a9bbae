use std::collections::HashSet;

use chrono::NaiveDate;

use crate::aggregate::CustomerAggregate;
use crate::normalize::{days_since, normalize_name};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    Good,
    Medium,
    Bad,
}

impl Rating {
    pub fn label(&self) -> &'static str {
        match self {
            Rating::Good => "Good",
            Rating::Medium => "Medium",
            Rating::Bad => "Bad",
        }
    }
}

/// Closed-customer lookup. Names are normalized on insert so membership is
/// case- and whitespace-insensitive.
#[derive(Debug, Clone, Default)]
pub struct ClosedCustomerSet {
    names: HashSet<String>,
}

impl ClosedCustomerSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names.into_iter().map(|n| normalize_name(n.as_ref())).collect(),
        }
    }

    pub fn contains(&self, customer_name: &str) -> bool {
        self.names.contains(&normalize_name(customer_name))
    }
}

fn recency_score(date: Option<NaiveDate>, as_of: NaiveDate) -> u8 {
    match date {
        Some(d) => match days_since(d, as_of) {
            n if n <= 30 => 2,
            n if n <= 90 => 1,
            _ => 0,
        },
        None => 0,
    }
}

fn debt_size_score(net_debt: f64) -> u8 {
    if net_debt <= 5000.0 {
        2
    } else if net_debt <= 20000.0 {
        1
    } else {
        0
    }
}

fn collection_rate_score(total_debit: f64, total_credit: f64) -> u8 {
    if total_debit == 0.0 {
        return 0;
    }
    let rate = total_credit / total_debit;
    if rate >= 0.8 {
        2
    } else if rate >= 0.5 {
        1
    } else {
        0
    }
}

fn payment_frequency_score(payments_count_3m: i64) -> u8 {
    if payments_count_3m >= 2 {
        2
    } else if payments_count_3m == 1 {
        1
    } else {
        0
    }
}

/// Score a customer against the debt-aging rubric. Total over the input
/// domain: every aggregate maps to exactly one rating.
pub fn calculate_debt_rating(
    agg: &CustomerAggregate,
    closed: &ClosedCustomerSet,
    as_of: NaiveDate,
) -> Rating {
    if closed.contains(&agg.customer_name) {
        return Rating::Bad;
    }
    if agg.net_debt < 0.0 {
        return Rating::Good;
    }

    // Dormant-debtor flags: returns with no payments, or a debt with no
    // activity at all in the trailing window.
    let no_payments = agg.payments_count_3m == 0;
    if (agg.sales_3m < 0.0 && no_payments)
        || (no_payments && agg.sales_count_3m == 0 && agg.net_debt > 0.0)
    {
        return Rating::Bad;
    }

    let score = debt_size_score(agg.net_debt)
        + collection_rate_score(agg.total_debit, agg.total_credit)
        + recency_score(agg.last_payment_date, as_of)
        + payment_frequency_score(agg.payments_count_3m)
        + recency_score(agg.last_sales_date, as_of);

    if score >= 7 {
        Rating::Good
    } else if score >= 4 {
        Rating::Medium
    } else {
        Rating::Bad
    }
}
