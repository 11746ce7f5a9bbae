use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

/// Parse a free-form ledger date. Year-first forms are tried verbatim;
/// three-part slash/dash dates are ordered by magnitude, biased day-first
/// (the ledger exports this tool consumes write day before month).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(d);
        }
    }

    let parts: Vec<&str> = raw.split(['/', '-']).collect();
    if parts.len() != 3 {
        return None;
    }
    let p1: i32 = parts[0].trim().parse().ok()?;
    let p2: i32 = parts[1].trim().parse().ok()?;
    let p3: i32 = parts[2].trim().parse().ok()?;

    let (y, m, d) = if p1 > 31 {
        (p1, p2, p3)
    } else if p1 > 12 || p3 > 31 {
        // Day-month-year: first field too big for a month, or the year
        // sits in the third slot.
        (p3, p2, p1)
    } else {
        // Short ambiguous forms (two-digit year) fall back to month-first.
        (p3, p1, p2)
    };
    let y = if y < 100 { y + 2000 } else { y };
    NaiveDate::from_ymd_opt(y, m as u32, d as u32)
}

/// Day-granularity difference, `as_of - date`. Negative when `date` is in
/// the future.
pub fn days_since(date: NaiveDate, as_of: NaiveDate) -> i64 {
    (as_of - date).num_days()
}

// ---------------------------------------------------------------------------
// Transaction codes
// ---------------------------------------------------------------------------

const NON_PAYMENT_PREFIXES: &[&str] = &["SAL", "RSAL", "BIL", "JV", "OB"];

fn code_starts_with(number: &str, prefix: &str) -> bool {
    number
        .trim()
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

pub fn is_sale_code(number: &str) -> bool {
    code_starts_with(number, "SAL")
}

pub fn is_return_code(number: &str) -> bool {
    code_starts_with(number, "RSAL")
}

/// A row is a payment when its code is bank-tagged, or when it carries a
/// real credit under a code that is not a sale/return/bill/journal/opening
/// entry.
pub fn is_payment_txn(number: &str, credit: f64) -> bool {
    if code_starts_with(number, "BNK") {
        return true;
    }
    credit > 0.01 && !NON_PAYMENT_PREFIXES.iter().any(|p| code_starts_with(number, p))
}

/// Signed net payment amount for a payment row.
pub fn payment_amount(debit: f64, credit: f64) -> f64 {
    credit - debit
}

// ---------------------------------------------------------------------------
// Names
// ---------------------------------------------------------------------------

/// Lowercase, trim, collapse runs of whitespace. Used for closed-customer
/// membership; aggregation keys stay raw.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Inventory locations
// ---------------------------------------------------------------------------

pub const MAIN_INVENTORY: &str = "Main Inventory";
pub const CUSTOMER: &str = "Customer";
pub const ONLY_TRANSFER: &str = "Only Transfer";
pub const FROZEN: &str = "Frozen";

/// Map legacy sentinel labels to canonical locations. Legacy `OUT` rows were
/// written with the receiving person in `loc_to`, so both ends swap: the
/// person becomes the source and the goods go out to a customer.
pub fn canonicalize_locations(loc_from: &str, loc_to: &str) -> (String, String) {
    let from = loc_from.trim();
    let to = loc_to.trim();
    match from {
        "IN" => (MAIN_INVENTORY.to_string(), canonical_label(to)),
        "OUT" => (canonical_label(to), CUSTOMER.to_string()),
        _ => (canonical_label(from), canonical_label(to)),
    }
}

fn canonical_label(loc: &str) -> String {
    match loc {
        "MAIN" => MAIN_INVENTORY.to_string(),
        "CUSTOMER" => CUSTOMER.to_string(),
        other => other.to_string(),
    }
}

/// Paperwork-only transfers: recorded for audit and printing, never allowed
/// to touch stock balances. Takes canonicalized labels.
pub fn is_paper_only(loc_from: &str, loc_to: &str) -> bool {
    loc_from == ONLY_TRANSFER || loc_to == FROZEN
}

/// A canonicalized location names a person when it is neither of the two
/// reserved endpoints.
pub fn is_person(loc: &str) -> bool {
    !loc.is_empty() && loc != MAIN_INVENTORY && loc != CUSTOMER
}
