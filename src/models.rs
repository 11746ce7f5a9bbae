/// One bookkeeping line: a debit/credit posted against a customer.
#[derive(Debug, Clone)]
pub struct LedgerRow {
    pub customer_name: String,
    pub sales_rep: String,
    /// Free-form date string as exported from the ledger; parsed lazily.
    pub date: String,
    /// Transaction code, prefix-tagged (SAL, RSAL, BNK, BIL, JV, OB, ...).
    pub number: String,
    pub debit: f64,
    pub credit: f64,
    pub matching: Option<String>,
}

/// One inventory movement line between two locations or persons.
#[derive(Debug, Clone)]
pub struct TransferRow {
    pub date: String,
    pub loc_from: String,
    pub loc_to: String,
    pub barcode: String,
    pub product_name: String,
    pub qty_pcs: f64,
    pub customer_name: Option<String>,
    pub receiver_name: Option<String>,
    pub number: String,
    pub description: Option<String>,
}

/// Catalog entry used for carton/piece display conversion.
#[derive(Debug, Clone)]
pub struct Product {
    pub barcode: String,
    pub name: String,
    pub pcs_in_ctn: f64,
}

impl LedgerRow {
    pub fn new(customer: &str, rep: &str, date: &str, number: &str, debit: f64, credit: f64) -> Self {
        Self {
            customer_name: customer.to_string(),
            sales_rep: rep.to_string(),
            date: date.to_string(),
            number: number.to_string(),
            debit,
            credit,
            matching: None,
        }
    }
}
