use std::path::PathBuf;

use chrono::NaiveDate;

use crate::aggregate::aggregate_customers;
use crate::db::{
    get_connection, load_closed_customers, load_ledger_rows, load_products, load_transfer_rows,
};
use crate::error::Result;
use crate::inventory::{resolve_person_ledgers, Catalog};
use crate::rating::{calculate_debt_rating, ClosedCustomerSet};
use crate::rollup::rollup_reps;
use crate::settings::Settings;

fn open() -> Result<rusqlite::Connection> {
    get_connection(&Settings::load().db_path())
}

fn default_path(name: &str) -> PathBuf {
    let date = chrono::Local::now().format("%Y-%m-%d").to_string();
    Settings::load().exports_dir().join(format!("{name}-{date}.csv"))
}

fn writer(path: &PathBuf) -> Result<csv::Writer<std::fs::File>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(csv::Writer::from_path(path)?)
}

fn finish(mut wtr: csv::Writer<std::fs::File>, path: &PathBuf) -> Result<()> {
    wtr.flush()?;
    println!("Wrote {}", path.display());
    Ok(())
}

pub fn customers(as_of: NaiveDate, output: Option<String>) -> Result<()> {
    let conn = open()?;
    let rows = load_ledger_rows(&conn)?;
    let closed = ClosedCustomerSet::new(load_closed_customers(&conn)?);
    let aggs = aggregate_customers(&rows, as_of);

    let path = output.map(PathBuf::from).unwrap_or_else(|| default_path("customers"));
    let mut wtr = writer(&path)?;
    wtr.write_record([
        "customer", "total_debit", "total_credit", "net_debt", "net_sales",
        "transactions", "last_payment_date", "last_payment_amount",
        "last_sale_date", "sales_90d", "payments_90d", "payment_events_90d", "rating",
    ])?;
    for agg in &aggs {
        let rating = calculate_debt_rating(agg, &closed, as_of);
        wtr.write_record([
            agg.customer_name.clone(),
            format!("{:.2}", agg.total_debit),
            format!("{:.2}", agg.total_credit),
            format!("{:.2}", agg.net_debt),
            format!("{:.2}", agg.net_sales),
            agg.transaction_count.to_string(),
            agg.last_payment_date.map(|d| d.to_string()).unwrap_or_default(),
            format!("{:.2}", agg.last_payment_amount),
            agg.last_sales_date.map(|d| d.to_string()).unwrap_or_default(),
            format!("{:.2}", agg.sales_3m),
            format!("{:.2}", agg.payments_3m),
            agg.payments_count_3m.to_string(),
            rating.label().to_string(),
        ])?;
    }
    finish(wtr, &path)
}

pub fn reps(as_of: NaiveDate, output: Option<String>) -> Result<()> {
    let conn = open()?;
    let rows = load_ledger_rows(&conn)?;
    let closed = ClosedCustomerSet::new(load_closed_customers(&conn)?);
    let customers = aggregate_customers(&rows, as_of);
    let reps = rollup_reps(&rows, &customers, &closed, as_of);

    let path = output.map(PathBuf::from).unwrap_or_else(|| default_path("reps"));
    let mut wtr = writer(&path)?;
    wtr.write_record([
        "sales_rep", "net_debt", "net_sales", "collection_rate",
        "customers", "good", "medium", "bad",
    ])?;
    for rep in &reps {
        wtr.write_record([
            rep.sales_rep.clone(),
            format!("{:.2}", rep.net_debt),
            format!("{:.2}", rep.net_sales),
            format!("{:.1}", rep.collection_rate()),
            rep.customer_count.to_string(),
            rep.good_customers.to_string(),
            rep.medium_customers.to_string(),
            rep.bad_customers.to_string(),
        ])?;
    }
    finish(wtr, &path)
}

pub fn inventory(output: Option<String>) -> Result<()> {
    let conn = open()?;
    let transfers = load_transfer_rows(&conn)?;
    let catalog = Catalog::new(load_products(&conn)?);
    let ledgers = resolve_person_ledgers(&transfers);

    let path = output.map(PathBuf::from).unwrap_or_else(|| default_path("inventory"));
    let mut wtr = writer(&path)?;
    wtr.write_record([
        "person", "barcode", "product", "pcs_in_ctn", "received", "distributed", "balance",
    ])?;
    for ledger in &ledgers {
        for (barcode, bal) in &ledger.products {
            wtr.write_record([
                ledger.person.clone(),
                barcode.clone(),
                catalog.product_name(barcode).unwrap_or("").to_string(),
                format!("{}", catalog.pcs_in_ctn(barcode)),
                format!("{:.0}", bal.received),
                format!("{:.0}", bal.distributed),
                format!("{:.0}", bal.balance),
            ])?;
        }
    }
    finish(wtr, &path)
}
