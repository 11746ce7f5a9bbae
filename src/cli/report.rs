use chrono::NaiveDate;
use colored::Colorize;
use comfy_table::{Cell, Table};
use rusqlite::Connection;

use crate::aggregate::aggregate_customers;
use crate::db::{
    get_connection, load_closed_customers, load_ledger_rows, load_products, load_transfer_rows,
};
use crate::error::{DaftarError, Result};
use crate::fmt::{cartons, money};
use crate::inventory::{resolve_person_ledgers, Catalog};
use crate::rating::{calculate_debt_rating, ClosedCustomerSet, Rating};
use crate::rollup::rollup_reps;
use crate::settings::Settings;

fn open() -> Result<Connection> {
    get_connection(&Settings::load().db_path())
}

fn rating_cell(rating: Rating) -> Cell {
    match rating {
        Rating::Good => Cell::new("Good".green()),
        Rating::Medium => Cell::new("Medium".yellow()),
        Rating::Bad => Cell::new("Bad".red().bold()),
    }
}

fn date_or_dash(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "\u{2013}".to_string())
}

// ---------------------------------------------------------------------------
// Customers
// ---------------------------------------------------------------------------

pub fn customers(as_of: NaiveDate) -> Result<()> {
    let conn = open()?;
    let rows = load_ledger_rows(&conn)?;
    let closed = ClosedCustomerSet::new(load_closed_customers(&conn)?);
    let aggs = aggregate_customers(&rows, as_of);

    let mut table = Table::new();
    table.set_header(vec![
        "Customer", "Net Debt", "Net Sales", "Last Payment", "Last Sale", "90d Pays", "Rating",
    ]);
    for agg in &aggs {
        let rating = calculate_debt_rating(agg, &closed, as_of);
        table.add_row(vec![
            Cell::new(&agg.customer_name),
            Cell::new(money(agg.net_debt)),
            Cell::new(money(agg.net_sales)),
            Cell::new(format!(
                "{} ({})",
                date_or_dash(agg.last_payment_date),
                money(agg.last_payment_amount)
            )),
            Cell::new(date_or_dash(agg.last_sales_date)),
            Cell::new(agg.payments_count_3m),
            rating_cell(rating),
        ]);
    }

    println!("Customer Risk Report (as of {as_of})\n{table}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Sales reps
// ---------------------------------------------------------------------------

pub fn reps(as_of: NaiveDate) -> Result<()> {
    let conn = open()?;
    let rows = load_ledger_rows(&conn)?;
    let closed = ClosedCustomerSet::new(load_closed_customers(&conn)?);
    let customers = aggregate_customers(&rows, as_of);
    let reps = rollup_reps(&rows, &customers, &closed, as_of);

    let mut table = Table::new();
    table.set_header(vec![
        "Sales Rep", "Net Debt", "Net Sales", "Collection %", "Customers", "Good", "Medium", "Bad",
    ]);
    for rep in &reps {
        table.add_row(vec![
            Cell::new(&rep.sales_rep),
            Cell::new(money(rep.net_debt)),
            Cell::new(money(rep.net_sales)),
            Cell::new(format!("{:.1}%", rep.collection_rate())),
            Cell::new(rep.customer_count),
            Cell::new(rep.good_customers.to_string().green()),
            Cell::new(rep.medium_customers.to_string().yellow()),
            Cell::new(rep.bad_customers.to_string().red()),
        ]);
    }

    println!("Sales Rep Rollup (as of {as_of})\n{table}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

pub fn inventory(person: Option<&str>) -> Result<()> {
    let conn = open()?;
    let transfers = load_transfer_rows(&conn)?;
    let catalog = Catalog::new(load_products(&conn)?);
    let ledgers = resolve_person_ledgers(&transfers);

    if let Some(name) = person {
        let Some(ledger) = ledgers.iter().find(|l| l.person == name) else {
            return Err(DaftarError::UnknownCustomer(name.to_string()));
        };
        let mut table = Table::new();
        table.set_header(vec!["Barcode", "Product", "Received", "Distributed", "Balance"]);
        for (barcode, bal) in &ledger.products {
            let per = catalog.pcs_in_ctn(barcode);
            table.add_row(vec![
                Cell::new(barcode),
                Cell::new(catalog.product_name(barcode).unwrap_or("?")),
                Cell::new(cartons(bal.received, per)),
                Cell::new(cartons(bal.distributed, per)),
                Cell::new(cartons(bal.balance, per)),
            ]);
        }
        println!("Inventory \u{2014} {name}\n{table}");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Person", "Products", "Received (pcs)", "Distributed (pcs)", "Balance (pcs)"]);
    for ledger in &ledgers {
        let received: f64 = ledger.products.values().map(|p| p.received).sum();
        let distributed: f64 = ledger.products.values().map(|p| p.distributed).sum();
        let balance: f64 = ledger.products.values().map(|p| p.balance).sum();
        table.add_row(vec![
            Cell::new(&ledger.person),
            Cell::new(ledger.products.len()),
            Cell::new(money(received)),
            Cell::new(money(distributed)),
            Cell::new(money(balance)),
        ]);
    }

    println!("Person Inventory Ledgers\n{table}");
    Ok(())
}
