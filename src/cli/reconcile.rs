use crate::db::get_connection;
use crate::error::Result;
use crate::reconciler::{mark_reconciled, reconciled_months};
use crate::settings::Settings;

pub fn run(customer: &str, month: &str, note: Option<&str>) -> Result<()> {
    let settings = Settings::load();
    let conn = get_connection(&settings.db_path())?;

    // Stamp the operator into the note when one is configured.
    let note = match (note, settings.current_user.as_str()) {
        (Some(n), "") => Some(n.to_string()),
        (Some(n), user) => Some(format!("{n} ({user})")),
        (None, "") => None,
        (None, user) => Some(format!("marked by {user}")),
    };

    let mark = mark_reconciled(&conn, customer, month, note.as_deref())?;
    if mark.already_marked {
        println!("Updated reconciliation mark for {} / {}.", mark.customer_name, mark.month);
    } else {
        println!("Marked {} / {} as reconciled.", mark.customer_name, mark.month);
    }
    let months = reconciled_months(&conn, &mark.customer_name)?;
    println!("Reconciled months for {}: {}", mark.customer_name, months.join(", "));
    Ok(())
}
