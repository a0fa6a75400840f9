//! `sitepass history`: display the operation history.
//!
//! Usage:
//!   sitepass history               # show last 50 entries
//!   sitepass history --last 20     # show last 20
//!   sitepass history --since 7d    # entries from last 7 days

use chrono::Utc;

use crate::audit::{history_dir, AuditEntry, AuditLog};
use crate::cli::output;
use crate::cli::{resolve_store, Cli};
use crate::errors::{Result, SitepassError};

/// Execute the `history` command.
pub fn execute(cli: &Cli, last: usize, since: Option<&str>) -> Result<()> {
    let since_dt = match since {
        Some(s) => Some(parse_duration(s)?),
        None => None,
    };

    let (_, path) = resolve_store(cli)?;
    let dir = history_dir(&path);
    if !AuditLog::db_path(&dir).exists() {
        output::info("No history recorded yet.");
        return Ok(());
    }

    let audit = AuditLog::open(&dir)
        .ok_or_else(|| SitepassError::AuditError("failed to open history database".into()))?;

    let entries = audit.query(last, since_dt)?;

    if entries.is_empty() {
        output::info("No history entries found.");
        return Ok(());
    }

    print_history_table(&entries);

    Ok(())
}

/// Parse a human-friendly duration string like "7d", "24h", "30m".
fn parse_duration(input: &str) -> Result<chrono::DateTime<Utc>> {
    let input = input.trim();

    let (num_str, duration): (&str, fn(i64) -> chrono::Duration) =
        if let Some(s) = input.strip_suffix('d') {
            (s, chrono::Duration::days)
        } else if let Some(s) = input.strip_suffix('h') {
            (s, chrono::Duration::hours)
        } else if let Some(s) = input.strip_suffix('m') {
            (s, chrono::Duration::minutes)
        } else {
            return Err(SitepassError::CommandFailed(format!(
                "invalid duration '{input}' (use a format like 7d, 24h, or 30m)"
            )));
        };

    let num: i64 = num_str.parse().map_err(|_| {
        SitepassError::CommandFailed(format!(
            "invalid duration '{input}': number part is not valid"
        ))
    })?;

    Ok(Utc::now() - duration(num))
}

/// Print history entries in a formatted table.
pub fn print_history_table(entries: &[AuditEntry]) {
    use comfy_table::{ContentArrangement, Table};
    use console::style;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Operation", "Site", "Details"]);

    for entry in entries {
        table.add_row(vec![
            entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            colorize_operation(&entry.operation),
            entry.site.clone().unwrap_or_else(|| "-".to_string()),
            entry.details.clone().unwrap_or_else(|| "-".to_string()),
        ]);
    }

    println!(
        "{}",
        style(format!("{} history entries:", entries.len())).bold()
    );
    println!("{table}");
}

fn colorize_operation(op: &str) -> String {
    use console::style;

    match op {
        "new" => style(op).green().to_string(),
        "show" => style(op).blue().to_string(),
        "check" => style(op).cyan().to_string(),
        _ => op.to_string(),
    }
}
