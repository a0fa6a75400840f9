//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::store::{SiteRecord, DATE_FORMAT};

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table of stored site parameters. Seeds are never shown.
pub fn print_sites_table(sites: &[SiteRecord]) {
    if sites.is_empty() {
        info("No sites in this store yet.");
        tip("Run `sitepass new` to add your first site.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Site", "Id", "Length", "Mode", "Start", "Removed", "Case", "Updated",
    ]);

    for s in sites {
        table.add_row(vec![
            s.site_name.clone(),
            s.account_id.clone(),
            s.length.to_string(),
            s.mode.to_string(),
            s.start.to_string(),
            s.removed.clone(),
            s.case.to_string(),
            s.updated
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }

    println!("{table}");
}
