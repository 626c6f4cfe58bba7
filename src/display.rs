use std::io::{self, Write};

use colored::{ColoredString, Colorize};
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};

use crate::{
    account::{AccountSnapshot, AccountStatus},
    constants::PLACEHOLDER,
};

const BANNER: &str = r"
  ____             _                _   ____  _
 |  _ \  ___ _ __ (_)_ __   ___  __| | |  _ \(_)_ __   __ _  ___ _ __
 | | | |/ _ \ '_ \| | '_ \ / _ \/ _` | | |_) | | '_ \ / _` |/ _ \ '__|
 | |_| |  __/ |_) | | | | |  __/ (_| | |  __/| | | | | (_| |  __/ |
 |____/ \___| .__/|_|_| |_|\___|\__,_| |_|   |_|_| |_|\__, |\___|_|
            |_|                                       |___/
";

const HEADERS: [&str; 8] = [
    "Account", "Username", "Email", "Proxy", "Status", "Today", "Total", "Last update",
];

/// Read-only consumer of account state, called once per cycle boundary.
pub trait Dashboard {
    fn render(&mut self, accounts: &[AccountSnapshot]);
}

/// Full-screen redraw: banner, account table, then the log section the
/// scheduler's tracing output scrolls into.
#[derive(Debug, Default)]
pub struct TerminalDashboard;

impl Dashboard for TerminalDashboard {
    fn render(&mut self, accounts: &[AccountSnapshot]) {
        let mut stdout = io::stdout();

        if let Err(e) = execute!(stdout, Clear(ClearType::All), MoveTo(0, 0)) {
            tracing::warn!("Failed to clear terminal: {e}");
        }

        let mut screen = format!(
            "{}\n{}\n\n{}\n",
            BANNER.green(),
            "=== Accounts ===".cyan(),
            render_table(accounts),
        );
        for line in render_errors(accounts) {
            screen.push_str(&format!("{}\n", line.red()));
        }
        screen.push_str(&format!("{}\n", "=== Activity log ===".cyan()));

        if let Err(e) = stdout.write_all(screen.as_bytes()).and_then(|_| stdout.flush()) {
            tracing::warn!("Failed to draw dashboard: {e}");
        }
    }
}

fn status_cell(status: AccountStatus, padded: String) -> ColoredString {
    match status {
        AccountStatus::Initializing => padded.yellow(),
        AccountStatus::Connected => padded.green(),
        AccountStatus::Errored => padded.red(),
    }
}

fn row_cells(account: &AccountSnapshot) -> [String; 8] {
    let or_placeholder = |value: &Option<String>| value.as_deref().unwrap_or(PLACEHOLDER).to_string();

    [
        format!("{}. {}", account.number, account.token),
        or_placeholder(&account.username),
        or_placeholder(&account.email),
        account.proxy.clone(),
        account.status.to_string(),
        format!("{:.2}", account.points_today),
        format!("{:.2}", account.total_points),
        or_placeholder(&account.last_update),
    ]
}

/// Plain-width table; only the status column is colored.
pub fn render_table(accounts: &[AccountSnapshot]) -> String {
    let rows: Vec<[String; 8]> = accounts.iter().map(row_cells).collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let separator = format!(
        "+{}+",
        widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+")
    );

    let header = HEADERS
        .iter()
        .zip(&widths)
        .map(|(h, &w)| format!(" {h:<w$} ").cyan().to_string())
        .collect::<Vec<_>>()
        .join("|");

    let mut lines = vec![separator.clone(), format!("|{header}|"), separator.clone()];

    for (account, row) in accounts.iter().zip(&rows) {
        let cells = row
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(column, (cell, &w))| {
                let padded = format!(" {cell:<w$} ");
                match column {
                    4 => status_cell(account.status, padded).to_string(),
                    _ => padded,
                }
            })
            .collect::<Vec<_>>()
            .join("|");
        lines.push(format!("|{cells}|"));
    }

    lines.push(separator);
    lines.join("\n")
}

/// Last failure of every errored account, in table order.
pub fn render_errors(accounts: &[AccountSnapshot]) -> Vec<String> {
    accounts
        .iter()
        .filter(|account| account.status == AccountStatus::Errored)
        .filter_map(|account| {
            let error = account.last_error.as_deref()?;
            Some(format!("Account {}: {error}", account.number))
        })
        .collect()
}
