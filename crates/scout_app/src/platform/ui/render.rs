use std::collections::BTreeSet;

use chrono::DateTime;
use scout_core::{AppViewModel, Repository, RowView};

const INDENT: &str = "      ";

/// Renders the session as terminal lines. `expanded` holds the logins of the
/// rows the user has opened.
pub fn render(view: &AppViewModel, expanded: &BTreeSet<String>) -> Vec<String> {
    let mut lines = vec![status_line(view)];

    for (index, row) in view.rows.iter().enumerate() {
        let is_open = expanded.contains(&row.account.login);
        let marker = if is_open { '▾' } else { '▸' };
        lines.push(format!(
            "{:>3}. {} {}  {}",
            index + 1,
            marker,
            row.account.login,
            row.account.html_url
        ));
        if is_open {
            lines.extend(row_body(row));
        }
    }

    lines
}

fn status_line(view: &AppViewModel) -> String {
    if view.is_searching {
        return format!("Searching for \"{}\"...", view.query);
    }
    if let Some(error) = &view.search_error {
        return format!("Search failed: {error}");
    }
    if view.is_empty_result() {
        return format!("No users found for \"{}\".", view.query);
    }
    if view.has_searched {
        let noun = if view.rows.len() == 1 { "user" } else { "users" };
        return format!("{} {} for \"{}\":", view.rows.len(), noun, view.query);
    }
    "Type a name to search GitHub users (/help for commands).".to_string()
}

fn row_body(row: &RowView) -> Vec<String> {
    if row.loading {
        return vec![format!("{INDENT}loading repositories...")];
    }
    if let Some(error) = &row.error {
        return vec![format!("{INDENT}! {error} (collapse and reopen to retry)")];
    }
    if row.loaded && row.repositories.is_empty() {
        return vec![format!("{INDENT}no public repositories")];
    }
    row.repositories.iter().flat_map(repository_lines).collect()
}

fn repository_lines(repo: &Repository) -> Vec<String> {
    let mut header = format!(
        "{INDENT}- {}  ★ {}",
        repo.name,
        format_with_commas(repo.stargazers_count)
    );
    if let Some(language) = &repo.language {
        header.push_str(&format!("  {language}"));
    }
    if repo.fork {
        header.push_str("  [fork]");
    }
    if repo.private {
        header.push_str("  [private]");
    }
    header.push_str(&format!("  updated {}", format_date(&repo.updated_at)));

    let mut lines = vec![header];
    if let Some(description) = repo.description.as_deref().map(str::trim) {
        if !description.is_empty() {
            lines.push(format!("{INDENT}  {description}"));
        }
    }
    lines
}

/// `YYYY-MM-DD` for RFC 3339 timestamps; anything else is shown as received.
fn format_date(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(timestamp) => timestamp.format("%Y-%m-%d").to_string(),
        Err(_) => raw.to_string(),
    }
}

fn format_with_commas(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
