use scout_core::AppViewModel;

pub const HELP_TEXT: &str = "\
Type a name and press Enter to search GitHub users.
  /open <n|login>   expand or collapse a result row
  /search <text>    search explicitly (same as plain text)
  /reset            clear the session
  /help             show this help
  /quit             exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Toggle(RowTarget),
    Reset,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

/// A result row addressed either by its 1-based position or by login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowTarget {
    Index(usize),
    Login(String),
}

pub fn parse(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Search(line.to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    match (name, arg) {
        ("open" | "o", "") => Command::Unknown(line.to_string()),
        ("open" | "o", target) => Command::Toggle(parse_target(target)),
        ("search" | "s", "") => Command::Empty,
        ("search" | "s", query) => Command::Search(query.to_string()),
        ("reset", _) => Command::Reset,
        ("help" | "h" | "?", _) => Command::Help,
        ("quit" | "q" | "exit", _) => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}

fn parse_target(raw: &str) -> RowTarget {
    match raw.parse::<usize>() {
        Ok(index) => RowTarget::Index(index),
        Err(_) => RowTarget::Login(raw.to_string()),
    }
}

/// Resolves a target to the canonical login of a visible row.
pub fn resolve<'a>(target: &RowTarget, view: &'a AppViewModel) -> Option<&'a str> {
    let row = match target {
        RowTarget::Index(index) => index.checked_sub(1).and_then(|i| view.rows.get(i)),
        RowTarget::Login(login) => view
            .rows
            .iter()
            .find(|row| row.account.login.eq_ignore_ascii_case(login)),
    };
    row.map(|row| row.account.login.as_str())
}
