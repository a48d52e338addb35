use std::collections::BTreeSet;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Context;
use scout_engine::{ClientSettings, ReqwestGithubClient, SearchStore};
use scout_logging::{scout_info, scout_warn};
use tokio::runtime::Runtime;

use super::logging::{self, LogDestination};
use super::ui::commands::{self, Command, HELP_TEXT};
use super::ui::render;

pub fn run_app() -> anyhow::Result<()> {
    logging::initialize(LogDestination::File);

    let client = ReqwestGithubClient::new(ClientSettings::from_env())
        .context("failed to configure the GitHub client")?;
    let runtime = Runtime::new().context("failed to start the async runtime")?;
    let mut session = TerminalSession::new(SearchStore::new(Arc::new(client)));

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    session.redraw(&mut stdout)?;
    prompt(&mut stdout)?;

    for line in stdin.lock().lines() {
        let line = line.context("failed to read from stdin")?;
        match commands::parse(&line) {
            Command::Quit => break,
            Command::Empty => {}
            Command::Help => writeln!(stdout, "{HELP_TEXT}")?,
            Command::Unknown(raw) => writeln!(stdout, "Unknown command {raw:?}; try /help")?,
            Command::Search(query) => {
                writeln!(stdout, "Searching for \"{query}\"...")?;
                stdout.flush()?;
                runtime.block_on(session.search(&query));
            }
            Command::Toggle(target) => {
                let view = session.store.view();
                match commands::resolve(&target, &view) {
                    Some(login) => runtime.block_on(session.toggle(login)),
                    None => writeln!(stdout, "No result row matches {target:?}")?,
                }
            }
            Command::Reset => session.reset(),
        }
        session.redraw_if_dirty(&mut stdout)?;
        prompt(&mut stdout)?;
    }

    scout_info!("Session ended");
    Ok(())
}

fn prompt(out: &mut impl Write) -> io::Result<()> {
    write!(out, "> ")?;
    out.flush()
}

/// Presentation-side state: the store plus which rows are expanded.
struct TerminalSession {
    store: SearchStore,
    expanded: BTreeSet<String>,
    layout_changed: bool,
}

impl TerminalSession {
    fn new(store: SearchStore) -> Self {
        Self {
            store,
            expanded: BTreeSet::new(),
            layout_changed: false,
        }
    }

    async fn search(&mut self, query: &str) {
        self.store.set_query(query);
        self.store.search(query).await;
        self.expanded.clear();
    }

    async fn toggle(&mut self, login: &str) {
        self.layout_changed = true;
        if self.expanded.remove(login) {
            return;
        }
        self.expanded.insert(login.to_string());
        if !self.store.toggle_row_expansion(login).await {
            scout_info!("Row {} already loaded or loading", login);
        }
        if let Some(error) = self.store.snapshot().row(login).and_then(|row| row.error()) {
            scout_warn!("Row {} shows error: {}", login, error);
        }
    }

    fn reset(&mut self) {
        self.store.reset();
        self.expanded.clear();
    }

    fn redraw_if_dirty(&mut self, out: &mut impl Write) -> io::Result<()> {
        let store_dirty = self.store.consume_dirty();
        let layout_dirty = std::mem::take(&mut self.layout_changed);
        if store_dirty || layout_dirty {
            self.redraw(out)?;
        }
        Ok(())
    }

    fn redraw(&self, out: &mut impl Write) -> io::Result<()> {
        for line in render::render(&self.store.view(), &self.expanded) {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }
}
