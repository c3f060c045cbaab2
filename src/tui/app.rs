//! Interactive terminal session around the compare sidebar.
//!
//! The sidebar's dispatcher is a channel; everything it sends is drained
//! into a command log shown next to the sidebar. Carrying the commands out
//! belongs to whoever embeds the sidebar.

use super::colors;
use super::input::{KeyAction, key_action};
use super::sidebar::render_sidebar;
use crate::compare::{CompareSidebar, ComparisonSelectionState, SidebarContext};
use crate::config::Config;
use crate::dispatch::{ChannelDispatcher, Command};
use crate::model::{BranchesState, Repository, RepositoryState};
use anyhow::Result;
use ratatui::{
    Frame, Terminal,
    backend::{Backend, CrosstermBackend},
    crossterm::{
        event::{self, Event, KeyCode, KeyEventKind},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::collections::VecDeque;
use std::io;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const LOG_CAPACITY: usize = 200;
const SIDEBAR_WIDTH: u16 = 44;
const KEY_HINTS: &str = " / filter  j/k commits  a/b ahead/behind  m merge  r reload  q quit";

/// The most recent commands, oldest first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLog {
    entries: VecDeque<String>,
}

impl CommandLog {
    /// Record a command, forgetting the oldest one once full
    pub fn push(&mut self, command: &Command) {
        if self.entries.len() == LOG_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(command.to_string());
    }

    /// Logged commands, oldest first
    #[must_use]
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Number of logged commands
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been logged
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A running sidebar together with the snapshot it reads and the receiving
/// end of its dispatcher
#[derive(Debug)]
pub struct Session {
    sidebar: CompareSidebar<ChannelDispatcher>,
    commands: Receiver<Command>,
    repo_state: RepositoryState,
    log: CommandLog,
}

impl Session {
    /// Mount the sidebar over `repo_state`
    #[must_use]
    pub fn new(repository: Repository, repo_state: RepositoryState, config: Config) -> Self {
        let (dispatcher, commands) = ChannelDispatcher::new();
        let context = SidebarContext {
            repository,
            dispatcher,
            config,
        };
        let sidebar = CompareSidebar::initialize(context, &repo_state);
        let mut session = Self {
            sidebar,
            commands,
            repo_state,
            log: CommandLog::default(),
        };
        session.drain_commands();
        session
    }

    /// Selection state of the sidebar
    #[must_use]
    pub const fn selection(&self) -> &ComparisonSelectionState {
        self.sidebar.state()
    }

    /// The snapshot the sidebar reads
    #[must_use]
    pub const fn repo_state(&self) -> &RepositoryState {
        &self.repo_state
    }

    /// Commands issued so far
    #[must_use]
    pub const fn log(&self) -> &CommandLog {
        &self.log
    }

    /// Handle one key press. Returns the action it mapped to.
    pub fn handle_key(&mut self, code: KeyCode, now: Instant) -> KeyAction {
        let action = key_action(code, self.sidebar.state(), &self.repo_state);
        if let KeyAction::Events(events) = &action {
            for event in events {
                self.sidebar.handle(event.clone(), &self.repo_state, now);
            }
            self.drain_commands();
        }
        action
    }

    /// Let deferred sidebar work run
    pub fn tick(&mut self, now: Instant) {
        if self.sidebar.tick(now) {
            self.drain_commands();
        }
    }

    /// Swap in a fresh branch snapshot
    pub fn replace_branches(&mut self, branches: BranchesState) {
        self.repo_state.branches = branches;
        self.sidebar.on_repository_state_changed(&self.repo_state);
    }

    /// Draw the sidebar, the command log and the key hints
    pub fn render(&self, frame: &mut Frame<'_>) {
        let [main, hints] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());
        let [sidebar_area, log_area] =
            Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
                .areas(main);

        render_sidebar(frame, sidebar_area, self.sidebar.state(), &self.repo_state);
        render_log(frame, log_area, &self.log);
        frame.render_widget(
            Paragraph::new(Span::styled(KEY_HINTS, Style::default().fg(colors::TEXT_DIM))),
            hints,
        );
    }

    /// Unmount the sidebar, dropping any deferred work, and return the log
    #[must_use]
    pub fn finish(self) -> CommandLog {
        let Self { sidebar, log, .. } = self;
        drop(sidebar.dispose());
        log
    }

    fn drain_commands(&mut self) {
        for command in self.commands.try_iter() {
            debug!(%command, "Sidebar issued command");
            self.log.push(&command);
        }
    }
}

fn render_log(frame: &mut Frame<'_>, area: Rect, log: &CommandLog) {
    let block = Block::default()
        .title(" Commands ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::BORDER));
    let visible = usize::from(block.inner(area).height);
    let lines: Vec<Line<'_>> = log
        .entries()
        .skip(log.len().saturating_sub(visible))
        .map(|entry| Line::from(Span::styled(entry, Style::default().fg(colors::TEXT_PRIMARY))))
        .collect();
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Run the session in the terminal until the user quits.
///
/// `reload` re-reads the branch snapshot when asked to.
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up, drawn or read
pub fn run(
    mut session: Session,
    tick_rate: Duration,
    mut reload: impl FnMut() -> Result<BranchesState>,
) -> Result<CommandLog> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = run_loop(&mut terminal, &mut session, &mut reload, || {
        next_key(tick_rate)
    });

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result.map(|()| session.finish())
}

/// Draw, wait for a key or a tick, repeat
pub(super) fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    session: &mut Session,
    reload: &mut impl FnMut() -> Result<BranchesState>,
    mut next_key: impl FnMut() -> Result<Option<KeyCode>>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| session.render(frame))?;

        if let Some(code) = next_key()? {
            match session.handle_key(code, Instant::now()) {
                KeyAction::Quit => break,
                KeyAction::Reload => match reload() {
                    Ok(branches) => session.replace_branches(branches),
                    Err(e) => warn!("Failed to reload branches: {e:#}"),
                },
                KeyAction::Events(_) => {}
            }
        }
        session.tick(Instant::now());
    }
    Ok(())
}

fn next_key(tick_rate: Duration) -> Result<Option<KeyCode>> {
    if !event::poll(tick_rate)? {
        return Ok(None);
    }
    Ok(match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(key.code),
        _ => None,
    })
}
