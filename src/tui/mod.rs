//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Layout
//!
//! ```text
//! ┌ title bar ───────────────────────────────────────┐
//! │ Select a Book: search, letter tabs, book list    │
//! ├─ Pages ─┬─ Original Book Image ─┬─ Page Content ─┤
//! │         │                       │                │
//! └─────────┴───────────────────────┴────────────────┘
//!   help line
//! ```
//!
//! ## Redraw Strategy
//!
//! While any tier or the image is loading the loop redraws every ~80ms to
//! animate the spinner. Otherwise it sleeps up to 500ms and only redraws on
//! events or fetch results.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, error, info};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;
use tui_scrollview::ScrollViewState;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::image::ImageStatus;
use crate::core::state::{App, Tier};
use crate::gateway::dispatch::spawn_effect;
use crate::gateway::{HttpGateway, ResourceGateway};
use crate::tui::components::{PageListState, ShelfState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Which pane receives navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Books,
    Pages,
    Content,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Books => Focus::Pages,
            Focus::Pages => Focus::Content,
            Focus::Content => Focus::Books,
        }
    }

    fn prev(self) -> Self {
        match self {
            Focus::Books => Focus::Content,
            Focus::Pages => Focus::Books,
            Focus::Content => Focus::Pages,
        }
    }

    fn tier(self) -> Tier {
        match self {
            Focus::Books => Tier::Books,
            Focus::Pages => Tier::Pages,
            Focus::Content => Tier::Content,
        }
    }
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub focus: Focus,
    pub shelf: ShelfState,
    pub page_list: PageListState,
    pub content_scroll: ScrollViewState,
    /// Content generation the scroll offset belongs to.
    scrolled_for: u64,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            focus: Focus::Books,
            shelf: ShelfState::new(),
            page_list: PageListState::new(),
            content_scroll: ScrollViewState::default(),
            scrolled_for: 0,
        }
    }

    /// Follows state changes made by the core: the page cursor tracks new
    /// page lists and a new content request scrolls back to the top.
    pub fn sync(&mut self, app: &App) {
        self.page_list.sync(app);
        if self.scrolled_for != app.requests.content {
            self.scrolled_for = app.requests.content;
            self.content_scroll.scroll_to_top();
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableBracketedPaste)?;
        info!("Terminal modes enabled (bracketed paste)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableBracketedPaste);
    }
}

/// Translates one terminal event into a core action, updating focus and
/// cursor state along the way.
pub fn route_event(app: &App, tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    if matches!(event, TuiEvent::ForceQuit) {
        return Some(Action::Quit);
    }

    // Fullscreen swallows everything except its close keys
    if app.image.fullscreen {
        return match event {
            TuiEvent::InputChar('f') | TuiEvent::Escape => Some(Action::ToggleFullscreen),
            _ => None,
        };
    }

    if tui.shelf.searching {
        return tui.shelf.handle_event(event, app);
    }

    match event {
        TuiEvent::InputChar('q') => return Some(Action::Quit),
        TuiEvent::FocusNext => {
            tui.focus = tui.focus.next();
            return None;
        }
        TuiEvent::FocusPrev => {
            tui.focus = tui.focus.prev();
            return None;
        }
        TuiEvent::InputChar('f') if app.image.path.is_some() => {
            return Some(Action::ToggleFullscreen);
        }
        TuiEvent::InputChar('r') => return Some(Action::Retry(tui.focus.tier())),
        _ => {}
    }

    match tui.focus {
        Focus::Books => {
            let action = tui.shelf.handle_event(event, app);
            if matches!(action, Some(Action::SelectBook(_))) {
                tui.focus = Focus::Pages;
            }
            action
        }
        Focus::Pages => tui.page_list.handle_event(event, app),
        Focus::Content => {
            match event {
                TuiEvent::CursorUp => tui.content_scroll.scroll_up(),
                TuiEvent::CursorDown => tui.content_scroll.scroll_down(),
                TuiEvent::ScrollPageUp => tui.content_scroll.scroll_page_up(),
                TuiEvent::ScrollPageDown => tui.content_scroll.scroll_page_down(),
                TuiEvent::Escape => tui.focus = Focus::Pages,
                _ => {}
            }
            None
        }
    }
}

fn is_animating(app: &App) -> bool {
    app.books.loading
        || app.pages.loading
        || app.content.loading
        || (app.image.path.is_some() && app.image.status == ImageStatus::Loading)
}

/// Runs effects on the gateway and keeps the abort handles of tasks still
/// in flight, so quitting can cancel them.
struct Fetcher {
    gateway: Arc<dyn ResourceGateway>,
    tx: mpsc::Sender<Action>,
    active: Vec<tokio::task::AbortHandle>,
}

impl Fetcher {
    fn new(gateway: Arc<dyn ResourceGateway>, tx: mpsc::Sender<Action>) -> Self {
        Self {
            gateway,
            tx,
            active: Vec::new(),
        }
    }

    /// Applies an action and spawns its effects. Returns true on quit.
    fn dispatch(&mut self, app: &mut App, action: Action) -> bool {
        self.active.retain(|handle| !handle.is_finished());
        let mut quit = false;
        for effect in update(app, action) {
            match effect {
                Effect::Quit => quit = true,
                effect => {
                    let handle = spawn_effect(effect, self.gateway.clone(), self.tx.clone());
                    self.active.push(handle);
                }
            }
        }
        quit
    }

    fn abort_all(&mut self) {
        if !self.active.is_empty() {
            info!("Aborting {} in-flight fetches", self.active.len());
        }
        for handle in self.active.drain(..) {
            handle.abort();
        }
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let gateway: Arc<dyn ResourceGateway> = match HttpGateway::from_config(&config) {
        Ok(gateway) => Arc::new(gateway),
        Err(e) => {
            error!("Cannot build gateway: {}", e);
            return Err(std::io::Error::other(e.to_string()));
        }
    };
    info!("Using {} gateway", gateway.name());

    let mut app = App::from_config(&config);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let mut fetcher = Fetcher::new(gateway, tx);
    fetcher.dispatch(&mut app, Action::Start);

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        tui.sync(&app);
        let animating = is_animating(&app);
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if matches!(event, TuiEvent::Resize) {
                continue;
            }
            if let Some(action) = route_event(&app, &mut tui, &event) {
                debug!("Event {:?} -> {:?}", event, action);
                should_quit |= fetcher.dispatch(&mut app, action);
            }
        }
        if should_quit {
            break;
        }

        // Fetch results from background tasks
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if fetcher.dispatch(&mut app, action) {
                should_quit = true;
            }
        }
        if should_quit {
            break;
        }
    }

    info!("Shutting down");
    fetcher.abort_all();
    ratatui::restore();
    Ok(())
}
