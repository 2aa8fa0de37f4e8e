//! emufront Launcher
//!
//! A TUI front-end for browsing game systems and collections. Drives the
//! collection system manager: favorites, last played, custom collections
//! and their edit mode.

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use emufront_catalog::{Catalog, EntryId, RecoveryStore, RomScanner};
use emufront_collections::{
    ChangeKind, CollectionKind, CollectionSystemManager, SystemRef, ThemeDirectory, ViewBinding,
    ViewTarget, declarations,
};
use emufront_config::FrontendConfig;

/// State shared between the app and the view binding it hands the manager
#[derive(Debug, Default)]
struct ViewState {
    /// System whose game list is open
    open: Option<SystemRef>,
    /// The open game list must be rebuilt
    dirty: bool,
    /// Popup message and when it expires
    notice: Option<(String, Instant)>,
}

/// View binding backed by the TUI state
struct LauncherView {
    state: Rc<RefCell<ViewState>>,
}

impl ViewBinding for LauncherView {
    fn on_file_changed(&mut self, target: ViewTarget, change: ChangeKind) {
        tracing::trace!("{:?} {:?}", change, target);
        self.state.borrow_mut().dirty = true;
    }

    fn remove_game_list_view(&mut self, system: &SystemRef) {
        let mut state = self.state.borrow_mut();
        if state.open.as_ref() == Some(system) {
            state.open = None;
        }
    }

    fn has_game_list_view(&self, system: &SystemRef) -> bool {
        self.state.borrow().open.as_ref() == Some(system)
    }

    fn remove_entry(&mut self, _system: &SystemRef, _key: &str) {
        self.state.borrow_mut().dirty = true;
    }

    fn repopulate(&mut self, _system: &SystemRef) {
        self.state.borrow_mut().dirty = true;
    }

    fn notify(&mut self, message: &str, duration: Duration) {
        self.state.borrow_mut().notice = Some((message.to_string(), Instant::now() + duration));
    }
}

/// A line of the games view
#[derive(Debug, Clone)]
enum Row {
    Game { id: EntryId, name: String, favorite: bool },
    /// A member collection of the bundle
    Collection(String),
}

/// A line of the collections settings view
#[derive(Debug, Clone)]
struct CollectionRow {
    name: String,
    label: String,
    custom: bool,
    enabled: bool,
}

/// Application state
struct App {
    config: FrontendConfig,
    catalog: Catalog,
    manager: CollectionSystemManager,
    view_state: Rc<RefCell<ViewState>>,

    /// Current view
    view: View,

    systems_state: ListState,
    games_state: ListState,
    collections_state: ListState,

    /// Displayed systems with their labels
    systems: Vec<(SystemRef, String)>,

    /// Current games list
    rows: Vec<Row>,

    collection_rows: Vec<CollectionRow>,

    /// System whose games are listed
    selected_system: Option<SystemRef>,

    /// Status message
    status: String,

    /// Should quit
    should_quit: bool,
}

/// Current view/screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Systems,
    Games,
    GameInfo,
    Collections,
}

impl App {
    /// `config_path` is layered under `EMUFRONT__*` overrides; without it
    /// the default locations are used
    fn new(config_path: Option<PathBuf>) -> Result<Self> {
        let config = match config_path {
            Some(path) => FrontendConfig::load_layered(&path)?,
            None => FrontendConfig::load_default()?,
        };

        let mut catalog = scan_catalog(&config);
        let recovery = match RecoveryStore::open(&config.paths.recovery_db) {
            Ok(store) => {
                match store.restore(&mut catalog) {
                    Ok(restored) => info!("Restored metadata for {} games", restored),
                    Err(e) => warn!("Gamelist recovery failed: {}", e),
                }
                Some(store)
            }
            Err(e) => {
                warn!("Cannot open recovery store: {}", e);
                None
            }
        };

        let view_state = Rc::new(RefCell::new(ViewState::default()));
        let view = LauncherView {
            state: view_state.clone(),
        };
        let theme = ThemeDirectory::from_config(&config.paths);

        let mut manager =
            CollectionSystemManager::from_config(&config, Box::new(view), Box::new(theme));
        if let Some(store) = recovery {
            manager = manager.with_recovery(store);
        }
        manager.load_collection_systems(&catalog);

        let mut app = Self {
            config,
            catalog,
            manager,
            view_state,
            view: View::Systems,
            systems_state: ListState::default(),
            games_state: ListState::default(),
            collections_state: ListState::default(),
            systems: Vec::new(),
            rows: Vec::new(),
            collection_rows: Vec::new(),
            selected_system: None,
            status: "Ready".to_string(),
            should_quit: false,
        };
        app.reload_systems();

        Ok(app)
    }

    /// Handle input
    fn handle_input(&mut self, key: KeyCode) -> Result<()> {
        match self.view {
            View::Systems => self.handle_systems_input(key),
            View::Games => self.handle_games_input(key),
            View::GameInfo => self.handle_game_info_input(key),
            View::Collections => self.handle_collections_input(key)?,
        }
        Ok(())
    }

    fn handle_systems_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up | KeyCode::Char('w') => select_prev(&mut self.systems_state, self.systems.len()),
            KeyCode::Down | KeyCode::Char('s') => select_next(&mut self.systems_state, self.systems.len()),
            KeyCode::Enter | KeyCode::Char('a') => self.enter_system(),
            KeyCode::Char('r') => self.rescan_roms(),
            KeyCode::Tab => self.open_collections_settings(),
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_games_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up | KeyCode::Char('w') => select_prev(&mut self.games_state, self.rows.len()),
            KeyCode::Down | KeyCode::Char('s') => select_next(&mut self.games_state, self.rows.len()),
            KeyCode::Enter | KeyCode::Char('a') => self.activate_row(),
            KeyCode::Char('x') => {
                if matches!(self.selected_row(), Some(Row::Game { .. })) {
                    self.view = View::GameInfo;
                }
            }
            KeyCode::Char('y') => self.toggle_selected_game(),
            KeyCode::Char('e') => self.toggle_edit_mode(),
            KeyCode::Esc | KeyCode::Char('b') | KeyCode::Backspace => self.leave_system(),
            _ => {}
        }
    }

    fn handle_game_info_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter | KeyCode::Char('a') => self.activate_row(),
            KeyCode::Esc | KeyCode::Char('b') | KeyCode::Backspace => self.view = View::Games,
            _ => {}
        }
    }

    fn handle_collections_input(&mut self, key: KeyCode) -> Result<()> {
        let len = self.collection_rows.len();
        match key {
            KeyCode::Up | KeyCode::Char('w') => select_prev(&mut self.collections_state, len),
            KeyCode::Down | KeyCode::Char('s') => select_next(&mut self.collections_state, len),
            KeyCode::Enter | KeyCode::Char('a') => {
                if let Some(row) = self
                    .collections_state
                    .selected()
                    .and_then(|i| self.collection_rows.get_mut(i))
                {
                    row.enabled = !row.enabled;
                }
            }
            KeyCode::Char('n') => self.create_collection(),
            KeyCode::Char('d') => self.delete_selected_collection(),
            KeyCode::Esc | KeyCode::Tab | KeyCode::Char('b') => self.apply_collections_settings()?,
            _ => {}
        }
        Ok(())
    }

    fn reload_systems(&mut self) {
        self.systems = self
            .manager
            .displayed_systems()
            .iter()
            .map(|system| (system.clone(), self.system_label(system)))
            .collect();

        let selected = self.systems_state.selected().unwrap_or(0);
        self.systems_state.select(if self.systems.is_empty() {
            None
        } else {
            Some(selected.min(self.systems.len() - 1))
        });
    }

    fn system_label(&self, system: &SystemRef) -> String {
        match system {
            SystemRef::Real(id) => self
                .catalog
                .system(*id)
                .map(|s| {
                    let games = self.catalog.games_recursive(*id).len();
                    format!("{:<24} ({} games)", s.metadata.full_name, games)
                })
                .unwrap_or_default(),
            SystemRef::Bundle => {
                let bundle = self.manager.bundle();
                format!("{:<24} ({} collections)", bundle.system.metadata.full_name, bundle.members().len())
            }
            other => self
                .manager
                .collection(other)
                .map(|c| format!("{:<24} ({} games)", c.metadata.full_name, c.displayed_game_count()))
                .unwrap_or_default(),
        }
    }

    fn enter_system(&mut self) {
        let Some((system, _)) = self
            .systems_state
            .selected()
            .and_then(|i| self.systems.get(i))
            .cloned()
        else {
            return;
        };
        self.open_system(system);
    }

    fn open_system(&mut self, system: SystemRef) {
        self.selected_system = Some(system.clone());
        self.view_state.borrow_mut().open = Some(system);
        self.reload_rows();
        self.games_state.select(if self.rows.is_empty() { None } else { Some(0) });
        self.view = View::Games;
        self.status = format!("{} entries", self.rows.len());
    }

    fn leave_system(&mut self) {
        self.view_state.borrow_mut().open = None;
        self.selected_system = None;
        self.rows.clear();
        self.games_state.select(None);
        self.view = View::Systems;
        self.reload_systems();
    }

    fn reload_rows(&mut self) {
        let Some(system) = self.selected_system.clone() else {
            return;
        };

        self.rows = match &system {
            SystemRef::Real(id) => self
                .catalog
                .games_recursive(*id)
                .into_iter()
                .filter_map(|game| {
                    let entry = self.catalog.game(game)?;
                    (!entry.metadata.hidden).then(|| Row::Game {
                        id: game,
                        name: entry.name(),
                        favorite: entry.metadata.favorite,
                    })
                })
                .collect(),
            SystemRef::Bundle => self
                .manager
                .bundle()
                .members()
                .iter()
                .cloned()
                .map(Row::Collection)
                .collect(),
            other => self
                .manager
                .collection(other)
                .map(|c| {
                    c.root
                        .children()
                        .iter()
                        .filter(|e| !e.metadata.hidden)
                        .map(|e| Row::Game {
                            id: e.game,
                            name: e.name.clone(),
                            favorite: e.metadata.favorite,
                        })
                        .collect()
                })
                .unwrap_or_default(),
        };

        let len = self.rows.len();
        if let Some(i) = self.games_state.selected()
            && i >= len
        {
            self.games_state.select(len.checked_sub(1));
        }
        self.view_state.borrow_mut().dirty = false;
    }

    fn selected_row(&self) -> Option<&Row> {
        self.games_state.selected().and_then(|i| self.rows.get(i))
    }

    fn selected_game(&self) -> Option<EntryId> {
        match self.selected_row()? {
            Row::Game { id, .. } => Some(*id),
            Row::Collection(_) => None,
        }
    }

    /// Open a bundled collection, or mark a game as played
    fn activate_row(&mut self) {
        match self.selected_row().cloned() {
            Some(Row::Collection(name)) => {
                self.manager
                    .populate_collection(&self.catalog, &SystemRef::Custom(name.clone()));
                self.open_system(SystemRef::Custom(name));
            }
            Some(Row::Game { id, name, .. }) => self.play_game(id, &name),
            None => {}
        }
    }

    /// Record a finished play session
    fn play_game(&mut self, game: EntryId, name: &str) {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or_default();

        match self.catalog.record_play(game, now) {
            Ok(()) => {
                info!("Played {}", name);
                self.manager.save_to_recovery(&self.catalog, game);
                self.manager.refresh_collection_systems(&self.catalog, game);
                self.status = format!("Played {}", name);
            }
            Err(e) => {
                error!("Failed to record play of {}: {}", name, e);
                self.status = format!("Error: {}", e);
            }
        }
    }

    fn toggle_selected_game(&mut self) {
        let Some(game) = self.selected_game() else {
            return;
        };
        if !self.manager.toggle_game_in_collection(&mut self.catalog, game) {
            self.status = "Cannot toggle this entry".to_string();
        }
    }

    /// Enter edit mode for the open custom collection, or leave it
    fn toggle_edit_mode(&mut self) {
        if self.manager.is_editing() {
            self.manager.exit_edit_mode();
            return;
        }
        match &self.selected_system {
            Some(SystemRef::Custom(name)) => {
                let name = name.clone();
                if !self.manager.set_edit_mode(&self.catalog, &name) {
                    self.status = format!("'{}' cannot be edited", name);
                }
            }
            _ => self.status = "Open a custom collection to edit it".to_string(),
        }
    }

    fn open_collections_settings(&mut self) {
        let settings = self.manager.settings();
        let auto = settings.auto_enabled();
        let custom = settings.custom_enabled();

        self.collection_rows = declarations()
            .iter()
            .filter(|d| !d.is_custom)
            .map(|d| CollectionRow {
                name: d.short_name.clone(),
                label: d.display_name.clone(),
                custom: false,
                enabled: auto.contains(&d.short_name),
            })
            .chain(self.manager.custom_collections().values().map(|r| CollectionRow {
                name: r.name().to_string(),
                label: if r.is_filter() {
                    format!("{} (filter)", r.name())
                } else {
                    r.name().to_string()
                },
                custom: true,
                enabled: custom.iter().any(|n| n == r.name()),
            }))
            .collect();

        self.collections_state.select(if self.collection_rows.is_empty() { None } else { Some(0) });
        self.view = View::Collections;
    }

    fn create_collection(&mut self) {
        let name = self
            .manager
            .valid_new_collection_name(&self.catalog, "New Collection");
        self.manager
            .add_new_custom_collection(&name, CollectionKind::CustomFlat);
        self.collection_rows.push(CollectionRow {
            name: name.clone(),
            label: name.clone(),
            custom: true,
            enabled: true,
        });
        self.collections_state.select(Some(self.collection_rows.len() - 1));
        self.status = format!("Created '{}'", name);
    }

    fn delete_selected_collection(&mut self) {
        let Some(i) = self.collections_state.selected() else {
            return;
        };
        let Some(row) = self.collection_rows.get(i).filter(|r| r.custom).cloned() else {
            self.status = "Only custom collections can be deleted".to_string();
            return;
        };
        if self.manager.delete_custom_collection(&row.name) {
            self.collection_rows.remove(i);
            select_prev(&mut self.collections_state, self.collection_rows.len());
            self.status = format!("Deleted '{}'", row.name);
        }
    }

    /// Store the enabled lists, rebuild the system list and save the config
    fn apply_collections_settings(&mut self) -> Result<()> {
        let enabled = |custom: bool| -> Vec<String> {
            self.collection_rows
                .iter()
                .filter(|r| r.custom == custom && r.enabled)
                .map(|r| r.name.clone())
                .collect()
        };
        let auto = enabled(false);
        let custom = enabled(true);

        let settings = self.manager.settings_mut();
        let changed = settings.set_auto_enabled(&auto) | settings.set_custom_enabled(&custom);

        if changed {
            self.manager.load_enabled_list_from_settings();
            self.manager.update_systems_list(&self.catalog);
            self.config.collections = self.manager.settings().clone();
            self.config.save_default()?;
            self.status = "Collections updated".to_string();
        }

        self.reload_systems();
        self.view = View::Systems;
        Ok(())
    }

    fn rescan_roms(&mut self) {
        self.status = "Scanning ROMs...".to_string();
        self.manager.save_all();
        self.catalog = scan_catalog(&self.config);
        self.manager.load_collection_systems(&self.catalog);
        self.reload_systems();
        self.status = format!("Found {} games", self.catalog.game_count());
    }

    /// Per-frame housekeeping: expire notices and rebuild a dirty list
    fn tick(&mut self) {
        let (dirty, open) = {
            let mut state = self.view_state.borrow_mut();
            if state.notice.as_ref().is_some_and(|(_, until)| Instant::now() >= *until) {
                state.notice = None;
            }
            (state.dirty, state.open.clone())
        };

        if self.view == View::Games || self.view == View::GameInfo {
            if open.is_none() {
                self.leave_system();
            } else if dirty {
                self.reload_rows();
            }
        }
    }

    fn notice(&self) -> Option<String> {
        self.view_state.borrow().notice.as_ref().map(|(m, _)| m.clone())
    }
}

fn scan_catalog(config: &FrontendConfig) -> Catalog {
    match RomScanner::new().scan_all(&config.paths.roms_dir) {
        Ok((catalog, result)) => {
            for e in &result.errors {
                warn!("Scan error: {}", e);
            }
            catalog
        }
        Err(e) => {
            error!("Failed to scan {}: {}", config.paths.roms_dir.display(), e);
            Catalog::new()
        }
    }
}

fn select_prev(state: &mut ListState, len: usize) {
    if len == 0 {
        state.select(None);
        return;
    }
    let i = match state.selected() {
        Some(0) | None => len - 1,
        Some(i) => (i - 1).min(len - 1),
    };
    state.select(Some(i));
}

fn select_next(state: &mut ListState, len: usize) {
    if len == 0 {
        state.select(None);
        return;
    }
    let i = match state.selected() {
        Some(i) if i + 1 < len => i + 1,
        _ => 0,
    };
    state.select(Some(i));
}

/// Draw the UI
fn draw_ui(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
            Constraint::Length(3), // Footer
        ])
        .split(frame.size());

    draw_header(frame, chunks[0], app);

    match app.view {
        View::Systems => draw_systems_view(frame, chunks[1], app),
        View::Games => draw_games_view(frame, chunks[1], app),
        View::GameInfo => draw_game_info_view(frame, chunks[1], app),
        View::Collections => draw_collections_view(frame, chunks[1], app),
    }

    draw_footer(frame, chunks[2], app);
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let title = match app.view {
        View::Systems => "emufront - Select System".to_string(),
        View::Games => {
            let name = app
                .selected_system
                .as_ref()
                .map(|s| app.system_label(s))
                .unwrap_or_default();
            match app.manager.editing_collection() {
                Some(editing) => format!("emufront - {}  [editing {}]", name.trim_end(), editing),
                None => format!("emufront - {}", name.trim_end()),
            }
        }
        View::GameInfo => "emufront - Game Info".to_string(),
        View::Collections => "emufront - Collections".to_string(),
    };

    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(header, area);
}

fn highlight() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

fn draw_systems_view(frame: &mut Frame, area: Rect, app: &mut App) {
    let items: Vec<ListItem> = app
        .systems
        .iter()
        .map(|(_, label)| ListItem::new(label.as_str()))
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Systems"))
        .highlight_style(highlight())
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.systems_state);
}

fn draw_games_view(frame: &mut Frame, area: Rect, app: &mut App) {
    let items: Vec<ListItem> = app
        .rows
        .iter()
        .map(|row| match row {
            Row::Game { name, favorite, .. } => {
                let prefix = if *favorite { "★ " } else { "  " };
                ListItem::new(format!("{}{}", prefix, name))
            }
            Row::Collection(name) => ListItem::new(format!("▸ {}", name)),
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Games"))
        .highlight_style(highlight())
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.games_state);
}

fn draw_game_info_view(frame: &mut Frame, area: Rect, app: &App) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let content = match app.selected_game().and_then(|id| app.catalog.game(id)) {
        Some(game) => {
            let md = &game.metadata;
            let system = app
                .catalog
                .system(game.system)
                .map(|s| s.metadata.full_name.clone())
                .unwrap_or_default();

            let mut lines = vec![
                Line::from(vec![Span::styled("Name: ", bold), Span::raw(game.name())]),
                Line::from(vec![Span::styled("System: ", bold), Span::raw(system)]),
                Line::from(vec![Span::styled("Path: ", bold), Span::raw(game.full_path())]),
                Line::from(vec![
                    Span::styled("Played: ", bold),
                    Span::raw(format!("{} times", md.play_count)),
                ]),
            ];

            if let Some(desc) = &md.description {
                lines.push(Line::from(""));
                lines.push(Line::from(vec![Span::styled("Description: ", bold)]));
                lines.push(Line::from(desc.as_str()));
            }

            if let Some(dev) = &md.developer {
                lines.push(Line::from(vec![Span::styled("Developer: ", bold), Span::raw(dev)]));
            }

            if let Some(rating) = md.rating {
                lines.push(Line::from(vec![
                    Span::styled("Rating: ", bold),
                    Span::raw(format!("{:.1}/5", rating * 5.0)),
                ]));
            }

            Text::from(lines)
        }
        None => Text::raw("No game selected"),
    };

    let paragraph = Paragraph::new(content)
        .block(Block::default().borders(Borders::ALL).title("Game Info"))
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn draw_collections_view(frame: &mut Frame, area: Rect, app: &mut App) {
    let items: Vec<ListItem> = app
        .collection_rows
        .iter()
        .map(|row| {
            let mark = if row.enabled { "[x]" } else { "[ ]" };
            let kind = if row.custom { "custom" } else { "auto" };
            ListItem::new(format!("{} {:<28} {}", mark, row.label, kind))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Collections"))
        .highlight_style(highlight())
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.collections_state);
}

fn draw_footer(frame: &mut Frame, area: Rect, app: &App) {
    let help_text = match app.view {
        View::Systems => "[↑↓] Navigate  [Enter] Select  [R] Rescan  [Tab] Collections  [Q] Quit",
        View::Games => "[↑↓] Navigate  [Enter] Play  [Y] Toggle  [E] Edit  [X] Info  [B] Back",
        View::GameInfo => "[Enter] Play  [B] Back",
        View::Collections => "[Enter] Enable  [N] New  [D] Delete  [Tab] Apply",
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));

    let status_text = app.notice().unwrap_or_else(|| app.status.clone());
    let status = Paragraph::new(status_text)
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(help, chunks[0]);
    frame.render_widget(status, chunks[1]);
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    info!("emufront Launcher starting...");

    let mut app = App::new(std::env::args_os().nth(1).map(PathBuf::from))?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    let result = loop {
        app.tick();
        if let Err(e) = terminal.draw(|f| draw_ui(f, &mut app)) {
            break Err(e.into());
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        match event::poll(timeout) {
            Ok(true) => {
                if let Ok(Event::Key(key)) = event::read()
                    && key.kind == KeyEventKind::Press
                    && let Err(e) = app.handle_input(key.code)
                {
                    error!("{}", e);
                    app.status = format!("Error: {}", e);
                }
            }
            Ok(false) => {}
            Err(e) => break Err(e.into()),
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            break Ok(());
        }
    };

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    drop(app);
    info!("emufront Launcher exiting");
    result
}
