mod api;
mod app;
mod catalog;
mod config;
mod event;
mod logging;
mod session;
mod store;
mod ui;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use api::http::HttpApi;
use app::{App, AppScreen};
use catalog::ModuleCatalog;
use config::Config;
use event::{AppEvent, EventHandler};
use logging::LogConfig;
use session::navigation::{Navigator, Route};
use store::json_store::JsonStore;
use ui::components::catalog_menu::CatalogMenu;
use ui::components::editor_pane::EditorPane;
use ui::components::instructions_panel::InstructionsPanel;
use ui::components::level_picker::LevelPickerPanel;
use ui::components::level_progress::LevelProgress;
use ui::components::module_complete::{ModuleCompleteView, NotFoundView};
use ui::components::results_panel::ResultsPanel;
use ui::components::storyline::StorylineView;
use ui::components::success_notice::SuccessNotice;
use ui::layout::INDICATOR_LABEL;
use ui::theme::Theme;

#[derive(Parser)]
#[command(name = "sqlspell", version, about = "Learn SQL in the terminal, one spell at a time")]
struct Cli {
    #[arg(short, long, help = "Route to open, e.g. /module/1/2")]
    route: Option<String>,

    #[arg(long, help = "Base URL of the lesson API (overrides config and SQLSPELL_API_URL)")]
    api_url: Option<String>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, action = clap::ArgAction::Count, help = "More log output (-v debug, -vv trace)")]
    verbose: u8,

    #[arg(long, help = "Log file path")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = LogConfig::from_verbosity(cli.verbose).with_log_file(cli.log_file);
    if let Err(e) = logging::init_logging(&log_config) {
        eprintln!("warning: logging disabled: {e:#}");
    }

    let mut config = Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "config unreadable, using defaults");
        Config::default()
    });
    if let Some(url) = cli.api_url {
        config.api_url = url;
        config.normalize();
    }
    if let Some(theme_name) = cli.theme {
        config.theme = theme_name;
    }

    let theme = Theme::load(&config.theme).unwrap_or_else(|| {
        tracing::warn!(theme = %config.theme, "unknown theme, using default");
        Theme::default()
    });
    let theme: &'static Theme = Box::leak(Box::new(theme));

    let catalog = ModuleCatalog::bundled()?;
    let api = HttpApi::new(&config)?;
    let store = JsonStore::new()
        .inspect_err(|e| tracing::warn!(error = %e, "preferences unavailable"))
        .ok();
    tracing::info!(api_url = %config.api_url, modules = catalog.len(), "starting");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));
    let mut app = App::new(config, catalog, theme, store, Arc::new(api), events.sender());
    let route = Route::parse(cli.route.as_deref().unwrap_or("/"), &app.catalog);
    app.open(route);

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(error = ?err, "exited with error");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;
        let size = terminal.size()?;
        app.viewport = Rect::new(0, 0, size.width, size.height);

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
            AppEvent::Api(reply) => {
                app.handle_api_reply(reply);
            }
            AppEvent::Tick => app.tick(Instant::now()),
            AppEvent::Resize(width, height) => app.viewport = Rect::new(0, 0, width, height),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Catalog => handle_catalog_key(app, key),
        AppScreen::Storyline => handle_storyline_key(app, key),
        AppScreen::Level => handle_level_key(app, key),
        AppScreen::ModuleComplete => handle_complete_key(app, key),
        AppScreen::NotFound => app.go_to_catalog(),
    }
}

fn handle_catalog_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.catalog_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.catalog_next(),
        KeyCode::Enter => app.open_storyline(),
        KeyCode::Char(ch) if ch.is_ascii_digit() => {
            let id = ch.to_digit(10).unwrap_or(0);
            let position = app.catalog.modules().position(|m| m.id == id);
            if let Some(index) = position {
                app.catalog_selected = index;
                app.open_storyline();
            }
        }
        _ => {}
    }
}

fn handle_storyline_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Char(' ') => app.start_storyline_module(),
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_catalog(),
        _ => {}
    }
}

fn handle_complete_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.continue_to_next_module(),
        KeyCode::Char('r') => app.restart_module(),
        KeyCode::Char('c') | KeyCode::Char('q') | KeyCode::Esc => app.go_to_catalog(),
        _ => {}
    }
}

fn handle_level_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    if let Some(session) = app.session.as_mut() {
        session.dismiss_notice();
    }
    if app.picker.is_some() {
        handle_picker_key(app, key);
        return;
    }

    match key.code {
        KeyCode::Char('b') if ctrl => {
            app.toggle_level_picker();
            return;
        }
        KeyCode::F(5) => {
            app.execute();
            return;
        }
        KeyCode::Char('r') if ctrl => {
            app.execute();
            return;
        }
        KeyCode::Char('o') if ctrl => {
            app.reload_level();
            return;
        }
        KeyCode::PageUp => {
            app.go_back();
            return;
        }
        KeyCode::PageDown => {
            app.go_next();
            return;
        }
        KeyCode::Left if alt => {
            app.go_back();
            return;
        }
        KeyCode::Right if alt => {
            app.go_next();
            return;
        }
        KeyCode::Char(ch) if alt && ch.is_ascii_digit() => {
            if let Some(target) = ch.to_digit(10) {
                app.jump_to_level(target);
            }
            return;
        }
        KeyCode::Esc => {
            let fullscreen = app.session.as_ref().is_some_and(|s| s.is_fullscreen());
            if !fullscreen {
                app.go_to_catalog();
            } else if let Some(session) = app.session.as_mut() {
                session.exit_fullscreen();
            }
            return;
        }
        _ => {}
    }

    let Some(session) = app.session.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::F(2) => session.toggle_hint(),
        KeyCode::F(3) => session.toggle_instructions(),
        KeyCode::F(4) => {
            session.toggle_results_panel();
        }
        KeyCode::F(11) => session.toggle_fullscreen(),
        _ if session.is_executing() => {}
        _ => {
            session.editor.handle(key);
        }
    }
}

fn handle_picker_key(app: &mut App, key: KeyEvent) {
    let catalog = &app.catalog;
    let Some(picker) = app.picker.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => picker.prev_module(catalog),
        KeyCode::Down | KeyCode::Char('j') => picker.next_module(catalog),
        KeyCode::Left | KeyCode::Char('h') => picker.prev_level(),
        KeyCode::Right | KeyCode::Char('l') => picker.next_level(catalog),
        KeyCode::Char(ch) if ch.is_ascii_digit() => {
            if let Some(level) = ch.to_digit(10) {
                if picker.select_level(catalog, level) {
                    app.confirm_level_picker();
                }
            }
        }
        KeyCode::Enter => app.confirm_level_picker(),
        KeyCode::Esc => app.picker = None,
        KeyCode::Char('b') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.toggle_level_picker();
        }
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.screen != AppScreen::Level || app.picker.is_some() {
        return;
    }
    // Hit-test against what was on screen, then drop the success banner.
    let Some(layout) = app.level_layout(app.viewport, Instant::now()) else {
        return;
    };
    if let MouseEventKind::Down(_) = mouse.kind {
        if let Some(session) = app.session.as_mut() {
            session.dismiss_notice();
        }
    }
    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
        if let Some(level) = layout.level_at(app.current_level_count(), mouse.column, mouse.row) {
            app.jump_to_level(level);
            return;
        }
    }
    let Some(session) = app.session.as_mut() else {
        return;
    };

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let on_divider = layout.on_divider(mouse.column, mouse.row);
            session.divider_pressed(mouse.column, on_divider);
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if let Some(region) = layout.split_region {
                session.divider_dragged(mouse.column, region);
            }
        }
        MouseEventKind::Up(MouseButton::Left) => session.pointer_released(mouse.column),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Catalog => render_catalog(frame, app),
        AppScreen::Storyline => render_storyline(frame, app),
        AppScreen::Level => render_level(frame, app),
        AppScreen::ModuleComplete => render_module_complete(frame, app),
        AppScreen::NotFound => render_not_found(frame, app),
    }
}

fn render_catalog(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let menu_area = ui::layout::page_rect(60, 80, layout[0]);
    frame.render_widget(
        CatalogMenu::new(&app.catalog, app.catalog_selected, app.theme),
        menu_area,
    );

    let footer = Paragraph::new(Line::from(Span::styled(
        " [Up/Down] Select  [Enter] Open  [q] Quit ",
        Style::default().fg(colors.text_muted()),
    )));
    frame.render_widget(footer, layout[1]);
}

fn render_storyline(frame: &mut ratatui::Frame, app: &App) {
    let Some(module) = app.storyline_module.and_then(|id| app.catalog.get_module(id)) else {
        return;
    };
    let first = app.catalog.modules().next().map(|m| m.id) == Some(module.id);
    let introduction = first.then(|| app.catalog.curriculum());
    let area = ui::layout::page_rect(70, 80, frame.area());
    frame.render_widget(StorylineView::new(module, introduction, app.theme), area);
}

fn render_level(frame: &mut ratatui::Frame, app: &App) {
    let Some(session) = app.session.as_ref() else {
        return;
    };
    let area = frame.area();
    let colors = &app.theme.colors;
    let Some(layout) = app.level_layout(area, Instant::now()) else {
        return;
    };

    // Header: module, level title, level indicator.
    let module_title = app
        .catalog
        .get_module(session.key.module_id)
        .map(|m| format!(" Module {}: {}", m.id, m.title))
        .unwrap_or_else(|| format!(" Module {}", session.key.module_id));
    let level_title = match session.title() {
        Some(title) => format!(" Level {}: {title}", session.key.level_id),
        None => format!(" Level {}", session.key.level_id),
    };
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            module_title,
            Style::default()
                .fg(colors.header_fg())
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(level_title, Style::default().fg(colors.accent()))),
        Line::from(Span::styled(INDICATOR_LABEL, Style::default().fg(colors.text_muted()))),
    ])
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(colors.border())),
    )
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);
    frame.render_widget(
        LevelProgress::new(session.key.level_id, app.current_level_count(), app.theme),
        layout.indicator_area(),
    );

    if let Some(notice) = layout.notice {
        frame.render_widget(SuccessNotice { theme: app.theme }, notice);
    }
    if let Some(instructions) = layout.instructions {
        frame.render_widget(InstructionsPanel::new(session, app.theme), instructions);
    }
    frame.render_widget(
        EditorPane::new(&session.editor, session.is_executing(), app.theme),
        layout.editor,
    );
    if let Some(divider) = layout.divider {
        let color = if session.resizer.is_dragging() {
            colors.border_focused()
        } else {
            colors.border()
        };
        let lines: Vec<Line> = (0..divider.height).map(|_| Line::from("┃")).collect();
        frame.render_widget(Paragraph::new(lines).style(Style::default().fg(color)), divider);
    }
    if let Some(results) = layout.results {
        frame.render_widget(ResultsPanel::new(session, app.theme), results);
    }

    let footer: Vec<Line> = app
        .footer_lines(area.width)
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.text_muted()))))
        .collect();
    frame.render_widget(Paragraph::new(footer), layout.footer);

    if let Some(ref picker) = app.picker {
        let top = layout.header.bottom();
        let body = Rect::new(area.x, top, area.width, layout.footer.y.saturating_sub(top));
        frame.render_widget(
            LevelPickerPanel::new(&app.catalog, picker, session.key, app.theme),
            LevelPickerPanel::area(body),
        );
    }
}

fn render_module_complete(frame: &mut ratatui::Frame, app: &App) {
    let Some(module) = app.completed_module().and_then(|id| app.catalog.get_module(id)) else {
        return;
    };
    let next_module = Navigator::new(&app.catalog)
        .completion_targets(module.id)
        .next_module
        .and_then(|key| app.catalog.get_module(key.module_id));
    let area = ui::layout::page_rect(60, 50, frame.area());
    frame.render_widget(
        ModuleCompleteView {
            module,
            next_module,
            theme: app.theme,
        },
        area,
    );
}

fn render_not_found(frame: &mut ratatui::Frame, app: &App) {
    let path = match &app.route {
        Route::NotFound(path) => path.as_str(),
        _ => "",
    };
    let area = ui::layout::page_rect(50, 40, frame.area());
    frame.render_widget(
        NotFoundView {
            path,
            theme: app.theme,
        },
        area,
    );
}
