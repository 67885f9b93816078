use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::time::Instant;

use ratatui::layout::Rect;

use crate::api::worker::{ApiReply, ApiWorker, ViewId};
use crate::api::{LessonApi, LevelKey};
use crate::catalog::{Module, ModuleCatalog};
use crate::config::Config;
use crate::event::AppEvent;
use crate::session::editor::EditorSession;
use crate::session::level_picker::LevelPicker;
use crate::session::navigation::{Navigator, Route};
use crate::session::resize::SplitRatio;
use crate::store::json_store::JsonStore;
use crate::store::schema::PreferencesData;
use crate::ui::layout::{LevelLayout, wrap_key_hints};
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Catalog,
    Storyline,
    Level,
    ModuleComplete,
    NotFound,
}

pub struct App {
    pub screen: AppScreen,
    pub route: Route,
    pub catalog: ModuleCatalog,
    pub config: Config,
    pub theme: &'static Theme,
    pub store: Option<JsonStore>,
    pub prefs: PreferencesData,
    /// Present only while a level view is open.
    pub session: Option<EditorSession>,
    /// Course-wide level sidebar over the level view.
    pub picker: Option<LevelPicker>,
    pub catalog_selected: usize,
    pub storyline_module: Option<u32>,
    /// Last known terminal size, for mouse hit-testing.
    pub viewport: Rect,
    pub should_quit: bool,
    worker: ApiWorker,
    view_id: ViewId,
}

impl App {
    pub fn new(
        config: Config,
        catalog: ModuleCatalog,
        theme: &'static Theme,
        store: Option<JsonStore>,
        api: Arc<dyn LessonApi>,
        tx: Sender<AppEvent>,
    ) -> Self {
        let prefs = store
            .as_ref()
            .map(JsonStore::load_preferences)
            .unwrap_or_default();

        Self {
            screen: AppScreen::Catalog,
            route: Route::Catalog,
            catalog,
            config,
            theme,
            store,
            prefs,
            session: None,
            picker: None,
            catalog_selected: 0,
            storyline_module: None,
            viewport: Rect::default(),
            should_quit: false,
            worker: ApiWorker::new(api, tx),
            view_id: 0,
        }
    }

    /// Show `route`, tearing down whatever view was open.
    pub fn open(&mut self, route: Route) {
        tracing::info!(path = %route.path(), "opening route");
        self.close_session();
        self.picker = None;
        match &route {
            Route::Catalog => self.screen = AppScreen::Catalog,
            Route::Level(key) => self.open_level(*key, false),
            Route::ModuleComplete(_) => self.screen = AppScreen::ModuleComplete,
            Route::NotFound(path) => {
                tracing::warn!(%path, "no such route");
                self.screen = AppScreen::NotFound;
            }
        }
        self.route = route;
    }

    /// Leave the current view for `route`, remembering whether the editor
    /// was in fullscreen when the target is another level.
    pub fn navigate(&mut self, route: Route) {
        let target = match &route {
            Route::Level(key) => Some(*key),
            _ => None,
        };
        let fullscreen = self.session.as_ref().is_some_and(EditorSession::is_fullscreen);
        self.remember_fullscreen(if fullscreen { target } else { None });
        self.open(route);
    }

    pub fn current_view(&self) -> ViewId {
        self.view_id
    }

    fn open_level(&mut self, key: LevelKey, fullscreen: bool) {
        self.view_id += 1;
        let mut session = EditorSession::new(key, SplitRatio::new(self.config.default_editor_percent));
        let restore = self.config.restore_fullscreen && self.prefs.restores_fullscreen_for(key);
        if fullscreen || restore {
            session.enter_fullscreen();
        }
        self.session = Some(session);
        self.screen = AppScreen::Level;
        self.worker.fetch_level(self.view_id, key);
    }

    fn close_session(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.resizer.cancel();
        }
    }

    fn remember_fullscreen(&mut self, level: Option<LevelKey>) {
        if self.prefs.fullscreen_level == level {
            return;
        }
        self.prefs.fullscreen_level = level;
        if let Some(ref store) = self.store {
            if let Err(e) = store.save_preferences(&self.prefs) {
                tracing::warn!(error = %e, "failed to save preferences");
            }
        }
    }

    /// Refetch the current level into a fresh session. Edits are lost.
    pub fn reload_level(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        tracing::info!(module = session.key.module_id, level = session.key.level_id, "reloading level");
        self.open_level(session.key, session.is_fullscreen());
    }

    /// Fold a backend reply into the open view. Replies for views that are
    /// gone are dropped; returns whether the reply was applied.
    pub fn handle_api_reply(&mut self, reply: ApiReply) -> bool {
        let current = self.view_id;
        let Some(session) = self.session.as_mut().filter(|_| reply.view() == current) else {
            tracing::debug!(view = reply.view(), current, "dropping reply for a closed view");
            return false;
        };
        match reply {
            ApiReply::Level { result, .. } => {
                session.apply_level(result);
                true
            }
            ApiReply::Execution { ticket, result, .. } => {
                session.apply_execution(ticket, result, Instant::now())
            }
        }
    }

    /// Send the editor's query. Ignored while a run is still in flight.
    pub fn execute(&mut self) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let Some((ticket, sql)) = session.begin_execute() else {
            tracing::debug!("execute ignored, a query is already running");
            return false;
        };
        self.worker.execute(self.view_id, ticket, session.key, sql);
        true
    }

    pub fn tick(&mut self, now: Instant) {
        if let Some(ref mut session) = self.session {
            session.tick(now);
        }
    }

    // --- Level navigation ---

    pub fn go_back(&mut self) {
        let Some(key) = self.session.as_ref().map(|s| s.key) else {
            return;
        };
        if let Some(route) = Navigator::new(&self.catalog).back(key) {
            self.navigate(route);
        }
    }

    pub fn go_next(&mut self) {
        let Some((key, passed)) = self.session.as_ref().map(|s| (s.key, s.passed)) else {
            return;
        };
        match Navigator::new(&self.catalog).next(key, passed) {
            Some(route) => self.navigate(route),
            None => tracing::debug!(
                module = key.module_id,
                level = key.level_id,
                "last level not passed yet"
            ),
        }
    }

    pub fn jump_to_level(&mut self, target: u32) {
        let Some(key) = self.session.as_ref().map(|s| s.key) else {
            return;
        };
        if let Some(route) = Navigator::new(&self.catalog).jump_to_level(key, target) {
            self.navigate(route);
        }
    }

    pub fn current_level_count(&self) -> u32 {
        self.session
            .as_ref()
            .map(|s| self.catalog.level_count(s.key.module_id))
            .unwrap_or(0)
    }

    pub fn can_go_next(&self) -> bool {
        self.session.as_ref().is_some_and(|s| {
            Navigator::new(&self.catalog).next(s.key, s.passed).is_some()
        })
    }

    // --- Level picker ---

    pub fn toggle_level_picker(&mut self) {
        if self.picker.take().is_some() {
            return;
        }
        if let Some(key) = self.session.as_ref().map(|s| s.key) {
            self.picker = Some(LevelPicker::new(&self.catalog, key));
        }
    }

    /// Open the level highlighted in the picker, in any module.
    pub fn confirm_level_picker(&mut self) {
        let Some(key) = self.picker.take().and_then(|p| p.selected(&self.catalog)) else {
            return;
        };
        if self.session.as_ref().is_some_and(|s| s.key == key) {
            return;
        }
        self.navigate(Route::Level(key));
    }

    // --- Catalog and storyline ---

    pub fn catalog_next(&mut self) {
        if !self.catalog.is_empty() {
            self.catalog_selected = (self.catalog_selected + 1) % self.catalog.len();
        }
    }

    pub fn catalog_prev(&mut self) {
        if self.catalog.is_empty() {
            return;
        }
        if self.catalog_selected > 0 {
            self.catalog_selected -= 1;
        } else {
            self.catalog_selected = self.catalog.len() - 1;
        }
    }

    pub fn selected_module(&self) -> Option<&Module> {
        self.catalog.modules().nth(self.catalog_selected)
    }

    /// Show the story for the highlighted module.
    pub fn open_storyline(&mut self) {
        let Some(id) = self.selected_module().map(|m| m.id) else {
            return;
        };
        self.storyline_module = Some(id);
        self.screen = AppScreen::Storyline;
    }

    pub fn start_storyline_module(&mut self) {
        if let Some(module_id) = self.storyline_module.take() {
            self.navigate(Route::Level(LevelKey::new(module_id, 1)));
        }
    }

    pub fn go_to_catalog(&mut self) {
        self.storyline_module = None;
        self.navigate(Route::Catalog);
    }

    // --- Module complete ---

    pub fn completed_module(&self) -> Option<u32> {
        match self.route {
            Route::ModuleComplete(module_id) => Some(module_id),
            _ => None,
        }
    }

    pub fn continue_to_next_module(&mut self) {
        let Some(module_id) = self.completed_module() else {
            return;
        };
        if let Some(next) = Navigator::new(&self.catalog).completion_targets(module_id).next_module {
            self.navigate(Route::Level(next));
        }
    }

    pub fn restart_module(&mut self) {
        let Some(module_id) = self.completed_module() else {
            return;
        };
        let restart = Navigator::new(&self.catalog).completion_targets(module_id).restart;
        self.navigate(Route::Level(restart));
    }

    // --- Level view geometry ---

    pub fn footer_lines(&self, width: u16) -> Vec<String> {
        let Some(session) = self.session.as_ref() else {
            return Vec::new();
        };
        let next_hint = if self.can_go_next() {
            "[PgDn] Next"
        } else {
            ""
        };
        let hints: Vec<&str> = if session.is_fullscreen() {
            vec![
                "[F5] Run",
                "[F3] Instructions",
                "[F4] Results",
                "[F11/Esc] Exit fullscreen",
                "[PgUp] Back",
                next_hint,
                "[Ctrl+B] All levels",
            ]
        } else {
            vec![
                "[F5] Run",
                "[F2] Hint",
                "[F3] Instructions",
                "[F11] Fullscreen",
                "[PgUp] Back",
                next_hint,
                "[Alt+1-9] Jump",
                "[Ctrl+B] All levels",
                "[Ctrl+O] Reload",
                "[Esc] Modules",
            ]
        };
        wrap_key_hints(hints, usize::from(width))
    }

    /// Regions of the level view at `area`, as the renderer draws them.
    pub fn level_layout(&self, area: Rect, now: Instant) -> Option<LevelLayout> {
        let session = self.session.as_ref()?;
        let footer_height = u16::try_from(self.footer_lines(area.width).len()).unwrap_or(u16::MAX);
        Some(LevelLayout::new(area, session, session.notice_visible(now), footer_height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, ExecutionResult, LevelData};
    use std::sync::mpsc;

    struct NullApi;

    impl LessonApi for NullApi {
        fn fetch_level(&self, _key: LevelKey) -> Result<LevelData, ApiError> {
            Err(ApiError::Disabled)
        }

        fn execute(&self, _key: LevelKey, _sql: &str) -> Result<ExecutionResult, ApiError> {
            Err(ApiError::Disabled)
        }
    }

    fn app() -> (App, mpsc::Receiver<AppEvent>) {
        let (tx, rx) = mpsc::channel();
        let theme: &'static Theme = Box::leak(Box::new(Theme::default()));
        let app = App::new(
            Config::default(),
            ModuleCatalog::bundled().unwrap(),
            theme,
            None,
            Arc::new(NullApi),
            tx,
        );
        (app, rx)
    }

    #[test]
    fn each_level_view_gets_a_new_id() {
        let (mut app, _rx) = app();
        app.open(Route::Level(LevelKey::new(1, 1)));
        let first = app.current_view();
        app.go_next();
        assert!(app.current_view() > first);
        assert_eq!(app.session.as_ref().unwrap().key, LevelKey::new(1, 2));
    }

    #[test]
    fn back_from_first_level_stays_put() {
        let (mut app, _rx) = app();
        app.open(Route::Level(LevelKey::new(2, 1)));
        let view = app.current_view();
        app.go_back();
        assert_eq!(app.current_view(), view);
        assert_eq!(app.route, Route::Level(LevelKey::new(2, 1)));
    }

    #[test]
    fn catalog_selection_wraps() {
        let (mut app, _rx) = app();
        app.catalog_prev();
        assert_eq!(app.catalog_selected, app.catalog.len() - 1);
        app.catalog_next();
        assert_eq!(app.catalog_selected, 0);
    }

    #[test]
    fn storyline_leads_to_first_level() {
        let (mut app, _rx) = app();
        app.catalog_next();
        app.open_storyline();
        assert_eq!(app.screen, AppScreen::Storyline);
        assert_eq!(app.storyline_module, Some(2));
        app.start_storyline_module();
        assert_eq!(app.screen, AppScreen::Level);
        assert_eq!(app.route, Route::Level(LevelKey::new(2, 1)));
    }

    #[test]
    fn navigating_in_fullscreen_is_remembered() {
        let (mut app, _rx) = app();
        app.open(Route::Level(LevelKey::new(1, 1)));
        app.session.as_mut().unwrap().enter_fullscreen();
        app.jump_to_level(3);
        assert_eq!(app.prefs.fullscreen_level, Some(LevelKey::new(1, 3)));
        assert!(app.session.as_ref().unwrap().is_fullscreen());

        app.session.as_mut().unwrap().exit_fullscreen();
        app.go_back();
        assert_eq!(app.prefs.fullscreen_level, None);
        assert!(!app.session.as_ref().unwrap().is_fullscreen());
    }

    #[test]
    fn fullscreen_restore_can_be_disabled() {
        let (mut app, _rx) = app();
        app.config.restore_fullscreen = false;
        app.prefs.fullscreen_level = Some(LevelKey::new(1, 2));
        app.open(Route::Level(LevelKey::new(1, 2)));
        assert!(!app.session.as_ref().unwrap().is_fullscreen());
    }

    #[test]
    fn module_complete_targets() {
        let (mut app, _rx) = app();
        app.open(Route::ModuleComplete(1));
        app.continue_to_next_module();
        assert_eq!(app.route, Route::Level(LevelKey::new(2, 1)));

        app.open(Route::ModuleComplete(3));
        app.restart_module();
        assert_eq!(app.route, Route::Level(LevelKey::new(3, 1)));

        let last = app.catalog.modules().last().unwrap().id;
        app.open(Route::ModuleComplete(last));
        app.continue_to_next_module();
        assert_eq!(app.route, Route::ModuleComplete(last));
    }

    #[test]
    fn footer_hides_next_on_unpassed_last_level() {
        let (mut app, _rx) = app();
        app.open(Route::Level(LevelKey::new(1, 3)));
        let footer = app.footer_lines(400).join(" ");
        assert!(!footer.contains("[PgDn] Next"));
        app.open(Route::Level(LevelKey::new(1, 2)));
        let footer = app.footer_lines(400).join(" ");
        assert!(footer.contains("[PgDn] Next"));
    }

    #[test]
    fn level_picker_jumps_across_modules() {
        let (mut app, _rx) = app();
        app.open(Route::Level(LevelKey::new(1, 2)));
        app.toggle_level_picker();
        let picker = app.picker.as_mut().unwrap();
        picker.next_module(&app.catalog);
        picker.next_module(&app.catalog);
        picker.next_level(&app.catalog);
        app.confirm_level_picker();
        assert!(app.picker.is_none());
        assert_eq!(app.route, Route::Level(LevelKey::new(3, 2)));
        assert_eq!(app.session.as_ref().unwrap().key, LevelKey::new(3, 2));
    }

    #[test]
    fn level_picker_on_the_open_level_just_closes() {
        let (mut app, _rx) = app();
        app.open(Route::Level(LevelKey::new(2, 3)));
        let view = app.current_view();
        app.toggle_level_picker();
        app.confirm_level_picker();
        assert!(app.picker.is_none());
        assert_eq!(app.current_view(), view);

        app.toggle_level_picker();
        app.toggle_level_picker();
        assert!(app.picker.is_none());
    }

    #[test]
    fn level_picker_needs_an_open_level() {
        let (mut app, _rx) = app();
        app.toggle_level_picker();
        assert!(app.picker.is_none());
    }
}
