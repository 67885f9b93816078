use crate::api::LevelKey;
use crate::catalog::ModuleCatalog;

/// Cursor over every module and level of the catalog, opened from a level
/// view to jump anywhere in the course. Up/down walks modules, left/right
/// walks the levels of the highlighted module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelPicker {
    module_index: usize,
    level: u32,
}

impl LevelPicker {
    /// Starts on `current`, or on the first module when it is unknown.
    pub fn new(catalog: &ModuleCatalog, current: LevelKey) -> Self {
        match catalog.modules().position(|m| m.id == current.module_id) {
            Some(module_index) => Self {
                module_index,
                level: current.level_id.clamp(1, catalog.level_count(current.module_id)),
            },
            None => Self {
                module_index: 0,
                level: 1,
            },
        }
    }

    pub fn module_index(&self) -> usize {
        self.module_index
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn next_module(&mut self, catalog: &ModuleCatalog) {
        if catalog.is_empty() {
            return;
        }
        self.module_index = (self.module_index + 1) % catalog.len();
        self.level = 1;
    }

    pub fn prev_module(&mut self, catalog: &ModuleCatalog) {
        if catalog.is_empty() {
            return;
        }
        self.module_index = self
            .module_index
            .checked_sub(1)
            .unwrap_or(catalog.len() - 1);
        self.level = 1;
    }

    pub fn next_level(&mut self, catalog: &ModuleCatalog) {
        if let Some(key) = self.selected(catalog) {
            self.level = (self.level + 1).min(catalog.level_count(key.module_id));
        }
    }

    pub fn prev_level(&mut self) {
        self.level = self.level.saturating_sub(1).max(1);
    }

    /// Digit shortcut within the highlighted module; out-of-range is ignored.
    pub fn select_level(&mut self, catalog: &ModuleCatalog, level: u32) -> bool {
        let Some(key) = self.selected(catalog) else {
            return false;
        };
        if level == 0 || level > catalog.level_count(key.module_id) {
            return false;
        }
        self.level = level;
        true
    }

    pub fn selected(&self, catalog: &ModuleCatalog) -> Option<LevelKey> {
        catalog
            .modules()
            .nth(self.module_index)
            .map(|m| LevelKey::new(m.id, self.level))
    }
}
