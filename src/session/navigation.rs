use crate::api::LevelKey;
use crate::catalog::ModuleCatalog;

/// Where the app can be. Paths mirror the course site's URLs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Catalog,
    Level(LevelKey),
    ModuleComplete(u32),
    NotFound(String),
}

impl Route {
    /// Parse `/module/{m}/{l}`, `/module/{m}`, `/module/{m}/complete` or `/`.
    /// A trailing slash is accepted. Unknown modules and out-of-range levels
    /// yield `NotFound`.
    pub fn parse(path: &str, catalog: &ModuleCatalog) -> Route {
        let not_found = || Route::NotFound(path.to_string());
        let trimmed = path.trim();
        let segments: Vec<&str> = trimmed
            .trim_start_matches('/')
            .trim_end_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Route::Catalog,
            ["module", module, rest @ ..] => {
                let Ok(module_id) = module.parse::<u32>() else {
                    return not_found();
                };
                if !catalog.contains(module_id) {
                    return not_found();
                }
                match rest {
                    [] => Route::Level(LevelKey::new(module_id, 1)),
                    ["complete"] => Route::ModuleComplete(module_id),
                    [level] => match level.parse::<u32>() {
                        Ok(level_id) if (1..=catalog.level_count(module_id)).contains(&level_id) => {
                            Route::Level(LevelKey::new(module_id, level_id))
                        }
                        _ => not_found(),
                    },
                    _ => not_found(),
                }
            }
            _ => not_found(),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Catalog => "/".to_string(),
            Route::Level(key) => format!("/module/{}/{}/", key.module_id, key.level_id),
            Route::ModuleComplete(module_id) => format!("/module/{module_id}/complete"),
            Route::NotFound(path) => path.clone(),
        }
    }
}

/// Where the module-complete screen can lead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionTargets {
    pub next_module: Option<LevelKey>,
    pub restart: LevelKey,
}

/// Level transitions within the bounds the catalog defines.
pub struct Navigator<'a> {
    catalog: &'a ModuleCatalog,
}

impl<'a> Navigator<'a> {
    pub fn new(catalog: &'a ModuleCatalog) -> Self {
        Self { catalog }
    }

    pub fn level_count(&self, module_id: u32) -> u32 {
        self.catalog.level_count(module_id)
    }

    pub fn is_first(&self, key: LevelKey) -> bool {
        key.level_id <= 1
    }

    pub fn is_last(&self, key: LevelKey) -> bool {
        key.level_id >= self.level_count(key.module_id)
    }

    /// Previous level of the same module. Level 1 has none.
    pub fn back(&self, key: LevelKey) -> Option<Route> {
        if self.is_first(key) {
            return None;
        }
        Some(Route::Level(LevelKey::new(key.module_id, key.level_id - 1)))
    }

    /// Following level, or the module-complete screen from the last level
    /// once it has been passed.
    pub fn next(&self, key: LevelKey, passed: bool) -> Option<Route> {
        if !self.is_last(key) {
            return Some(Route::Level(LevelKey::new(key.module_id, key.level_id + 1)));
        }
        passed.then_some(Route::ModuleComplete(key.module_id))
    }

    /// Direct jump from the level picker; `None` for the current level or
    /// anything outside the module.
    pub fn jump_to_level(&self, key: LevelKey, target: u32) -> Option<Route> {
        if target == key.level_id || target == 0 || target > self.level_count(key.module_id) {
            return None;
        }
        Some(Route::Level(LevelKey::new(key.module_id, target)))
    }

    pub fn completion_targets(&self, module_id: u32) -> CompletionTargets {
        CompletionTargets {
            next_module: self
                .catalog
                .next_module_after(module_id)
                .map(|m| LevelKey::new(m, 1)),
            restart: LevelKey::new(module_id, 1),
        }
    }
}
