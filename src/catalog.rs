use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use rust_embed::Embed;
use serde::Deserialize;

#[derive(Embed)]
#[folder = "assets/curriculum/"]
struct CurriculumAssets;

/// Level count assumed for modules the catalog does not know about.
pub const DEFAULT_LEVEL_COUNT: u32 = 5;

// --- Definitions ---

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Storyline {
    pub text: String,
    /// Reference to the illustration; the terminal only shows the path.
    pub image: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Module {
    pub id: u32,
    pub title: String,
    pub description: String,
    #[serde(rename = "levels")]
    pub level_count: u32,
    #[serde(default)]
    pub storyline: Option<Storyline>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Curriculum {
    pub title: String,
    #[serde(default)]
    pub introduction: String,
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    curriculum: Curriculum,
    #[serde(default)]
    modules: Vec<Module>,
}

// --- Catalog ---

/// Read-only registry of the course modules. Built once at startup and
/// passed around by reference; nothing mutates it afterwards.
#[derive(Clone, Debug)]
pub struct ModuleCatalog {
    curriculum: Curriculum,
    modules: BTreeMap<u32, Module>,
}

impl ModuleCatalog {
    /// Catalog compiled into the binary.
    pub fn bundled() -> Result<Self> {
        let file = CurriculumAssets::get("modules.toml")
            .context("bundled curriculum asset is missing")?;
        let content = std::str::from_utf8(file.data.as_ref())
            .context("bundled curriculum is not valid UTF-8")?;
        Self::from_toml_str(content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let parsed: CatalogFile = toml::from_str(content).context("invalid curriculum TOML")?;

        let mut modules = BTreeMap::new();
        for module in parsed.modules {
            if module.level_count == 0 {
                bail!("module {} must have at least one level", module.id);
            }
            let id = module.id;
            if modules.insert(id, module).is_some() {
                bail!("module {id} is defined twice");
            }
        }

        Ok(Self {
            curriculum: parsed.curriculum,
            modules,
        })
    }

    pub fn curriculum(&self) -> &Curriculum {
        &self.curriculum
    }

    pub fn get_module(&self, module_id: u32) -> Option<&Module> {
        self.modules.get(&module_id)
    }

    pub fn contains(&self, module_id: u32) -> bool {
        self.modules.contains_key(&module_id)
    }

    pub fn level_count(&self, module_id: u32) -> u32 {
        self.modules
            .get(&module_id)
            .map(|m| m.level_count)
            .unwrap_or(DEFAULT_LEVEL_COUNT)
    }

    /// Modules in ascending id order.
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn next_module_after(&self, module_id: u32) -> Option<u32> {
        self.modules
            .range(module_id.saturating_add(1)..)
            .next()
            .map(|(id, _)| *id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"
[curriculum]
title = "Test Course"

[[modules]]
id = 2
title = "Second"
description = "b"
levels = 4

[[modules]]
id = 1
title = "First"
description = "a"
levels = 3

[modules.storyline]
text = "Once upon a table"
image = "one.png"

[[modules]]
id = 7
title = "Seventh"
description = "c"
levels = 1
"#;

    #[test]
    fn bundled_catalog_loads() {
        let catalog = ModuleCatalog::bundled().unwrap();
        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.level_count(1), 3);
        assert_eq!(catalog.level_count(4), 6);
        assert!(catalog.get_module(1).unwrap().storyline.is_some());
        assert!(!catalog.curriculum().title.is_empty());
    }

    #[test]
    fn modules_are_ordered_by_id() {
        let catalog = ModuleCatalog::from_toml_str(SMALL).unwrap();
        let ids: Vec<u32> = catalog.modules().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 7]);
    }

    #[test]
    fn unknown_module_is_not_found_and_uses_fallback_count() {
        let catalog = ModuleCatalog::from_toml_str(SMALL).unwrap();
        assert!(catalog.get_module(3).is_none());
        assert!(!catalog.contains(3));
        assert_eq!(catalog.level_count(3), DEFAULT_LEVEL_COUNT);
    }

    #[test]
    fn next_module_skips_gaps() {
        let catalog = ModuleCatalog::from_toml_str(SMALL).unwrap();
        assert_eq!(catalog.next_module_after(1), Some(2));
        assert_eq!(catalog.next_module_after(2), Some(7));
        assert_eq!(catalog.next_module_after(7), None);
        assert_eq!(catalog.next_module_after(u32::MAX), None);
    }

    #[test]
    fn storyline_is_optional() {
        let catalog = ModuleCatalog::from_toml_str(SMALL).unwrap();
        let first = catalog.get_module(1).unwrap();
        assert_eq!(first.storyline.as_ref().unwrap().image, "one.png");
        assert!(catalog.get_module(2).unwrap().storyline.is_none());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let toml = r#"
[[modules]]
id = 1
title = "a"
description = "a"
levels = 1

[[modules]]
id = 1
title = "b"
description = "b"
levels = 2
"#;
        assert!(ModuleCatalog::from_toml_str(toml).is_err());
    }

    #[test]
    fn zero_levels_are_rejected() {
        let toml = r#"
[[modules]]
id = 1
title = "a"
description = "a"
levels = 0
"#;
        assert!(ModuleCatalog::from_toml_str(toml).is_err());
    }
}
