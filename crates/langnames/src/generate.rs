use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, trace};

use crate::bundle::{BundleKind, ResourceReader};
use crate::cache::FallbackCache;
use crate::compose::{check_region, compose_name, DisplayPattern, NameFragments};
use crate::error::MissingResource;
use crate::fallback::FallbackMapping;
use crate::inventory::LocaleInventory;
use crate::locale::LocaleTag;

/// Target locale -> display name, for one display locale.
pub type NameTable = BTreeMap<LocaleTag, String>;

pub const PATTERN_KEY: &str = "localeDisplayPattern/pattern";
pub const SEPARATOR_KEY: &str = "localeDisplayPattern/separator";

/// The persisted names of one display locale.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NamesRecord {
    #[serde(rename = "Names")]
    pub names: NameTable,
}

/// Builds the minimal name table of display locales.
///
/// A table keeps only entries that differ from what the locale inherits along its
/// fallback chain. Ancestor tables are resolved through the shared [`FallbackCache`], so
/// each one is built once per run no matter how many descendants ask for it.
pub struct NameTableGenerator<'a, R: ?Sized> {
    inventory: &'a LocaleInventory,
    mapping: &'a FallbackMapping,
    reader: &'a R,
    cache: &'a FallbackCache,
    defaults: DisplayPattern,
}

impl<'a, R: ResourceReader + ?Sized> NameTableGenerator<'a, R> {
    pub fn new(
        inventory: &'a LocaleInventory,
        mapping: &'a FallbackMapping,
        reader: &'a R,
        cache: &'a FallbackCache,
    ) -> Self {
        Self {
            inventory,
            mapping,
            reader,
            cache,
            defaults: DisplayPattern::default(),
        }
    }

    /// Pattern used when a display locale has no `localeDisplayPattern`.
    pub fn with_default_pattern(mut self, defaults: DisplayPattern) -> Self {
        self.defaults = defaults;
        self
    }

    /// The `{"Names": ...}` record for `disp`, or `None` when `disp` is an alias or
    /// has nothing beyond what it inherits.
    pub fn generate(&self, disp: &LocaleTag) -> Option<NamesRecord> {
        if self.inventory.is_alias(disp) {
            trace!(locale = %disp, "alias display locale, no table");
            return None;
        }
        let table = self.resolve(disp);
        if table.is_empty() {
            None
        } else {
            Some(NamesRecord {
                names: NameTable::clone(&table),
            })
        }
    }

    /// The deduplicated table of `disp`, computed at most once per cache.
    pub fn resolve(&self, disp: &LocaleTag) -> Arc<NameTable> {
        self.cache
            .get_or_compute(disp, || self.build_table(disp))
    }

    fn build_table(&self, disp: &LocaleTag) -> NameTable {
        let pattern = self.display_pattern(disp);
        let mut table = self.candidates(disp, &pattern);
        let candidates = table.len();

        // Subtract the whole chain, not just the immediate parent.
        for ancestor in self.mapping.chain(disp) {
            let inherited = self.resolve(ancestor);
            table.retain(|target, name| inherited.get(target) != Some(name));
        }

        debug!(
            locale = %disp,
            candidates,
            kept = table.len(),
            "built name table"
        );
        table
    }

    /// Each pattern part falls back to the configured default on its own.
    pub fn display_pattern(&self, disp: &LocaleTag) -> DisplayPattern {
        let read = |key: &str| self.reader.read_entry(BundleKind::Lang, disp, key).ok();
        DisplayPattern {
            pattern: read(PATTERN_KEY).unwrap_or_else(|| self.defaults.pattern.clone()),
            separator: read(SEPARATOR_KEY).unwrap_or_else(|| self.defaults.separator.clone()),
        }
    }

    fn candidates(&self, disp: &LocaleTag, pattern: &DisplayPattern) -> NameTable {
        self.inventory
            .targets()
            .filter_map(|target| match self.name_for(disp, target, pattern) {
                Ok(name) => Some((target.clone(), name)),
                Err(reason) => {
                    trace!(locale = %disp, target = %target, %reason, "dropped candidate");
                    None
                }
            })
            .collect()
    }

    /// The name of `target` in the language of `disp`.
    pub fn name_for(
        &self,
        disp: &LocaleTag,
        target: &LocaleTag,
        pattern: &DisplayPattern,
    ) -> Result<String, MissingResource> {
        let language = self.reader.read_entry(
            BundleKind::Lang,
            disp,
            &format!("Languages/{}", target.language()),
        )?;
        let script = target
            .script()
            .map(|code| {
                self.reader
                    .read_entry(BundleKind::Lang, disp, &format!("Scripts/{code}"))
            })
            .transpose()?;
        let region = target
            .region()
            .map(|code| -> Result<String, MissingResource> {
                check_region(code)?;
                self.reader
                    .read_entry(BundleKind::Region, disp, &format!("Countries/{code}"))
            })
            .transpose()?;

        Ok(compose_name(
            &NameFragments {
                language: &language,
                script: script.as_deref(),
                region: region.as_deref(),
            },
            pattern,
        ))
    }
}
