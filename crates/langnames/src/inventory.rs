use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::bundle::{yaml_files, BundleKind};
use crate::error::BundleError;
use crate::locale::LocaleTag;

/// Alias tag -> canonical tag.
pub type AliasTable = BTreeMap<LocaleTag, LocaleTag>;

pub const ALIASES_FILE: &str = "aliases.yaml";

/// Every locale known to one generation run, plus the alias table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LocaleInventory {
    locales: BTreeSet<LocaleTag>,
    aliases: AliasTable,
}

impl LocaleInventory {
    /// Alias keys are always part of the known locales.
    pub fn new(locales: impl IntoIterator<Item = LocaleTag>, aliases: AliasTable) -> Self {
        let mut locales: BTreeSet<LocaleTag> = locales.into_iter().collect();
        locales.extend(aliases.keys().cloned());
        Self { locales, aliases }
    }

    /// Scan a source tree: locales are the file stems of `<dir>/lang/*.yaml` (minus `root`),
    /// aliases come from the optional `<dir>/aliases.yaml` mapping.
    pub fn scan(dir: &Path) -> Result<Self, BundleError> {
        let locales = scan_locales(dir)?;
        let aliases = scan_aliases(dir)?;
        debug!(
            "scanned {} locales and {} aliases in {}",
            locales.len(),
            aliases.len(),
            dir.display()
        );
        Ok(Self::new(locales, aliases))
    }

    pub fn locales(&self) -> &BTreeSet<LocaleTag> {
        &self.locales
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    pub fn is_alias(&self, locale: &LocaleTag) -> bool {
        self.aliases.contains_key(locale)
    }

    /// Known locales that carry their own data (everything but aliases).
    pub fn display_locales(&self) -> impl Iterator<Item = &LocaleTag> {
        self.locales.iter().filter(|l| !self.is_alias(l))
    }

    /// Locales that get a display name: no aliases, no variants, not `root`.
    pub fn targets(&self) -> impl Iterator<Item = &LocaleTag> {
        self.locales
            .iter()
            .filter(|l| !self.is_alias(l) && !l.has_variant() && !l.is_root())
    }
}

pub fn scan_locales(dir: &Path) -> Result<BTreeSet<LocaleTag>, BundleError> {
    let lang_dir = dir.join(BundleKind::Lang.dir_name());
    Ok(yaml_files(&lang_dir)?
        .into_iter()
        .map(|(locale, _)| locale)
        .filter(|l| !l.is_root())
        .collect())
}

pub fn scan_aliases(dir: &Path) -> Result<AliasTable, BundleError> {
    let path = dir.join(ALIASES_FILE);
    if !path.is_file() {
        return Ok(AliasTable::new());
    }
    let src = fs::read_to_string(&path).map_err(|source| BundleError::Io {
        path: path.clone(),
        source,
    })?;
    parse_aliases(&src)
}

/// Parse a flat `alias: target` YAML mapping.
pub fn parse_aliases(src: &str) -> Result<AliasTable, BundleError> {
    if src.trim().is_empty() {
        return Ok(AliasTable::new());
    }
    let raw: Option<BTreeMap<String, String>> =
        serde_yaml::from_str(src).map_err(|e| BundleError::Yaml {
            origin: ALIASES_FILE.to_string(),
            msg: e.to_string(),
        })?;

    raw.unwrap_or_default()
        .into_iter()
        .map(|(alias, target)| -> Result<_, BundleError> {
            Ok((LocaleTag::parse(&alias)?, LocaleTag::parse(&target)?))
        })
        .collect()
}
