use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{BundleError, MissingResource};
use crate::locale::LocaleTag;

const MAX_KEY_DEPTH: usize = 8;
const MAX_VALUE_BYTES: usize = 16 * 1024;

/// Which compiled resource tree an entry lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BundleKind {
    /// Language, script and pattern data (`Languages/*`, `Scripts/*`, `localeDisplayPattern/*`).
    Lang,
    /// Country names (`Countries/*`).
    Region,
}

impl BundleKind {
    pub fn dir_name(self) -> &'static str {
        match self {
            BundleKind::Lang => "lang",
            BundleKind::Region => "region",
        }
    }
}

impl fmt::Display for BundleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Read access to compiled locale bundles.
///
/// Reads must not mutate shared state; generation calls this concurrently.
pub trait ResourceReader: Send + Sync {
    fn read_entry(
        &self,
        bundle: BundleKind,
        locale: &LocaleTag,
        key_path: &str,
    ) -> Result<String, MissingResource>;
}

type Entries = HashMap<String, String>;

/// In-memory bundles, keyed by kind and locale, with `/`-joined key paths.
///
/// Lookups inherit through the truncation chain and finally `root`, the way compiled ICU
/// bundles do.
#[derive(Clone, Debug, Default)]
pub struct BundleSet {
    bundles: HashMap<(BundleKind, LocaleTag), Entries>,
}

impl BundleSet {
    pub fn new() -> Self {
        Self {
            bundles: HashMap::new(),
        }
    }

    pub fn insert(
        &mut self,
        bundle: BundleKind,
        locale: &LocaleTag,
        key_path: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.bundles
            .entry((bundle, locale.clone()))
            .or_default()
            .insert(key_path.into(), value.into());
    }

    /// Parse one YAML bundle file body and merge it under `locale`.
    pub fn load_yaml_str(
        &mut self,
        bundle: BundleKind,
        locale: &LocaleTag,
        src: &str,
    ) -> Result<(), BundleError> {
        let origin = format!("{bundle}/{locale}");
        let entries = parse_yaml_bundle(&origin, src)?;
        self.bundles
            .entry((bundle, locale.clone()))
            .or_default()
            .extend(entries);
        Ok(())
    }

    /// Load `<dir>/lang/*.yaml` and `<dir>/region/*.yaml`.
    ///
    /// A missing subdirectory is treated as empty.
    pub fn load_dir(dir: &Path) -> Result<Self, BundleError> {
        let mut set = Self::new();
        for kind in [BundleKind::Lang, BundleKind::Region] {
            let sub = dir.join(kind.dir_name());
            if !sub.is_dir() {
                warn!("bundle directory {} not found, skipping", sub.display());
                continue;
            }
            for (locale, path) in yaml_files(&sub)? {
                let src = fs::read_to_string(&path).map_err(|source| BundleError::Io {
                    path: path.clone(),
                    source,
                })?;
                set.load_yaml_str(kind, &locale, &src)?;
            }
        }
        debug!("loaded {} bundles from {}", set.bundles.len(), dir.display());
        Ok(set)
    }

    fn lookup(&self, bundle: BundleKind, locale: &LocaleTag, key_path: &str) -> Option<&str> {
        std::iter::once(locale.clone())
            .chain(locale.ancestors())
            .chain((!locale.is_root()).then(LocaleTag::root))
            .find_map(|l| {
                self.bundles
                    .get(&(bundle, l))
                    .and_then(|entries| entries.get(key_path))
            })
            .map(|s| s.as_str())
    }
}

impl ResourceReader for BundleSet {
    fn read_entry(
        &self,
        bundle: BundleKind,
        locale: &LocaleTag,
        key_path: &str,
    ) -> Result<String, MissingResource> {
        self.lookup(bundle, locale, key_path)
            .map(str::to_string)
            .ok_or_else(|| MissingResource::MissingEntry {
                locale: locale.clone(),
                key: key_path.to_string(),
            })
    }
}

/// List `*.yaml` files in `dir` as `(locale, path)`, sorted by locale.
pub(crate) fn yaml_files(dir: &Path) -> Result<Vec<(LocaleTag, std::path::PathBuf)>, BundleError> {
    let io_err = |source| BundleError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut out = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        out.push((LocaleTag::parse(stem)?, path));
    }
    out.sort();
    Ok(out)
}

/// Flatten a nested YAML mapping into `/`-joined key paths with string leaves.
fn parse_yaml_bundle(origin: &str, src: &str) -> Result<Entries, BundleError> {
    let yaml_err = |msg: String| BundleError::Yaml {
        origin: origin.to_string(),
        msg,
    };

    let value: serde_yaml::Value =
        serde_yaml::from_str(src).map_err(|e| yaml_err(format!("yaml parse error: {e}")))?;

    let mut out = Entries::new();
    match value {
        // An empty file is an empty bundle.
        serde_yaml::Value::Null => {}
        serde_yaml::Value::Mapping(map) => flatten_into(&mut out, "", map, 0).map_err(yaml_err)?,
        _ => return Err(yaml_err("bundle root must be a mapping".to_string())),
    }
    Ok(out)
}

/// Unquoted M.49 keys such as `419` arrive as numbers. Zero-padded scalars (`001`) stay
/// strings. Any other number (`1`, `1e2`, `-5`) would not round-trip to the key as written,
/// so it is rejected and must be quoted.
fn numeric_key(prefix: &str, n: &serde_yaml::Number) -> Result<String, String> {
    match n.as_u64() {
        Some(code @ 100..=999) => Ok(code.to_string()),
        _ => Err(format!(
            "numeric key `{n}` under `{prefix}` is ambiguous, quote it (e.g. \"001\")"
        )),
    }
}

fn flatten_into(
    out: &mut Entries,
    prefix: &str,
    map: serde_yaml::Mapping,
    depth: usize,
) -> Result<(), String> {
    if depth >= MAX_KEY_DEPTH {
        return Err(format!("`{prefix}` is nested too deeply (max {MAX_KEY_DEPTH})"));
    }
    for (k, v) in map {
        let key = match k {
            serde_yaml::Value::String(s) => s,
            serde_yaml::Value::Number(n) => numeric_key(prefix, &n)?,
            _ => return Err(format!("keys under `{prefix}` must be strings")),
        };
        let path = if prefix.is_empty() {
            key
        } else {
            format!("{prefix}/{key}")
        };
        match v {
            serde_yaml::Value::Mapping(inner) => flatten_into(out, &path, inner, depth + 1)?,
            serde_yaml::Value::String(s) => {
                if s.len() > MAX_VALUE_BYTES {
                    return Err(format!(
                        "value for `{path}` is too long (max {MAX_VALUE_BYTES} bytes)"
                    ));
                }
                out.insert(path, s);
            }
            _ => return Err(format!("value for `{path}` must be a string or mapping")),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::tag;
    use pretty_assertions::assert_eq;

    #[test]
    fn flattens_nested_yaml() {
        let src = r#"
Languages:
  de: German
  zh: Chinese
localeDisplayPattern:
  pattern: "{0} ({1})"
"#;
        let mut set = BundleSet::new();
        set.load_yaml_str(BundleKind::Lang, &tag("en"), src).unwrap();

        let en = tag("en");
        assert_eq!(
            set.read_entry(BundleKind::Lang, &en, "Languages/de").unwrap(),
            "German"
        );
        assert_eq!(
            set.read_entry(BundleKind::Lang, &en, "localeDisplayPattern/pattern")
                .unwrap(),
            "{0} ({1})"
        );
    }

    #[test]
    fn numeric_keys_become_strings() {
        let mut set = BundleSet::new();
        set.load_yaml_str(BundleKind::Region, &tag("es"), "Countries:\n  419: Latinoamérica\n")
            .unwrap();
        assert_eq!(
            set.read_entry(BundleKind::Region, &tag("es"), "Countries/419")
                .unwrap(),
            "Latinoamérica"
        );
    }

    #[test]
    fn lookup_inherits_through_parents_and_root() {
        let mut set = BundleSet::new();
        set.insert(BundleKind::Lang, &tag("de"), "Languages/de", "Deutsch");
        set.insert(BundleKind::Lang, &LocaleTag::root(), "Languages/und", "und");

        let de_at = tag("de_AT");
        assert_eq!(
            set.read_entry(BundleKind::Lang, &de_at, "Languages/de").unwrap(),
            "Deutsch"
        );
        assert_eq!(
            set.read_entry(BundleKind::Lang, &de_at, "Languages/und").unwrap(),
            "und"
        );
        assert_eq!(
            set.read_entry(BundleKind::Region, &de_at, "Languages/de"),
            Err(MissingResource::MissingEntry {
                locale: de_at.clone(),
                key: "Languages/de".to_string()
            })
        );
    }

    #[test]
    fn short_numeric_keys_are_rejected() {
        let mut set = BundleSet::new();
        let err = set
            .load_yaml_str(BundleKind::Region, &tag("en"), "Countries:\n  1: World\n")
            .unwrap_err();
        assert!(err.to_string().contains("quote it"), "{err}");

        set.load_yaml_str(BundleKind::Region, &tag("en"), "Countries:\n  001: World\n")
            .unwrap();
        assert_eq!(
            set.read_entry(BundleKind::Region, &tag("en"), "Countries/001")
                .unwrap(),
            "World"
        );
    }

    #[test]
    fn rejects_non_string_leaves() {
        let mut set = BundleSet::new();
        let err = set
            .load_yaml_str(BundleKind::Lang, &tag("en"), "Languages:\n  de: 12\n")
            .unwrap_err();
        assert!(matches!(err, BundleError::Yaml { .. }));

        let err = set
            .load_yaml_str(BundleKind::Lang, &tag("en"), "- a\n- b\n")
            .unwrap_err();
        assert!(matches!(err, BundleError::Yaml { .. }));
    }

    #[test]
    fn empty_file_is_empty_bundle() {
        let mut set = BundleSet::new();
        set.load_yaml_str(BundleKind::Lang, &tag("en"), "").unwrap();
        assert!(set
            .read_entry(BundleKind::Lang, &tag("en"), "Languages/de")
            .is_err());
    }
}
