use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// The tag naming locale-less data.
pub const ROOT: &str = "root";

/// Normalize locale identifiers to the underscore form used by CLDR file names.
///
/// - Converts `-` to `_` (BCP 47 input such as `zh-Hant-TW`).
/// - Trims whitespace.
pub fn normalize_locale(s: &str) -> String {
    s.trim().replace('-', "_")
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid locale tag `{tag}`: {reason}")]
pub struct LocaleParseError {
    pub tag: String,
    pub reason: &'static str,
}

/// A locale identifier such as `zh_Hans_MO` or `ca_ES_VALENCIA`.
///
/// Equality and ordering use the string form. Subtag boundaries are recorded at parse time
/// so accessors and [`LocaleTag::parent`] never re-scan the string.
#[derive(Clone)]
pub struct LocaleTag {
    tag: String,
    // Byte ranges into `tag`; `language` always starts at 0.
    language_end: usize,
    script: Option<(usize, usize)>,
    region: Option<(usize, usize)>,
    variant_start: Option<usize>,
}

impl LocaleTag {
    pub fn parse(s: &str) -> Result<Self, LocaleParseError> {
        let tag = normalize_locale(s);
        let err = |reason| LocaleParseError {
            tag: tag.clone(),
            reason,
        };

        if tag.is_empty() {
            return Err(err("empty tag"));
        }

        let mut offset = 0;
        let mut parts = tag.split('_').map(|p| {
            let start = offset;
            offset += p.len() + 1;
            (start, p)
        });

        let Some((_, language)) = parts.next() else {
            return Err(err("empty tag"));
        };
        if language.is_empty() || !language.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(err("language subtag must be non-empty and alphanumeric"));
        }

        let mut script = None;
        let mut region = None;
        let mut variant_start = None;
        let mut next = parts.next();

        if let Some((start, p)) = next {
            if p.len() == 4 && p.chars().all(|c| c.is_ascii_alphabetic()) {
                script = Some((start, start + p.len()));
                next = parts.next();
            }
        }
        if let Some((start, p)) = next {
            let is_alpha2 = p.len() == 2 && p.chars().all(|c| c.is_ascii_alphabetic());
            let is_digit3 = p.len() == 3 && p.chars().all(|c| c.is_ascii_digit());
            if is_alpha2 || is_digit3 {
                region = Some((start, start + p.len()));
                next = parts.next();
            }
        }
        if let Some((start, p)) = next {
            if p.is_empty() {
                return Err(err("empty subtag"));
            }
            variant_start = Some(start);
            if parts.any(|(_, p)| p.is_empty()) {
                return Err(err("empty subtag"));
            }
        }

        Ok(Self {
            language_end: language.len(),
            tag,
            script,
            region,
            variant_start,
        })
    }

    /// The `root` tag.
    pub fn root() -> Self {
        Self {
            tag: ROOT.to_string(),
            language_end: ROOT.len(),
            script: None,
            region: None,
            variant_start: None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.tag
    }

    pub fn is_root(&self) -> bool {
        self.tag == ROOT
    }

    pub fn language(&self) -> &str {
        &self.tag[..self.language_end]
    }

    pub fn script(&self) -> Option<&str> {
        self.script.map(|(s, e)| &self.tag[s..e])
    }

    pub fn region(&self) -> Option<&str> {
        self.region.map(|(s, e)| &self.tag[s..e])
    }

    pub fn variant(&self) -> Option<&str> {
        self.variant_start.map(|s| &self.tag[s..])
    }

    pub fn has_variant(&self) -> bool {
        self.variant_start.is_some()
    }

    /// The next coarser locale under truncation fallback.
    ///
    /// Strips the variant, then the region, then the script. A bare language (and `root`)
    /// has no parent.
    pub fn parent(&self) -> Option<LocaleTag> {
        let cut = if let Some(v) = self.variant_start {
            v - 1
        } else if let Some((s, _)) = self.region {
            s - 1
        } else if let Some((s, _)) = self.script {
            s - 1
        } else {
            return None;
        };

        Some(Self {
            tag: self.tag[..cut].to_string(),
            language_end: self.language_end,
            script: self.script.filter(|&(_, e)| e <= cut),
            region: self.region.filter(|&(_, e)| e <= cut),
            variant_start: None,
        })
    }

    /// Iterate the truncation chain above this tag, nearest first.
    ///
    /// Example: `ca_ES_VALENCIA` -> `ca_ES`, `ca`.
    pub fn ancestors(&self) -> impl Iterator<Item = LocaleTag> {
        std::iter::successors(self.parent(), LocaleTag::parent)
    }
}

impl PartialEq for LocaleTag {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag
    }
}

impl Eq for LocaleTag {}

impl PartialOrd for LocaleTag {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LocaleTag {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.tag.cmp(&other.tag)
    }
}

impl Hash for LocaleTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tag.hash(state);
    }
}

impl FromStr for LocaleTag {
    type Err = LocaleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for LocaleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}

impl fmt::Debug for LocaleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocaleTag({})", self.tag)
    }
}

impl AsRef<str> for LocaleTag {
    fn as_ref(&self) -> &str {
        &self.tag
    }
}

impl Serialize for LocaleTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.tag)
    }
}

#[cfg(test)]
pub(crate) fn tag(s: &str) -> LocaleTag {
    LocaleTag::parse(s).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn splits_subtags() {
        let t = tag("zh_Hans_MO");
        assert_eq!(t.language(), "zh");
        assert_eq!(t.script(), Some("Hans"));
        assert_eq!(t.region(), Some("MO"));
        assert_eq!(t.variant(), None);

        let t = tag("ca_ES_VALENCIA");
        assert_eq!(t.script(), None);
        assert_eq!(t.region(), Some("ES"));
        assert_eq!(t.variant(), Some("VALENCIA"));
        assert!(t.has_variant());

        let t = tag("es_419");
        assert_eq!(t.region(), Some("419"));
    }

    #[test]
    fn variant_without_region() {
        let t = tag("en_POSIX_X");
        assert_eq!(t.region(), None);
        assert_eq!(t.variant(), Some("POSIX_X"));
        assert_eq!(t.parent(), Some(tag("en")));
    }

    #[test]
    fn accepts_bcp47_separators() {
        assert_eq!(tag("zh-Hant-TW").as_str(), "zh_Hant_TW");
        assert_eq!(tag(" de_AT ").as_str(), "de_AT");
    }

    #[test]
    fn rejects_malformed() {
        assert!(LocaleTag::parse("").is_err());
        assert!(LocaleTag::parse("_AT").is_err());
        assert!(LocaleTag::parse("de__AT").is_err());
        assert!(LocaleTag::parse("de_AT_").is_err());
    }

    #[test]
    fn parent_strips_variant_region_script() {
        let t = tag("sr_Latn_ME_POSIX");
        let chain: Vec<_> = t.ancestors().map(|p| p.to_string()).collect();
        assert_eq!(chain, vec!["sr_Latn_ME", "sr_Latn", "sr"]);

        let p = tag("sr_Latn_ME").parent().unwrap();
        assert_eq!(p.script(), Some("Latn"));
        assert_eq!(p.region(), None);
    }

    #[test]
    fn bare_language_and_root_have_no_parent() {
        assert_eq!(tag("de").parent(), None);
        assert_eq!(LocaleTag::root().parent(), None);
        assert!(tag("root").is_root());
    }

    #[test]
    fn chain_terminates_within_four_steps() {
        for s in ["de", "de_AT", "zh_Hans", "zh_Hans_MO", "ca_ES_VALENCIA", "sr_Latn_ME_X"] {
            let steps = tag(s).ancestors().count() + 1;
            assert!(steps <= 4, "{s} took {steps} steps");
        }
    }

    #[test]
    fn parsed_parent_equals_parsed_string() {
        let p = tag("zh_Hans_MO").parent().unwrap();
        assert_eq!(p, tag("zh_Hans"));
    }
}
