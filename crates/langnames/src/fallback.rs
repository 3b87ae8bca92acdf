use std::collections::{HashMap, HashSet};

use tracing::trace;

use crate::error::GenerateError;
use crate::inventory::LocaleInventory;
use crate::locale::LocaleTag;

/// Each display locale's nearest ancestor that is itself a display locale.
///
/// Edges always drop at least one subtag, so the mapping is a forest and every
/// [`FallbackMapping::chain`] is at most three links long.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FallbackMapping {
    parents: HashMap<LocaleTag, Option<LocaleTag>>,
}

impl FallbackMapping {
    /// Walk the truncation chain of every display locale until it hits another display
    /// locale or runs out.
    ///
    /// Fails if a walk visits an alias: aliases are resolved at lookup time and must never
    /// stand in as an ancestor with data.
    pub fn build(inventory: &LocaleInventory) -> Result<Self, GenerateError> {
        let displayed: HashSet<&LocaleTag> = inventory.display_locales().collect();
        let mut parents = HashMap::with_capacity(displayed.len());

        for &locale in &displayed {
            let mut fallback = None;
            for ancestor in locale.ancestors() {
                if inventory.is_alias(&ancestor) {
                    return Err(GenerateError::AliasInFallbackChain {
                        locale: locale.clone(),
                        alias: ancestor,
                    });
                }
                if displayed.contains(&ancestor) {
                    fallback = Some(ancestor);
                    break;
                }
            }
            trace!(locale = %locale, fallback = ?fallback, "fallback edge");
            parents.insert(locale.clone(), fallback);
        }

        Ok(Self { parents })
    }

    /// The fallback of `locale`, or `None` for tree roots and unknown locales.
    pub fn fallback_of(&self, locale: &LocaleTag) -> Option<&LocaleTag> {
        self.parents.get(locale).and_then(Option::as_ref)
    }

    pub fn contains(&self, locale: &LocaleTag) -> bool {
        self.parents.contains_key(locale)
    }

    /// Ancestors of `locale` in the mapping, nearest first.
    pub fn chain<'a>(&'a self, locale: &LocaleTag) -> impl Iterator<Item = &'a LocaleTag> + 'a {
        std::iter::successors(self.fallback_of(locale), move |l| self.fallback_of(l))
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LocaleTag, Option<&LocaleTag>)> {
        self.parents.iter().map(|(k, v)| (k, v.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::AliasTable;
    use crate::locale::tag;
    use pretty_assertions::assert_eq;

    fn build(locales: &[&str], aliases: &[(&str, &str)]) -> Result<FallbackMapping, GenerateError> {
        let aliases: AliasTable = aliases.iter().map(|&(a, t)| (tag(a), tag(t))).collect();
        FallbackMapping::build(&LocaleInventory::new(locales.iter().map(|&l| tag(l)), aliases))
    }

    #[test]
    fn skips_locales_without_data() {
        // No `sr_Latn` bundle: `sr_Latn_ME` falls straight back to `sr`.
        let m = build(&["sr", "sr_Latn_ME", "de", "de_AT"], &[]).unwrap();
        assert_eq!(m.fallback_of(&tag("sr_Latn_ME")), Some(&tag("sr")));
        assert_eq!(m.fallback_of(&tag("de_AT")), Some(&tag("de")));
        assert_eq!(m.fallback_of(&tag("de")), None);
        assert_eq!(m.len(), 4);
    }

    #[test]
    fn orphan_has_no_fallback() {
        let m = build(&["en", "ff_Adlm_GN"], &[]).unwrap();
        assert!(m.contains(&tag("ff_Adlm_GN")));
        assert_eq!(m.fallback_of(&tag("ff_Adlm_GN")), None);
    }

    #[test]
    fn chain_follows_whole_ancestry() {
        let m = build(&["ca", "ca_ES", "ca_ES_VALENCIA"], &[]).unwrap();
        let chain: Vec<_> = m.chain(&tag("ca_ES_VALENCIA")).map(|l| l.as_str()).collect();
        assert_eq!(chain, vec!["ca_ES", "ca"]);
    }

    #[test]
    fn aliases_are_not_display_locales() {
        let m = build(&["zh", "zh_Hant_TW"], &[("zh_TW", "zh_Hant_TW")]).unwrap();
        assert!(!m.contains(&tag("zh_TW")));
        assert_eq!(m.fallback_of(&tag("zh_Hant_TW")), Some(&tag("zh")));
    }

    #[test]
    fn alias_in_chain_is_fatal() {
        let GenerateError::AliasInFallbackChain { locale, alias } =
            build(&["sh", "sh_BA"], &[("sh", "sr_Latn")]).unwrap_err();
        assert_eq!(locale, tag("sh_BA"));
        assert_eq!(alias, tag("sh"));
    }

    #[test]
    fn no_edge_revisits_an_alias() {
        let aliases = [("iw", "he"), ("no_NO", "nb_NO")];
        let m = build(&["he", "he_IL", "nb", "nb_NO", "no"], &aliases).unwrap();
        for (_, fallback) in m.iter() {
            if let Some(f) = fallback {
                assert!(!aliases.iter().any(|(a, _)| tag(a) == *f));
            }
        }
    }
}
