use serde::Serialize;

use crate::inventory::{AliasTable, LocaleInventory};
use crate::locale::LocaleTag;

/// Run-wide metadata: every known locale and the alias table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MetaRecord {
    #[serde(rename = "Locales")]
    pub locales: Vec<LocaleTag>,
    #[serde(rename = "Aliases")]
    pub aliases: AliasTable,
}

/// `None` when there is nothing to describe.
pub fn emit_meta(inventory: &LocaleInventory) -> Option<MetaRecord> {
    if inventory.locales().is_empty() && inventory.aliases().is_empty() {
        return None;
    }
    Some(MetaRecord {
        locales: inventory.locales().iter().cloned().collect(),
        aliases: inventory.aliases().clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::tag;
    use pretty_assertions::assert_eq;

    #[test]
    fn lists_locales_and_aliases() {
        let inv = LocaleInventory::new(
            ["en", "he"].map(tag),
            AliasTable::from([(tag("iw"), tag("he"))]),
        );
        let meta = emit_meta(&inv).unwrap();
        assert_eq!(meta.locales, vec![tag("en"), tag("he"), tag("iw")]);
        assert_eq!(meta.aliases.get(&tag("iw")), Some(&tag("he")));
    }

    #[test]
    fn empty_inventory_emits_nothing() {
        assert_eq!(emit_meta(&LocaleInventory::default()), None);
    }
}
