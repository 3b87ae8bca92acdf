//! JSON writer for generated tables

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

use langnames::RunOutput;

pub const META_FILE: &str = "_meta.json";

/// Write `<dir>/<locale>.json` per emitted display locale plus `<dir>/_meta.json`.
///
/// Returns the number of files written.
pub fn write_output(dir: &Path, output: &RunOutput, pretty: bool) -> Result<usize> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut written = 0;
    for (locale, record) in &output.names {
        write_json(&dir.join(format!("{locale}.json")), record, pretty)?;
        written += 1;
    }
    if let Some(meta) = &output.meta {
        write_json(&dir.join(META_FILE), meta, pretty)?;
        written += 1;
    }
    Ok(written)
}

fn write_json<T: Serialize>(path: &Path, value: &T, pretty: bool) -> Result<()> {
    let mut text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    text.push('\n');
    fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use langnames::{LocaleTag, MetaRecord, NameTable, NamesRecord};
    use std::collections::BTreeMap;

    #[test]
    fn writes_one_file_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let en = LocaleTag::parse("en").unwrap();
        let de_at = LocaleTag::parse("de_AT").unwrap();
        let output = RunOutput {
            names: BTreeMap::from([(
                en.clone(),
                NamesRecord {
                    names: NameTable::from([(de_at.clone(), "German (Austria)".to_string())]),
                },
            )]),
            meta: Some(MetaRecord {
                locales: vec![de_at, en],
                aliases: Default::default(),
            }),
        };

        assert_eq!(write_output(dir.path(), &output, false).unwrap(), 2);

        let en_json = fs::read_to_string(dir.path().join("en.json")).unwrap();
        assert_eq!(en_json, "{\"Names\":{\"de_AT\":\"German (Austria)\"}}\n");
        let meta_json = fs::read_to_string(dir.path().join(META_FILE)).unwrap();
        assert_eq!(meta_json, "{\"Locales\":[\"de_AT\",\"en\"],\"Aliases\":{}}\n");
    }
}
