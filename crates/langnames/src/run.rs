use std::collections::BTreeMap;

use rayon::prelude::*;
use tracing::info;

use crate::bundle::ResourceReader;
use crate::cache::FallbackCache;
use crate::compose::DisplayPattern;
use crate::error::GenerateError;
use crate::fallback::FallbackMapping;
use crate::generate::{NameTableGenerator, NamesRecord};
use crate::inventory::LocaleInventory;
use crate::locale::LocaleTag;
use crate::meta::{emit_meta, MetaRecord};

#[derive(Clone, Debug)]
pub struct RunOptions {
    /// Generate display locales on the rayon pool.
    pub parallel: bool,
    pub default_pattern: DisplayPattern,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            default_pattern: DisplayPattern::default(),
        }
    }
}

/// Everything one run produces, ready for a writer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunOutput {
    /// Only display locales with a non-empty table appear.
    pub names: BTreeMap<LocaleTag, NamesRecord>,
    pub meta: Option<MetaRecord>,
}

/// Generate the name tables of every display locale plus the run metadata.
///
/// The fallback mapping is built first; an alias inside any fallback chain aborts the
/// run before a single table is generated. Each run starts from an empty cache.
pub fn generate_all<R>(
    inventory: &LocaleInventory,
    reader: &R,
    options: &RunOptions,
) -> Result<RunOutput, GenerateError>
where
    R: ResourceReader + ?Sized,
{
    let mapping = FallbackMapping::build(inventory)?;
    let cache = FallbackCache::new();
    let generator = NameTableGenerator::new(inventory, &mapping, reader, &cache)
        .with_default_pattern(options.default_pattern.clone());

    let locales: Vec<&LocaleTag> = inventory.display_locales().collect();
    let generate = |locale: &&LocaleTag| {
        generator
            .generate(locale)
            .map(|record| ((*locale).clone(), record))
    };
    let names: BTreeMap<_, _> = if options.parallel {
        locales.par_iter().filter_map(generate).collect()
    } else {
        locales.iter().filter_map(generate).collect()
    };

    info!(
        display_locales = locales.len(),
        emitted = names.len(),
        tables_built = cache.computed(),
        "generated locale names"
    );

    Ok(RunOutput {
        names,
        meta: emit_meta(inventory),
    })
}
