//! Localized locale display names
//!
//! For every display locale, derives the names of all other known locales in the display
//! locale's own language, then keeps only the entries the locale does not already inherit
//! through its fallback chain.
//!
//! Pipeline:
//! - [`LocaleInventory`]: known locales plus the alias table
//! - [`FallbackMapping`]: nearest ancestor with data for each display locale
//! - [`compose_name`]: language/script/region fragments -> `German (Austria)`
//! - [`NameTableGenerator`]: candidate tables pruned against the fallback chain, memoized
//!   in a shared [`FallbackCache`]
//! - [`emit_meta`]: the run-wide locale list and aliases
//!
//! [`generate_all`] drives a whole run over a [`ResourceReader`], e.g. YAML [`BundleSet`]s.

mod bundle;
mod cache;
mod compose;
mod error;
mod fallback;
mod generate;
mod inventory;
mod locale;
mod meta;
mod region;
mod run;

pub use bundle::{BundleKind, BundleSet, ResourceReader};
pub use cache::FallbackCache;
pub use compose::{
    check_region, compose_name, escape_parens, DisplayPattern, NameFragments, DEFAULT_PATTERN,
    DEFAULT_SEPARATOR,
};
pub use error::{BundleError, GenerateError, MissingResource};
pub use fallback::FallbackMapping;
pub use generate::{NameTable, NameTableGenerator, NamesRecord, PATTERN_KEY, SEPARATOR_KEY};
pub use inventory::{parse_aliases, scan_aliases, scan_locales, AliasTable, LocaleInventory};
pub use locale::{normalize_locale, LocaleParseError, LocaleTag, ROOT};
pub use meta::{emit_meta, MetaRecord};
pub use region::is_iso_region;
pub use run::{generate_all, RunOptions, RunOutput};
