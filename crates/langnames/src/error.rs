use std::path::PathBuf;

use thiserror::Error;

use crate::locale::{LocaleParseError, LocaleTag};

/// A per-target lookup failure. Drops one candidate name, never the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MissingResource {
    #[error("no `{key}` entry for locale `{locale}`")]
    MissingEntry { locale: LocaleTag, key: String },

    #[error("`{code}` is not an ISO region code")]
    InvalidRegion { code: String },
}

#[derive(Debug, Error)]
pub enum BundleError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("yaml error in {origin}: {msg}")]
    Yaml { origin: String, msg: String },

    #[error(transparent)]
    Locale(#[from] LocaleParseError),
}

#[derive(Debug, Error)]
pub enum GenerateError {
    /// The fallback walk from `locale` passed through an alias. Source data never does this,
    /// so the inputs are corrupt.
    #[error("fallback chain of `{locale}` passes through alias `{alias}`")]
    AliasInFallbackChain { locale: LocaleTag, alias: LocaleTag },
}
