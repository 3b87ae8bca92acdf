use crate::error::MissingResource;
use crate::region::is_iso_region;

pub const DEFAULT_PATTERN: &str = "{0} ({1})";
pub const DEFAULT_SEPARATOR: &str = "{0}, {1}";

/// The `localeDisplayPattern` of a display locale.
///
/// - `pattern`: `{0}` is the language name, `{1}` the parenthesized extras.
/// - `separator`: joins two extras, `{0}` the accumulated text, `{1}` the next extra.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayPattern {
    pub pattern: String,
    pub separator: String,
}

impl Default for DisplayPattern {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.to_string(),
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

/// Localized fragments naming one target locale.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameFragments<'a> {
    pub language: &'a str,
    pub script: Option<&'a str>,
    pub region: Option<&'a str>,
}

/// Reject region subtags that are not ISO 3166-1 alpha-2 codes.
///
/// UN M.49 numeric regions fail too, so locales such as `es_419` (Latin American
/// Spanish) and `en_001` get no entry in any name table.
pub fn check_region(code: &str) -> Result<(), MissingResource> {
    if is_iso_region(code) {
        Ok(())
    } else {
        Err(MissingResource::InvalidRegion {
            code: code.to_string(),
        })
    }
}

/// Compose the display name for one target locale.
///
/// `German` + `Austria` -> `German (Austria)`;
/// `Chinese` + `Simplified Han` + `Macao` -> `Chinese (Simplified Han, Macao)`.
pub fn compose_name(fragments: &NameFragments<'_>, pattern: &DisplayPattern) -> String {
    let language = escape_parens(fragments.language);

    let extra = [fragments.script, fragments.region]
        .into_iter()
        .flatten()
        .map(escape_parens)
        .reduce(|acc, next| apply_positional(&pattern.separator, &[acc.as_str(), next.as_str()]));

    match extra {
        Some(extra) => apply_positional(&pattern.pattern, &[language.as_str(), extra.as_str()]),
        None => language,
    }
}

/// Parentheses inside a fragment would nest inside the pattern's own, so CLDR swaps them
/// for brackets.
pub fn escape_parens(s: &str) -> String {
    s.replace('(', "[").replace(')', "]")
}

/// Replace `{0}`, `{1}`, ... with `args` in a single left-to-right pass.
///
/// Substituted text is never rescanned. Unknown or malformed placeholders stay literal.
fn apply_positional(tmpl: &str, args: &[&str]) -> String {
    if !tmpl.contains('{') {
        return tmpl.to_string();
    }

    let mut out = String::with_capacity(tmpl.len() + args.iter().map(|a| a.len()).sum::<usize>());
    let mut rest = tmpl;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let Some(close) = after.find('}') else {
            // No closing brace: the rest is literal text.
            out.push_str(&rest[open..]);
            return out;
        };

        match after[..close].parse::<usize>().ok().and_then(|i| args.get(i)) {
            Some(arg) => out.push_str(arg),
            None => out.push_str(&rest[open..open + close + 2]),
        }
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    out
}
