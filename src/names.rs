// Legislator name normalization.
//
// Result rows carry whatever name the transcript used, which often has
// procedural decorations: "AKIRA OTSUBO (PRESIDENTE)", "FULANO, PELA
// ORDEM", "FULANA - PARLAMENTAR JOVEM". The store keys legislators by
// their bare parliamentary name, so those suffixes are stripped before
// lookup. This is a heuristic, not an algorithm; keep it out of the
// modeling core.

use std::sync::OnceLock;

use deunicode::deunicode;
use regex_lite::Regex;

fn parenthetical() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*\([^)]*\)\s*$").unwrap())
}

fn trailing_comma() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*,.*$").unwrap())
}

fn dash_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Requires whitespace before the dash so hyphenated names survive
    RE.get_or_init(|| Regex::new(r"\s+-.*$").unwrap())
}

/// Strip procedural suffixes from a transcript name.
pub fn strip_legislator_name(name: &str) -> String {
    let name = parenthetical().replace(name, "");
    let name = trailing_comma().replace(&name, "");
    let name = dash_suffix().replace(&name, "");
    name.trim().to_string()
}

/// ASCII transliteration, the diacritics-stripped fallback lookup key.
pub fn transliterate(name: &str) -> String {
    deunicode(name)
}

/// Rails-style parameterize for dashboard slugs.
pub fn parameterize(title: &str) -> String {
    static UNWANTED: OnceLock<Regex> = OnceLock::new();
    static REPEATED: OnceLock<Regex> = OnceLock::new();
    let unwanted = UNWANTED.get_or_init(|| Regex::new(r"[^a-z0-9\-_]+").unwrap());
    let repeated = REPEATED.get_or_init(|| Regex::new(r"-{2,}").unwrap());

    let ascii = transliterate(title).to_lowercase();
    let slug = unwanted.replace_all(&ascii, "-");
    let slug = repeated.replace_all(&slug, "-");
    slug.trim_matches('-').to_string()
}
