//! Name-to-term extraction.
//!
//! Source identifiers and ontology labels arrive as raw names ("Bank
//! Account", "m_pszAccountName", "getBalance(int)") and leave as short
//! lists of lowercase stemmed terms. The pipeline: strip diacritics and
//! bracketed segments, drop non-alphanumerics, trim Hungarian-notation
//! decoration, split camel casing, filter rejected words, then Snowball
//! stem what remains.

pub mod forest;

use ahash::AHashSet;
use once_cell::sync::Lazy;
use rust_stemmers::{Algorithm, Stemmer};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Words dropped before stemming when the configuration supplies no list.
/// Type keywords and accessor prefixes carry no matching signal.
static DEFAULT_REJECTED_WORDS: Lazy<AHashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "an", "the", "and", "or", "of", "to", "in", "on", "for", "is", "get", "set", "int",
        "char", "void", "bool", "boolean", "byte", "float", "double", "long", "short", "signed",
        "unsigned", "const", "static", "string", "str", "class", "struct", "enum", "this", "self",
        "null", "new", "delete", "return",
    ]
    .into_iter()
    .collect()
});

/// Hungarian-notation prefix tokens, in match priority order
const HUNGARIAN_PREFIXES: [&str; 27] = [
    "class", "char", "C", "rgb", "str", "ar", "by", "dw", "fd", "pt", "sz", "a", "b", "c", "d",
    "f", "h", "i", "l", "n", "o", "p", "s", "t", "u", "v", "w",
];

/// Normalize a raw name down to its bare alphanumeric form.
///
/// Diacritics are stripped via NFD decomposition, bracketed segments
/// (`(..)`, `[..]`, `{..}`) are removed wholesale, every remaining
/// non-alphanumeric character is dropped, and a Hungarian-notation prefix
/// is trimmed when one decorates the result.
pub fn clean_name(name: &str) -> String {
    let decomposed: String = name.nfd().filter(|c| !is_combining_mark(*c)).collect();
    let unbracketed = strip_bracketed(&decomposed);
    let bare: String = unbracketed
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    trim_hungarian(&bare).to_string()
}

fn strip_bracketed(name: &str) -> String {
    let mut out = name.to_string();
    for (open, close) in [('[', ']'), ('{', '}'), ('(', ')')] {
        if let (Some(start), Some(end)) = (out.find(open), out.rfind(close)) {
            if start < end {
                out.replace_range(start..=end, "");
            }
        }
    }
    out
}

/// Strip a leading Hungarian-notation decoration, keeping the capitalized
/// variable name. The whole string must fit the notation (optional scope
/// prefix, any run of type tokens, then an uppercase-led name); anything
/// else is returned unchanged.
pub fn trim_hungarian(s: &str) -> &str {
    let trimmed = s.trim();

    let body_start = ["m_", "g_", "s_", "l_"]
        .iter()
        .find(|prefix| trimmed.starts_with(*prefix))
        .map(|prefix| prefix.len())
        .unwrap_or(0);

    match varname_start(trimmed, body_start) {
        Some(start) => &trimmed[start..],
        None => trimmed,
    }
}

/// Longest-first consumption of type tokens with backtracking, mirroring a
/// greedy regex: try to consume one more token, fall back to reading the
/// variable name at the current position.
fn varname_start(s: &str, from: usize) -> Option<usize> {
    for prefix in HUNGARIAN_PREFIXES {
        if s[from..].starts_with(prefix) {
            if let Some(start) = varname_start(s, from + prefix.len()) {
                return Some(start);
            }
        }
    }

    let mut chars = s[from..].chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => {
            let rest = chars.as_str();
            if !rest.is_empty() && rest.chars().all(|c| c.is_alphanumeric() || c == '_') {
                Some(from)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Split a camel-cased or separator-delimited name into its words.
///
/// Uppercase runs followed by a lowercase letter split before their last
/// capital, so `TestCPTSmall` yields `Test`, `CPT`, `Small`; digits stay
/// attached to the word they follow.
pub fn split_camel_case(s: &str) -> Vec<String> {
    let mut result = Vec::new();
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return result;
    }

    let mut prev_is_upper = false;
    let mut prev_is_separator = true;
    let mut capitalized_word = false;
    let mut word = String::new();

    for ch in trimmed.chars() {
        let is_upper = ch.is_uppercase();
        let is_separator = matches!(ch, ' ' | '_' | '-');

        // Inside an uppercase run
        if is_upper && prev_is_upper {
            word.push(ch);
            capitalized_word = true;
        }
        // Separator: close the current word lazily
        else if is_separator {
            prev_is_upper = false;
            prev_is_separator = true;
            capitalized_word = false;
        }
        // Start of a new word
        else if prev_is_separator || (is_upper && !prev_is_upper) {
            if !word.is_empty() {
                result.push(std::mem::take(&mut word));
            }
            word.push(ch);
            prev_is_upper = is_upper;
            prev_is_separator = false;
            capitalized_word = false;
        }
        // End of an uppercase run: its last capital starts the next word
        else if !is_upper && prev_is_upper && capitalized_word {
            if let Some(last_upper) = word.pop() {
                result.push(std::mem::take(&mut word));
                word.push(last_upper);
            }
            word.push(ch);
            prev_is_upper = false;
            capitalized_word = false;
        }
        // Plain lowercase or digit continuation
        else if !is_upper {
            word.push(ch);
            prev_is_upper = false;
        }
    }

    if !word.is_empty() {
        result.push(word);
    }
    result
}

/// Name-to-term pipeline with a fixed rejected-word list and an English
/// Snowball stemmer.
pub struct TermExtractor {
    rejected: AHashSet<String>,
    stemmer: Stemmer,
}

impl TermExtractor {
    /// Create an extractor; an empty list selects the built-in defaults
    pub fn new(rejected_words: &[String]) -> Self {
        let rejected = if rejected_words.is_empty() {
            DEFAULT_REJECTED_WORDS
                .iter()
                .map(|word| (*word).to_string())
                .collect()
        } else {
            rejected_words.iter().map(|word| word.to_lowercase()).collect()
        };

        Self {
            rejected,
            stemmer: Stemmer::create(Algorithm::English),
        }
    }

    /// Extract the stemmed terms of a name, in order of appearance.
    /// Repeated words each count; names that clean down to nothing yield
    /// an empty list.
    pub fn extract(&self, name: &str) -> Vec<String> {
        let clean = clean_name(name);
        if clean.is_empty() {
            return Vec::new();
        }

        let mut terms = Vec::new();
        for word in split_camel_case(&clean) {
            let word = word.to_lowercase();
            if word.is_empty() || self.rejected.contains(word.as_str()) {
                continue;
            }
            terms.push(self.stemmer.stem(&word).to_string());
        }
        terms
    }
}

impl Default for TermExtractor {
    fn default() -> Self {
        Self::new(&[])
    }
}
