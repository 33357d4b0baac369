//! `{{token}}` substitution.
//!
//! One left-to-right scan. Substituted values are never re-scanned, so a
//! sample containing `{{x}}` cannot recurse. Tokens with no value are kept
//! verbatim so unresolved placeholders stay visible in previews.

use std::collections::BTreeMap;

use herald_core::catalog::Catalog;
use serde::Serialize;

/// At most this many numbered template variables are offered for input.
pub const MAX_TEMPLATE_VARIABLES: usize = 2;

/// A run of literal text or a `{{token}}` occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Piece<'a> {
    Text(&'a str),
    Token(&'a str),
}

/// Iterator splitting text into literal runs and tokens.
pub struct Pieces<'a> {
    rest: &'a str,
    is_token_char: fn(char) -> bool,
}

impl<'a> Pieces<'a> {
    pub fn new(text: &'a str, is_token_char: fn(char) -> bool) -> Self {
        Self {
            rest: text,
            is_token_char,
        }
    }
}

impl<'a> Iterator for Pieces<'a> {
    type Item = Piece<'a>;

    fn next(&mut self) -> Option<Piece<'a>> {
        let rest = self.rest;
        if rest.is_empty() {
            return None;
        }
        let mut from = 0;
        loop {
            let Some(offset) = rest[from..].find("{{") else {
                self.rest = "";
                return Some(Piece::Text(rest));
            };
            let start = from + offset;
            let after = &rest[start + 2..];
            let len = after
                .find(|c: char| !(self.is_token_char)(c))
                .unwrap_or(after.len());
            if len == 0 || !after[len..].starts_with("}}") {
                // Not a token here; retry one character later so `{{{a}}}`
                // still finds `{{a}}`.
                from = start + 1;
                continue;
            }
            if start > 0 {
                self.rest = &rest[start..];
                return Some(Piece::Text(&rest[..start]));
            }
            self.rest = &after[len + 2..];
            return Some(Piece::Token(&after[..len]));
        }
    }
}

/// `[a-zA-Z0-9_]`
pub fn is_placeholder_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// `[0-9]`
pub fn is_template_var_char(c: char) -> bool {
    c.is_ascii_digit()
}

fn substitute(text: &str, is_token_char: fn(char) -> bool, values: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(text.len());
    for piece in Pieces::new(text, is_token_char) {
        match piece {
            Piece::Text(t) => out.push_str(t),
            Piece::Token(key) => match values.get(key) {
                Some(value) => out.push_str(value),
                None => {
                    out.push_str("{{");
                    out.push_str(key);
                    out.push_str("}}");
                }
            },
        }
    }
    out
}

/// Replace `{{key}}` with its sample value; unknown keys stay as written.
pub fn render_with_samples(text: &str, samples: &BTreeMap<String, String>) -> String {
    substitute(text, is_placeholder_char, samples)
}

/// Replace numbered `{{1}}` tokens in a template body.
pub fn render_template(body: &str, vars: &BTreeMap<String, String>) -> String {
    substitute(body, is_template_var_char, vars)
}

/// Every `{{key}}` token in order of appearance, duplicates included.
pub fn placeholder_keys(text: &str) -> Vec<&str> {
    tokens(text, is_placeholder_char).collect()
}

/// Distinct numbered variables in a template body, first two only.
///
/// A body may use `{{3}}` and beyond; those are never offered for input
/// and render verbatim.
pub fn extract_template_variables(body: &str) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for token in tokens(body, is_template_var_char) {
        if ids.len() == MAX_TEMPLATE_VARIABLES {
            break;
        }
        if !ids.iter().any(|id| id == token) {
            ids.push(token.to_string());
        }
    }
    ids
}

/// Whether `text` has at most `max` numbered tokens (duplicates counted).
pub fn max_vars(text: &str, max: usize) -> bool {
    tokens(text, is_template_var_char).count() <= max
}

fn tokens(text: &str, is_token_char: fn(char) -> bool) -> impl Iterator<Item = &str> {
    Pieces::new(text, is_token_char).filter_map(|piece| match piece {
        Piece::Token(t) => Some(t),
        Piece::Text(_) => None,
    })
}

/// Placeholder usage in a message body checked against the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceholderCheck {
    /// Keys used in the text that the catalog does not define.
    pub invalid: Vec<String>,
    /// Total placeholder tokens in the text.
    pub count: usize,
}

impl PlaceholderCheck {
    pub fn is_valid(&self) -> bool {
        self.invalid.is_empty()
    }
}

pub fn validate_placeholders(text: &str, catalog: &Catalog) -> PlaceholderCheck {
    let keys = placeholder_keys(text);
    let invalid = keys
        .iter()
        .filter(|key| !catalog.has_placeholder(key))
        .map(|key| key.to_string())
        .collect();
    PlaceholderCheck {
        invalid,
        count: keys.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_unknown_key_left_verbatim() {
        let out = render_with_samples(
            "Hi {{first_name}}, bye {{unknown_key}}",
            &map(&[("first_name", "Ana")]),
        );
        assert_eq!(out, "Hi Ana, bye {{unknown_key}}");
    }

    #[test]
    fn test_no_recursive_substitution() {
        let out = render_with_samples("{{a}}", &map(&[("a", "{{b}}"), ("b", "boom")]));
        assert_eq!(out, "{{b}}");
    }

    #[test]
    fn test_malformed_tokens_untouched() {
        let samples = map(&[("a", "A")]);
        assert_eq!(render_with_samples("{{}}", &samples), "{{}}");
        assert_eq!(render_with_samples("{{a b}}", &samples), "{{a b}}");
        assert_eq!(render_with_samples("{{a}", &samples), "{{a}");
        assert_eq!(render_with_samples("{a}}", &samples), "{a}}");
        assert_eq!(render_with_samples("{{{a}}}", &samples), "{A}");
        assert_eq!(render_with_samples("{{a}}{{a}}", &samples), "AA");
    }

    #[test]
    fn test_unicode_around_tokens() {
        let out = render_with_samples("Olá {{first_name}} ☕", &map(&[("first_name", "Ana")]));
        assert_eq!(out, "Olá Ana ☕");
    }

    #[test]
    fn test_template_only_numbers() {
        let vars = map(&[("1", "Ana"), ("first_name", "nope")]);
        assert_eq!(
            render_template("Hi {{1}} {{first_name}} {{2}}", &vars),
            "Hi Ana {{first_name}} {{2}}"
        );
    }

    #[test]
    fn test_extract_dedups_and_caps_at_two() {
        assert_eq!(
            extract_template_variables("{{2}} {{1}} {{2}} {{3}}"),
            vec!["2".to_string(), "1".to_string()]
        );
        assert_eq!(extract_template_variables("{{1}} and {{1}}"), vec!["1".to_string()]);
        assert!(extract_template_variables("no vars {{name}}").is_empty());
    }

    #[test]
    fn test_max_vars_counts_duplicates() {
        assert!(max_vars("{{1}} {{2}}", 2));
        assert!(!max_vars("{{1}} {{1}} {{1}}", 2));
        assert!(max_vars("plain", 0));
    }

    #[test]
    fn test_pieces_split() {
        let pieces: Vec<Piece> = Pieces::new("a{{b}}c", is_placeholder_char).collect();
        assert_eq!(
            pieces,
            vec![Piece::Text("a"), Piece::Token("b"), Piece::Text("c")]
        );
        assert_eq!(Pieces::new("", is_placeholder_char).count(), 0);
    }

    #[test]
    fn test_validate_placeholders_against_catalog() {
        let catalog = Catalog::demo();
        let check = validate_placeholders("Hi {{first_name}} {{shoe_size}} {{city}}", &catalog);
        assert_eq!(check.count, 3);
        assert_eq!(check.invalid, vec!["shoe_size".to_string()]);
        assert!(!check.is_valid());
        assert!(validate_placeholders("plain", &catalog).is_valid());
    }
}
