// src/rules/mod.rs
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod defaults;
pub mod store;

/// Shift-code substitution rules: short duty codes mapped to their expanded
/// descriptions. Application order is longest code first (ties by key order),
/// independent of the map's own iteration order, so a two-character code is
/// never shadowed by a one-character code it contains.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: HashMap<String, String>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: impl Into<String>, expansion: impl Into<String>) {
        self.rules.insert(code.into(), expansion.into());
    }

    pub fn remove(&mut self, code: &str) -> Option<String> {
        self.rules.remove(code)
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        self.rules.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Expand every shift code in `text`.
    ///
    /// A code only matches a maximal whitespace-delimited token equal to it;
    /// adjacent non-whitespace on either side suppresses the match. Each code
    /// scans the whole, evolving text, so an expansion produced by a longer
    /// code is visible to the shorter codes that follow. Apply exactly once
    /// per content value: expansions may contain other codes, and a second
    /// pass could expand those too.
    pub fn apply(&self, text: &str) -> String {
        if text.is_empty() || self.rules.is_empty() {
            return text.to_string();
        }

        let mut ordered: Vec<(&str, &str)> = self
            .rules
            .iter()
            .map(|(code, expansion)| (code.as_str(), expansion.as_str()))
            .collect();
        ordered.sort_by(|a, b| {
            b.0.chars()
                .count()
                .cmp(&a.0.chars().count())
                .then_with(|| a.0.cmp(b.0))
        });

        let mut result = text.to_string();
        for (code, expansion) in ordered {
            if code.is_empty() {
                continue;
            }
            result = substitute_token(&result, code, expansion);
        }
        result
    }
}

impl<C: Into<String>, E: Into<String>> FromIterator<(C, E)> for RuleSet {
    fn from_iter<I: IntoIterator<Item = (C, E)>>(iter: I) -> Self {
        Self {
            rules: iter
                .into_iter()
                .map(|(code, expansion)| (code.into(), expansion.into()))
                .collect(),
        }
    }
}

/// Rebuild `text` with every whitespace-delimited token equal to `code`
/// replaced by `expansion`. Whitespace runs are copied verbatim.
fn substitute_token(text: &str, code: &str, expansion: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut token = String::new();

    for ch in text.chars() {
        if ch.is_whitespace() {
            if !token.is_empty() {
                out.push_str(if token == code { expansion } else { &token });
                token.clear();
            }
            out.push(ch);
        } else {
            token.push(ch);
        }
    }
    if !token.is_empty() {
        out.push_str(if token == code { expansion } else { &token });
    }
    out
}
