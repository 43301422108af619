// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Compile and apply the colrules/tagrules pattern sets.
// Author: Lukas Bower

//! Rulesets.
//!
//! A ruleset file is one clause per line, `/pattern/ -> value`. The raw
//! text is what clients read back; the compiled clauses are rebuilt from it
//! when the file's handle is clunked. Malformed clauses are skipped, not
//! fatal: a half-written rules file must never wedge the window manager.

use log::warn;
use regex::Regex;

/// One compiled clause.
#[derive(Debug, Clone)]
pub struct Rule {
    /// Pattern matched against a tag name (colrules) or a client's
    /// property string (tagrules).
    pub pattern: Regex,
    /// Right-hand side: a column layout or a tag list.
    pub value: String,
}

/// Raw rule text plus its compiled clauses.
#[derive(Debug, Default)]
pub struct Ruleset {
    text: Vec<u8>,
    rules: Vec<Rule>,
}

impl Ruleset {
    /// Construct a ruleset from initial text, compiling it immediately.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let mut ruleset = Self {
            text: text.as_bytes().to_vec(),
            rules: Vec::new(),
        };
        ruleset.compile();
        ruleset
    }

    /// The raw pattern text.
    #[must_use]
    pub fn text(&self) -> &[u8] {
        &self.text
    }

    /// Mutable access to the raw pattern text.
    pub fn text_mut(&mut self) -> &mut Vec<u8> {
        &mut self.text
    }

    /// Recompile the clause list from the current text.
    pub fn compile(&mut self) {
        self.rules.clear();
        let text = String::from_utf8_lossy(&self.text);
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match parse_clause(line) {
                Some(rule) => self.rules.push(rule),
                None => warn!("skipping malformed rule clause: {line}"),
            }
        }
    }

    /// Number of compiled clauses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no clauses are compiled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Value of the first clause whose pattern matches `subject`.
    #[must_use]
    pub fn first_match(&self, subject: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.pattern.is_match(subject))
            .map(|rule| rule.value.as_str())
    }
}

fn parse_clause(line: &str) -> Option<Rule> {
    let (lhs, rhs) = line.split_once("->")?;
    let lhs = lhs.trim();
    let pattern = lhs.strip_prefix('/')?.strip_suffix('/')?;
    let value = rhs.trim();
    if value.is_empty() {
        return None;
    }
    let pattern = Regex::new(pattern).ok()?;
    Some(Rule {
        pattern,
        value: value.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_one_clause_per_line() {
        let rules = Ruleset::from_text("/Firefox.*/ -> web\n/.*term.*/ -> term+dev\n");
        assert_eq!(rules.len(), 2);
        assert_eq!(rules.first_match("Firefox:Navigator"), Some("web"));
        assert_eq!(rules.first_match("xterm:XTerm"), Some("term+dev"));
        assert_eq!(rules.first_match("gimp"), None);
    }

    #[test]
    fn malformed_clauses_are_skipped() {
        let rules = Ruleset::from_text("not a rule\n/ok.*/ -> fine\n/broken( / -> no\n");
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn first_match_wins() {
        let rules = Ruleset::from_text("/a.*/ -> first\n/ab.*/ -> second\n");
        assert_eq!(rules.first_match("abc"), Some("first"));
    }

    #[test]
    fn recompile_replaces_clauses() {
        let mut rules = Ruleset::from_text("/x/ -> one\n");
        rules.text_mut().clear();
        rules.text_mut().extend_from_slice(b"/y/ -> two\n/z/ -> three\n");
        rules.compile();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules.first_match("z"), Some("three"));
    }
}
