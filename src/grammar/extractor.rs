//! Keyword extraction from grammar match expressions
//!
//! Keyword rules in the grammar take the shape `\b(TOKEN|TOKEN|...)\b`. The
//! extractor does not evaluate these as regular expressions; a small parser
//! tokenizes each expression on the `\b(` opener, the `|` separators and the
//! `)\b` closer. Anything that is not a plain literal alternation (numeric
//! literal matchers, punctuation, non-capturing or nested groups) is skipped.

use std::collections::BTreeSet;
use std::fmt;
use std::ops::Deref;

use tracing::{debug, trace};

use super::loader::GrammarDocument;

const GROUP_OPEN: &str = r"\b(";
const GROUP_CLOSE: &str = r"\b";
const ALTERNATION: char = '|';

/// Characters that make a token something other than a literal keyword.
const REGEX_METACHARACTERS: &[char] = &['\\', '.', '*', '+', '?', '(', ')', '[', ']', '{', '}', '^', '$'];

/// A literal keyword as written in the grammar. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RawKeyword(String);

impl RawKeyword {
    /// Returns `None` for empty tokens.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.is_empty() { None } else { Some(Self(token)) }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Deref for RawKeyword {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RawKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extracts the unique keyword set from every alternation rule in the
/// grammar, sorted ascending.
pub fn extract_keywords(document: &GrammarDocument) -> Vec<RawKeyword> {
    let mut keywords = BTreeSet::new();
    let mut matched_rules = 0usize;

    for (group, expr) in document.match_expressions() {
        let alternations = parse_alternations(expr);
        if alternations.is_empty() {
            trace!("Rule in '{}' is not a keyword alternation: {}", group, expr);
            continue;
        }

        matched_rules += 1;
        for tokens in alternations {
            keywords.extend(tokens);
        }
    }

    debug!(
        "Extracted {} keywords from {} alternation rules",
        keywords.len(),
        matched_rules
    );
    keywords.into_iter().collect()
}

/// Parses every `\b(A|B|...)\b` group in `expr`.
///
/// An opener whose body is not followed by `)\b`, or whose tokens are not
/// plain literals, is rejected as a whole and scanning resumes after it.
/// Empty alternatives are dropped.
///
/// Unlike a first-match scan, every group in the expression is returned, so
/// `\b(OPENFILE)\b\s+\b(READ|WRITE)\b` yields both `OPENFILE` and
/// `READ`/`WRITE`.
pub fn parse_alternations(expr: &str) -> Vec<Vec<RawKeyword>> {
    let mut groups = Vec::new();
    let mut rest = expr;

    while let Some(open) = rest.find(GROUP_OPEN) {
        let after_open = &rest[open + GROUP_OPEN.len()..];

        match parse_group_body(after_open) {
            Some((tokens, consumed)) => {
                if !tokens.is_empty() {
                    groups.push(tokens);
                }
                rest = &after_open[consumed..];
            }
            None => rest = after_open,
        }
    }

    groups
}

/// Parses the body following an opener up to and including `)\b`.
/// Returns the tokens and the number of bytes consumed.
fn parse_group_body(input: &str) -> Option<(Vec<RawKeyword>, usize)> {
    let close = input.find(')')?;
    let body = &input[..close];
    if body.is_empty() || !input[close + 1..].starts_with(GROUP_CLOSE) {
        return None;
    }

    let mut tokens = Vec::new();
    for token in body.split(ALTERNATION) {
        if token.contains(REGEX_METACHARACTERS) {
            return None;
        }
        tokens.extend(RawKeyword::new(token));
    }

    Some((tokens, close + 1 + GROUP_CLOSE.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::loader::parse_grammar;
    use quickcheck::{QuickCheck, TestResult};

    fn tokens(groups: Vec<Vec<RawKeyword>>) -> Vec<Vec<String>> {
        groups
            .into_iter()
            .map(|group| group.into_iter().map(RawKeyword::into_string).collect())
            .collect()
    }

    fn grammar_with_rules(groups: &[(&str, Vec<&str>)]) -> GrammarDocument {
        let repository: serde_json::Map<String, serde_json::Value> = groups
            .iter()
            .map(|(name, rules)| {
                let patterns: Vec<_> = rules.iter().map(|m| serde_json::json!({ "match": m })).collect();
                (name.to_string(), serde_json::json!({ "patterns": patterns }))
            })
            .collect();
        let text = serde_json::json!({ "repository": repository }).to_string();
        parse_grammar(&text).unwrap()
    }

    #[test]
    fn test_parse_simple_alternation() {
        let groups = parse_alternations(r"\b(IF|ELSE|ENDIF)\b");
        assert_eq!(tokens(groups), vec![vec!["IF", "ELSE", "ENDIF"]]);
    }

    #[test]
    fn test_parse_single_token_group() {
        let groups = parse_alternations(r"\b(DECLARE)\b");
        assert_eq!(tokens(groups), vec![vec!["DECLARE"]]);
    }

    #[test]
    fn test_parse_drops_empty_tokens() {
        let groups = parse_alternations(r"\b(|IF||ELSE|)\b");
        assert_eq!(tokens(groups), vec![vec!["IF", "ELSE"]]);
    }

    #[test]
    fn test_parse_rejects_non_alternation_shapes() {
        assert!(parse_alternations("[0-9]+").is_empty());
        assert!(parse_alternations(r"\b[0-9]+(\.[0-9]+)?\b").is_empty());
        assert!(parse_alternations(r"(IF|ELSE)").is_empty());
        assert!(parse_alternations(r"\b(IF|ELSE)").is_empty());
        assert!(parse_alternations(r"\b()\b").is_empty());
        assert!(parse_alternations("").is_empty());
    }

    #[test]
    fn test_parse_rejects_regex_tokens() {
        // Non-capturing and character-class groups are not literal keywords
        assert!(parse_alternations(r"\b(?:IF|ELSE)\b").is_empty());
        assert!(parse_alternations(r"\b(IF|ELSE[A-Z]*)\b").is_empty());
        assert!(parse_alternations(r"\b(a.b|c)\b").is_empty());
    }

    #[test]
    fn test_parse_skips_bad_opener_and_finds_later_group() {
        let groups = parse_alternations(r"\b(x)y \b(TRUE|FALSE)\b");
        assert_eq!(tokens(groups), vec![vec!["TRUE", "FALSE"]]);
    }

    #[test]
    fn test_parse_extracts_every_group() {
        let groups = parse_alternations(r"\b(OPENFILE)\b\s+\b(READ|WRITE|APPEND)\b");
        assert_eq!(tokens(groups), vec![vec!["OPENFILE"], vec!["READ", "WRITE", "APPEND"]]);
    }

    #[test]
    fn test_parse_allows_prefix_flags() {
        let groups = parse_alternations(r"(?i)\b(AND|OR)\b");
        assert_eq!(tokens(groups), vec![vec!["AND", "OR"]]);
    }

    #[test]
    fn test_extract_scenario_sorted() {
        let document = grammar_with_rules(&[("keywords", vec![r"\b(IF|ELSE|ENDIF)\b"])]);
        let keywords: Vec<String> = extract_keywords(&document).into_iter().map(RawKeyword::into_string).collect();
        assert_eq!(keywords, vec!["ELSE", "ENDIF", "IF"]);
    }

    #[test]
    fn test_extract_dedups_across_groups() {
        let document = grammar_with_rules(&[
            ("constants", vec![r"\b(TRUE|FALSE)\b"]),
            ("literals", vec![r"\b(TRUE|FALSE)\b", "[0-9]+"]),
        ]);
        let keywords: Vec<String> = extract_keywords(&document).into_iter().map(RawKeyword::into_string).collect();
        assert_eq!(keywords, vec!["FALSE", "TRUE"]);
    }

    #[test]
    fn test_extract_numeric_rule_contributes_nothing() {
        let document = grammar_with_rules(&[("numbers", vec!["[0-9]+"])]);
        assert!(extract_keywords(&document).is_empty());
    }

    #[test]
    fn test_extract_keeps_substring_keywords_apart() {
        let document = grammar_with_rules(&[
            ("control", vec![r"\b(ENDIF|ENDWHILE)\b"]),
            ("branch", vec![r"\b(IF)\b"]),
        ]);
        let keywords: Vec<String> = extract_keywords(&document).into_iter().map(RawKeyword::into_string).collect();
        assert_eq!(keywords, vec!["ENDIF", "ENDWHILE", "IF"]);
    }

    #[test]
    fn test_raw_keyword_rejects_empty() {
        assert!(RawKeyword::new("").is_none());
        assert_eq!(RawKeyword::new("IF").unwrap().as_str(), "IF");
    }

    fn sanitize(words: Vec<String>) -> Vec<String> {
        words
            .into_iter()
            .map(|w| w.chars().filter(|c| c.is_ascii_alphanumeric()).collect::<String>())
            .filter(|w| !w.is_empty())
            .collect()
    }

    #[test]
    fn test_extraction_is_deterministic() {
        fn prop(first: Vec<String>, second: Vec<String>) -> TestResult {
            let first = sanitize(first);
            let second = sanitize(second);
            if first.is_empty() || second.is_empty() {
                return TestResult::discard();
            }

            let rule_a = format!(r"\b({})\b", first.join("|"));
            let rule_b = format!(r"\b({})\b", second.join("|"));
            let document = grammar_with_rules(&[("a", vec![rule_a.as_str()]), ("b", vec![rule_b.as_str()])]);

            let once = extract_keywords(&document);
            let twice = extract_keywords(&document);
            let sorted = once.windows(2).all(|pair| pair[0] < pair[1]);
            TestResult::from_bool(once == twice && sorted)
        }
        QuickCheck::new().tests(100).max_tests(1000).quickcheck(prop as fn(Vec<String>, Vec<String>) -> TestResult);
    }

    #[test]
    fn test_every_alternation_token_extracted_once() {
        fn prop(words: Vec<String>) -> TestResult {
            let words = sanitize(words);
            if words.is_empty() {
                return TestResult::discard();
            }

            let rule = format!(r"\b({})\b", words.join("|"));
            let document = grammar_with_rules(&[("a", vec![rule.as_str()]), ("b", vec![rule.as_str()])]);
            let keywords = extract_keywords(&document);

            let complete = words
                .iter()
                .all(|word| keywords.iter().filter(|k| k.as_str() == word).count() == 1);
            let unique: BTreeSet<&str> = words.iter().map(String::as_str).collect();
            TestResult::from_bool(complete && keywords.len() == unique.len())
        }
        QuickCheck::new().tests(100).max_tests(1000).quickcheck(prop as fn(Vec<String>) -> TestResult);
    }
}
