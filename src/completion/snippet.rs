//! Structured snippet templates
//!
//! Templates are authored in LSP snippet syntax (`${1:condition}`, `$2`,
//! `$0`) and parsed into parts so the registry can be inspected: which tab
//! stops exist, what default text a placeholder carries, and what literal
//! text surrounds the final cursor stop.

use std::fmt::Write as _;

use thiserror::Error;

/// One piece of a snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnippetPart {
    /// Literal text inserted as-is.
    Text(String),
    /// `${index:default}`: a tab stop pre-filled with default text.
    Placeholder { index: u32, default: String },
    /// `$index` with `index >= 1`: an empty tab stop.
    TabStop(u32),
    /// `$0`: where the cursor lands once every tab stop has been visited.
    FinalStop,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnippetError {
    #[error("unterminated placeholder starting at byte {0}")]
    UnterminatedPlaceholder(usize),

    #[error("expected tab stop index at byte {0}")]
    MissingIndex(usize),

    #[error("placeholder at byte {0} uses index 0, which cannot carry default text")]
    DefaultOnFinalStop(usize),

    #[error("dangling escape at end of template")]
    DanglingEscape,
}

/// A parsed insertion template.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snippet {
    parts: Vec<SnippetPart>,
}

impl Snippet {
    pub fn parts(&self) -> &[SnippetPart] {
        &self.parts
    }

    /// Parses LSP snippet syntax. Supports `$n`, `${n}`, `${n:default}` and
    /// `\`-escapes of `$`, `}` and `\`.
    pub fn parse(template: &str) -> Result<Self, SnippetError> {
        let mut parts = Vec::new();
        let mut text = String::new();
        let bytes = template.as_bytes();
        let mut pos = 0;

        while pos < bytes.len() {
            match bytes[pos] {
                b'\\' => {
                    let escaped = template[pos + 1..].chars().next().ok_or(SnippetError::DanglingEscape)?;
                    if !matches!(escaped, '$' | '}' | '\\') {
                        text.push('\\');
                    }
                    text.push(escaped);
                    pos += 1 + escaped.len_utf8();
                }
                b'$' => {
                    let (part, next) = parse_stop(template, pos)?;
                    if !text.is_empty() {
                        parts.push(SnippetPart::Text(std::mem::take(&mut text)));
                    }
                    parts.push(part);
                    pos = next;
                }
                _ => {
                    let ch = template[pos..].chars().next().unwrap_or_default();
                    text.push(ch);
                    pos += ch.len_utf8();
                }
            }
        }

        if !text.is_empty() {
            parts.push(SnippetPart::Text(text));
        }
        Ok(Self { parts })
    }

    /// Renders back to LSP snippet syntax.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                SnippetPart::Text(text) => escape_into(&mut out, text),
                SnippetPart::Placeholder { index, default } => {
                    let _ = write!(out, "${{{}:", index);
                    escape_into(&mut out, default);
                    out.push('}');
                }
                SnippetPart::TabStop(index) => {
                    let _ = write!(out, "${}", index);
                }
                SnippetPart::FinalStop => out.push_str("$0"),
            }
        }
        out
    }

    /// The text a user sees right after insertion, with placeholders showing
    /// their defaults and empty stops removed.
    pub fn preview(&self) -> String {
        self.parts
            .iter()
            .map(|part| match part {
                SnippetPart::Text(text) => text.as_str(),
                SnippetPart::Placeholder { default, .. } => default.as_str(),
                SnippetPart::TabStop(_) | SnippetPart::FinalStop => "",
            })
            .collect()
    }

    /// Distinct tab stop indices in visiting order (ascending, `$0` excluded).
    pub fn tab_stops(&self) -> Vec<u32> {
        let mut stops: Vec<u32> = self
            .parts
            .iter()
            .filter_map(|part| match part {
                SnippetPart::Placeholder { index, .. } | SnippetPart::TabStop(index) => Some(*index),
                _ => None,
            })
            .collect();
        stops.sort_unstable();
        stops.dedup();
        stops
    }

    pub fn has_final_stop(&self) -> bool {
        self.parts.contains(&SnippetPart::FinalStop)
    }

    /// Literal text following the final stop, trimmed; the construct's
    /// terminator for block templates.
    pub fn text_after_final_stop(&self) -> Option<String> {
        let final_stop = self.parts.iter().position(|part| *part == SnippetPart::FinalStop)?;
        let trailing: String = self.parts[final_stop + 1..]
            .iter()
            .map(|part| match part {
                SnippetPart::Text(text) => text.as_str(),
                SnippetPart::Placeholder { default, .. } => default.as_str(),
                _ => "",
            })
            .collect();
        let trailing = trailing.trim();
        if trailing.is_empty() { None } else { Some(trailing.to_string()) }
    }
}

/// Parses a `$...` stop starting at `start`. Returns the part and the byte
/// offset just past it.
fn parse_stop(template: &str, start: usize) -> Result<(SnippetPart, usize), SnippetError> {
    let after_dollar = start + 1;
    let braced = template[after_dollar..].starts_with('{');
    let digits_start = if braced { after_dollar + 1 } else { after_dollar };

    let digits_len = template[digits_start..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return Err(SnippetError::MissingIndex(start));
    }
    let digits_end = digits_start + digits_len;
    let index: u32 = template[digits_start..digits_end]
        .parse()
        .map_err(|_| SnippetError::MissingIndex(start))?;

    if !braced {
        return Ok((stop_part(index), digits_end));
    }

    match template[digits_end..].chars().next() {
        Some('}') => Ok((stop_part(index), digits_end + 1)),
        Some(':') => {
            if index == 0 {
                return Err(SnippetError::DefaultOnFinalStop(start));
            }
            let (default, next) = parse_default(template, digits_end + 1)
                .ok_or(SnippetError::UnterminatedPlaceholder(start))?;
            Ok((SnippetPart::Placeholder { index, default }, next))
        }
        _ => Err(SnippetError::UnterminatedPlaceholder(start)),
    }
}

/// Reads placeholder default text up to the unescaped closing brace.
fn parse_default(template: &str, start: usize) -> Option<(String, usize)> {
    let mut default = String::new();
    let mut chars = template[start..].char_indices();

    while let Some((offset, ch)) = chars.next() {
        match ch {
            '}' => return Some((default, start + offset + 1)),
            '\\' => {
                let (_, escaped) = chars.next()?;
                if !matches!(escaped, '$' | '}' | '\\') {
                    default.push('\\');
                }
                default.push(escaped);
            }
            _ => default.push(ch),
        }
    }
    None
}

fn stop_part(index: u32) -> SnippetPart {
    if index == 0 { SnippetPart::FinalStop } else { SnippetPart::TabStop(index) }
}

fn escape_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        if matches!(ch, '$' | '}' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_block_template() {
        let snippet = Snippet::parse("IF ${1:condition} THEN\n\t$0\nENDIF").unwrap();
        assert_eq!(
            snippet.parts(),
            &[
                SnippetPart::Text("IF ".to_string()),
                SnippetPart::Placeholder { index: 1, default: "condition".to_string() },
                SnippetPart::Text(" THEN\n\t".to_string()),
                SnippetPart::FinalStop,
                SnippetPart::Text("\nENDIF".to_string()),
            ]
        );
        assert_eq!(snippet.tab_stops(), vec![1]);
        assert_eq!(snippet.text_after_final_stop().as_deref(), Some("ENDIF"));
        assert_eq!(snippet.preview(), "IF condition THEN\n\t\nENDIF");
    }

    #[test]
    fn test_parse_bare_and_braced_stops() {
        let snippet = Snippet::parse("CASE ${1:expression} OF\n\t$2\n\t${3}\nENDCASE").unwrap();
        assert_eq!(snippet.tab_stops(), vec![1, 2, 3]);
        assert!(!snippet.has_final_stop());
        assert!(snippet.text_after_final_stop().is_none());
    }

    #[test]
    fn test_repeated_placeholder_counts_once() {
        let snippet = Snippet::parse("FOR ${1:i} <- ${2:init} TO ${3:end}\n\t$0\nNEXT ${1:i}").unwrap();
        assert_eq!(snippet.tab_stops(), vec![1, 2, 3]);
        assert_eq!(snippet.text_after_final_stop().as_deref(), Some("NEXT i"));
    }

    #[test]
    fn test_round_trip_with_escapes() {
        let template = r#"OUTPUT "\$${1:amount\}}" $0"#;
        let snippet = Snippet::parse(template).unwrap();
        assert_eq!(
            snippet.parts()[0],
            SnippetPart::Text("OUTPUT \"$".to_string())
        );
        assert_eq!(
            snippet.parts()[1],
            SnippetPart::Placeholder { index: 1, default: "amount}".to_string() }
        );
        assert_eq!(snippet.render(), template);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Snippet::parse("IF ${1:cond"), Err(SnippetError::UnterminatedPlaceholder(3)));
        assert_eq!(Snippet::parse("cost $x"), Err(SnippetError::MissingIndex(5)));
        assert_eq!(Snippet::parse("${0:x}"), Err(SnippetError::DefaultOnFinalStop(0)));
        assert_eq!(Snippet::parse("abc\\"), Err(SnippetError::DanglingEscape));
        assert_eq!(Snippet::parse("${1"), Err(SnippetError::UnterminatedPlaceholder(0)));
    }

    #[test]
    fn test_no_terminator_after_final_stop() {
        let snippet = Snippet::parse("ELSE\n\t$0").unwrap();
        assert!(snippet.has_final_stop());
        assert!(snippet.text_after_final_stop().is_none());
    }
}
