//! Log message templates and their positional values
//!
//! Templates use named placeholders such as `{Elapsed}`. Names are for the
//! reader only: values are substituted by position. `{{` and `}}` produce
//! literal braces, and a `{` without a closing `}` is kept as literal text.

use crate::error::{TimeItError, TimeItResult};
use serde::{Serialize, Serializer};
use std::fmt;
use std::time::Duration;

/// A positional value supplied to a log template.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LogValue {
    Text(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    /// Serialized as fractional milliseconds
    Elapsed(#[serde(serialize_with = "serialize_millis")] Duration),
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration_ms(*duration))
}

/// Fractional milliseconds, exact for whole microseconds.
pub(crate) fn duration_ms(duration: Duration) -> f64 {
    duration.as_nanos() as f64 / 1_000_000.0
}

impl fmt::Display for LogValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogValue::Text(s) => f.write_str(s),
            LogValue::Int(v) => write!(f, "{}", v),
            LogValue::Uint(v) => write!(f, "{}", v),
            LogValue::Float(v) => write!(f, "{}", v),
            LogValue::Bool(v) => write!(f, "{}", v),
            LogValue::Elapsed(d) => write!(f, "{:?}", d),
        }
    }
}

impl From<&str> for LogValue {
    fn from(value: &str) -> Self {
        LogValue::Text(value.to_string())
    }
}

impl From<String> for LogValue {
    fn from(value: String) -> Self {
        LogValue::Text(value)
    }
}

impl From<i32> for LogValue {
    fn from(value: i32) -> Self {
        LogValue::Int(value.into())
    }
}

impl From<i64> for LogValue {
    fn from(value: i64) -> Self {
        LogValue::Int(value)
    }
}

impl From<u32> for LogValue {
    fn from(value: u32) -> Self {
        LogValue::Uint(value.into())
    }
}

impl From<u64> for LogValue {
    fn from(value: u64) -> Self {
        LogValue::Uint(value)
    }
}

impl From<usize> for LogValue {
    fn from(value: usize) -> Self {
        LogValue::Uint(value as u64)
    }
}

impl From<f64> for LogValue {
    fn from(value: f64) -> Self {
        LogValue::Float(value)
    }
}

impl From<bool> for LogValue {
    fn from(value: bool) -> Self {
        LogValue::Bool(value)
    }
}

impl From<Duration> for LogValue {
    fn from(value: Duration) -> Self {
        LogValue::Elapsed(value)
    }
}

/// One lexical piece of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'t> {
    Literal(&'t str),
    Placeholder,
}

/// A borrowed view over a template string.
#[derive(Debug, Clone, Copy)]
pub struct Template<'t> {
    source: &'t str,
}

impl<'t> Template<'t> {
    /// Wrap a template string.
    pub fn new(source: &'t str) -> Self {
        Self { source }
    }

    /// The raw template text.
    pub fn as_str(&self) -> &'t str {
        self.source
    }

    /// Number of `{Name}` placeholders in the template.
    pub fn placeholder_count(&self) -> usize {
        self.tokens()
            .iter()
            .filter(|token| matches!(token, Token::Placeholder))
            .count()
    }

    /// Substitute `args` into the placeholders in order.
    ///
    /// Fails with [`TimeItError::TemplateArgumentMismatch`] unless there is
    /// exactly one value per placeholder.
    pub fn render(&self, args: &[LogValue]) -> TimeItResult<String> {
        let tokens = self.tokens();
        let placeholders = tokens
            .iter()
            .filter(|token| matches!(token, Token::Placeholder))
            .count();

        if placeholders != args.len() {
            return Err(TimeItError::TemplateArgumentMismatch {
                placeholders,
                arguments: args.len(),
            });
        }

        let mut out = String::with_capacity(self.source.len());
        let mut values = args.iter();
        for token in tokens {
            match token {
                Token::Literal(text) => out.push_str(text),
                Token::Placeholder => {
                    if let Some(value) = values.next() {
                        out.push_str(&value.to_string());
                    }
                }
            }
        }
        Ok(out)
    }

    fn tokens(&self) -> Vec<Token<'t>> {
        let src = self.source;
        let bytes = src.as_bytes();
        let mut tokens = Vec::new();
        let mut literal_start = 0;
        let mut i = 0;

        while i < bytes.len() {
            match bytes[i] {
                b'{' if bytes.get(i + 1) == Some(&b'{') => {
                    tokens.push(Token::Literal(&src[literal_start..i + 1]));
                    i += 2;
                    literal_start = i;
                }
                b'}' if bytes.get(i + 1) == Some(&b'}') => {
                    tokens.push(Token::Literal(&src[literal_start..i + 1]));
                    i += 2;
                    literal_start = i;
                }
                b'{' => match src[i + 1..].find(['{', '}']) {
                    Some(offset) if bytes[i + 1 + offset] == b'}' => {
                        tokens.push(Token::Literal(&src[literal_start..i]));
                        tokens.push(Token::Placeholder);
                        i += offset + 2;
                        literal_start = i;
                    }
                    // Unclosed brace, keep it as text
                    _ => i += 1,
                },
                _ => i += 1,
            }
        }

        tokens.push(Token::Literal(&src[literal_start..]));
        tokens.retain(|token| *token != Token::Literal(""));
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_count() {
        assert_eq!(Template::new("Code region executed in {Elapsed}").placeholder_count(), 1);
        assert_eq!(Template::new("{Op} on {Count} items took {Elapsed}").placeholder_count(), 3);
        assert_eq!(Template::new("no placeholders").placeholder_count(), 0);
        assert_eq!(Template::new("").placeholder_count(), 0);
    }

    #[test]
    fn test_escaped_and_unclosed_braces_are_literal() {
        let template = Template::new("{{literal}} then {Elapsed}");
        assert_eq!(template.placeholder_count(), 1);
        assert_eq!(
            template.render(&[Duration::from_millis(5).into()]).unwrap(),
            "{literal} then 5ms"
        );

        let template = Template::new("open { brace {Elapsed}");
        assert_eq!(template.placeholder_count(), 1);
        assert_eq!(
            template.render(&[Duration::from_millis(5).into()]).unwrap(),
            "open { brace 5ms"
        );
    }

    #[test]
    fn test_render_substitutes_in_order() {
        let template = Template::new("{Op} on {Count} items took {Elapsed}");
        let rendered = template
            .render(&["sort".into(), 42u64.into(), Duration::from_millis(1500).into()])
            .unwrap();
        assert_eq!(rendered, "sort on 42 items took 1.5s");
    }

    #[test]
    fn test_render_mismatch() {
        let template = Template::new("{A} {B} {Elapsed}");
        let err = template.render(&["a".into(), Duration::ZERO.into()]).unwrap_err();
        assert!(matches!(
            err,
            TimeItError::TemplateArgumentMismatch { placeholders: 3, arguments: 2 }
        ));
    }

    #[test]
    fn test_log_value_display_and_json() {
        assert_eq!(LogValue::from(Duration::from_millis(45)).to_string(), "45ms");
        assert_eq!(LogValue::from(true).to_string(), "true");
        assert_eq!(LogValue::from(-3).to_string(), "-3");

        let json = serde_json::to_string(&vec![
            LogValue::from("x"),
            LogValue::from(Duration::from_micros(1500)),
        ])
        .unwrap();
        assert_eq!(json, r#"["x",1.5]"#);
    }
}
