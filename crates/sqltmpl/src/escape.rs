//! String literal escaping and identifier quoting.
//!
//! Literal escaping is driver specific, so it sits behind the [`Escaper`]
//! trait. Identifier quoting is always the MySQL backtick form and needs no
//! driver.
//!
//! # Example
//! ```
//! use sqltmpl::escape::{Escaper, MysqlEscaper, quote_ident};
//!
//! assert_eq!(MysqlEscaper.quote_literal("O'Brien"), r"'O\'Brien'");
//! assert_eq!(quote_ident("we`ird"), "`we``ird`");
//! ```

use std::sync::Arc;

/// Escapes raw text for inclusion inside a single-quoted SQL literal.
pub trait Escaper {
    /// Return `raw` escaped for use between single quotes (quotes not included).
    fn escape_literal(&self, raw: &str) -> String;

    /// Escape `raw` and wrap it in single quotes.
    fn quote_literal(&self, raw: &str) -> String {
        let escaped = self.escape_literal(raw);
        let mut out = String::with_capacity(escaped.len() + 2);
        out.push('\'');
        out.push_str(&escaped);
        out.push('\'');
        out
    }
}

/// Escaping compatible with `mysql_real_escape_string` on an ASCII-compatible
/// connection charset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MysqlEscaper;

impl Escaper for MysqlEscaper {
    fn escape_literal(&self, raw: &str) -> String {
        let mut out = String::with_capacity(raw.len() + raw.len() / 8);
        for ch in raw.chars() {
            match ch {
                '\0' => out.push_str("\\0"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\\' => out.push_str("\\\\"),
                '\'' => out.push_str("\\'"),
                '"' => out.push_str("\\\""),
                '\x1a' => out.push_str("\\Z"),
                c => out.push(c),
            }
        }
        out
    }
}

/// Standard SQL escaping: single quotes are doubled, backslashes kept as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandardEscaper;

impl Escaper for StandardEscaper {
    fn escape_literal(&self, raw: &str) -> String {
        raw.replace('\'', "''")
    }
}

/// Adapts a closure into an [`Escaper`], e.g. one calling a driver's escape routine.
#[derive(Clone, Copy)]
pub struct FnEscaper<F>(pub F);

impl<F> Escaper for FnEscaper<F>
where
    F: Fn(&str) -> String,
{
    fn escape_literal(&self, raw: &str) -> String {
        (self.0)(raw)
    }
}

impl<F> std::fmt::Debug for FnEscaper<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("FnEscaper").field(&"<fn>").finish()
    }
}

impl<E: Escaper + ?Sized> Escaper for &E {
    fn escape_literal(&self, raw: &str) -> String {
        (**self).escape_literal(raw)
    }
}

impl<E: Escaper + ?Sized> Escaper for Arc<E> {
    fn escape_literal(&self, raw: &str) -> String {
        (**self).escape_literal(raw)
    }
}

impl<E: Escaper + ?Sized> Escaper for Box<E> {
    fn escape_literal(&self, raw: &str) -> String {
        (**self).escape_literal(raw)
    }
}

/// Quote a SQL identifier with backticks, doubling embedded backticks.
pub fn quote_ident(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    write_ident(name, &mut out);
    out
}

pub(crate) fn write_ident(name: &str, out: &mut String) {
    out.push('`');
    for ch in name.chars() {
        if ch == '`' {
            out.push_str("``");
        } else {
            out.push(ch);
        }
    }
    out.push('`');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mysql_escapes_quotes_and_backslash() {
        assert_eq!(MysqlEscaper.escape_literal(r"a'b\c"), r"a\'b\\c");
        assert_eq!(MysqlEscaper.escape_literal("say \"hi\""), r#"say \"hi\""#);
    }

    #[test]
    fn mysql_escapes_control_chars() {
        assert_eq!(MysqlEscaper.escape_literal("a\nb\r\0\x1a"), r"a\nb\r\0\Z");
    }

    #[test]
    fn mysql_keeps_unicode() {
        assert_eq!(MysqlEscaper.quote_literal("привет"), "'привет'");
    }

    #[test]
    fn standard_doubles_quotes() {
        assert_eq!(StandardEscaper.quote_literal("O'Brien"), "'O''Brien'");
        assert_eq!(StandardEscaper.escape_literal(r"a\b"), r"a\b");
    }

    #[test]
    fn closure_escaper() {
        let upper = FnEscaper(|s: &str| s.to_uppercase());
        assert_eq!(upper.quote_literal("abc"), "'ABC'");
    }

    #[test]
    fn shared_escaper() {
        let e: Arc<dyn Escaper + Send + Sync> = Arc::new(MysqlEscaper);
        assert_eq!(e.quote_literal("'"), r"'\''");
    }

    #[test]
    fn ident_plain() {
        assert_eq!(quote_ident("name"), "`name`");
    }

    #[test]
    fn ident_doubles_backtick() {
        assert_eq!(quote_ident("a`b"), "`a``b`");
        assert_eq!(quote_ident("`; DROP TABLE t; --"), "```; DROP TABLE t; --`");
    }
}
