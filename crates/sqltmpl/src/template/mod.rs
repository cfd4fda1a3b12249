//! Query template rendering.
//!
//! A template is SQL text with typed placeholders and optional `{...}`
//! blocks. Rendering runs in two passes:
//!
//! 1. every placeholder is bound, in order, to one argument and formatted
//!    (placeholders bound to [`Value::Skip`] are left unformatted);
//! 2. each block is either unwrapped or, if it holds a skipped placeholder,
//!    removed entirely.
//!
//! | Placeholder | Accepts | Renders |
//! |---|---|---|
//! | `?`  | any scalar | `'escaped'`, number, `0`/`1`, `NULL` |
//! | `?d` | scalar | integer or `NULL` |
//! | `?f` | scalar | float or `NULL` |
//! | `?a` | list / map | `v1, v2` or `` `k1` = v1, `k2` = v2 `` |
//! | `?#` | string / list of strings | `` `name` `` or `` `a`, `b` `` |
//!
//! # Example
//!
//! ```
//! use sqltmpl::{args, build_query, skip};
//!
//! let sql = build_query(
//!     "SELECT ?# FROM users WHERE name = ? {AND block = ?d}",
//!     &args![vec!["id", "name"], "Jack", skip()],
//! )?;
//! assert_eq!(sql, "SELECT `id`, `name` FROM users WHERE name = 'Jack' ");
//! # Ok::<(), sqltmpl::TemplateError>(())
//! ```

mod block;
mod format;
mod scan;


pub use scan::{MARKER, Placeholder, Specifier, scan};

use crate::error::{TemplateError, TemplateResult};
use crate::escape::{Escaper, MysqlEscaper};
use crate::value::Value;
use format::{Formatter, write_identifier};
#[cfg(feature = "tracing")]
use std::borrow::Cow;

/// A span of substituted template output.
#[derive(Debug)]
pub(crate) enum Piece<'t> {
    /// Template text between placeholders, with its byte offset.
    Literal { offset: usize, text: &'t str },
    /// A formatted argument.
    Value(String),
    /// Raw text of a placeholder bound to [`Value::Skip`].
    Skipped(&'t str),
}

/// Renders query templates with a given literal escaper.
///
/// The builder holds no per-call state, so one instance can be shared across
/// threads whenever the escaper can.
#[derive(Debug, Clone)]
pub struct QueryBuilder<E = MysqlEscaper> {
    escaper: E,
    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    max_logged_sql: Option<usize>,
}

impl Default for QueryBuilder<MysqlEscaper> {
    fn default() -> Self {
        Self::new(MysqlEscaper)
    }
}

impl<E: Escaper> QueryBuilder<E> {
    /// Create a builder around `escaper`.
    pub fn new(escaper: E) -> Self {
        Self {
            escaper,
            max_logged_sql: Some(200),
        }
    }

    pub fn escaper(&self) -> &E {
        &self.escaper
    }

    /// Truncate rendered SQL in debug events to `len` bytes.
    pub fn max_logged_sql(mut self, len: usize) -> Self {
        self.max_logged_sql = Some(len);
        self
    }

    /// Log rendered SQL in full.
    pub fn no_truncate(mut self) -> Self {
        self.max_logged_sql = None;
        self
    }

    /// The skip sentinel.
    pub fn skip(&self) -> Value {
        Value::Skip
    }

    /// List the placeholders of `template`.
    pub fn scan(&self, template: &str) -> Vec<Placeholder> {
        scan(template)
    }

    /// Render `template` with `args` bound positionally to its placeholders.
    pub fn build_query(&self, template: &str, args: &[Value]) -> TemplateResult<String> {
        if template.is_empty() {
            return Err(TemplateError::EmptyTemplate);
        }

        let placeholders = scan(template);
        let pieces = self.substitute(template, &placeholders, args)?;
        let resolved = block::resolve(&pieces, template.len())?;

        #[cfg(feature = "tracing")]
        self.trace_build(&placeholders, args, &resolved);

        Ok(resolved.sql)
    }

    /// Format a value the way an auto `?` placeholder would.
    pub fn format_value(&self, value: &Value) -> TemplateResult<String> {
        let mut out = String::new();
        Formatter::new(&self.escaper, 0).write_auto(value, &mut out)?;
        Ok(out)
    }

    /// Format a value the way an `?a` placeholder would.
    pub fn format_array(&self, value: &Value) -> TemplateResult<String> {
        let mut out = String::new();
        Formatter::new(&self.escaper, 0).write_array(value, &mut out)?;
        Ok(out)
    }

    /// Format a value the way an `?#` placeholder would.
    pub fn format_identifier(&self, value: &Value) -> TemplateResult<String> {
        format_identifier(value)
    }

    fn substitute<'t>(
        &self,
        template: &'t str,
        placeholders: &[Placeholder],
        args: &[Value],
    ) -> TemplateResult<Vec<Piece<'t>>> {
        let mut pieces = Vec::with_capacity(placeholders.len() * 2 + 1);
        let mut cursor = 0;

        for (index, ph) in placeholders.iter().enumerate() {
            let arg = args
                .get(index)
                .ok_or(TemplateError::MissingParameter { index })?;

            if ph.offset > cursor {
                pieces.push(Piece::Literal {
                    offset: cursor,
                    text: &template[cursor..ph.offset],
                });
            }

            if arg.is_skip() {
                pieces.push(Piece::Skipped(ph.as_str(template)));
            } else {
                let mut out = String::new();
                Formatter::new(&self.escaper, index).write(ph.specifier, arg, &mut out)?;
                pieces.push(Piece::Value(out));
            }
            cursor = ph.end();
        }

        if args.len() > placeholders.len() {
            return Err(TemplateError::TooManyParameters {
                expected: placeholders.len(),
                given: args.len(),
            });
        }

        if cursor < template.len() {
            pieces.push(Piece::Literal {
                offset: cursor,
                text: &template[cursor..],
            });
        }
        Ok(pieces)
    }

    #[cfg(feature = "tracing")]
    fn trace_build(&self, placeholders: &[Placeholder], args: &[Value], resolved: &block::Resolved) {
        let sql = self.truncate_sql(&resolved.sql);
        tracing::debug!(
            target: "sqltmpl.build",
            placeholders = placeholders.len(),
            skipped = args.iter().filter(|a| a.is_skip()).count(),
            blocks = resolved.blocks,
            dropped_blocks = resolved.dropped,
            sql = %sql,
            "built query"
        );
    }

    /// Rendered SQL as it appears in debug events.
    #[cfg(feature = "tracing")]
    fn truncate_sql<'s>(&self, sql: &'s str) -> Cow<'s, str> {
        match self.max_logged_sql {
            Some(max) if sql.len() > max => Cow::Owned(format!("{}...", truncate_bytes(sql, max))),
            _ => Cow::Borrowed(sql),
        }
    }
}

/// Cut `s` to at most `max` bytes on a char boundary.
#[cfg(feature = "tracing")]
fn truncate_bytes(s: &str, max: usize) -> &str {
    let mut end = max.min(s.len());
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Render `template` with the MySQL-compatible escaper.
///
/// Shorthand for `QueryBuilder::default().build_query(template, args)`.
pub fn build_query(template: &str, args: &[Value]) -> TemplateResult<String> {
    QueryBuilder::<MysqlEscaper>::default().build_query(template, args)
}

/// Format a string as one quoted identifier or a list of strings as a
/// comma-separated identifier list.
pub fn format_identifier(value: &Value) -> TemplateResult<String> {
    let mut out = String::new();
    write_identifier(0, value, &mut out)?;
    Ok(out)
}
