//! Rendering of single arguments to SQL text.

use super::scan::Specifier;
use crate::error::{TemplateError, TemplateResult};
use crate::escape::{Escaper, write_ident};
use crate::value::Value;

/// Formats the argument bound to one placeholder.
///
/// `index` is only carried for error reporting.
pub(crate) struct Formatter<'a, E: ?Sized> {
    escaper: &'a E,
    index: usize,
}

impl<'a, E: Escaper + ?Sized> Formatter<'a, E> {
    pub(crate) fn new(escaper: &'a E, index: usize) -> Self {
        Self { escaper, index }
    }

    pub(crate) fn write(&self, spec: Specifier, value: &Value, out: &mut String) -> TemplateResult<()> {
        match spec {
            Specifier::Auto => self.write_auto(value, out),
            Specifier::Int => self.write_int(value, out),
            Specifier::Float => self.write_float(value, out),
            Specifier::Array => self.write_array(value, out),
            Specifier::Ident => write_identifier(self.index, value, out),
        }
    }

    /// Format by the value's own type.
    pub(crate) fn write_auto(&self, value: &Value, out: &mut String) -> TemplateResult<()> {
        match value {
            Value::Null => out.push_str("NULL"),
            Value::Bool(b) => out.push(if *b { '1' } else { '0' }),
            Value::Int(i) => out.push_str(&i.to_string()),
            Value::Float(f) => self.push_float(*f, out)?,
            Value::Str(s) => out.push_str(&self.escaper.quote_literal(s)),
            Value::List(_) | Value::Map(_) | Value::Skip => {
                return Err(TemplateError::invalid_value(
                    self.index,
                    value.kind(),
                    "expected a scalar",
                ));
            }
        }
        Ok(())
    }

    fn write_int(&self, value: &Value, out: &mut String) -> TemplateResult<()> {
        let n = match value {
            Value::Null => {
                out.push_str("NULL");
                return Ok(());
            }
            Value::Bool(b) => i64::from(*b),
            Value::Int(i) => *i,
            Value::Float(f) => self.truncate(*f)?,
            Value::Str(s) => {
                let prefix = numeric_prefix(s);
                if prefix.is_empty() {
                    0
                } else if let Ok(i) = prefix.parse::<i64>() {
                    i
                } else {
                    self.truncate(prefix.parse::<f64>().unwrap_or(0.0))?
                }
            }
            Value::List(_) | Value::Map(_) | Value::Skip => {
                return Err(TemplateError::invalid_value(
                    self.index,
                    value.kind(),
                    "cannot convert to integer",
                ));
            }
        };
        out.push_str(&n.to_string());
        Ok(())
    }

    fn write_float(&self, value: &Value, out: &mut String) -> TemplateResult<()> {
        let f = match value {
            Value::Null => {
                out.push_str("NULL");
                return Ok(());
            }
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Int(i) => *i as f64,
            Value::Float(f) => *f,
            Value::Str(s) => numeric_prefix(s).parse::<f64>().unwrap_or(0.0),
            Value::List(_) | Value::Map(_) | Value::Skip => {
                return Err(TemplateError::invalid_value(
                    self.index,
                    value.kind(),
                    "cannot convert to float",
                ));
            }
        };
        self.push_float(f, out)
    }

    /// Map becomes `` `k` = v `` pairs, list becomes a value list.
    pub(crate) fn write_array(&self, value: &Value, out: &mut String) -> TemplateResult<()> {
        match value {
            Value::Map(map) => {
                for (i, (key, val)) in map.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    write_ident(key, out);
                    out.push_str(" = ");
                    self.write_auto(val, out)?;
                }
            }
            Value::List(items) => {
                for (i, val) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write_auto(val, out)?;
                }
            }
            other => {
                return Err(TemplateError::InvalidArrayType {
                    index: self.index,
                    found: other.kind(),
                });
            }
        }
        Ok(())
    }

    fn push_float(&self, f: f64, out: &mut String) -> TemplateResult<()> {
        if !f.is_finite() {
            return Err(TemplateError::invalid_value(
                self.index,
                "float",
                "non-finite float",
            ));
        }
        out.push_str(&f.to_string());
        Ok(())
    }

    fn truncate(&self, f: f64) -> TemplateResult<i64> {
        if !f.is_finite() {
            return Err(TemplateError::invalid_value(
                self.index,
                "float",
                "non-finite float",
            ));
        }
        // `as` saturates at the i64 bounds.
        Ok(f.trunc() as i64)
    }
}

/// String becomes one quoted identifier, list of strings a comma list.
pub(crate) fn write_identifier(index: usize, value: &Value, out: &mut String) -> TemplateResult<()> {
    match value {
        Value::Str(name) => write_ident(name, out),
        Value::List(items) => {
            for (i, item) in items.iter().enumerate() {
                let Value::Str(name) = item else {
                    return Err(TemplateError::InvalidIdentifierType {
                        index,
                        found: item.kind(),
                    });
                };
                if i > 0 {
                    out.push_str(", ");
                }
                write_ident(name, out);
            }
        }
        other => {
            return Err(TemplateError::InvalidIdentifierType {
                index,
                found: other.kind(),
            });
        }
    }
    Ok(())
}

/// Longest numeric prefix of `s` after leading whitespace:
/// `[+-]? (digits [. digits?] | . digits) ([eE] [+-]? digits)?`.
fn numeric_prefix(s: &str) -> &str {
    let s = s.trim_start();
    let b = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut i = 0;
    if matches!(b.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let int_end = digits_from(i);
    let mut end = int_end;
    let mut has_digits = int_end > i;

    if b.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        if has_digits || frac_end > end + 1 {
            has_digits = true;
            end = frac_end;
        }
    }
    if !has_digits {
        return "";
    }

    if matches!(b.get(end), Some(b'e' | b'E')) {
        let mut j = end + 1;
        if matches!(b.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_end = digits_from(j);
        if exp_end > j {
            end = exp_end;
        }
    }

    &s[..end]
}
