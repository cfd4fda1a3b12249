//! Placeholder scanning.

use std::fmt;

/// Character that starts every placeholder.
pub const MARKER: char = '?';

/// Formatting mode selected by the character after the marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Specifier {
    /// `?` — formatted by the argument's own type.
    Auto,
    /// `?d`
    Int,
    /// `?f`
    Float,
    /// `?a` — value list or `column = value` pairs.
    Array,
    /// `?#` — identifier or identifier list.
    Ident,
}

impl Specifier {
    /// Map a specifier character; `None` means the character is ordinary text.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'd' => Some(Self::Int),
            'f' => Some(Self::Float),
            'a' => Some(Self::Array),
            '#' => Some(Self::Ident),
            _ => None,
        }
    }

    pub fn as_char(self) -> Option<char> {
        match self {
            Self::Auto => None,
            Self::Int => Some('d'),
            Self::Float => Some('f'),
            Self::Array => Some('a'),
            Self::Ident => Some('#'),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Int => "int",
            Self::Float => "float",
            Self::Array => "array",
            Self::Ident => "identifier",
        }
    }
}

impl fmt::Display for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{MARKER}")?;
        if let Some(c) = self.as_char() {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

/// One placeholder occurrence, located by byte offsets into the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder {
    pub offset: usize,
    /// Byte length: 1 for `?`, 2 with a specifier.
    pub len: usize,
    pub specifier: Specifier,
}

impl Placeholder {
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    /// Raw placeholder text as written in `template`.
    pub fn as_str<'t>(&self, template: &'t str) -> &'t str {
        &template[self.offset..self.end()]
    }
}

/// Find every placeholder in `template`, left to right.
///
/// The marker and all specifier characters are ASCII, so byte scanning never
/// lands inside a multi-byte character.
pub fn scan(template: &str) -> Vec<Placeholder> {
    let bytes = template.as_bytes();
    let mut found = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != MARKER as u8 {
            i += 1;
            continue;
        }

        let specifier = bytes
            .get(i + 1)
            .and_then(|&b| Specifier::from_char(b as char));
        let len = if specifier.is_some() { 2 } else { 1 };
        found.push(Placeholder {
            offset: i,
            len,
            specifier: specifier.unwrap_or(Specifier::Auto),
        });
        i += len;
    }

    #[cfg(feature = "tracing")]
    tracing::trace!(
        target: "sqltmpl.scan",
        template_len = template.len(),
        placeholders = found.len(),
        "scanned template"
    );

    found
}
