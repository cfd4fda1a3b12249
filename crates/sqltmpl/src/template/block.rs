//! Conditional block resolution.
//!
//! Runs over the substituted pieces. Only braces in literal template text
//! delimit blocks; braces inside formatted values are plain output.

use super::Piece;
use crate::error::{TemplateError, TemplateResult};

/// Output of block resolution.
#[derive(Debug, Default)]
pub(crate) struct Resolved {
    pub sql: String,
    /// Blocks seen.
    pub blocks: usize,
    /// Blocks removed because they held a skipped placeholder.
    pub dropped: usize,
}

struct OpenBlock {
    offset: usize,
    body: String,
    skipped: bool,
}

fn sink<'a>(out: &'a mut String, open: &'a mut Option<OpenBlock>) -> &'a mut String {
    match open {
        Some(block) => &mut block.body,
        None => out,
    }
}

/// Unwrap kept blocks and remove blocks holding a skipped placeholder.
///
/// An empty block `{}` is a block like any other and renders as nothing; it
/// is not left as literal braces.
pub(crate) fn resolve(pieces: &[Piece<'_>], capacity: usize) -> TemplateResult<Resolved> {
    let mut res = Resolved {
        sql: String::with_capacity(capacity),
        ..Resolved::default()
    };
    let mut open: Option<OpenBlock> = None;

    for piece in pieces {
        match piece {
            Piece::Literal { offset, text } => {
                let mut start = 0;
                for (i, b) in text.bytes().enumerate() {
                    match b {
                        b'{' => {
                            if open.is_some() {
                                return Err(TemplateError::NestedBlock { offset: offset + i });
                            }
                            res.sql.push_str(&text[start..i]);
                            open = Some(OpenBlock {
                                offset: offset + i,
                                body: String::new(),
                                skipped: false,
                            });
                            start = i + 1;
                        }
                        b'}' => {
                            let Some(mut block) = open.take() else {
                                return Err(TemplateError::UnmatchedBrace { offset: offset + i });
                            };
                            block.body.push_str(&text[start..i]);
                            res.blocks += 1;
                            if block.skipped {
                                res.dropped += 1;
                            } else {
                                res.sql.push_str(&block.body);
                            }
                            start = i + 1;
                        }
                        _ => {}
                    }
                }
                sink(&mut res.sql, &mut open).push_str(&text[start..]);
            }
            Piece::Value(text) => sink(&mut res.sql, &mut open).push_str(text),
            Piece::Skipped(raw) => match open.as_mut() {
                Some(block) => block.skipped = true,
                // Outside any block there is nothing to drop; keep the marker.
                None => res.sql.push_str(raw),
            },
        }
    }

    if let Some(block) = open {
        return Err(TemplateError::UnclosedBlock {
            offset: block.offset,
        });
    }

    Ok(res)
}
