//! Name reference extraction: reading a namespaced name backward from its
//! last segment.
//!
//! Two walks are provided:
//!
//! - [`strict_name_at`] follows the strict `Segment \ Segment \ ...` shape
//!   and produces a candidate string for resolution.
//! - [`name_ref_from_end`] collects every contiguous name token and reports
//!   the consumed range together with the segment tokens.

use std::ops::Range;

use smol_str::SmolStr;

use crate::base::TextRange;
use crate::error::{ResolveError, Result};
use crate::syntax::{Token, TokenKind, TokenStream};

/// The namespace separator as it appears in names.
pub const NAMESPACE_SEPARATOR: &str = "\\";

/// A name found in a token stream by [`name_ref_from_end`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameRef {
    /// Token positions consumed by the backward walk, including a leading
    /// root separator if there was one.
    pub consumed: Range<usize>,
    /// Concatenated segment texts, without the leading separator.
    pub name: String,
    /// Text of the final segment.
    pub last_segment: SmolStr,
    /// Segment and separator tokens in source order.
    pub segments: Vec<Token>,
    /// Whether the name was written with a leading `\`.
    pub rooted: bool,
}

impl NameRef {
    /// Position immediately before the first consumed token.
    ///
    /// `None` when the name starts the stream.
    pub fn start(&self) -> Option<usize> {
        self.consumed.start.checked_sub(1)
    }

    /// Position of the last segment (the position the walk started from).
    pub fn end(&self) -> usize {
        self.consumed.end - 1
    }

    /// Source range covered by the segment tokens.
    pub fn range(&self) -> TextRange {
        self.segments
            .iter()
            .map(|t| t.range)
            .reduce(TextRange::cover)
            .unwrap_or_default()
    }
}

/// Check that `position` holds an identifier segment.
fn name_token_at(stream: &TokenStream, position: usize) -> Result<&Token> {
    let token = stream.get(position).ok_or(ResolveError::PositionOutOfBounds {
        position,
        len: stream.len(),
    })?;
    if !token.is(TokenKind::Ident) {
        return Err(ResolveError::NotAName {
            position,
            kind: token.kind,
        });
    }
    Ok(token)
}

/// Read the name ending at `end` in strict `Segment \ Segment` shape.
///
/// A separator at the start of the stream, or preceded by anything other
/// than a segment, is a root marker and is kept in the returned candidate.
pub fn strict_name_at(stream: &TokenStream, end: usize) -> Result<String> {
    let last = name_token_at(stream, end)?;

    let mut parts: Vec<&str> = vec![last.text()];
    let mut rooted = false;
    let mut position = end;

    while position > 0 && stream[position - 1].is(TokenKind::NsSeparator) {
        let separator = position - 1;
        match separator.checked_sub(1).map(|i| &stream[i]) {
            Some(prev) if prev.is(TokenKind::Ident) => {
                parts.push(prev.text());
                position = separator - 1;
            }
            Some(prev) if prev.is(TokenKind::NsSeparator) => {
                return Err(ResolveError::MalformedName {
                    position: separator,
                });
            }
            _ => {
                rooted = true;
                break;
            }
        }
    }

    parts.reverse();
    let joined = parts.join(NAMESPACE_SEPARATOR);
    Ok(if rooted {
        format!("{NAMESPACE_SEPARATOR}{joined}")
    } else {
        joined
    })
}

/// Collect the contiguous run of name tokens ending at `end`.
pub fn name_ref_from_end(stream: &TokenStream, end: usize) -> Result<NameRef> {
    let last = name_token_at(stream, end)?;

    let mut first = end;
    while first > 0 && stream[first - 1].kind.is_name_part() {
        first -= 1;
    }

    let consumed = first..end + 1;
    let mut segments = stream.as_slice()[consumed.clone()].to_vec();
    let rooted = segments[0].is(TokenKind::NsSeparator);
    if rooted {
        segments.remove(0);
    }

    let name = segments.iter().map(Token::text).collect();

    Ok(NameRef {
        consumed,
        name,
        last_segment: last.text.clone(),
        segments,
        rooted,
    })
}
