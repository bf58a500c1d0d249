//! Minimal lexer producing [`TokenStream`]s from PHP-style source text.
//!
//! Recognizes just enough of the language for import and name resolution:
//! names, separators, the `use`/`as`/`function`/`const` keywords, class-like
//! keywords and structural punctuation. Everything else is kept verbatim as
//! [`TokenKind::Unknown`] so the stream still reproduces the source text.

use logos::Logos;

use crate::base::{TextRange, TextSize};

use super::token::{Token, TokenKind, TokenStream};

/// Tokenize `source`.
///
/// Never fails: unrecognized characters become `Unknown` tokens.
pub fn lex(source: &str) -> TokenStream {
    let mut lexer = TokenKind::lexer(source);
    let mut tokens = Vec::new();

    while let Some(kind) = lexer.next() {
        let kind = kind.unwrap_or(TokenKind::Unknown);
        let span = lexer.span();
        let range = TextRange::new(
            TextSize::from(span.start as u32),
            TextSize::from(span.end as u32),
        );
        tokens.push(Token::with_range(kind, lexer.slice(), range));
    }

    demote_reserved_segments(&mut tokens);
    TokenStream::new(tokens)
}

/// Re-kind reserved words touching a `\` as identifier segments.
///
/// `App\Enum\Status` names a namespace `Enum`; only a keyword standing on
/// its own keeps its keyword kind.
fn demote_reserved_segments(tokens: &mut [Token]) {
    let is_separator = |token: Option<&Token>| token.is_some_and(|t| t.is(TokenKind::NsSeparator));

    for index in 0..tokens.len() {
        if !tokens[index].kind.is_reserved_word() {
            continue;
        }
        let before = index.checked_sub(1).and_then(|i| tokens.get(i));
        let after = tokens.get(index + 1);
        if is_separator(before) || is_separator(after) {
            tokens[index].kind = TokenKind::Ident;
        }
    }
}
