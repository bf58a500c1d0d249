//! Tokens and token streams.

use std::fmt;
use std::ops::Index;
use std::sync::Arc;

use logos::Logos;
use smol_str::SmolStr;

use crate::base::{Fingerprint, TextRange};

/// Kind tag of a [`Token`].
///
/// Only the kinds the resolver inspects are distinguished; anything else
/// the lexer meets becomes [`TokenKind::Unknown`].
#[derive(Logos, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,
    #[regex(r"//[^\n]*")]
    // `#[` opens an attribute, not a comment
    #[regex(r"#[^\[\n][^\n]*")]
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    Comment,

    #[token("<?php", ignore(ascii_case))]
    OpenTag,
    #[token("?>")]
    CloseTag,

    #[token("use", ignore(ascii_case))]
    Use,
    #[token("as", ignore(ascii_case))]
    As,
    #[token("function", ignore(ascii_case))]
    Function,
    #[token("const", ignore(ascii_case))]
    Const,
    #[token("namespace", ignore(ascii_case))]
    Namespace,
    #[token("class", ignore(ascii_case))]
    #[token("interface", ignore(ascii_case))]
    #[token("trait", ignore(ascii_case))]
    #[token("enum", ignore(ascii_case))]
    ClassLike,

    /// One segment of a (possibly namespaced) name.
    #[regex(r"[A-Za-z_\x{80}-\x{10FFFF}][A-Za-z0-9_\x{80}-\x{10FFFF}]*")]
    Ident,
    /// The namespace separator `\`.
    #[token("\\")]
    NsSeparator,
    #[regex(r"\$[A-Za-z_\x{80}-\x{10FFFF}][A-Za-z0-9_\x{80}-\x{10FFFF}]*")]
    Variable,
    #[regex(r"'([^'\\]|\\.)*'")]
    #[regex(r#""([^"\\]|\\.)*""#)]
    String,
    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number,

    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,

    /// Any text the lexer has no dedicated kind for.
    Unknown,
}

impl TokenKind {
    /// Whitespace and comments.
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Comment)
    }

    /// Keywords that PHP also accepts as namespace segments (`App\Enum\Status`).
    #[inline]
    pub fn is_reserved_word(self) -> bool {
        matches!(
            self,
            TokenKind::Use
                | TokenKind::As
                | TokenKind::Function
                | TokenKind::Const
                | TokenKind::Namespace
                | TokenKind::ClassLike
        )
    }

    /// Identifier segments and namespace separators.
    #[inline]
    pub fn is_name_part(self) -> bool {
        matches!(self, TokenKind::Ident | TokenKind::NsSeparator)
    }
}

/// A single token: kind tag, literal text and its source range.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub text: SmolStr,
    /// Byte range in the source text. Empty for tokens built by hand.
    pub range: TextRange,
}

impl Token {
    /// Create a token without source position.
    pub fn new(kind: TokenKind, text: impl Into<SmolStr>) -> Self {
        Self {
            kind,
            text: text.into(),
            range: TextRange::default(),
        }
    }

    /// Create a token covering `range` in the source.
    pub fn with_range(kind: TokenKind, text: impl Into<SmolStr>, range: TextRange) -> Self {
        Self {
            kind,
            text: text.into(),
            range,
        }
    }

    #[inline]
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?})", self.kind, self.text)
    }
}

/// An immutable, indexable sequence of tokens for one source file.
///
/// The content fingerprint is computed once on construction. Cloning is
/// cheap: the tokens are shared.
#[derive(Clone)]
pub struct TokenStream {
    tokens: Arc<[Token]>,
    fingerprint: Fingerprint,
}

impl TokenStream {
    /// Build a stream from tokens produced by any tokenizer.
    pub fn new(tokens: impl Into<Vec<Token>>) -> Self {
        let tokens: Arc<[Token]> = tokens.into().into();
        let fingerprint = Fingerprint::of(tokens.iter().map(|t| (t.kind, t.text.as_str())));
        Self { tokens, fingerprint }
    }

    /// Content fingerprint of this stream.
    #[inline]
    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    /// Whether both streams hold the same token kinds and texts.
    pub fn same_content(&self, other: &TokenStream) -> bool {
        if Arc::ptr_eq(&self.tokens, &other.tokens) {
            return true;
        }
        self.fingerprint == other.fingerprint
            && self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| a.kind == b.kind && a.text == b.text)
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    /// Index of the first non-trivia token at or after `index`.
    pub fn next_meaningful(&self, index: usize) -> Option<usize> {
        (index..self.len()).find(|&i| !self.tokens[i].kind.is_trivia())
    }

    /// Index of the first non-trivia token strictly before `index`.
    pub fn prev_meaningful(&self, index: usize) -> Option<usize> {
        (0..index.min(self.len()))
            .rev()
            .find(|&i| !self.tokens[i].kind.is_trivia())
    }

    /// Reassemble the source text of `range` from token texts.
    pub fn text_of(&self, range: std::ops::Range<usize>) -> String {
        self.tokens[range].iter().map(Token::text).collect()
    }
}

impl Index<usize> for TokenStream {
    type Output = Token;

    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}

impl fmt::Debug for TokenStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenStream")
            .field("len", &self.tokens.len())
            .field("fingerprint", &self.fingerprint)
            .finish()
    }
}

impl From<Vec<Token>> for TokenStream {
    fn from(tokens: Vec<Token>) -> Self {
        Self::new(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(text: &str) -> Token {
        Token::new(TokenKind::Ident, text)
    }

    #[test]
    fn test_stream_fingerprint_ignores_ranges() {
        let a = TokenStream::new(vec![ident("Foo")]);
        let b = TokenStream::new(vec![Token::with_range(
            TokenKind::Ident,
            "Foo",
            TextRange::new(10.into(), 13.into()),
        )]);

        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_stream_fingerprint_differs_on_content() {
        let a = TokenStream::new(vec![ident("Foo")]);
        let b = TokenStream::new(vec![ident("Bar")]);

        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_same_content() {
        let a = TokenStream::new(vec![ident("Foo")]);
        let b = TokenStream::new(vec![Token::with_range(
            TokenKind::Ident,
            "Foo",
            TextRange::new(3.into(), 6.into()),
        )]);
        let c = TokenStream::new(vec![ident("Bar")]);

        assert!(a.same_content(&a.clone()));
        assert!(a.same_content(&b));
        assert!(!a.same_content(&c));
    }

    #[test]
    fn test_meaningful_navigation() {
        let stream = TokenStream::new(vec![
            ident("A"),
            Token::new(TokenKind::Whitespace, " "),
            Token::new(TokenKind::Comment, "/* x */"),
            ident("B"),
        ]);

        assert_eq!(stream.next_meaningful(1), Some(3));
        assert_eq!(stream.prev_meaningful(3), Some(0));
        assert_eq!(stream.prev_meaningful(0), None);
        assert_eq!(stream.next_meaningful(4), None);
    }

    #[test]
    fn test_text_of() {
        let stream = TokenStream::new(vec![
            ident("App"),
            Token::new(TokenKind::NsSeparator, "\\"),
            ident("User"),
        ]);

        assert_eq!(stream.text_of(0..3), "App\\User");
    }
}
