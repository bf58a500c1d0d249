// Token model and the minimal lexer
pub mod lexer;
pub mod token;

pub use lexer::lex;
pub use token::{Token, TokenKind, TokenStream};
