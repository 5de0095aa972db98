pub mod parser;
pub mod token;
pub mod writer;
pub mod morphology;

use crate::token::{Token, TokenKind};
use crate::parser::{parse_with_spans, RawToken};

pub use morphology::{Analyzer, DictionaryArchive, DictionaryError};
pub use writer::{substitute_forms, Reassembly};

/// Splits phrases into span-carrying tokens.
#[derive(Debug, Default, Clone, Copy)]
pub struct Lexer;

impl Lexer {
    pub fn new() -> Self {
        Self
    }

    /// Primary entry point: Text -> Structured Tokens
    pub fn tokenize<'a>(&self, input: &'a str) -> Vec<Token<'a>> {
        parse_with_spans(input)
            .into_iter()
            .map(|(span, raw)| {
                let text = &input[span.start..span.end];

                let kind = match raw {
                    RawToken::Word(_) => TokenKind::Word,
                    RawToken::Punct(c) => TokenKind::Punctuation(c),
                };

                Token { span, text, kind }
            })
            .collect()
    }
}
