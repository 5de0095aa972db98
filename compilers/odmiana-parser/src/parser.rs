use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{anychar, one_of},
    combinator::{map, recognize},
    multi::many0,
    sequence::pair,
    IResult,
};
use crate::token::Span;

/// Characters that may join two word pieces (`al-Jork`, `O'Hara`).
const WORD_JOINERS: &str = "-'’";

fn word_piece(input: &str) -> IResult<&str, &str> {
    take_while1(char::is_alphanumeric)(input)
}

/// A word is one or more pieces joined by single joiner characters.
fn word(input: &str) -> IResult<&str, &str> {
    recognize(pair(word_piece, many0(pair(one_of(WORD_JOINERS), word_piece))))(input)
}

#[derive(Debug, Clone)]
pub enum RawToken<'a> {
    Word(&'a str),
    Punct(char),
}

pub fn parse_with_spans(original_input: &str) -> Vec<(Span, RawToken<'_>)> {
    let mut input = original_input;
    let mut result = Vec::new();

    loop {
        // 1. Skip whitespace, including non-ASCII spaces
        let (next_input, _) = match take_while::<_, &str, nom::error::Error<&str>>(char::is_whitespace)(input) {
            Ok(res) => res,
            Err(_) => break,
        };
        input = next_input;

        if input.is_empty() {
            break;
        }

        // 2. Word, or else a single character of punctuation
        let parse_res: IResult<&str, RawToken> = alt((
            map(word, RawToken::Word),
            map(anychar, RawToken::Punct),
        ))(input);

        match parse_res {
            Ok((next_input, token)) => {
                // 'input' is a suffix of 'original_input', so offsets line up
                let len = input.len() - next_input.len();
                let start = original_input.len() - input.len();

                result.push((Span::new(start, start + len), token));
                input = next_input;
            }
            Err(_) => break,
        }
    }

    result
}
