// ABOUTME: Tokenizer splitting source text into lexemes

//! Tokenizer (C2): a single-pass, greedy split of source text into
//! lexemes. The tokenizer never classifies atoms — that's the reader's
//! job — it only decides where one lexeme ends and the next begins.
//!
//! Grammar, in priority order, after skipping whitespace/commas: the
//! two-char reader macro `~@`; one of the single special characters
//! `[] {} () ' \` ~ ^ @`; a string literal (greedy even if never closed —
//! the reader reports that failure, not the tokenizer); a `;` comment to
//! end of line (dropped, the same way whitespace is dropped); otherwise
//! the longest run of characters that isn't whitespace, a bracket, a
//! quote/reader-macro character, or a comment starter.

use nom::branch::alt;
use nom::bytes::complete::{tag, take_while, take_while1};
use nom::character::complete::{char, one_of};
use nom::combinator::recognize;
use nom::sequence::pair;
use nom::IResult;

const SPECIAL_SINGLE: &str = "[]{}()'`~^@";

fn is_ws_or_comma(c: char) -> bool {
    c.is_whitespace() || c == ','
}

fn is_atom_boundary(c: char) -> bool {
    c.is_whitespace() || c == ',' || c == ';' || c == '"' || SPECIAL_SINGLE.contains(c)
}

fn whitespace(input: &str) -> IResult<&str, &str> {
    take_while(is_ws_or_comma)(input)
}

fn double_macro(input: &str) -> IResult<&str, &str> {
    tag("~@")(input)
}

fn single_special(input: &str) -> IResult<&str, &str> {
    recognize(one_of(SPECIAL_SINGLE))(input)
}

/// Consumes a leading `"` and everything up to (and including) the first
/// unescaped closing `"`. If none is found, consumes to the end of input
/// and still returns a lexeme — the unterminated literal is the reader's
/// problem, not the tokenizer's.
fn string_literal(input: &str) -> IResult<&str, &str> {
    let bytes = input.as_bytes();
    let n = bytes.len();
    let mut i = 1; // skip opening quote
    while i < n {
        match bytes[i] {
            b'\\' if i + 1 < n => i += 2,
            b'"' => {
                i += 1;
                return Ok((&input[i..], &input[..i]));
            }
            _ => i += 1,
        }
    }
    Ok((&input[n..], &input[..n]))
}

fn comment(input: &str) -> IResult<&str, &str> {
    recognize(pair(char(';'), take_while(|c| c != '\n')))(input)
}

fn atom(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !is_atom_boundary(c))(input)
}

/// Returns the rest of the input and the next lexeme, or `None` when the
/// match was whitespace/a comment (dropped, not emitted).
fn next_token(input: &str) -> IResult<&str, Option<&str>> {
    let (input, _) = whitespace(input)?;
    if input.is_empty() {
        return Ok((input, None));
    }
    if let Ok((rest, lexeme)) = double_macro(input) {
        return Ok((rest, Some(lexeme)));
    }
    if let Ok((rest, lexeme)) = single_special(input) {
        return Ok((rest, Some(lexeme)));
    }
    if input.starts_with('"') {
        let (rest, lexeme) = string_literal(input)?;
        return Ok((rest, Some(lexeme)));
    }
    if input.starts_with(';') {
        let (rest, _) = comment(input)?;
        return Ok((rest, None));
    }
    let (rest, lexeme) = alt((atom, recognize(nom::bytes::complete::take(1usize))))(input)?;
    Ok((rest, Some(lexeme)))
}

pub fn tokenize(mut input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    while !input.is_empty() {
        match next_token(input) {
            Ok((rest, lexeme)) => {
                if rest.len() == input.len() {
                    break; // no progress; guard against an infinite loop
                }
                if let Some(lexeme) = lexeme {
                    tokens.push(lexeme.to_string());
                }
                input = rest;
            }
            Err(_) => break,
        }
    }
    tokens
}
