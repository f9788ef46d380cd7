// ABOUTME: Recursive-descent reader turning tokens into Value trees

//! Reader (C3): a hand-rolled recursive-descent parser over the token
//! stream produced by `token::tokenize`, building one `Value` tree per
//! top-level form.
//!
//! Unbalanced delimiters — including running out of tokens entirely —
//! yield `Value::Incomplete` rather than an error; mismatched delimiter
//! types (`(1 2]`) do the same. Neither condition is ever raised as an
//! `EvalError` here: per the evaluator's contract, an `Incomplete` value
//! is only an error once something tries to *evaluate* it.

use std::rc::Rc;

use crate::token::tokenize;
use crate::value::Value;

struct Reader<'a> {
    tokens: &'a [String],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn peek(&self) -> Option<&str> {
        self.tokens.get(self.pos).map(String::as_str)
    }

    fn next(&mut self) -> Option<&str> {
        let tok = self.tokens.get(self.pos).map(String::as_str);
        self.pos += 1;
        tok
    }

    fn read_form(&mut self) -> Value {
        match self.peek() {
            None => Value::Incomplete,
            Some("(") => self.read_list(),
            Some("[") => self.read_vector(),
            Some(")") => {
                self.pos += 1;
                Value::ListEnd
            }
            Some("]") => {
                self.pos += 1;
                Value::VectorEnd
            }
            Some(_) => self.read_atom(),
        }
    }

    fn read_list(&mut self) -> Value {
        self.pos += 1; // consume "("
        let mut elems = Vec::new();
        loop {
            match self.peek() {
                None => return Value::Incomplete,
                Some(")") => {
                    self.pos += 1;
                    return Value::list(elems);
                }
                Some("]") => return Value::Incomplete,
                _ => {
                    let form = self.read_form();
                    if matches!(form, Value::Incomplete) {
                        return Value::Incomplete;
                    }
                    elems.push(form);
                }
            }
        }
    }

    fn read_vector(&mut self) -> Value {
        self.pos += 1; // consume "["
        let mut elems = Vec::new();
        loop {
            match self.peek() {
                None => return Value::Incomplete,
                Some("]") => {
                    self.pos += 1;
                    return Value::vector(elems);
                }
                Some(")") => return Value::Incomplete,
                _ => {
                    let form = self.read_form();
                    if matches!(form, Value::Incomplete) {
                        return Value::Incomplete;
                    }
                    elems.push(form);
                }
            }
        }
    }

    fn read_atom(&mut self) -> Value {
        let tok = self.next().expect("read_atom called with no token");

        if tok.starts_with('"') {
            return Value::string(unescape_string(tok));
        }

        if tok == "t" {
            return Value::Bool(true);
        }
        if tok == "nil" {
            return Value::Bool(false);
        }

        if is_number(tok) {
            return Value::Number(tok.parse().expect("validated numeric lexeme"));
        }

        // Anything else — including reader-macro characters like ' ` ~ ~@
        // ^ @, which this reader has no macro-expansion table for — is a
        // bare symbol, stored verbatim.
        Value::symbol(Rc::<str>::from(tok))
    }
}

fn is_number(tok: &str) -> bool {
    let digits = tok.strip_prefix('-').unwrap_or(tok);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Strips the surrounding quotes (if present) and resolves `\"`, `\\`,
/// `\n` escapes. An unterminated literal (no closing quote) still
/// produces a value — the leading quote is dropped and the rest of the
/// lexeme is unescaped as-is.
fn unescape_string(tok: &str) -> String {
    let inner = tok.strip_prefix('"').unwrap_or(tok);
    let inner = inner.strip_suffix('"').unwrap_or(inner);

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some('n') => out.push('\n'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Tokenizes `input` and reads exactly one top-level form. Trailing
/// tokens after that form are left unconsumed and silently ignored.
pub fn read_str(input: &str) -> Value {
    let tokens = tokenize(input);
    let mut reader = Reader { tokens: &tokens, pos: 0 };
    reader.read_form()
}

/// Tokenizes `input` once and reads every top-level form in sequence —
/// used by script/file evaluation, where a source unit is a whole
/// program rather than one REPL line. An `Incomplete` form (from a
/// trailing unbalanced delimiter) is included as the final element
/// rather than silently dropped, so the caller can still observe it.
pub fn read_all(input: &str) -> Vec<Value> {
    let tokens = tokenize(input);
    let mut reader = Reader { tokens: &tokens, pos: 0 };
    let mut forms = Vec::new();
    while reader.peek().is_some() {
        forms.push(reader.read_form());
    }
    forms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_a_number() {
        assert_eq!(read_str("42"), Value::Number(42.0));
        assert_eq!(read_str("-7"), Value::Number(-7.0));
    }

    #[test]
    fn reads_booleans() {
        assert_eq!(read_str("t"), Value::Bool(true));
        assert_eq!(read_str("nil"), Value::Bool(false));
    }

    #[test]
    fn reads_a_symbol() {
        assert_eq!(read_str("+"), Value::symbol("+"));
        assert_eq!(read_str("abc"), Value::symbol("abc"));
    }

    #[test]
    fn reads_a_string_with_escapes() {
        assert_eq!(read_str(r#""a\nb""#), Value::string("a\nb"));
    }

    #[test]
    fn reads_a_nested_list() {
        assert_eq!(
            read_str("(+ 1 (+ 2 3))"),
            Value::list(vec![
                Value::symbol("+"),
                Value::Number(1.0),
                Value::list(vec![Value::symbol("+"), Value::Number(2.0), Value::Number(3.0)]),
            ])
        );
    }

    #[test]
    fn reads_a_vector() {
        assert_eq!(
            read_str("[1 2 3]"),
            Value::vector(vec![Value::Number(1.0), Value::Number(2.0), Value::Number(3.0)])
        );
    }

    #[test]
    fn unbalanced_opener_is_incomplete() {
        assert_eq!(read_str("(1 2"), Value::Incomplete);
        assert_eq!(read_str("("), Value::Incomplete);
    }

    #[test]
    fn mismatched_delimiter_is_incomplete() {
        assert_eq!(read_str("(1 2]"), Value::Incomplete);
        assert_eq!(read_str("[1 2)"), Value::Incomplete);
    }

    #[test]
    fn empty_input_is_incomplete() {
        assert_eq!(read_str(""), Value::Incomplete);
    }

    #[test]
    fn trailing_tokens_are_ignored() {
        assert_eq!(read_str("1 2 3"), Value::Number(1.0));
    }

    #[test]
    fn read_all_reads_every_top_level_form() {
        assert_eq!(
            read_all("(def! a 1) (+ a 2)"),
            vec![
                Value::list(vec![Value::symbol("def!"), Value::symbol("a"), Value::Number(1.0)]),
                Value::list(vec![Value::symbol("+"), Value::symbol("a"), Value::Number(2.0)]),
            ]
        );
    }

    #[test]
    fn read_all_of_empty_input_is_empty() {
        assert!(read_all("").is_empty());
        assert!(read_all("   ; just a comment").is_empty());
    }

    #[test]
    fn read_all_surfaces_a_trailing_incomplete_form() {
        assert_eq!(read_all("(+ 1 2) (+ 3"), vec![
            Value::list(vec![Value::symbol("+"), Value::Number(1.0), Value::Number(2.0)]),
            Value::Incomplete,
        ]);
    }
}
