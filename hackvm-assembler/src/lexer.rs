//! # Lexer for hackvm Assembly Language

use hackvm_spec::Register;
use logos::{Lexer, Logos};

/// Tokens for hackvm assembly
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r]+")] // Skip whitespace (not newlines)
#[logos(skip r"[;#][^\n]*")] // Skip comments
pub enum Token {
    /// Identifier (mnemonics, labels, irq kinds)
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    /// Register (r0-r7)
    #[regex(r"r[0-7]", |lex| register(lex.slice()))]
    Register(Register),

    /// Decimal number
    #[regex(r"-?[0-9]+", |lex| lex.slice().parse().ok())]
    Number(i64),

    /// Hexadecimal number
    #[regex(r"-?0[xX][0-9a-fA-F]+", |lex| radix(lex, 16))]
    Hex(i64),

    /// Binary number
    #[regex(r"-?0[bB][01]+", |lex| radix(lex, 2))]
    Binary(i64),

    /// Directive (.offset)
    #[regex(r"\.[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice()[1..].to_string())]
    Directive(String),

    /// Comma
    #[token(",")]
    Comma,

    /// Colon (for labels)
    #[token(":")]
    Colon,

    /// Newline
    #[regex(r"\n")]
    Newline,
}

impl Token {
    /// Numeric value of a literal token
    pub fn immediate(&self) -> Option<i64> {
        match self {
            Token::Number(value) | Token::Hex(value) | Token::Binary(value) => Some(*value),
            _ => None,
        }
    }
}

fn register(slice: &str) -> Option<Register> {
    slice.parse().ok()
}

/// Parse a `0x`/`0b` literal with an optional leading minus
fn radix(lex: &mut Lexer<Token>, radix: u32) -> Option<i64> {
    let slice = lex.slice();
    let (negative, digits) = match slice.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, slice),
    };
    let value = i64::from_str_radix(&digits[2..], radix).ok()?;
    Some(if negative { -value } else { value })
}
