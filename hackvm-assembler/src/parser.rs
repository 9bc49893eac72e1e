//! Assembly parser
//!
//! Turns source text into a list of [`Statement`]s, one per label,
//! directive or instruction. Operand types are only checked loosely here;
//! the assembler decides what each mnemonic accepts.

use crate::error::{AssemblerError, Result};
use crate::lexer::Token;
use hackvm_spec::Register;
use logos::Logos;
use std::ops::Range;

/// Instruction operand
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Register(Register),
    Immediate(i64),
    /// Bare identifier: a label, an irq kind, or a misspelled register
    Symbol(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementKind {
    /// `name:`
    Label(String),
    /// `.name operands`
    Directive { name: String, operands: Vec<Operand> },
    /// `mnemonic operands`
    Instruction { mnemonic: String, operands: Vec<Operand> },
}

/// One parsed statement with its 1-based source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub line: usize,
    pub kind: StatementKind,
}

/// Parse assembly source into statements
pub fn parse(source: &str) -> Result<Vec<Statement>> {
    let mut statements = Vec::new();
    let mut lexer = Token::lexer(source);
    let mut line_tokens: Vec<(Token, Range<usize>)> = Vec::new();
    let mut line = 1;
    let mut line_start = 0;

    while let Some(token) = lexer.next() {
        let span = lexer.span();
        let token = token.map_err(|_| AssemblerError::SyntaxError {
            line,
            column: span.start - line_start + 1,
            message: format!("Unexpected character(s) {:?}", &source[span.clone()]),
        })?;

        if token == Token::Newline {
            parse_line(&line_tokens, line, line_start, &mut statements)?;
            line_tokens.clear();
            line += 1;
            line_start = span.end;
        } else {
            line_tokens.push((token, span));
        }
    }
    parse_line(&line_tokens, line, line_start, &mut statements)?;

    Ok(statements)
}

/// Parse a single instruction line without labels, e.g. `addi r1, r0, 5`
pub fn parse_instruction(text: &str) -> Result<Statement> {
    let mut statements = parse(text)?;
    match statements.len() {
        1 if matches!(statements[0].kind, StatementKind::Instruction { .. }) => {
            Ok(statements.remove(0))
        }
        _ => Err(AssemblerError::SyntaxError {
            line: 1,
            column: 1,
            message: "Expected exactly one instruction".to_string(),
        }),
    }
}

/// Parse register name
pub fn parse_register(name: &str) -> Result<Register> {
    Ok(name.trim().parse::<Register>()?)
}

fn parse_line(
    tokens: &[(Token, Range<usize>)],
    line: usize,
    line_start: usize,
    out: &mut Vec<Statement>,
) -> Result<()> {
    let mut rest = tokens;

    // Leading labels
    while let [(Token::Identifier(name), _), (Token::Colon, _), tail @ ..] = rest {
        out.push(Statement {
            line,
            kind: StatementKind::Label(name.clone()),
        });
        rest = tail;
    }

    let Some(((head, span), tail)) = rest.split_first() else {
        return Ok(());
    };
    let operands = parse_operands(tail, line, line_start)?;

    let kind = match head {
        Token::Identifier(mnemonic) => StatementKind::Instruction {
            mnemonic: mnemonic.to_lowercase(),
            operands,
        },
        Token::Directive(name) => StatementKind::Directive {
            name: name.to_lowercase(),
            operands,
        },
        other => {
            return Err(AssemblerError::SyntaxError {
                line,
                column: span.start - line_start + 1,
                message: format!("Expected instruction or label, found {:?}", other),
            })
        }
    };

    out.push(Statement { line, kind });
    Ok(())
}

/// Comma-separated operand list
fn parse_operands(
    tokens: &[(Token, Range<usize>)],
    line: usize,
    line_start: usize,
) -> Result<Vec<Operand>> {
    let mut operands = Vec::new();
    let mut expect_operand = true;

    for (token, span) in tokens {
        let column = span.start - line_start + 1;
        let syntax = |message: String| AssemblerError::SyntaxError { line, column, message };

        if expect_operand {
            let operand = match token {
                Token::Register(reg) => Operand::Register(*reg),
                Token::Identifier(name) => Operand::Symbol(name.clone()),
                other => match other.immediate() {
                    Some(value) => Operand::Immediate(value),
                    None => return Err(syntax(format!("Expected operand, found {:?}", other))),
                },
            };
            operands.push(operand);
            expect_operand = false;
        } else if *token == Token::Comma {
            expect_operand = true;
        } else {
            return Err(syntax(format!("Expected ',', found {:?}", token)));
        }
    }

    if expect_operand && !operands.is_empty() {
        return Err(AssemblerError::SyntaxError {
            line,
            column: tokens.last().map_or(1, |(_, span)| span.end - line_start + 1),
            message: "Trailing ','".to_string(),
        });
    }

    Ok(operands)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instruction(mnemonic: &str, operands: Vec<Operand>) -> StatementKind {
        StatementKind::Instruction {
            mnemonic: mnemonic.to_string(),
            operands,
        }
    }

    #[test]
    fn test_parse_instruction() {
        let stmt = parse_instruction("addi r1, r0, -1").unwrap();
        assert_eq!(
            stmt.kind,
            instruction(
                "addi",
                vec![
                    Operand::Register(Register::R1),
                    Operand::Register(Register::R0),
                    Operand::Immediate(-1)
                ]
            )
        );
    }

    #[test]
    fn test_parse_labels_and_lines() {
        let source = "start:\n  jmp end ; forward\nend: loop: hlt\n";
        let statements = parse(source).unwrap();

        assert_eq!(statements.len(), 5);
        assert_eq!(statements[0].kind, StatementKind::Label("start".to_string()));
        assert_eq!(statements[0].line, 1);
        assert_eq!(
            statements[1].kind,
            instruction("jmp", vec![Operand::Symbol("end".to_string())])
        );
        assert_eq!(statements[1].line, 2);
        assert_eq!(statements[2].kind, StatementKind::Label("end".to_string()));
        assert_eq!(statements[3].kind, StatementKind::Label("loop".to_string()));
        assert_eq!(statements[4].kind, instruction("hlt", vec![]));
        assert_eq!(statements[4].line, 3);
    }

    #[test]
    fn test_parse_directive() {
        let statements = parse(".offset 0x1000").unwrap();
        assert_eq!(
            statements[0].kind,
            StatementKind::Directive {
                name: "offset".to_string(),
                operands: vec![Operand::Immediate(0x1000)],
            }
        );
    }

    #[test]
    fn test_mnemonics_are_case_insensitive() {
        let stmt = parse_instruction("NOP").unwrap();
        assert_eq!(stmt.kind, instruction("nop", vec![]));
    }

    #[test]
    fn test_missing_comma() {
        let err = parse("add r1 r2, r3").unwrap_err();
        assert!(matches!(err, AssemblerError::SyntaxError { line: 1, column: 8, .. }));
    }

    #[test]
    fn test_trailing_comma() {
        assert!(matches!(
            parse("add r1, r2,"),
            Err(AssemblerError::SyntaxError { .. })
        ));
    }

    #[test]
    fn test_bad_character_reports_line() {
        let err = parse("nop\nnop\n  add $").unwrap_err();
        assert!(matches!(err, AssemblerError::SyntaxError { line: 3, column: 7, .. }));
    }

    #[test]
    fn test_parse_register() {
        assert_eq!(parse_register(" r3 ").unwrap(), Register::R3);
        assert!(matches!(
            parse_register("r9"),
            Err(AssemblerError::UnknownRegister(_))
        ));
    }

    #[test]
    fn test_blank_and_comment_lines() {
        let statements = parse("\n; only a comment\n# another\n\n").unwrap();
        assert!(statements.is_empty());
    }
}
