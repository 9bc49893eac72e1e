//! Assembler errors

use hackvm_spec::SpecError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssemblerError {
    #[error("Syntax error at line {line}, column {column}: {message}")]
    SyntaxError {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Unknown instruction: {0}")]
    UnknownInstruction(String),

    #[error("Unknown register: {0}")]
    UnknownRegister(String),

    #[error("Unknown irq type \"{0}\"")]
    UnknownIrq(String),

    #[error("`{mnemonic}` takes {expected} argument(s), found {found}")]
    ArgumentCount {
        mnemonic: String,
        expected: usize,
        found: usize,
    },

    #[error("`{mnemonic}` operand {index}: expected {expected}")]
    OperandType {
        mnemonic: String,
        index: usize,
        expected: &'static str,
    },

    #[error("`{mnemonic}` immediate {value} out of range [{min}, {max}]")]
    ImmediateOutOfRange {
        mnemonic: String,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("lui immediate {0:#06x} has non-zero low 6 bits (mask is 0xffc0)")]
    MisalignedLui(u32),

    #[error("Raw word {0:#06x} is a well-formed instruction, not an invalid one")]
    WellFormedRawWord(u16),

    #[error("Branch to {label} out of range: delta {delta}")]
    BranchOutOfRange { label: String, delta: i64 },

    #[error("Label {0} unbound")]
    UnboundLabel(String),

    #[error("Label {0} bound twice")]
    LabelRebound(String),

    #[error("Invalid directive: {0}")]
    InvalidDirective(String),

    #[error("line {line}: {source}")]
    AtLine {
        line: usize,
        source: Box<AssemblerError>,
    },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AssemblerError {
    /// Attach a source line to an error raised while assembling it
    pub fn at_line(self, line: usize) -> Self {
        match self {
            err @ (AssemblerError::SyntaxError { .. } | AssemblerError::AtLine { .. }) => err,
            err => AssemblerError::AtLine {
                line,
                source: Box::new(err),
            },
        }
    }

    /// The error with any line context stripped
    pub fn root(&self) -> &AssemblerError {
        match self {
            AssemblerError::AtLine { source, .. } => source.root(),
            err => err,
        }
    }
}

impl From<SpecError> for AssemblerError {
    fn from(err: SpecError) -> Self {
        match err {
            SpecError::UnknownRegister(name) => AssemblerError::UnknownRegister(name),
            SpecError::InvalidRegister(index) => AssemblerError::UnknownRegister(format!("r{}", index)),
            SpecError::UnknownIrq(name) => AssemblerError::UnknownIrq(name),
            SpecError::InvalidConfig(err) => AssemblerError::InvalidDirective(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, AssemblerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_line_wraps_once() {
        let err = AssemblerError::UnknownRegister("r9".to_string()).at_line(3);
        assert_eq!(err.to_string(), "line 3: Unknown register: r9");

        let err = err.at_line(4);
        assert_eq!(err.to_string(), "line 3: Unknown register: r9");
        assert!(matches!(err.root(), AssemblerError::UnknownRegister(_)));
    }

    #[test]
    fn test_from_spec_error() {
        let err: AssemblerError = SpecError::UnknownIrq("halt".to_string()).into();
        assert!(matches!(err, AssemblerError::UnknownIrq(ref name) if name == "halt"));
    }

    #[test]
    fn test_argument_count_display() {
        let err = AssemblerError::ArgumentCount {
            mnemonic: "add".to_string(),
            expected: 3,
            found: 2,
        };
        assert_eq!(err.to_string(), "`add` takes 3 argument(s), found 2");
    }
}
