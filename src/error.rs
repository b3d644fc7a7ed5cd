use std::fmt;

use crate::{content::Context, objects::ValueKind};

#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The input ended in the middle of a statement
    UnexpectedEof {
        expected: &'static str,
    },
    UnexpectedToken {
        expected: &'static str,
        found: String,
    },
    UnknownOperator {
        found: String,
    },
    /// A single-signature operator found fewer operands than it takes
    InsufficientOperands {
        operator: &'static str,
        expected: usize,
        found: usize,
    },
    TypeMismatch {
        operator: &'static str,
        position: usize,
        expected: ValueKind,
        /// `None` for a variable whose declaration was never seen
        found: Option<ValueKind>,
    },
    /// None of an overloaded operator's signatures matched the top of the stack
    NoOperandMatch {
        operator: &'static str,
        found: Vec<Option<ValueKind>>,
    },
    /// Operands were left on the stack after an operator consumed its own
    UnconsumedOperands {
        operator: &'static str,
        count: usize,
    },
    /// The input ended with operands that no operator consumed
    DanglingOperands {
        count: usize,
    },
    NotAllowedInContext {
        operator: &'static str,
        context: Context,
    },
    /// A page ended while a path or text object was still open
    UnclosedContext {
        context: Context,
    },
    UnsupportedVariableType {
        found: String,
    },
    UnrecognizedVariant {
        ty: &'static str,
        found: String,
    },
    ComponentCountMismatch {
        what: String,
        expected: usize,
        found: usize,
    },
    MissingRequiredKey {
        key: String,
    },
    InvalidDictionaryValue {
        key: String,
        expected: ValueKind,
        found: ValueKind,
    },
    UndeclaredVariable {
        name: String,
    },
    UndeclaredResource {
        name: String,
    },
    VariableTypeMismatch {
        name: String,
        expected: ValueKind,
        found: ValueKind,
    },
    DuplicateDeclaration {
        name: String,
    },
    UnknownPageTemplate {
        found: String,
    },
    ObjectReferenceNotSupported,
}

fn display_kind(kind: &Option<ValueKind>) -> String {
    match kind {
        Some(kind) => kind.to_string(),
        None => "unresolved variable".to_owned(),
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof { expected } => {
                write!(f, "unexpected end of input, expected {}", expected)
            }
            Self::UnexpectedToken { expected, found } => {
                write!(f, "expected {}, found {}", expected, found)
            }
            Self::UnknownOperator { found } => write!(f, "unknown operator {:?}", found),
            Self::InsufficientOperands {
                operator,
                expected,
                found,
            } => write!(
                f,
                "operator {} takes {} operands, found {}",
                operator, expected, found
            ),
            Self::TypeMismatch {
                operator,
                position,
                expected,
                found,
            } => write!(
                f,
                "operand {} of {}: expected {}, found {}",
                position,
                operator,
                expected,
                display_kind(found)
            ),
            Self::NoOperandMatch { operator, found } => write!(
                f,
                "no signature of {} matches operands [{}]",
                operator,
                found.iter().map(display_kind).collect::<Vec<_>>().join(", ")
            ),
            Self::UnconsumedOperands { operator, count } => write!(
                f,
                "{} unconsumed operands left before operator {}",
                count, operator
            ),
            Self::DanglingOperands { count } => {
                write!(f, "{} operands at end of input without an operator", count)
            }
            Self::NotAllowedInContext { operator, context } => write!(
                f,
                "operator {} is not allowed in the {} context",
                operator, context
            ),
            Self::UnclosedContext { context } => {
                write!(f, "page ended inside an open {} object", context)
            }
            Self::UnsupportedVariableType { found } => {
                write!(f, "unsupported variable type {}", found)
            }
            Self::UnrecognizedVariant { ty, found } => {
                write!(f, "unrecognized {} {:?}", ty, found)
            }
            Self::ComponentCountMismatch {
                what,
                expected,
                found,
            } => write!(
                f,
                "{} requires {} components, found {}",
                what, expected, found
            ),
            Self::MissingRequiredKey { key } => write!(f, "missing required key {}", key),
            Self::InvalidDictionaryValue {
                key,
                expected,
                found,
            } => write!(f, "value of {}: expected {}, found {}", key, expected, found),
            Self::UndeclaredVariable { name } => write!(f, "undeclared variable {}", name),
            Self::UndeclaredResource { name } => write!(f, "undeclared resource {}", name),
            Self::VariableTypeMismatch {
                name,
                expected,
                found,
            } => write!(
                f,
                "variable {} is declared as {}, found {}",
                name, expected, found
            ),
            Self::DuplicateDeclaration { name } => write!(f, "{} is already declared", name),
            Self::UnknownPageTemplate { found } => write!(f, "unknown page template {}", found),
            Self::ObjectReferenceNotSupported => {
                write!(f, "object references are not supported in scripts")
            }
        }
    }
}

impl std::error::Error for ParseError {}

pub type PdfResult<T> = anyhow::Result<T>;
