use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty {
        field: &'static str,
    },
    TooManyRecipients {
        max: usize,
        actual: usize,
    },
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    InvalidPhoneNumber {
        input: String,
    },
    InvalidDate {
        input: String,
    },
    InvalidEndpoint {
        input: String,
    },
    MissingEnv {
        name: &'static str,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::TooManyRecipients { max, actual } => {
                write!(f, "too many recipients: {actual} (max {max})")
            }
            Self::LengthMismatch {
                field,
                expected,
                actual,
            } => write!(f, "{field} has {actual} entries, expected {expected}"),
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
            Self::InvalidDate { input } => {
                write!(f, "invalid date: {input} (expected yyyyMMdd)")
            }
            Self::InvalidEndpoint { input } => write!(f, "invalid endpoint: {input}"),
            Self::MissingEnv { name } => write!(f, "environment variable {name} is not set"),
        }
    }
}

impl std::error::Error for ValidationError {}
