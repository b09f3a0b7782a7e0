#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    UnexpectedChar(char),
    MalformedExpression(String),
    UnknownVariable(String),
    InvalidAssignmentTarget(String),
    NonFiniteResult,
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalError::UnexpectedChar(ch) => {
                write!(f, "Unexpected character: '{}'", ch)
            }
            EvalError::MalformedExpression(msg) => {
                write!(f, "Malformed expression: {}", msg)
            }
            EvalError::UnknownVariable(name) => {
                write!(f, "Unknown variable: {}", name)
            }
            EvalError::InvalidAssignmentTarget(name) => {
                write!(f, "Invalid assignment target: {}", name)
            }
            EvalError::NonFiniteResult => {
                write!(f, "Result is not a finite number")
            }
        }
    }
}

impl std::error::Error for EvalError {}

pub type EvalResult<T> = Result<T, EvalError>;
