use thiserror::Error;

/// The three failure classes a top-level form can raise. Any raised error
/// unwinds evaluation back to the driver; there is no partial recovery.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemeError {
    /// The program is structurally malformed (wrong arg shape, trailing
    /// tokens, improper list where a special form requires proper).
    #[error("Syntax Error: {0}")]
    Syntax(String),
    /// Evaluation reached an invalid operation on well-formed input.
    #[error("Runtime Error: {0}")]
    Runtime(String),
    /// Identifier lookup failed in every enclosing frame.
    #[error("Name Error: {0}")]
    Name(String),
}

pub type Result<T> = std::result::Result<T, SchemeError>;

impl SchemeError {
    pub fn syntax<S: Into<String>>(msg: S) -> Self {
        SchemeError::Syntax(msg.into())
    }

    pub fn runtime<S: Into<String>>(msg: S) -> Self {
        SchemeError::Runtime(msg.into())
    }

    pub fn name<S: Into<String>>(msg: S) -> Self {
        SchemeError::Name(msg.into())
    }

    /// Reclassifies a `Runtime` error into a `Syntax` error, leaving other
    /// variants untouched. Used by special forms that need their own
    /// argument-shape diagnostics over the shared `collect` helper.
    pub fn into_syntax(self) -> Self {
        match self {
            SchemeError::Runtime(msg) => SchemeError::Syntax(msg),
            other => other,
        }
    }
}
