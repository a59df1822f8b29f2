use std::fmt;

use super::Position;

/// The three classes of problem the front end reports.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Raised by the scanner, halts tokenization.
    SyntaxError,
    /// Raised by the optimizer for code which is valid but almost certainly wrong.
    SyntaxWarning,
    /// Raised by the parser and optimizer, halts parsing.
    ParseException,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DiagnosticKind::SyntaxError => write!(f, "SyntaxError"),
            DiagnosticKind::SyntaxWarning => write!(f, "SyntaxWarning"),
            DiagnosticKind::ParseException => write!(f, "ParseException"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {text}")]
pub struct Diagnostic {
    kind: DiagnosticKind,
    text: String,
    position: Position,
}

impl Diagnostic {
    pub fn new<T: Into<String>>(kind: DiagnosticKind, text: T, position: Position) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }

    pub fn syntax_error<T: Into<String>>(text: T, position: Position) -> Self {
        Self::new(DiagnosticKind::SyntaxError, text, position)
    }

    pub fn syntax_warning<T: Into<String>>(text: T, position: Position) -> Self {
        Self::new(DiagnosticKind::SyntaxWarning, text, position)
    }

    pub fn parse_exception<T: Into<String>>(text: T, position: Position) -> Self {
        Self::new(DiagnosticKind::ParseException, text, position)
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn position(&self) -> Position {
        self.position
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum PplError {
    #[error("{0}")]
    Diagnostic(#[from] Diagnostic),

    #[error("RuntimeError: {message}\nAdvice: {advice}")]
    Runtime { message: String, advice: String },

    #[error("InternalError: {message}\nAdvice: {advice}")]
    System { message: String, advice: String },
}

impl PplError {
    /// The front end diagnostic behind this error, if it came from the scanner or parser.
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            PplError::Diagnostic(diagnostic) => Some(diagnostic),
            _ => None,
        }
    }
}

pub fn runtime<M: Into<String>, A: Into<String>>(message: M, advice: A) -> PplError {
    PplError::Runtime {
        message: message.into(),
        advice: advice.into(),
    }
}

pub fn system<M: Into<String>, A: Into<String>>(message: M, advice: A) -> PplError {
    PplError::System {
        message: message.into(),
        advice: advice.into(),
    }
}
