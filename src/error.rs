use crate::compiler::Token;

/// A recoverable problem found while compiling, tagged with the position it
/// was found at. Diagnostics are collected, never thrown; a compile that
/// produced any of them gives an unreliable value.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{line}:{column}: {message}")]
pub struct Diagnostic {
    pub line: u32,
    pub column: u32,
    pub message: String,
    pub cause: Cause,
}

/// What a `Diagnostic` was caused by.
#[derive(Clone, Debug, PartialEq)]
pub enum Cause {
    /// The token the parser could not make sense of.
    Token(Token),
    /// The end of file was reached inside a group. `open` is the `(` which
    /// was never closed.
    UnclosedGroup { open: Token, inner: Box<Cause> },
    /// A variable which is not bound by any enclosing lambda or global.
    Variable(Token),
    /// The generated code could not be loaded.
    Load(LoadError),
}

/// An error from turning generated code into a value.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// The code refers to a name that nothing binds.
    #[error("generated code refers to unbound name `{0}`")]
    UnboundName(String),
    /// The number of global values given does not match the number of
    /// globals the code was compiled against.
    #[error("expected {expected} global values, found {found}")]
    GlobalCount { expected: usize, found: usize },
    /// Evaluating the top level of the code failed.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// An error from invoking a compiled value.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    /// Only closures and native functions can be called.
    #[error("attempt to call {0}, which is not a function")]
    NotCallable(String),
    /// A variable slot was missing from the environment.
    #[error("no value in slot {0}")]
    MissingSlot(usize),
    /// Evaluation nested too deeply, most likely because it never ends.
    #[error("evaluation depth limit exceeded (max: {0})")]
    DepthExceeded(usize),
}

impl Diagnostic {
    pub(crate) fn new(line: u32, column: u32, message: impl Into<String>, cause: Cause) -> Self {
        Diagnostic {
            line,
            column,
            message: message.into(),
            cause,
        }
    }

    /// A diagnostic caused by, and positioned at, `token`.
    pub(crate) fn at_token(token: &Token, message: impl Into<String>) -> Self {
        Self::new(token.line, token.column, message, Cause::Token(token.clone()))
    }

    /// Whether this was caused by reaching the end of file.
    pub(crate) fn is_caused_by_eof(&self) -> bool {
        matches!(&self.cause, Cause::Token(token) if token.is_eof())
    }
}

impl From<LoadError> for Diagnostic {
    fn from(e: LoadError) -> Self {
        Diagnostic::new(1, 1, e.to_string(), Cause::Load(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::TokenType;

    #[test]
    fn test_display() {
        let token = Token::new(TokenType::GroupClose, 3, 7, ")");
        let diagnostic = Diagnostic::at_token(&token, "unexpected token )");
        assert_eq!(diagnostic.to_string(), "3:7: unexpected token )");
        assert!(!diagnostic.is_caused_by_eof());
    }

    #[test]
    fn test_load_error_becomes_diagnostic() {
        let diagnostic = Diagnostic::from(LoadError::UnboundName("$x".into()));
        assert_eq!(
            diagnostic.to_string(),
            "1:1: generated code refers to unbound name `$x`"
        );
        assert!(matches!(diagnostic.cause, Cause::Load(_)));
    }
}
