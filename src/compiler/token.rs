use std::fmt;

/// The raw text given to the end-of-file token, so diagnostics can say
/// "found end of file".
pub(crate) const END_OF_FILE: &str = "end of file";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub typ: TokenType,
    /// Line of the token's first character, starting at 1.
    pub line: u32,
    /// Column of the token's first character, starting at 1.
    pub column: u32,
    pub raw: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenType {
    /// `\` or `λ`
    Binder,
    /// `.`
    BodyDelimiter,
    /// `(`
    GroupOpen,
    /// `)`
    GroupClose,
    Identifier,

    EndOfFile,
}

impl Token {
    pub(crate) fn new(typ: TokenType, line: u32, column: u32, raw: impl Into<String>) -> Self {
        Token {
            typ,
            line,
            column,
            raw: raw.into(),
        }
    }

    /// The identifier's name, if this is an identifier.
    pub fn name(&self) -> Option<&str> {
        match self.typ {
            TokenType::Identifier => Some(&self.raw),
            _ => None,
        }
    }

    pub fn is_eof(&self) -> bool {
        self.typ == TokenType::EndOfFile
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
