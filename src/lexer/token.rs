use crate::core::Position;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    ty: TokenType,
    value: Option<String>,
    lexeme: &'a str,
    position: Position,
}

impl<'a> std::fmt::Display for Token<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} '{}' ({})", self.ty.name(), self.lexeme, self.position)
    }
}

impl<'a> Token<'a> {
    pub fn new(ty: TokenType, value: Option<String>, lexeme: &'a str, position: Position) -> Self {
        Self {
            ty,
            value,
            lexeme,
            position,
        }
    }

    /// A punctuation or operator token, which carries no value.
    pub fn symbol(ty: TokenType, lexeme: &'a str, position: Position) -> Self {
        Self::new(ty, None, lexeme, position)
    }

    pub fn eof() -> Self {
        Self::symbol(TokenType::Eof, "EOF", Position::EOF)
    }

    pub fn is(&self, ty: TokenType) -> bool {
        self.ty == ty
    }

    pub fn token_type(&self) -> TokenType {
        self.ty
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn lexeme(&self) -> &'a str {
        self.lexeme
    }

    pub fn position(&self) -> Position {
        self.position
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TokenType {
    Int,
    Float,
    String,
    Identifier,
    Bool,
    Null,

    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Equal,

    PlusPlus,
    MinusMinus,
    StarStar,
    SlashSlash,

    Greater,
    Less,
    GreaterGreater,
    LessLess,
    Amp,
    Bar,
    Caret,

    AmpAmp,
    BarBar,
    EqualEqual,
    BangEqual,
    GreaterEqual,
    LessEqual,
    Bang,

    Question,
    QuestionQuestion,
    Colon,
    Semicolon,

    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,

    Is,
    Not,
    And,
    Xor,
    Or,

    Eof,
}

impl TokenType {
    /// The human readable name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            TokenType::Int => "integer",
            TokenType::Float => "float",
            TokenType::String => "string",
            TokenType::Identifier => "identifier",
            TokenType::Bool => "bool",
            TokenType::Null => "null",

            TokenType::Plus => "plus",
            TokenType::Minus => "minus",
            TokenType::Star => "star",
            TokenType::Slash => "slash",
            TokenType::Percent => "percent",
            TokenType::Equal => "equal sign",

            TokenType::PlusPlus => "increment",
            TokenType::MinusMinus => "decrement",
            TokenType::StarStar => "power",
            TokenType::SlashSlash => "floor divide",

            TokenType::Greater => "greater than",
            TokenType::Less => "lower than",
            TokenType::GreaterGreater => "right shift",
            TokenType::LessLess => "left shift",
            TokenType::Amp => "ampersand",
            TokenType::Bar => "bar",
            TokenType::Caret => "caret",

            TokenType::AmpAmp => "and operator",
            TokenType::BarBar => "or operator",
            TokenType::EqualEqual => "equal operator",
            TokenType::BangEqual => "not equal operator",
            TokenType::GreaterEqual => "greater equal",
            TokenType::LessEqual => "lower equal",
            TokenType::Bang => "exclamation mark",

            TokenType::Question => "question mark",
            TokenType::QuestionQuestion => "null coalesce operator",
            TokenType::Colon => "colon",
            TokenType::Semicolon => "semicolon",

            TokenType::LeftParen => "left paren",
            TokenType::RightParen => "right paren",
            TokenType::LeftBracket => "left brace",
            TokenType::RightBracket => "right brace",
            TokenType::LeftBrace => "left curly brace",
            TokenType::RightBrace => "right curly brace",

            TokenType::Is => "is operator",
            TokenType::Not => "not operator",
            TokenType::And => "and word operator",
            TokenType::Xor => "xor word operator",
            TokenType::Or => "or word operator",

            TokenType::Eof => "end of file",
        }
    }

    /// The indefinite article which reads naturally before [`TokenType::name`].
    pub fn article(&self) -> &'static str {
        match self {
            TokenType::Int
            | TokenType::Identifier
            | TokenType::PlusPlus
            | TokenType::Equal
            | TokenType::Amp
            | TokenType::AmpAmp
            | TokenType::BarBar
            | TokenType::EqualEqual
            | TokenType::Bang
            | TokenType::Is
            | TokenType::And
            | TokenType::Or
            | TokenType::Eof => "an",
            _ => "a",
        }
    }
}
