use log::debug;

use crate::core::{errors::Diagnostic, Position};

use super::{Token, TokenType};

#[derive(Debug)]
pub struct Scanner<'a> {
    source: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
    line: isize,
    col: isize,
    has_err: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().collect(),
            pos: 0,
            line: 1,
            col: 1,
            has_err: false,
        }
    }

    /// Scans the whole source, stopping at the first lexical error.
    ///
    /// The returned tokens always end with an [`TokenType::Eof`] token, even when
    /// scanning was cut short by an error.
    pub fn tokenize(mut self) -> (Vec<Token<'a>>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();
        let mut errors = Vec::new();

        for token in &mut self {
            match token {
                Ok(token) => tokens.push(token),
                Err(err) => errors.push(err),
            }
        }

        tokens.push(Token::eof());
        debug!("scanned {} tokens with {} errors", tokens.len(), errors.len());

        (tokens, errors)
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> char {
        self.chars.get(self.pos).map(|(_, c)| *c).unwrap_or('\0')
    }

    /// Moves to the next character. A newline belongs to the line it starts, at column 0.
    fn advance(&mut self) {
        self.pos += 1;
        if self.peek() == '\n' {
            self.line += 1;
            self.col = 0;
        } else {
            self.col += 1;
        }
    }

    fn match_char(&mut self, next: char) -> bool {
        if !self.is_at_end() && self.peek() == next {
            self.advance();
            return true;
        }

        false
    }

    fn byte_offset(&self, pos: usize) -> usize {
        self.chars.get(pos).map(|(offset, _)| *offset).unwrap_or(self.source.len())
    }

    fn slice(&self, start: usize) -> &'a str {
        &self.source[self.byte_offset(start)..self.byte_offset(self.pos)]
    }

    fn read_token(&mut self) -> Option<Result<Token<'a>, Diagnostic>> {
        while !self.is_at_end() {
            if let Some(token) = self.read_operator() {
                return Some(Ok(token));
            }

            match self.peek() {
                c if c.is_ascii_digit() => return Some(self.read_number()),
                c if c.is_alphabetic() || c == '_' => return Some(Ok(self.read_identifier())),
                '"' | '\'' => return Some(self.read_string()),
                '#' => {
                    while !self.is_at_end() && self.peek() != '\n' {
                        self.advance();
                    }
                }
                // Whitespace, and anything else we don't recognize, is skipped.
                _ => self.advance(),
            }
        }

        None
    }

    fn read_operator(&mut self) -> Option<Token<'a>> {
        let (start, line, col) = (self.pos, self.line, self.col);

        let ty = match self.peek() {
            '+' => self.longest(TokenType::Plus, &[('+', TokenType::PlusPlus)]),
            '-' => self.longest(TokenType::Minus, &[('-', TokenType::MinusMinus)]),
            '=' => self.longest(TokenType::Equal, &[('=', TokenType::EqualEqual)]),
            '!' => self.longest(TokenType::Bang, &[('=', TokenType::BangEqual)]),
            '>' => self.longest(TokenType::Greater, &[('>', TokenType::GreaterGreater), ('=', TokenType::GreaterEqual)]),
            '<' => self.longest(TokenType::Less, &[('<', TokenType::LessLess), ('=', TokenType::LessEqual)]),
            '*' => self.longest(TokenType::Star, &[('*', TokenType::StarStar)]),
            '/' => self.longest(TokenType::Slash, &[('/', TokenType::SlashSlash)]),
            '%' => self.longest(TokenType::Percent, &[]),
            '&' => self.longest(TokenType::Amp, &[('&', TokenType::AmpAmp)]),
            '|' => self.longest(TokenType::Bar, &[('|', TokenType::BarBar)]),
            '?' => self.longest(TokenType::Question, &[('?', TokenType::QuestionQuestion)]),
            ':' => self.longest(TokenType::Colon, &[]),
            ';' => self.longest(TokenType::Semicolon, &[]),
            '^' => self.longest(TokenType::Caret, &[]),
            '(' => self.longest(TokenType::LeftParen, &[]),
            ')' => self.longest(TokenType::RightParen, &[]),
            '[' => self.longest(TokenType::LeftBracket, &[]),
            ']' => self.longest(TokenType::RightBracket, &[]),
            '{' => self.longest(TokenType::LeftBrace, &[]),
            '}' => self.longest(TokenType::RightBrace, &[]),
            _ => return None,
        };

        let position = if self.pos - start == 1 {
            Position::from_single(start as isize, line, col)
        } else {
            Position::new(start as isize, self.pos as isize, line, col)
        };

        Some(Token::symbol(ty, self.slice(start), position))
    }

    /// Consumes the current character, then the first of `pairs` whose second character follows it.
    fn longest(&mut self, single: TokenType, pairs: &[(char, TokenType)]) -> TokenType {
        self.advance();

        for (next, ty) in pairs {
            if self.match_char(*next) {
                return *ty;
            }
        }

        single
    }

    fn read_number(&mut self) -> Result<Token<'a>, Diagnostic> {
        let (start, line, col) = (self.pos, self.line, self.col);

        let mut value = String::new();
        let mut has_dot = false;
        let mut malformed = false;

        loop {
            match self.peek() {
                '.' => {
                    malformed |= has_dot;
                    has_dot = true;
                }
                '_' => {
                    self.advance();
                    continue;
                }
                c if c.is_ascii_digit() => {}
                _ => break,
            }

            value.push(self.peek());
            self.advance();
        }

        let position = Position::new(start as isize, self.pos as isize, line, col);

        if malformed {
            return Err(Diagnostic::syntax_error("invalid syntax. Perhaps you forgot a comma?", position));
        }

        let ty = if has_dot { TokenType::Float } else { TokenType::Int };
        Ok(Token::new(ty, Some(value), self.slice(start), position))
    }

    fn read_identifier(&mut self) -> Token<'a> {
        let (start, line, col) = (self.pos, self.line, self.col);

        while self.peek().is_alphanumeric() || self.peek() == '_' {
            self.advance();
        }

        let lexeme = self.slice(start);
        let position = Position::new(start as isize, self.pos as isize, line, col);

        let ty = match lexeme {
            "is" => TokenType::Is,
            "not" => TokenType::Not,
            "and" => TokenType::And,
            "xor" => TokenType::Xor,
            "or" => TokenType::Or,
            "True" | "False" => TokenType::Bool,
            "null" => TokenType::Null,
            _ => TokenType::Identifier,
        };

        Token::new(ty, Some(lexeme.to_string()), lexeme, position)
    }

    fn read_string(&mut self) -> Result<Token<'a>, Diagnostic> {
        let (start, line, col) = (self.pos, self.line, self.col);
        let quote = self.peek();
        self.advance();

        let mut value = String::new();
        loop {
            if self.is_at_end() || self.peek() == '\n' {
                return Err(Diagnostic::syntax_error(
                    "unterminated string literal",
                    Position::new(start as isize, self.pos as isize, line, col),
                ));
            }

            let c = self.peek();
            self.advance();

            match c {
                c if c == quote => break,
                '\\' if !self.is_at_end() && self.peek() != '\n' => {
                    let escaped = self.peek();
                    self.advance();

                    value.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        '0' => '\0',
                        other => other,
                    });
                }
                c => value.push(c),
            }
        }

        let position = Position::new(start as isize, self.pos as isize, line, col);
        Ok(Token::new(TokenType::String, Some(value), self.slice(start), position))
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token<'a>, Diagnostic>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.has_err {
            return None;
        }

        let token = self.read_token();
        if let Some(Err(_)) = &token {
            self.has_err = true;
        }

        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_symbol(token: &Token, ty: TokenType, lexeme: &str, position: Position) {
        assert_eq!(token.token_type(), ty, "token type of {}", token);
        assert_eq!(token.value(), None, "value of {}", token);
        assert_eq!(token.lexeme(), lexeme);
        assert_eq!(token.position(), position, "position of {}", token);
    }

    #[test]
    fn test_single_operators() {
        let (tokens, errors) = Scanner::new("    \n+   \n\n -*/+ \t\r\n -+* \r\t\t\n /").tokenize();
        assert!(errors.is_empty(), "no errors");

        assert_symbol(&tokens[0], TokenType::Plus, "+", Position::from_single(5, 2, 1));
        assert_symbol(&tokens[1], TokenType::Minus, "-", Position::from_single(12, 4, 2));
        assert_symbol(&tokens[2], TokenType::Star, "*", Position::from_single(13, 4, 3));
        assert_symbol(&tokens[3], TokenType::Slash, "/", Position::from_single(14, 4, 4));
        assert_symbol(&tokens[4], TokenType::Plus, "+", Position::from_single(15, 4, 5));
        assert_symbol(&tokens[5], TokenType::Minus, "-", Position::from_single(21, 5, 2));
        assert_symbol(&tokens[6], TokenType::Plus, "+", Position::from_single(22, 5, 3));
        assert_symbol(&tokens[7], TokenType::Star, "*", Position::from_single(23, 5, 4));
        assert_symbol(&tokens[8], TokenType::Slash, "/", Position::from_single(30, 6, 2));
        assert!(tokens[9].is(TokenType::Eof));
        assert_eq!(tokens.len(), 10);
    }

    #[test]
    fn test_various_operators() {
        let (tokens, errors) = Scanner::new(" ++ -- ** // > < >> << & | ^ && || == != >= <= () [] {}").tokenize();
        assert!(errors.is_empty(), "no errors");

        let expected = [
            (TokenType::PlusPlus, "++", Position::new(1, 3, 1, 2)),
            (TokenType::MinusMinus, "--", Position::new(4, 6, 1, 5)),
            (TokenType::StarStar, "**", Position::new(7, 9, 1, 8)),
            (TokenType::SlashSlash, "//", Position::new(10, 12, 1, 11)),
            (TokenType::Greater, ">", Position::from_single(13, 1, 14)),
            (TokenType::Less, "<", Position::from_single(15, 1, 16)),
            (TokenType::GreaterGreater, ">>", Position::new(17, 19, 1, 18)),
            (TokenType::LessLess, "<<", Position::new(20, 22, 1, 21)),
            (TokenType::Amp, "&", Position::from_single(23, 1, 24)),
            (TokenType::Bar, "|", Position::from_single(25, 1, 26)),
            (TokenType::Caret, "^", Position::from_single(27, 1, 28)),
            (TokenType::AmpAmp, "&&", Position::new(29, 31, 1, 30)),
            (TokenType::BarBar, "||", Position::new(32, 34, 1, 33)),
            (TokenType::EqualEqual, "==", Position::new(35, 37, 1, 36)),
            (TokenType::BangEqual, "!=", Position::new(38, 40, 1, 39)),
            (TokenType::GreaterEqual, ">=", Position::new(41, 43, 1, 42)),
            (TokenType::LessEqual, "<=", Position::new(44, 46, 1, 45)),
            (TokenType::LeftParen, "(", Position::from_single(47, 1, 48)),
            (TokenType::RightParen, ")", Position::from_single(48, 1, 49)),
            (TokenType::LeftBracket, "[", Position::from_single(50, 1, 51)),
            (TokenType::RightBracket, "]", Position::from_single(51, 1, 52)),
            (TokenType::LeftBrace, "{", Position::from_single(53, 1, 54)),
            (TokenType::RightBrace, "}", Position::from_single(54, 1, 55)),
        ];

        for (token, (ty, lexeme, position)) in tokens.iter().zip(expected) {
            assert_symbol(token, ty, lexeme, position);
        }

        assert_eq!(tokens.len(), expected.len() + 1);
    }

    #[test]
    fn test_adjacent_operators_are_split() {
        let (tokens, errors) = Scanner::new("-*?:!<=!").tokenize();
        assert!(errors.is_empty());

        let types: Vec<TokenType> = tokens.iter().map(|t| t.token_type()).collect();
        assert_eq!(types, vec![
            TokenType::Minus,
            TokenType::Star,
            TokenType::Question,
            TokenType::Colon,
            TokenType::Bang,
            TokenType::LessEqual,
            TokenType::Bang,
            TokenType::Eof,
        ]);
    }

    #[test]
    fn test_numbers() {
        let (tokens, errors) = Scanner::new("21312312\t\t\t1231.21\n21_4_1__2").tokenize();
        assert!(errors.is_empty(), "no errors");

        assert_eq!(tokens[0].token_type(), TokenType::Int);
        assert_eq!(tokens[0].value(), Some("21312312"));
        assert_eq!(tokens[0].lexeme(), "21312312");
        assert_eq!(tokens[0].position(), Position::new(0, 8, 1, 1));

        assert_eq!(tokens[1].token_type(), TokenType::Float);
        assert_eq!(tokens[1].value(), Some("1231.21"));
        assert_eq!(tokens[1].lexeme(), "1231.21");
        assert_eq!(tokens[1].position(), Position::new(11, 18, 1, 12));

        assert_eq!(tokens[2].token_type(), TokenType::Int);
        assert_eq!(tokens[2].value(), Some("21412"));
        assert_eq!(tokens[2].lexeme(), "21_4_1__2");
        assert_eq!(tokens[2].position(), Position::new(19, 28, 2, 1));
    }

    #[test]
    fn test_operators_after_numbers() {
        let (tokens, errors) = Scanner::new("999 + 1512_- 124").tokenize();
        assert!(errors.is_empty(), "no errors");

        assert_eq!(tokens[0].value(), Some("999"));
        assert_eq!(tokens[0].position(), Position::new(0, 3, 1, 1));

        assert_symbol(&tokens[1], TokenType::Plus, "+", Position::new(4, 4, 1, 5));

        assert_eq!(tokens[2].token_type(), TokenType::Int);
        assert_eq!(tokens[2].value(), Some("1512"));
        assert_eq!(tokens[2].lexeme(), "1512_");
        assert_eq!(tokens[2].position(), Position::new(6, 11, 1, 7));

        assert_symbol(&tokens[3], TokenType::Minus, "-", Position::new(11, 11, 1, 12));

        assert_eq!(tokens[4].value(), Some("124"));
        assert_eq!(tokens[4].position(), Position::new(13, 16, 1, 14));
    }

    #[test]
    fn test_number_errors() {
        let (tokens, errors) = Scanner::new("2131.2.312 217_945.3125.7899.312__552.3086").tokenize();

        assert_eq!(errors.len(), 1, "scanning stops at the first error");
        assert_eq!(errors[0].kind(), crate::core::errors::DiagnosticKind::SyntaxError);
        assert_eq!(errors[0].text(), "invalid syntax. Perhaps you forgot a comma?");
        assert_eq!(errors[0].position(), Position::new(0, 10, 1, 1));

        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].is(TokenType::Eof));

        let (_, errors) = Scanner::new("217_945.3125.7899.312__552.3086").tokenize();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].position(), Position::new(0, 31, 1, 1));
    }

    #[test]
    fn test_tokens_before_an_error_are_kept() {
        let (tokens, errors) = Scanner::new("1 + 2.3.4 + 5").tokenize();

        assert_eq!(errors.len(), 1);
        let types: Vec<TokenType> = tokens.iter().map(|t| t.token_type()).collect();
        assert_eq!(types, vec![TokenType::Int, TokenType::Plus, TokenType::Eof]);
    }

    #[test]
    fn test_identifiers_and_keywords() {
        let (tokens, errors) = Scanner::new("identifier _id a_b2\nis not and xor or True False null").tokenize();
        assert!(errors.is_empty());

        for (token, name) in tokens.iter().zip(["identifier", "_id", "a_b2"]) {
            assert_eq!(token.token_type(), TokenType::Identifier);
            assert_eq!(token.value(), Some(name));
        }

        let keywords = [
            TokenType::Is,
            TokenType::Not,
            TokenType::And,
            TokenType::Xor,
            TokenType::Or,
            TokenType::Bool,
            TokenType::Bool,
            TokenType::Null,
        ];
        for (token, ty) in tokens[3..].iter().zip(keywords) {
            assert_eq!(token.token_type(), ty, "{}", token);
        }

        assert_eq!(tokens[8].value(), Some("True"));
        assert_eq!(tokens[3].position(), Position::new(20, 22, 2, 1));
    }

    #[test]
    fn test_strings() {
        let (tokens, errors) = Scanner::new(r#" "a\tb" 'it\'s' "#).tokenize();
        assert!(errors.is_empty());

        assert_eq!(tokens[0].token_type(), TokenType::String);
        assert_eq!(tokens[0].value(), Some("a\tb"));
        assert_eq!(tokens[0].lexeme(), r#""a\tb""#);
        assert_eq!(tokens[0].position(), Position::new(1, 7, 1, 2));

        assert_eq!(tokens[1].value(), Some("it's"));
    }

    #[test]
    fn test_unterminated_string() {
        let (tokens, errors) = Scanner::new("1 + \"abc\n\"").tokenize();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].text(), "unterminated string literal");
        assert_eq!(errors[0].position(), Position::new(4, 8, 1, 5));
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn test_comments_and_unknown_characters_are_skipped() {
        let (tokens, errors) = Scanner::new("1 # a comment ++\n$ @ 2").tokenize();
        assert!(errors.is_empty());

        let values: Vec<Option<&str>> = tokens.iter().map(|t| t.value()).collect();
        assert_eq!(values, vec![Some("1"), Some("2"), None]);
    }

    #[test]
    fn test_empty_source() {
        let (tokens, errors) = Scanner::new("").tokenize();
        assert!(errors.is_empty());
        assert_eq!(tokens, vec![Token::eof()]);
    }
}
