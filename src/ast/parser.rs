use std::iter::Peekable;

use log::debug;

use crate::{
    core::{errors::Diagnostic, Position},
    lexer::{Token, TokenType},
    vm::Value,
};

use super::{BinaryOp, Expr, Stmt, UnaryOp};

pub struct Parser;

/// How deeply groups and conditional branches may nest.
const MAX_DEPTH: usize = 64;

// Macros which make it easier to implement certain common parts of the parser.
macro_rules! rd_term {
    ($name:ident := $token_id:ident, $depth:ident => $ret:ty : $body:expr) => {
        fn $name<'a, T: Iterator<Item = Token<'a>>>(
            $token_id: &mut Peekable<T>,
            $depth: usize,
        ) -> Result<$ret, Diagnostic> {
            $body
        }
    };

    ($name:ident := $next:ident ( $($token:ident => $op:ident)|+ ) => $variant:ident) => {
        rd_term!($name := tokens, depth => Expr : {
            let mut left = Self::$next(tokens, depth)?;

            loop {
                let op = match tokens.peek().map(Token::token_type) {
                    $(Some(TokenType::$token) => BinaryOp::$op,)+
                    _ => return Ok(left),
                };

                tokens.next();
                let right = Self::$next(tokens, depth)?;
                left = Expr::$variant(op, Box::new(left), Box::new(right));
            }
        });
    };
}

macro_rules! rd_matches {
    ($tokens:ident, $($token:ident)|+) => {
        if matches!($tokens.peek().map(Token::token_type), Some($(TokenType::$token)|+)) {
            $tokens.next()
        } else {
            None
        }
    };
}

macro_rules! rd_consume {
    ($tokens:ident, $token:ident) => {
        match $tokens.peek() {
            Some(token) if token.is(TokenType::$token) => {
                $tokens.next();
            }
            other => {
                let position = other.map(Token::position).unwrap_or(Position::EOF);
                return Err(Diagnostic::parse_exception(
                    format!("There should be {} {}", TokenType::$token.article(), TokenType::$token.name()),
                    Position::from_single(position.end(), position.line(), position.col()),
                ));
            }
        }
    };
}

impl Parser {
    /// Parses, folds and checks one expression statement at a time.
    ///
    /// The first diagnostic ends the parse. Statements which were folded before it
    /// are returned in the block, the failing statement is not.
    pub fn parse<'a, I: IntoIterator<Item = Token<'a>>>(tokens: I) -> (Stmt, Vec<Diagnostic>) {
        let mut tokens = tokens.into_iter().peekable();
        let mut stmts = Vec::new();
        let mut errs = Vec::new();

        while !Self::is_at_end(&mut tokens) {
            let stmt = match Self::statement(&mut tokens, 0) {
                Ok(stmt) => stmt.optimize(),
                Err(err) => {
                    errs.push(err);
                    break;
                }
            };

            if let Some(err) = stmt.check_error() {
                errs.push(err.clone());
                break;
            }

            stmts.push(stmt);
        }

        debug!("parsed {} statements with {} errors", stmts.len(), errs.len());
        (Stmt::Block(stmts), errs)
    }

    /// Parses the first expression without folding it.
    pub fn parse_expression<'a, I: IntoIterator<Item = Token<'a>>>(tokens: I) -> Result<Expr, Diagnostic> {
        let mut tokens = tokens.into_iter().peekable();
        Self::expression(&mut tokens, 0)
    }

    fn is_at_end<'a, T: Iterator<Item = Token<'a>>>(tokens: &mut Peekable<T>) -> bool {
        tokens.peek().map(|token| token.is(TokenType::Eof)).unwrap_or(true)
    }

    fn nested(depth: usize, what: &str, position: Position) -> Result<usize, Diagnostic> {
        if depth >= MAX_DEPTH {
            return Err(Diagnostic::parse_exception(format!("too many nested {}", what), position));
        }

        Ok(depth + 1)
    }

    /// An Int token holding the magnitude of `i64::MIN`, which only fits once negated.
    fn is_min_magnitude(token: &Token) -> bool {
        token.is(TokenType::Int) && token.value().and_then(|v| v.parse::<u64>().ok()) == Some(i64::MIN.unsigned_abs())
    }

    rd_term!(statement := tokens, depth => Stmt : {
        let expr = Self::expression(tokens, depth)?;
        rd_matches!(tokens, Semicolon);
        Ok(Stmt::Expression(expr))
    });

    rd_term!(expression := tokens, depth => Expr : {
        Self::ternary(tokens, depth)
    });

    rd_term!(ternary := tokens, depth => Expr : {
        let mut result = Self::null_coalesce(tokens, depth)?;

        while let Some(question) = rd_matches!(tokens, Question) {
            let depth = Self::nested(depth, "conditional expressions", question.position())?;

            let if_true = Self::expression(tokens, depth)?;
            let if_false = if rd_matches!(tokens, Colon).is_some() {
                Some(Box::new(Self::expression(tokens, depth)?))
            } else {
                None
            };

            result = Expr::Ternary(Box::new(result), Box::new(if_true), if_false);
        }

        Ok(result)
    });

    rd_term!(null_coalesce := tokens, depth => Expr : {
        let mut result = Self::logical_or(tokens, depth)?;

        while rd_matches!(tokens, QuestionQuestion).is_some() {
            let right = Self::logical_or(tokens, depth)?;
            result = Expr::NullCoalesce(Box::new(result), Box::new(right));
        }

        Ok(result)
    });

    // The `or` keyword builds the same operator as `and`.
    rd_term!(logical_or := logical_xor ( BarBar => OrOr | Or => And ) => Logical);

    rd_term!(logical_xor := logical_and ( Xor => Xor ) => Logical);

    rd_term!(logical_and := bitwise_or ( AmpAmp => AndAnd | And => And ) => Logical);

    rd_term!(bitwise_or := bitwise_xor ( Bar => BitOr ) => Bitwise);

    rd_term!(bitwise_xor := bitwise_and ( Caret => BitXor ) => Bitwise);

    rd_term!(bitwise_and := equality ( Amp => BitAnd ) => Bitwise);

    rd_term!(equality := tokens, depth => Expr : {
        let mut left = Self::conditional(tokens, depth)?;

        loop {
            let op = if rd_matches!(tokens, EqualEqual).is_some() {
                BinaryOp::Equal
            } else if rd_matches!(tokens, BangEqual).is_some() {
                BinaryOp::NotEqual
            } else if rd_matches!(tokens, Is).is_some() {
                if rd_matches!(tokens, Not).is_some() {
                    BinaryOp::IsNot
                } else {
                    BinaryOp::Is
                }
            } else {
                return Ok(left);
            };

            let right = Self::conditional(tokens, depth)?;
            left = Expr::Equality(op, Box::new(left), Box::new(right));
        }
    });

    rd_term!(conditional := shift (
        Greater => Greater | GreaterEqual => GreaterEqual | Less => Less | LessEqual => LessEqual
    ) => Conditional);

    rd_term!(shift := additive ( LessLess => LeftShift | GreaterGreater => RightShift ) => Shift);

    rd_term!(additive := multiplicative ( Plus => Plus | Minus => Minus ) => Additive);

    rd_term!(multiplicative := unary (
        Star => Star | Slash => Slash | SlashSlash => SlashSlash | Percent => Percent | StarStar => StarStar
    ) => Multiplicative);

    rd_term!(unary := tokens, depth => Expr : {
        match rd_matches!(tokens, Plus | Minus) {
            Some(token) => {
                let op = if token.is(TokenType::Plus) { UnaryOp::Plus } else { UnaryOp::Minus };

                if op == UnaryOp::Minus {
                    let min = tokens.peek().filter(|next| Self::is_min_magnitude(next)).map(Token::position);
                    if let Some(literal) = min {
                        tokens.next();
                        let position = Position::new(token.position().start(), literal.end(), literal.line(), literal.col());
                        return Ok(Expr::Value(position, Value::Integer(i64::MIN)));
                    }
                }

                let operand = Self::primary(tokens, depth)?;
                Ok(Expr::Unary(op, token.position(), Box::new(operand)))
            }
            None => Self::primary(tokens, depth),
        }
    });

    rd_term!(primary := tokens, depth => Expr : {
        let paren = match rd_matches!(tokens, LeftParen) {
            Some(paren) => paren,
            None => return Self::value(tokens, depth),
        };

        let expr = Self::expression(tokens, Self::nested(depth, "parentheses", paren.position())?)?;
        rd_consume!(tokens, RightParen);
        Ok(expr)
    });

    rd_term!(value := tokens, _depth => Expr : {
        let token = tokens.peek().cloned().unwrap_or_else(Token::eof);
        let text = token.value().unwrap_or(token.lexeme());

        let value = match token.token_type() {
            TokenType::Int => text.parse().map(Value::Integer).map_err(|_| Diagnostic::parse_exception(
                format!("Integer literal {} is too large", token.lexeme()),
                token.position(),
            ))?,
            TokenType::Float => text.parse().map(Value::Float).map_err(|_| Diagnostic::parse_exception(
                format!("Float literal {} is malformed", token.lexeme()),
                token.position(),
            ))?,
            TokenType::String => Value::String(text.to_string()),
            TokenType::Bool => Value::Bool(text == "True"),
            TokenType::Null => Value::Null,
            ty => return Err(Diagnostic::parse_exception(
                format!("Unknown expression: {}", ty.name()),
                token.position(),
            )),
        };

        tokens.next();
        Ok(Expr::Value(token.position(), value))
    });
}
