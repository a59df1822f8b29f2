use std::fmt;

macro_rules! operators {
    ($(#[$meta:meta])* $enum:ident { $($variant:ident => $name:literal,)+ }) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
        pub enum $enum {
            $($variant,)+
        }

        impl $enum {
            /// The name used when printing trees and reporting diagnostics.
            pub fn name(&self) -> &'static str {
                match self {
                    $($enum::$variant => $name,)+
                }
            }
        }

        impl fmt::Display for $enum {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}", self.name())
            }
        }
    };
}

operators!(
    /// The operator of a two operand node. Which node family it belongs to is
    /// decided by the [`Expr`](super::Expr) variant holding it.
    BinaryOp {
        Plus => "plus",
        Minus => "minus",

        Star => "star",
        Slash => "slash",
        SlashSlash => "floor divide",
        Percent => "percent",
        StarStar => "power",

        LeftShift => "left shift",
        RightShift => "right shift",

        Greater => "greater than",
        GreaterEqual => "greater equal",
        Less => "lower than",
        LessEqual => "lower equal",

        Equal => "equal operator",
        NotEqual => "not equal operator",
        Is => "is operator",
        IsNot => "not operator",

        BitAnd => "ampersand",
        BitOr => "bar",
        BitXor => "caret",

        AndAnd => "and operator",
        OrOr => "or operator",
        And => "and word operator",
        Xor => "xor word operator",

        Coalesce => "null coalesce operator",
    }
);

operators!(
    UnaryOp {
        Plus => "plus",
        Minus => "minus",
    }
);
