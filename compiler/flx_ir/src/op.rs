//! Operator codes carried by `Unary` and `Binary` nodes.

use std::fmt;

/// Binary operators, including the unsigned comparison variants the
/// coercion engine rewrites signed comparisons into.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    /// Arithmetic shift right.
    Sar,
    /// Logical shift right.
    Shr,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    LtU,
    LeU,
    GtU,
    GeU,
    /// Short-circuit boolean and.
    And,
    /// Short-circuit boolean or.
    Or,
}

impl BinaryOp {
    #[inline]
    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Eq
                | Self::Ne
                | Self::Lt
                | Self::Le
                | Self::Gt
                | Self::Ge
                | Self::LtU
                | Self::LeU
                | Self::GtU
                | Self::GeU
        )
    }

    #[inline]
    pub const fn is_arithmetic(self) -> bool {
        matches!(self, Self::Add | Self::Sub | Self::Mul | Self::Div | Self::Mod)
    }

    #[inline]
    pub const fn is_bitwise(self) -> bool {
        matches!(self, Self::BitAnd | Self::BitOr | Self::BitXor)
    }

    #[inline]
    pub const fn is_shift(self) -> bool {
        matches!(self, Self::Shl | Self::Sar | Self::Shr)
    }

    #[inline]
    pub const fn is_logical(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }

    /// Unsigned counterpart of an ordering comparison. Equality and every
    /// non-comparison operator map to themselves.
    pub const fn to_unsigned(self) -> Self {
        match self {
            Self::Lt => Self::LtU,
            Self::Le => Self::LeU,
            Self::Gt => Self::GtU,
            Self::Ge => Self::GeU,
            other => other,
        }
    }

    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::Shl => "<<",
            Self::Sar => ">>",
            Self::Shr => ">>>",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::LtU => "+<",
            Self::LeU => "+<=",
            Self::GtU => "+>",
            Self::GeU => "+>=",
            Self::And => "&&",
            Self::Or => "||",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}

/// Unary operators. `Increment`/`Decrement` modify their operand.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    Negate,
    Abs,
    BitNot,
    Not,
    Increment,
    Decrement,
}

impl UnaryOp {
    #[inline]
    pub const fn modifies_operand(self) -> bool {
        matches!(self, Self::Increment | Self::Decrement)
    }

    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Negate => "-",
            Self::Abs => "||",
            Self::BitNot => "~",
            Self::Not => "!",
            Self::Increment => "++",
            Self::Decrement => "--",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}

/// Explicit widening inserted by integer promotion.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExtendKind {
    Sign,
    Zero,
}
