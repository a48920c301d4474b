//! Diagnostic codes.

use std::fmt;

/// Codes for every diagnostic the analysis emits.
///
/// - E2xxx: semantic errors
/// - W2xxx: warnings
/// - E9xxx: internal errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorCode {
    /// Redefinition of a symbol in the same scope
    E2001,
    /// Unknown symbol
    E2002,
    /// Incompatible types in assignment
    E2003,
    /// Float value assigned to an integer destination
    E2004,
    /// Wrong number of arguments in a call
    E2005,
    /// Multi-dimensional subscript
    E2006,
    /// Operand is not numeric
    E2007,
    /// Subscript applied to a non-array value
    E2008,
    /// Constant redefined with a different value
    E2009,
    /// Expression must be a compile-time constant
    E2010,
    /// Counting loop without a loop variable
    E2011,
    /// Float operation the current numeric mode cannot express
    E2012,
    /// Call target is not a function
    E2013,
    /// Duplicate variable or parameter in one declaration list
    E2014,

    /// Signed comparison of possibly-unsigned operands
    W2001,
    /// Const qualifier discarded through a pointer
    W2002,
    /// Assignment to a const object
    W2003,

    /// Internal error
    E9001,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E2008 => "E2008",
            ErrorCode::E2009 => "E2009",
            ErrorCode::E2010 => "E2010",
            ErrorCode::E2011 => "E2011",
            ErrorCode::E2012 => "E2012",
            ErrorCode::E2013 => "E2013",
            ErrorCode::E2014 => "E2014",
            ErrorCode::W2001 => "W2001",
            ErrorCode::W2002 => "W2002",
            ErrorCode::W2003 => "W2003",
            ErrorCode::E9001 => "E9001",
        }
    }

    #[inline]
    pub const fn is_warning(self) -> bool {
        matches!(self, ErrorCode::W2001 | ErrorCode::W2002 | ErrorCode::W2003)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
