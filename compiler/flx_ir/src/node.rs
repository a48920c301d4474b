//! Node identifiers and the closed set of node kinds.

use std::fmt;

use smallvec::SmallVec;

use crate::{BinaryOp, ExtendKind, Name, TypeId, UnaryOp};

/// Index of a node in the [`NodeArena`](crate::NodeArena).
///
/// `NodeId::INVALID` marks an absent optional slot (a missing `else`, an
/// omitted loop bound, a bare `return`).
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    pub const INVALID: NodeId = NodeId(u32::MAX);

    #[inline]
    pub const fn new(index: u32) -> Self {
        NodeId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "NodeId({})", self.0)
        } else {
            write!(f, "NodeId::INVALID")
        }
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Short child lists (call arguments, sequences).
pub type NodeList = SmallVec<[NodeId; 4]>;

/// Shape of a lowered counting loop.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ForKind {
    /// Test before every iteration, including the first.
    TestFirst,
    /// Run the body once before the first test.
    AtLeastOnce,
}

/// One variable of a block-level declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalVar {
    pub name: Name,
    /// `None` when the type is left to inference.
    pub ty: Option<TypeId>,
    /// Initial value, or `NodeId::INVALID`.
    pub init: NodeId,
}

/// Every expression and statement the analysis understands.
///
/// Absent optional children are `NodeId::INVALID`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    // Leaves
    Int(i64),
    /// 32-bit float literal, stored as raw bits.
    Float(u32),
    Str(Name),
    Ident(Name),
    /// The implicit result slot of the enclosing function.
    Result,
    Nop,
    /// Placeholder left behind by a reported error.
    Error,

    // Expressions
    Unary {
        op: UnaryOp,
        operand: NodeId,
    },
    Binary {
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
    },
    /// Widen the low `bits` of `operand` to a full word.
    Extend {
        kind: ExtendKind,
        operand: NodeId,
        bits: u8,
    },
    /// `target = value`, or `target op= value` when `op` is set.
    Assign {
        op: Option<BinaryOp>,
        target: NodeId,
        value: NodeId,
    },
    Call {
        callee: NodeId,
        args: NodeList,
    },
    Index {
        base: NodeId,
        index: NodeId,
    },
    /// Explicit memory read of an `elem` at `addr`.
    Deref {
        elem: TypeId,
        addr: NodeId,
    },
    AddrOf(NodeId),
    Cond {
        cond: NodeId,
        then_val: NodeId,
        else_val: NodeId,
    },
    /// `low <= value <= high` for either ordering of the bounds.
    IsBetween {
        value: NodeId,
        low: NodeId,
        high: NodeId,
    },
    /// Evaluate in order; the value is the last element's.
    Seq(NodeList),

    // Statements
    Block(Vec<NodeId>),
    If {
        cond: NodeId,
        then_branch: NodeId,
        else_branch: NodeId,
    },
    While {
        cond: NodeId,
        body: NodeId,
    },
    DoWhile {
        body: NodeId,
        cond: NodeId,
    },
    /// Source-level counting loop before canonicalization.
    CountRepeat {
        var: NodeId,
        from: NodeId,
        to: NodeId,
        step: NodeId,
        body: NodeId,
    },
    /// Canonical loop produced by lowering.
    For {
        kind: ForKind,
        init: NodeId,
        cond: NodeId,
        step: NodeId,
        body: NodeId,
    },
    Return(NodeId),
    LocalDecl(Vec<LocalVar>),
}

impl NodeKind {
    /// Short name used in internal error messages.
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Int(_) => "integer literal",
            Self::Float(_) => "float literal",
            Self::Str(_) => "string literal",
            Self::Ident(_) => "identifier",
            Self::Result => "result",
            Self::Nop => "nop",
            Self::Error => "error",
            Self::Unary { .. } => "unary operator",
            Self::Binary { .. } => "binary operator",
            Self::Extend { .. } => "extension",
            Self::Assign { .. } => "assignment",
            Self::Call { .. } => "call",
            Self::Index { .. } => "subscript",
            Self::Deref { .. } => "memory reference",
            Self::AddrOf(_) => "address-of",
            Self::Cond { .. } => "conditional",
            Self::IsBetween { .. } => "range test",
            Self::Seq(_) => "sequence",
            Self::Block(_) => "block",
            Self::If { .. } => "if",
            Self::While { .. } => "while",
            Self::DoWhile { .. } => "do-while",
            Self::CountRepeat { .. } => "counting loop",
            Self::For { .. } => "for",
            Self::Return(_) => "return",
            Self::LocalDecl(_) => "local declaration",
        }
    }
}
