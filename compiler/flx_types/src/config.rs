//! Analysis configuration.

/// Source language of a module.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Dialect {
    Spin1,
    Spin2,
    Basic,
    C,
}

impl Dialect {
    #[inline]
    pub const fn is_spin(self) -> bool {
        matches!(self, Dialect::Spin1 | Dialect::Spin2)
    }

    #[inline]
    pub const fn is_basic(self) -> bool {
        matches!(self, Dialect::Basic)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Dialect::Spin1 => "spin",
            Dialect::Spin2 => "spin2",
            Dialect::Basic => "basic",
            Dialect::C => "c",
        }
    }
}

/// How real numbers are represented at run time.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum NumericMode {
    /// IEEE single precision through runtime routines.
    TrueFloat,
    /// Integers pre-scaled by `2^shift`.
    FixedPoint { shift: u8 },
}

impl NumericMode {
    /// The usual 16.16 fixed-point layout.
    pub const FIXED_16_16: NumericMode = NumericMode::FixedPoint { shift: 16 };

    #[inline]
    pub const fn fixed_shift(self) -> Option<u8> {
        match self {
            NumericMode::FixedPoint { shift } => Some(shift),
            NumericMode::TrueFloat => None,
        }
    }
}

/// What the lowered tree will be emitted as. C-like targets prefer
/// zero-based, test-first loops.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum OutputTarget {
    #[default]
    Native,
    CLike,
}

/// Runtime routines the coercion engine emits calls to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeNames {
    pub float_add: &'static str,
    pub float_sub: &'static str,
    pub float_mul: &'static str,
    pub float_div: &'static str,
    /// `float_cmp(a, b)` returns negative, zero or positive.
    pub float_cmp: &'static str,
    pub int_to_float: &'static str,
    pub float_to_int: &'static str,
    pub fixed_mul: &'static str,
    /// `fixed_div(a, b, extra_shift)`.
    pub fixed_div: &'static str,
}

impl Default for RuntimeNames {
    fn default() -> Self {
        RuntimeNames {
            float_add: "_float_add",
            float_sub: "_float_sub",
            float_mul: "_float_mul",
            float_div: "_float_div",
            float_cmp: "_float_cmp",
            int_to_float: "_float_fromint",
            float_to_int: "_float_trunc",
            fixed_mul: "_fixed_mul",
            fixed_div: "_fixed_div",
        }
    }
}

/// Options that change analysis results.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub numeric: NumericMode,
    pub target: OutputTarget,
    /// Assign inferred types to untyped symbols. When off, inference marks
    /// them `generic` instead.
    pub infer_types: bool,
    /// Replace constant loop bounds by their literal value.
    pub expand_constants: bool,
    /// Safety cap on inference passes per module.
    pub max_infer_passes: u32,
    /// Second-generation target: unaligned member layout and the extra
    /// builtin aliases.
    pub p2: bool,
    /// Limit on generated temporaries (names carry a four-digit counter).
    pub max_temporaries: u32,
    pub runtime: RuntimeNames,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            numeric: NumericMode::TrueFloat,
            target: OutputTarget::Native,
            infer_types: true,
            expand_constants: false,
            max_infer_passes: 16,
            p2: false,
            max_temporaries: 9999,
            runtime: RuntimeNames::default(),
        }
    }
}

impl AnalysisConfig {
    #[must_use]
    pub fn with_numeric(mut self, numeric: NumericMode) -> Self {
        self.numeric = numeric;
        self
    }

    #[must_use]
    pub fn with_target(mut self, target: OutputTarget) -> Self {
        self.target = target;
        self
    }

    #[inline]
    pub fn c_like(&self) -> bool {
        self.target == OutputTarget::CLike
    }
}
