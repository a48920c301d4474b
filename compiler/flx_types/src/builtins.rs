//! Builtin routines and per-dialect alias tables.
//!
//! Builtins live in two layers of tables: one global table shared by every
//! dialect, and one table per dialect for its runtime helpers. Alias tables
//! are only read when a module table is created; each entry becomes a weak
//! alias in the new table.

use flx_ir::TypeId;

use crate::Dialect;

/// A routine implemented by the compiler or its runtime library.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Builtin {
    pub name: flx_ir::Name,
    /// Expected argument count; `None` accepts any number.
    pub params: Option<u8>,
    pub ret: TypeId,
}

/// (name, parameter count, return type).
pub(crate) type BuiltinEntry = (&'static str, Option<u8>, TypeId);

pub(crate) const GLOBAL_BUILTINS: &[BuiltinEntry] = &[
    ("__builtin_strlen", Some(1), TypeId::LONG),
    ("__builtin_atoi", Some(1), TypeId::LONG),
    ("__builtin_atof", Some(1), TypeId::FLOAT),
    ("__builtin_cosf", Some(1), TypeId::FLOAT),
    ("__builtin_sinf", Some(1), TypeId::FLOAT),
    ("__builtin_tanf", Some(1), TypeId::FLOAT),
    ("__builtin_expf", Some(1), TypeId::FLOAT),
    ("__builtin_logf", Some(1), TypeId::FLOAT),
    ("__builtin_powf", Some(2), TypeId::FLOAT),
    ("__builtin_clkfreq", Some(0), TypeId::UNSIGNED_LONG),
    ("__builtin_clkmode", Some(0), TypeId::UNSIGNED_LONG),
    ("__builtin_printf", None, TypeId::LONG),
    ("__builtin_propeller_drv", Some(2), TypeId::VOID),
    ("__builtin_propeller_drvl", Some(1), TypeId::VOID),
    ("__builtin_propeller_drvh", Some(1), TypeId::VOID),
    ("__builtin_propeller_drvnot", Some(1), TypeId::VOID),
    ("__builtin_propeller_dir", Some(2), TypeId::VOID),
    ("__builtin_propeller_dirl", Some(1), TypeId::VOID),
    ("__builtin_propeller_dirh", Some(1), TypeId::VOID),
    ("__builtin_propeller_dirnot", Some(1), TypeId::VOID),
    ("__builtin_propeller_fltl", Some(1), TypeId::VOID),
    ("__builtin_propeller_pinr", Some(1), TypeId::LONG),
    ("__builtin_propeller_waitx", Some(1), TypeId::VOID),
    ("__builtin_propeller_wrpin", Some(2), TypeId::VOID),
    ("__builtin_propeller_wxpin", Some(2), TypeId::VOID),
    ("__builtin_propeller_wypin", Some(2), TypeId::VOID),
    ("__builtin_propeller_rdpin", Some(1), TypeId::UNSIGNED_LONG),
];

/// Clock variables every dialect can name.
pub(crate) const GLOBAL_VARIABLES: &[(&str, TypeId)] = &[
    ("__clkfreq_var", TypeId::UNSIGNED_LONG),
    ("__clkmode_var", TypeId::UNSIGNED_LONG),
];

const RUNTIME_COMMON: &[BuiltinEntry] = &[
    ("_getcnt", Some(0), TypeId::UNSIGNED_LONG),
    ("_clkset", Some(2), TypeId::VOID),
    ("_waitms", Some(1), TypeId::VOID),
    ("_waitus", Some(1), TypeId::VOID),
];

const RUNTIME_BASIC: &[BuiltinEntry] = &[
    ("_basic_rnd", Some(1), TypeId::FLOAT),
    ("_geterror", Some(0), TypeId::LONG),
    ("_instr", Some(3), TypeId::LONG),
    ("_instrrev", Some(3), TypeId::LONG),
];

const RUNTIME_SPIN2: &[BuiltinEntry] = &[
    ("_locktry", Some(1), TypeId::LONG),
    ("_pinwrite", Some(2), TypeId::VOID),
];

/// Runtime helpers visible to modules of `dialect`.
pub(crate) fn dialect_builtins(dialect: Dialect) -> impl Iterator<Item = &'static BuiltinEntry> {
    let extra: &[BuiltinEntry] = match dialect {
        Dialect::Basic => RUNTIME_BASIC,
        Dialect::Spin2 => RUNTIME_SPIN2,
        Dialect::Spin1 | Dialect::C => &[],
    };
    RUNTIME_COMMON.iter().chain(extra)
}

const SPIN_ALIASES: &[(&str, &str)] = &[
    ("clkfreq", "__clkfreq_var"),
    ("clkmode", "__clkmode_var"),
    ("clkset", "_clkset"),
    ("strsize", "__builtin_strlen"),
];

const SPIN2_ALIASES: &[(&str, &str)] = &[
    ("cnt", "_getcnt"),
    ("locktry", "_locktry"),
    ("pinw", "_pinwrite"),
    ("pinl", "__builtin_propeller_drvl"),
    ("pinh", "__builtin_propeller_drvh"),
    ("pint", "__builtin_propeller_drvnot"),
    ("pinr", "__builtin_propeller_pinr"),
    ("pinf", "__builtin_propeller_fltl"),
    ("waitx", "__builtin_propeller_waitx"),
    ("rdpin", "__builtin_propeller_rdpin"),
];

const BASIC_ALIASES: &[(&str, &str)] = &[
    ("clkfreq", "__clkfreq_var"),
    ("clkmode", "__clkmode_var"),
    ("clkset", "_clkset"),
    ("err", "_geterror"),
    ("getcnt", "_getcnt"),
    ("len", "__builtin_strlen"),
    ("pausems", "_waitms"),
    ("pauseus", "_waitus"),
    ("pinlo", "__builtin_propeller_drvl"),
    ("pinhi", "__builtin_propeller_drvh"),
    ("pinset", "__builtin_propeller_drv"),
    ("pintoggle", "__builtin_propeller_drvnot"),
    ("rnd", "_basic_rnd"),
    ("val", "__builtin_atof"),
    ("val%", "__builtin_atoi"),
    ("instr", "_instr"),
    ("instrrev", "_instrrev"),
    ("cos", "__builtin_cosf"),
    ("exp", "__builtin_expf"),
    ("log", "__builtin_logf"),
    ("pow", "__builtin_powf"),
    ("sin", "__builtin_sinf"),
    ("tan", "__builtin_tanf"),
];

const C_ALIASES: &[(&str, &str)] = &[
    ("_clkfreq", "__clkfreq_var"),
    ("_clkmode", "__clkmode_var"),
    ("_cnt", "_getcnt"),
    ("_clockfreq", "__builtin_clkfreq"),
    ("_clockmode", "__builtin_clkmode"),
    ("_dirl", "__builtin_propeller_dirl"),
    ("_dirh", "__builtin_propeller_dirh"),
    ("_dirnot", "__builtin_propeller_dirnot"),
    ("_dirw", "__builtin_propeller_dir"),
    ("_pinl", "__builtin_propeller_drvl"),
    ("_pinh", "__builtin_propeller_drvh"),
    ("_pinnot", "__builtin_propeller_drvnot"),
    ("_pinw", "__builtin_propeller_drv"),
    ("_waitx", "__builtin_propeller_waitx"),
    ("_pinr", "__builtin_propeller_pinr"),
    ("_wrpin", "__builtin_propeller_wrpin"),
    ("_wxpin", "__builtin_propeller_wxpin"),
    ("_wypin", "__builtin_propeller_wypin"),
    ("_rdpin", "__builtin_propeller_rdpin"),
];

/// (alias, target) pairs seeded into a new module table.
///
/// Second-generation targets add the Spin2 names to Basic and Spin modules;
/// Spin2 modules always get them.
pub(crate) fn dialect_aliases(
    dialect: Dialect,
    p2: bool,
) -> impl Iterator<Item = &'static (&'static str, &'static str)> {
    let base: &[(&str, &str)] = match dialect {
        Dialect::Basic => BASIC_ALIASES,
        Dialect::C => C_ALIASES,
        Dialect::Spin1 | Dialect::Spin2 => SPIN_ALIASES,
    };
    let spin2 = dialect == Dialect::Spin2 || (p2 && dialect != Dialect::C);
    let extra: &[(&str, &str)] = if spin2 { SPIN2_ALIASES } else { &[] };
    base.iter().chain(extra)
}
