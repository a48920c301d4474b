//! Semantic analysis for flx modules.
//!
//! Everything a module needs between parsing and code generation:
//!
//! - [`TypePool`]: hash-consed type descriptors and the queries over them
//! - [`SymbolTables`]: scope-chained tables with alias resolution
//! - declarations, constants and storage layout ([`FunctionDecl`], [`ConstItem`])
//! - the coercion walker [`Sema::check_types`] that makes operand types agree
//! - iterative inference of untyped variables ([`Sema::infer_to_fixpoint`])
//! - function analysis: call shapes, return types, leaf/recursive/static
//!
//! All passes are methods on [`Sema`], which borrows the [`Program`], the
//! diagnostics sink and the [`AnalysisConfig`]. The module and function being
//! analyzed travel as an [`AnalysisCx`] argument.

mod analysis;
mod builtins;
mod coerce;
mod config;
mod consts;
mod declare;
mod expr_type;
mod ids;
mod infer;
mod pool;
mod program;
mod sema;
mod symbol;

#[cfg(test)]
mod testing;

pub use builtins::Builtin;
pub use config::{AnalysisConfig, Dialect, NumericMode, OutputTarget, RuntimeNames};
pub use consts::ConstValue;
pub use declare::{ConstItem, FunctionDecl, ParamDecl, VarDecl};
pub use ids::{BuiltinId, FuncId, ModuleId, SymbolId, TableId};
pub use pool::{Tag, TypeData, TypePool, POINTER_SIZE, WORD_SIZE};
pub use program::{AnalysisCx, Function, FunctionFlags, Module, Program, CALL_SITES_MANY};
pub use sema::Sema;
pub use symbol::{AliasTarget, Symbol, SymbolKind, SymbolTables, SymbolValue, MAX_ALIAS_DEPTH};

flx_ir::static_assert_size!(SymbolId, 4);
flx_ir::static_assert_size!(AnalysisCx, 12);
