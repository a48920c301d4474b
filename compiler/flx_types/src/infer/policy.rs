//! When an untyped symbol receives a type.

use flx_ir::TypeId;

use crate::symbol::{SymbolKind, SymbolValue};
use crate::{AnalysisCx, FuncId, Sema, SymbolId};

impl Sema<'_> {
    /// Give `sym` the type `ty` if it has none yet.
    ///
    /// The first type a symbol receives is final: later, possibly
    /// conflicting, assignments are not checked against it. Integers are
    /// widened to a word. With inference disabled every symbol becomes
    /// `generic`. Result slots set the function's return type. Returns
    /// whether anything changed.
    pub fn first_assignment_wins(&mut self, cx: AnalysisCx, sym: SymbolId, ty: TypeId) -> bool {
        let symbol = self.program.symbols.symbol(sym);
        let applies = matches!(
            symbol.kind,
            SymbolKind::Variable | SymbolKind::LocalVar | SymbolKind::TempVar | SymbolKind::Parameter
        );
        if symbol.kind == SymbolKind::Result {
            return cx.func.is_some_and(|f| self.set_function_type(f, ty));
        }
        if !applies || symbol.value != SymbolValue::Type(None) {
            return false;
        }
        let Some(ty) = self.settled_type(ty) else {
            return false;
        };
        tracing::trace!(name = %self.display_name(sym), ty = ?ty, "inferred");
        self.program.symbols.symbol_mut(sym).value = SymbolValue::Type(Some(ty));
        true
    }

    /// Set the return type of `func` if it has none yet, keeping the result
    /// slot in step.
    pub fn set_function_type(&mut self, func: FuncId, ty: TypeId) -> bool {
        if self.program.function(func).ret.is_some() {
            return false;
        }
        let Some(ty) = self.settled_type(ty) else {
            return false;
        };
        let (table, result_name) = {
            let f = self.program.function_mut(func);
            f.ret = Some(ty);
            (f.table, f.result_name)
        };
        if let Some(result) = self.program.symbols.find(table, result_name) {
            self.program.symbols.symbol_mut(result).value = SymbolValue::Type(Some(ty));
        }
        tracing::trace!(func = ?func, ty = ?ty, "inferred return type");
        true
    }

    /// The type actually stored for an inferred `ty`; `None` if `ty` carries
    /// no information.
    fn settled_type(&self, ty: TypeId) -> Option<TypeId> {
        if !self.config.infer_types {
            return Some(TypeId::GENERIC);
        }
        let types = &self.program.types;
        if types.is_void(ty) || types.is_generic(ty) {
            return None;
        }
        Some(types.widen(ty))
    }
}
