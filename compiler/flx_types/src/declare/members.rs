//! Member variable layout.

use flx_ir::TypeId;

use super::VarDecl;
use crate::symbol::{SymbolKind, SymbolValue};
use crate::{ModuleId, Sema};

/// Untyped members are one long.
const DEFAULT_MEMBER_SIZE: u32 = 4;

impl Sema<'_> {
    /// Lay out member variables of `module` after any existing ones.
    ///
    /// Spin modules place longs, then words, then bytes, which keeps every
    /// member naturally aligned. Other dialects keep declaration order and
    /// align words to 2 and anything larger to 4, unless the target reads
    /// unaligned memory. Union members all start at offset 0. The block is
    /// rounded up to a whole long.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn declare_member_variables(&mut self, module: ModuleId, vars: &[VarDecl]) {
        let (table, dialect, is_union, start) = {
            let m = self.program.module(module);
            (m.table, m.dialect, m.is_union, m.var_size)
        };
        let sized: Vec<(&VarDecl, u32)> = vars
            .iter()
            .map(|v| (v, self.member_size(v.ty)))
            .collect();
        let ordered: Vec<(&VarDecl, u32)> = if dialect.is_spin() {
            let class = |size: u32| match size % 4 {
                0 => 0,
                2 => 1,
                _ => 2,
            };
            let mut ordered = sized;
            ordered.sort_by_key(|&(_, size)| class(size));
            ordered
        } else {
            sized
        };

        let aligned = !dialect.is_spin() && !self.config.p2;
        let mut offset = start;
        let mut end = start;
        let mut long_only = self.program.module(module).long_only;
        for (var, size) in ordered {
            let align = match size {
                _ if !aligned => 1,
                0 | 1 => 1,
                2 | 3 => 2,
                _ => 4,
            };
            let at = if is_union { start } else { offset.next_multiple_of(align) };
            let added = self.program.symbols.add(
                table,
                var.name,
                SymbolKind::Variable,
                SymbolValue::Type(var.ty),
                var.name,
            );
            let Some(sym) = added else {
                self.report_duplicate(var.name, var.span);
                continue;
            };
            self.program.symbols.symbol_mut(sym).offset = at;
            long_only &= size % 4 == 0;
            offset = at + size;
            end = end.max(at + size);
        }
        let m = self.program.module_mut(module);
        m.var_size = end.next_multiple_of(4);
        m.long_only = long_only;
        tracing::debug!(size = m.var_size, long_only, "laid out members");
    }

    fn member_size(&self, ty: Option<TypeId>) -> u32 {
        ty.map_or(DEFAULT_MEMBER_SIZE, |ty| self.program.types.byte_size(ty))
    }
}
