//! Named constants and enumerations.

use flx_diagnostic::ErrorCode;
use flx_ir::{Name, NodeId, Span};

use crate::symbol::{SymbolKind, SymbolValue};
use crate::{AnalysisCx, ModuleId, Sema, SymbolId};

/// One item of a constant block.
#[derive(Clone, Debug)]
pub enum ConstItem {
    /// `name = value`
    Define { name: Name, value: NodeId },
    /// `#value`: restart enumeration at `value`.
    EnumStart(NodeId),
    /// `name` or `name[skip]`: take the enumeration counter, then advance it
    /// by `skip` (1 if `NodeId::INVALID`).
    EnumName { name: Name, skip: NodeId, span: Span },
}

impl Sema<'_> {
    /// Define constant `name` in the module of `cx`.
    ///
    /// Redefining with the same value is silent; a different value is an
    /// error. Float values make a float constant.
    pub fn enter_constant(&mut self, cx: AnalysisCx, name: Name, value: NodeId) -> Option<SymbolId> {
        let table = self.program.module(cx.module).table;
        let new_value = self.const_value(cx, value);
        if let Some(existing) = self.program.symbols.find(table, name) {
            let symbol = self.program.symbols.symbol(existing);
            if let (true, SymbolValue::Const(old)) = (symbol.kind.is_constant(), symbol.value) {
                if self.const_value(cx, old) == new_value {
                    return Some(existing);
                }
                let text = self.program.name(name).to_string();
                self.error(
                    ErrorCode::E2009,
                    value,
                    format!("Redefining {text} with a different value"),
                );
                return None;
            }
        }
        let kind = if new_value.is_some_and(|v| v.is_float()) {
            SymbolKind::FloatConstant
        } else {
            SymbolKind::Constant
        };
        let added = self
            .program
            .symbols
            .add(table, name, kind, SymbolValue::Const(value), name);
        if added.is_none() {
            let text = self.program.name(name).to_string();
            self.error(ErrorCode::E2001, value, format!("Redefinition of {text}"));
        }
        added
    }

    /// Declare a constant block of `module`.
    ///
    /// Items may refer to constants defined later in the block; the block is
    /// re-scanned until a scan defines nothing new. Whatever is left cannot
    /// be resolved.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn declare_constants(&mut self, module: ModuleId, items: &[ConstItem]) {
        let cx = AnalysisCx::module(module);
        let mut done = vec![false; items.len()];
        let mut passes = 0;
        loop {
            passes += 1;
            let mut progress = false;
            let mut counter = Some(0i32);
            for (i, item) in items.iter().enumerate() {
                match *item {
                    ConstItem::Define { name, value } => {
                        if !done[i] && self.is_const_expr(cx, value) {
                            self.enter_constant(cx, name, value);
                            done[i] = true;
                            progress = true;
                        }
                    }
                    ConstItem::EnumStart(value) => {
                        counter = self.eval_const(cx, value);
                        done[i] = counter.is_some();
                    }
                    ConstItem::EnumName { name, skip, span } => {
                        let step = if skip.is_valid() {
                            self.eval_const(cx, skip)
                        } else {
                            Some(1)
                        };
                        if let (false, Some(n)) = (done[i], counter) {
                            let value = self.program.nodes.int(i64::from(n), span);
                            self.enter_constant(cx, name, value);
                            done[i] = true;
                            progress = true;
                        }
                        counter = counter.zip(step).map(|(c, s)| c.wrapping_add(s));
                    }
                }
            }
            if !progress {
                break;
            }
        }
        tracing::debug!(passes, items = items.len(), "declared constants");

        for (item, ok) in items.iter().zip(done) {
            if ok {
                continue;
            }
            let (name, at) = match *item {
                ConstItem::Define { name, value } => (name, self.program.nodes.span(value)),
                ConstItem::EnumName { name, span, .. } => (name, span),
                ConstItem::EnumStart(value) => {
                    let span = self.program.nodes.span(value);
                    self.error_at(ErrorCode::E2010, span, "Unable to resolve enumeration start");
                    continue;
                }
            };
            let text = self.program.name(name).to_string();
            self.error_at(ErrorCode::E2010, at, format!("Unable to resolve constant {text}"));
        }
    }
}
