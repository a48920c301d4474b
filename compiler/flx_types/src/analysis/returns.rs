//! Return types from `return` statements and result assignments.

use flx_ir::{NodeId, NodeKind, TypeId};

use crate::symbol::SymbolValue;
use crate::{AnalysisCx, FunctionFlags, Sema};

impl Sema<'_> {
    /// Scan the function of `cx` for returned values. Each value's type is
    /// offered to [`Sema::set_function_type`]; referencing the result slot
    /// sets [`FunctionFlags::RESULT_USED`]. Returns whether the function
    /// produces a value anywhere.
    pub fn check_returns(&mut self, cx: AnalysisCx) -> bool {
        let Some(func) = cx.func else {
            return false;
        };
        let (body, result_name) = {
            let f = self.program.function(func);
            (f.body, f.result_name)
        };
        let nodes = &self.program.nodes;
        let is_result = |id: NodeId| match nodes.get(id) {
            Some(NodeKind::Result) => true,
            Some(NodeKind::Ident(name)) => *name == result_name,
            _ => false,
        };
        let mut values = Vec::new();
        let mut result_used = false;
        for id in nodes.descendants(body) {
            match nodes.kind(id) {
                NodeKind::Return(value) if value.is_valid() => values.push(*value),
                NodeKind::Assign { target, value, .. } if is_result(*target) => {
                    values.push(*value);
                }
                _ => {}
            }
            result_used |= is_result(id);
        }

        if result_used {
            self.program.function_mut(func).flags |= FunctionFlags::RESULT_USED;
        }
        for &value in &values {
            if let Some(ty) = self.expr_type(cx, value) {
                self.set_function_type(func, ty);
            }
        }
        !values.is_empty()
    }

    /// Settle the return shape of the function of `cx`. A function that
    /// never produces a value and declares no type returns `void`, unless it
    /// reads its result slot, which makes the return `generic`. Any non-void
    /// function falls off its end into an implicit `return result`.
    pub(crate) fn finish_returns(&mut self, cx: AnalysisCx) {
        let Some(func) = cx.func else {
            return;
        };
        let found = self.check_returns(cx);
        let f = self.program.function(func);
        if !found && f.ret.is_none() {
            let ty = if f.result_used() {
                TypeId::GENERIC
            } else {
                TypeId::VOID
            };
            let (table, result_name) = (f.table, f.result_name);
            self.program.function_mut(func).ret = Some(ty);
            if let Some(result) = self.program.symbols.find(table, result_name) {
                self.program.symbols.symbol_mut(result).value = SymbolValue::Type(Some(ty));
            }
        }
        let f = self.program.function(func);
        if f.ret == Some(TypeId::VOID) {
            return;
        }
        let body = f.body;
        let span = self.program.nodes.span(body);
        let last = match self.program.nodes.get(body) {
            Some(NodeKind::Block(stmts)) => stmts.last().copied(),
            Some(_) => Some(body),
            None => None,
        };
        if last.is_some_and(|s| matches!(self.program.nodes.kind(s), NodeKind::Return(_))) {
            return;
        }
        let result = self.program.nodes.alloc(NodeKind::Result, span);
        let ret = self.program.nodes.alloc(NodeKind::Return(result), span);
        match self.program.nodes.get(body) {
            Some(NodeKind::Block(_)) => {
                if let NodeKind::Block(mut stmts) = self.program.nodes.replace(body, NodeKind::Nop) {
                    stmts.push(ret);
                    self.program.nodes.replace(body, NodeKind::Block(stmts));
                }
            }
            Some(_) => {
                let block = self.program.nodes.block(vec![body, ret], span);
                self.program.function_mut(func).body = block;
            }
            None => self.program.function_mut(func).body = ret,
        }
        tracing::trace!(func = ?func, "appended implicit return");
    }
}
