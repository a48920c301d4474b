//! Declarations: functions, parameters, locals, temporaries.
//!
//! Declaring fills the symbol tables and computes storage offsets. Member
//! layout lives in [`members`], constants and enumerations in [`constants`].

mod constants;
mod members;

#[cfg(test)]
mod tests;

pub use constants::ConstItem;

use flx_diagnostic::ErrorCode;
use flx_ir::{Name, NodeId, NodeKind, Span, TypeId};

use crate::symbol::{SymbolKind, SymbolValue};
use crate::{AnalysisCx, FuncId, Function, FunctionFlags, ModuleId, Sema, SymbolId, TableId};

/// Locals, parameters and temporaries occupy at least one long.
const MIN_SLOT_SIZE: u32 = 4;

/// A parameter as written in source.
#[derive(Clone, Debug)]
pub struct ParamDecl {
    pub name: Name,
    pub ty: Option<TypeId>,
    /// Default value, `NodeId::INVALID` if none.
    pub default: NodeId,
    pub span: Span,
}

/// A variable as written in source: a member, a local or a parameter
/// without default.
#[derive(Clone, Debug)]
pub struct VarDecl {
    pub name: Name,
    pub ty: Option<TypeId>,
    pub span: Span,
}

impl VarDecl {
    pub fn new(name: Name, ty: Option<TypeId>, span: Span) -> Self {
        VarDecl { name, ty, span }
    }
}

#[derive(Clone, Debug)]
pub struct FunctionDecl {
    pub name: Name,
    pub params: Vec<ParamDecl>,
    pub locals: Vec<VarDecl>,
    pub ret: Option<TypeId>,
    /// Name of the result slot; defaults to `result`.
    pub result_name: Option<Name>,
    pub body: NodeId,
    pub public: bool,
    pub span: Span,
}

/// Stack slot size of a variable of type `ty`.
fn slot_size(sema: &Sema<'_>, ty: Option<TypeId>) -> u32 {
    let size = ty.map_or(MIN_SLOT_SIZE, |ty| sema.program.types.byte_size(ty));
    size.max(MIN_SLOT_SIZE).next_multiple_of(MIN_SLOT_SIZE)
}

impl Sema<'_> {
    /// Declare a function of `module`.
    ///
    /// Returns `None` (after reporting) if the name is already defined in
    /// the module.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn declare_function(&mut self, module: ModuleId, decl: FunctionDecl) -> Option<FuncId> {
        let module_table = self.program.module(module).table;
        if let Some(existing) = self.program.symbols.find(module_table, decl.name) {
            if self.program.symbols.symbol(existing).kind != SymbolKind::WeakAlias {
                let name = self.program.name(decl.name).to_string();
                self.error_at(ErrorCode::E2001, decl.span, format!("Redefinition of {name}"));
                return None;
            }
        }

        let table = self.program.symbols.new_table(Some(module_table));
        let result_name = decl
            .result_name
            .unwrap_or_else(|| self.program.intern("result"));
        let mut flags = FunctionFlags::STATIC | FunctionFlags::LEAF;
        flags.set(FunctionFlags::PUBLIC, decl.public);
        let func = self.program.push_function(Function {
            name: decl.name,
            module,
            table,
            body: decl.body,
            ret: decl.ret,
            params: Vec::with_capacity(decl.params.len()),
            defaults: Vec::with_capacity(decl.params.len()),
            locals: Vec::new(),
            result_name,
            param_size: 0,
            local_size: 0,
            flags,
            call_sites: 0,
            visit_mark: 0,
            span: decl.span,
        });
        self.program.symbols.add(
            module_table,
            decl.name,
            SymbolKind::Function,
            SymbolValue::Function(func),
            decl.name,
        );
        self.program.symbols.add(
            table,
            result_name,
            SymbolKind::Result,
            SymbolValue::Type(decl.ret),
            result_name,
        );

        let cx = AnalysisCx::function(module, func);
        self.declare_params(cx, func, &decl.params);
        let local_size = self.enter_vars(table, SymbolKind::LocalVar, &decl.locals, 0);
        let f = self.program.function_mut(func);
        f.locals.extend(decl.locals.iter().map(|v| v.name));
        f.local_size = local_size;

        self.declare_block_locals(cx, decl.body);
        tracing::debug!(
            name = self.program.name(decl.name),
            params = decl.params.len(),
            "declared function"
        );
        Some(func)
    }

    fn declare_params(&mut self, cx: AnalysisCx, func: FuncId, params: &[ParamDecl]) {
        let table = self.program.function(func).table;
        let mut offset = 0;
        for param in params {
            let mut ty = param.ty;
            let mut default = param.default;
            if default.is_valid() {
                if self.is_const_expr(cx, default) {
                    if ty.is_none() {
                        ty = self
                            .expr_type(cx, default)
                            .map(|t| self.program.types.widen(t));
                    }
                } else {
                    self.error(
                        ErrorCode::E2010,
                        default,
                        "default parameter value must be a constant",
                    );
                    default = NodeId::INVALID;
                }
            }
            let added = self.program.symbols.add(
                table,
                param.name,
                SymbolKind::Parameter,
                SymbolValue::Type(ty),
                param.name,
            );
            let Some(sym) = added else {
                self.report_duplicate(param.name, param.span);
                continue;
            };
            self.program.symbols.symbol_mut(sym).offset = offset;
            offset += slot_size(self, ty);
            let f = self.program.function_mut(func);
            f.params.push(param.name);
            f.defaults.push(default);
        }
        self.program.function_mut(func).param_size = offset;
    }

    /// Enter `vars` into `table` as `kind`, starting at byte `offset`.
    /// Returns the offset past the last variable.
    pub fn enter_vars(
        &mut self,
        table: TableId,
        kind: SymbolKind,
        vars: &[VarDecl],
        mut offset: u32,
    ) -> u32 {
        for var in vars {
            let added = self.program.symbols.add(
                table,
                var.name,
                kind,
                SymbolValue::Type(var.ty),
                var.name,
            );
            match added {
                Some(sym) => {
                    self.program.symbols.symbol_mut(sym).offset = offset;
                    offset += slot_size(self, var.ty);
                }
                None => self.report_duplicate(var.name, var.span),
            }
        }
        offset
    }

    #[cold]
    fn report_duplicate(&mut self, name: Name, span: Span) {
        let text = self.program.name(name).to_string();
        self.error_at(ErrorCode::E2014, span, format!("Duplicate definition for {text}"));
    }

    /// Add a local of the current function. Returns `None` if the name is
    /// taken or there is no current function.
    pub fn add_local_variable(
        &mut self,
        cx: AnalysisCx,
        name: Name,
        ty: Option<TypeId>,
    ) -> Option<SymbolId> {
        self.add_frame_variable(cx, name, ty, SymbolKind::LocalVar)
    }

    /// Add a compiler temporary. Outside a function it becomes a member.
    pub fn add_temp_variable(&mut self, cx: AnalysisCx, name: Name, ty: TypeId) -> Option<SymbolId> {
        if cx.func.is_some() {
            return self.add_frame_variable(cx, name, Some(ty), SymbolKind::TempVar);
        }
        let module = self.program.module(cx.module);
        let (table, offset) = (module.table, module.var_size);
        let sym = self.program.symbols.add(
            table,
            name,
            SymbolKind::Variable,
            SymbolValue::Type(Some(ty)),
            name,
        )?;
        self.program.symbols.symbol_mut(sym).offset = offset;
        let size = slot_size(self, Some(ty));
        self.program.module_mut(cx.module).var_size = offset + size;
        Some(sym)
    }

    fn add_frame_variable(
        &mut self,
        cx: AnalysisCx,
        name: Name,
        ty: Option<TypeId>,
        kind: SymbolKind,
    ) -> Option<SymbolId> {
        let func = cx.func?;
        let (table, offset) = {
            let f = self.program.function(func);
            (f.table, f.local_size)
        };
        let sym = self
            .program
            .symbols
            .add(table, name, kind, SymbolValue::Type(ty), name)?;
        self.program.symbols.symbol_mut(sym).offset = offset;
        let size = slot_size(self, ty);
        let f = self.program.function_mut(func);
        f.locals.push(name);
        f.local_size = offset + size;
        Some(sym)
    }

    /// Declare block-level `LocalDecl` statements in `body` and replace each
    /// by its initializing assignments.
    fn declare_block_locals(&mut self, cx: AnalysisCx, body: NodeId) {
        let decls: Vec<NodeId> = self
            .program
            .nodes
            .descendants(body)
            .filter(|&id| matches!(self.program.nodes.kind(id), NodeKind::LocalDecl(_)))
            .collect();
        for id in decls {
            let NodeKind::LocalDecl(vars) = self.program.nodes.replace(id, NodeKind::Nop) else {
                continue;
            };
            let span = self.program.nodes.span(id);
            let mut inits = Vec::new();
            for var in vars {
                if self.add_local_variable(cx, var.name, var.ty).is_none() {
                    self.report_duplicate(var.name, span);
                    continue;
                }
                if var.init.is_valid() {
                    let target = self.program.nodes.ident(var.name, span);
                    inits.push(NodeKind::Assign {
                        op: None,
                        target,
                        value: var.init,
                    });
                }
            }
            let replacement = match inits.len() {
                0 => NodeKind::Nop,
                1 => inits.swap_remove(0),
                _ => {
                    let stmts = inits
                        .into_iter()
                        .map(|kind| self.program.nodes.alloc(kind, span))
                        .collect();
                    NodeKind::Block(stmts)
                }
            };
            self.program.nodes.replace(id, replacement);
        }
    }
}
