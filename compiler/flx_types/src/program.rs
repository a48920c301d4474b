//! Whole-program state: the arenas every pass reads and mutates.

use bitflags::bitflags;
use flx_ir::{Name, NodeArena, NodeId, SourceFiles, Span, StringInterner, TypeId};
use rustc_hash::FxHashMap;

use crate::builtins::{self, Builtin, GLOBAL_BUILTINS, GLOBAL_VARIABLES};
use crate::symbol::{AliasTarget, SymbolKind, SymbolTables, SymbolValue};
use crate::{AnalysisConfig, BuiltinId, Dialect, FuncId, ModuleId, SymbolId, TableId, TypePool};

bitflags! {
    /// Facts about a function refined by analysis.
    ///
    /// `STATIC` and `LEAF` start set and are only ever cleared.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct FunctionFlags: u8 {
        /// Touches no member variables or objects.
        const STATIC = 1 << 0;
        /// Calls no other function.
        const LEAF = 1 << 1;
        /// Reaches itself through calls.
        const RECURSIVE = 1 << 2;
        /// The result slot is referenced in the body.
        const RESULT_USED = 1 << 3;
        /// Visible outside its module.
        const PUBLIC = 1 << 4;
    }
}

/// One compiled source module.
#[derive(Clone, Debug)]
pub struct Module {
    pub name: Name,
    pub dialect: Dialect,
    /// Member table; parent is the dialect table.
    pub table: TableId,
    pub functions: Vec<FuncId>,
    /// Size of the member variable block, rounded up to a long.
    pub var_size: u32,
    /// Every member is long-sized.
    pub long_only: bool,
    pub is_union: bool,
}

/// A function and what analysis has learned about it.
#[derive(Clone, Debug)]
pub struct Function {
    pub name: Name,
    pub module: ModuleId,
    /// Parameters, locals and the result slot; parent is the module table.
    pub table: TableId,
    pub body: NodeId,
    /// Declared or inferred return type.
    pub ret: Option<TypeId>,
    pub params: Vec<Name>,
    /// Default value per parameter, `NodeId::INVALID` where there is none.
    pub defaults: Vec<NodeId>,
    pub locals: Vec<Name>,
    pub result_name: Name,
    pub param_size: u32,
    pub local_size: u32,
    pub flags: FunctionFlags,
    /// Call sites seen, saturating at [`CALL_SITES_MANY`].
    pub call_sites: u32,
    pub(crate) visit_mark: u32,
    pub span: Span,
}

impl Function {
    #[inline]
    pub fn is_static(&self) -> bool {
        self.flags.contains(FunctionFlags::STATIC)
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.flags.contains(FunctionFlags::LEAF)
    }

    #[inline]
    pub fn is_recursive(&self) -> bool {
        self.flags.contains(FunctionFlags::RECURSIVE)
    }

    #[inline]
    pub fn result_used(&self) -> bool {
        self.flags.contains(FunctionFlags::RESULT_USED)
    }
}

/// Call-site count past which a function is never considered for inlining.
pub const CALL_SITES_MANY: u32 = 10;

/// Which module and function an operation runs on behalf of.
///
/// Analyzing another function means calling with a derived context; the
/// caller's context is untouched when the call returns.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct AnalysisCx {
    pub module: ModuleId,
    pub func: Option<FuncId>,
}

impl AnalysisCx {
    #[inline]
    pub const fn module(module: ModuleId) -> Self {
        AnalysisCx { module, func: None }
    }

    #[inline]
    pub const fn function(module: ModuleId, func: FuncId) -> Self {
        AnalysisCx {
            module,
            func: Some(func),
        }
    }
}

/// Everything one compilation run owns.
pub struct Program {
    pub nodes: NodeArena,
    pub names: StringInterner,
    pub files: SourceFiles,
    pub types: TypePool,
    pub symbols: SymbolTables,
    builtins: Vec<Builtin>,
    modules: Vec<Module>,
    functions: Vec<Function>,
    global_table: TableId,
    dialect_tables: FxHashMap<Dialect, TableId>,
    pub(crate) temp_counter: u32,
    pub(crate) visit_generation: u32,
}

impl Program {
    pub fn new() -> Self {
        let mut symbols = SymbolTables::new();
        let global_table = symbols.new_table(None);
        let mut program = Program {
            nodes: NodeArena::with_capacity(1024),
            names: StringInterner::new(),
            files: SourceFiles::new(),
            types: TypePool::new(),
            symbols,
            builtins: Vec::new(),
            modules: Vec::new(),
            functions: Vec::new(),
            global_table,
            dialect_tables: FxHashMap::default(),
            temp_counter: 0,
            visit_generation: 0,
        };
        for &(name, params, ret) in GLOBAL_BUILTINS {
            program.add_builtin(global_table, name, params, ret);
        }
        for &(name, ty) in GLOBAL_VARIABLES {
            let name = program.names.intern(name);
            program.symbols.add(
                global_table,
                name,
                SymbolKind::Variable,
                SymbolValue::Type(Some(ty)),
                name,
            );
        }
        program
    }

    /// Register a builtin routine in `table`. Returns `None` if the name is
    /// already taken there.
    pub fn add_builtin(
        &mut self,
        table: TableId,
        name: &str,
        params: Option<u8>,
        ret: TypeId,
    ) -> Option<SymbolId> {
        let name = self.names.intern(name);
        let id = BuiltinId::next(self.builtins.len());
        let sym = self.symbols.add(
            table,
            name,
            SymbolKind::Builtin,
            SymbolValue::Builtin(id),
            name,
        )?;
        self.builtins.push(Builtin { name, params, ret });
        Some(sym)
    }

    /// Table of builtins shared by every module of `dialect`.
    pub fn dialect_table(&mut self, dialect: Dialect) -> TableId {
        if let Some(&table) = self.dialect_tables.get(&dialect) {
            return table;
        }
        let table = self.symbols.new_table(Some(self.global_table));
        for &(name, params, ret) in builtins::dialect_builtins(dialect) {
            self.add_builtin(table, name, params, ret);
        }
        self.dialect_tables.insert(dialect, table);
        table
    }

    /// Create a module with an empty member table seeded with the dialect's
    /// weak aliases.
    #[tracing::instrument(level = "debug", skip(self, config))]
    pub fn new_module(&mut self, name: &str, dialect: Dialect, config: &AnalysisConfig) -> ModuleId {
        let parent = self.dialect_table(dialect);
        let table = self.symbols.new_table(Some(parent));
        for &(alias, target) in builtins::dialect_aliases(dialect, config.p2) {
            let alias = self.names.intern(alias);
            let target = self.names.intern(target);
            self.symbols.add(
                table,
                alias,
                SymbolKind::WeakAlias,
                SymbolValue::Alias(AliasTarget::Name(target)),
                alias,
            );
        }
        let id = ModuleId::next(self.modules.len());
        let name = self.names.intern(name);
        self.modules.push(Module {
            name,
            dialect,
            table,
            functions: Vec::new(),
            var_size: 0,
            long_only: true,
            is_union: false,
        });
        id
    }

    #[inline]
    pub fn global_table(&self) -> TableId {
        self.global_table
    }

    #[inline]
    pub fn module(&self, id: ModuleId) -> &Module {
        &self.modules[id.index()]
    }

    #[inline]
    pub fn module_mut(&mut self, id: ModuleId) -> &mut Module {
        &mut self.modules[id.index()]
    }

    pub fn module_ids(&self) -> impl Iterator<Item = ModuleId> {
        (0..self.modules.len()).map(ModuleId::next)
    }

    #[inline]
    pub fn function(&self, id: FuncId) -> &Function {
        &self.functions[id.index()]
    }

    #[inline]
    pub fn function_mut(&mut self, id: FuncId) -> &mut Function {
        &mut self.functions[id.index()]
    }

    /// Function handle if `id` is in range.
    pub fn get_function(&self, id: FuncId) -> Option<&Function> {
        self.functions.get(id.index())
    }

    pub(crate) fn push_function(&mut self, function: Function) -> FuncId {
        let id = FuncId::next(self.functions.len());
        let module = function.module;
        self.functions.push(function);
        self.modules[module.index()].functions.push(id);
        id
    }

    /// Functions of `module` in declaration order.
    pub fn functions_of(&self, module: ModuleId) -> Vec<FuncId> {
        self.module(module).functions.clone()
    }

    #[inline]
    pub fn builtin(&self, id: BuiltinId) -> Option<&Builtin> {
        self.builtins.get(id.index())
    }

    /// Innermost table of `cx`.
    pub fn scope(&self, cx: AnalysisCx) -> TableId {
        match cx.func {
            Some(f) => self.function(f).table,
            None => self.module(cx.module).table,
        }
    }

    #[inline]
    pub fn name(&self, name: Name) -> &str {
        self.names.lookup(name)
    }

    #[inline]
    pub fn intern(&mut self, s: &str) -> Name {
        self.names.intern(s)
    }

    /// Start a fresh round of function visit marks.
    pub(crate) fn next_visit_generation(&mut self) -> u32 {
        self.visit_generation = self.visit_generation.wrapping_add(1).max(1);
        self.visit_generation
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Program")
            .field("nodes", &self.nodes.len())
            .field("modules", &self.modules.len())
            .field("functions", &self.functions.len())
            .field("symbols", &self.symbols)
            .field("types", &self.types)
            .finish_non_exhaustive()
    }
}
