//! Scope-chained symbol tables.
//!
//! All tables and symbols of a run live in one [`SymbolTables`] arena. A
//! table maps names to symbols and links to at most one parent; lookups that
//! miss walk the chain function → module → dialect builtins → global
//! builtins.
//!
//! Within a table only one non-weak symbol may carry a name. A weak alias is
//! a stand-in that the first real definition replaces in place.

use flx_ir::{Name, NodeId, TypeId};
use rustc_hash::FxHashMap;

use crate::{BuiltinId, FuncId, SymbolId, TableId};

/// Aliases are followed at most this many times per lookup.
pub const MAX_ALIAS_DEPTH: u32 = 32;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SymbolKind {
    Constant,
    FloatConstant,
    /// Module-level (member) variable.
    Variable,
    LocalVar,
    /// Compiler-generated local.
    TempVar,
    Parameter,
    /// The implicit result slot of a function.
    Result,
    Function,
    Builtin,
    /// Replaced by the first real definition of the name.
    WeakAlias,
    Alias,
    Typedef,
    Label,
    Object,
}

impl SymbolKind {
    #[inline]
    pub const fn is_alias(self) -> bool {
        matches!(self, SymbolKind::WeakAlias | SymbolKind::Alias)
    }

    /// Kinds whose type can be inferred.
    #[inline]
    pub const fn is_storage(self) -> bool {
        matches!(
            self,
            SymbolKind::Variable
                | SymbolKind::LocalVar
                | SymbolKind::TempVar
                | SymbolKind::Parameter
                | SymbolKind::Result
        )
    }

    #[inline]
    pub const fn is_constant(self) -> bool {
        matches!(self, SymbolKind::Constant | SymbolKind::FloatConstant)
    }
}

/// What an alias stands for.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum AliasTarget {
    /// Another name, looked up again from the table the lookup started in.
    Name(Name),
    /// An arbitrary expression; lookups stop at the alias itself.
    Node(NodeId),
}

/// Payload of a symbol.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SymbolValue {
    /// Value expression of a constant.
    Const(NodeId),
    /// Type of storage, typedefs, labels and objects; `None` until inferred.
    Type(Option<TypeId>),
    Function(FuncId),
    Alias(AliasTarget),
    Builtin(BuiltinId),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Symbol {
    pub name: Name,
    /// Spelling used in diagnostics.
    pub display: Name,
    pub kind: SymbolKind,
    pub value: SymbolValue,
    /// Byte offset of storage within its frame or object.
    pub offset: u32,
    pub table: TableId,
}

impl Symbol {
    /// Declared or inferred type, for symbols that carry one.
    #[inline]
    pub fn ty(&self) -> Option<TypeId> {
        match self.value {
            SymbolValue::Type(ty) => ty,
            _ => None,
        }
    }
}

#[derive(Default)]
struct Table {
    parent: Option<TableId>,
    map: FxHashMap<Name, SymbolId>,
    order: Vec<SymbolId>,
}

enum Resolution {
    Found(SymbolId),
    Missing,
    TooDeep,
}

/// Arena of all symbol tables and symbols.
#[derive(Default)]
pub struct SymbolTables {
    tables: Vec<Table>,
    symbols: Vec<Symbol>,
}

impl SymbolTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table linked to `parent`.
    pub fn new_table(&mut self, parent: Option<TableId>) -> TableId {
        let id = TableId::next(self.tables.len());
        self.tables.push(Table {
            parent,
            ..Table::default()
        });
        id
    }

    #[inline]
    pub fn parent(&self, table: TableId) -> Option<TableId> {
        self.tables.get(table.index()).and_then(|t| t.parent)
    }

    #[inline]
    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    #[inline]
    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.index()]
    }

    /// Insert a symbol into `table`.
    ///
    /// Returns `None` and leaves the table untouched if a non-weak symbol of
    /// that name already exists here. An existing weak alias is overwritten
    /// in place and keeps its handle.
    pub fn add(
        &mut self,
        table: TableId,
        name: Name,
        kind: SymbolKind,
        value: SymbolValue,
        display: Name,
    ) -> Option<SymbolId> {
        if table.index() >= self.tables.len() {
            return None;
        }
        let symbol = Symbol {
            name,
            display,
            kind,
            value,
            offset: 0,
            table,
        };
        if let Some(existing) = self.find(table, name) {
            if self.symbols[existing.index()].kind != SymbolKind::WeakAlias {
                return None;
            }
            tracing::trace!(?name, ?kind, "replacing weak alias");
            self.symbols[existing.index()] = symbol;
            return Some(existing);
        }
        let id = SymbolId::next(self.symbols.len());
        self.symbols.push(symbol);
        let t = &mut self.tables[table.index()];
        t.map.insert(name, id);
        t.order.push(id);
        Some(id)
    }

    /// Look `name` up in `table` only.
    #[inline]
    pub fn find(&self, table: TableId, name: Name) -> Option<SymbolId> {
        self.tables.get(table.index())?.map.get(&name).copied()
    }

    /// Look `name` up in `table` and its ancestors, without following
    /// aliases.
    pub fn find_in_chain(&self, table: TableId, name: Name) -> Option<SymbolId> {
        let mut current = Some(table);
        // A parent cycle cannot visit more tables than exist.
        for _ in 0..=self.tables.len() {
            let t = current?;
            if let Some(id) = self.find(t, name) {
                return Some(id);
            }
            current = self.parent(t);
        }
        None
    }

    /// Scoped lookup with alias resolution.
    ///
    /// An alias to a name is resolved again from `table`, at most
    /// [`MAX_ALIAS_DEPTH`] times; a longer chain (or a cycle) resolves to
    /// `None`. An alias whose target does not exist, or whose target is an
    /// expression, resolves to the alias itself.
    pub fn resolve(&self, table: TableId, name: Name) -> Option<SymbolId> {
        match self.resolve_at(table, name, 0) {
            Resolution::Found(id) => Some(id),
            Resolution::Missing | Resolution::TooDeep => None,
        }
    }

    fn resolve_at(&self, table: TableId, name: Name, depth: u32) -> Resolution {
        let Some(id) = self.find_in_chain(table, name) else {
            return Resolution::Missing;
        };
        let sym = self.symbol(id);
        let SymbolValue::Alias(AliasTarget::Name(target)) = sym.value else {
            return Resolution::Found(id);
        };
        if depth >= MAX_ALIAS_DEPTH {
            tracing::debug!(?name, depth, "alias chain too deep");
            return Resolution::TooDeep;
        }
        match self.resolve_at(table, target, depth + 1) {
            Resolution::Missing => Resolution::Found(id),
            other => other,
        }
    }

    /// Find the storage symbol at `offset` in `table`. A result-slot query
    /// falls back to parameters, and a parameter query to locals.
    pub fn find_by_offset_and_kind(
        &self,
        table: TableId,
        offset: u32,
        kind: SymbolKind,
    ) -> Option<SymbolId> {
        let search = |k: SymbolKind| {
            self.symbols_in(table).find(|&id| {
                let sym = self.symbol(id);
                sym.kind == k && sym.offset == offset
            })
        };
        match kind {
            SymbolKind::Result => search(SymbolKind::Result)
                .or_else(|| search(SymbolKind::Parameter))
                .or_else(|| search(SymbolKind::LocalVar)),
            SymbolKind::Parameter => {
                search(SymbolKind::Parameter).or_else(|| search(SymbolKind::LocalVar))
            }
            other => search(other),
        }
    }

    /// Symbols of `table` in insertion order.
    pub fn symbols_in(&self, table: TableId) -> impl Iterator<Item = SymbolId> + '_ {
        self.tables
            .get(table.index())
            .map(|t| t.order.as_slice())
            .unwrap_or_default()
            .iter()
            .copied()
    }
}

impl std::fmt::Debug for SymbolTables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolTables")
            .field("tables", &self.tables.len())
            .field("symbols", &self.symbols.len())
            .finish()
    }
}

#[cfg(test)]
mod tests;
