// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The chain of variable tables visible while building.

use brook_ast::tree::{Program, TableId, VarRef};

/// Tables in scope, outermost first.
#[derive(Debug, Default)]
pub struct ScopeChain {
    tables: Vec<TableId>,
}

impl ScopeChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, table: TableId) {
        self.tables.push(table);
    }

    pub fn pop(&mut self) {
        self.tables.pop();
    }

    pub fn depth(&self) -> usize {
        self.tables.len()
    }

    /// Innermost table first, latest declaration first within a table.
    pub fn lookup(&self, program: &Program, name: &str) -> Option<VarRef> {
        self.tables.iter().rev().find_map(|&table| {
            program.table(table).lookup(name).map(|index| VarRef { table, index })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brook_ast::tree::Variable;
    use brook_ast::Span;

    #[test]
    fn inner_tables_shadow_outer() {
        let mut program = Program::new();
        let globals = program.globals;
        let inner = program.add_table();
        program.table_mut(globals).push(Variable::stub("x", Span::default()));
        program.table_mut(globals).push(Variable::stub("y", Span::default()));
        program.table_mut(inner).push(Variable::stub("x", Span::default()));

        let mut chain = ScopeChain::new();
        chain.push(globals);
        assert_eq!(chain.lookup(&program, "x"), Some(VarRef { table: globals, index: 0 }));

        chain.push(inner);
        assert_eq!(chain.lookup(&program, "x"), Some(VarRef { table: inner, index: 0 }));
        assert_eq!(chain.lookup(&program, "y"), Some(VarRef { table: globals, index: 1 }));
        assert_eq!(chain.lookup(&program, "z"), None);

        chain.pop();
        assert_eq!(chain.depth(), 1);
        assert_eq!(chain.lookup(&program, "x"), Some(VarRef { table: globals, index: 0 }));
    }
}
