//! Per-function lowering context (C3/C5): the local table, the break/continue
//! label stack, and the structured-control nesting depth needed to compute
//! `br` targets — explicit state threaded through the recursive statement
//! walk, never global mutable state.

use walang_type_checker::{ClassId, IrType, LabelStack, LocalScope, SymbolTable};

pub struct FuncCtx<'a> {
    pub symbols: &'a SymbolTable,
    pub locals: LocalScope,
    pub labels: LabelStack,
    /// `(break_target_depth, continue_target_depth)`, numeric `wasm`
    /// structured-control nesting depths mirroring `labels`' push/pop
    /// discipline — see `stmt.rs::lower_while` for how these are derived.
    loop_depths: Vec<(u32, u32)>,
    pub return_type: IrType,
    pub current_class: Option<ClassId>,
}

impl<'a> FuncCtx<'a> {
    #[must_use]
    pub fn new(symbols: &'a SymbolTable, return_type: IrType, current_class: Option<ClassId>) -> Self {
        Self {
            symbols,
            locals: LocalScope::new(),
            labels: LabelStack::new(),
            loop_depths: Vec::new(),
            return_type,
            current_class,
        }
    }

    pub fn enter_loop(&mut self, break_target: u32, continue_target: u32) {
        self.labels.enter_loop("while");
        self.loop_depths.push((break_target, continue_target));
    }

    pub fn exit_loop(&mut self) {
        self.labels.exit_loop();
        self.loop_depths.pop();
    }

    #[must_use]
    pub fn break_target(&self) -> Option<u32> {
        self.loop_depths.last().map(|(b, _)| *b)
    }

    #[must_use]
    pub fn continue_target(&self) -> Option<u32> {
        self.loop_depths.last().map(|(_, c)| *c)
    }
}
