//! Loop guard injection.
//!
//! Every `for` / `for…in` / `for…of` / `while` / `do…while` body gets a
//! counter check as its first statement, so a runaway loop in user code
//! throws instead of hanging the preview realm. Non-block bodies are
//! wrapped in a block first.

use oxc_allocator::{Allocator, CloneIn};
use oxc_ast::ast::*;
use oxc_ast::AstBuilder;
use oxc_ast_visit::walk_mut::{
    walk_do_while_statement, walk_for_in_statement, walk_for_of_statement, walk_for_statement,
    walk_while_statement,
};
use oxc_ast_visit::VisitMut;
use oxc_parser::Parser;
use oxc_span::{SourceType, SPAN};

/// Module-level counter shared by every guarded loop in one module.
pub const LOOP_GUARD_IDENT: &str = "__loopGuard";
pub const LOOP_GUARD_MESSAGE: &str = "Possible infinite loop detected";

pub fn guard_prelude() -> String {
    format!("let {} = 0;\n", LOOP_GUARD_IDENT)
}

pub fn guard_statement_source(threshold: u32) -> String {
    format!(
        "if (++{} > {}) throw new Error(\"{}\");",
        LOOP_GUARD_IDENT, threshold, LOOP_GUARD_MESSAGE
    )
}

pub struct LoopGuardInjector<'a> {
    ast: AstBuilder<'a>,
    guard: Statement<'a>,
    pub injected: usize,
}

impl<'a> LoopGuardInjector<'a> {
    /// Parses the guard statement once into `allocator`; each loop receives
    /// its own clone.
    pub fn new(allocator: &'a Allocator, threshold: u32) -> Option<Self> {
        let source = allocator.alloc_str(&guard_statement_source(threshold));
        let ret = Parser::new(allocator, source, SourceType::mjs()).parse();
        if !ret.errors.is_empty() {
            return None;
        }
        let guard = ret.program.body.into_iter().next()?;
        Some(Self {
            ast: AstBuilder::new(allocator),
            guard,
            injected: 0,
        })
    }

    fn guard_body(&mut self, body: &mut Statement<'a>) {
        let guard = self.guard.clone_in(self.ast.allocator);
        let mut statements = self.ast.vec();
        statements.push(guard);

        if let Statement::BlockStatement(block) = body {
            let existing = std::mem::replace(&mut block.body, self.ast.vec());
            for stmt in existing {
                statements.push(stmt);
            }
            block.body = statements;
        } else {
            let original = std::mem::replace(body, self.ast.statement_empty(SPAN));
            statements.push(original);
            *body = self.ast.statement_block(SPAN, statements);
        }
        self.injected += 1;
    }
}

impl<'a> VisitMut<'a> for LoopGuardInjector<'a> {
    fn visit_for_statement(&mut self, it: &mut ForStatement<'a>) {
        walk_for_statement(self, it);
        self.guard_body(&mut it.body);
    }

    fn visit_for_in_statement(&mut self, it: &mut ForInStatement<'a>) {
        walk_for_in_statement(self, it);
        self.guard_body(&mut it.body);
    }

    fn visit_for_of_statement(&mut self, it: &mut ForOfStatement<'a>) {
        walk_for_of_statement(self, it);
        self.guard_body(&mut it.body);
    }

    fn visit_while_statement(&mut self, it: &mut WhileStatement<'a>) {
        walk_while_statement(self, it);
        self.guard_body(&mut it.body);
    }

    fn visit_do_while_statement(&mut self, it: &mut DoWhileStatement<'a>) {
        walk_do_while_statement(self, it);
        self.guard_body(&mut it.body);
    }
}
