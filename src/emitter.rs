//! Quadruple emitter (component G).
//!
//! Lowers the analyzed tree into a textual listing, one instruction per
//! line, of the form `OP[_TYPETAG] [operand]`. Built with `std::fmt::Write`
//! into an owned `String`, same approach the teacher's `codegen.rs` uses for
//! its LLVM-IR text buffer.

use std::fmt::Write as _;
use std::ops::{Deref, DerefMut};

use crate::ast::{Block, CaseLabelStmt, Expression, ExprKind, Literal, Statement};
use crate::folder::fold;
use crate::scope::ScopeStack;
use crate::types::{promote, DataType, Operator};

pub struct Emitter {
    output: String,
    next_label: u32,
    break_labels: Vec<String>,
    continue_labels: Vec<String>,
}

impl Emitter {
    pub fn new() -> Self {
        Emitter { output: String::new(), next_label: 1, break_labels: Vec::new(), continue_labels: Vec::new() }
    }

    pub fn finish(self) -> String {
        self.output
    }

    fn fresh_label(&mut self) -> String {
        let label = format!("L{}", self.next_label);
        self.next_label += 1;
        label
    }

    fn line(&mut self, text: impl AsRef<str>) {
        let _ = writeln!(self.output, "{}", text.as_ref());
    }

    fn emit_label(&mut self, label: &str) {
        let _ = writeln!(self.output, "{label}:");
    }

    /// Pushes a break/continue target pair; popped when the returned guard
    /// drops, mirroring `ScopeGuard` in `scope.rs` — "push one thing, pop it
    /// on drop," reused here for the emitter's label stacks.
    fn push_loop_labels(&mut self, break_label: String, continue_label: String) -> LoopGuard<'_> {
        self.break_labels.push(break_label);
        self.continue_labels.push(continue_label);
        LoopGuard { emitter: self }
    }

    fn push_break_only(&mut self, break_label: String) -> BreakGuard<'_> {
        self.break_labels.push(break_label);
        BreakGuard { emitter: self }
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}

struct LoopGuard<'a> {
    emitter: &'a mut Emitter,
}

impl Deref for LoopGuard<'_> {
    type Target = Emitter;
    fn deref(&self) -> &Emitter {
        self.emitter
    }
}
impl DerefMut for LoopGuard<'_> {
    fn deref_mut(&mut self) -> &mut Emitter {
        self.emitter
    }
}
impl Drop for LoopGuard<'_> {
    fn drop(&mut self) {
        self.emitter.break_labels.pop();
        self.emitter.continue_labels.pop();
    }
}

struct BreakGuard<'a> {
    emitter: &'a mut Emitter,
}

impl Deref for BreakGuard<'_> {
    type Target = Emitter;
    fn deref(&self) -> &Emitter {
        self.emitter
    }
}
impl DerefMut for BreakGuard<'_> {
    fn deref_mut(&mut self) -> &mut Emitter {
        self.emitter
    }
}
impl Drop for BreakGuard<'_> {
    fn drop(&mut self) {
        self.emitter.break_labels.pop();
    }
}

/// `t1 -> t2` as a no-op when the types already match.
fn convert(out: &mut Emitter, from: DataType, to: DataType) {
    if from != to {
        out.line(format!("{}_TO_{}", from.short_tag(), to.short_tag()));
    }
}

pub fn emit_program(program: &crate::ast::Program, scopes: &ScopeStack) -> String {
    let mut out = Emitter::new();
    for item in &program.items {
        // Top level: only function/var declarations reach here, neither of
        // which can contain a bare `return` outside a function body, so the
        // placeholder return type is never actually consulted.
        emit_stmt(item, &mut out, scopes, DataType::Void);
    }
    out.finish()
}

/// `return_type` is the enclosing function's declared return type — threaded
/// down from `Statement::Function` rather than re-derived from the scope
/// stack, since by emission time the function's scope has already been
/// popped and `scopes` no longer has any record of it.
fn emit_stmt(stmt: &Statement, out: &mut Emitter, scopes: &ScopeStack, return_type: DataType) {
    match stmt {
        Statement::Block(b) => emit_block(b, out, scopes, return_type),
        Statement::Function(f) => {
            let alias = f.decl.borrow().alias.clone();
            out.line(format!("PROC {alias}"));
            for param in &f.params {
                let param_alias = param.decl.borrow().alias.clone();
                out.line(format!("POP_{} {param_alias}", param.decl.borrow().data_type.short_tag()));
            }
            emit_stmt(&f.body, out, scopes, f.return_type);
            out.line(format!("ENDP {alias}"));
        }
        Statement::VarDecl(v) => emit_var_decl(v, out, scopes),
        Statement::MultiVarDecl(m) => {
            for v in &m.decls {
                emit_var_decl(v, out, scopes);
            }
        }
        Statement::Expr(e) => emit_expr(e, out, scopes),
        Statement::Return { expr, .. } => {
            if let Some(e) = expr {
                emit_expr(e, out, scopes);
                convert(out, e.attrs.data_type, return_type);
            }
            out.line("RET");
        }
        Statement::If(s) => emit_if(s, out, scopes, return_type),
        Statement::While(s) => emit_while(s, out, scopes, return_type),
        Statement::DoWhile(s) => emit_do_while(s, out, scopes, return_type),
        Statement::For(s) => emit_for(s, out, scopes, return_type),
        Statement::Switch(s) => emit_switch(s, out, scopes, return_type),
        Statement::Break(_) => {
            let label = out.break_labels.last().expect("analyzer already validated break-allowed").clone();
            out.line(format!("JMP {label}"));
        }
        Statement::Continue(_) => {
            let label = out.continue_labels.last().expect("analyzer already validated continue-allowed").clone();
            out.line(format!("JMP {label}"));
        }
        Statement::CaseLabel(_) => {}
        Statement::Error { .. } => {}
    }
}

/// Shared by a single `VarDecl` and each declarator of a `MultiVarDecl` —
/// parameters never reach here with an initializer (the caller pops them in
/// `emit_stmt`'s `Statement::Function` arm instead).
fn emit_var_decl(v: &crate::ast::VarDecl, out: &mut Emitter, scopes: &ScopeStack) {
    if let Some(init) = &v.initializer {
        let declared_type = v.decl.borrow().data_type;
        emit_expr(init, out, scopes);
        convert(out, init.attrs.data_type, declared_type);
        let alias = v.decl.borrow().alias.clone();
        out.line(format!("POP_{} {alias}", declared_type.short_tag()));
    }
}

fn emit_block(block: &Block, out: &mut Emitter, scopes: &ScopeStack, return_type: DataType) {
    for stmt in &block.statements {
        emit_stmt(stmt, out, scopes, return_type);
    }
}

fn emit_if(s: &crate::ast::IfStmt, out: &mut Emitter, scopes: &ScopeStack, return_type: DataType) {
    emit_expr(&s.cond, out, scopes);
    let lend = out.fresh_label();
    if let Some(else_branch) = &s.else_branch {
        let lelse = out.fresh_label();
        out.line(format!("JZ_{} {lelse}", s.cond.attrs.data_type.short_tag()));
        emit_stmt(&s.then_branch, out, scopes, return_type);
        out.line(format!("JMP {lend}"));
        out.emit_label(&lelse);
        emit_stmt(else_branch, out, scopes, return_type);
        out.emit_label(&lend);
    } else {
        out.line(format!("JZ_{} {lend}", s.cond.attrs.data_type.short_tag()));
        emit_stmt(&s.then_branch, out, scopes, return_type);
        out.emit_label(&lend);
    }
}

fn emit_while(s: &crate::ast::WhileStmt, out: &mut Emitter, scopes: &ScopeStack, return_type: DataType) {
    let ltop = out.fresh_label();
    let lexit = out.fresh_label();
    out.emit_label(&ltop);
    emit_expr(&s.cond, out, scopes);
    out.line(format!("JZ_{} {lexit}", s.cond.attrs.data_type.short_tag()));
    {
        let mut guarded = out.push_loop_labels(lexit.clone(), ltop.clone());
        emit_stmt(&s.body, &mut guarded, scopes, return_type);
    }
    out.line(format!("JMP {ltop}"));
    out.emit_label(&lexit);
}

fn emit_do_while(s: &crate::ast::DoWhileStmt, out: &mut Emitter, scopes: &ScopeStack, return_type: DataType) {
    let ltop = out.fresh_label();
    let lcont = out.fresh_label();
    let lexit = out.fresh_label();
    out.emit_label(&ltop);
    {
        let mut guarded = out.push_loop_labels(lexit.clone(), lcont.clone());
        emit_stmt(&s.body, &mut guarded, scopes, return_type);
    }
    out.emit_label(&lcont);
    emit_expr(&s.cond, out, scopes);
    out.line(format!("JNZ_{} {ltop}", s.cond.attrs.data_type.short_tag()));
    out.emit_label(&lexit);
}

fn emit_for(s: &crate::ast::ForStmt, out: &mut Emitter, scopes: &ScopeStack, return_type: DataType) {
    let ltop = out.fresh_label();
    let lcont = out.fresh_label();
    let lexit = out.fresh_label();

    if let Some(init) = &s.init {
        emit_stmt(init, out, scopes, return_type);
    }
    out.emit_label(&ltop);
    if let Some(cond) = &s.cond {
        emit_expr(cond, out, scopes);
        out.line(format!("JZ_{} {lexit}", cond.attrs.data_type.short_tag()));
    }
    {
        let mut guarded = out.push_loop_labels(lexit.clone(), lcont.clone());
        emit_stmt(&s.body, &mut guarded, scopes, return_type);
    }
    out.emit_label(&lcont);
    if let Some(inc) = &s.inc {
        emit_expr(inc, out, scopes);
    }
    out.line(format!("JMP {ltop}"));
    out.emit_label(&lexit);
}

struct CaseBlock<'a> {
    value: Option<i64>,
    is_default: bool,
    statements: Vec<&'a Statement>,
}

/// Groups a switch body's flat statement sequence into case-blocks: each
/// run of consecutive `case`/`default` labels followed by the statements
/// they guard, in source order. Needed only here — `analyzer.rs` walks the
/// body statement-by-statement and finds its enclosing switch by searching
/// up the scope stack, so it never needs this grouping.
///
/// Re-folds each case label's expression rather than caching the value from
/// analysis, but `fold` itself resolves identifiers through the expression's
/// cached `attrs.reference` (not a scope lookup), so this is safe to run
/// again here even though every scope has been popped by emission time.
fn flatten_case_blocks(statements: &[Statement]) -> Vec<CaseBlock<'_>> {
    let mut blocks: Vec<CaseBlock<'_>> = Vec::new();
    for stmt in statements {
        match stmt {
            Statement::CaseLabel(CaseLabelStmt { expr, .. }) => {
                let (value, is_default) = match expr {
                    Some(e) => (fold(e), false),
                    None => (None, true),
                };
                blocks.push(CaseBlock { value, is_default, statements: Vec::new() });
            }
            other => {
                if blocks.is_empty() {
                    blocks.push(CaseBlock { value: None, is_default: false, statements: Vec::new() });
                }
                blocks.last_mut().unwrap().statements.push(other);
            }
        }
    }
    blocks
}

/// Lowers a switch as a comparison chain followed by its bodies emitted
/// contiguously in source order, so fallthrough between case bodies is a
/// property of instruction adjacency rather than an explicit jump — the
/// same behavior spec.md's case-block scheme describes, reordered so every
/// comparison precedes every body instead of interleaving a `JMP Lbody[i]`
/// ahead of each one (see DESIGN.md).
fn emit_switch(s: &crate::ast::SwitchStmt, out: &mut Emitter, scopes: &ScopeStack, return_type: DataType) {
    let lbreak = out.fresh_label();

    emit_expr(&s.cond, out, scopes);
    let cond_type = s.cond.attrs.data_type;
    let cond_cell = format!("SWITCH_COND@{lbreak}");
    out.line(format!("POP_{} {cond_cell}", cond_type.short_tag()));

    let Statement::Block(body) = s.body.as_ref() else {
        unreachable!("parser always wraps a switch body in a block")
    };
    let blocks = flatten_case_blocks(&body.statements);
    let body_labels: Vec<String> = blocks.iter().map(|_| out.fresh_label()).collect();
    let default_idx = blocks.iter().position(|b| b.is_default);

    for (i, block) in blocks.iter().enumerate() {
        if let Some(value) = block.value {
            let case_type = DataType::Int;
            let result_type = promote(cond_type, case_type);
            out.line(format!("PUSH_{} {cond_cell}", cond_type.short_tag()));
            convert(out, cond_type, result_type);
            out.line(format!("PUSH_INT {value}"));
            convert(out, case_type, result_type);
            out.line(format!("EQU_{}", result_type.short_tag()));
            out.line(format!("JNZ_BOOL {}", body_labels[i]));
        }
    }
    match default_idx {
        Some(di) => out.line(format!("JMP {}", body_labels[di])),
        None => out.line(format!("JMP {lbreak}")),
    }

    {
        let mut guarded = out.push_break_only(lbreak.clone());
        for (i, block) in blocks.iter().enumerate() {
            guarded.emit_label(&body_labels[i]);
            for stmt in &block.statements {
                emit_stmt(stmt, &mut guarded, scopes, return_type);
            }
        }
    }
    out.emit_label(&lbreak);
}

fn emit_expr(expr: &Expression, out: &mut Emitter, scopes: &ScopeStack) {
    match &expr.kind {
        ExprKind::Literal(lit) => {
            if expr.attrs.used {
                let text = match lit {
                    Literal::Bool(b) => (*b as i64).to_string(),
                    Literal::Char(c) => (*c as i64).to_string(),
                    Literal::Int(v) => v.to_string(),
                    Literal::Float(v) => v.to_string(),
                };
                out.line(format!("PUSH_{} {text}", expr.attrs.data_type.short_tag()));
            }
        }

        ExprKind::Identifier { name } => {
            if expr.attrs.used {
                let alias = expr
                    .attrs
                    .reference
                    .as_ref()
                    .map(|d| d.borrow().alias.clone())
                    .unwrap_or_else(|| name.clone());
                out.line(format!("PUSH_{} {alias}", expr.attrs.data_type.short_tag()));
            }
        }

        ExprKind::Container(inner) => emit_expr(inner, out, scopes),

        ExprKind::Assignment { lhs, rhs, .. } => {
            emit_expr(lhs, out, scopes);
            emit_expr(rhs, out, scopes);
            convert(out, rhs.attrs.data_type, expr.attrs.data_type);
            let alias = expr
                .attrs
                .reference
                .as_ref()
                .map(|d| d.borrow().alias.clone())
                .unwrap_or_default();
            out.line(format!("POP_{} {alias}", expr.attrs.data_type.short_tag()));
            if expr.attrs.used {
                out.line(format!("PUSH_{} {alias}", expr.attrs.data_type.short_tag()));
            }
        }

        ExprKind::Binary { op, lhs, rhs } => {
            if !expr.attrs.used {
                emit_expr(lhs, out, scopes);
                emit_expr(rhs, out, scopes);
                return;
            }
            emit_expr(lhs, out, scopes);
            convert(out, lhs.attrs.data_type, expr.attrs.data_type);
            emit_expr(rhs, out, scopes);
            convert(out, rhs.attrs.data_type, expr.attrs.data_type);
            out.line(format!("{}_{}", op.quad_mnemonic(), expr.attrs.data_type.short_tag()));
        }

        ExprKind::Unary { op, operand } => emit_unary(*op, operand, expr, out, scopes),

        ExprKind::Call { name, args } => {
            let callee = scopes.lookup(name);
            let params: Vec<DataType> = callee
                .as_ref()
                .and_then(|d| match &d.borrow().kind {
                    crate::ast::DeclKind::Function { params, .. } => Some(params.clone()),
                    crate::ast::DeclKind::Variable { .. } => None,
                })
                .unwrap_or_default();

            for (i, arg) in args.iter().enumerate().rev() {
                emit_expr(arg, out, scopes);
                if let Some(param_ty) = params.get(i) {
                    convert(out, arg.attrs.data_type, *param_ty);
                }
            }
            let alias = callee.map(|d| d.borrow().alias.clone()).unwrap_or_else(|| name.clone());
            out.line(format!("CALL {alias}"));
        }
    }
}

fn emit_unary(op: Operator, operand: &Expression, expr: &Expression, out: &mut Emitter, scopes: &ScopeStack) {
    let alias = || -> String {
        operand.attrs.reference.as_ref().map(|d| d.borrow().alias.clone()).unwrap_or_default()
    };
    let tag = expr.attrs.data_type.short_tag();

    match op {
        Operator::PreInc | Operator::PreDec => {
            emit_expr(operand, out, scopes);
            out.line(format!("{}_{tag}", op.quad_mnemonic()));
            out.line(format!("POP_{tag} {}", alias()));
            if expr.attrs.used {
                out.line(format!("PUSH_{tag} {}", alias()));
            }
        }
        Operator::PostInc | Operator::PostDec => {
            emit_expr(operand, out, scopes);
            if expr.attrs.used {
                out.line(format!("PUSH_{tag} {}", alias()));
            }
            out.line(format!("{}_{tag}", op.quad_mnemonic()));
            out.line(format!("POP_{tag} {}", alias()));
        }
        Operator::UnaryMinus | Operator::BitNot | Operator::LogicalNot => {
            emit_expr(operand, out, scopes);
            if expr.attrs.used {
                out.line(format!("{}_{tag}", op.quad_mnemonic()));
            }
        }
        Operator::UnaryPlus => {
            emit_expr(operand, out, scopes);
        }
        _ => unreachable!("not a unary operator"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze_program;
    use crate::diagnostics::Sink;
    use crate::parser::Parser;

    fn emit(source: &str) -> String {
        let mut program = Parser::new(source).parse_program();
        let mut scopes = ScopeStack::new();
        let mut sink = Sink::new(source, false, Box::new(Vec::new()), Box::new(Vec::new()));
        assert!(analyze_program(&mut program, &mut scopes, &mut sink), "analysis failed");
        assert!(!sink.has_errors());
        emit_program(&program, &scopes)
    }

    #[test]
    fn empty_function_body_emits_just_proc_and_endp() {
        let out = emit("void main() { }");
        assert_eq!(out, "PROC main\nENDP main\n");
    }

    #[test]
    fn arithmetic_assignment_lowers_to_push_pop_sequence() {
        let out = emit("int main() { int x = 3; x = x + 1; return x; }");
        for expected in ["PUSH_INT 3", "POP_INT x", "ADD_INT", "RET", "ENDP main"] {
            assert!(out.contains(expected), "missing `{expected}` in:\n{out}");
        }
    }

    #[test]
    fn switch_with_no_cases_pops_discriminant_and_jumps_to_break() {
        let out = emit("int main() { int x = 0; switch (x) { } return 0; }");
        assert!(out.contains("SWITCH_COND@"), "{out}");
        assert!(out.contains("JMP L"), "{out}");
    }

    #[test]
    fn switch_comparisons_all_precede_case_bodies() {
        let out = emit("int main() { int x = 1; switch (x) { case 1: break; default: break; } return 0; }");
        let comparison = out.find("EQU_INT").unwrap();
        let first_body_label = out.find("L2:").unwrap();
        assert!(comparison < first_body_label, "comparison chain must precede case bodies:\n{out}");
    }

    #[test]
    fn function_call_lowers_arguments_in_reverse_then_calls() {
        let out = emit("int id(int a) { return a; } int main() { return id(5); }");
        let push_pos = out.find("PUSH_INT 5").unwrap();
        let call_pos = out.find("CALL id").unwrap();
        assert!(push_pos < call_pos);
    }
}
