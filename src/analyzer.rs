//! Semantic analyzer (component E).
//!
//! A boolean-valued tree walk: every function returns `true` iff no error
//! was reported in its subtree. Analysis never aborts on the first error —
//! siblings are combined with bitwise `&` (not `&&`) so that a failing left
//! operand does not suppress the diagnostics a failing right operand would
//! also produce. This is deliberate (see the folder/analyzer split in
//! spec's Design Notes) and is why the combinators below read `a & b`
//! rather than `a && b` in the places where both sides matter.

use crate::ast::{
    Block, CaseLabelStmt, DeclKind, Expression, ExprKind, FunctionDecl, IfStmt, Literal,
    MultiVarDecl, Program, Statement, SwitchStmt, VarDecl,
};
use crate::diagnostics::Sink;
use crate::folder::fold;
use crate::scope::{ScopeKind, ScopeStack, UnusedNotice};
use crate::types::{promote, DataType, Operator};

pub fn analyze_program(program: &mut Program, scopes: &mut ScopeStack, sink: &mut Sink) -> bool {
    let mut ok = true;
    for item in &mut program.items {
        ok &= analyze_stmt(item, scopes, sink);
    }
    ok
}

fn report_unused(sink: &mut Sink, notice: &UnusedNotice) {
    let message = if notice.is_function {
        format!("function '{}' is never called", notice.header)
    } else {
        format!("the value of variable '{}' is never used", notice.header)
    };
    sink.warning(notice.location, message);
}

fn drain_unused(scopes: &mut ScopeStack, sink: &mut Sink) {
    for notice in scopes.take_pending_unused() {
        report_unused(sink, &notice);
    }
}

pub fn analyze_stmt(stmt: &mut Statement, scopes: &mut ScopeStack, sink: &mut Sink) -> bool {
    match stmt {
        Statement::Block(b) => analyze_block(b, scopes, sink),
        Statement::If(s) => analyze_if(s, scopes, sink),
        Statement::Switch(s) => analyze_switch(s, scopes, sink),
        Statement::CaseLabel(c) => analyze_case_label(c, scopes, sink),
        Statement::While(s) => {
            if scopes.is_global_scope() {
                sink.error(s.location, "while-statement is not allowed in global scope");
                return false;
            }
            let mut scope = scopes.push(ScopeKind::Loop);
            let mut ok = analyze_expr(&mut s.cond, true, &mut scope, sink);
            if s.cond.attrs.data_type == DataType::Void {
                sink.error(
                    s.cond.location,
                    format!("invalid conversion from '{}' to 'bool'", s.cond.attrs.data_type),
                );
                ok = false;
            }
            ok &= analyze_stmt(&mut s.body, &mut scope, sink);
            drop(scope);
            drain_unused(scopes, sink);
            ok
        }
        Statement::DoWhile(s) => {
            if scopes.is_global_scope() {
                sink.error(s.location, "do-while-statement is not allowed in global scope");
                return false;
            }
            let mut scope = scopes.push(ScopeKind::Loop);
            let mut ok = analyze_stmt(&mut s.body, &mut scope, sink);
            ok &= analyze_expr(&mut s.cond, true, &mut scope, sink);
            if s.cond.attrs.data_type == DataType::Void {
                sink.error(
                    s.cond.location,
                    format!("invalid conversion from '{}' to 'bool'", s.cond.attrs.data_type),
                );
                ok = false;
            }
            drop(scope);
            drain_unused(scopes, sink);
            ok
        }
        Statement::For(s) => {
            if scopes.is_global_scope() {
                sink.error(s.location, "for-statement is not allowed in global scope");
                return false;
            }
            let mut scope = scopes.push(ScopeKind::Loop);
            let mut ok = true;
            if let Some(init) = &mut s.init {
                ok &= analyze_stmt(init, &mut scope, sink);
            }
            if let Some(cond) = &mut s.cond {
                ok &= analyze_expr(cond, true, &mut scope, sink);
            }
            if let Some(inc) = &mut s.inc {
                ok &= analyze_expr(inc, false, &mut scope, sink);
            }
            ok &= analyze_stmt(&mut s.body, &mut scope, sink);
            drop(scope);
            drain_unused(scopes, sink);
            ok
        }
        Statement::Break(loc) => {
            if !scopes.break_allowed() {
                sink.error(*loc, "break-statement not within loop or switch");
                false
            } else {
                true
            }
        }
        Statement::Continue(loc) => {
            if !scopes.continue_allowed() {
                sink.error(*loc, "continue-statement not within loop");
                false
            } else {
                true
            }
        }
        Statement::Return { expr, location } => analyze_return(expr, *location, scopes, sink),
        Statement::Function(f) => analyze_function(f, scopes, sink),
        Statement::VarDecl(v) => analyze_var_decl(v, scopes, sink),
        Statement::MultiVarDecl(m) => analyze_multi_var_decl(m, scopes, sink),
        Statement::Expr(e) => analyze_expr(e, false, scopes, sink),
        Statement::Error { message, location } => {
            sink.error(*location, message.clone());
            false
        }
    }
}

fn analyze_block(block: &mut Block, scopes: &mut ScopeStack, sink: &mut Sink) -> bool {
    if scopes.is_global_scope() {
        sink.error(block.location, "block is not allowed in global scope");
        return false;
    }

    let mut ok = true;
    let mut scope = scopes.push(ScopeKind::Block);
    for stmt in &mut block.statements {
        ok &= analyze_stmt(stmt, &mut scope, sink);
    }
    drop(scope);
    drain_unused(scopes, sink);
    ok
}

fn analyze_if(s: &mut IfStmt, scopes: &mut ScopeStack, sink: &mut Sink) -> bool {
    if scopes.is_global_scope() {
        sink.error(s.location, "if-statement is not allowed in global scope");
        return false;
    }

    let mut scope = scopes.push(ScopeKind::If);
    let mut ok = analyze_expr(&mut s.cond, true, &mut scope, sink);
    if s.cond.attrs.data_type == DataType::Void {
        sink.error(
            s.cond.location,
            format!("invalid conversion from '{}' to 'bool'", s.cond.attrs.data_type),
        );
        ok = false;
    }
    ok &= analyze_stmt(&mut s.then_branch, &mut scope, sink);
    if let Some(else_branch) = &mut s.else_branch {
        ok &= analyze_stmt(else_branch, &mut scope, sink);
    }
    drop(scope);
    drain_unused(scopes, sink);
    ok
}

fn analyze_switch(s: &mut SwitchStmt, scopes: &mut ScopeStack, sink: &mut Sink) -> bool {
    if scopes.is_global_scope() {
        sink.error(s.location, "switch-statement is not allowed in global scope");
        return false;
    }

    let mut scope = scopes.push(ScopeKind::Switch);
    let mut ok = analyze_expr(&mut s.cond, true, &mut scope, sink);
    if !s.cond.attrs.data_type.is_integer() {
        sink.error(s.cond.location, "switch quantity not an integer");
        ok = false;
    }
    ok &= analyze_stmt(&mut s.body, &mut scope, sink);
    drop(scope);
    drain_unused(scopes, sink);
    ok
}

fn analyze_case_label(label: &mut CaseLabelStmt, scopes: &mut ScopeStack, sink: &mut Sink) -> bool {
    let loc = label.location;

    if scopes.enclosing_switch_mut().is_none() {
        sink.error(loc, "case label not within switch statement");
        return false;
    }

    let mut ok = true;

    let initialized = scopes.enclosing_switch_mut().unwrap().initialized_in_switch.clone();
    if !initialized.is_empty() {
        sink.error(loc, "jump to case label");
        for decl in &initialized {
            let d = decl.borrow();
            sink.note(d.location, format!("crosses initialization of '{}'", d.header()));
        }
        ok = false;
    }

    match &mut label.expr {
        None => {
            let switch = scopes.enclosing_switch_mut().unwrap();
            if switch.has_default {
                sink.error(loc, "multiple default labels in one switch");
                ok = false;
            } else {
                switch.has_default = true;
            }
        }
        Some(expr) => {
            ok &= analyze_expr(expr, true, scopes, sink);

            if !expr.attrs.constant {
                sink.error(expr.location, "constant expression required in case label");
                ok = false;
            } else if !expr.attrs.data_type.is_integer() {
                sink.error(expr.location, "case quantity not an integer");
                ok = false;
            } else if let Some(value) = fold(expr) {
                let switch = scopes.enclosing_switch_mut().unwrap();
                if let Some(&first_loc) = switch.first_use.get(&value) {
                    sink.error(loc, "duplicate case value");
                    sink.note(first_loc, "previously used here");
                    ok = false;
                } else {
                    switch.case_values.insert(value);
                    switch.first_use.insert(value, loc);
                }
            }
        }
    }

    ok
}

fn analyze_return(
    expr: &mut Option<Expression>,
    location: crate::location::Location,
    scopes: &mut ScopeStack,
    sink: &mut Sink,
) -> bool {
    let Some(return_type) = scopes.enclosing_function_return_type() else {
        sink.error(location, "return-statement not within function");
        return false;
    };

    match expr {
        Some(value) => {
            if !analyze_expr(value, true, scopes, sink) {
                return false;
            }
            if return_type == DataType::Void && value.attrs.data_type != DataType::Void {
                sink.error(
                    value.location,
                    format!(
                        "return-statement with '{}' value, in function returning 'void'",
                        value.attrs.data_type
                    ),
                );
                return false;
            }
            true
        }
        None => {
            if return_type != DataType::Void {
                sink.error(
                    location,
                    format!("return-statement with no value, in function returning '{return_type}'"),
                );
                return false;
            }
            true
        }
    }
}

fn analyze_function(f: &mut FunctionDecl, scopes: &mut ScopeStack, sink: &mut Sink) -> bool {
    if !scopes.is_global_scope() {
        sink.error(f.location, "a function-definition is not allowed here");
        return false;
    }

    let mut ok = true;
    if !scopes.declare(f.decl.clone()) {
        let header = f.decl.borrow().header();
        sink.error(f.location, format!("'{header}' redeclared"));
        ok = false;
    }

    let mut scope = scopes.push(ScopeKind::Function);
    scope.set_function_return_type(f.return_type);

    scope.declaring_function_params = true;
    for param in &mut f.params {
        ok &= analyze_var_decl(param, &mut scope, sink);
    }
    scope.declaring_function_params = false;

    ok &= analyze_stmt(&mut f.body, &mut scope, sink);
    drop(scope);
    drain_unused(scopes, sink);
    ok
}

fn analyze_var_decl(v: &mut VarDecl, scopes: &mut ScopeStack, sink: &mut Sink) -> bool {
    let mut ok = true;
    let declared_type = v.decl.borrow().data_type;

    if declared_type == DataType::Void {
        let name = v.decl.borrow().identifier.clone();
        sink.error(v.location, format!("variable or field '{name}' declared void"));
        ok = false;
    } else if !scopes.declare(v.decl.clone()) {
        let header = v.decl.borrow().header();
        sink.error(v.location, format!("'{header}' redeclared"));
        ok = false;
    }

    if scopes.declaring_function_params {
        v.decl.borrow_mut().initialized = true;
    }

    if let Some(init) = &mut v.initializer {
        scopes.initializing_variable = true;
        let init_ok = analyze_expr(init, true, scopes, sink);
        scopes.initializing_variable = false;
        ok &= init_ok;

        if init_ok {
            let init_type = init.attrs.data_type;
            if init_type == DataType::Void || init_type == DataType::FunctionPointer {
                sink.error(
                    init.location,
                    format!("invalid conversion from '{init_type}' to '{declared_type}'"),
                );
                ok = false;
            } else if declared_type.is_integer() {
                if let Some(value) = fold(init) {
                    v.decl.borrow_mut().const_value = Some(value);
                }
            }
        }
    }

    if scopes.declaring_function_params && v.initializer.is_some() {
        sink.error(
            v.initializer.as_ref().unwrap().location,
            "default function parameters are not allowed",
        );
        ok = false;
    } else if v.decl.borrow().is_const() && v.initializer.is_none() && !scopes.declaring_function_params {
        let name = v.decl.borrow().identifier.clone();
        sink.error(v.location, format!("uninitialized const '{name}'"));
        ok = false;
    }

    if v.initializer.is_some() {
        if let Some(switch) = scopes.enclosing_switch_mut() {
            switch.initialized_in_switch.push(v.decl.clone());
        }
    }

    ok
}

fn analyze_multi_var_decl(m: &mut MultiVarDecl, scopes: &mut ScopeStack, sink: &mut Sink) -> bool {
    let mut ok = true;
    for decl in &mut m.decls {
        ok &= analyze_var_decl(decl, scopes, sink);
    }
    ok
}

pub fn analyze_expr(expr: &mut Expression, value_used: bool, scopes: &mut ScopeStack, sink: &mut Sink) -> bool {
    let location = expr.location;

    match &mut expr.kind {
        ExprKind::Literal(lit) => {
            expr.attrs.data_type = match lit {
                Literal::Bool(_) => DataType::Bool,
                Literal::Char(_) => DataType::Char,
                Literal::Int(_) => DataType::Int,
                Literal::Float(_) => DataType::Float,
            };
            expr.attrs.constant = true;
            expr.attrs.used = value_used;
            true
        }

        ExprKind::Identifier { name } => {
            let Some(decl) = scopes.lookup(name) else {
                sink.error(location, format!("'{name}' was not declared in this scope"));
                return false;
            };

            let (data_type, is_function, is_const) = {
                let d = decl.borrow();
                let ty = if d.is_function() { DataType::FunctionPointer } else { d.data_type };
                (ty, d.is_function(), d.is_const())
            };

            expr.attrs.data_type = data_type;
            expr.attrs.constant = is_const;
            expr.attrs.reference = Some(decl.clone());
            expr.attrs.used = value_used;

            if value_used {
                decl.borrow_mut().used += 1;
                let initialized = decl.borrow().initialized;
                if !is_function && !initialized {
                    sink.error(location, format!("variable or field '{name}' used without being initialized"));
                    return false;
                }
            }
            true
        }

        ExprKind::Container(inner) => {
            if scopes.is_global_scope() && !scopes.initializing_variable {
                sink.error(location, "expression is not allowed in global scope");
                return false;
            }
            let ok = analyze_expr(inner, value_used, scopes, sink);
            expr.attrs = inner.attrs.clone();
            expr.attrs.used = value_used;
            ok
        }

        ExprKind::Assignment { lhs, rhs, .. } => {
            let rhs_ok = analyze_expr(rhs, true, scopes, sink);
            let lhs_ok = analyze_expr(lhs, false, scopes, sink);
            if !(rhs_ok & lhs_ok) {
                return false;
            }

            if lhs.attrs.data_type == DataType::FunctionPointer {
                let header = lhs
                    .attrs
                    .reference
                    .as_ref()
                    .map(|d| d.borrow().header())
                    .unwrap_or_default();
                sink.error(lhs.location, format!("assignment of function '{header}'"));
                return false;
            }
            if lhs.attrs.reference.is_none() {
                sink.error(lhs.location, "lvalue required as left operand of assignment");
                return false;
            }
            if lhs.attrs.constant {
                let header = lhs.attrs.reference.as_ref().unwrap().borrow().header();
                sink.error(lhs.location, format!("assignment of read-only variable '{header}'"));
                return false;
            }
            if rhs.attrs.data_type == DataType::Void || rhs.attrs.data_type == DataType::FunctionPointer {
                sink.error(
                    rhs.location,
                    format!(
                        "invalid conversion from '{}' to '{}'",
                        rhs.attrs.data_type, lhs.attrs.data_type
                    ),
                );
                return false;
            }

            expr.attrs.data_type = lhs.attrs.data_type;
            expr.attrs.reference = lhs.attrs.reference.clone();
            expr.attrs.constant = lhs.attrs.constant;
            expr.attrs.used = value_used;
            lhs.attrs.reference.as_ref().unwrap().borrow_mut().initialized = true;
            true
        }

        ExprKind::Binary { op, lhs, rhs } => {
            let op = *op;
            let lhs_ok = analyze_expr(lhs, value_used, scopes, sink);
            let rhs_ok = analyze_expr(rhs, value_used, scopes, sink);
            if !(lhs_ok & rhs_ok) {
                return false;
            }

            let lt = lhs.attrs.data_type;
            let rt = rhs.attrs.data_type;
            let invalid_operand = |t: DataType| t == DataType::Void || t == DataType::FunctionPointer;
            let bad_float = op.is_integer_only() && (lt == DataType::Float || rt == DataType::Float);
            if invalid_operand(lt) || invalid_operand(rt) || bad_float {
                sink.error(
                    location,
                    format!("invalid operands of types '{lt}' and '{rt}' to binary operator '{}'", op.symbol()),
                );
                return false;
            }

            expr.attrs.data_type = if op.is_logical() { DataType::Bool } else { promote(lt, rt) };
            expr.attrs.constant = lhs.attrs.constant && rhs.attrs.constant;
            expr.attrs.used = value_used;
            true
        }

        ExprKind::Unary { op, operand } => {
            let op = *op;
            let forced_used = value_used || op.requires_lvalue();
            if !analyze_expr(operand, forced_used, scopes, sink) {
                return false;
            }

            let ot = operand.attrs.data_type;
            let bad_float = op.is_bitwise() && ot == DataType::Float;
            if ot == DataType::Void || ot == DataType::FunctionPointer || bad_float {
                sink.error(location, format!("invalid operand of type '{ot}' to unary operator '{}'", op.symbol()));
                return false;
            }

            if op.requires_lvalue() {
                if operand.attrs.reference.is_none() {
                    sink.error(operand.location, "lvalue required as an operand of increment/decrement operator");
                    return false;
                }
                if operand.attrs.constant {
                    let header = operand.attrs.reference.as_ref().unwrap().borrow().header();
                    sink.error(
                        operand.location,
                        format!("increment/decrement of read-only variable '{header}'"),
                    );
                    return false;
                }
            }

            expr.attrs.data_type = if op.is_logical() { DataType::Bool } else { ot };
            expr.attrs.reference = match op {
                Operator::PreInc | Operator::PreDec => operand.attrs.reference.clone(),
                _ => None,
            };
            expr.attrs.constant = operand.attrs.constant;
            expr.attrs.used = value_used;
            true
        }

        ExprKind::Call { name, args } => {
            let callee = scopes.lookup(name);
            let mut ok = true;
            let mut params: Vec<DataType> = Vec::new();

            match &callee {
                None => {
                    sink.error(location, format!("'{name}' was not declared in this scope"));
                    ok = false;
                }
                Some(d) if !d.borrow().is_function() => {
                    sink.error(location, format!("'{name}' cannot be used as a function"));
                    ok = false;
                }
                Some(d) => {
                    let (return_type, p) = match &d.borrow().kind {
                        DeclKind::Function { return_type, params } => (*return_type, params.clone()),
                        DeclKind::Variable { .. } => unreachable!("checked is_function above"),
                    };
                    params = p;
                    if args.len() > params.len() {
                        sink.error(location, format!("too many arguments to function '{}'", d.borrow().header()));
                        ok = false;
                    } else if args.len() < params.len() {
                        sink.error(location, format!("too few arguments to function '{}'", d.borrow().header()));
                        ok = false;
                    } else {
                        expr.attrs.data_type = return_type;
                    }
                }
            }

            let mut args_ok = true;
            for arg in args.iter_mut() {
                args_ok &= analyze_expr(arg, true, scopes, sink);
            }
            ok &= args_ok;

            if let Some(d) = &callee {
                if args_ok && d.borrow().is_function() {
                    for (arg, param_ty) in args.iter().zip(params.iter()) {
                        if arg.attrs.data_type == DataType::Void || arg.attrs.data_type == DataType::FunctionPointer {
                            sink.error(
                                arg.location,
                                format!(
                                    "invalid conversion from '{}' to '{}' in function '{}' call",
                                    arg.attrs.data_type,
                                    param_ty,
                                    d.borrow().header()
                                ),
                            );
                            ok = false;
                        }
                    }
                }
            }

            expr.attrs.used = value_used;
            if ok {
                if let Some(d) = &callee {
                    d.borrow_mut().used += 1;
                }
            }
            ok
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{DeclRef, Declaration, ExprAttrs};
    use crate::location::Location;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn loc() -> Location {
        Location::new(1, 1, 1)
    }

    fn decl(kind: DeclKind, data_type: DataType, name: &str) -> DeclRef {
        Rc::new(RefCell::new(Declaration {
            kind,
            data_type,
            identifier: name.to_string(),
            alias: name.to_string(),
            used: 0,
            initialized: false,
            location: loc(),
            const_value: None,
        }))
    }

    fn var_decl(name: &str, data_type: DataType, initializer: Option<Expression>) -> VarDecl {
        VarDecl {
            decl: decl(DeclKind::Variable { is_const: false }, data_type, name),
            initializer,
            is_param: false,
            location: loc(),
        }
    }

    fn lit_int(v: i64) -> Expression {
        Expression {
            kind: ExprKind::Literal(Literal::Int(v)),
            location: loc(),
            attrs: ExprAttrs::default(),
        }
    }

    fn ident(name: &str) -> Expression {
        Expression::new(ExprKind::Identifier { name: name.to_string() }, loc())
    }

    fn sink() -> Sink {
        Sink::new("", true, Box::new(Vec::new()), Box::new(Vec::new()))
    }

    #[test]
    fn variable_declaration_void_is_rejected() {
        let mut scopes = ScopeStack::new();
        let mut s = sink();
        let mut v = var_decl("x", DataType::Void, None);
        assert!(!analyze_var_decl(&mut v, &mut scopes, &mut s));
        assert!(s.has_errors());
    }

    #[test]
    fn uninitialized_const_is_rejected() {
        let mut scopes = ScopeStack::new();
        let mut s = sink();
        let mut v = VarDecl {
            decl: decl(DeclKind::Variable { is_const: true }, DataType::Int, "x"),
            initializer: None,
            is_param: false,
            location: loc(),
        };
        assert!(!analyze_var_decl(&mut v, &mut scopes, &mut s));
    }

    #[test]
    fn declaring_function_params_marks_initialized_and_allows_no_initializer() {
        let mut scopes = ScopeStack::new();
        let mut s = sink();
        scopes.declaring_function_params = true;
        let mut v = var_decl("x", DataType::Int, None);
        assert!(analyze_var_decl(&mut v, &mut scopes, &mut s));
        assert!(v.decl.borrow().initialized);
    }

    #[test]
    fn identifier_use_before_initialization_is_an_error() {
        let mut scopes = ScopeStack::new();
        let mut s = sink();
        let mut v = var_decl("x", DataType::Int, None);
        analyze_var_decl(&mut v, &mut scopes, &mut s);

        let mut e = ident("x");
        assert!(!analyze_expr(&mut e, true, &mut scopes, &mut s));
        assert!(s.has_errors());
    }

    #[test]
    fn break_outside_loop_or_switch_is_rejected() {
        let mut scopes = ScopeStack::new();
        let mut s = sink();
        let mut stmt = Statement::Break(loc());
        assert!(!analyze_stmt(&mut stmt, &mut scopes, &mut s));
    }

    #[test]
    fn assignment_to_const_is_rejected() {
        let mut scopes = ScopeStack::new();
        let mut s = sink();
        let mut v = VarDecl {
            decl: decl(DeclKind::Variable { is_const: true }, DataType::Int, "x"),
            initializer: Some(lit_int(1)),
            is_param: false,
            location: loc(),
        };
        analyze_var_decl(&mut v, &mut scopes, &mut s);

        let mut assign = Expression::new(
            ExprKind::Assignment {
                op: Operator::Assign,
                lhs: Box::new(ident("x")),
                rhs: Box::new(lit_int(2)),
            },
            loc(),
        );
        assert!(!analyze_expr(&mut assign, false, &mut scopes, &mut s));
    }

    #[test]
    fn binary_addition_promotes_to_wider_operand() {
        let mut scopes = ScopeStack::new();
        let mut s = sink();
        let mut e = Expression::new(
            ExprKind::Binary {
                op: Operator::Add,
                lhs: Box::new(lit_int(1)),
                rhs: Box::new(Expression::new(ExprKind::Literal(Literal::Float(2.0)), loc())),
            },
            loc(),
        );
        assert!(analyze_expr(&mut e, true, &mut scopes, &mut s));
        assert_eq!(e.attrs.data_type, DataType::Float);
        assert!(e.attrs.constant);
    }

    #[test]
    fn duplicate_case_value_reports_error_and_note() {
        let mut scopes = ScopeStack::new();
        let mut s = sink();
        let mut switch_scope = scopes.push(ScopeKind::Switch);

        let mut first = Statement::CaseLabel(CaseLabelStmt {
            expr: Some(lit_int(1)),
            location: Location::new(1, 1, 1),
        });
        assert!(analyze_stmt(&mut first, &mut switch_scope, &mut s));

        let mut second = Statement::CaseLabel(CaseLabelStmt {
            expr: Some(lit_int(1)),
            location: Location::new(2, 1, 1),
        });
        assert!(!analyze_stmt(&mut second, &mut switch_scope, &mut s));
        assert_eq!(s.error_count(), 1);
    }
}
