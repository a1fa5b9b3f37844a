//! The parse tree (component B).
//!
//! A tagged-variant representation, not a polymorphic class hierarchy: each
//! node kind is its own variant and operations dispatch on the tag rather
//! than on a vtable. Declarations are shared between the tree (which owns
//! them) and the scope stack (which only borrows them) via `Rc<RefCell<_>>`
//! — the tree outlives every scope-stack entry, so this can never dangle.

use std::cell::RefCell;
use std::rc::Rc;

use crate::location::Location;
use crate::types::{DataType, Operator};

/// A declaration's mutable, analysis-time state — the part of a variable or
/// function declaration that the scope stack and expressions that reference
/// it need to see and update.
#[derive(Debug)]
pub struct Declaration {
    pub kind: DeclKind,
    /// The variable's type, or `DataType::FunctionPointer` for a function.
    pub data_type: DataType,
    pub identifier: String,
    /// Scope-disambiguated alias; `identifier` for the first declaration,
    /// `identifier@N` for the N-th shadow. Assigned by `ScopeStack::declare`.
    pub alias: String,
    /// Read-count. Declarations (not expressions) track this as a count,
    /// not a bool, because the symbol-table dump wants the number.
    pub used: u32,
    pub initialized: bool,
    pub location: Location,
    /// Folded initializer value, populated by the analyzer for `const`
    /// variables whose initializer is itself a constant expression. Lets
    /// `folder.rs` resolve a `const` identifier without re-walking the tree.
    pub const_value: Option<i64>,
}

#[derive(Debug, Clone)]
pub enum DeclKind {
    Variable { is_const: bool },
    Function { return_type: DataType, params: Vec<DataType> },
}

impl Declaration {
    pub fn is_const(&self) -> bool {
        matches!(self.kind, DeclKind::Variable { is_const: true })
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, DeclKind::Function { .. })
    }

    /// `"<type> <name>"` / `"<return-type> <name>(<param-types>)"`, used in
    /// diagnostics such as `"'<header>' redeclared"`.
    pub fn header(&self) -> String {
        match &self.kind {
            DeclKind::Variable { .. } => format!("{} {}", self.data_type, self.identifier),
            DeclKind::Function { return_type, params } => {
                let params = params
                    .iter()
                    .map(|t| t.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{} {}({})", return_type, self.identifier, params)
            }
        }
    }
}

pub type DeclRef = Rc<RefCell<Declaration>>;

/// The four attributes an expression accumulates during analysis.
#[derive(Debug, Clone)]
pub struct ExprAttrs {
    pub data_type: DataType,
    pub reference: Option<DeclRef>,
    pub constant: bool,
    pub used: bool,
}

impl Default for ExprAttrs {
    fn default() -> Self {
        ExprAttrs {
            data_type: DataType::Error,
            reference: None,
            constant: false,
            used: false,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Literal {
    Bool(bool),
    Char(char),
    Int(i64),
    Float(f64),
}

#[derive(Debug)]
pub struct Expression {
    pub kind: ExprKind,
    pub location: Location,
    pub attrs: ExprAttrs,
}

#[derive(Debug)]
pub enum ExprKind {
    Literal(Literal),
    Identifier { name: String },
    /// Parenthesization: `( inner )`.
    Container(Box<Expression>),
    Assignment { op: Operator, lhs: Box<Expression>, rhs: Box<Expression> },
    Binary { op: Operator, lhs: Box<Expression>, rhs: Box<Expression> },
    Unary { op: Operator, operand: Box<Expression> },
    Call { name: String, args: Vec<Expression> },
}

impl Expression {
    pub fn new(kind: ExprKind, location: Location) -> Self {
        Expression {
            kind,
            location,
            attrs: ExprAttrs::default(),
        }
    }
}

/// A single variable declaration. Shared with the scope stack through
/// `decl`; `initializer` is owned outright since nothing else references it.
#[derive(Debug)]
pub struct VarDecl {
    pub decl: DeclRef,
    pub initializer: Option<Expression>,
    /// True when this declaration is a function parameter (affects both
    /// "uninitialized const" exemption and emission — parameters are always
    /// popped off the argument-passing convention, never just declared).
    pub is_param: bool,
    pub location: Location,
}

#[derive(Debug)]
pub struct MultiVarDecl {
    pub decls: Vec<VarDecl>,
    pub location: Location,
}

#[derive(Debug)]
pub struct FunctionDecl {
    pub decl: DeclRef,
    pub return_type: DataType,
    pub params: Vec<VarDecl>,
    pub body: Box<Statement>,
    pub location: Location,
}

#[derive(Debug)]
pub struct IfStmt {
    pub cond: Expression,
    pub then_branch: Box<Statement>,
    pub else_branch: Option<Box<Statement>>,
    pub location: Location,
}

#[derive(Debug)]
pub struct WhileStmt {
    pub cond: Expression,
    pub body: Box<Statement>,
    pub location: Location,
}

#[derive(Debug)]
pub struct DoWhileStmt {
    pub cond: Expression,
    pub body: Box<Statement>,
    pub location: Location,
}

#[derive(Debug)]
pub struct ForStmt {
    pub init: Option<Box<Statement>>,
    pub cond: Option<Expression>,
    pub inc: Option<Expression>,
    pub body: Box<Statement>,
    pub location: Location,
}

/// A bare `case <expr>:` / `default:` marker. Per spec.md §4.E, case labels
/// do not own the statements they guard — they are markers inline in the
/// enclosing switch body's statement sequence; `analyzer.rs`/`emitter.rs`
/// both flatten that sequence into case-blocks (`case_blocks`) on demand.
#[derive(Debug)]
pub struct CaseLabelStmt {
    /// `None` for `default:`.
    pub expr: Option<Expression>,
    pub location: Location,
}

#[derive(Debug)]
pub struct SwitchStmt {
    pub cond: Expression,
    pub body: Box<Statement>,
    pub location: Location,
}

#[derive(Debug)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub location: Location,
}

#[derive(Debug)]
pub enum Statement {
    Block(Block),
    If(IfStmt),
    Switch(SwitchStmt),
    CaseLabel(CaseLabelStmt),
    While(WhileStmt),
    DoWhile(DoWhileStmt),
    For(ForStmt),
    Break(Location),
    Continue(Location),
    Return { expr: Option<Expression>, location: Location },
    Function(FunctionDecl),
    VarDecl(VarDecl),
    MultiVarDecl(MultiVarDecl),
    /// An expression used as a statement (e.g. `x = x + 1;`, `f();`).
    Expr(Expression),
    /// A parser-produced error: printed once, through the same sink, and
    /// never recursed into (spec.md §7).
    Error { message: String, location: Location },
}

impl Statement {
    pub fn location(&self) -> Location {
        match self {
            Statement::Block(b) => b.location,
            Statement::If(s) => s.location,
            Statement::Switch(s) => s.location,
            Statement::CaseLabel(s) => s.location,
            Statement::While(s) => s.location,
            Statement::DoWhile(s) => s.location,
            Statement::For(s) => s.location,
            Statement::Break(loc) | Statement::Continue(loc) => *loc,
            Statement::Return { location, .. } => *location,
            Statement::Function(f) => f.location,
            Statement::VarDecl(v) => v.location,
            Statement::MultiVarDecl(m) => m.location,
            Statement::Expr(e) => e.location,
            Statement::Error { location, .. } => *location,
        }
    }
}

/// The root node returned by the parser: a flat sequence of top-level
/// declarations (functions and global variables). Deliberately not a
/// `Statement::Block` — the global-scope-rejection rule on ordinary blocks
/// must not apply to the program root itself.
#[derive(Debug)]
pub struct Program {
    pub items: Vec<Statement>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(kind: DeclKind, data_type: DataType, name: &str) -> DeclRef {
        Rc::new(RefCell::new(Declaration {
            kind,
            data_type,
            identifier: name.to_string(),
            alias: name.to_string(),
            used: 0,
            initialized: false,
            location: Location::synthetic(),
            const_value: None,
        }))
    }

    #[test]
    fn variable_header_is_type_then_name() {
        let d = decl(DeclKind::Variable { is_const: false }, DataType::Int, "x");
        assert_eq!(d.borrow().header(), "int x");
    }

    #[test]
    fn function_header_includes_param_types() {
        let d = decl(
            DeclKind::Function {
                return_type: DataType::Void,
                params: vec![DataType::Int, DataType::Float],
            },
            DataType::FunctionPointer,
            "f",
        );
        assert_eq!(d.borrow().header(), "void f(int, float)");
    }

    #[test]
    fn const_predicate_only_true_for_const_variables() {
        let v = decl(DeclKind::Variable { is_const: true }, DataType::Int, "x");
        assert!(v.borrow().is_const());
        let f = decl(
            DeclKind::Function {
                return_type: DataType::Int,
                params: vec![],
            },
            DataType::FunctionPointer,
            "f",
        );
        assert!(!f.borrow().is_const());
        assert!(f.borrow().is_function());
    }
}
