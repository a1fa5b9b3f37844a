//! Recursive-descent, operator-precedence parser (component J).
//!
//! Builds the tagged-variant tree of `ast.rs` directly from the token
//! stream `lexer.rs` produces. Each production returns `Result<_, String>`,
//! same shape as the teacher's `parser.rs`; a production failure is turned
//! into a single `Statement::Error` at the call site that was trying to
//! parse a top-level item or a statement, and parsing resynchronizes by
//! skipping to the next statement boundary rather than aborting outright.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{
    Block, CaseLabelStmt, DeclKind, Declaration, DoWhileStmt, Expression, ExprKind, ForStmt,
    FunctionDecl, IfStmt, Literal, MultiVarDecl, Program, Statement, SwitchStmt, VarDecl,
};
use crate::lexer::{lex, Token, TokenKind};
use crate::location::Location;
use crate::types::{DataType, Operator};

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

type PResult<T> = Result<T, String>;

impl Parser {
    pub fn new(source: &str) -> Self {
        Parser { tokens: lex(source), pos: 0 }
    }

    fn peek(&self) -> &TokenKind {
        &self.tokens[self.pos].kind
    }

    fn location(&self) -> Location {
        self.tokens[self.pos].location
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.peek() == kind
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind, what: &str) -> PResult<Location> {
        let loc = self.location();
        if self.eat(kind) {
            Ok(loc)
        } else {
            Err(format!("expected {what} before '{}'", describe(self.peek())))
        }
    }

    fn expect_ident(&mut self) -> PResult<(String, Location)> {
        let loc = self.location();
        match self.peek().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok((name, loc))
            }
            other => Err(format!("expected identifier before '{}'", describe(&other))),
        }
    }

    fn at_type_keyword(&self) -> bool {
        matches!(
            self.peek(),
            TokenKind::Void | TokenKind::Bool | TokenKind::Char | TokenKind::Int | TokenKind::Float
        )
    }

    fn parse_type(&mut self) -> PResult<DataType> {
        let ty = match self.peek() {
            TokenKind::Void => DataType::Void,
            TokenKind::Bool => DataType::Bool,
            TokenKind::Char => DataType::Char,
            TokenKind::Int => DataType::Int,
            TokenKind::Float => DataType::Float,
            other => return Err(format!("expected a type name, found '{}'", describe(other))),
        };
        self.advance();
        Ok(ty)
    }

    /// Skips tokens until a statement boundary (`;` or `}`), so one parse
    /// failure doesn't cascade into a wall of follow-on errors.
    fn resync(&mut self) {
        loop {
            match self.peek() {
                TokenKind::Semicolon => {
                    self.advance();
                    return;
                }
                TokenKind::RBrace | TokenKind::Eof => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    pub fn parse_program(&mut self) -> Program {
        let mut items = Vec::new();
        while !matches!(self.peek(), TokenKind::Eof) {
            match self.parse_top_level_item() {
                Ok(item) => items.push(item),
                Err(message) => {
                    let location = self.location();
                    items.push(Statement::Error { message, location });
                    self.resync();
                }
            }
        }
        Program { items }
    }

    fn parse_top_level_item(&mut self) -> PResult<Statement> {
        let location = self.location();
        let is_const = self.eat(&TokenKind::Const);
        if !self.at_type_keyword() {
            return Err(format!("expected a declaration, found '{}'", describe(self.peek())));
        }
        let ty = self.parse_type()?;
        let (name, _) = self.expect_ident()?;

        if !is_const && self.check(&TokenKind::LParen) {
            self.parse_function_rest(ty, name, location)
        } else {
            let first = self.parse_var_decl_rest(ty, is_const, name, location)?;
            let stmt = self.parse_multi_var_decl_rest(first, location)?;
            self.expect(&TokenKind::Semicolon, "';'")?;
            Ok(stmt)
        }
    }

    fn parse_function_rest(&mut self, return_type: DataType, name: String, location: Location) -> PResult<Statement> {
        self.advance(); // '('
        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                let param_loc = self.location();
                let is_const = self.eat(&TokenKind::Const);
                let param_ty = self.parse_type()?;
                let (param_name, _) = self.expect_ident()?;
                let decl = Rc::new(RefCell::new(Declaration {
                    kind: DeclKind::Variable { is_const },
                    data_type: param_ty,
                    identifier: param_name,
                    alias: String::new(),
                    used: 0,
                    initialized: false,
                    location: param_loc,
                    const_value: None,
                }));
                params.push(VarDecl { decl, initializer: None, is_param: true, location: param_loc });
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen, "')'")?;

        let param_types = params.iter().map(|p| p.decl.borrow().data_type).collect();
        let decl = Rc::new(RefCell::new(Declaration {
            kind: DeclKind::Function { return_type, params: param_types },
            data_type: DataType::FunctionPointer,
            identifier: name,
            alias: String::new(),
            used: 0,
            initialized: true,
            location,
            const_value: None,
        }));

        let body = Box::new(self.parse_block()?);
        Ok(Statement::Function(FunctionDecl { decl, return_type, params, body, location }))
    }

    fn parse_var_decl_rest(&mut self, ty: DataType, is_const: bool, name: String, location: Location) -> PResult<VarDecl> {
        let initializer = if self.eat(&TokenKind::Assign) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        let decl = Rc::new(RefCell::new(Declaration {
            kind: DeclKind::Variable { is_const },
            data_type: ty,
            identifier: name,
            alias: String::new(),
            used: 0,
            initialized: false,
            location,
            const_value: None,
        }));
        Ok(VarDecl { decl, initializer, is_param: false, location })
    }

    /// Consumes any `, IDENT ("=" expr)?` tails following the first
    /// declarator, folding single declarations into `Statement::VarDecl`
    /// and multi-declarator lists into `Statement::MultiVarDecl`.
    fn parse_multi_var_decl_rest(&mut self, first: VarDecl, location: Location) -> PResult<Statement> {
        if !self.check(&TokenKind::Comma) {
            return Ok(Statement::VarDecl(first));
        }
        let ty = first.decl.borrow().data_type;
        let is_const = first.decl.borrow().is_const();
        let mut decls = vec![first];
        while self.eat(&TokenKind::Comma) {
            let decl_loc = self.location();
            let (name, _) = self.expect_ident()?;
            decls.push(self.parse_var_decl_rest(ty, is_const, name, decl_loc)?);
        }
        Ok(Statement::MultiVarDecl(MultiVarDecl { decls, location }))
    }

    fn parse_block(&mut self) -> PResult<Statement> {
        let location = self.expect(&TokenKind::LBrace, "'{'")?;
        let mut statements = Vec::new();
        while !self.check(&TokenKind::RBrace) && !matches!(self.peek(), TokenKind::Eof) {
            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(message) => {
                    let err_loc = self.location();
                    statements.push(Statement::Error { message, location: err_loc });
                    self.resync();
                }
            }
        }
        self.expect(&TokenKind::RBrace, "'}'")?;
        Ok(Statement::Block(Block { statements, location }))
    }

    fn parse_statement(&mut self) -> PResult<Statement> {
        let location = self.location();
        match self.peek() {
            TokenKind::LBrace => self.parse_block(),
            TokenKind::If => self.parse_if(),
            TokenKind::Switch => self.parse_switch(),
            TokenKind::Case | TokenKind::Default => self.parse_case_label(),
            TokenKind::While => self.parse_while(),
            TokenKind::Do => self.parse_do_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Break => {
                self.advance();
                self.expect(&TokenKind::Semicolon, "';'")?;
                Ok(Statement::Break(location))
            }
            TokenKind::Continue => {
                self.advance();
                self.expect(&TokenKind::Semicolon, "';'")?;
                Ok(Statement::Continue(location))
            }
            TokenKind::Return => {
                self.advance();
                let expr = if self.check(&TokenKind::Semicolon) {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                self.expect(&TokenKind::Semicolon, "';'")?;
                Ok(Statement::Return { expr, location })
            }
            TokenKind::Const => self.parse_local_var_decl(),
            _ if self.at_type_keyword() => self.parse_local_var_decl(),
            _ => {
                let expr = self.parse_expr()?;
                self.expect(&TokenKind::Semicolon, "';'")?;
                Ok(Statement::Expr(expr))
            }
        }
    }

    fn parse_local_var_decl(&mut self) -> PResult<Statement> {
        let location = self.location();
        let is_const = self.eat(&TokenKind::Const);
        let ty = self.parse_type()?;
        let (name, _) = self.expect_ident()?;
        let first = self.parse_var_decl_rest(ty, is_const, name, location)?;
        let stmt = self.parse_multi_var_decl_rest(first, location)?;
        self.expect(&TokenKind::Semicolon, "';'")?;
        Ok(stmt)
    }

    fn parse_if(&mut self) -> PResult<Statement> {
        let location = self.location();
        self.advance();
        self.expect(&TokenKind::LParen, "'('")?;
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::RParen, "')'")?;
        let then_branch = Box::new(self.parse_statement()?);
        let else_branch = if self.eat(&TokenKind::Else) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };
        Ok(Statement::If(IfStmt { cond, then_branch, else_branch, location }))
    }

    fn parse_switch(&mut self) -> PResult<Statement> {
        let location = self.location();
        self.advance();
        self.expect(&TokenKind::LParen, "'('")?;
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::RParen, "')'")?;
        let body = Box::new(self.parse_block()?);
        Ok(Statement::Switch(SwitchStmt { cond, body, location }))
    }

    fn parse_case_label(&mut self) -> PResult<Statement> {
        let location = self.location();
        let expr = if self.eat(&TokenKind::Default) {
            None
        } else {
            self.advance(); // 'case'
            Some(self.parse_expr()?)
        };
        self.expect(&TokenKind::Colon, "':'")?;
        Ok(Statement::CaseLabel(CaseLabelStmt { expr, location }))
    }

    fn parse_while(&mut self) -> PResult<Statement> {
        let location = self.location();
        self.advance();
        self.expect(&TokenKind::LParen, "'('")?;
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::RParen, "')'")?;
        let body = Box::new(self.parse_statement()?);
        Ok(Statement::While(crate::ast::WhileStmt { cond, body, location }))
    }

    fn parse_do_while(&mut self) -> PResult<Statement> {
        let location = self.location();
        self.advance();
        let body = Box::new(self.parse_statement()?);
        self.expect(&TokenKind::While, "'while'")?;
        self.expect(&TokenKind::LParen, "'('")?;
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::RParen, "')'")?;
        self.expect(&TokenKind::Semicolon, "';'")?;
        Ok(Statement::DoWhile(DoWhileStmt { cond, body, location }))
    }

    fn parse_for(&mut self) -> PResult<Statement> {
        let location = self.location();
        self.advance();
        self.expect(&TokenKind::LParen, "'('")?;

        let init = if self.check(&TokenKind::Semicolon) {
            self.advance();
            None
        } else if self.at_type_keyword() || self.check(&TokenKind::Const) {
            Some(Box::new(self.parse_local_var_decl()?))
        } else {
            let expr = self.parse_expr()?;
            self.expect(&TokenKind::Semicolon, "';'")?;
            Some(Box::new(Statement::Expr(expr)))
        };

        let cond = if self.check(&TokenKind::Semicolon) { None } else { Some(self.parse_expr()?) };
        self.expect(&TokenKind::Semicolon, "';'")?;

        let inc = if self.check(&TokenKind::RParen) { None } else { Some(self.parse_expr()?) };
        self.expect(&TokenKind::RParen, "')'")?;

        let body = Box::new(self.parse_statement()?);
        Ok(Statement::For(ForStmt { init, cond, inc, body, location }))
    }

    fn parse_expr(&mut self) -> PResult<Expression> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> PResult<Expression> {
        let location = self.location();
        let lhs = self.parse_logical_or()?;
        if self.eat(&TokenKind::Assign) {
            let rhs = self.parse_assignment()?;
            Ok(Expression::new(
                ExprKind::Assignment { op: Operator::Assign, lhs: Box::new(lhs), rhs: Box::new(rhs) },
                location,
            ))
        } else {
            Ok(lhs)
        }
    }

    fn parse_logical_or(&mut self) -> PResult<Expression> {
        self.parse_left_assoc(Self::parse_logical_and, &[(TokenKind::PipePipe, Operator::LogicalOr)])
    }

    fn parse_logical_and(&mut self) -> PResult<Expression> {
        self.parse_left_assoc(Self::parse_bit_or, &[(TokenKind::AmpAmp, Operator::LogicalAnd)])
    }

    fn parse_bit_or(&mut self) -> PResult<Expression> {
        self.parse_left_assoc(Self::parse_bit_xor, &[(TokenKind::Pipe, Operator::BitOr)])
    }

    fn parse_bit_xor(&mut self) -> PResult<Expression> {
        self.parse_left_assoc(Self::parse_bit_and, &[(TokenKind::Caret, Operator::BitXor)])
    }

    fn parse_bit_and(&mut self) -> PResult<Expression> {
        self.parse_left_assoc(Self::parse_equality, &[(TokenKind::Amp, Operator::BitAnd)])
    }

    fn parse_equality(&mut self) -> PResult<Expression> {
        self.parse_left_assoc(
            Self::parse_relational,
            &[(TokenKind::EqEq, Operator::Equal), (TokenKind::NotEq, Operator::NotEqual)],
        )
    }

    fn parse_relational(&mut self) -> PResult<Expression> {
        self.parse_left_assoc(
            Self::parse_shift,
            &[
                (TokenKind::Less, Operator::Less),
                (TokenKind::LessEq, Operator::LessEqual),
                (TokenKind::Greater, Operator::Greater),
                (TokenKind::GreaterEq, Operator::GreaterEqual),
            ],
        )
    }

    fn parse_shift(&mut self) -> PResult<Expression> {
        self.parse_left_assoc(
            Self::parse_additive,
            &[(TokenKind::Shl, Operator::Shl), (TokenKind::Shr, Operator::Shr)],
        )
    }

    fn parse_additive(&mut self) -> PResult<Expression> {
        self.parse_left_assoc(
            Self::parse_multiplicative,
            &[(TokenKind::Plus, Operator::Add), (TokenKind::Minus, Operator::Sub)],
        )
    }

    fn parse_multiplicative(&mut self) -> PResult<Expression> {
        self.parse_left_assoc(
            Self::parse_unary,
            &[
                (TokenKind::Star, Operator::Mul),
                (TokenKind::Slash, Operator::Div),
                (TokenKind::Percent, Operator::Mod),
            ],
        )
    }

    /// Generic left-associative binary level: parses one `next`, then loops
    /// consuming any operator in `ops` followed by another `next`.
    fn parse_left_assoc(
        &mut self,
        next: fn(&mut Self) -> PResult<Expression>,
        ops: &[(TokenKind, Operator)],
    ) -> PResult<Expression> {
        let mut lhs = next(self)?;
        loop {
            let Some((_, op)) = ops.iter().find(|(kind, _)| self.check(kind)) else {
                break;
            };
            let location = self.location();
            self.advance();
            let rhs = next(self)?;
            lhs = Expression::new(
                ExprKind::Binary { op: *op, lhs: Box::new(lhs), rhs: Box::new(rhs) },
                location,
            );
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> PResult<Expression> {
        let location = self.location();
        let op = match self.peek() {
            TokenKind::Plus => Some(Operator::UnaryPlus),
            TokenKind::Minus => Some(Operator::UnaryMinus),
            TokenKind::Bang => Some(Operator::LogicalNot),
            TokenKind::Tilde => Some(Operator::BitNot),
            TokenKind::PlusPlus => Some(Operator::PreInc),
            TokenKind::MinusMinus => Some(Operator::PreDec),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let operand = self.parse_unary()?;
            return Ok(Expression::new(ExprKind::Unary { op, operand: Box::new(operand) }, location));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> PResult<Expression> {
        let mut expr = self.parse_primary()?;
        loop {
            let location = self.location();
            let op = match self.peek() {
                TokenKind::PlusPlus => Operator::PostInc,
                TokenKind::MinusMinus => Operator::PostDec,
                _ => break,
            };
            self.advance();
            expr = Expression::new(ExprKind::Unary { op, operand: Box::new(expr) }, location);
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> PResult<Expression> {
        let location = self.location();
        match self.peek().clone() {
            TokenKind::IntLit(v) => {
                self.advance();
                Ok(Expression::new(ExprKind::Literal(Literal::Int(v)), location))
            }
            TokenKind::FloatLit(v) => {
                self.advance();
                Ok(Expression::new(ExprKind::Literal(Literal::Float(v)), location))
            }
            TokenKind::CharLit(c) => {
                self.advance();
                Ok(Expression::new(ExprKind::Literal(Literal::Char(c)), location))
            }
            TokenKind::BoolLit(b) => {
                self.advance();
                Ok(Expression::new(ExprKind::Literal(Literal::Bool(b)), location))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(&TokenKind::RParen, "')'")?;
                Ok(Expression::new(ExprKind::Container(Box::new(inner)), location))
            }
            TokenKind::Ident(name) => {
                self.advance();
                if self.eat(&TokenKind::LParen) {
                    let mut args = Vec::new();
                    if !self.check(&TokenKind::RParen) {
                        loop {
                            args.push(self.parse_expr()?);
                            if !self.eat(&TokenKind::Comma) {
                                break;
                            }
                        }
                    }
                    self.expect(&TokenKind::RParen, "')'")?;
                    Ok(Expression::new(ExprKind::Call { name, args }, location))
                } else {
                    Ok(Expression::new(ExprKind::Identifier { name }, location))
                }
            }
            other => Err(format!("expected an expression, found '{}'", describe(&other))),
        }
    }
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Ident(name) => name.clone(),
        TokenKind::IntLit(v) => v.to_string(),
        TokenKind::FloatLit(v) => v.to_string(),
        TokenKind::CharLit(c) => c.to_string(),
        TokenKind::BoolLit(b) => b.to_string(),
        TokenKind::Error(message) => message.clone(),
        TokenKind::Eof => "end of file".to_string(),
        _ => format!("{kind:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Program {
        Parser::new(source).parse_program()
    }

    #[test]
    fn parses_a_function_with_a_return() {
        let program = parse("int main() { return 0; }");
        assert_eq!(program.items.len(), 1);
        assert!(matches!(program.items[0], Statement::Function(_)));
    }

    #[test]
    fn parses_a_global_variable_declaration() {
        let program = parse("int x = 1;");
        assert!(matches!(program.items[0], Statement::VarDecl(_)));
    }

    #[test]
    fn parses_multi_declarator_lists() {
        let program = parse("int x = 1, y, z = 3;");
        match &program.items[0] {
            Statement::MultiVarDecl(m) => assert_eq!(m.decls.len(), 3),
            other => panic!("expected MultiVarDecl, got {other:?}"),
        }
    }

    #[test]
    fn assignment_is_right_associative() {
        let program = parse("int main() { int a; int b; a = b = 1; }");
        let Statement::Function(f) = &program.items[0] else { panic!() };
        let Statement::Block(block) = f.body.as_ref() else { panic!() };
        let Statement::Expr(expr) = &block.statements[2] else { panic!() };
        let ExprKind::Assignment { rhs, .. } = &expr.kind else { panic!() };
        assert!(matches!(rhs.kind, ExprKind::Assignment { .. }));
    }

    #[test]
    fn binary_precedence_binds_multiplication_tighter_than_addition() {
        let program = parse("int x = 1 + 2 * 3;");
        let Statement::VarDecl(v) = &program.items[0] else { panic!() };
        let ExprKind::Binary { op, rhs, .. } = &v.initializer.as_ref().unwrap().kind else { panic!() };
        assert_eq!(*op, Operator::Add);
        assert!(matches!(rhs.kind, ExprKind::Binary { op: Operator::Mul, .. }));
    }

    #[test]
    fn switch_body_collects_case_labels_and_statements() {
        let program = parse(
            "int main() { int x = 0; switch (x) { case 1: break; default: break; } }",
        );
        let Statement::Function(f) = &program.items[0] else { panic!() };
        let Statement::Block(block) = f.body.as_ref() else { panic!() };
        let Statement::Switch(s) = &block.statements[1] else { panic!() };
        let Statement::Block(body) = s.body.as_ref() else { panic!() };
        assert_eq!(body.statements.len(), 4);
    }

    #[test]
    fn unclosed_brace_produces_an_error_node_without_panicking() {
        let program = parse("int main() {");
        assert!(program.items.iter().any(|s| matches!(s, Statement::Error { .. })));
    }
}
