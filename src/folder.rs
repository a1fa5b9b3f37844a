//! Constant folder (component F).
//!
//! Evaluates the integer value of a constant expression, used for case-label
//! values and for initializing `const` declarations that the emitter wants
//! to fold directly into the quadruple stream. Returns `None` on anything
//! that isn't a compile-time integer constant — per spec.md's redesign of
//! the original's "-1 sentinel" scheme, `None` can never be confused with a
//! legitimately folded `-1`.
//!
//! Identifiers are resolved through `expr.attrs.reference`, the declaration
//! the analyzer already bound during `analyze_expr`, rather than a fresh
//! `ScopeStack` lookup — `fold` runs both during analysis (scope still open)
//! and again during emission (every scope long since popped), and only the
//! cached reference is valid in both places.

use crate::ast::{ExprKind, Expression, Literal};
use crate::types::Operator;

pub fn fold(expr: &Expression) -> Option<i64> {
    match &expr.kind {
        ExprKind::Literal(Literal::Int(v)) => Some(*v),
        ExprKind::Literal(Literal::Char(c)) => Some(*c as i64),
        ExprKind::Literal(Literal::Bool(b)) => Some(*b as i64),
        ExprKind::Literal(Literal::Float(_)) => None,

        ExprKind::Identifier { .. } => {
            let decl = expr.attrs.reference.as_ref()?;
            let decl = decl.borrow();
            if !decl.is_const() {
                return None;
            }
            decl.const_value
        }

        ExprKind::Container(inner) => fold(inner),

        ExprKind::Unary { op, operand } => {
            let v = fold(operand)?;
            match op {
                Operator::UnaryPlus => Some(v),
                Operator::UnaryMinus => Some((v as i32).wrapping_neg() as i64),
                Operator::BitNot => Some(!(v as i32) as i64),
                Operator::LogicalNot => Some((v == 0) as i64),
                _ => None,
            }
        }

        ExprKind::Binary { op, lhs, rhs } => {
            let a = fold(lhs)? as i32;
            let b = fold(rhs)? as i32;
            let result = match op {
                Operator::Add => a.wrapping_add(b),
                Operator::Sub => a.wrapping_sub(b),
                Operator::Mul => a.wrapping_mul(b),
                Operator::Div if b != 0 => a.wrapping_div(b),
                Operator::Mod if b != 0 => a.wrapping_rem(b),
                Operator::BitAnd => a & b,
                Operator::BitOr => a | b,
                Operator::BitXor => a ^ b,
                Operator::Shl => a.wrapping_shl(b as u32),
                Operator::Shr => a.wrapping_shr(b as u32),
                Operator::LogicalAnd => ((a != 0) && (b != 0)) as i32,
                Operator::LogicalOr => ((a != 0) || (b != 0)) as i32,
                Operator::Greater => (a > b) as i32,
                Operator::GreaterEqual => (a >= b) as i32,
                Operator::Less => (a < b) as i32,
                Operator::LessEqual => (a <= b) as i32,
                Operator::Equal => (a == b) as i32,
                Operator::NotEqual => (a != b) as i32,
                _ => return None,
            };
            Some(result as i64)
        }

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Location;

    fn lit_int(v: i64) -> Expression {
        Expression::new(ExprKind::Literal(Literal::Int(v)), Location::synthetic())
    }

    fn binary(op: Operator, lhs: Expression, rhs: Expression) -> Expression {
        Expression::new(
            ExprKind::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            Location::synthetic(),
        )
    }

    #[test]
    fn folds_simple_arithmetic() {
        let e = binary(Operator::Add, lit_int(2), lit_int(3));
        assert_eq!(fold(&e), Some(5));
    }

    #[test]
    fn division_by_zero_folds_to_none() {
        let e = binary(Operator::Div, lit_int(1), lit_int(0));
        assert_eq!(fold(&e), None);
    }

    #[test]
    fn float_literals_never_fold() {
        let e = Expression::new(ExprKind::Literal(Literal::Float(1.5)), Location::synthetic());
        assert_eq!(fold(&e), None);
    }

    #[test]
    fn bool_and_char_literals_fold_to_their_ordinal_value() {
        let b = Expression::new(ExprKind::Literal(Literal::Bool(true)), Location::synthetic());
        assert_eq!(fold(&b), Some(1));
        let c = Expression::new(ExprKind::Literal(Literal::Char('A')), Location::synthetic());
        assert_eq!(fold(&c), Some(65));
    }

    #[test]
    fn arithmetic_wraps_at_32_bits() {
        let e = binary(Operator::Add, lit_int(i32::MAX as i64), lit_int(1));
        assert_eq!(fold(&e), Some(i32::MIN as i64));
    }

    #[test]
    fn identifier_folds_through_the_cached_reference_not_a_scope_lookup() {
        use crate::ast::{DeclKind, Declaration};
        use crate::types::DataType;
        use std::cell::RefCell;
        use std::rc::Rc;

        let decl = Rc::new(RefCell::new(Declaration {
            kind: DeclKind::Variable { is_const: true },
            data_type: DataType::Int,
            identifier: "k".to_string(),
            alias: "k".to_string(),
            used: 0,
            initialized: true,
            location: Location::synthetic(),
            const_value: Some(2),
        }));

        let mut e = Expression::new(ExprKind::Identifier { name: "k".to_string() }, Location::synthetic());
        e.attrs.reference = Some(decl);
        assert_eq!(fold(&e), Some(2));
    }
}
