//! Type & operator tables (component A).
//!
//! Pure functions and pure data only — nothing here touches the parse tree,
//! the scope stack, or diagnostics. Promotion and the various operator
//! predicates are the vocabulary the analyzer and emitter both build on.

/// The five primitive scalar types, plus the two sentinels `FunctionPointer`
/// and `Error`/`Unknown` used by the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Void,
    Bool,
    Char,
    Int,
    Float,
    /// The type of an identifier that names a function. Not a first-class
    /// value: cannot be assigned, passed, returned, or used as an operand.
    FunctionPointer,
    /// Sentinel assigned to an expression whose analysis failed, to
    /// suppress cascading diagnostics.
    Error,
}

impl DataType {
    /// Numeric rank used by `promote`. Only meaningful for `bool < char <
    /// int < float`; other types never participate in promotion.
    fn numeric_rank(self) -> Option<u8> {
        match self {
            DataType::Bool => Some(0),
            DataType::Char => Some(1),
            DataType::Int => Some(2),
            DataType::Float => Some(3),
            _ => None,
        }
    }

    pub fn is_integer(self) -> bool {
        matches!(self, DataType::Bool | DataType::Char | DataType::Int)
    }

    pub fn is_numeric(self) -> bool {
        self.numeric_rank().is_some()
    }

    /// Short tag used in the emitted quadruple listing (`PUSH_INT`, the
    /// `INT` in `INT_TO_FLOAT`, and so on).
    pub fn short_tag(self) -> &'static str {
        match self {
            DataType::Void => "VOID",
            DataType::Bool => "BOOL",
            DataType::Char => "CHR",
            DataType::Int => "INT",
            DataType::Float => "FLOAT",
            DataType::FunctionPointer => "FNCPTR",
            DataType::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DataType::Void => "void",
            DataType::Bool => "bool",
            DataType::Char => "char",
            DataType::Int => "int",
            DataType::Float => "float",
            DataType::FunctionPointer => "pointer to function",
            DataType::Error => "<error>",
        };
        write!(f, "{name}")
    }
}

/// `promote(t1, t2) = max(t1, t2)` over `bool < char < int < float`.
///
/// Only defined when both sides are numeric; callers are expected to have
/// already rejected `void`/`function-pointer` operands before calling this.
pub fn promote(t1: DataType, t2: DataType) -> DataType {
    match (t1.numeric_rank(), t2.numeric_rank()) {
        (Some(r1), Some(r2)) => {
            if r1 >= r2 {
                t1
            } else {
                t2
            }
        }
        // Defensive fallback for malformed callers; never exercised once
        // the analyzer has rejected non-numeric operands upstream.
        _ => t1,
    }
}

/// The surface operators plus the emitter-only synthetic opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    UnaryPlus,
    UnaryMinus,
    PreInc,
    PostInc,
    PreDec,
    PostDec,
    BitAnd,
    BitOr,
    BitXor,
    BitNot,
    Shl,
    Shr,
    LogicalAnd,
    LogicalOr,
    LogicalNot,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    Equal,
    NotEqual,
}

impl Operator {
    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            Operator::Add
                | Operator::Sub
                | Operator::Mul
                | Operator::Div
                | Operator::Mod
                | Operator::UnaryPlus
                | Operator::UnaryMinus
        )
    }

    pub fn is_bitwise(self) -> bool {
        matches!(
            self,
            Operator::BitAnd
                | Operator::BitOr
                | Operator::BitXor
                | Operator::BitNot
                | Operator::Shl
                | Operator::Shr
        )
    }

    pub fn is_logical(self) -> bool {
        matches!(
            self,
            Operator::LogicalAnd
                | Operator::LogicalOr
                | Operator::LogicalNot
                | Operator::Greater
                | Operator::GreaterEqual
                | Operator::Less
                | Operator::LessEqual
                | Operator::Equal
                | Operator::NotEqual
        )
    }

    pub fn requires_lvalue(self) -> bool {
        matches!(
            self,
            Operator::Assign
                | Operator::PreInc
                | Operator::PostInc
                | Operator::PreDec
                | Operator::PostDec
        )
    }

    /// Bitwise operators plus `mod` are rejected on float operands.
    pub fn is_integer_only(self) -> bool {
        self.is_bitwise() || matches!(self, Operator::Mod)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Assign => "=",
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Mod => "%",
            Operator::UnaryPlus => "+",
            Operator::UnaryMinus => "-",
            Operator::PreInc | Operator::PostInc => "++",
            Operator::PreDec | Operator::PostDec => "--",
            Operator::BitAnd => "&",
            Operator::BitOr => "|",
            Operator::BitXor => "^",
            Operator::BitNot => "~",
            Operator::Shl => "<<",
            Operator::Shr => ">>",
            Operator::LogicalAnd => "&&",
            Operator::LogicalOr => "||",
            Operator::LogicalNot => "!",
            Operator::Greater => ">",
            Operator::GreaterEqual => ">=",
            Operator::Less => "<",
            Operator::LessEqual => "<=",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
        }
    }

    /// Mnemonic used for the corresponding quadruple opcode, e.g.
    /// `ADD`, `SHL`, `EQU`. Synthetic opcodes (`PUSH`/`POP`/`JMP`/`JZ`/`JNZ`)
    /// are not operators and are emitted directly by `emitter.rs`.
    pub fn quad_mnemonic(self) -> &'static str {
        match self {
            Operator::Assign => "POP",
            Operator::Add => "ADD",
            Operator::Sub => "SUB",
            Operator::Mul => "MUL",
            Operator::Div => "DIV",
            Operator::Mod => "MOD",
            Operator::UnaryPlus => "NOP",
            Operator::UnaryMinus => "NEG",
            Operator::PreInc | Operator::PostInc => "INC",
            Operator::PreDec | Operator::PostDec => "DEC",
            Operator::BitAnd => "AND",
            Operator::BitOr => "OR",
            Operator::BitXor => "XOR",
            Operator::BitNot => "NOT",
            Operator::Shl => "SHL",
            Operator::Shr => "SHR",
            Operator::LogicalAnd => "AND",
            Operator::LogicalOr => "OR",
            Operator::LogicalNot => "NOT",
            Operator::Greater => "GT",
            Operator::GreaterEqual => "GTE",
            Operator::Less => "LT",
            Operator::LessEqual => "LTE",
            Operator::Equal => "EQU",
            Operator::NotEqual => "NEQ",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promote_picks_the_higher_rank() {
        assert_eq!(promote(DataType::Bool, DataType::Int), DataType::Int);
        assert_eq!(promote(DataType::Float, DataType::Char), DataType::Float);
        assert_eq!(promote(DataType::Int, DataType::Int), DataType::Int);
    }

    #[test]
    fn integer_type_excludes_float_and_void() {
        assert!(DataType::Bool.is_integer());
        assert!(DataType::Char.is_integer());
        assert!(DataType::Int.is_integer());
        assert!(!DataType::Float.is_integer());
        assert!(!DataType::Void.is_integer());
    }

    #[test]
    fn operator_predicates_are_disjoint_where_expected() {
        assert!(Operator::Mod.is_integer_only());
        assert!(Operator::BitAnd.is_integer_only());
        assert!(!Operator::Add.is_integer_only());
        assert!(Operator::Assign.requires_lvalue());
        assert!(Operator::PreInc.requires_lvalue());
        assert!(!Operator::PostInc.is_logical());
        assert!(Operator::Equal.is_logical());
    }

    #[test]
    fn short_tags_match_the_quadruple_grammar() {
        assert_eq!(DataType::Int.short_tag(), "INT");
        assert_eq!(DataType::FunctionPointer.short_tag(), "FNCPTR");
    }
}
