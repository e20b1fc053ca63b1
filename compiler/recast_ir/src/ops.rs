//! Operator tables.

/// Binary operators, lowest precedence last in source order of the grammar.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
    Coalesce,
}

impl BinaryOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Coalesce => "??",
        }
    }

    /// Binding strength; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Coalesce => 1,
            BinaryOp::Or => 2,
            BinaryOp::And => 3,
            BinaryOp::Eq | BinaryOp::NotEq => 4,
            BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => 5,
            BinaryOp::Add | BinaryOp::Sub => 6,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => 7,
        }
    }

    pub fn is_comparison(self) -> bool {
        self.negated().is_some()
    }

    /// The comparison that holds exactly when `self` does not.
    ///
    /// `==`/`!=`, `<`/`>=` and `>`/`<=` pair up; every other operator has no
    /// logical complement expressible as a single operator.
    pub fn negated(self) -> Option<BinaryOp> {
        match self {
            BinaryOp::Eq => Some(BinaryOp::NotEq),
            BinaryOp::NotEq => Some(BinaryOp::Eq),
            BinaryOp::Lt => Some(BinaryOp::GtEq),
            BinaryOp::GtEq => Some(BinaryOp::Lt),
            BinaryOp::Gt => Some(BinaryOp::LtEq),
            BinaryOp::LtEq => Some(BinaryOp::Gt),
            _ => None,
        }
    }

    /// `&&`, `||` and `??` may skip evaluating their right operand.
    pub fn short_circuits(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or | BinaryOp::Coalesce)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum UnaryOp {
    Not,
    Neg,
    PreInc,
    PreDec,
    PostInc,
    PostDec,
}

impl UnaryOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Neg => "-",
            UnaryOp::PreInc | UnaryOp::PostInc => "++",
            UnaryOp::PreDec | UnaryOp::PostDec => "--",
        }
    }

    pub fn is_postfix(self) -> bool {
        matches!(self, UnaryOp::PostInc | UnaryOp::PostDec)
    }

    /// Increments and decrements write their operand.
    pub fn writes_operand(self) -> bool {
        matches!(
            self,
            UnaryOp::PreInc | UnaryOp::PreDec | UnaryOp::PostInc | UnaryOp::PostDec
        )
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
}

impl AssignOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::AddAssign => "+=",
            AssignOp::SubAssign => "-=",
            AssignOp::MulAssign => "*=",
            AssignOp::DivAssign => "/=",
        }
    }
}

/// Passing mode of an invocation argument.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
pub enum ArgModifier {
    #[default]
    None,
    Ref,
    Out,
    In,
}

impl ArgModifier {
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            ArgModifier::None => None,
            ArgModifier::Ref => Some("ref"),
            ArgModifier::Out => Some("out"),
            ArgModifier::In => Some("in"),
        }
    }

    /// `ref` and `out` arguments may be written by the callee.
    pub fn is_writable(self) -> bool {
        matches!(self, ArgModifier::Ref | ArgModifier::Out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negation_table_is_involution() {
        for op in [
            BinaryOp::Eq,
            BinaryOp::NotEq,
            BinaryOp::Lt,
            BinaryOp::LtEq,
            BinaryOp::Gt,
            BinaryOp::GtEq,
        ] {
            let flipped = op.negated();
            assert_eq!(flipped.and_then(BinaryOp::negated), Some(op));
        }
    }

    #[test]
    fn test_non_comparisons_have_no_negation() {
        assert_eq!(BinaryOp::Add.negated(), None);
        assert_eq!(BinaryOp::And.negated(), None);
        assert!(!BinaryOp::Coalesce.is_comparison());
    }

    #[test]
    fn test_precedence_order() {
        assert!(BinaryOp::Mul.precedence() > BinaryOp::Add.precedence());
        assert!(BinaryOp::And.precedence() > BinaryOp::Or.precedence());
        assert!(BinaryOp::Or.precedence() > BinaryOp::Coalesce.precedence());
    }
}
