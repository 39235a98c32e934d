//! Boolean constraint trees

use super::expression::Expression;

/// Comparison operators between expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    /// Equal; tries string equality first, then integer equality
    Eq,
    /// Not equal (integer)
    Neq,
    /// Less than
    Lt,
    /// Less than or equal
    Lte,
    /// Greater than
    Gt,
    /// Greater than or equal
    Gte,
}

/// A boolean constraint over features and attribute expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Conjunction
    And(Box<Constraint>, Box<Constraint>),
    /// Disjunction
    Or(Box<Constraint>, Box<Constraint>),
    /// Negation
    Not(Box<Constraint>),
    /// Implication
    Implies(Box<Constraint>, Box<Constraint>),
    /// Equivalence
    Iff(Box<Constraint>, Box<Constraint>),
    /// Grouping parenthesis; semantically a pass-through
    Paren(Box<Constraint>),
    /// Comparison between two expressions
    Compare {
        /// Comparison operator
        op: CompareOp,
        /// Left operand
        left: Expression,
        /// Right operand
        right: Expression,
    },
    /// A feature's selection variable as a boolean literal
    Literal(String),
}

impl Constraint {
    /// Feature selection literal
    pub fn literal(id: impl Into<String>) -> Self {
        Constraint::Literal(id.into())
    }

    /// Conjunction
    pub fn and(self, other: Constraint) -> Self {
        Constraint::And(Box::new(self), Box::new(other))
    }

    /// Disjunction
    pub fn or(self, other: Constraint) -> Self {
        Constraint::Or(Box::new(self), Box::new(other))
    }

    /// Negation
    pub fn not(self) -> Self {
        Constraint::Not(Box::new(self))
    }

    /// Implication
    pub fn implies(self, other: Constraint) -> Self {
        Constraint::Implies(Box::new(self), Box::new(other))
    }

    /// Equivalence
    pub fn iff(self, other: Constraint) -> Self {
        Constraint::Iff(Box::new(self), Box::new(other))
    }

    /// Grouping parenthesis
    pub fn paren(self) -> Self {
        Constraint::Paren(Box::new(self))
    }

    /// Comparison between two expressions
    pub fn compare(op: CompareOp, left: Expression, right: Expression) -> Self {
        Constraint::Compare { op, left, right }
    }

    /// Equality comparison
    pub fn equal(left: Expression, right: Expression) -> Self {
        Constraint::compare(CompareOp::Eq, left, right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_constraint_tree() {
        let c = Constraint::literal("A")
            .implies(Constraint::literal("B").or(Constraint::literal("C")))
            .paren();

        match c {
            Constraint::Paren(inner) => {
                assert!(matches!(*inner, Constraint::Implies(_, _)));
            }
            other => panic!("unexpected shape: {other:?}"),
        }
    }

    #[test]
    fn comparison_builder() {
        let c = Constraint::equal(Expression::number(1), Expression::number(2));
        assert!(matches!(
            c,
            Constraint::Compare { op: CompareOp::Eq, .. }
        ));
    }
}
