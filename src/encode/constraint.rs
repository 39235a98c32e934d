//! Constraint lowering
//!
//! Lowers boolean constraint trees to circuit values, recursing into the
//! expression encoder at comparison leaves.

use super::expression::{encode_expression, string_term};
use super::EncodeState;
use crate::ast::{CompareOp, Constraint};
use crate::bool::BoolValue;
use crate::error::Result;

/// Lowers a constraint to a boolean circuit value
pub(crate) fn encode_constraint(
    state: &mut EncodeState<'_, '_>,
    constraint: &Constraint,
) -> Result<BoolValue> {
    let factory = state.factory;
    match constraint {
        Constraint::And(left, right) => {
            let l = encode_constraint(state, left)?;
            let r = encode_constraint(state, right)?;
            Ok(factory.and(l, r))
        }
        Constraint::Or(left, right) => {
            let l = encode_constraint(state, left)?;
            let r = encode_constraint(state, right)?;
            Ok(factory.or(l, r))
        }
        Constraint::Not(inner) => {
            let value = encode_constraint(state, inner)?;
            Ok(factory.not(value))
        }
        Constraint::Implies(left, right) => {
            let l = encode_constraint(state, left)?;
            let r = encode_constraint(state, right)?;
            Ok(factory.implies(l, r))
        }
        Constraint::Iff(left, right) => {
            let l = encode_constraint(state, left)?;
            let r = encode_constraint(state, right)?;
            Ok(factory.iff(l, r))
        }
        Constraint::Paren(inner) => encode_constraint(state, inner),
        Constraint::Literal(id) => Ok(factory.variable(id)),
        Constraint::Compare { op, left, right } => encode_compare(state, *op, left, right),
    }
}

fn encode_compare(
    state: &mut EncodeState<'_, '_>,
    op: CompareOp,
    left: &crate::ast::Expression,
    right: &crate::ast::Expression,
) -> Result<BoolValue> {
    // Equality compares as strings when both sides are string-typed;
    // otherwise every comparison is integer-typed.
    if op == CompareOp::Eq {
        if let Some(l) = string_term(state, left) {
            if let Some(r) = string_term(state, right) {
                return Ok(l.eq(&r, state.factory));
            }
        }
    }

    let l = encode_expression(state, left)?;
    let r = encode_expression(state, right)?;
    let factory = state.factory;
    Ok(match op {
        CompareOp::Eq => l.eq(&r, factory),
        CompareOp::Neq => {
            let eq = l.eq(&r, factory);
            factory.not(eq)
        }
        CompareOp::Lt => l.lt(&r, factory),
        CompareOp::Lte => l.lte(&r, factory),
        CompareOp::Gt => l.gt(&r, factory),
        CompareOp::Gte => l.gte(&r, factory),
    })
}
