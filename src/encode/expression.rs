//! Expression lowering
//!
//! Lowers arithmetic/string expression trees to bit-vector terms. Feature
//! references become 0/1 integers over the selection variable; attribute
//! references become the companion variable `<featureId>.<attributeName>`.
//! Aggregates walk the model's features in declaration order, so repeated
//! conversions see identical variable names.

use super::EncodeState;
use crate::ast::{Expression, VarRef};
use crate::bool::{BoolValue, Int};
use crate::error::{Error, Result};
use crate::model::{AttributeValue, FeatureKind};

/// Name of the companion variable of an attribute
pub(crate) fn attribute_identifier(feature: &str, attribute: &str) -> String {
    format!("{feature}.{attribute}")
}

/// Lowers an expression to an integer term
pub(crate) fn encode_expression(state: &mut EncodeState<'_, '_>, expr: &Expression) -> Result<Int> {
    let factory = state.factory;
    match expr {
        Expression::Add(left, right) => {
            let l = encode_expression(state, left)?;
            let r = encode_expression(state, right)?;
            Ok(l.plus(&r, factory))
        }
        Expression::Sub(left, right) => {
            let l = encode_expression(state, left)?;
            let r = encode_expression(state, right)?;
            Ok(l.minus(&r, factory))
        }
        Expression::Mul(left, right) => {
            let l = encode_expression(state, left)?;
            let r = encode_expression(state, right)?;
            Ok(l.times(&r, factory))
        }
        Expression::Div(left, right) => {
            let l = encode_expression(state, left)?;
            let r = encode_expression(state, right)?;
            Ok(l.div(&r, factory))
        }
        Expression::Number(value) => Ok(factory.int_constant(*value)),
        Expression::Str(_) => Err(Error::StringOperand),
        Expression::Ref(VarRef::Feature(id)) => {
            Ok(Int::from_bool(factory.variable(id), factory.bitwidth()))
        }
        Expression::Ref(VarRef::Attribute { feature, attribute }) => {
            Ok(factory.int_variable(&attribute_identifier(feature, attribute)))
        }
        Expression::Sum { attribute } => Ok(encode_sum(state, attribute)),
        Expression::Avg { attribute } => Ok(encode_avg(state, attribute)),
        Expression::Length { reference } => Ok(factory.int_variable(&format!("{reference}-len"))),
    }
}

/// Sum of the companion variable over every feature declaring the attribute
///
/// Deactivated features contribute 0 through the deactivation invariant.
fn encode_sum(state: &mut EncodeState<'_, '_>, attribute: &str) -> Int {
    let factory = state.factory;
    let mut total = factory.int_constant(0);
    for (_, feature) in state.model.features() {
        if feature.attribute(attribute).is_some() {
            let var = factory.int_variable(&attribute_identifier(feature.id(), attribute));
            total = total.plus(&var, factory);
        }
    }
    total
}

/// Average: sum of attribute variables over the number of selected declaring
/// features
///
/// Each declaring feature gets a divider variable `<featureId>_AVG_INT`,
/// defined as 1 when the feature is selected and 0 otherwise. The whole term
/// and its defining implications are built once per attribute name per
/// conversion; later references reuse the memoized term, so two references
/// to one average are the identical circuit.
fn encode_avg(state: &mut EncodeState<'_, '_>, attribute: &str) -> Int {
    if let Some(term) = state.average_term(attribute) {
        state.touch_average(attribute);
        return term;
    }

    let factory = state.factory;
    let one = factory.int_constant(1);
    let zero = factory.int_constant(0);

    let mut attrs: Vec<Int> = Vec::new();
    let mut dividers: Vec<Int> = Vec::new();
    let mut definitions: Vec<BoolValue> = Vec::new();
    for (_, feature) in state.model.features() {
        if feature.attribute(attribute).is_some() {
            attrs.push(factory.int_variable(&attribute_identifier(feature.id(), attribute)));
            let divider = factory.int_variable(&format!("{}_AVG_INT", feature.id()));
            let selected = factory.variable(feature.id());
            let is_one = divider.eq(&one, factory);
            definitions.push(factory.implies(selected, is_one));
            let is_zero = divider.eq(&zero, factory);
            let unselected = factory.not(selected);
            definitions.push(factory.implies(unselected, is_zero));
            dividers.push(divider);
        }
    }

    if dividers.is_empty() {
        return factory.int_constant(0);
    }

    let mut total = factory.int_constant(0);
    for attr in &attrs {
        total = total.plus(attr, factory);
    }
    let mut count = factory.int_constant(0);
    for divider in &dividers {
        count = count.plus(divider, factory);
    }
    let term = total.div(&count, factory);
    state.store_average(attribute, term.clone(), definitions);
    state.touch_average(attribute);
    term
}

/// Returns the string term of an expression, if it is string-typed
///
/// String literals intern to integer codes; string-typed features compare
/// through `<id>-str`; string-valued attributes through their companion
/// variable. Everything else is not string-eligible.
pub(crate) fn string_term(state: &mut EncodeState<'_, '_>, expr: &Expression) -> Option<Int> {
    match expr {
        Expression::Str(content) => {
            let code = state.string_code(content);
            Some(state.factory.int_constant(code))
        }
        Expression::Ref(VarRef::Feature(id)) => {
            let feature = state.model.feature_by_id(id)?;
            if feature.kind() == FeatureKind::Str {
                Some(state.factory.int_variable(&format!("{id}-str")))
            } else {
                None
            }
        }
        Expression::Ref(VarRef::Attribute { feature, attribute }) => {
            let declaring = state.model.feature_by_id(feature)?;
            match declaring.attribute(attribute) {
                Some(AttributeValue::Str(_)) => Some(
                    state
                        .factory
                        .int_variable(&attribute_identifier(feature, attribute)),
                ),
                _ => None,
            }
        }
        _ => None,
    }
}
