//! Feature model to circuit encoding
//!
//! [`ModelEncoder`] walks a validated feature model once and produces a
//! single circuit value: the structural tree formula (parent implications,
//! group semantics, attribute deactivation), the model's own cross-tree
//! constraints, and any aggregate-divider definitions collected along the
//! way.
//!
//! All mutable per-conversion state (aggregate memo, string interner) lives
//! in the encoder itself, so independent conversions of one model are fully
//! re-entrant.

pub mod cardinality;
mod constraint;
mod expression;

pub use cardinality::CardinalityEncoder;

use crate::ast::Constraint;
use crate::bool::{BoolValue, BooleanFactory, Int};
use crate::error::Result;
use crate::model::{AttributeValue, FeatureModel, GroupId, GroupKind};
use constraint::encode_constraint;
use expression::attribute_identifier;
use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};

/// Memoized average aggregate: the division term and the implications that
/// define its divider variables
struct AvgEntry {
    term: Int,
    definitions: Vec<BoolValue>,
}

/// Per-conversion mutable state shared by the lowering passes
pub(crate) struct EncodeState<'f, 'm> {
    pub(crate) factory: &'f BooleanFactory,
    pub(crate) model: &'m FeatureModel,
    /// Average terms by attribute name, in first-reference order
    averages: Vec<(String, AvgEntry)>,
    /// Attribute names whose divider definitions are permanently asserted
    /// (part of the base formula)
    asserted_averages: FxHashSet<String>,
    /// Attribute names referenced since the last drain
    touched_averages: Vec<String>,
    /// Interned string contents; codes follow first-reference order
    string_codes: FxHashMap<String, i32>,
}

impl<'f, 'm> EncodeState<'f, 'm> {
    fn new(factory: &'f BooleanFactory, model: &'m FeatureModel) -> Self {
        Self {
            factory,
            model,
            averages: Vec::new(),
            asserted_averages: FxHashSet::default(),
            touched_averages: Vec::new(),
            string_codes: FxHashMap::default(),
        }
    }

    /// Returns the interned code of a string literal, assigning on first use
    pub(crate) fn string_code(&mut self, content: &str) -> i32 {
        if let Some(&code) = self.string_codes.get(content) {
            return code;
        }
        let code = self.string_codes.len() as i32 + 1;
        self.string_codes.insert(content.to_string(), code);
        code
    }

    /// Returns the memoized average term for an attribute, if built
    pub(crate) fn average_term(&self, attribute: &str) -> Option<Int> {
        self.averages
            .iter()
            .find(|(name, _)| name == attribute)
            .map(|(_, entry)| entry.term.clone())
    }

    /// Stores a freshly built average term and its divider definitions
    pub(crate) fn store_average(
        &mut self,
        attribute: &str,
        term: Int,
        definitions: Vec<BoolValue>,
    ) {
        self.averages
            .push((attribute.to_string(), AvgEntry { term, definitions }));
    }

    /// Records that the current lowering referenced an average
    pub(crate) fn touch_average(&mut self, attribute: &str) {
        if !self.touched_averages.iter().any(|name| name == attribute) {
            self.touched_averages.push(attribute.to_string());
        }
    }

    /// Divider definitions for every average built so far, marking them as
    /// permanently asserted; used when assembling the base formula
    fn assert_all_definitions(&mut self) -> Vec<BoolValue> {
        self.touched_averages.clear();
        let mut parts = Vec::new();
        for (name, entry) in &self.averages {
            if self.asserted_averages.insert(name.clone()) {
                parts.extend(entry.definitions.iter().copied());
            }
        }
        parts
    }

    /// Divider definitions for the averages referenced since the last drain,
    /// excluding those already asserted by the base formula
    ///
    /// Probe formulas bundle these so a popped probe never leaves a later one
    /// without the definitions it relies on; the gates are shared, so the
    /// solver sees each defining clause once.
    fn touched_definitions(&mut self) -> Vec<BoolValue> {
        let touched = std::mem::take(&mut self.touched_averages);
        let mut parts = Vec::new();
        for name in touched {
            if self.asserted_averages.contains(&name) {
                continue;
            }
            if let Some((_, entry)) = self.averages.iter().find(|(n, _)| *n == name) {
                parts.extend(entry.definitions.iter().copied());
            }
        }
        parts
    }
}

/// Encoder producing one formula for one feature model
pub struct ModelEncoder<'f, 'm> {
    state: EncodeState<'f, 'm>,
}

impl<'f, 'm> ModelEncoder<'f, 'm> {
    /// Creates an encoder for one conversion of `model`
    pub fn new(factory: &'f BooleanFactory, model: &'m FeatureModel) -> Self {
        Self {
            state: EncodeState::new(factory, model),
        }
    }

    /// Converts the whole model: tree structure, own constraints, and any
    /// divider definitions the constraints pulled in
    pub fn convert(&mut self) -> Result<BoolValue> {
        self.state.model.validate()?;
        let tree = self.convert_tree()?;
        let constraints = self.convert_constraints()?;
        let formula = self.state.factory.and(tree, constraints);
        debug!(
            "converted model: {} features, {} labels",
            self.state.model.num_features(),
            self.state.factory.num_labels()
        );
        Ok(formula)
    }

    /// Converts the structural part of the model
    ///
    /// Per feature, in model order: roots are asserted selected; children
    /// imply their parent; numeric attributes get the deactivation
    /// implications; each child group contributes its group formula.
    pub fn convert_tree(&mut self) -> Result<BoolValue> {
        let factory = self.state.factory;
        let model = self.state.model;
        let mut parts = Vec::new();

        for (_, feature) in model.features() {
            let selected = factory.variable(feature.id());
            match feature.parent_group() {
                None => parts.push(selected),
                Some(group) => {
                    let parent = model.feature(model.group(group).parent());
                    let parent_var = factory.variable(parent.id());
                    parts.push(factory.implies(selected, parent_var));
                }
            }
            for &group in feature.groups() {
                parts.push(self.convert_group(group)?);
            }
            for (name, value) in feature.attributes() {
                if let AttributeValue::Int(declared) = value {
                    let var = factory.int_variable(&attribute_identifier(feature.id(), name));
                    let holds_value = var.eq(&factory.int_constant(*declared), factory);
                    parts.push(factory.implies(selected, holds_value));
                    let is_zero = var.eq(&factory.int_constant(0), factory);
                    let unselected = factory.not(selected);
                    parts.push(factory.implies(unselected, is_zero));
                }
            }
        }

        Ok(factory.and_multi(parts))
    }

    /// Converts the model's own constraints plus collected divider formulas
    pub fn convert_constraints(&mut self) -> Result<BoolValue> {
        let model = self.state.model;
        let mut parts = Vec::new();
        for constraint in model.constraints() {
            parts.push(encode_constraint(&mut self.state, constraint)?);
        }
        parts.extend(self.state.assert_all_definitions());
        Ok(self.state.factory.and_multi(parts))
    }

    /// Converts one group: parent-selected implies the group formula
    pub fn convert_group(&mut self, group: GroupId) -> Result<BoolValue> {
        let factory = self.state.factory;
        let model = self.state.model;
        let group_ref = model.group(group);
        let children: Vec<BoolValue> = group_ref
            .children()
            .iter()
            .map(|&child| factory.variable(model.feature(child).id()))
            .collect();

        let formula = match group_ref.kind() {
            GroupKind::Or => factory.or_multi(children),
            GroupKind::And => factory.and_multi(children),
            GroupKind::Alternative => {
                let at_least_one = factory.or_multi(children.clone());
                let mut parts = Vec::new();
                for i in 0..children.len() {
                    for j in i + 1..children.len() {
                        let not_i = factory.not(children[i]);
                        let not_j = factory.not(children[j]);
                        parts.push(factory.or(not_i, not_j));
                    }
                }
                parts.push(at_least_one);
                factory.and_multi(parts)
            }
            GroupKind::Cardinality { lower, upper } => {
                let names = group_ref
                    .children()
                    .iter()
                    .map(|&child| model.feature(child).id().to_string())
                    .collect();
                CardinalityEncoder::new(factory, names, lower, upper, format!("g{}", group.0))
                    .convert()?
            }
            GroupKind::Optional => factory.constant(true),
        };

        let parent = factory.variable(model.feature(group_ref.parent()).id());
        Ok(factory.implies(parent, formula))
    }

    /// Lowers a probe constraint against this conversion's context
    ///
    /// Divider definitions for averages the probe references are conjoined
    /// into the returned formula unless the base formula already asserts
    /// them, so a probe is self-contained even after earlier probes were
    /// popped. Within one probe each definition set appears once.
    pub fn convert_constraint(&mut self, constraint: &Constraint) -> Result<BoolValue> {
        self.state.touched_averages.clear();
        let value = encode_constraint(&mut self.state, constraint)?;
        let definitions = self.state.touched_definitions();
        if definitions.is_empty() {
            return Ok(value);
        }
        let bundled = self.state.factory.and_multi(definitions);
        Ok(self.state.factory.and(value, bundled))
    }
}
