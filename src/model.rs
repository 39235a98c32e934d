//! Feature model representation
//!
//! A feature model is a tree of features. Every feature owns an ordered list
//! of child groups; every group carries a selection semantics (and/or/
//! alternative/optional/cardinality) over its ordered child features.
//! Cross-tree constraints live on the model itself.
//!
//! Features and groups are stored in arenas and addressed by typed indices,
//! so traversal order is the insertion order and every walk over the model is
//! deterministic.

use crate::ast::Constraint;
use crate::error::{Error, Result};
use rustc_hash::FxHashMap;

/// Index of a feature in the model arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeatureId(pub(crate) usize);

/// Index of a group in the model arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(pub(crate) usize);

/// Selection semantics of a group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// All children selected when the parent is (mandatory)
    And,
    /// At least one child selected when the parent is
    Or,
    /// Exactly one child selected when the parent is
    Alternative,
    /// Children freely selectable under the parent
    Optional,
    /// Between `lower` and `upper` children selected when the parent is
    Cardinality {
        /// Minimum number of selected children
        lower: usize,
        /// Maximum number of selected children
        upper: usize,
    },
}

/// Typed attribute value attached to a feature
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// Numeric attribute; gets a companion bit-vector variable
    Int(i32),
    /// String attribute; participates in string equality only
    Str(String),
}

/// Domain of a feature's own value
///
/// Boolean features are plain selection variables. String-typed features
/// additionally compare through a `<id>-str` companion variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeatureKind {
    /// Ordinary boolean feature
    #[default]
    Boolean,
    /// String-typed feature
    Str,
}

/// A feature in the model
#[derive(Debug, Clone)]
pub struct Feature {
    id: String,
    kind: FeatureKind,
    parent_group: Option<GroupId>,
    groups: Vec<GroupId>,
    attributes: Vec<(String, AttributeValue)>,
}

impl Feature {
    /// Returns the identifier of this feature
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the kind of this feature
    pub fn kind(&self) -> FeatureKind {
        self.kind
    }

    /// Returns the group this feature is a child of, if any
    pub fn parent_group(&self) -> Option<GroupId> {
        self.parent_group
    }

    /// Returns the child groups of this feature, in declaration order
    pub fn groups(&self) -> &[GroupId] {
        &self.groups
    }

    /// Returns the attributes of this feature, in declaration order
    pub fn attributes(&self) -> &[(String, AttributeValue)] {
        &self.attributes
    }

    /// Looks up an attribute by name
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }
}

/// A group of sibling features under a parent
#[derive(Debug, Clone)]
pub struct Group {
    kind: GroupKind,
    parent: FeatureId,
    children: Vec<FeatureId>,
}

impl Group {
    /// Returns the selection semantics of this group
    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    /// Returns the parent feature of this group
    pub fn parent(&self) -> FeatureId {
        self.parent
    }

    /// Returns the child features of this group, in declaration order
    pub fn children(&self) -> &[FeatureId] {
        &self.children
    }
}

/// An immutable-once-built feature model
///
/// Built through the `add_*` methods, then handed read-only to the encoder.
/// Parentless features are roots; the encoder asserts each root selected.
#[derive(Debug, Default)]
pub struct FeatureModel {
    features: Vec<Feature>,
    groups: Vec<Group>,
    by_id: FxHashMap<String, FeatureId>,
    constraints: Vec<Constraint>,
}

impl FeatureModel {
    /// Creates an empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a boolean feature with the given identifier
    pub fn add_feature(&mut self, id: impl Into<String>) -> Result<FeatureId> {
        self.add_feature_of(id, FeatureKind::Boolean)
    }

    /// Adds a feature with the given identifier and kind
    pub fn add_feature_of(&mut self, id: impl Into<String>, kind: FeatureKind) -> Result<FeatureId> {
        let id = id.into();
        if self.by_id.contains_key(&id) {
            return Err(Error::DuplicateFeature(id));
        }
        let fid = FeatureId(self.features.len());
        self.by_id.insert(id.clone(), fid);
        self.features.push(Feature {
            id,
            kind,
            parent_group: None,
            groups: Vec::new(),
            attributes: Vec::new(),
        });
        Ok(fid)
    }

    /// Adds a child group under the given parent feature
    pub fn add_group(&mut self, parent: FeatureId, kind: GroupKind) -> GroupId {
        let gid = GroupId(self.groups.len());
        self.groups.push(Group {
            kind,
            parent,
            children: Vec::new(),
        });
        self.features[parent.0].groups.push(gid);
        gid
    }

    /// Attaches a feature as a child of the given group
    ///
    /// A feature can be the child of at most one group.
    pub fn add_group_child(&mut self, group: GroupId, child: FeatureId) -> Result<()> {
        let feature = &mut self.features[child.0];
        if feature.parent_group.is_some() {
            return Err(Error::DuplicateParent(feature.id.clone()));
        }
        feature.parent_group = Some(group);
        self.groups[group.0].children.push(child);
        Ok(())
    }

    /// Sets an attribute on a feature, replacing any previous value
    pub fn set_attribute(
        &mut self,
        feature: FeatureId,
        name: impl Into<String>,
        value: AttributeValue,
    ) {
        let name = name.into();
        let attrs = &mut self.features[feature.0].attributes;
        if let Some(slot) = attrs.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            attrs.push((name, value));
        }
    }

    /// Adds a cross-tree constraint to the model
    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// Returns the feature with the given id, if present
    pub fn feature_by_id(&self, id: &str) -> Option<&Feature> {
        self.by_id.get(id).map(|&fid| &self.features[fid.0])
    }

    /// Returns the feature at the given index
    pub fn feature(&self, id: FeatureId) -> &Feature {
        &self.features[id.0]
    }

    /// Returns the group at the given index
    pub fn group(&self, id: GroupId) -> &Group {
        &self.groups[id.0]
    }

    /// Iterates over all features in insertion order
    pub fn features(&self) -> impl Iterator<Item = (FeatureId, &Feature)> {
        self.features.iter().enumerate().map(|(i, f)| (FeatureId(i), f))
    }

    /// Iterates over all groups in insertion order
    pub fn groups(&self) -> impl Iterator<Item = (GroupId, &Group)> {
        self.groups.iter().enumerate().map(|(i, g)| (GroupId(i), g))
    }

    /// Returns the model's cross-tree constraints
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Number of features in the model
    pub fn num_features(&self) -> usize {
        self.features.len()
    }

    /// Checks the structural invariants of the model
    ///
    /// Rejects cardinality bounds outside `[0, child count]` and cycles in
    /// the parent chain. Called by the encoder before any formula is built so
    /// a broken model can never produce a malformed formula.
    pub fn validate(&self) -> Result<()> {
        for (_, group) in self.groups() {
            if let GroupKind::Cardinality { lower, upper } = group.kind() {
                let n = group.children().len();
                if lower > upper || upper > n {
                    return Err(Error::InvalidCardinality {
                        lower,
                        upper,
                        arity: n,
                    });
                }
            }
        }
        // Every parent chain must terminate within num_features steps.
        for (fid, feature) in self.features() {
            let mut current = fid;
            let mut steps = 0;
            while let Some(group) = self.features[current.0].parent_group {
                current = self.groups[group.0].parent;
                steps += 1;
                if steps > self.features.len() {
                    return Err(Error::CyclicModel(feature.id.clone()));
                }
            }
        }
        Ok(())
    }
}
