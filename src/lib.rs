//! # fmsat
//!
//! Satisfiability analysis for feature models.
//!
//! fmsat translates a hierarchical feature model (features grouped under
//! selection rules, cross-tree constraints, numeric and string attributes)
//! into a boolean/bit-vector circuit, lowers the circuit to CNF, and answers
//! satisfiability queries through an incremental SAT session. Arithmetic over
//! attributes is bit-blasted into two's-complement bit vectors, so the whole
//! model bottoms out in a single SAT problem.
//!
//! ## Example
//!
//! ```rust,ignore
//! use fmsat::bool::{BooleanFactory, Options};
//! use fmsat::checker::SatChecker;
//! use fmsat::encode::ModelEncoder;
//! use fmsat::model::{AttributeValue, FeatureModel, GroupKind};
//!
//! let mut model = FeatureModel::new();
//! let root = model.add_feature("Car")?;
//! let engine = model.add_feature("Engine")?;
//! let group = model.add_group(root, GroupKind::And);
//! model.add_group_child(group, engine)?;
//! model.set_attribute(engine, "Price", AttributeValue::Int(100));
//!
//! let factory = BooleanFactory::new(Options::default());
//! let mut encoder = ModelEncoder::new(&factory, &model);
//! let base = encoder.convert()?;
//!
//! let mut checker = SatChecker::new(&factory, base)?;
//! assert!(checker.is_sat()?);
//! ```

/// Feature model representation (features, groups, attributes)
pub mod model;

/// Constraint and expression trees
pub mod ast;

/// Boolean circuit representation and bit-vector integers
pub mod bool;

/// Feature model to circuit encoding
pub mod encode;

/// Boolean circuit to CNF translation
pub mod cnf;

/// SAT solver capability traits and backend adapters
pub mod sat;

/// Incremental satisfiability checking
pub mod checker;

/// Error types
pub mod error {
    //! Error types for fmsat

    use thiserror::Error;

    /// Errors that can occur during encoding or solving
    #[derive(Error, Debug)]
    pub enum Error {
        /// Feature identifier registered twice
        #[error("duplicate feature: {0}")]
        DuplicateFeature(String),

        /// Feature attached to more than one group
        #[error("feature {0} already has a parent group")]
        DuplicateParent(String),

        /// Parent chain of a feature loops back on itself
        #[error("feature tree contains a cycle through {0}")]
        CyclicModel(String),

        /// Cardinality bounds outside `0 <= lower <= upper <= child count`
        #[error("invalid cardinality [{lower},{upper}] for {arity} variables")]
        InvalidCardinality {
            /// Lower bound of the group
            lower: usize,
            /// Upper bound of the group
            upper: usize,
            /// Number of variables under the bound
            arity: usize,
        },

        /// String term reached an arithmetic context
        #[error("string operand in arithmetic context")]
        StringOperand,

        /// Backend solver reported an internal failure
        #[error("solver failure: {0}")]
        Solver(String),

        /// Backend solver was interrupted mid-query
        #[error("solver interrupted")]
        Interrupted,
    }

    /// Result type for fmsat operations
    pub type Result<T> = std::result::Result<T, Error>;
}

pub use error::{Error, Result};
