//! AST types for cross-tree constraints
//!
//! Constraints are boolean trees over comparisons and feature literals;
//! expressions are the arithmetic/string trees underneath comparisons. Both
//! are closed tagged unions matched exhaustively by the encoders, so a new
//! node kind is a compile-time event in every consumer.

pub mod constraint;
pub mod expression;

pub use constraint::{CompareOp, Constraint};
pub use expression::{Expression, VarRef};
