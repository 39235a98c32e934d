//! Sequential-counter cardinality encoding
//!
//! Encodes `lower <= count(true) <= upper` over an ordered list of named
//! variables using Sinz-style sequential counters: auxiliary variables count
//! how many of the first i+1 literals are true, and overflow variables flag a
//! count passing the bound. The at-least side reuses the at-most construction
//! over negated literals with bound `n - lower`.
//!
//! Counter and overflow variables are namespaced by direction (`-upper` /
//! `-lower`) and by a caller-supplied tag, so several cardinality bounds over
//! overlapping variables never alias.

use crate::bool::{BoolValue, BooleanFactory};
use crate::error::{Error, Result};
use log::debug;

/// Encoder for one cardinality bound over an ordered variable list
pub struct CardinalityEncoder<'f> {
    factory: &'f BooleanFactory,
    variables: Vec<String>,
    lower: usize,
    upper: usize,
    namespace: String,
}

impl<'f> CardinalityEncoder<'f> {
    /// Creates an encoder for `lower <= count(variables) <= upper`
    ///
    /// `namespace` distinguishes the auxiliary variables of this bound from
    /// those of any other bound over the same variables.
    pub fn new(
        factory: &'f BooleanFactory,
        variables: Vec<String>,
        lower: usize,
        upper: usize,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            factory,
            variables,
            lower,
            upper,
            namespace: namespace.into(),
        }
    }

    /// Builds the cardinality formula
    ///
    /// Rejects bounds outside `0 <= lower <= upper <= n` instead of emitting
    /// a malformed counter.
    pub fn convert(&self) -> Result<BoolValue> {
        let n = self.variables.len();
        if self.lower > self.upper || self.upper > n {
            return Err(Error::InvalidCardinality {
                lower: self.lower,
                upper: self.upper,
                arity: n,
            });
        }
        // Zero variables: the bounds can only be [0,0], vacuously satisfied.
        if n == 0 {
            return Ok(BoolValue::TRUE);
        }
        // Upper bound 0: all variables are dead, skip the counter entirely.
        if self.upper == 0 {
            let dead = (0..n).map(|i| self.factory.not(self.literal(i, true))).collect();
            return Ok(self.factory.and_multi(dead));
        }

        debug!(
            "cardinality [{},{}] over {} variables ({})",
            self.lower, self.upper, n, self.namespace
        );
        let at_most = self.build(true, self.upper, "-upper");
        let at_least = self.build(false, n - self.lower, "-lower");
        Ok(self.factory.and(at_most, at_least))
    }

    /// Builds one direction: at most `bound` of the polarity-literals true
    ///
    /// `positive` selects the literal polarity: the at-most side counts the
    /// variables themselves, the at-least side counts their negations.
    fn build(&self, positive: bool, bound: usize, suffix: &str) -> BoolValue {
        let n = self.variables.len();
        // Bound n or more: the count can never overflow, no constraint.
        if bound >= n {
            return BoolValue::TRUE;
        }
        // Bound 0: every polarity-literal must be false. Emitted directly; a
        // zero-width counter would leave its overflow checks unconstrained.
        if bound == 0 {
            let parts = (0..n)
                .map(|i| self.factory.not(self.literal(i, positive)))
                .collect();
            return self.factory.and_multi(parts);
        }

        let mut parts = Vec::with_capacity(n + 2);
        for i in 0..n {
            parts.push(self.counter_constraints(i, bound, positive, suffix));
        }
        parts.push(self.overflow_aggregate(suffix));
        parts.push(self.overflow_constraints(bound, positive, suffix));
        self.factory.and_multi(parts)
    }

    /// Defining constraints of counter column i
    ///
    /// `s[i][j]` means "at least j+1 of the first i+1 polarity-literals are
    /// true": base `s[0][0] <=> lit_0`, `s[0][j] = false`; recurrence
    /// `s[i][0] <=> lit_i | s[i-1][0]`,
    /// `s[i][j] <=> (lit_i & s[i-1][j-1]) | s[i-1][j]`.
    fn counter_constraints(&self, i: usize, bound: usize, positive: bool, suffix: &str) -> BoolValue {
        let factory = self.factory;
        let lit = self.literal(i, positive);
        let mut parts = Vec::with_capacity(bound);

        if i == 0 {
            parts.push(factory.iff(lit, self.counter_literal(0, 0, suffix)));
            for j in 1..bound {
                parts.push(factory.not(self.counter_literal(0, j, suffix)));
            }
        } else {
            let seen_any = factory.or(lit, self.counter_literal(i - 1, 0, suffix));
            parts.push(factory.iff(seen_any, self.counter_literal(i, 0, suffix)));
            for j in 1..bound {
                let bumped = factory.and(lit, self.counter_literal(i - 1, j - 1, suffix));
                let carried = factory.or(bumped, self.counter_literal(i - 1, j, suffix));
                parts.push(factory.iff(self.counter_literal(i, j, suffix), carried));
            }
        }

        factory.and_multi(parts)
    }

    /// Overflow definitions: `v_i <=> lit_i & s[i-1][bound-1]` for i >= 1
    ///
    /// `v_0` has no defining constraint; the aggregate simply asserts it
    /// false (a single literal alone can only overflow a bound of 0, which
    /// never reaches this path).
    fn overflow_constraints(&self, bound: usize, positive: bool, suffix: &str) -> BoolValue {
        let factory = self.factory;
        let parts = (1..self.variables.len())
            .map(|i| {
                let tipping = factory.and(
                    self.literal(i, positive),
                    self.counter_literal(i - 1, bound - 1, suffix),
                );
                factory.iff(self.overflow_variable(i, suffix), tipping)
            })
            .collect();
        factory.and_multi(parts)
    }

    /// Asserts every overflow variable false
    fn overflow_aggregate(&self, suffix: &str) -> BoolValue {
        let parts = (0..self.variables.len())
            .map(|i| self.factory.not(self.overflow_variable(i, suffix)))
            .collect();
        self.factory.and_multi(parts)
    }

    fn literal(&self, i: usize, positive: bool) -> BoolValue {
        let var = self.factory.variable(&self.variables[i]);
        if positive {
            var
        } else {
            self.factory.not(var)
        }
    }

    fn counter_literal(&self, i: usize, j: usize, suffix: &str) -> BoolValue {
        self.factory.variable(&format!(
            "{}{}@{}_{}_{}",
            self.variables[i], suffix, self.namespace, i, j
        ))
    }

    fn overflow_variable(&self, i: usize, suffix: &str) -> BoolValue {
        self.factory.variable(&format!(
            "{}{}@{}_overflow",
            self.variables[i], suffix, self.namespace
        ))
    }
}
