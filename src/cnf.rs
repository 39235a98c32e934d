//! Boolean circuit to CNF translation
//!
//! Converts circuit gates to CNF clauses using the Tseitin transformation.
//! The emitter remembers which gates it has already defined, so shared
//! subcircuits and repeated emissions into the same sink produce each gate's
//! defining clauses exactly once. That makes it safe to stream the base
//! formula and any number of probe formulas into one live solver.

use crate::bool::{BoolValue, BooleanFactory, GateKind, GateRef};
use crate::error::Result;
use crate::sat::ClauseSink;
use rustc_hash::FxHashSet;

/// CNF clause container
#[derive(Debug, Clone, Default)]
pub struct CNF {
    /// Number of variables (highest label referenced by any clause)
    pub num_variables: u32,
    /// CNF clauses (each clause is a vec of literals, negative = negated)
    pub clauses: Vec<Vec<i32>>,
}

impl CNF {
    /// Creates a new empty CNF
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of clauses
    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }
}

impl ClauseSink for CNF {
    fn add_clause(&mut self, lits: &[i32]) -> Result<()> {
        for &lit in lits {
            let var = lit.unsigned_abs();
            if var > self.num_variables {
                self.num_variables = var;
            }
        }
        self.clauses.push(lits.to_vec());
        Ok(())
    }
}

/// Memoizing Tseitin emitter
///
/// One emitter per clause sink: the visited set tracks which gate definitions
/// the sink has already received.
#[derive(Debug, Default)]
pub struct CnfEmitter {
    visited: FxHashSet<i32>,
}

impl CnfEmitter {
    /// Creates a new emitter with an empty memo
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits the defining clauses of `value` and returns its label
    ///
    /// No clause asserts the value itself; the caller either adds a unit
    /// clause (see [`CnfEmitter::assert_value`]) or uses the label as an
    /// assumption literal. Constants are returned as their labels (0 / -1)
    /// and must not be used as literals.
    pub fn emit<S: ClauseSink>(
        &mut self,
        factory: &BooleanFactory,
        value: BoolValue,
        sink: &mut S,
    ) -> Result<i32> {
        match value {
            BoolValue::Constant(c) => Ok(c.label()),
            BoolValue::Variable(v) => Ok(v.label()),
            BoolValue::Formula(gate) => self.emit_gate(factory, gate, sink),
        }
    }

    /// Emits `value` and asserts it: a unit clause for gates and variables,
    /// nothing for TRUE, the empty clause for FALSE
    pub fn assert_value<S: ClauseSink>(
        &mut self,
        factory: &BooleanFactory,
        value: BoolValue,
        sink: &mut S,
    ) -> Result<()> {
        match value {
            BoolValue::Constant(c) => {
                if c.label() == -1 {
                    sink.add_clause(&[])?;
                }
                Ok(())
            }
            _ => {
                let label = self.emit(factory, value, sink)?;
                sink.add_clause(&[label])
            }
        }
    }

    fn emit_gate<S: ClauseSink>(
        &mut self,
        factory: &BooleanFactory,
        gate: GateRef,
        sink: &mut S,
    ) -> Result<i32> {
        let output = gate.label();
        if self.visited.contains(&output) {
            return Ok(output);
        }
        self.visited.insert(output);

        match factory.gate_kind(gate) {
            GateKind::And(inputs) => self.emit_and(factory, output, &inputs, sink)?,
            GateKind::Or(inputs) => self.emit_or(factory, output, &inputs, sink)?,
            GateKind::Not(input) => {
                let input_label = self.emit(factory, input, sink)?;
                sink.add_clause(&[input_label, output])?;
                sink.add_clause(&[-input_label, -output])?;
            }
            GateKind::Ite {
                condition,
                then_val,
                else_val,
            } => {
                let cond = self.emit(factory, condition, sink)?;
                let then_label = self.emit(factory, then_val, sink)?;
                let else_label = self.emit(factory, else_val, sink)?;

                // cond → (then ↔ output)
                sink.add_clause(&[-cond, -then_label, output])?;
                sink.add_clause(&[-cond, then_label, -output])?;
                // ¬cond → (else ↔ output)
                sink.add_clause(&[cond, -else_label, output])?;
                sink.add_clause(&[cond, else_label, -output])?;
            }
        }

        Ok(output)
    }

    /// AND gate: output = a1 ∧ a2 ∧ ... ∧ an
    fn emit_and<S: ClauseSink>(
        &mut self,
        factory: &BooleanFactory,
        output: i32,
        inputs: &[BoolValue],
        sink: &mut S,
    ) -> Result<()> {
        let input_labels = inputs
            .iter()
            .map(|v| self.emit(factory, *v, sink))
            .collect::<Result<Vec<_>>>()?;

        // If all inputs are true, output is true.
        let mut clause: Vec<i32> = input_labels.iter().map(|&l| -l).collect();
        clause.push(output);
        sink.add_clause(&clause)?;

        // If output is true, each input is true.
        for &input in &input_labels {
            sink.add_clause(&[input, -output])?;
        }
        Ok(())
    }

    /// OR gate: output = a1 ∨ a2 ∨ ... ∨ an
    fn emit_or<S: ClauseSink>(
        &mut self,
        factory: &BooleanFactory,
        output: i32,
        inputs: &[BoolValue],
        sink: &mut S,
    ) -> Result<()> {
        let input_labels = inputs
            .iter()
            .map(|v| self.emit(factory, *v, sink))
            .collect::<Result<Vec<_>>>()?;

        // If output is true, some input is true.
        let mut clause = input_labels.clone();
        clause.push(-output);
        sink.add_clause(&clause)?;

        // If any input is true, output is true.
        for &input in &input_labels {
            sink.add_clause(&[-input, output])?;
        }
        Ok(())
    }
}

/// One-shot translation of a circuit into an asserted CNF
///
/// Returns the root label and the clause set; the clause set is satisfiable
/// iff the circuit is.
pub fn translate(factory: &BooleanFactory, value: BoolValue) -> Result<(i32, CNF)> {
    let mut cnf = CNF::new();
    let mut emitter = CnfEmitter::new();
    let label = emitter.emit(factory, value, &mut cnf)?;
    emitter.assert_value(factory, value, &mut cnf)?;
    Ok((label, cnf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bool::Options;

    #[test]
    fn cnf_empty() {
        let cnf = CNF::new();
        assert_eq!(cnf.num_variables, 0);
        assert_eq!(cnf.num_clauses(), 0);
    }

    #[test]
    fn cnf_add_clause() {
        let mut cnf = CNF::new();
        cnf.add_clause(&[1, -2, 3]).unwrap();
        assert_eq!(cnf.num_variables, 3);
        assert_eq!(cnf.num_clauses(), 1);
    }

    #[test]
    fn translate_true_constant() {
        let factory = BooleanFactory::new(Options::default());
        let (_, cnf) = translate(&factory, factory.constant(true)).unwrap();
        assert_eq!(cnf.num_clauses(), 0);
    }

    #[test]
    fn translate_false_constant() {
        let factory = BooleanFactory::new(Options::default());
        let (_, cnf) = translate(&factory, factory.constant(false)).unwrap();
        // The empty clause makes the CNF unsatisfiable.
        assert_eq!(cnf.num_clauses(), 1);
        assert!(cnf.clauses[0].is_empty());
    }

    #[test]
    fn translate_variable() {
        let factory = BooleanFactory::new(Options::default());
        let v = factory.variable("a");
        let (label, cnf) = translate(&factory, v).unwrap();

        assert_eq!(label, v.label());
        assert_eq!(cnf.num_clauses(), 1);
        assert_eq!(cnf.clauses[0], vec![v.label()]);
    }

    #[test]
    fn translate_and_gate() {
        let factory = BooleanFactory::new(Options::default());
        let v1 = factory.variable("a");
        let v2 = factory.variable("b");
        let and = factory.and(v1, v2);

        let (label, cnf) = translate(&factory, and).unwrap();

        // 3 defining clauses plus the root assertion.
        assert_eq!(cnf.num_clauses(), 4);
        assert_eq!(cnf.clauses.last().unwrap(), &vec![label]);
    }

    #[test]
    fn shared_gates_emitted_once() {
        let factory = BooleanFactory::new(Options::default());
        let v1 = factory.variable("a");
        let v2 = factory.variable("b");

        let and = factory.and(v1, v2);
        let not = factory.not(and);
        let or = factory.or(and, not);

        let (_, cnf) = translate(&factory, or).unwrap();

        // AND (3) + NOT (2) + OR (3) + assertion (1); the shared AND gate is
        // defined once even though two gates consume it.
        assert_eq!(cnf.num_clauses(), 9);
    }

    #[test]
    fn emitter_memo_spans_calls() {
        let factory = BooleanFactory::new(Options::default());
        let v1 = factory.variable("a");
        let v2 = factory.variable("b");
        let and = factory.and(v1, v2);

        let mut cnf = CNF::new();
        let mut emitter = CnfEmitter::new();
        emitter.emit(&factory, and, &mut cnf).unwrap();
        let after_first = cnf.num_clauses();
        emitter.emit(&factory, and, &mut cnf).unwrap();

        assert_eq!(cnf.num_clauses(), after_first);
    }
}
