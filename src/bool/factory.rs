//! Boolean factory with gate caching
//!
//! The factory creates boolean values and gates, with automatic
//! deduplication. Uses interior mutability (Cell/RefCell) to avoid
//! `&mut self` everywhere.
//!
//! Variables are registered by name: asking for the same name twice returns
//! the same variable, so every identifier-derived name in an encoding maps to
//! exactly one solver variable and repeated conversions of one model line up
//! label for label.

use super::int::Int;
use super::{BoolValue, BooleanConstant, BooleanVariable, GateKind, GateRef};
use log::debug;
use rustc_hash::FxHashMap;
use std::cell::{Cell, RefCell};

/// Options for the boolean factory
#[derive(Debug, Clone)]
pub struct Options {
    /// Enable structural sharing of gates (default: true)
    pub sharing: bool,
    /// Bitwidth of integer terms; arithmetic wraps at this width (default: 16)
    pub bitwidth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            sharing: true,
            bitwidth: 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CacheKey {
    And(Vec<i32>),
    Or(Vec<i32>),
    Not(i32),
    Ite(i32, i32, i32),
}

/// Boolean circuit factory with caching
///
/// Creates boolean values and gates, deduplicating gates structurally.
/// Labels: TRUE=0, FALSE=-1; variables and gates share the positive label
/// space in allocation order.
pub struct BooleanFactory {
    options: Options,
    next_label: Cell<i32>,
    gates: RefCell<Vec<GateKind>>,
    cache: RefCell<FxHashMap<CacheKey, GateRef>>,
    vars_by_name: RefCell<FxHashMap<String, BooleanVariable>>,
    var_names: RefCell<Vec<String>>,
}

impl BooleanFactory {
    /// Creates a new boolean factory
    pub fn new(options: Options) -> Self {
        Self {
            options,
            next_label: Cell::new(1),
            gates: RefCell::new(Vec::new()),
            cache: RefCell::new(FxHashMap::default()),
            vars_by_name: RefCell::new(FxHashMap::default()),
            var_names: RefCell::new(Vec::new()),
        }
    }

    /// Returns the bitwidth used for integer terms
    pub fn bitwidth(&self) -> usize {
        self.options.bitwidth
    }

    /// Returns the highest label handed out so far
    pub fn num_labels(&self) -> i32 {
        self.next_label.get() - 1
    }

    /// Returns the names of all named variables, in allocation order
    pub fn variable_names(&self) -> Vec<String> {
        self.var_names.borrow().clone()
    }

    /// Returns the variable registered under `name`, creating it on first use
    pub fn variable(&self, name: &str) -> BoolValue {
        if let Some(var) = self.vars_by_name.borrow().get(name) {
            return BoolValue::Variable(*var);
        }
        let var = BooleanVariable::new(self.allocate_label());
        debug!("variable {name} -> {}", var.label());
        self.vars_by_name.borrow_mut().insert(name.to_string(), var);
        self.var_names.borrow_mut().push(name.to_string());
        BoolValue::Variable(var)
    }

    /// Creates a fresh anonymous auxiliary variable
    pub fn fresh_variable(&self) -> BoolValue {
        BoolValue::Variable(BooleanVariable::new(self.allocate_label()))
    }

    /// Creates an integer variable of the factory bitwidth
    ///
    /// Bit `i` is the named variable `<name>#<i>`, so the term is memoized by
    /// name exactly like a boolean variable.
    pub fn int_variable(&self, name: &str) -> Int {
        let bits = (0..self.bitwidth())
            .map(|i| self.variable(&format!("{name}#{i}")))
            .collect();
        Int::new(bits)
    }

    /// Creates an integer constant of the factory bitwidth
    pub fn int_constant(&self, value: i32) -> Int {
        Int::constant(value, self.bitwidth())
    }

    /// Creates a constant
    pub fn constant(&self, value: bool) -> BoolValue {
        if value {
            BoolValue::TRUE
        } else {
            BoolValue::FALSE
        }
    }

    /// Creates an AND gate
    pub fn and(&self, left: BoolValue, right: BoolValue) -> BoolValue {
        self.and_multi(vec![left, right])
    }

    /// Creates a multi-input AND gate
    pub fn and_multi(&self, mut inputs: Vec<BoolValue>) -> BoolValue {
        if inputs.iter().any(|v| *v == BoolValue::FALSE) {
            return BoolValue::FALSE;
        }
        inputs.retain(|v| *v != BoolValue::TRUE);

        match inputs.len() {
            0 => BoolValue::TRUE,
            1 => inputs[0],
            _ => {
                let labels = inputs.iter().map(BoolValue::label).collect();
                self.gate(CacheKey::And(labels), GateKind::And(inputs))
            }
        }
    }

    /// Creates an OR gate
    pub fn or(&self, left: BoolValue, right: BoolValue) -> BoolValue {
        self.or_multi(vec![left, right])
    }

    /// Creates a multi-input OR gate
    pub fn or_multi(&self, mut inputs: Vec<BoolValue>) -> BoolValue {
        if inputs.iter().any(|v| *v == BoolValue::TRUE) {
            return BoolValue::TRUE;
        }
        inputs.retain(|v| *v != BoolValue::FALSE);

        match inputs.len() {
            0 => BoolValue::FALSE,
            1 => inputs[0],
            _ => {
                let labels = inputs.iter().map(BoolValue::label).collect();
                self.gate(CacheKey::Or(labels), GateKind::Or(inputs))
            }
        }
    }

    /// Creates a NOT gate
    pub fn not(&self, input: BoolValue) -> BoolValue {
        match input {
            BoolValue::Constant(BooleanConstant::TRUE) => BoolValue::FALSE,
            BoolValue::Constant(BooleanConstant::FALSE) => BoolValue::TRUE,
            _ => self.gate(CacheKey::Not(input.label()), GateKind::Not(input)),
        }
    }

    /// Creates an if-then-else gate
    pub fn ite(&self, condition: BoolValue, then_val: BoolValue, else_val: BoolValue) -> BoolValue {
        if let BoolValue::Constant(c) = condition {
            return match c {
                BooleanConstant::TRUE => then_val,
                BooleanConstant::FALSE => else_val,
            };
        }
        if then_val == else_val {
            return then_val;
        }
        // Fold constant branches so gate inputs are never constants.
        match (then_val, else_val) {
            (BoolValue::Constant(BooleanConstant::TRUE), e) => return self.or(condition, e),
            (BoolValue::Constant(BooleanConstant::FALSE), e) => {
                let not_c = self.not(condition);
                return self.and(not_c, e);
            }
            (t, BoolValue::Constant(BooleanConstant::TRUE)) => {
                let not_c = self.not(condition);
                return self.or(not_c, t);
            }
            (t, BoolValue::Constant(BooleanConstant::FALSE)) => return self.and(condition, t),
            _ => {}
        }

        self.gate(
            CacheKey::Ite(condition.label(), then_val.label(), else_val.label()),
            GateKind::Ite {
                condition,
                then_val,
                else_val,
            },
        )
    }

    /// IMPLIES: a IMPLIES b = NOT a OR b
    pub fn implies(&self, a: BoolValue, b: BoolValue) -> BoolValue {
        let not_a = self.not(a);
        self.or(not_a, b)
    }

    /// IFF (if and only if): a IFF b = (a AND b) OR (NOT a AND NOT b)
    pub fn iff(&self, a: BoolValue, b: BoolValue) -> BoolValue {
        let a_and_b = self.and(a, b);
        let not_a = self.not(a);
        let not_b = self.not(b);
        let neither = self.and(not_a, not_b);
        self.or(a_and_b, neither)
    }

    /// XOR: a XOR b = (a AND NOT b) OR (NOT a AND b)
    pub fn xor(&self, a: BoolValue, b: BoolValue) -> BoolValue {
        let not_b = self.not(b);
        let a_not_b = self.and(a, not_b);
        let not_a = self.not(a);
        let not_a_b = self.and(not_a, b);
        self.or(a_not_b, not_a_b)
    }

    /// Full adder sum: a XOR b XOR cin
    pub fn sum(&self, a: BoolValue, b: BoolValue, cin: BoolValue) -> BoolValue {
        let ab = self.xor(a, b);
        self.xor(ab, cin)
    }

    /// Full adder carry out: (a AND b) OR (cin AND (a XOR b))
    pub fn carry(&self, a: BoolValue, b: BoolValue, cin: BoolValue) -> BoolValue {
        let a_and_b = self.and(a, b);
        let ab_xor = self.xor(a, b);
        let cin_and_xor = self.and(cin, ab_xor);
        self.or(a_and_b, cin_and_xor)
    }

    /// Returns the kind and inputs of a gate
    pub(crate) fn gate_kind(&self, gate: GateRef) -> GateKind {
        self.gates.borrow()[gate.index()].clone()
    }

    fn gate(&self, key: CacheKey, kind: GateKind) -> BoolValue {
        if self.options.sharing {
            if let Some(cached) = self.cache.borrow().get(&key) {
                return BoolValue::Formula(*cached);
            }
        }

        let mut gates = self.gates.borrow_mut();
        let gate = GateRef::new(self.allocate_label(), gates.len() as u32);
        gates.push(kind);
        if self.options.sharing {
            self.cache.borrow_mut().insert(key, gate);
        }
        BoolValue::Formula(gate)
    }

    fn allocate_label(&self) -> i32 {
        let label = self.next_label.get();
        self.next_label.set(label + 1);
        label
    }
}
