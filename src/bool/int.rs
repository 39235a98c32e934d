//! Integer terms as bit-vector circuits
//!
//! Represents integers in two's complement over boolean values. Bits are
//! stored in little-endian order (LSB first); reading past the top bit
//! sign-extends. All arithmetic wraps at the owning factory's bitwidth.
//!
//! Division is truncating (rounds toward zero, like Rust's `/`). A zero
//! divisor leaves the quotient completely unconstrained: the circuit muxes in
//! fresh auxiliary bits, matching the SMT convention where `x/0` is some
//! arbitrary value.

use super::{BoolValue, BooleanFactory};

/// An integer as a vector of boolean values (bits) in two's complement form.
/// Bits are indexed from 0 (LSB) to width-1 (sign bit).
#[derive(Clone, Debug)]
pub struct Int {
    bits: Vec<BoolValue>,
}

impl Int {
    /// Creates a new Int with the given bits
    pub fn new(bits: Vec<BoolValue>) -> Self {
        assert!(!bits.is_empty(), "Int must have at least one bit");
        Self { bits }
    }

    /// Creates an Int from a constant value with the given bitwidth
    pub fn constant(value: i32, bitwidth: usize) -> Self {
        let v = value as i64;
        let bits = (0..bitwidth)
            .map(|i| {
                if (v >> i.min(63)) & 1 == 1 {
                    BoolValue::TRUE
                } else {
                    BoolValue::FALSE
                }
            })
            .collect();
        Self { bits }
    }

    /// Creates a 0/1 Int from a boolean value, zero-extended to `bitwidth`
    pub fn from_bool(value: BoolValue, bitwidth: usize) -> Self {
        let mut bits = vec![BoolValue::FALSE; bitwidth];
        bits[0] = value;
        Self { bits }
    }

    /// Returns the number of bits
    pub fn width(&self) -> usize {
        self.bits.len()
    }

    /// Returns the bit at the given index (LSB = 0); sign-extends past the top
    pub fn bit(&self, i: usize) -> BoolValue {
        if i < self.bits.len() {
            self.bits[i]
        } else {
            self.bits[self.bits.len() - 1]
        }
    }

    /// Returns true if all bits are constants
    pub fn is_constant(&self) -> bool {
        self.bits.iter().all(BoolValue::is_constant)
    }

    /// If constant, returns the value
    pub fn value(&self) -> Option<i32> {
        if !self.is_constant() {
            return None;
        }
        let mut result: i64 = 0;
        for (i, bit) in self.bits.iter().enumerate() {
            if *bit == BoolValue::TRUE {
                result |= 1 << i;
            }
        }
        // Interpret the top bit as the sign.
        if self.bits[self.bits.len() - 1] == BoolValue::TRUE && self.bits.len() < 64 {
            result -= 1 << self.bits.len();
        }
        Some(result as i32)
    }

    /// Equality comparison circuit
    pub fn eq(&self, other: &Int, factory: &BooleanFactory) -> BoolValue {
        let width = self.width().max(other.width());
        let mut comparisons = Vec::with_capacity(width);

        for i in 0..width {
            let cmp = factory.iff(self.bit(i), other.bit(i));
            if cmp == BoolValue::FALSE {
                return BoolValue::FALSE;
            }
            comparisons.push(cmp);
        }

        factory.and_multi(comparisons)
    }

    /// Less-than-or-equal comparison circuit (two's complement)
    ///
    /// Ripple comparator from the sign bit down.
    pub fn lte(&self, other: &Int, factory: &BooleanFactory) -> BoolValue {
        let width = self.width().max(other.width());
        let last = width - 1;
        let mut constraints = Vec::new();

        // If other is negative, self must be negative.
        constraints.push(factory.implies(other.bit(last), self.bit(last)));

        let mut prev_equal = factory.iff(self.bit(last), other.bit(last));
        for i in (0..last).rev() {
            let v0 = self.bit(i);
            let v1 = other.bit(i);

            let v0_implies_v1 = factory.implies(v0, v1);
            constraints.push(factory.implies(prev_equal, v0_implies_v1));

            let here_equal = factory.iff(v0, v1);
            prev_equal = factory.and(prev_equal, here_equal);
        }

        factory.and_multi(constraints)
    }

    /// Less-than comparison circuit: `a < b` iff `a <= b` and `a != b`
    pub fn lt(&self, other: &Int, factory: &BooleanFactory) -> BoolValue {
        let leq = self.lte(other, factory);
        let eq = self.eq(other, factory);
        let not_eq = factory.not(eq);
        factory.and(leq, not_eq)
    }

    /// Greater-than comparison circuit
    pub fn gt(&self, other: &Int, factory: &BooleanFactory) -> BoolValue {
        other.lt(self, factory)
    }

    /// Greater-than-or-equal comparison circuit
    pub fn gte(&self, other: &Int, factory: &BooleanFactory) -> BoolValue {
        other.lte(self, factory)
    }

    /// Addition circuit (full-adder chain)
    pub fn plus(&self, other: &Int, factory: &BooleanFactory) -> Int {
        let width = (self.width().max(other.width()) + 1).min(factory.bitwidth());
        let mut result_bits = Vec::with_capacity(width);
        let mut carry = BoolValue::FALSE;

        for i in 0..width {
            let v0 = self.bit(i);
            let v1 = other.bit(i);
            result_bits.push(factory.sum(v0, v1, carry));
            carry = factory.carry(v0, v1, carry);
        }

        Int::new(result_bits)
    }

    /// Subtraction circuit: `a - b = a + ~b + 1`
    pub fn minus(&self, other: &Int, factory: &BooleanFactory) -> Int {
        let width = (self.width().max(other.width()) + 1).min(factory.bitwidth());
        let mut result_bits = Vec::with_capacity(width);
        let mut carry = BoolValue::TRUE;

        for i in 0..width {
            let v0 = self.bit(i);
            let v1_neg = factory.not(other.bit(i));
            result_bits.push(factory.sum(v0, v1_neg, carry));
            carry = factory.carry(v0, v1_neg, carry);
        }

        Int::new(result_bits)
    }

    /// Multiplication circuit (shift-and-add), wrapping at the factory bitwidth
    pub fn times(&self, other: &Int, factory: &BooleanFactory) -> Int {
        let width = factory.bitwidth();
        let mut acc = Int::constant(0, width);

        for i in 0..width {
            let gate = self.bit(i);
            if gate == BoolValue::FALSE {
                continue;
            }
            // Partial product: other shifted left by i, masked by bit i.
            let bits = (0..width)
                .map(|j| {
                    if j < i {
                        BoolValue::FALSE
                    } else {
                        factory.and(gate, other.bit(j - i))
                    }
                })
                .collect();
            acc = acc.plus(&Int::new(bits), factory);
        }

        acc
    }

    /// Division circuit (restoring long division), truncating toward zero
    ///
    /// A zero divisor leaves the quotient unconstrained via fresh auxiliary
    /// bits.
    pub fn div(&self, other: &Int, factory: &BooleanFactory) -> Int {
        let width = factory.bitwidth();
        let dividend = self.abs(factory);
        let divisor = other.abs(factory);

        // Work two bits wider so the running remainder never wraps and the
        // signed comparator sees non-negative operands.
        let ext = width + 2;
        let divisor_ext: Vec<BoolValue> = (0..ext)
            .map(|i| if i < width { divisor.bit(i) } else { BoolValue::FALSE })
            .collect();

        let mut rem = vec![BoolValue::FALSE; ext];
        let mut quotient = vec![BoolValue::FALSE; width];

        for i in (0..width).rev() {
            // rem = (rem << 1) | dividend[i]
            let mut shifted = Vec::with_capacity(ext);
            shifted.push(dividend.bit(i));
            shifted.extend_from_slice(&rem[..ext - 1]);
            rem = shifted;

            let fits = Int::new(divisor_ext.clone()).lte(&Int::new(rem.clone()), factory);
            let reduced = sub_fixed(&rem, &divisor_ext, factory);
            rem = (0..ext)
                .map(|j| factory.ite(fits, reduced[j], rem[j]))
                .collect();
            quotient[i] = fits;
        }

        let magnitude = Int::new(quotient);
        let negated = magnitude.negate(factory);
        let negative = factory.xor(self.bit(self.width() - 1), other.bit(other.width() - 1));
        let signed: Vec<BoolValue> = (0..width)
            .map(|j| factory.ite(negative, negated.bit(j), magnitude.bit(j)))
            .collect();

        let some_divisor_bit =
            factory.or_multi((0..other.width()).map(|i| other.bit(i)).collect());
        let divisor_is_zero = factory.not(some_divisor_bit);
        if divisor_is_zero == BoolValue::FALSE {
            return Int::new(signed);
        }
        let bits = signed
            .into_iter()
            .map(|bit| factory.ite(divisor_is_zero, factory.fresh_variable(), bit))
            .collect();

        Int::new(bits)
    }

    /// Absolute value circuit
    pub fn abs(&self, factory: &BooleanFactory) -> Int {
        let sign_bit = self.bit(self.width() - 1);
        let negated = self.negate(factory);

        let bits = (0..self.width())
            .map(|i| factory.ite(sign_bit, negated.bit(i), self.bit(i)))
            .collect();
        Int::new(bits)
    }

    /// Two's complement negation: `~x + 1`
    pub fn negate(&self, factory: &BooleanFactory) -> Int {
        let ones = Int::new(self.bits.iter().map(|b| factory.not(*b)).collect());
        let one = Int::new(vec![BoolValue::TRUE]);
        ones.plus(&one, factory)
    }
}

/// Width-preserving subtraction used by the division loop
fn sub_fixed(a: &[BoolValue], b: &[BoolValue], factory: &BooleanFactory) -> Vec<BoolValue> {
    let mut result = Vec::with_capacity(a.len());
    let mut carry = BoolValue::TRUE;
    for i in 0..a.len() {
        let b_neg = factory.not(b[i]);
        result.push(factory.sum(a[i], b_neg, carry));
        carry = factory.carry(a[i], b_neg, carry);
    }
    result
}
