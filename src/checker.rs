//! Incremental satisfiability checking
//!
//! [`SatChecker`] wraps one live SAT session pre-loaded with a base formula.
//! Probes are pushed as assumption literals: their Tseitin definitions stream
//! into the solver once (memoized) and stay there as inert definitions, while
//! the assumption stack decides which probe roots are in force for a query.
//! Popping a probe therefore never disturbs the solver's clause set.
//!
//! A checker is `&mut self` throughout; one session serves one logical caller
//! at a time. Callers that need independent concurrent queries use
//! independent one-shot sessions ([`SatChecker::check_once`]).

use crate::bool::{BoolValue, BooleanConstant, BooleanFactory};
use crate::cnf::CnfEmitter;
use crate::error::Result;
use crate::sat::{ClauseSink, RustSatAdapter, SatSolver};
use log::debug;
use rustsat_batsat::BasicSolver;

/// Incremental satisfiability checker over a base formula
pub struct SatChecker<'f> {
    factory: &'f BooleanFactory,
    solver: RustSatAdapter<BasicSolver>,
    emitter: CnfEmitter,
    /// Assumption literal per kept probe; `None` for trivially true probes
    frames: Vec<Option<i32>>,
    /// Lazily allocated always-false literal, for FALSE probes
    falsity: Option<i32>,
}

impl<'f> SatChecker<'f> {
    /// Creates a session pre-loaded with `base`
    ///
    /// The base formula is asserted permanently; every later query checks
    /// satisfiability of the base conjoined with the kept probes.
    pub fn new(factory: &'f BooleanFactory, base: BoolValue) -> Result<Self> {
        let mut checker = Self {
            factory,
            solver: RustSatAdapter::new(BasicSolver::default()),
            emitter: CnfEmitter::new(),
            frames: Vec::new(),
            falsity: None,
        };
        checker
            .emitter
            .assert_value(factory, base, &mut checker.solver)?;
        debug!(
            "session loaded with {} clauses",
            checker.solver.num_clauses()
        );
        Ok(checker)
    }

    /// Checks satisfiability of the base formula and all kept probes
    pub fn is_sat(&mut self) -> Result<bool> {
        self.check()
    }

    /// Checks satisfiability with `probe` temporarily added
    ///
    /// The probe is always popped before returning, so the session state is
    /// unchanged.
    pub fn is_sat_with(&mut self, probe: BoolValue) -> Result<bool> {
        self.push(probe)?;
        let sat = self.check();
        self.pop();
        sat
    }

    /// Checks satisfiability with `probe` added; keeps the probe on the
    /// session iff the result is satisfiable
    ///
    /// Kept probes narrow the scope of all subsequent queries.
    pub fn check_and_keep_if_satisfiable(&mut self, probe: BoolValue) -> Result<bool> {
        self.push(probe)?;
        let sat = self.check()?;
        if !sat {
            self.pop();
        }
        Ok(sat)
    }

    /// One-shot satisfiability check on a disposable session
    pub fn check_once(factory: &BooleanFactory, formula: BoolValue) -> Result<bool> {
        let mut solver = RustSatAdapter::new(BasicSolver::default());
        let mut emitter = CnfEmitter::new();
        emitter.assert_value(factory, formula, &mut solver)?;
        solver.solve()
    }

    fn push(&mut self, probe: BoolValue) -> Result<()> {
        let frame = match probe {
            BoolValue::Constant(BooleanConstant::TRUE) => None,
            BoolValue::Constant(BooleanConstant::FALSE) => Some(self.falsity()?),
            _ => Some(self.emitter.emit(self.factory, probe, &mut self.solver)?),
        };
        self.frames.push(frame);
        Ok(())
    }

    fn pop(&mut self) {
        self.frames.pop();
    }

    fn check(&mut self) -> Result<bool> {
        let assumptions: Vec<i32> = self.frames.iter().filter_map(|f| *f).collect();
        debug!("check with {} assumption(s)", assumptions.len());
        self.solver.solve_assuming(&assumptions)
    }

    fn falsity(&mut self) -> Result<i32> {
        if let Some(lit) = self.falsity {
            return Ok(lit);
        }
        let lit = self.factory.fresh_variable().label();
        self.solver.add_clause(&[-lit])?;
        self.falsity = Some(lit);
        Ok(lit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bool::Options;
    use test_log::test;

    #[test]
    fn trivial_base() {
        let factory = BooleanFactory::new(Options::default());
        let mut checker = SatChecker::new(&factory, factory.constant(true)).unwrap();
        assert!(checker.is_sat().unwrap());

        let mut checker = SatChecker::new(&factory, factory.constant(false)).unwrap();
        assert!(!checker.is_sat().unwrap());
    }

    #[test]
    fn probe_constants() {
        let factory = BooleanFactory::new(Options::default());
        let v = factory.variable("a");
        let mut checker = SatChecker::new(&factory, v).unwrap();

        assert!(checker.is_sat_with(factory.constant(true)).unwrap());
        assert!(!checker.is_sat_with(factory.constant(false)).unwrap());
        // FALSE probe was popped; the session is intact.
        assert!(checker.is_sat().unwrap());
    }

    #[test]
    fn probes_are_popped() {
        let factory = BooleanFactory::new(Options::default());
        let v = factory.variable("a");
        let mut checker = SatChecker::new(&factory, v).unwrap();

        let not_v = factory.not(v);
        assert!(!checker.is_sat_with(not_v).unwrap());
        assert!(checker.is_sat().unwrap());
        assert!(!checker.is_sat_with(not_v).unwrap());
    }

    #[test]
    fn kept_probes_narrow_the_session() {
        let factory = BooleanFactory::new(Options::default());
        let a = factory.variable("a");
        let b = factory.variable("b");
        let base = factory.or(a, b);
        let mut checker = SatChecker::new(&factory, base).unwrap();

        // Keep ¬a; the session now requires b.
        let not_a = factory.not(a);
        assert!(checker.check_and_keep_if_satisfiable(not_a).unwrap());
        let not_b = factory.not(b);
        assert!(!checker.is_sat_with(not_b).unwrap());

        // An unsatisfiable probe is popped again.
        assert!(!checker.check_and_keep_if_satisfiable(a).unwrap());
        assert!(checker.is_sat().unwrap());
    }

    #[test]
    fn check_once_is_stateless() {
        let factory = BooleanFactory::new(Options::default());
        let a = factory.variable("a");
        let not_a = factory.not(a);

        assert!(SatChecker::check_once(&factory, a).unwrap());
        assert!(!SatChecker::check_once(&factory, factory.and(a, not_a)).unwrap());
    }
}
