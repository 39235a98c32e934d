//! SAT solver capability traits and backend adapters
//!
//! Variables are 1-indexed; literals are signed integers (positive for true,
//! negative for false), matching the DIMACS convention the circuit labels
//! already follow.

use crate::error::{Error, Result};

/// Anything clauses can be streamed into: a solver or a [`crate::cnf::CNF`]
/// container.
pub trait ClauseSink {
    /// Adds a clause; an empty clause makes the formula unsatisfiable
    fn add_clause(&mut self, lits: &[i32]) -> Result<()>;
}

/// Core SAT solver capability
pub trait SatSolver: ClauseSink {
    /// Solves the current clause set
    ///
    /// Returns true if satisfiable, false if unsatisfiable.
    fn solve(&mut self) -> Result<bool>;

    /// Solves the current clause set under the given assumption literals
    fn solve_assuming(&mut self, assumptions: &[i32]) -> Result<bool>;

    /// Returns the number of clauses added
    fn num_clauses(&self) -> u32;
}

/// Adapter that wraps rustsat solvers to implement [`SatSolver`]
///
/// This allows any incremental rustsat-compatible solver to be used as the
/// backend.
///
/// # Example
///
/// ```ignore
/// use rustsat_batsat::BasicSolver;
/// let solver = RustSatAdapter::new(BasicSolver::default());
/// ```
pub struct RustSatAdapter<S> {
    solver: S,
    num_clauses: u32,
}

impl<S> RustSatAdapter<S> {
    /// Creates a new adapter wrapping the given solver
    pub fn new(solver: S) -> Self {
        Self {
            solver,
            num_clauses: 0,
        }
    }
}

fn to_lit(lit: i32) -> Result<rustsat::types::Lit> {
    use rustsat::types::Var;

    debug_assert!(lit != 0, "0 is not a valid literal");
    let var_idx = (lit.unsigned_abs() - 1) as u32;
    if var_idx > Var::MAX_IDX {
        return Err(Error::Solver(format!(
            "variable index {var_idx} exceeds backend maximum {}",
            Var::MAX_IDX
        )));
    }
    let var = Var::new(var_idx);
    Ok(if lit > 0 { var.pos_lit() } else { var.neg_lit() })
}

impl<S: rustsat::solvers::Solve> ClauseSink for RustSatAdapter<S> {
    fn add_clause(&mut self, lits: &[i32]) -> Result<()> {
        use rustsat::types::Clause;

        let lits_vec = lits.iter().map(|&l| to_lit(l)).collect::<Result<Vec<_>>>()?;
        let clause = Clause::from(&lits_vec[..]);
        self.num_clauses += 1;
        self.solver
            .add_clause(clause)
            .map_err(|e| Error::Solver(e.to_string()))
    }
}

impl<S> SatSolver for RustSatAdapter<S>
where
    S: rustsat::solvers::Solve + rustsat::solvers::SolveIncremental,
{
    fn solve(&mut self) -> Result<bool> {
        use rustsat::solvers::SolverResult;

        match self.solver.solve() {
            Ok(SolverResult::Sat) => Ok(true),
            Ok(SolverResult::Unsat) => Ok(false),
            Ok(SolverResult::Interrupted) => Err(Error::Interrupted),
            Err(e) => Err(Error::Solver(e.to_string())),
        }
    }

    fn solve_assuming(&mut self, assumptions: &[i32]) -> Result<bool> {
        use rustsat::solvers::SolverResult;

        let assumps = assumptions
            .iter()
            .map(|&l| to_lit(l))
            .collect::<Result<Vec<_>>>()?;
        match self.solver.solve_assumps(&assumps) {
            Ok(SolverResult::Sat) => Ok(true),
            Ok(SolverResult::Unsat) => Ok(false),
            Ok(SolverResult::Interrupted) => Err(Error::Interrupted),
            Err(e) => Err(Error::Solver(e.to_string())),
        }
    }

    fn num_clauses(&self) -> u32 {
        self.num_clauses
    }
}
