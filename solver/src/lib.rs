pub mod cbc;
pub mod model;

use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use thiserror::Error;

octomap_common::define_index!(ColId);
octomap_common::define_index!(RowId);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowSense {
    /// Equality.
    Fix,
    /// Upper bound.
    Up,
    /// Lower bound.
    Lo,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColKind {
    Bin,
    Int,
    Cont,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveStatus {
    /// Proven optimal.
    Optim,
    /// A feasible incumbent, stopped by the time budget.
    SuboptimTimeout,
    /// No feasible solution found.
    Inf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Min,
    Max,
}

/// Partial variable assignment handed to the backend as a MIP start, keyed by
/// variable name. Ordered so MST files come out reproducible.
pub type StarterSol = BTreeMap<String, f64>;

#[derive(Debug, Error)]
pub enum SolverError {
    #[error("unknown ILP backend `{0}`")]
    UnknownBackend(String),
}

/// The capability set the optimizer needs from a MILP backend. Construction
/// is incremental (rows, columns, coefficients), variables are addressed by
/// name during constraint assembly, and the finished model can be dumped as
/// MPS/MST independently of solving.
pub trait IlpSolver {
    fn add_row(&mut self, name: String, rhs: f64, sense: RowSense) -> RowId;
    fn add_col(&mut self, name: String, kind: ColKind, obj: f64) -> ColId;
    fn add_bounded_col(
        &mut self,
        name: String,
        kind: ColKind,
        obj: f64,
        lb: f64,
        ub: f64,
    ) -> ColId;
    fn add_col_to_row(&mut self, row: RowId, col: ColId, coef: f64);
    fn get_var_by_name(&self, name: &str) -> Option<ColId>;
    /// Finalises a batch of additions.
    fn update(&mut self);
    fn set_starter(&mut self, starter: &StarterSol);
    fn set_time_lim(&mut self, secs: i64);
    fn set_cache_dir(&mut self, dir: &str);
    fn set_cache_threshold(&mut self, threshold: f64);
    fn set_num_threads(&mut self, n: u32);
    fn solve(&mut self) -> SolveStatus;
    fn get_var_val(&self, col: ColId) -> f64;
    fn get_obj_val(&self) -> f64;
    fn num_cols(&self) -> usize;
    fn num_rows(&self) -> usize;
    fn write_mps(&self, path: &Path) -> io::Result<()>;
    fn write_mst(&self, path: &Path, starter: &StarterSol) -> io::Result<()>;
}

/// Backend picked by tag. An empty tag falls back to CBC.
pub fn by_name(tag: &str, direction: Direction) -> Result<Box<dyn IlpSolver>, SolverError> {
    match tag {
        "" | "cbc" => Ok(Box::new(cbc::CbcSolver::new(direction))),
        other => Err(SolverError::UnknownBackend(other.to_string())),
    }
}
