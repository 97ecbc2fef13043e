pub mod basegrid;
pub mod check;
pub mod drawing;
pub mod ilp;
pub mod viz;

use octomap_common::graph::CombEdgeId;
use rustc_hash::FxHashMap;
use thiserror::Error;

pub use basegrid::{GridEdgeId, GridGraph, GridNodeId, SOFT_INF};
pub use drawing::Drawing;
pub use ilp::{optimize, IlpStats};

/// Optional geographic penalty table: per comb edge, a penalty per grid edge
/// id, added to the objective coefficient of non-secondary edge variables.
pub type GeoPensMap = FxHashMap<CombEdgeId, Vec<f64>>;

#[derive(Debug, Error)]
pub enum OptimError {
    /// The backend established infeasibility, or the time budget ran out
    /// before a feasible drawing was found.
    #[error("no solution found for ILP problem ({0})")]
    Infeasible(String),
    #[error(transparent)]
    Solver(#[from] octomap_solver::SolverError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
