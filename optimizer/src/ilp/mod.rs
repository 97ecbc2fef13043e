mod build;
mod decode;
mod warmstart;

use crate::basegrid::{GridEdgeId, GridGraph, GridNodeId};
use crate::drawing::Drawing;
use crate::{GeoPensMap, OptimError};
use octomap_common::graph::{CombEdgeId, CombGraph, CombNodeId};
use octomap_common::util::config::IlpConfig;
use octomap_solver::{Direction, SolveStatus};
use std::path::PathBuf;
use std::time::{Duration, Instant};

pub use warmstart::extract_feasible_sol;

/// Outcome of one optimizer run.
#[derive(Clone, Copy, Debug)]
pub struct IlpStats {
    pub score: f64,
    pub cols: usize,
    pub rows: usize,
    pub time: Duration,
    pub optimal: bool,
}

pub(crate) fn stat_pos_var(g: GridNodeId, v: CombNodeId) -> String {
    format!("sp({},{})", g.0, v.0)
}

pub(crate) fn edg_use_var(gg: &GridGraph, e: GridEdgeId, f: CombEdgeId) -> String {
    let ed = gg.edge(e);
    format!("edg({},{},{})", ed.from.0, ed.to.0, f.0)
}

/// Runs the grid-embedding MILP: extracts a warm start from the drawing,
/// resets the grid, builds the model, optionally dumps it, solves within the
/// configured budget and decodes the assignment back into the drawing.
pub fn optimize(
    gg: &mut GridGraph,
    cg: &CombGraph,
    drawing: &mut Drawing,
    cfg: &IlpConfig,
    geo_pens: Option<&GeoPensMap>,
) -> Result<IlpStats, OptimError> {
    let starter = warmstart::extract_feasible_sol(drawing, gg, cg, cfg.max_gr_dist);

    gg.reset();
    drawing.crumble();

    let mut lp = octomap_solver::by_name(&cfg.solver, Direction::Min)?;
    build::create_problem(lp.as_mut(), gg, cg, geo_pens, cfg.max_gr_dist);

    let mut stats = IlpStats {
        score: f64::INFINITY,
        cols: lp.num_cols(),
        rows: lp.num_rows(),
        time: Duration::ZERO,
        optimal: false,
    };
    log::info!("ILP model built: {} cols, {} rows", stats.cols, stats.rows);

    lp.set_starter(&starter);

    if !cfg.path.is_empty() {
        let stem = match cfg.path.rfind('.') {
            Some(p) => &cfg.path[..p],
            None => cfg.path.as_str(),
        };
        lp.write_mst(&PathBuf::from(format!("{}.mst", stem)), &starter)?;
        lp.write_mps(&PathBuf::from(format!("{}.mps", stem)))?;
    }

    if cfg.no_solve {
        return Ok(stats);
    }

    if cfg.time_lim >= 0 {
        lp.set_time_lim(cfg.time_lim);
    }
    if !cfg.cache_dir.is_empty() {
        lp.set_cache_dir(&cfg.cache_dir);
    }
    lp.set_cache_threshold(cfg.cache_threshold);
    if cfg.num_threads != 0 {
        lp.set_num_threads(cfg.num_threads);
    }

    let started = Instant::now();
    let status = lp.solve();
    stats.time = started.elapsed();

    if status == SolveStatus::Inf {
        return Err(OptimError::Infeasible(
            "most likely because of a time limit".to_string(),
        ));
    }

    decode::extract_solution(lp.as_ref(), gg, cg, drawing);

    stats.score = lp.get_obj_val();
    stats.optimal = status == SolveStatus::Optim;

    log::info!(
        "ILP solved in {:.2}s, score {:.4}{}",
        stats.time.as_secs_f64(),
        stats.score,
        if stats.optimal { "" } else { " (timeout, suboptimal)" }
    );

    Ok(stats)
}

#[cfg(test)]
pub(crate) mod tests_support {
    use octomap_solver::model::ModelStore;
    use octomap_solver::{
        ColId, ColKind, Direction, IlpSolver, RowId, RowSense, SolveStatus, StarterSol,
    };
    use rustc_hash::FxHashMap;
    use std::io;
    use std::path::Path;

    /// In-memory backend for builder and decoder tests: records the model,
    /// returns scripted variable values on request.
    pub(crate) struct ScriptedSolver {
        pub store: ModelStore,
        pub vals: FxHashMap<String, f64>,
        pub status: SolveStatus,
        pub obj: f64,
        pub starter: StarterSol,
    }

    impl ScriptedSolver {
        pub(crate) fn new() -> Self {
            Self {
                store: ModelStore::new(Direction::Min),
                vals: FxHashMap::default(),
                status: SolveStatus::Optim,
                obj: 0.0,
                starter: StarterSol::new(),
            }
        }

        pub(crate) fn script(&mut self, name: &str, val: f64) {
            self.vals.insert(name.to_string(), val);
        }
    }

    impl IlpSolver for ScriptedSolver {
        fn add_row(&mut self, name: String, rhs: f64, sense: RowSense) -> RowId {
            self.store.add_row(name, rhs, sense)
        }
        fn add_col(&mut self, name: String, kind: ColKind, obj: f64) -> ColId {
            self.store.add_col(name, kind, obj)
        }
        fn add_bounded_col(
            &mut self,
            name: String,
            kind: ColKind,
            obj: f64,
            lb: f64,
            ub: f64,
        ) -> ColId {
            self.store.add_bounded_col(name, kind, obj, lb, ub)
        }
        fn add_col_to_row(&mut self, row: RowId, col: ColId, coef: f64) {
            self.store.add_entry(row, col, coef);
        }
        fn get_var_by_name(&self, name: &str) -> Option<ColId> {
            self.store.var_by_name(name)
        }
        fn update(&mut self) {}
        fn set_starter(&mut self, starter: &StarterSol) {
            self.starter = starter.clone();
        }
        fn set_time_lim(&mut self, _secs: i64) {}
        fn set_cache_dir(&mut self, _dir: &str) {}
        fn set_cache_threshold(&mut self, _threshold: f64) {}
        fn set_num_threads(&mut self, _n: u32) {}
        fn solve(&mut self) -> SolveStatus {
            self.status
        }
        fn get_var_val(&self, col: ColId) -> f64 {
            let name = &self.store.cols()[col.index()].name;
            self.vals.get(name).copied().unwrap_or(0.0)
        }
        fn get_obj_val(&self) -> f64 {
            self.obj
        }
        fn num_cols(&self) -> usize {
            self.store.num_cols()
        }
        fn num_rows(&self) -> usize {
            self.store.num_rows()
        }
        fn write_mps(&self, _path: &Path) -> io::Result<()> {
            Ok(())
        }
        fn write_mst(&self, _path: &Path, _starter: &StarterSol) -> io::Result<()> {
            Ok(())
        }
    }
}
