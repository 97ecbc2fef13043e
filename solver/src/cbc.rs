use crate::model::ModelStore;
use crate::{ColId, ColKind, Direction, IlpSolver, RowId, RowSense, SolveStatus, StarterSol};
use coin_cbc::{Model, Sense};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

/// COIN-OR CBC backend. The model is mirrored in a [`ModelStore`] while it is
/// being assembled and lowered into a `coin_cbc::Model` in one shot when
/// `solve` is called.
pub struct CbcSolver {
    store: ModelStore,
    starter: StarterSol,
    time_lim: Option<i64>,
    num_threads: u32,
    cache_dir: String,
    cache_threshold: f64,
    vals: Vec<f64>,
    obj_val: f64,
}

impl CbcSolver {
    pub fn new(direction: Direction) -> Self {
        Self {
            store: ModelStore::new(direction),
            starter: StarterSol::new(),
            time_lim: None,
            num_threads: 0,
            cache_dir: String::new(),
            cache_threshold: 0.0,
            vals: Vec::new(),
            obj_val: f64::INFINITY,
        }
    }
}

impl IlpSolver for CbcSolver {
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

    fn set_time_lim(&mut self, secs: i64) {
        self.time_lim = Some(secs);
    }

    fn set_cache_dir(&mut self, dir: &str) {
        // Pass-through contract only; CBC has no solution cache.
        self.cache_dir = dir.to_string();
        log::debug!("cache dir `{}` recorded, unused by the CBC backend", dir);
    }

    fn set_cache_threshold(&mut self, threshold: f64) {
        self.cache_threshold = threshold;
    }

    fn set_num_threads(&mut self, n: u32) {
        self.num_threads = n;
    }

    fn solve(&mut self) -> SolveStatus {
        let mut m = Model::default();

        let cols: Vec<coin_cbc::Col> = self
            .store
            .cols()
            .iter()
            .map(|c| {
                let col = m.add_col();
                m.set_obj_coeff(col, c.obj);
                match c.kind {
                    ColKind::Bin => {
                        m.set_binary(col);
                    }
                    ColKind::Int => {
                        m.set_integer(col);
                        m.set_col_lower(col, c.lb);
                        if c.ub.is_finite() {
                            m.set_col_upper(col, c.ub);
                        }
                    }
                    ColKind::Cont => {
                        m.set_col_lower(col, c.lb);
                        if c.ub.is_finite() {
                            m.set_col_upper(col, c.ub);
                        }
                    }
                }
                col
            })
            .collect();

        let rows: Vec<coin_cbc::Row> = self
            .store
            .rows()
            .iter()
            .map(|r| {
                let row = m.add_row();
                match r.sense {
                    RowSense::Fix => {
                        m.set_row_lower(row, r.rhs);
                        m.set_row_upper(row, r.rhs);
                    }
                    RowSense::Up => m.set_row_upper(row, r.rhs),
                    RowSense::Lo => m.set_row_lower(row, r.rhs),
                }
                row
            })
            .collect();

        for ci in 0..self.store.num_cols() {
            for &(row, coef) in self.store.col_entries(ColId::from(ci)) {
                m.set_weight(rows[row.index()], cols[ci], coef);
            }
        }

        m.set_obj_sense(match self.store.direction {
            Direction::Min => Sense::Minimize,
            Direction::Max => Sense::Maximize,
        });

        m.set_parameter("logLevel", "0");
        if let Some(secs) = self.time_lim {
            m.set_parameter("seconds", &secs.to_string());
        }
        if self.num_threads > 0 {
            m.set_parameter("threads", &self.num_threads.to_string());
        }

        let mut hinted = 0usize;
        for (name, val) in &self.starter {
            if let Some(c) = self.store.var_by_name(name) {
                m.set_col_initial_solution(cols[c.index()], *val);
                hinted += 1;
            }
        }
        if hinted > 0 {
            log::debug!("handed {} MIP start values to CBC", hinted);
        }

        let sol = m.solve();
        let raw = sol.raw();

        if raw.is_proven_infeasible() {
            return SolveStatus::Inf;
        }

        let optimal = raw.is_proven_optimal();
        let obj = raw.obj_value();
        // CBC reports a huge placeholder objective when it stopped without
        // ever finding an incumbent.
        if !optimal && !(obj.abs() < 1e40) {
            return SolveStatus::Inf;
        }

        self.vals = cols.iter().map(|&c| sol.col(c)).collect();
        self.obj_val = obj;

        if optimal {
            SolveStatus::Optim
        } else {
            SolveStatus::SuboptimTimeout
        }
    }

    fn get_var_val(&self, col: ColId) -> f64 {
        self.vals.get(col.index()).copied().unwrap_or(0.0)
    }

    fn get_obj_val(&self) -> f64 {
        self.obj_val
    }

    fn num_cols(&self) -> usize {
        self.store.num_cols()
    }

    fn num_rows(&self) -> usize {
        self.store.num_rows()
    }

    fn write_mps(&self, path: &Path) -> io::Result<()> {
        let mut w = BufWriter::new(File::create(path)?);
        self.store.emit_mps(&mut w)
    }

    fn write_mst(&self, path: &Path, starter: &StarterSol) -> io::Result<()> {
        let mut w = BufWriter::new(File::create(path)?);
        self.store.emit_mst(&mut w, starter)
    }
}
