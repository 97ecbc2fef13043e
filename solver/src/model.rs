use crate::{ColId, ColKind, Direction, RowId, RowSense, StarterSol};
use rustc_hash::FxHashMap;
use std::io::{self, Write};

#[derive(Clone, Debug)]
pub struct ColData {
    pub name: String,
    pub kind: ColKind,
    pub obj: f64,
    pub lb: f64,
    pub ub: f64,
    pub bounded: bool,
}

#[derive(Clone, Debug)]
pub struct RowData {
    pub name: String,
    pub rhs: f64,
    pub sense: RowSense,
}

/// Backend-independent mirror of the model under construction. Columns and
/// rows live in insertion-order vectors; the name map is lookup-only, so
/// emission order never depends on hashing.
pub struct ModelStore {
    pub direction: Direction,
    cols: Vec<ColData>,
    rows: Vec<RowData>,
    entries: Vec<Vec<(RowId, f64)>>,
    by_name: FxHashMap<String, ColId>,
}

impl ModelStore {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            cols: Vec::new(),
            rows: Vec::new(),
            entries: Vec::new(),
            by_name: FxHashMap::default(),
        }
    }

    pub fn num_cols(&self) -> usize {
        self.cols.len()
    }
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn cols(&self) -> &[ColData] {
        &self.cols
    }
    pub fn rows(&self) -> &[RowData] {
        &self.rows
    }
    pub fn col_entries(&self, col: ColId) -> &[(RowId, f64)] {
        &self.entries[col.index()]
    }

    pub fn add_row(&mut self, name: String, rhs: f64, sense: RowSense) -> RowId {
        let id = RowId::from(self.rows.len());
        self.rows.push(RowData { name, rhs, sense });
        id
    }

    pub fn add_col(&mut self, name: String, kind: ColKind, obj: f64) -> ColId {
        let (lb, ub) = match kind {
            ColKind::Bin => (0.0, 1.0),
            ColKind::Int | ColKind::Cont => (0.0, f64::INFINITY),
        };
        self.push_col(name, kind, obj, lb, ub, false)
    }

    pub fn add_bounded_col(
        &mut self,
        name: String,
        kind: ColKind,
        obj: f64,
        lb: f64,
        ub: f64,
    ) -> ColId {
        self.push_col(name, kind, obj, lb, ub, true)
    }

    fn push_col(
        &mut self,
        name: String,
        kind: ColKind,
        obj: f64,
        lb: f64,
        ub: f64,
        bounded: bool,
    ) -> ColId {
        debug_assert!(
            !self.by_name.contains_key(&name),
            "duplicate column `{}`",
            name
        );
        let id = ColId::from(self.cols.len());
        self.by_name.insert(name.clone(), id);
        self.cols.push(ColData {
            name,
            kind,
            obj,
            lb,
            ub,
            bounded,
        });
        self.entries.push(Vec::new());
        id
    }

    pub fn add_entry(&mut self, row: RowId, col: ColId, coef: f64) {
        self.entries[col.index()].push((row, coef));
    }

    pub fn var_by_name(&self, name: &str) -> Option<ColId> {
        self.by_name.get(name).copied()
    }

    /// Free-format MPS. Columns are emitted in insertion order with
    /// INTORG/INTEND markers toggled around integral stretches, so two
    /// identically-built models produce byte-identical files.
    pub fn emit_mps(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "NAME          octomap")?;
        writeln!(w, "ROWS")?;
        writeln!(w, " N  OBJ")?;
        for row in &self.rows {
            let sense = match row.sense {
                RowSense::Fix => "E",
                RowSense::Up => "L",
                RowSense::Lo => "G",
            };
            writeln!(w, " {}  {}", sense, row.name)?;
        }

        writeln!(w, "COLUMNS")?;
        let mut marker = 0usize;
        let mut in_int = false;
        for col in &self.cols {
            let integral = matches!(col.kind, ColKind::Bin | ColKind::Int);
            if integral != in_int {
                let tag = if integral { "'INTORG'" } else { "'INTEND'" };
                writeln!(
                    w,
                    "    MARKER{}                 'MARKER'                 {}",
                    marker, tag
                )?;
                marker += 1;
                in_int = integral;
            }
            writeln!(w, "    {}  OBJ  {}", col.name, col.obj)?;
            let id = self.by_name[&col.name];
            for &(row, coef) in &self.entries[id.index()] {
                writeln!(w, "    {}  {}  {}", col.name, self.rows[row.index()].name, coef)?;
            }
        }
        if in_int {
            writeln!(
                w,
                "    MARKER{}                 'MARKER'                 'INTEND'",
                marker
            )?;
        }

        writeln!(w, "RHS")?;
        for row in &self.rows {
            if row.rhs != 0.0 {
                writeln!(w, "    RHS  {}  {}", row.name, row.rhs)?;
            }
        }

        writeln!(w, "BOUNDS")?;
        for col in &self.cols {
            match col.kind {
                ColKind::Bin => writeln!(w, " BV BND  {}", col.name)?,
                ColKind::Int | ColKind::Cont => {
                    if col.bounded {
                        if col.lb != 0.0 {
                            writeln!(w, " LO BND  {}  {}", col.name, col.lb)?;
                        }
                        writeln!(w, " UP BND  {}  {}", col.name, col.ub)?;
                    }
                }
            }
        }
        writeln!(w, "ENDATA")?;
        Ok(())
    }

    /// MST companion file: one `name value` line per starter entry, in the
    /// starter's (sorted) order.
    pub fn emit_mst(&self, w: &mut dyn Write, starter: &StarterSol) -> io::Result<()> {
        writeln!(w, "# MIP start")?;
        for (name, val) in starter {
            writeln!(w, "{}  {}", name, val)?;
        }
        Ok(())
    }
}
