use crate::basegrid::{GridEdgeId, GridGraph, GridNodeId};
use octomap_common::geom::Point;
use octomap_common::graph::{CombEdgeId, CombGraph, CombNodeId};

/// A concrete octilinear drawing of the comb graph: per comb edge the ordered
/// major grid edges from its source to its target sink, per comb node the
/// sink hosting it, and the accumulated cost of every grid edge used
/// (secondary ones included).
pub struct Drawing {
    edg_paths: Vec<Vec<GridEdgeId>>,
    nd_pos: Vec<Option<GridNodeId>>,
    score: f64,
}

impl Drawing {
    pub fn new(cg: &CombGraph) -> Self {
        Self {
            edg_paths: vec![Vec::new(); cg.num_edges()],
            nd_pos: vec![None; cg.num_nodes()],
            score: 0.0,
        }
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn is_empty(&self) -> bool {
        self.edg_paths.iter().all(Vec::is_empty) && self.nd_pos.iter().all(Option::is_none)
    }

    /// Forgets everything drawn so far.
    pub fn crumble(&mut self) {
        for p in &mut self.edg_paths {
            p.clear();
        }
        for n in &mut self.nd_pos {
            *n = None;
        }
        self.score = 0.0;
    }

    /// Records the used grid edges of `ce`, in source-to-target order. Costs
    /// of all edges count towards the score; only the majors are kept as the
    /// path.
    pub fn draw(&mut self, ce: CombEdgeId, path: &[GridEdgeId], gg: &GridGraph) {
        let mut majors = Vec::new();
        for &e in path {
            self.score += gg.edge(e).cost();
            if !gg.edge(e).is_secondary() {
                majors.push(e);
            }
        }
        self.edg_paths[ce.index()] = majors;
    }

    /// Installs a pre-existing (heuristic) path without touching the score
    /// bookkeeping of [`draw`].
    pub fn set_edg_path(&mut self, ce: CombEdgeId, path: Vec<GridEdgeId>) {
        self.edg_paths[ce.index()] = path;
    }

    pub fn edg_path(&self, ce: CombEdgeId) -> &[GridEdgeId] {
        &self.edg_paths[ce.index()]
    }

    pub fn set_settled(&mut self, v: CombNodeId, g: GridNodeId) {
        self.nd_pos[v.index()] = Some(g);
    }

    pub fn settled(&self, v: CombNodeId) -> Option<GridNodeId> {
        self.nd_pos[v.index()]
    }

    /// World polyline of a drawn edge: source sink centre, the port chain of
    /// every major hop, target sink centre.
    pub fn polyline(&self, ce: CombEdgeId, gg: &GridGraph) -> Vec<Point<f64>> {
        let path = &self.edg_paths[ce.index()];
        let mut pl = Vec::new();
        if path.is_empty() {
            return pl;
        }
        let first = gg.edge(path[0]);
        pl.push(gg.node(gg.node(first.from).parent).pos);
        for &e in path.iter() {
            pl.push(gg.node(gg.edge(e).from).pos);
            pl.push(gg.node(gg.edge(e).to).pos);
        }
        let last = gg.edge(*path.last().unwrap());
        pl.push(gg.node(gg.node(last.to).parent).pos);
        pl
    }
}
