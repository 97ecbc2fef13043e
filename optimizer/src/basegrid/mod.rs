pub mod hanan;

use octomap_common::define_index;
use octomap_common::geom::{Point, SpatialIndex};
use octomap_common::graph::{CombEdgeId, CombNodeId};
use octomap_common::util::config::PenaltyConfig;
use rustc_hash::FxHashMap;

define_index!(GridNodeId);
define_index!(GridEdgeId);

/// Finite sentinel for disallowed edges; anything at or above this is treated
/// as not present when the model is built.
pub const SOFT_INF: f64 = 1e12;

/// Ports per sink, one per compass direction, 0 = north, clockwise.
pub const MAX_DEG: usize = 8;

pub(crate) const PORT_DX: [i32; MAX_DEG] = [0, 1, 1, 1, 0, -1, -1, -1];
pub(crate) const PORT_DY: [i32; MAX_DEG] = [1, 1, 0, -1, -1, -1, 0, 1];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridEdgeKind {
    /// Between ports of two different sinks.
    Major,
    /// Sink to one of its own ports.
    Sink,
    /// Port to port within one sink.
    Bend,
}

#[derive(Clone, Debug)]
pub struct GridNodeData {
    pub pos: Point<f64>,
    pub cx: u32,
    pub cy: u32,
    pub sink: bool,
    /// Owning sink; self for sinks.
    pub parent: GridNodeId,
    pub ports: [Option<GridNodeId>; MAX_DEG],
    /// Adjacent sink per direction; sinks only.
    pub neigh: [Option<GridNodeId>; MAX_DEG],
    pub station: bool,
    pub settled: bool,
    out: Vec<GridEdgeId>,
    inc: Vec<GridEdgeId>,
}

#[derive(Clone, Debug)]
pub struct GridEdgeData {
    pub from: GridNodeId,
    pub to: GridNodeId,
    pub kind: GridEdgeKind,
    /// Direction of travel for major edges.
    pub dir: u8,
    pub reverse: GridEdgeId,
    cost: f64,
    base: f64,
    blocked: bool,
    dead: bool,
}

impl GridEdgeData {
    pub fn cost(&self) -> f64 {
        if self.blocked || self.dead {
            SOFT_INF
        } else {
            self.cost
        }
    }

    pub fn is_secondary(&self) -> bool {
        self.kind != GridEdgeKind::Major
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }
}

/// The octilinear base grid: an arena of sinks and ports connected by
/// secondary (sink, bend) and major directed edge pairs. All cross-references
/// are index maps, mutation goes through ids.
pub struct GridGraph {
    nodes: Vec<GridNodeData>,
    edges: Vec<GridEdgeData>,
    sinks: Vec<GridNodeId>,
    /// (x * height + y) -> sink id + 1; 0 = no sink in that cell.
    nd_idx: Vec<u32>,
    width: u32,
    height: u32,
    cell_size: f64,
    port_offset: f64,
    heur_hop_cost: f64,
    origin: Point<f64>,
    pens: PenaltyConfig,
    /// Per diagonal edge, the directed pairs of the diagonals crossing it.
    edge_pairs: FxHashMap<GridEdgeId, Vec<(GridEdgeId, GridEdgeId)>>,
    /// Every geometric crossing once, as two directed pairs.
    crossings: Vec<((GridEdgeId, GridEdgeId), (GridEdgeId, GridEdgeId))>,
    res: FxHashMap<GridEdgeId, Vec<CombEdgeId>>,
    settled: FxHashMap<CombNodeId, GridNodeId>,
    index: SpatialIndex,
}

/// Heading change of a pass entering the cluster at port `i` and leaving at
/// port `j`, in 45 degree steps: 0 for the straight pass through opposite
/// ports, 3 for the sharpest turn between adjacent ports. Indexes the bend
/// penalty table.
pub fn ang(i: usize, j: usize) -> usize {
    let mut a = ((8 + i as i64 - j as i64) % 8 + 4) % 8;
    if a > 4 {
        a = 8 - a;
    }
    (a % 4) as usize
}

impl GridGraph {
    pub fn node(&self, n: GridNodeId) -> &GridNodeData {
        &self.nodes[n.index()]
    }
    pub fn edge(&self, e: GridEdgeId) -> &GridEdgeData {
        &self.edges[e.index()]
    }
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }
    pub fn sinks(&self) -> &[GridNodeId] {
        &self.sinks
    }
    pub fn width(&self) -> u32 {
        self.width
    }
    pub fn height(&self) -> u32 {
        self.height
    }
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }
    pub fn bend_pens(&self) -> [f64; 4] {
        self.pens.bend_pens
    }
    pub fn out_edges(&self, n: GridNodeId) -> &[GridEdgeId] {
        &self.nodes[n.index()].out
    }
    pub fn in_edges(&self, n: GridNodeId) -> &[GridEdgeId] {
        &self.nodes[n.index()].inc
    }
    pub fn crossings(&self) -> &[((GridEdgeId, GridEdgeId), (GridEdgeId, GridEdgeId))] {
        &self.crossings
    }

    pub fn cell_x(&self, x: f64) -> u32 {
        let c = ((x - self.origin.x) / self.cell_size).floor();
        (c.max(0.0) as u32).min(self.width - 1)
    }
    pub fn cell_y(&self, y: f64) -> u32 {
        let c = ((y - self.origin.y) / self.cell_size).floor();
        (c.max(0.0) as u32).min(self.height - 1)
    }

    pub fn get_node(&self, x: u32, y: u32) -> Option<GridNodeId> {
        let a = self.nd_idx[(x * self.height + y) as usize];
        if a == 0 {
            None
        } else {
            Some(GridNodeId(a - 1))
        }
    }

    /// Adjacent sink of `n` in direction `d`.
    pub fn neigh(&self, n: GridNodeId, d: usize) -> Option<GridNodeId> {
        self.nodes[n.index()].neigh[d]
    }

    /// Directed edge from `a` to `b`, if present.
    pub fn get_edg(&self, a: GridNodeId, b: GridNodeId) -> Option<GridEdgeId> {
        self.nodes[a.index()]
            .out
            .iter()
            .copied()
            .find(|&e| self.edges[e.index()].to == b)
    }

    /// Compass direction from sink `a` towards sink `b`.
    pub fn get_dir(&self, a: GridNodeId, b: GridNodeId) -> Option<usize> {
        use std::cmp::Ordering::*;
        let na = &self.nodes[a.index()];
        let nb = &self.nodes[b.index()];
        match (nb.cx.cmp(&na.cx), nb.cy.cmp(&na.cy)) {
            (Equal, Greater) => Some(0),
            (Greater, Greater) => Some(1),
            (Greater, Equal) => Some(2),
            (Greater, Less) => Some(3),
            (Equal, Less) => Some(4),
            (Less, Less) => Some(5),
            (Less, Equal) => Some(6),
            (Less, Greater) => Some(7),
            (Equal, Equal) => None,
        }
    }

    /// The major edge leaving sink `a` towards sink `b`, if the two are
    /// connected neighbours.
    pub fn get_n_edg(&self, a: GridNodeId, b: GridNodeId) -> Option<GridEdgeId> {
        let dir = self.get_dir(a, b)?;
        let pa = self.nodes[a.index()].ports[dir]?;
        let pb = self.nodes[b.index()].ports[(dir + MAX_DEG / 2) % MAX_DEG]?;
        self.get_edg(pa, pb)
    }

    /// Number of live ports; the capacity a sink offers a station.
    pub fn sink_deg(&self, n: GridNodeId) -> usize {
        self.nodes[n.index()].ports.iter().flatten().count()
    }

    /// Incident edges below the sentinel; zero means the node is skipped when
    /// constraints are emitted.
    pub fn non_inf_deg(&self, n: GridNodeId) -> usize {
        let nd = &self.nodes[n.index()];
        nd.inc
            .iter()
            .chain(nd.out.iter())
            .filter(|&&e| self.edges[e.index()].cost() < SOFT_INF)
            .count()
    }

    pub fn bend_pen(&self, i: usize, j: usize) -> f64 {
        self.pens.bend_pens[ang(i, j)]
    }

    /// Candidate sinks for a station at `pos` with the given degree, sorted
    /// by id. The distance cutoff is strict, the degree requirement is that
    /// the sink can fan out at least `deg` edges.
    pub fn candidates(&self, pos: Point<f64>, deg: usize, max_gr_dist: f64) -> Vec<GridNodeId> {
        let max_dis = self.cell_size * max_gr_dist;
        self.index
            .query_within(pos, max_dis)
            .into_iter()
            .map(GridNodeId::from)
            .filter(|&g| self.sink_deg(g) >= deg)
            .collect()
    }

    /// Displacement penalty for hosting a comb node at `g`. Per grid hop this
    /// must exceed any cost a move could save elsewhere, so stations cannot
    /// drift for free.
    pub fn nd_move_pen(&self, comb_pos: Point<f64>, g: GridNodeId) -> f64 {
        // additional penalty per grid move
        let pen = 0.5;

        // a diagonal hop can be substituted by horizontal + 90 degree bend +
        // vertical, an axis hop by the other axis + 45 degree bend + diagonal
        let b = &self.pens.bend_pens;
        let diag_cost = b[0]
            + self
                .pens
                .diagonal
                .min(self.pens.horizontal + self.pens.vertical + b[2]);
        let vert_cost = b[0]
            + self
                .pens
                .vertical
                .min(self.pens.horizontal + self.pens.diagonal + b[1]);
        let hori_cost = b[0]
            + self
                .pens
                .horizontal
                .min(self.pens.vertical + self.pens.diagonal + b[1]);

        let pen_per_grid = pen + diag_cost.max(vert_cost.max(hori_cost));

        let d = comb_pos.dist(&self.nodes[g.index()].pos);
        (d / self.cell_size) * pen_per_grid
    }

    pub fn open_sink_fr(&mut self, n: GridNodeId, cost: f64) {
        let edges: Vec<GridEdgeId> = self.nodes[n.index()].out.clone();
        for e in edges {
            if !self.edges[e.index()].dead {
                self.edges[e.index()].cost = cost;
            }
        }
    }

    pub fn open_sink_to(&mut self, n: GridNodeId, cost: f64) {
        let edges: Vec<GridEdgeId> = self.nodes[n.index()].inc.clone();
        for e in edges {
            if !self.edges[e.index()].dead {
                self.edges[e.index()].cost = cost;
            }
        }
    }

    pub fn close_sink_fr(&mut self, n: GridNodeId) {
        self.open_sink_fr(n, SOFT_INF);
    }

    pub fn close_sink_to(&mut self, n: GridNodeId) {
        self.open_sink_to(n, SOFT_INF);
    }

    /// Restores every bend edge at `n`'s ports to its construction cost.
    pub fn open_turns(&mut self, n: GridNodeId) {
        for e in self.bend_edges(n) {
            self.edges[e.index()].cost = self.edges[e.index()].base;
        }
    }

    /// Raises every bend edge at `n`'s ports to the sentinel.
    pub fn close_turns(&mut self, n: GridNodeId) {
        for e in self.bend_edges(n) {
            self.edges[e.index()].cost = SOFT_INF;
        }
    }

    fn bend_edges(&self, n: GridNodeId) -> Vec<GridEdgeId> {
        let mut out = Vec::new();
        for port in self.nodes[n.index()].ports.iter().flatten() {
            for &e in &self.nodes[port.index()].out {
                let ed = &self.edges[e.index()];
                if ed.kind == GridEdgeKind::Bend && !ed.dead {
                    out.push(e);
                }
            }
        }
        out
    }

    /// Reserves the major edge between sinks `a` and `b` for `ce`: closes all
    /// turns at both endpoints and, on a diagonal, blocks every registered
    /// crossing pair.
    pub fn settle_edg(&mut self, a: GridNodeId, b: GridNodeId, ce: CombEdgeId) {
        if a == b {
            return;
        }
        let ge = self
            .get_n_edg(a, b)
            .expect("settle_edg endpoints are not connected sinks");
        let gf = self.edges[ge.index()].reverse;

        self.res.entry(ge).or_default().push(ce);
        self.res.entry(gf).or_default().push(ce);

        self.close_turns(a);
        self.close_turns(b);

        if self.edges[ge.index()].dir % 2 != 0 {
            if let Some(pairs) = self.edge_pairs.get(&ge).cloned() {
                for (p, q) in pairs {
                    self.edges[p.index()].blocked = true;
                    self.edges[q.index()].blocked = true;
                }
            }
        }
    }

    /// Inverse of [`settle_edg`]: turns reopen only once the endpoint carries
    /// no reservation at all, crossings unblock only when the reservation
    /// count drops to zero.
    pub fn unsettle_edg(&mut self, a: GridNodeId, b: GridNodeId, ce: CombEdgeId) {
        if a == b {
            return;
        }
        let ge = self
            .get_n_edg(a, b)
            .expect("unsettle_edg endpoints are not connected sinks");
        let gf = self.edges[ge.index()].reverse;

        for e in [ge, gf] {
            if let Some(list) = self.res.get_mut(&e) {
                if let Some(pos) = list.iter().position(|&c| c == ce) {
                    list.remove(pos);
                }
                if list.is_empty() {
                    self.res.remove(&e);
                }
            }
        }

        if !self.is_reserved(ge) {
            if !self.nodes[a.index()].settled && self.unused(a) {
                self.open_turns(a);
            }
            if !self.nodes[b.index()].settled && self.unused(b) {
                self.open_turns(b);
            }

            if self.edges[ge.index()].dir % 2 != 0 {
                if let Some(pairs) = self.edge_pairs.get(&ge).cloned() {
                    for (p, q) in pairs {
                        self.edges[p.index()].blocked = false;
                        self.edges[q.index()].blocked = false;
                    }
                }
            }
        }
    }

    pub fn is_reserved(&self, e: GridEdgeId) -> bool {
        self.res.get(&e).is_some_and(|l| !l.is_empty())
    }

    pub fn add_res_edg(&mut self, e: GridEdgeId, ce: CombEdgeId) {
        self.res.entry(e).or_default().push(ce);
    }

    pub fn res_edgs(&self, e: GridEdgeId) -> &[CombEdgeId] {
        self.res.get(&e).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True when no major edge at any of `n`'s ports carries a reservation.
    fn unused(&self, n: GridNodeId) -> bool {
        for port in self.nodes[n.index()].ports.iter().flatten() {
            let pd = &self.nodes[port.index()];
            for &e in pd.out.iter().chain(pd.inc.iter()) {
                if self.edges[e.index()].kind == GridEdgeKind::Major && self.is_reserved(e) {
                    return false;
                }
            }
        }
        true
    }

    pub fn settle_nd(&mut self, v: CombNodeId, g: GridNodeId) {
        self.settled.insert(v, g);
        self.nodes[g.index()].settled = true;
    }

    pub fn get_settled(&self, v: CombNodeId) -> Option<GridNodeId> {
        self.settled.get(&v).copied()
    }

    pub fn set_station(&mut self, g: GridNodeId) {
        self.nodes[g.index()].station = true;
    }

    /// Back to the post-construction state: all costs at their base, nothing
    /// blocked, no reservations, no settlement. Sink edges sit at the
    /// sentinel again (their base), bend edges at their penalties.
    pub fn reset(&mut self) {
        self.res.clear();
        self.settled.clear();
        for e in &mut self.edges {
            e.blocked = false;
            e.cost = e.base;
        }
        for n in &mut self.nodes {
            n.station = false;
            n.settled = false;
        }
    }

    // construction plumbing, used by the builder in `hanan`

    pub(crate) fn add_node(&mut self, data: GridNodeData) -> GridNodeId {
        let id = GridNodeId::from(self.nodes.len());
        self.nodes.push(data);
        id
    }

    pub(crate) fn add_edge_pair(
        &mut self,
        a: GridNodeId,
        b: GridNodeId,
        kind: GridEdgeKind,
        dir: u8,
        cost: f64,
    ) -> (GridEdgeId, GridEdgeId) {
        let e = GridEdgeId::from(self.edges.len());
        self.edges.push(GridEdgeData {
            from: a,
            to: b,
            kind,
            dir,
            reverse: e,
            cost,
            base: cost,
            blocked: false,
            dead: false,
        });
        self.nodes[a.index()].out.push(e);
        self.nodes[b.index()].inc.push(e);

        let f = GridEdgeId::from(self.edges.len());
        self.edges.push(GridEdgeData {
            from: b,
            to: a,
            kind,
            dir: (dir as usize + MAX_DEG / 2) as u8 % MAX_DEG as u8,
            reverse: e,
            cost,
            base: cost,
            blocked: false,
            dead: false,
        });
        self.nodes[b.index()].out.push(f);
        self.nodes[a.index()].inc.push(f);

        self.edges[e.index()].reverse = f;
        (e, f)
    }

    pub(crate) fn set_cost(&mut self, e: GridEdgeId, cost: f64) {
        self.edges[e.index()].cost = cost;
        self.edges[e.index()].base = cost;
    }

    pub(crate) fn kill_edge(&mut self, e: GridEdgeId) {
        self.edges[e.index()].dead = true;
    }
}
