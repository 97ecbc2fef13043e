use super::{
    GridEdgeKind, GridGraph, GridNodeData, GridNodeId, MAX_DEG, PORT_DX, PORT_DY, SOFT_INF,
};
use octomap_common::geom::{Point, Rect, SpatialIndex};
use octomap_common::graph::CombGraph;
use octomap_common::util::config::{GridConfig, PenaltyConfig};
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;

impl GridGraph {
    /// Builds the octilinear Hanan grid over `bbox`: the input nodes' cells,
    /// optionally iterated, filled with the rectilinear and the two diagonal
    /// Hanan families, connected along all four line families, with crossing
    /// pairs registered and ports pruned.
    pub fn build(
        cg: &CombGraph,
        bbox: Rect,
        grid_cfg: &GridConfig,
        pens: &PenaltyConfig,
    ) -> GridGraph {
        let cell = grid_cfg.cell_size;
        let window = bbox.size();
        let width = ((window.x / cell).round() as u32 + 1).max(1);
        let height = ((window.y / cell).round() as u32 + 1).max(1);

        let mut g = GridGraph {
            nodes: Vec::new(),
            edges: Vec::new(),
            sinks: Vec::new(),
            nd_idx: vec![0; (width * height) as usize],
            width,
            height,
            cell_size: cell,
            port_offset: grid_cfg.port_offset,
            heur_hop_cost: grid_cfg.heur_hop_cost,
            origin: bbox.min,
            pens: pens.clone(),
            edge_pairs: FxHashMap::default(),
            crossings: Vec::new(),
            res: FxHashMap::default(),
            settled: FxHashMap::default(),
            index: SpatialIndex::new(),
        };

        let mut coords: BTreeSet<(u32, u32)> = cg
            .nodes
            .iter()
            .map(|n| (g.cell_x(n.pos.x), g.cell_y(n.pos.y)))
            .collect();

        for _ in 1..grid_cfg.hanan_iters.max(1) {
            coords = g.iter_coords(&coords);
        }

        for &(x, y) in &coords {
            g.write_nd(x, y);
        }

        if g.sinks.is_empty() {
            return g;
        }

        let diag_fams = (width + height) as usize;
        let mut x_act: Vec<Vec<GridNodeId>> = vec![Vec::new(); width as usize];
        let mut y_act: Vec<Vec<GridNodeId>> = vec![Vec::new(); height as usize];
        let mut xy_act: Vec<Vec<GridNodeId>> = vec![Vec::new(); diag_fams];
        let mut yx_act: Vec<Vec<GridNodeId>> = vec![Vec::new(); diag_fams];

        for &s in &g.sinks.clone() {
            let (x, y) = (g.node(s).cx, g.node(s).cy);
            x_act[x as usize].push(s);
            y_act[y as usize].push(s);
            xy_act[(x + (height - 1 - y)) as usize].push(s);
            yx_act[(x + y) as usize].push(s);
        }

        // rectilinear Hanan positions
        for x in 0..width {
            if x_act[x as usize].is_empty() {
                continue;
            }
            for y in 0..height {
                if y_act[y as usize].is_empty() {
                    continue;
                }
                if g.get_node(x, y).is_some() {
                    continue;
                }
                let nd = g.write_nd(x, y);
                y_act[y as usize].push(nd);
                x_act[x as usize].push(nd);
            }
        }

        // diagonal intersections; existing nodes become breakpoints on the
        // diagonal families they sit on
        for x in 0..width {
            for y in 0..height {
                let xi = (x + (height - 1 - y)) as usize;
                let yi = (y + x) as usize;
                let others = !yx_act[yi].is_empty()
                    || !y_act[y as usize].is_empty()
                    || !x_act[x as usize].is_empty();
                let others_rev = !xy_act[xi].is_empty()
                    || !y_act[y as usize].is_empty()
                    || !x_act[x as usize].is_empty();
                if !((!xy_act[xi].is_empty() && others) || (!yx_act[yi].is_empty() && others_rev))
                {
                    continue;
                }

                let (nd, have) = match g.get_node(x, y) {
                    Some(n) => (n, true),
                    None => (g.write_nd(x, y), false),
                };

                if !xy_act[xi].is_empty() {
                    xy_act[xi].push(nd);
                }
                if !yx_act[yi].is_empty() {
                    yx_act[yi].push(nd);
                }
                if have {
                    continue;
                }
                if !y_act[y as usize].is_empty() {
                    y_act[y as usize].push(nd);
                }
                if !x_act[x as usize].is_empty() {
                    x_act[x as usize].push(nd);
                }
            }
        }

        for fam in x_act.iter_mut() {
            fam.sort_by_key(|&s| g.nodes[s.index()].cy);
        }
        for fam in y_act.iter_mut() {
            fam.sort_by_key(|&s| g.nodes[s.index()].cx);
        }
        for fam in xy_act.iter_mut() {
            fam.sort_by_key(|&s| g.nodes[s.index()].cy);
        }
        for fam in yx_act.iter_mut() {
            fam.sort_by_key(|&s| g.nodes[s.index()].cx);
        }

        for fam in &y_act {
            for i in 1..fam.len() {
                g.connect_nodes(fam[i - 1], fam[i], 2);
            }
        }
        for fam in &x_act {
            for i in 1..fam.len() {
                g.connect_nodes(fam[i - 1], fam[i], 0);
            }
        }
        for fam in &xy_act {
            for i in 1..fam.len() {
                g.connect_nodes(fam[i - 1], fam[i], 1);
            }
        }
        for fam in &yx_act {
            for i in 1..fam.len() {
                g.connect_nodes(fam[i - 1], fam[i], 3);
            }
        }

        g.register_crossings();
        g.prune_ports();
        g.write_initial_costs();

        for &s in &g.sinks.clone() {
            g.index.insert(g.node(s).pos, s.index());
        }

        g
    }

    /// One Hanan iteration over a coordinate set: rectilinear intersections
    /// plus the positions where the two diagonal families meet anything.
    fn iter_coords(&self, in_coords: &BTreeSet<(u32, u32)>) -> BTreeSet<(u32, u32)> {
        let mut ret: BTreeSet<(u32, u32)> = BTreeSet::new();

        let diag_fams = (self.width + self.height) as usize;
        let mut x_act: Vec<Vec<(u32, u32)>> = vec![Vec::new(); self.width as usize];
        let mut y_act: Vec<Vec<(u32, u32)>> = vec![Vec::new(); self.height as usize];
        let mut xy_act: Vec<Vec<(u32, u32)>> = vec![Vec::new(); diag_fams];
        let mut yx_act: Vec<Vec<(u32, u32)>> = vec![Vec::new(); diag_fams];

        for &c in in_coords {
            x_act[c.0 as usize].push(c);
            y_act[c.1 as usize].push(c);
            xy_act[(c.0 + (self.height - 1 - c.1)) as usize].push(c);
            yx_act[(c.0 + c.1) as usize].push(c);
        }

        for x in 0..self.width {
            if x_act[x as usize].is_empty() {
                continue;
            }
            for y in 0..self.height {
                if y_act[y as usize].is_empty() {
                    continue;
                }
                if ret.contains(&(x, y)) {
                    continue;
                }
                ret.insert((x, y));
                y_act[y as usize].push((x, y));
                x_act[x as usize].push((x, y));
            }
        }

        for x in 0..self.width {
            for y in 0..self.height {
                let xi = (x + (self.height - 1 - y)) as usize;
                let yi = (y + x) as usize;
                let others = !yx_act[yi].is_empty()
                    || !y_act[y as usize].is_empty()
                    || !x_act[x as usize].is_empty();
                let others_rev = !xy_act[xi].is_empty()
                    || !y_act[y as usize].is_empty()
                    || !x_act[x as usize].is_empty();
                if (!xy_act[xi].is_empty() && others) || (!yx_act[yi].is_empty() && others_rev) {
                    ret.insert((x, y));
                }
            }
        }

        ret
    }

    /// Creates the sink at cell (x, y) together with its 8 ports, the closed
    /// sink edges and the intra-sink bend edges. Bend edges whose entry port
    /// faces out of the grid are created at the sentinel.
    fn write_nd(&mut self, x: u32, y: u32) -> GridNodeId {
        let xpos = self.origin.x + x as f64 * self.cell_size;
        let ypos = self.origin.y + y as f64 * self.cell_size;

        let n = self.add_node(GridNodeData {
            pos: Point::new(xpos, ypos),
            cx: x,
            cy: y,
            sink: true,
            parent: GridNodeId::from(0),
            ports: [None; MAX_DEG],
            neigh: [None; MAX_DEG],
            station: false,
            settled: false,
            out: Vec::new(),
            inc: Vec::new(),
        });
        self.nodes[n.index()].parent = n;
        self.sinks.push(n);
        self.nd_idx[(x * self.height + y) as usize] = n.0 + 1;

        for i in 0..MAX_DEG {
            let px = xpos + PORT_DX[i] as f64 * self.port_offset;
            let py = ypos + PORT_DY[i] as f64 * self.port_offset;
            let p = self.add_node(GridNodeData {
                pos: Point::new(px, py),
                cx: x,
                cy: y,
                sink: false,
                parent: n,
                ports: [None; MAX_DEG],
                neigh: [None; MAX_DEG],
                station: false,
                settled: false,
                out: Vec::new(),
                inc: Vec::new(),
            });
            self.nodes[n.index()].ports[i] = Some(p);
            self.add_edge_pair(n, p, GridEdgeKind::Sink, i as u8, SOFT_INF);
        }

        for i in 0..MAX_DEG {
            for j in (i + 1)..MAX_DEG {
                let mut pen = self.bend_pen(i, j);
                if x == 0 && (i == 5 || i == 6 || i == 7) {
                    pen = SOFT_INF;
                }
                if y == 0 && (i == 0 || i == 7 || i == 1) {
                    pen = SOFT_INF;
                }
                if x == self.width - 1 && (i == 1 || i == 2 || i == 3) {
                    pen = SOFT_INF;
                }
                if y == self.height - 1 && (i == 3 || i == 4 || i == 5) {
                    pen = SOFT_INF;
                }
                let pi = self.nodes[n.index()].ports[i].unwrap();
                let pj = self.nodes[n.index()].ports[j].unwrap();
                self.add_edge_pair(pi, pj, GridEdgeKind::Bend, 0, pen);
            }
        }

        n
    }

    /// Connects two sinks that are consecutive on a line family with a major
    /// directed pair through the facing ports.
    fn connect_nodes(&mut self, fr: GridNodeId, to: GridNodeId, d: usize) {
        if fr == to {
            return;
        }
        let pf = self.nodes[fr.index()].ports[d].unwrap();
        let pt = self.nodes[to.index()].ports[(d + MAX_DEG / 2) % MAX_DEG].unwrap();
        self.add_edge_pair(pf, pt, GridEdgeKind::Major, d as u8, 0.0);
        self.nodes[fr.index()].neigh[d] = Some(to);
        self.nodes[to.index()].neigh[(d + MAX_DEG / 2) % MAX_DEG] = Some(fr);
    }

    /// Registers every proper interior intersection between an NE-family and
    /// an SE-family segment. Both families are enumerated, so crossings at
    /// unoccupied lattice points between multi-cell segments are caught too;
    /// a meeting at a node shared by the families is not a crossing because
    /// both segments break there.
    fn register_crossings(&mut self) {
        let diag_fams = (self.width + self.height) as usize;
        // constructed SE edges per x + y family, sorted by start abscissa
        let mut se: Vec<Vec<(GridNodeId, GridNodeId)>> = vec![Vec::new(); diag_fams];
        for &s in &self.sinks {
            if let Some(t) = self.nodes[s.index()].neigh[3] {
                let fam = (self.nodes[s.index()].cx + self.nodes[s.index()].cy) as usize;
                se[fam].push((s, t));
            }
        }
        for fam in se.iter_mut() {
            fam.sort_by_key(|&(s, _)| self.nodes[s.index()].cx);
        }

        let sinks = self.sinks.clone();
        for a in sinks {
            let b = match self.nodes[a.index()].neigh[1] {
                Some(b) => b,
                None => continue,
            };
            let (ax, ay) = (
                self.nodes[a.index()].cx as i64,
                self.nodes[a.index()].cy as i64,
            );
            let (bx, by) = (
                self.nodes[b.index()].cx as i64,
                self.nodes[b.index()].cy as i64,
            );
            let ea = match self.get_n_edg(a, b) {
                Some(e) => e,
                None => continue,
            };
            let eb = self.edges[ea.index()].reverse;

            for k2 in (ax + ay + 1)..(bx + by) {
                if k2 < 0 || k2 as usize >= diag_fams {
                    continue;
                }
                // intersection abscissa with the SE family x + y = k2,
                // doubled to stay integral; proper means strictly inside
                // both segments
                let two_x = k2 - (ay - ax);
                let fam = &se[k2 as usize];
                let pos =
                    fam.partition_point(|&(s, _)| (self.nodes[s.index()].cx as i64) * 2 < two_x);
                if pos == 0 {
                    continue;
                }
                let (c, d) = fam[pos - 1];
                if (self.nodes[d.index()].cx as i64) * 2 <= two_x {
                    continue;
                }
                let fa = match self.get_n_edg(c, d) {
                    Some(e) => e,
                    None => continue,
                };
                let fb = self.edges[fa.index()].reverse;

                self.crossings.push(((ea, eb), (fa, fb)));
                self.edge_pairs.entry(ea).or_default().push((fa, fb));
                self.edge_pairs.entry(eb).or_default().push((fa, fb));
                self.edge_pairs.entry(fa).or_default().push((ea, eb));
                self.edge_pairs.entry(fb).or_default().push((ea, eb));
            }
        }
    }

    /// Ports without a major edge die together with their secondary edges.
    fn prune_ports(&mut self) {
        let sinks = self.sinks.clone();
        for s in sinks {
            for d in 0..MAX_DEG {
                if self.nodes[s.index()].neigh[d].is_some() {
                    continue;
                }
                let p = match self.nodes[s.index()].ports[d] {
                    Some(p) => p,
                    None => continue,
                };
                self.nodes[s.index()].ports[d] = None;
                let touching: Vec<_> = self.nodes[p.index()]
                    .out
                    .iter()
                    .chain(self.nodes[p.index()].inc.iter())
                    .copied()
                    .collect();
                for e in touching {
                    self.kill_edge(e);
                }
            }
        }
    }

    /// Lower-bound cost on every major edge: axis penalty times cell length,
    /// with a constant hop rebate so single-cell hops stay attractive.
    fn write_initial_costs(&mut self) {
        let sinks = self.sinks.clone();
        let hop = self.heur_hop_cost;
        for n in sinks {
            for p in 0..MAX_DEG {
                let port = self.nodes[n.index()].ports[p];
                let neighbor = self.nodes[n.index()].neigh[p];
                let (port, neighbor) = match (port, neighbor) {
                    (Some(a), Some(b)) => (a, b),
                    _ => continue,
                };
                let oport = match self.nodes[neighbor.index()].ports[(p + MAX_DEG / 2) % MAX_DEG] {
                    Some(o) => o,
                    None => continue,
                };

                let x_dist =
                    (self.nodes[n.index()].cx as i64 - self.nodes[neighbor.index()].cx as i64)
                        .unsigned_abs() as f64;
                let y_dist =
                    (self.nodes[n.index()].cy as i64 - self.nodes[neighbor.index()].cy as i64)
                        .unsigned_abs() as f64;

                let e = match self.get_edg(port, oport) {
                    Some(e) => e,
                    None => continue,
                };

                let cost = if p % 4 == 0 {
                    (self.pens.vertical + hop) * y_dist - hop
                } else if (p + 2) % 4 == 0 {
                    (self.pens.horizontal + hop) * x_dist - hop
                } else {
                    (self.pens.diagonal + hop) * y_dist - hop
                };
                self.set_cost(e, cost);
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests_support {
    use super::*;
    use octomap_common::geom::Point;

    pub(crate) fn test_pens() -> PenaltyConfig {
        PenaltyConfig {
            horizontal: 1.0,
            vertical: 1.0,
            diagonal: 1.5,
            bend_pens: [0.0, 1.0, 2.0, 3.0],
        }
    }

    pub(crate) fn test_grid_cfg() -> GridConfig {
        GridConfig {
            cell_size: 10.0,
            port_offset: 1.0,
            hanan_iters: 1,
            padding_cells: 1,
            heur_hop_cost: 1.0,
        }
    }

    /// Two stations at (0,0) and (10,0) on a 3x3 cell window.
    pub(crate) fn small_comb() -> CombGraph {
        let mut cg = CombGraph::new();
        let l = cg.add_line("L1");
        let a = cg.add_node(Point::new(0.0, 0.0));
        let b = cg.add_node(Point::new(10.0, 0.0));
        cg.add_edge(a, b, vec![l]);
        cg
    }

    pub(crate) fn small_bbox() -> Rect {
        Rect::span(Point::new(-10.0, -10.0), Point::new(10.0, 10.0))
    }

    pub(crate) fn small_grid() -> GridGraph {
        GridGraph::build(&small_comb(), small_bbox(), &test_grid_cfg(), &test_pens())
    }
}
