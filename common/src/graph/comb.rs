use crate::geom::point::Point;
use crate::geom::rect::Rect;
use crate::graph::indices::{CombEdgeId, CombNodeId, LineId};
use std::collections::HashMap;

#[derive(Clone, Debug)]
pub struct CombNodeData {
    pub pos: Point<f64>,
    /// Incident edges in circular order. This single list is both the
    /// adjacency and the ordering the drawing must preserve.
    pub edges: Vec<CombEdgeId>,
}

#[derive(Clone, Debug)]
pub struct CombEdgeData {
    pub from: CombNodeId,
    pub to: CombNodeId,
    /// Sorted line bundle carried by this edge.
    pub lines: Vec<LineId>,
}

/// The abstract transit network: stations with an ordered fan of incident
/// edges, edges carrying line bundles. At most one edge per node pair.
pub struct CombGraph {
    pub nodes: Vec<CombNodeData>,
    pub edges: Vec<CombEdgeData>,
    pub line_names: Vec<String>,
    line_name_map: HashMap<String, LineId>,
}

impl CombGraph {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            line_names: Vec::new(),
            line_name_map: HashMap::new(),
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn node(&self, v: CombNodeId) -> &CombNodeData {
        &self.nodes[v.index()]
    }
    pub fn edge(&self, e: CombEdgeId) -> &CombEdgeData {
        &self.edges[e.index()]
    }

    pub fn deg(&self, v: CombNodeId) -> usize {
        self.nodes[v.index()].edges.len()
    }

    pub fn add_node(&mut self, pos: Point<f64>) -> CombNodeId {
        let id = CombNodeId::from(self.nodes.len());
        self.nodes.push(CombNodeData {
            pos,
            edges: Vec::new(),
        });
        id
    }

    pub fn add_line(&mut self, name: &str) -> LineId {
        if let Some(&id) = self.line_name_map.get(name) {
            return id;
        }
        let id = LineId::from(self.line_names.len());
        self.line_names.push(name.to_string());
        self.line_name_map.insert(name.to_string(), id);
        id
    }

    /// Adds an edge between `a` and `b`. The graph is not a multigraph: if an
    /// edge between the pair already exists its id is returned unchanged.
    pub fn add_edge(&mut self, a: CombNodeId, b: CombNodeId, mut lines: Vec<LineId>) -> CombEdgeId {
        if let Some(id) = self.find_edge(a, b) {
            return id;
        }
        lines.sort_unstable();
        lines.dedup();
        let id = CombEdgeId::from(self.edges.len());
        self.edges.push(CombEdgeData { from: a, to: b, lines });
        self.nodes[a.index()].edges.push(id);
        self.nodes[b.index()].edges.push(id);
        id
    }

    pub fn find_edge(&self, a: CombNodeId, b: CombNodeId) -> Option<CombEdgeId> {
        self.nodes[a.index()]
            .edges
            .iter()
            .copied()
            .find(|&e| self.other_nd(e, a) == b)
    }

    pub fn other_nd(&self, e: CombEdgeId, v: CombNodeId) -> CombNodeId {
        let ed = &self.edges[e.index()];
        if ed.from == v { ed.to } else { ed.from }
    }

    /// Replaces the circular ordering at `v`. The new order must be a
    /// permutation of the current incidence list.
    pub fn set_ordering(&mut self, v: CombNodeId, order: Vec<CombEdgeId>) -> Result<(), String> {
        let cur = &self.nodes[v.index()].edges;
        if order.len() != cur.len() {
            return Err(format!(
                "ordering at node {} has {} entries, expected {}",
                v.0,
                order.len(),
                cur.len()
            ));
        }
        let mut a = cur.clone();
        let mut b = order.clone();
        a.sort_unstable();
        b.sort_unstable();
        if a != b {
            return Err(format!("ordering at node {} is not a permutation", v.0));
        }
        self.nodes[v.index()].edges = order;
        Ok(())
    }

    /// Number of lines two edges have in common.
    pub fn shared_lines(&self, a: CombEdgeId, b: CombEdgeId) -> usize {
        let la = &self.edges[a.index()].lines;
        let lb = &self.edges[b.index()].lines;
        let (mut i, mut j, mut n) = (0, 0, 0);
        while i < la.len() && j < lb.len() {
            match la[i].cmp(&lb[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    n += 1;
                    i += 1;
                    j += 1;
                }
            }
        }
        n
    }

    pub fn bbox(&self) -> Rect {
        let mut it = self.nodes.iter();
        let first = match it.next() {
            Some(n) => n.pos,
            None => return Rect::default(),
        };
        let mut bb = Rect::span(first, first);
        for n in it {
            bb.grow(n.pos);
        }
        bb
    }
}

impl Default for CombGraph {
    fn default() -> Self {
        Self::new()
    }
}
