use crate::basegrid::{GridGraph, MAX_DEG};
use crate::drawing::Drawing;
use crate::ilp::IlpStats;
use crate::GeoPensMap;
use octomap_common::graph::{CombEdgeId, CombGraph, CombNodeId};
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

const SCORE_TOLERANCE: f64 = 1e-6;

/// Re-validates a decoded drawing: unique settlement, edge-disjoint simple
/// paths, stations never passed through, circular orderings with a single
/// wrap, no used crossing pair, and the reported score matching the objective
/// recomputed from the drawing.
pub fn run(
    gg: &GridGraph,
    cg: &CombGraph,
    d: &Drawing,
    stats: &IlpStats,
    geo_pens: Option<&GeoPensMap>,
) -> Result<(), String> {
    log::info!("Starting drawing verification...");
    let mut msgs = Vec::new();

    check_settlement(gg, cg, d, &mut msgs);
    check_paths(gg, cg, d, &mut msgs);
    check_edge_exclusivity(gg, cg, d, &mut msgs);
    check_pass_throughs(gg, cg, d, &mut msgs);
    check_crossings(gg, cg, d, &mut msgs);
    check_orderings(gg, cg, d, &mut msgs);
    check_score(gg, cg, d, stats, geo_pens, &mut msgs);

    if msgs.is_empty() {
        log::info!("\x1b[32mPASS\x1b[0m: drawing is consistent.");
        Ok(())
    } else {
        for m in &msgs {
            log::error!("\x1b[31mFAIL\x1b[0m: {}", m);
        }
        Err(msgs.join("; "))
    }
}

fn check_settlement(gg: &GridGraph, cg: &CombGraph, d: &Drawing, msgs: &mut Vec<String>) {
    let mut hosts: FxHashMap<u32, usize> = FxHashMap::default();
    for vi in 0..cg.num_nodes() {
        let v = CombNodeId::from(vi);
        match d.settled(v) {
            Some(g) => {
                if !gg.node(g).sink {
                    msgs.push(format!("node {} settled on a non-sink", vi));
                }
                *hosts.entry(g.0).or_insert(0) += 1;
            }
            None => {
                if cg.deg(v) > 0 {
                    msgs.push(format!("node {} with degree {} unsettled", vi, cg.deg(v)));
                }
            }
        }
    }
    for (g, n) in hosts {
        if n > 1 {
            msgs.push(format!("sink {} hosts {} stations", g, n));
        }
    }
}

fn check_paths(gg: &GridGraph, cg: &CombGraph, d: &Drawing, msgs: &mut Vec<String>) {
    let failed = AtomicBool::new(false);
    let detail = Mutex::new(String::new());

    (0..cg.num_edges()).into_par_iter().for_each(|fi| {
        if failed.load(Ordering::Relaxed) {
            return;
        }
        let f = CombEdgeId::from(fi);
        let fe = cg.edge(f);
        let path = d.edg_path(f);

        let fail = |msg: String| {
            if !failed.swap(true, Ordering::Relaxed) {
                *detail.lock().unwrap() = msg;
            }
        };

        if path.is_empty() {
            fail(format!("comb edge {} has no path", fi));
            return;
        }

        let (src, dst) = match (d.settled(fe.from), d.settled(fe.to)) {
            (Some(a), Some(b)) => (a, b),
            _ => return,
        };

        if gg.node(gg.edge(path[0]).from).parent != src {
            fail(format!("comb edge {} does not start at its station", fi));
            return;
        }
        if gg.node(gg.edge(*path.last().unwrap()).to).parent != dst {
            fail(format!("comb edge {} does not end at its station", fi));
            return;
        }
        for w in path.windows(2) {
            if gg.node(gg.edge(w[0]).to).parent != gg.node(gg.edge(w[1]).from).parent {
                fail(format!("comb edge {} path is disconnected", fi));
                return;
            }
        }
        let mut seen = FxHashSet::default();
        for &e in path {
            let key = e.min(gg.edge(e).reverse);
            if !seen.insert(key) {
                fail(format!("comb edge {} repeats a grid edge", fi));
                return;
            }
        }
    });

    if failed.load(Ordering::Relaxed) {
        msgs.push(detail.into_inner().unwrap());
    }
}

fn check_edge_exclusivity(gg: &GridGraph, cg: &CombGraph, d: &Drawing, msgs: &mut Vec<String>) {
    let mut use_count = vec![0usize; gg.num_edges()];
    for fi in 0..cg.num_edges() {
        for &e in d.edg_path(CombEdgeId::from(fi)) {
            let key = e.min(gg.edge(e).reverse);
            use_count[key.index()] += 1;
        }
    }
    for (ei, &n) in use_count.iter().enumerate() {
        if n > 1 {
            msgs.push(format!("grid edge {} used by {} comb edges", ei, n));
        }
    }
}

fn check_pass_throughs(gg: &GridGraph, cg: &CombGraph, d: &Drawing, msgs: &mut Vec<String>) {
    for fi in 0..cg.num_edges() {
        let path = d.edg_path(CombEdgeId::from(fi));
        for w in path.windows(2) {
            let mid = gg.node(gg.edge(w[0]).to).parent;
            if gg.node(mid).station {
                msgs.push(format!(
                    "comb edge {} passes through station sink {}",
                    fi, mid.0
                ));
            }
        }
    }
}

fn check_crossings(gg: &GridGraph, cg: &CombGraph, d: &Drawing, msgs: &mut Vec<String>) {
    let mut used = FxHashSet::default();
    for fi in 0..cg.num_edges() {
        for &e in d.edg_path(CombEdgeId::from(fi)) {
            used.insert(e);
        }
    }
    for (k, &((e1, e2), (f1, f2))) in gg.crossings().iter().enumerate() {
        let hits = [e1, e2, f1, f2]
            .iter()
            .filter(|e| used.contains(*e))
            .count();
        if hits > 1 {
            msgs.push(format!("crossing pair {} used {} times", k, hits));
        }
    }
}

fn edge_dir_at(gg: &GridGraph, cg: &CombGraph, d: &Drawing, v: CombNodeId, f: CombEdgeId) -> usize {
    let path = d.edg_path(f);
    if cg.edge(f).from == v {
        gg.edge(path[0]).dir as usize
    } else {
        (gg.edge(*path.last().unwrap()).dir as usize + MAX_DEG / 2) % MAX_DEG
    }
}

fn check_orderings(gg: &GridGraph, cg: &CombGraph, d: &Drawing, msgs: &mut Vec<String>) {
    for vi in 0..cg.num_nodes() {
        let v = CombNodeId::from(vi);
        let deg = cg.deg(v);
        if deg < 3 {
            continue;
        }
        if cg.node(v).edges.iter().any(|&f| d.edg_path(f).is_empty()) {
            continue;
        }

        let dirs: Vec<usize> = cg
            .node(v)
            .edges
            .iter()
            .map(|&f| edge_dir_at(gg, cg, d, v, f))
            .collect();

        let wraps = (0..deg)
            .filter(|&i| dirs[i] >= dirs[(i + 1) % deg])
            .count();
        if wraps != 1 {
            msgs.push(format!(
                "node {} breaks its circular ordering ({:?})",
                vi, dirs
            ));
        }
    }
}

fn check_score(
    gg: &GridGraph,
    cg: &CombGraph,
    d: &Drawing,
    stats: &IlpStats,
    geo_pens: Option<&GeoPensMap>,
    msgs: &mut Vec<String>,
) {
    // the drawing already accumulated every used grid edge's cost; move
    // penalties, geo penalties and bend buckets come on top
    let mut score = d.score();

    for vi in 0..cg.num_nodes() {
        let v = CombNodeId::from(vi);
        if let Some(g) = d.settled(v) {
            score += gg.nd_move_pen(cg.node(v).pos, g);
        }
    }

    if let Some(gp) = geo_pens {
        for fi in 0..cg.num_edges() {
            let f = CombEdgeId::from(fi);
            if let Some(t) = gp.get(&f) {
                for &e in d.edg_path(f) {
                    score += t[e.index()];
                }
            }
        }
    }

    let pens = gg.bend_pens();
    for vi in 0..cg.num_nodes() {
        let v = CombNodeId::from(vi);
        let adj = &cg.node(v).edges;
        for i in 0..adj.len() {
            for j in (i + 1)..adj.len() {
                if cg.shared_lines(adj[i], adj[j]) == 0 {
                    continue;
                }
                if d.edg_path(adj[i]).is_empty() || d.edg_path(adj[j]).is_empty() {
                    continue;
                }
                let da = edge_dir_at(gg, cg, d, v, adj[i]);
                let db = edge_dir_at(gg, cg, d, v, adj[j]);
                let delta = (da + MAX_DEG - db) % MAX_DEG;
                if delta == 0 {
                    continue;
                }
                let k = delta - 1;
                let pp = if k < pens.len() {
                    pens.len() - 1 - k
                } else {
                    k + 1 - pens.len()
                };
                score += pens[pp];
            }
        }
    }

    if (score - stats.score).abs() > SCORE_TOLERANCE {
        msgs.push(format!(
            "reported score {} does not match recomputed objective {}",
            stats.score, score
        ));
    }
}
