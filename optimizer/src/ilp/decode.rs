use super::{edg_use_var, stat_pos_var};
use crate::basegrid::{GridEdgeId, GridGraph, GridNodeId};
use crate::drawing::Drawing;
use octomap_common::graph::{CombEdgeId, CombGraph, CombNodeId};
use octomap_solver::IlpSolver;
use rustc_hash::FxHashSet;

/// Reads the solved assignment back: activated edges and stations first, then
/// a directed walk per comb edge from its source sink to its target sink.
/// The walk must consume every activated edge and end at the target; anything
/// else is a solver or model bug, not an input error.
pub(crate) fn extract_solution(
    lp: &dyn IlpSolver,
    gg: &mut GridGraph,
    cg: &CombGraph,
    d: &mut Drawing,
) {
    let mut grid_edgs: Vec<Vec<GridEdgeId>> = vec![Vec::new(); cg.num_edges()];

    for ei in 0..gg.num_edges() {
        let e = GridEdgeId::from(ei);
        for fi in 0..cg.num_edges() {
            let f = CombEdgeId::from(fi);
            if let Some(col) = lp.get_var_by_name(&edg_use_var(gg, e, f)) {
                if lp.get_var_val(col) > 0.5 {
                    gg.add_res_edg(e, f);
                    grid_edgs[fi].push(e);
                }
            }
        }
    }

    let mut grid_nds: Vec<Option<GridNodeId>> = vec![None; cg.num_nodes()];
    for &g in &gg.sinks().to_vec() {
        for vi in 0..cg.num_nodes() {
            let v = CombNodeId::from(vi);
            if let Some(col) = lp.get_var_by_name(&stat_pos_var(g, v)) {
                if lp.get_var_val(col) > 0.5 {
                    gg.set_station(g);
                    grid_nds[vi] = Some(g);
                }
            }
        }
    }

    for fi in 0..cg.num_edges() {
        let f = CombEdgeId::from(fi);
        let fe = cg.edge(f);

        let start = grid_nds[fe.from.index()]
            .unwrap_or_else(|| panic!("comb edge {} has no settled source sink", fi));
        let end = grid_nds[fe.to.index()]
            .unwrap_or_else(|| panic!("comb edge {} has no settled target sink", fi));

        let mut remaining: FxHashSet<GridEdgeId> = grid_edgs[fi].iter().copied().collect();
        let total = remaining.len();
        let mut path = Vec::with_capacity(total);
        let mut cur = start;

        while cur != end {
            let step = gg
                .out_edges(cur)
                .iter()
                .copied()
                .find(|e| remaining.contains(e));
            let e = match step {
                Some(e) => e,
                None => panic!(
                    "decoder walk for comb edge {} stuck at grid node {}",
                    fi, cur.0
                ),
            };
            remaining.remove(&e);
            path.push(e);
            cur = gg.edge(e).to;
        }

        assert_eq!(
            path.len(),
            total,
            "decoder walk for comb edge {} left {} activated edges unused",
            fi,
            total - path.len()
        );

        d.draw(f, &path, gg);
    }

    for (vi, g) in grid_nds.iter().enumerate() {
        if let Some(g) = g {
            d.set_settled(CombNodeId::from(vi), *g);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests_support::ScriptedSolver;
    use super::super::{edg_use_var, stat_pos_var};
    use super::*;
    use crate::basegrid::hanan::tests_support::{small_comb, small_grid};
    use crate::ilp::build::create_problem;

    #[test]
    fn test_decode_reconstructs_the_path() {
        let cg = small_comb();
        let mut gg = small_grid();
        let mut lp = ScriptedSolver::new();
        create_problem(&mut lp, &mut gg, &cg, None, 2.0);

        let a = gg.get_node(1, 1).unwrap();
        let b = gg.get_node(2, 1).unwrap();
        let ce = CombEdgeId::from(0);

        let major = gg.get_n_edg(a, b).unwrap();
        let leave = gg.get_edg(a, gg.edge(major).from).unwrap();
        let enter = gg.get_edg(gg.edge(major).to, b).unwrap();

        lp.script(&stat_pos_var(a, CombNodeId::from(0)), 1.0);
        lp.script(&stat_pos_var(b, CombNodeId::from(1)), 1.0);
        lp.script(&edg_use_var(&gg, leave, ce), 1.0);
        lp.script(&edg_use_var(&gg, major, ce), 1.0);
        lp.script(&edg_use_var(&gg, enter, ce), 1.0);

        let mut d = Drawing::new(&cg);
        extract_solution(&lp, &mut gg, &cg, &mut d);

        assert_eq!(d.settled(CombNodeId::from(0)), Some(a));
        assert_eq!(d.settled(CombNodeId::from(1)), Some(b));
        assert_eq!(d.edg_path(ce), &[major]);
        assert!(gg.node(a).station);
        assert!(gg.node(b).station);
        assert!(gg.is_reserved(major));
        assert!((d.score() - 1.0).abs() < 1e-9, "0 + 1 + 0 along the walk");
    }

    #[test]
    fn test_decode_walk_handles_a_bend() {
        use crate::basegrid::hanan::tests_support::{test_grid_cfg, test_pens};
        use octomap_common::geom::{Point, Rect};
        use octomap_common::graph::CombGraph;

        // wide enough that the detour sink sits away from every border
        let mut cg = CombGraph::new();
        let l = cg.add_line("L1");
        let a_nd = cg.add_node(Point::new(0.0, 0.0));
        let b_nd = cg.add_node(Point::new(20.0, 0.0));
        cg.add_edge(a_nd, b_nd, vec![l]);
        let bbox = Rect::span(Point::new(-10.0, -20.0), Point::new(30.0, 20.0));
        let mut gg = GridGraph::build(&cg, bbox, &test_grid_cfg(), &test_pens());

        let mut lp = ScriptedSolver::new();
        create_problem(&mut lp, &mut gg, &cg, None, 2.0);

        // detour over (2,3): north-east, 90 degree bend, south-east
        let a = gg.get_node(1, 2).unwrap();
        let b = gg.get_node(3, 2).unwrap();
        let mid = gg.get_node(2, 3).unwrap();
        let ce = CombEdgeId::from(0);

        let up = gg.get_n_edg(a, mid).unwrap();
        let down = gg.get_n_edg(mid, b).unwrap();
        let bend = gg
            .get_edg(gg.edge(up).to, gg.edge(down).from)
            .expect("bend between the north-east entry and the south-east exit");

        let leave = gg.get_edg(a, gg.edge(up).from).unwrap();
        let enter = gg.get_edg(gg.edge(down).to, b).unwrap();

        lp.script(&stat_pos_var(a, CombNodeId::from(0)), 1.0);
        lp.script(&stat_pos_var(b, CombNodeId::from(1)), 1.0);
        for e in [leave, up, bend, down, enter] {
            assert!(
                lp.store.var_by_name(&edg_use_var(&gg, e, ce)).is_some(),
                "scripted edge must exist in the model"
            );
            lp.script(&edg_use_var(&gg, e, ce), 1.0);
        }

        let mut d = Drawing::new(&cg);
        extract_solution(&lp, &mut gg, &cg, &mut d);

        assert_eq!(d.edg_path(ce), &[up, down], "majors only, in walk order");
        // 0 + diagonal 1.5 + 90-degree bend 2 + diagonal 1.5 + 0
        assert!((d.score() - 5.0).abs() < 1e-9);
    }

    #[test]
    #[should_panic(expected = "stuck")]
    fn test_decode_panics_on_disconnected_assignment() {
        let cg = small_comb();
        let mut gg = small_grid();
        let mut lp = ScriptedSolver::new();
        create_problem(&mut lp, &mut gg, &cg, None, 2.0);

        let a = gg.get_node(1, 1).unwrap();
        let b = gg.get_node(2, 1).unwrap();
        lp.script(&stat_pos_var(a, CombNodeId::from(0)), 1.0);
        lp.script(&stat_pos_var(b, CombNodeId::from(1)), 1.0);
        // no edges activated at all: the walk cannot reach the target

        let mut d = Drawing::new(&cg);
        extract_solution(&lp, &mut gg, &cg, &mut d);
    }
}
