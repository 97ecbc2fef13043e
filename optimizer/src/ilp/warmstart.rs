use super::{edg_use_var, stat_pos_var};
use crate::basegrid::{GridEdgeId, GridGraph, MAX_DEG};
use crate::drawing::Drawing;
use octomap_common::graph::{CombEdgeId, CombGraph, CombNodeId};
use octomap_solver::StarterSol;

/// Turns a heuristic drawing into a partial MIP start. Station variables are
/// pinned for every candidate sink of a settled node; major edge variables
/// are zeroed and the heuristic paths written over them. Bend variables along
/// the paths stay unset for the backend to complete. Nodes the heuristic
/// never settled contribute nothing.
pub fn extract_feasible_sol(
    d: &Drawing,
    gg: &GridGraph,
    cg: &CombGraph,
    max_gr_dist: f64,
) -> StarterSol {
    let mut sol = StarterSol::new();
    let max_dis = gg.cell_size() * max_gr_dist;

    for vi in 0..cg.num_nodes() {
        let v = CombNodeId::from(vi);
        if cg.deg(v) == 0 {
            continue;
        }
        let settled = match d.settled(v) {
            Some(g) => g,
            None => continue,
        };

        for &g in gg.sinks() {
            if cg.node(v).pos.dist(&gg.node(g).pos) >= max_dis {
                continue;
            }

            if g == settled {
                sol.insert(stat_pos_var(g, v), 1.0);

                // a settled station reaches its paths through sink edges, so
                // nothing secondary at its ports is in use for its own
                // outgoing comb edges
                for p in 0..MAX_DEG {
                    let port = match gg.node(g).ports[p] {
                        Some(p) => p,
                        None => continue,
                    };
                    for &be in gg.out_edges(port) {
                        let ed = gg.edge(be);
                        if !ed.is_secondary() || ed.is_dead() {
                            continue;
                        }
                        for &ce in &cg.node(v).edges {
                            if cg.edge(ce).from != v {
                                continue;
                            }
                            sol.insert(edg_use_var(gg, be, ce), 0.0);
                        }
                    }
                }
            } else {
                sol.insert(stat_pos_var(g, v), 0.0);

                // an unused candidate activates no sink edge
                for &se in gg.out_edges(g) {
                    if gg.edge(se).is_dead() {
                        continue;
                    }
                    for &ce in &cg.node(v).edges {
                        if cg.edge(ce).from != v {
                            continue;
                        }
                        sol.insert(edg_use_var(gg, se, ce), 0.0);
                    }
                }
            }
        }
    }

    // every major starts unused
    for ei in 0..gg.num_edges() {
        let e = GridEdgeId::from(ei);
        if gg.edge(e).is_secondary() {
            continue;
        }
        for fi in 0..cg.num_edges() {
            sol.insert(edg_use_var(gg, e, CombEdgeId::from(fi)), 0.0);
        }
    }

    // then the heuristic paths go on top
    for fi in 0..cg.num_edges() {
        let f = CombEdgeId::from(fi);
        for &ge in d.edg_path(f) {
            sol.insert(edg_use_var(gg, ge, f), 1.0);
        }
    }

    sol
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basegrid::hanan::tests_support::{small_comb, small_grid};
    use octomap_common::graph::CombEdgeId;

    #[test]
    fn test_starter_pins_settlement_and_paths() {
        let cg = small_comb();
        let gg = small_grid();
        let mut d = Drawing::new(&cg);

        let a = gg.get_node(1, 1).unwrap();
        let b = gg.get_node(2, 1).unwrap();
        let other = gg.get_node(1, 0).unwrap();
        d.set_settled(CombNodeId::from(0), a);
        d.set_settled(CombNodeId::from(1), b);
        let major = gg.get_n_edg(a, b).unwrap();
        d.set_edg_path(CombEdgeId::from(0), vec![major]);

        let sol = extract_feasible_sol(&d, &gg, &cg, 2.0);

        assert_eq!(sol.get(&stat_pos_var(a, CombNodeId::from(0))), Some(&1.0));
        assert_eq!(sol.get(&stat_pos_var(b, CombNodeId::from(1))), Some(&1.0));
        assert_eq!(sol.get(&stat_pos_var(b, CombNodeId::from(0))), Some(&0.0));
        assert_eq!(sol.get(&stat_pos_var(other, CombNodeId::from(0))), Some(&0.0));

        assert_eq!(
            sol.get(&edg_use_var(&gg, major, CombEdgeId::from(0))),
            Some(&1.0),
            "heuristic path edge hinted on"
        );
        let rev = gg.edge(major).reverse;
        assert_eq!(
            sol.get(&edg_use_var(&gg, rev, CombEdgeId::from(0))),
            Some(&0.0),
            "reverse direction stays off"
        );
    }

    #[test]
    fn test_settled_sink_zeroes_its_secondary_out_edges() {
        let cg = small_comb();
        let gg = small_grid();
        let mut d = Drawing::new(&cg);
        let a = gg.get_node(1, 1).unwrap();
        d.set_settled(CombNodeId::from(0), a);

        let sol = extract_feasible_sol(&d, &gg, &cg, 2.0);

        let port = gg.node(a).ports[2].unwrap();
        let bend_target = gg.node(a).ports[0].unwrap();
        let bend = gg.get_edg(port, bend_target).unwrap();
        assert_eq!(
            sol.get(&edg_use_var(&gg, bend, CombEdgeId::from(0))),
            Some(&0.0),
            "bend at a settled station is off for its outgoing edge"
        );
        let back_in = gg.get_edg(port, a).unwrap();
        assert_eq!(
            sol.get(&edg_use_var(&gg, back_in, CombEdgeId::from(0))),
            Some(&0.0),
            "outgoing paths never re-enter their own station"
        );
    }

    #[test]
    fn test_unsettled_nodes_contribute_nothing() {
        let cg = small_comb();
        let gg = small_grid();
        let d = Drawing::new(&cg);

        let sol = extract_feasible_sol(&d, &gg, &cg, 2.0);

        assert!(
            sol.keys().all(|k| k.starts_with("edg(")),
            "only the zeroed majors remain"
        );
        assert!(sol.values().all(|&v| v == 0.0));
    }
}
