//! End-to-end runs through the CBC backend: a two-station line, a triangle,
//! an infeasible cutoff, build-only metrics and model reproducibility.

use octomap_common::geom::{Point, Rect};
use octomap_common::graph::CombGraph;
use octomap_common::util::config::{GridConfig, IlpConfig, PenaltyConfig};
use octomap_optim::{check, optimize, Drawing, GridGraph, OptimError};

fn pens() -> PenaltyConfig {
    PenaltyConfig {
        horizontal: 1.0,
        vertical: 1.0,
        diagonal: 1.5,
        bend_pens: [0.0, 1.0, 2.0, 3.0],
    }
}

fn grid_cfg() -> GridConfig {
    GridConfig {
        cell_size: 10.0,
        port_offset: 1.0,
        hanan_iters: 1,
        padding_cells: 1,
        heur_hop_cost: 1.0,
    }
}

fn ilp_cfg() -> IlpConfig {
    IlpConfig {
        max_gr_dist: 2.0,
        time_lim: 60,
        solver: "cbc".to_string(),
        ..IlpConfig::default()
    }
}

fn two_station_line() -> (CombGraph, GridGraph) {
    let mut cg = CombGraph::new();
    let l = cg.add_line("L1");
    let a = cg.add_node(Point::new(0.0, 0.0));
    let b = cg.add_node(Point::new(10.0, 0.0));
    cg.add_edge(a, b, vec![l]);
    let bbox = Rect::span(Point::new(-10.0, -10.0), Point::new(10.0, 10.0));
    let gg = GridGraph::build(&cg, bbox, &grid_cfg(), &pens());
    (cg, gg)
}

#[test]
fn test_two_station_line_is_one_horizontal_hop() {
    let (cg, mut gg) = two_station_line();
    let mut d = Drawing::new(&cg);

    let stats = optimize(&mut gg, &cg, &mut d, &ilp_cfg(), None).unwrap();

    assert!(stats.optimal);
    assert!(
        (stats.score - 1.0).abs() < 1e-6,
        "one horizontal edge, no bends, no displacement; got {}",
        stats.score
    );

    let a = d.settled(octomap_common::graph::CombNodeId::from(0)).unwrap();
    let b = d.settled(octomap_common::graph::CombNodeId::from(1)).unwrap();
    assert_eq!((gg.node(a).cx, gg.node(a).cy), (1, 1));
    assert_eq!((gg.node(b).cx, gg.node(b).cy), (2, 1));

    let path = d.edg_path(octomap_common::graph::CombEdgeId::from(0));
    assert_eq!(path.len(), 1);
    assert_eq!(gg.edge(path[0]).dir % 4, 2, "drawn horizontally");

    check::run(&gg, &cg, &d, &stats, None).unwrap();
}

#[test]
fn test_triangle_solves_and_verifies() {
    let mut cg = CombGraph::new();
    let l = cg.add_line("U1");
    let a = cg.add_node(Point::new(0.0, 0.0));
    let b = cg.add_node(Point::new(10.0, 0.0));
    let c = cg.add_node(Point::new(5.0, 10.0));
    let ab = cg.add_edge(a, b, vec![l]);
    let bc = cg.add_edge(b, c, vec![l]);
    let ca = cg.add_edge(c, a, vec![l]);

    let bbox = Rect::span(Point::new(-10.0, -10.0), Point::new(10.0, 10.0));
    let mut gg = GridGraph::build(&cg, bbox, &grid_cfg(), &pens());
    let mut d = Drawing::new(&cg);

    let stats = optimize(&mut gg, &cg, &mut d, &ilp_cfg(), None).unwrap();

    assert!(stats.optimal);
    for e in [ab, bc, ca] {
        assert!(!d.edg_path(e).is_empty(), "every edge drawn");
    }
    check::run(&gg, &cg, &d, &stats, None).unwrap();
}

#[test]
fn test_tiny_cutoff_is_infeasible() {
    let mut cg = CombGraph::new();
    let l = cg.add_line("L1");
    let a = cg.add_node(Point::new(3.0, 3.0));
    let b = cg.add_node(Point::new(10.0, 0.0));
    cg.add_edge(a, b, vec![l]);
    let bbox = Rect::span(Point::new(-10.0, -10.0), Point::new(10.0, 10.0));
    let mut gg = GridGraph::build(&cg, bbox, &grid_cfg(), &pens());
    let mut d = Drawing::new(&cg);

    let mut cfg = ilp_cfg();
    // no sink within half a cell of the first station
    cfg.max_gr_dist = 0.05;

    let err = optimize(&mut gg, &cg, &mut d, &cfg, None).unwrap_err();
    assert!(matches!(err, OptimError::Infeasible(_)));
    assert!(d.is_empty());
}

#[test]
fn test_no_solve_reports_model_size_only() {
    let (cg, mut gg) = two_station_line();
    let mut d = Drawing::new(&cg);

    let mut cfg = ilp_cfg();
    cfg.no_solve = true;
    let dry = optimize(&mut gg, &cg, &mut d, &cfg, None).unwrap();

    assert!(dry.cols > 0);
    assert!(dry.rows > 0);
    assert!(dry.score.is_infinite());
    assert!(!dry.optimal);
    assert!(d.is_empty(), "build-only leaves the drawing untouched");

    let solved = optimize(&mut gg, &cg, &mut d, &ilp_cfg(), None).unwrap();
    assert_eq!(dry.cols, solved.cols, "dry run sees the full model");
    assert_eq!(dry.rows, solved.rows);
}

#[test]
fn test_model_dump_is_reproducible() {
    let dir = std::env::temp_dir();
    let stem_a = dir.join("octomap_repro_a");
    let stem_b = dir.join("octomap_repro_b");

    for stem in [&stem_a, &stem_b] {
        let (cg, mut gg) = two_station_line();
        let mut d = Drawing::new(&cg);
        let mut cfg = ilp_cfg();
        cfg.no_solve = true;
        cfg.path = stem.to_string_lossy().into_owned();
        optimize(&mut gg, &cg, &mut d, &cfg, None).unwrap();
    }

    let mps_a = std::fs::read(stem_a.with_extension("mps")).unwrap();
    let mps_b = std::fs::read(stem_b.with_extension("mps")).unwrap();
    assert!(!mps_a.is_empty());
    assert_eq!(mps_a, mps_b, "identical inputs must dump identical MPS");

    let mst_a = std::fs::read(stem_a.with_extension("mst")).unwrap();
    let mst_b = std::fs::read(stem_b.with_extension("mst")).unwrap();
    assert_eq!(mst_a, mst_b);
}
