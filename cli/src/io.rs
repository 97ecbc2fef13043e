use anyhow::{anyhow, Context};
use octomap_common::geom::Point;
use octomap_common::graph::{CombEdgeId, CombGraph, CombNodeId};
use octomap_optim::{Drawing, GridGraph, IlpStats};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Deserialize)]
struct GraphFile {
    #[serde(default)]
    lines: Vec<String>,
    nodes: Vec<NodeDef>,
    edges: Vec<EdgeDef>,
}

#[derive(Deserialize)]
struct NodeDef {
    id: String,
    x: f64,
    y: f64,
    /// Neighbour ids in the circular order the drawing must preserve;
    /// defaults to input order.
    #[serde(default)]
    order: Vec<String>,
}

#[derive(Deserialize)]
struct EdgeDef {
    from: String,
    to: String,
    #[serde(default)]
    lines: Vec<String>,
}

pub fn load_graph(path: &str) -> anyhow::Result<(CombGraph, Vec<String>)> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
    let file: GraphFile = serde_json::from_str(&text).with_context(|| format!("parsing {}", path))?;

    let mut cg = CombGraph::new();
    for name in &file.lines {
        cg.add_line(name);
    }

    let mut node_ids: HashMap<String, CombNodeId> = HashMap::new();
    let mut node_names = Vec::with_capacity(file.nodes.len());
    for nd in &file.nodes {
        if node_ids.contains_key(&nd.id) {
            return Err(anyhow!("duplicate node id `{}`", nd.id));
        }
        let id = cg.add_node(Point::new(nd.x, nd.y));
        node_ids.insert(nd.id.clone(), id);
        node_names.push(nd.id.clone());
    }

    for ed in &file.edges {
        let from = *node_ids
            .get(&ed.from)
            .ok_or_else(|| anyhow!("edge references unknown node `{}`", ed.from))?;
        let to = *node_ids
            .get(&ed.to)
            .ok_or_else(|| anyhow!("edge references unknown node `{}`", ed.to))?;
        if from == to {
            return Err(anyhow!("self loop at `{}`", ed.from));
        }
        let lines = ed.lines.iter().map(|l| cg.add_line(l)).collect();
        cg.add_edge(from, to, lines);
    }

    for nd in &file.nodes {
        if nd.order.is_empty() {
            continue;
        }
        let v = node_ids[&nd.id];
        let order: Result<Vec<CombEdgeId>, _> = nd
            .order
            .iter()
            .map(|other| {
                let w = node_ids
                    .get(other)
                    .ok_or_else(|| anyhow!("ordering at `{}` names unknown node `{}`", nd.id, other))?;
                cg.find_edge(v, *w)
                    .ok_or_else(|| anyhow!("ordering at `{}` names non-neighbour `{}`", nd.id, other))
            })
            .collect();
        cg.set_ordering(v, order?).map_err(|e| anyhow!(e))?;
    }

    Ok((cg, node_names))
}

#[derive(Serialize)]
struct DrawingFile {
    stats: StatsOut,
    stations: Vec<StationOut>,
    edges: Vec<EdgeOut>,
}

#[derive(Serialize)]
struct StatsOut {
    score: f64,
    cols: usize,
    rows: usize,
    time_secs: f64,
    optimal: bool,
}

#[derive(Serialize)]
struct StationOut {
    id: String,
    x: f64,
    y: f64,
}

#[derive(Serialize)]
struct EdgeOut {
    from: String,
    to: String,
    lines: Vec<String>,
    path: Vec<[f64; 2]>,
}

pub fn write_drawing(
    path: &str,
    cg: &CombGraph,
    gg: &GridGraph,
    d: &Drawing,
    stats: &IlpStats,
    names: &[String],
) -> anyhow::Result<()> {
    let station_name = |v: CombNodeId| names[v.index()].clone();

    let stations = (0..cg.num_nodes())
        .map(|vi| {
            let v = CombNodeId::from(vi);
            let pos = match d.settled(v) {
                Some(g) => gg.node(g).pos,
                None => cg.node(v).pos,
            };
            StationOut {
                id: station_name(v),
                x: pos.x,
                y: pos.y,
            }
        })
        .collect();

    let edges = (0..cg.num_edges())
        .map(|fi| {
            let f = CombEdgeId::from(fi);
            let fe = cg.edge(f);
            EdgeOut {
                from: station_name(fe.from),
                to: station_name(fe.to),
                lines: fe
                    .lines
                    .iter()
                    .map(|l| cg.line_names[l.index()].clone())
                    .collect(),
                path: d
                    .polyline(f, gg)
                    .into_iter()
                    .map(|p| [p.x, p.y])
                    .collect(),
            }
        })
        .collect();

    let out = DrawingFile {
        stats: StatsOut {
            score: stats.score,
            cols: stats.cols,
            rows: stats.rows,
            time_secs: stats.time.as_secs_f64(),
            optimal: stats.optimal,
        },
        stations,
        edges,
    };

    std::fs::write(path, serde_json::to_string_pretty(&out)?)?;
    Ok(())
}
