use rand::Rng;
use std::fs::File;
use std::io::Write;

/// Writes a random transit network as an instance JSON file: a backbone chain
/// of stations with a few chords, lines covering contiguous stretches.
pub fn generate_random_graph(
    filename: &str,
    num_stations: usize,
    num_lines: usize,
) -> std::io::Result<()> {
    let mut file = File::create(filename)?;
    let mut rng = rand::thread_rng();

    let num_stations = num_stations.max(2);
    let num_lines = num_lines.max(1);
    let side = (num_stations as f64).sqrt().ceil() * 300.0;

    log::info!(
        "Generating instance: {} stations, {} lines, area {:.0}x{:.0}",
        num_stations,
        num_lines,
        side,
        side
    );

    let positions: Vec<(f64, f64)> = (0..num_stations)
        .map(|_| (rng.gen_range(0.0..side), rng.gen_range(0.0..side)))
        .collect();

    // Backbone chain plus a few chords; duplicates are fine, the loader
    // collapses them into a single edge.
    let mut edges: Vec<(usize, usize)> = (1..num_stations).map(|i| (i - 1, i)).collect();
    for _ in 0..num_stations / 4 {
        let a = rng.gen_range(0..num_stations);
        let b = rng.gen_range(0..num_stations);
        if a != b && (a as i64 - b as i64).abs() > 1 {
            edges.push((a.min(b), a.max(b)));
        }
    }

    // Each line covers a contiguous stretch of the backbone.
    let mut edge_lines: Vec<Vec<usize>> = vec![Vec::new(); edges.len()];
    for l in 0..num_lines {
        let lo = rng.gen_range(0..num_stations - 1);
        let hi = rng.gen_range(lo + 1..num_stations);
        for (i, &(a, b)) in edges.iter().enumerate() {
            let on_backbone = b == a + 1;
            if on_backbone && a >= lo && b <= hi {
                edge_lines[i].push(l);
            }
        }
    }
    for (i, lines) in edge_lines.iter_mut().enumerate() {
        if lines.is_empty() {
            lines.push(i % num_lines);
        }
    }

    writeln!(file, "{{")?;

    let line_list: Vec<String> = (0..num_lines).map(|l| format!("\"L{}\"", l)).collect();
    writeln!(file, "  \"lines\": [{}],", line_list.join(", "))?;

    writeln!(file, "  \"nodes\": [")?;
    for (i, &(x, y)) in positions.iter().enumerate() {
        let sep = if i + 1 < positions.len() { "," } else { "" };
        writeln!(
            file,
            "    {{\"id\": \"s{}\", \"x\": {:.1}, \"y\": {:.1}}}{}",
            i, x, y, sep
        )?;
    }
    writeln!(file, "  ],")?;

    writeln!(file, "  \"edges\": [")?;
    for (i, &(a, b)) in edges.iter().enumerate() {
        let lines: Vec<String> = edge_lines[i].iter().map(|l| format!("\"L{}\"", l)).collect();
        let sep = if i + 1 < edges.len() { "," } else { "" };
        writeln!(
            file,
            "    {{\"from\": \"s{}\", \"to\": \"s{}\", \"lines\": [{}]}}{}",
            a,
            b,
            lines.join(", "),
            sep
        )?;
    }
    writeln!(file, "  ]")?;
    writeln!(file, "}}")?;
    Ok(())
}
