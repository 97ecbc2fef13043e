use crate::basegrid::GridGraph;
use crate::drawing::Drawing;
use octomap_common::graph::{CombEdgeId, CombGraph};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect as ImageRect;
use std::path::Path;

const LINE_COLORS: [Rgb<u8>; 6] = [
    Rgb([235, 100, 100]),
    Rgb([100, 180, 235]),
    Rgb([120, 220, 120]),
    Rgb([235, 200, 90]),
    Rgb([190, 130, 235]),
    Rgb([240, 150, 200]),
];

/// Debug rendering of the grid and the decoded drawing.
pub fn draw_drawing(gg: &GridGraph, cg: &CombGraph, d: &Drawing, filename: &str, size: u32) {
    if gg.sinks().is_empty() {
        return;
    }
    let mut img = RgbImage::from_pixel(size, size, Rgb([20, 20, 20]));

    let world_w = (gg.width().max(2) - 1) as f64 * gg.cell_size();
    let world_h = (gg.height().max(2) - 1) as f64 * gg.cell_size();
    if world_w <= 0.0 || world_h <= 0.0 {
        return;
    }

    let margin = 40.0;
    let scale = ((size as f64 - 2.0 * margin) / world_w)
        .min((size as f64 - 2.0 * margin) / world_h);

    let origin = gg.node(gg.sinks()[0]).pos;
    let min_x = gg
        .sinks()
        .iter()
        .map(|&s| gg.node(s).pos.x)
        .fold(origin.x, f64::min);
    let min_y = gg
        .sinks()
        .iter()
        .map(|&s| gg.node(s).pos.y)
        .fold(origin.y, f64::min);

    let map = |x: f64, y: f64| {
        (
            (margin + (x - min_x) * scale) as f32,
            (size as f64 - margin - (y - min_y) * scale) as f32,
        )
    };

    let grid_color = Rgb([50, 50, 55]);
    for &s in gg.sinks() {
        let pos = gg.node(s).pos;
        let (x, y) = map(pos.x, pos.y);
        let rect = ImageRect::at(x as i32 - 1, y as i32 - 1).of_size(3, 3);
        draw_filled_rect_mut(&mut img, rect, grid_color);
    }

    for fi in 0..cg.num_edges() {
        let f = CombEdgeId::from(fi);
        let pl = d.polyline(f, gg);
        let color = LINE_COLORS[fi % LINE_COLORS.len()];
        for w in pl.windows(2) {
            let (x1, y1) = map(w[0].x, w[0].y);
            let (x2, y2) = map(w[1].x, w[1].y);
            draw_line_segment_mut(&mut img, (x1, y1), (x2, y2), color);
        }
    }

    let station_color = Rgb([240, 240, 240]);
    for &s in gg.sinks() {
        if !gg.node(s).station {
            continue;
        }
        let pos = gg.node(s).pos;
        let (x, y) = map(pos.x, pos.y);
        let rect = ImageRect::at(x as i32 - 3, y as i32 - 3).of_size(7, 7);
        draw_filled_rect_mut(&mut img, rect, station_color);
    }

    let _ = img.save(Path::new(filename));
}
