use bathy_grid::prelude::*;
use bathy_grid_examples::{init_tracing, render_polylines_to_png, PolylineStyle, Uniform};
use glam::DVec2;
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // A hull outline digitised around a survey area: an ellipse with a bay cut into one side
    // and half a metre of jitter on every vertex, closed by repeating the first vertex.
    let outline = noisy_outline(2_000, 0xC0FFEE)?;

    let mut kept = Vec::new();
    for tolerance in [1.0, 5.0, 20.0] {
        let mut simplifier = Simplifier::with_capacity(tolerance, outline.len())?;
        let simplified = simplifier.simplify(&outline)?;
        info!(
            "tolerance {:>5.1} m: {} -> {} vertices (closed: {})",
            tolerance,
            outline.len(),
            simplified.len(),
            simplified.is_closed()
        );
        kept.push(simplified);
    }

    // Interior rings are simplified independently of the exterior.
    let islands = vec![
        island(DVec2::new(-80.0, 10.0), 25.0, 400, 7)?,
        island(DVec2::new(60.0, -30.0), 15.0, 300, 8)?,
    ];
    let simplified_islands = simplify_many(&islands, 1.0)?;
    for (before, after) in islands.iter().zip(&simplified_islands) {
        info!("island ring: {} -> {} vertices", before.len(), after.len());
    }

    render_polylines_to_png(
        &[
            (&outline, PolylineStyle::new([200, 200, 200])),
            (&kept[0], PolylineStyle::new([40, 120, 240])),
            (&kept[2], PolylineStyle::new([220, 60, 40]).with_vertex_marker(2)),
            (&islands[0], PolylineStyle::new([200, 200, 200])),
            (&simplified_islands[0], PolylineStyle::new([220, 60, 40]).with_vertex_marker(2)),
            (&islands[1], PolylineStyle::new([200, 200, 200])),
            (&simplified_islands[1], PolylineStyle::new([220, 60, 40]).with_vertex_marker(2)),
        ],
        (1000, 1000),
        "simplify-hull-outline.png",
    )?;
    Ok(())
}

fn noisy_outline(n: usize, seed: u64) -> Result<Polyline> {
    let mut u = Uniform::new(seed);
    let mut vertices: Vec<DVec2> = (0..n)
        .map(|i| {
            let t = i as f64 / n as f64 * std::f64::consts::TAU;
            // Bay between roughly 80 and 100 degrees.
            let bay = 60.0 * (-((t - 1.57) * (t - 1.57)) / 0.02).exp();
            let jitter = DVec2::new(u.range(-0.5, 0.5), u.range(-0.5, 0.5));
            DVec2::new(200.0 * t.cos(), (120.0 - bay) * t.sin()) + jitter
        })
        .collect();
    vertices.push(vertices[0]);
    Polyline::try_new(vertices)
}

fn island(center: DVec2, radius: f64, n: usize, seed: u64) -> Result<Polyline> {
    let mut u = Uniform::new(seed);
    let mut vertices: Vec<DVec2> = (0..n)
        .map(|i| {
            let t = i as f64 / n as f64 * std::f64::consts::TAU;
            let r = radius * (1.0 + 0.15 * (3.0 * t).sin()) + u.range(-0.3, 0.3);
            center + DVec2::new(r * t.cos(), r * t.sin())
        })
        .collect();
    vertices.push(vertices[0]);
    Polyline::try_new(vertices)
}
