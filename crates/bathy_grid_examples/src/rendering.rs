//! PNG output and logging setup shared by the example binaries.
use std::path::Path;

use anyhow::{anyhow, Context};
use bathy_grid::prelude::{BoundingBox, ColorGrid, Polyline, Rgb};
use glam::DVec2;
use image::imageops::{self, FilterType};
use image::{Rgb as Pixel, RgbImage};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Installs a `fmt` subscriber. `RUST_LOG` overrides the default `info` filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,bathy_grid=info"));
    // A second call (e.g. from a test harness) is harmless.
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}

/// Writes a colour grid as an RGB PNG, each cell scaled up to `cell_pixels` pixels.
pub fn render_color_grid_to_png(
    colors: &ColorGrid,
    nodata_color: Rgb,
    cell_pixels: u32,
    out_path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let out_path = out_path.as_ref();
    let width = u32::try_from(colors.grid.cols).context("grid too wide for a PNG")?;
    let height = u32::try_from(colors.grid.rows).context("grid too tall for a PNG")?;

    let img = RgbImage::from_raw(width, height, colors.to_rgb_bytes(nodata_color))
        .ok_or_else(|| anyhow!("pixel buffer does not match {width}x{height}"))?;

    let scale = cell_pixels.max(1);
    let img = if scale > 1 {
        imageops::resize(&img, width * scale, height * scale, FilterType::Nearest)
    } else {
        img
    };

    img.save(out_path)
        .with_context(|| format!("writing {}", out_path.display()))?;
    info!(
        "Wrote {} ({}x{} cells, {}x{} px).",
        out_path.display(),
        width,
        height,
        img.width(),
        img.height()
    );
    Ok(())
}

/// Stroke colour and vertex marker size for one polyline.
#[derive(Clone, Copy, Debug)]
pub struct PolylineStyle {
    pub color: [u8; 3],
    /// Half-size of the square drawn on each vertex; 0 draws no markers.
    pub vertex_marker: u32,
}

impl PolylineStyle {
    pub fn new(color: [u8; 3]) -> Self {
        Self {
            color,
            vertex_marker: 0,
        }
    }

    pub fn with_vertex_marker(mut self, half_size: u32) -> Self {
        self.vertex_marker = half_size;
        self
    }
}

/// Draws polylines over a white canvas, fitting their joint bounding box into `size`.
pub fn render_polylines_to_png(
    layers: &[(&Polyline, PolylineStyle)],
    size: (u32, u32),
    out_path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let out_path = out_path.as_ref();
    let bbox = BoundingBox::from_points(
        layers
            .iter()
            .flat_map(|(line, _)| line.vertices().iter().copied()),
    )
    .ok_or_else(|| anyhow!("nothing to draw"))?;

    let (w, h) = size;
    let margin = 10.0;
    let span = bbox.width().max(bbox.height()).max(f64::EPSILON);
    let scale = (w.min(h) as f64 - 2.0 * margin) / span;
    let to_pixel = |p: DVec2| -> (i64, i64) {
        let x = margin + (p.x - bbox.x_min) * scale;
        let y = h as f64 - margin - (p.y - bbox.y_min) * scale;
        (x.round() as i64, y.round() as i64)
    };

    let mut img = RgbImage::from_pixel(w, h, Pixel([255, 255, 255]));
    for (line, style) in layers {
        let pixels: Vec<_> = line.vertices().iter().map(|&p| to_pixel(p)).collect();
        for pair in pixels.windows(2) {
            draw_segment(&mut img, pair[0], pair[1], style.color);
        }
        if style.vertex_marker > 0 {
            for &p in &pixels {
                draw_square(&mut img, p, style.vertex_marker as i64, style.color);
            }
        }
    }

    img.save(out_path)
        .with_context(|| format!("writing {}", out_path.display()))?;
    info!("Wrote {} ({}x{} px).", out_path.display(), w, h);
    Ok(())
}

fn put(img: &mut RgbImage, x: i64, y: i64, color: [u8; 3]) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, Pixel(color));
    }
}

// Bresenham.
fn draw_segment(img: &mut RgbImage, a: (i64, i64), b: (i64, i64), color: [u8; 3]) {
    let (mut x, mut y) = a;
    let dx = (b.0 - a.0).abs();
    let dy = -(b.1 - a.1).abs();
    let sx = if a.0 < b.0 { 1 } else { -1 };
    let sy = if a.1 < b.1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put(img, x, y, color);
        if (x, y) == b {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

fn draw_square(img: &mut RgbImage, center: (i64, i64), half: i64, color: [u8; 3]) {
    for y in center.1 - half..=center.1 + half {
        for x in center.0 - half..=center.0 + half {
            put(img, x, y, color);
        }
    }
}
