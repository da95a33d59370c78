use bathy_grid::prelude::*;
use bathy_grid_examples::{init_tracing, render_color_grid_to_png, seabed_depth, Uniform};
use tracing::info;

/// EMODNET DTM cells are 1/240 of a degree.
const EMODNET_CELL_DEG: f64 = 1.0 / 240.0;
const COLS: usize = 120;
const ROWS: usize = 80;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Rows as exported by the gridded EMODNET product:
    // lon;lat;minimum;maximum;mean;standard_deviation;smoothed
    // Empty fields mean the attribute is absent for that cell.
    let text = emodnet_rows(0xBADC0DE);

    let parser = SampleParser::new(Separator::Char(';'), 5);
    let specs = vec![
        LayerSpec::overwrite("minimum"),
        LayerSpec::overwrite("maximum"),
        LayerSpec::overwrite("mean"),
        LayerSpec::overwrite("standard_deviation"),
        LayerSpec::overwrite("smoothed"),
    ];

    // First pass: extent of the well-formed rows.
    let parsed: Vec<Sample> = text
        .lines()
        .filter_map(|line| parser.parse(line).ok())
        .collect();
    let extent = Extent::from_samples(&parsed);
    let bbox = extent.bbox().ok_or_else(|| anyhow::anyhow!("no rows"))?;

    let config = RasterConfig::new(EMODNET_CELL_DEG);
    let mut product = RasterProduct::from_config(bbox, &config, specs)?;

    // Second pass: bin, collecting every reported event.
    let mut events = VecSink::new();
    for line in text.lines() {
        product.bin_line_with_events(line, &parser, &mut events)?;
    }
    let summary = product.finish_with_events(&mut events);

    for event in events.as_slice() {
        match event {
            RasterEvent::SampleSkipped { line, reason } => {
                info!("skipped {:?}: {}", line.as_deref().unwrap_or(""), reason)
            }
            RasterEvent::ValueOverwritten {
                layer, row, col, ..
            } => {
                let name = product.layer(*layer).map(|l| l.name()).unwrap_or("?");
                info!("duplicate cell ({row}, {col}) in layer {name}");
            }
            _ => {}
        }
    }
    info!("{:?}", summary);

    for layer in product.layers() {
        let (lo, hi) = layer.value_range().unwrap_or((0.0, 0.0));
        info!(
            "{:<20} {:>6} cells, range {:>8.2}..{:>8.2}, ramp {}..{}",
            layer.name(),
            product.grid().len() - layer.empty_cells(),
            lo,
            hi,
            ramp_color(lo, lo, hi),
            ramp_color(hi, lo, hi)
        );
    }

    for name in ["mean", "standard_deviation"] {
        let id = product
            .layer_id(name)
            .ok_or_else(|| anyhow::anyhow!("layer {name} missing"))?;
        let colors = product
            .color_grid(id)
            .ok_or_else(|| anyhow::anyhow!("layer {name} missing"))?;
        render_color_grid_to_png(&colors, Rgb::WHITE, 6, format!("raster-emodnet-{name}.png"))?;
    }

    let scalar = product
        .layer_id("mean")
        .and_then(|id| product.scalar_grid(id))
        .ok_or_else(|| anyhow::anyhow!("layer mean missing"))?;
    let nodata = scalar.values.iter().filter(|&&v| v == scalar.nodata).count();
    info!(
        "mean grid {}x{}, {} nodata cells, geotransform {:?}",
        scalar.grid.rows,
        scalar.grid.cols,
        nodata,
        scalar.grid.geo_transform().to_gdal()
    );
    Ok(())
}

fn emodnet_rows(seed: u64) -> String {
    let mut u = Uniform::new(seed);
    let origin = (2.5, 51.25);
    let mut out = String::new();

    for row in 0..ROWS {
        for col in 0..COLS {
            // Land and survey gaps: no row at all.
            if u.next_unit() < 0.08 {
                continue;
            }
            let lon = origin.0 + col as f64 * EMODNET_CELL_DEG;
            let lat = origin.1 + row as f64 * EMODNET_CELL_DEG;
            let mean = seabed_depth(col as f64 / COLS as f64, row as f64 / ROWS as f64);
            let spread = u.range(0.1, 1.5);
            let stdev = u.range(0.05, 0.6);
            // Sparse cells carry no standard deviation and no smoothed depth.
            let (stdev, smoothed) = if u.next_unit() < 0.2 {
                (String::new(), String::new())
            } else {
                (format!("{stdev:.3}"), format!("{:.2}", mean + u.range(-0.2, 0.2)))
            };
            out.push_str(&format!(
                "{lon:.6};{lat:.6};{:.2};{:.2};{mean:.2};{stdev};{smoothed}\n",
                mean - spread,
                mean + spread,
            ));
        }
    }

    // A re-delivered cell and a few rows damaged in transfer.
    out.push_str(&format!("{:.6};{:.6};-31.00;-29.00;-30.00;0.500;-30.10\n", origin.0, origin.1));
    out.push_str(&format!("{:.6};{:.6};-32.00;-28.00;-30.50;0.700;-30.40\n", origin.0, origin.1));
    out.push_str("2.600000;51.300000;-12.0;-11.0\n");
    out.push_str("2.600000;n/a;-12.0;-11.0;-11.5;0.1;-11.4\n");
    out
}
