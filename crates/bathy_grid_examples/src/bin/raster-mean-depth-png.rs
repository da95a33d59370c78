use bathy_grid::prelude::*;
use bathy_grid_examples::{init_tracing, render_color_grid_to_png, seabed_depth, Uniform};
use glam::DVec2;
use tracing::info;

const SURVEY_POINTS: usize = 400_000;
const MAX_POINTS: usize = 150_000;
const CELL_SIZE_M: f64 = 150.0;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Multibeam-like survey over a quarter-degree box in the southern North Sea.
    let lon = (3.00, 3.25);
    let lat = (51.50, 51.75);
    let mut u = Uniform::new(42);
    let samples: Vec<Sample> = (0..SURVEY_POINTS)
        .map(|_| {
            let (fx, fy) = (u.next_unit(), u.next_unit());
            let position = DVec2::new(lon.0 + fx * (lon.1 - lon.0), lat.0 + fy * (lat.1 - lat.0));
            let noise = u.range(-0.3, 0.3);
            Sample::from_xyz(position.x, position.y, seabed_depth(fx, fy) + noise)
        })
        .collect();

    // Thin the cloud before binning.
    let step = decimation_step(samples.len(), MAX_POINTS);
    let thinned: Vec<&Sample> = decimate(&samples, step).collect();
    info!("Decimated {} samples with step {} to {}.", samples.len(), step, thinned.len());

    let extent = Extent::from_samples(thinned.iter().copied());
    let bbox = extent
        .bbox()
        .ok_or_else(|| anyhow::anyhow!("no samples"))?;
    let (zmin, zmax) = extent
        .value_range()
        .ok_or_else(|| anyhow::anyhow!("no depths"))?;
    let diagonal = distance_on_sphere(bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max);
    info!(
        "Extent {:?}, depth {:.1}..{:.1} m, diagonal {:.0} m.",
        bbox, zmin, zmax, diagonal
    );

    // Square cells in degrees that are CELL_SIZE_M wide at the centre latitude.
    let mid_lat = 0.5 * (bbox.y_min + bbox.y_max);
    let cell = meters_to_degrees(CELL_SIZE_M, mid_lat);
    let config = RasterConfig::new(cell);

    let mut product = RasterProduct::from_config(bbox, &config, vec![LayerSpec::mean("depth")])?;
    let mut sink = FnSink::new(|event| {
        if let RasterEvent::BinningFinished { summary } = event {
            info!("{} of the cells received no sounding.", summary.empty_cells);
        }
    });
    for sample in &thinned {
        product.bin_with_events(sample, &mut sink)?;
    }
    let summary = product.finish_with_events(&mut sink);
    let busiest = product.count_grid().iter().copied().max().unwrap_or(0);
    info!(
        "Binned {} samples; busiest cell holds {} soundings.",
        summary.binned, busiest
    );
    info!("Geotransform {:?}.", product.grid().geo_transform().to_gdal());

    let depth = product
        .layer_id("depth")
        .ok_or_else(|| anyhow::anyhow!("depth layer missing"))?;
    let colors = product
        .color_grid_with_range(depth, zmin, zmax)
        .ok_or_else(|| anyhow::anyhow!("depth layer missing"))?;
    render_color_grid_to_png(&colors, Rgb::BLACK, 4, "raster-mean-depth.png")?;
    Ok(())
}
