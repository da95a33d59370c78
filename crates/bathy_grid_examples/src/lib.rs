#![forbid(unsafe_code)]

mod rendering;
mod synthetic;

pub use rendering::{
    init_tracing, render_color_grid_to_png, render_polylines_to_png, PolylineStyle,
};
pub use synthetic::{seabed_depth, Uniform};
