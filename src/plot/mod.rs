// src/plot/mod.rs
pub mod event;
pub mod imu;
pub mod line;
pub mod nn;
pub use event::{EventLines, EventPlot};
pub use imu::{ImuLine, ImuPlot};
pub use line::{Plot, PlotLine, Primitive, Rgba, Vertex};
pub use nn::{NnLine, NnPlot};
