use super::line::{LineCore, LineStyle, Plot, PlotLine, Primitive, Rgba};
use crate::drivers::ScrollingBuffer;
/// Scrolling strip chart: each update pushes one value in at the head.
pub struct ImuLine {
    core: LineCore,
    y: ScrollingBuffer<f32>,
}
impl ImuLine {
    pub fn new(
        n_frames: usize,
        width: f32,
        color: Rgba,
        scale: [f32; 3],
        translate: [f32; 3],
        running: bool,
    ) -> Self {
        let style = LineStyle::new(width, color, scale, translate);
        let mut core = LineCore::new(n_frames, style, running, Vec::new());
        let y = ScrollingBuffer::new(n_frames, 0.0);
        core.publish_y(y.iter());
        Self { core, y }
    }
    pub fn start(&mut self) {
        self.core.start();
    }
    pub fn stop(&mut self) {
        self.core.stop();
    }
    pub fn update(&mut self, value: f32) {
        if !self.core.is_running() {
            return;
        }
        self.y.push(value);
        self.core.publish_y(self.y.iter());
    }
    pub fn head(&self) -> Option<f32> {
        self.y.get(0)
    }
}
impl PlotLine for ImuLine {
    fn core(&self) -> &LineCore {
        &self.core
    }
    fn primitive(&self) -> Primitive {
        Primitive::Adjacency
    }
}
pub const ACCEL_X: usize = 0;
pub const ACCEL_Y: usize = 1;
pub const ACCEL_Z: usize = 2;
pub const ACCEL_MAG: usize = 3;
/// Three acceleration axes plus their Euclidean magnitude.
pub struct ImuPlot {
    lines: [ImuLine; 4],
}
impl ImuPlot {
    pub fn new(n_frames: usize) -> Self {
        let axis_scale = [1.0, 1.0 / 12.0, 1.0];
        Self {
            lines: [
                ImuLine::new(n_frames, 0.003, [0.0, 1.0, 1.0, 1.0], axis_scale, [0.0, -7.0 / 12.0, 0.0], false),
                ImuLine::new(n_frames, 0.003, [1.0, 0.0, 1.0, 1.0], axis_scale, [0.0, -9.0 / 12.0, 0.0], false),
                ImuLine::new(n_frames, 0.003, [1.0, 0.6, 0.0, 1.0], axis_scale, [0.0, -11.0 / 12.0, 0.0], false),
                ImuLine::new(n_frames, 0.006, [0.5, 0.5, 0.5, 1.0], [1.0, 1.0 / 3.0, 1.0], [0.0, -6.0 / 12.0, 0.0], false),
            ],
        }
    }
    pub fn update(&mut self, accel: [f32; 3]) {
        let [x, y, z] = accel;
        self.lines[ACCEL_X].update(x);
        self.lines[ACCEL_Y].update(y);
        self.lines[ACCEL_Z].update(z);
        self.lines[ACCEL_MAG].update((x * x + y * y + z * z).sqrt());
    }
    pub fn line(&self, index: usize) -> Option<&ImuLine> {
        self.lines.get(index)
    }
}
impl Plot for ImuPlot {
    fn lines(&self) -> Vec<&dyn PlotLine> {
        self.lines.iter().map(|l| l as &dyn PlotLine).collect()
    }
    fn start(&mut self) {
        self.lines.iter_mut().for_each(ImuLine::start);
    }
    fn stop(&mut self) {
        self.lines.iter_mut().for_each(ImuLine::stop);
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn update_scrolls_each_axis() {
        let mut plot = ImuPlot::new(4);
        plot.start();
        plot.update([1.0, 2.0, 2.0]);
        plot.update([0.0, 3.0, 4.0]);
        let ys: Vec<f32> = plot.lines()[ACCEL_Y].vertices().iter().map(|v| v[1]).collect();
        assert_eq!(ys, vec![3.0, 2.0, 0.0, 0.0]);
        let mag = plot.line(ACCEL_MAG).unwrap();
        assert!((mag.head().unwrap() - 5.0).abs() < 1e-6);
        assert!((mag.vertices()[1][1] - 3.0).abs() < 1e-6);
    }
    #[test]
    fn magnitude_is_euclidean_norm() {
        let mut plot = ImuPlot::new(8);
        plot.start();
        let (x, y, z) = (0.3f32, -1.2f32, 9.81f32);
        plot.update([x, y, z]);
        let expected = (x * x + y * y + z * z).sqrt();
        assert!((plot.line(ACCEL_MAG).unwrap().head().unwrap() - expected).abs() < 1e-5);
    }
    #[test]
    fn stopped_plot_keeps_vertices_bit_for_bit() {
        let mut plot = ImuPlot::new(4);
        plot.start();
        plot.update([1.0, 1.0, 1.0]);
        plot.stop();
        let before: Vec<Vec<[f32; 3]>> = plot.lines().iter().map(|l| l.vertices().to_vec()).collect();
        plot.update([5.0, 5.0, 5.0]);
        let after: Vec<Vec<[f32; 3]>> = plot.lines().iter().map(|l| l.vertices().to_vec()).collect();
        assert_eq!(before, after);
    }
    #[test]
    fn x_layout_is_fixed() {
        let mut plot = ImuPlot::new(3);
        plot.start();
        for i in 0..5 {
            plot.update([i as f32, 0.0, 0.0]);
        }
        let xs: Vec<f32> = plot.lines()[ACCEL_X].vertices().iter().map(|v| v[0]).collect();
        assert_eq!(xs, vec![-1.0, 0.0, 1.0]);
        assert_eq!(plot.lines()[ACCEL_X].primitive(), Primitive::Adjacency);
    }
}
