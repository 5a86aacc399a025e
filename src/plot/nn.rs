use super::line::{LineCore, LineStyle, Plot, PlotLine, Primitive, Rgba};
use crate::drivers::{ScopeError, ScrollingBuffer};
/// Waveform that is redrawn in one shot from a dense value array, and
/// decays toward zero one slot per `shift` when no fresh array arrives.
pub struct NnLine {
    core: LineCore,
    y: ScrollingBuffer<f32>,
}
impl NnLine {
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
    /// Overwrites the whole y channel; `values[0]` lands at the head.
    pub fn update(&mut self, values: &[f32]) -> Result<(), ScopeError> {
        if !self.core.is_running() {
            return Ok(());
        }
        if values.len() != self.y.len() {
            return Err(ScopeError::FrameLength {
                expected: self.y.len(),
                actual: values.len(),
            });
        }
        for (i, &v) in values.iter().enumerate() {
            self.y.set(i, v);
        }
        self.core.publish_y(self.y.iter());
        Ok(())
    }
    pub fn shift(&mut self) {
        if !self.core.is_running() {
            return;
        }
        self.y.shift_decay(0.0);
        self.core.publish_y(self.y.iter());
    }
}
impl PlotLine for NnLine {
    fn core(&self) -> &LineCore {
        &self.core
    }
    fn primitive(&self) -> Primitive {
        Primitive::LineStrip
    }
}
/// Network output trace.
pub struct NnPlot {
    lines: [NnLine; 1],
}
impl NnPlot {
    pub fn new(n_frames: usize) -> Self {
        Self {
            lines: [NnLine::new(n_frames, 0.006, [1.0, 1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [0.0, 0.0, 0.0], false)],
        }
    }
    pub fn update(&mut self, values: &[f32]) -> Result<(), ScopeError> {
        self.lines[0].update(values)
    }
    pub fn shift(&mut self) {
        self.lines[0].shift();
    }
}
impl Plot for NnPlot {
    fn lines(&self) -> Vec<&dyn PlotLine> {
        self.lines.iter().map(|l| l as &dyn PlotLine).collect()
    }
    fn start(&mut self) {
        self.lines.iter_mut().for_each(NnLine::start);
    }
    fn stop(&mut self) {
        self.lines.iter_mut().for_each(NnLine::stop);
    }
}
