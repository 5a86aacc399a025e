use super::line::{LineCore, LineStyle, Plot, PlotLine, Primitive, Rgba, Vertex};
use crate::drivers::ScopeError;
/// Vertical markers at the x positions where an event mask is set.
pub struct EventLines {
    core: LineCore,
}
impl EventLines {
    pub fn new(
        n_frames: usize,
        width: f32,
        color: Rgba,
        scale: [f32; 3],
        translate: [f32; 3],
        running: bool,
    ) -> Self {
        let style = LineStyle::new(width, color, scale, translate);
        Self {
            core: LineCore::new(n_frames, style, running, Vec::new()),
        }
    }
    pub fn start(&mut self) {
        self.core.start();
    }
    pub fn stop(&mut self) {
        self.core.stop();
    }
    /// `events` is aligned to the x layout, newest first. The vertex buffer
    /// is resized to the number of active events.
    pub fn update(&mut self, events: &[bool]) -> Result<(), ScopeError> {
        if !self.core.is_running() {
            return Ok(());
        }
        let expected = self.core.x().len();
        if events.len() != expected {
            return Err(ScopeError::FrameLength {
                expected,
                actual: events.len(),
            });
        }
        let vertices: Vec<Vertex> = self
            .core
            .x()
            .iter()
            .zip(events)
            .filter(|(_, active)| **active)
            .map(|(&x, _)| [x, 0.0, 0.0])
            .collect();
        self.core.publish(vertices);
        Ok(())
    }
}
impl PlotLine for EventLines {
    fn core(&self) -> &LineCore {
        &self.core
    }
    fn primitive(&self) -> Primitive {
        Primitive::EventMarkers
    }
}
pub const METRONOME: usize = 0;
pub const LABEL: usize = 1;
/// Metronome beats and gesture labels drawn over the signal area.
pub struct EventPlot {
    lines: [EventLines; 2],
}
impl EventPlot {
    pub fn new(n_frames: usize) -> Self {
        Self {
            lines: [
                EventLines::new(n_frames, 0.01, [0.2, 0.2, 0.2, 1.0], [1.0, 1.0, 1.0], [0.0, -1.0, 0.0], true),
                EventLines::new(n_frames, 0.01, [0.3, 0.3, 0.3, 1.0], [1.0, 1.0, 1.0], [0.0, -1.0, 0.0], true),
            ],
        }
    }
    pub fn update(&mut self, metronome: &[bool], labels: &[bool]) -> Result<(), ScopeError> {
        self.lines[METRONOME].update(metronome)?;
        self.lines[LABEL].update(labels)
    }
    pub fn line(&self, index: usize) -> Option<&EventLines> {
        self.lines.get(index)
    }
}
impl Plot for EventPlot {
    fn lines(&self) -> Vec<&dyn PlotLine> {
        self.lines.iter().map(|l| l as &dyn PlotLine).collect()
    }
    fn start(&mut self) {
        self.lines.iter_mut().for_each(EventLines::start);
    }
    fn stop(&mut self) {
        self.lines.iter_mut().for_each(EventLines::stop);
    }
}
