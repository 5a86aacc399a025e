use crate::drivers::transform::{scale_translate, Matrix4};
pub type Vertex = [f32; 3];
pub type Rgba = [f32; 4];
/// How a renderer should interpret a line's vertices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primitive {
    /// Connected strip through every vertex.
    LineStrip,
    /// Strip with adjacency: the first and last vertex only shape the joins.
    Adjacency,
    /// One vertical marker per vertex, at its x position.
    EventMarkers,
}
/// Backing store a renderer reads from. Contents are only ever replaced
/// wholesale, and each replacement bumps `revision`.
#[derive(Clone, Debug, Default)]
pub struct VertexBuffer {
    vertices: Vec<Vertex>,
    revision: u64,
}
impl VertexBuffer {
    pub fn new(vertices: Vec<Vertex>) -> Self {
        Self {
            vertices,
            revision: 0,
        }
    }
    pub fn set_array(&mut self, vertices: Vec<Vertex>) {
        self.vertices = vertices;
        self.revision = self.revision.wrapping_add(1);
    }
    pub fn as_slice(&self) -> &[Vertex] {
        &self.vertices
    }
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
#[derive(Clone, Debug, PartialEq)]
pub struct LineStyle {
    pub width: f32,
    pub color: Rgba,
    pub transform: Matrix4,
}
impl LineStyle {
    pub fn new(width: f32, color: Rgba, scale: [f32; 3], translate: [f32; 3]) -> Self {
        Self {
            width,
            color,
            transform: scale_translate(scale, translate),
        }
    }
}
/// State shared by every line variant: the fixed x layout, presentation
/// attributes, the published vertices and the running flag.
#[derive(Clone, Debug)]
pub struct LineCore {
    x: Vec<f32>,
    pub style: LineStyle,
    buffer: VertexBuffer,
    running: bool,
}
impl LineCore {
    pub fn new(n_frames: usize, style: LineStyle, running: bool, initial: Vec<Vertex>) -> Self {
        Self {
            x: linspace(-1.0, 1.0, n_frames),
            style,
            buffer: VertexBuffer::new(initial),
            running,
        }
    }
    pub fn x(&self) -> &[f32] {
        &self.x
    }
    pub fn start(&mut self) {
        self.running = true;
    }
    pub fn stop(&mut self) {
        self.running = false;
    }
    pub fn is_running(&self) -> bool {
        self.running
    }
    pub fn publish(&mut self, vertices: Vec<Vertex>) {
        self.buffer.set_array(vertices);
    }
    /// Pairs the fixed x layout with a y channel ordered newest first.
    pub fn publish_y<'a>(&mut self, y: impl Iterator<Item = &'a f32>) {
        let vertices = self.x.iter().zip(y).map(|(&x, &y)| [x, y, 0.0]).collect();
        self.publish(vertices);
    }
    pub fn buffer(&self) -> &VertexBuffer {
        &self.buffer
    }
}
/// What a renderer needs from a line.
pub trait PlotLine {
    fn core(&self) -> &LineCore;
    fn primitive(&self) -> Primitive;
    fn vertices(&self) -> &[Vertex] {
        self.core().buffer().as_slice()
    }
    fn revision(&self) -> u64 {
        self.core().buffer().revision()
    }
    fn width(&self) -> f32 {
        self.core().style.width
    }
    fn color(&self) -> Rgba {
        self.core().style.color
    }
    fn transform(&self) -> &Matrix4 {
        &self.core().style.transform
    }
    fn is_running(&self) -> bool {
        self.core().is_running()
    }
}
/// A group of lines started and stopped together.
pub trait Plot {
    fn lines(&self) -> Vec<&dyn PlotLine>;
    fn start(&mut self);
    fn stop(&mut self);
    fn is_running(&self) -> bool {
        self.lines().iter().any(|line| line.is_running())
    }
}
/// `n` evenly spaced points over `[start, end]`, both ends included.
pub fn linspace(start: f32, end: f32, n: usize) -> Vec<f32> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f32;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f32 })
                .collect()
        }
    }
}
