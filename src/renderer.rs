// src/renderer.rs
use crate::drivers::transform::apply;
use crate::plot::{Plot, PlotLine, Primitive, Rgba};
use eframe::egui;
use egui::{Color32, Pos2, Rect, Shape, Stroke, Vec2};

/// Draws lines once per display frame from their published geometry.
pub trait Renderer {
    fn render(&mut self, line: &dyn PlotLine);

    fn render_plot(&mut self, plot: &dyn Plot) {
        for line in plot.lines() {
            self.render(line);
        }
    }
}

/// Maps clip space ([-1, 1] on both axes, y up) onto a screen rect.
pub fn clip_to_screen(rect: Rect, clip: [f32; 3]) -> Pos2 {
    rect.center() + Vec2::new(clip[0] * rect.width() / 2.0, -clip[1] * rect.height() / 2.0)
}

pub fn to_color32(rgba: Rgba) -> Color32 {
    let [r, g, b, a] = rgba.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

/// Screen-space polyline for strip primitives. Adjacency strips drop their
/// first and last vertex, which only shape the joins.
pub fn strip_points(line: &dyn PlotLine, rect: Rect) -> Vec<Pos2> {
    let vertices = line.vertices();
    let drawn = match line.primitive() {
        Primitive::Adjacency if vertices.len() >= 4 => &vertices[1..vertices.len() - 1],
        Primitive::Adjacency => &vertices[..0],
        _ => vertices,
    };
    drawn
        .iter()
        .map(|&v| clip_to_screen(rect, apply(line.transform(), v)))
        .collect()
}

/// One vertical segment per event, spanning model y in [0, 1].
pub fn marker_segments(line: &dyn PlotLine, rect: Rect) -> Vec<[Pos2; 2]> {
    line.vertices()
        .iter()
        .map(|v| {
            let bottom = apply(line.transform(), [v[0], 0.0, 0.0]);
            let top = apply(line.transform(), [v[0], 1.0, 0.0]);
            [clip_to_screen(rect, bottom), clip_to_screen(rect, top)]
        })
        .collect()
}

pub struct EguiRenderer<'a> {
    painter: &'a egui::Painter,
    rect: Rect,
}

impl<'a> EguiRenderer<'a> {
    pub fn new(painter: &'a egui::Painter, rect: Rect) -> Self {
        Self { painter, rect }
    }

    /// Line widths are in clip units.
    fn stroke(&self, line: &dyn PlotLine) -> Stroke {
        let pixels = (line.width() * self.rect.height() / 2.0).max(1.0);
        Stroke::new(pixels, to_color32(line.color()))
    }
}

impl Renderer for EguiRenderer<'_> {
    fn render(&mut self, line: &dyn PlotLine) {
        let stroke = self.stroke(line);
        match line.primitive() {
            Primitive::EventMarkers => {
                for segment in marker_segments(line, self.rect) {
                    self.painter.line_segment(segment, stroke);
                }
            }
            Primitive::LineStrip | Primitive::Adjacency => {
                let points = strip_points(line, self.rect);
                if points.len() >= 2 {
                    self.painter.add(Shape::line(points, stroke));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::{EventLines, ImuLine};

    fn rect() -> Rect {
        Rect::from_min_size(Pos2::ZERO, Vec2::new(200.0, 100.0))
    }

    #[test]
    fn clip_corners_map_to_rect_corners() {
        assert_eq!(clip_to_screen(rect(), [-1.0, 1.0, 0.0]), Pos2::new(0.0, 0.0));
        assert_eq!(clip_to_screen(rect(), [1.0, -1.0, 0.0]), Pos2::new(200.0, 100.0));
        assert_eq!(clip_to_screen(rect(), [0.0, 0.0, 0.0]), Pos2::new(100.0, 50.0));
    }

    #[test]
    fn adjacency_strip_skips_end_vertices() {
        let mut line = ImuLine::new(5, 0.003, [1.0; 4], [1.0; 3], [0.0; 3], true);
        line.update(1.0);
        let points = strip_points(&line, rect());
        assert_eq!(points.len(), 3);
        // x layout -0.5, 0.0, 0.5 after trimming
        assert_eq!(points[0], Pos2::new(50.0, 50.0));
        assert_eq!(points[2], Pos2::new(150.0, 50.0));
    }

    #[test]
    fn markers_span_translated_unit_height() {
        let mut line = EventLines::new(3, 0.01, [1.0; 4], [1.0; 3], [0.0, -1.0, 0.0], true);
        line.update(&[false, true, false]).unwrap();
        let segments = marker_segments(&line, rect());
        assert_eq!(segments, vec![[Pos2::new(100.0, 100.0), Pos2::new(100.0, 50.0)]]);
    }

    #[test]
    fn colors_are_clamped() {
        assert_eq!(to_color32([1.0, 0.0, 2.0, 1.0]), Color32::from_rgb(255, 0, 255));
    }
}
