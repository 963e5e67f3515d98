use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke, StrokeKind, Vec2};

use class_force::SurfaceHost;
use class_force::render::{Baseline, BoxVisual, EdgeVisual, RenderSurface, TextVisual};

pub const CANVAS_CONTAINER: &str = "diagram";

const BACKGROUND: Color32 = Color32::WHITE;
const HOVER_STROKE_WIDTH: f32 = 2.5;

/// Hands out the single canvas living in the central panel.
pub(super) struct CanvasHost {
    container_id: String,
}

impl CanvasHost {
    pub(super) fn new(container_id: impl Into<String>) -> Self {
        Self {
            container_id: container_id.into(),
        }
    }
}

impl SurfaceHost for CanvasHost {
    type Surface = Canvas;

    fn open_surface(&mut self, container_id: &str, size: Vec2) -> Option<Canvas> {
        (container_id == self.container_id).then(|| Canvas::new(size))
    }
}

#[derive(Clone, Copy, Debug)]
pub(super) struct BoxId(usize);

#[derive(Clone, Copy, Debug)]
pub(super) struct LineId(usize);

struct PlacedBox {
    visual: BoxVisual,
    top_left: Option<Pos2>,
}

struct PlacedLine {
    visual: EdgeVisual,
    ends: Option<(Pos2, Pos2)>,
}

/// Retained scene: visuals are created once and moved afterwards, then
/// painted every frame in creation order.
pub(super) struct Canvas {
    size: Vec2,
    boxes: Vec<PlacedBox>,
    lines: Vec<PlacedLine>,
}

impl Canvas {
    fn new(size: Vec2) -> Self {
        Self {
            size,
            boxes: Vec::new(),
            lines: Vec::new(),
        }
    }

    pub(super) fn tooltip(&self, node: usize) -> Option<&str> {
        self.boxes
            .iter()
            .find(|placed| placed.visual.node == node)
            .map(|placed| placed.visual.tooltip.as_str())
    }

    /// Paints the scene with its origin at `origin` in screen space.
    pub(super) fn paint(&self, painter: &Painter, origin: Vec2, hovered: Option<usize>) {
        painter.rect_filled(Rect::from_min_size(origin.to_pos2(), self.size), 0.0, BACKGROUND);

        for line in &self.lines {
            let Some((from, to)) = line.ends else {
                continue;
            };
            painter.line_segment([from + origin, to + origin], line.visual.stroke);
        }

        for placed in &self.boxes {
            let Some(top_left) = placed.top_left else {
                continue;
            };
            let visual = &placed.visual;
            let top_left = top_left + origin;

            let stroke = if hovered == Some(visual.node) {
                Stroke::new(HOVER_STROKE_WIDTH, visual.stroke.color)
            } else {
                visual.stroke
            };
            painter.rect(
                Rect::from_min_size(top_left, visual.size),
                0.0,
                visual.fill,
                stroke,
                StrokeKind::Inside,
            );

            for rule in visual.rules() {
                painter.line_segment([top_left + rule.start, top_left + rule.end], rule.stroke);
            }
            for text in visual.texts() {
                paint_text(painter, top_left, text);
            }
        }
    }
}

fn paint_text(painter: &Painter, top_left: Pos2, text: &TextVisual) {
    let align = match text.baseline {
        Baseline::Bottom => Align2::CENTER_BOTTOM,
        Baseline::Top => Align2::CENTER_TOP,
    };
    painter.text(
        top_left + text.anchor,
        align,
        &text.text,
        FontId::proportional(text.font_size),
        text.color,
    );
}

impl RenderSurface for Canvas {
    type BoxHandle = BoxId;
    type LineHandle = LineId;

    fn create_line(&mut self, visual: EdgeVisual) -> LineId {
        self.lines.push(PlacedLine { visual, ends: None });
        LineId(self.lines.len() - 1)
    }

    fn create_box(&mut self, visual: BoxVisual) -> BoxId {
        self.boxes.push(PlacedBox {
            visual,
            top_left: None,
        });
        BoxId(self.boxes.len() - 1)
    }

    fn place_box(&mut self, handle: &BoxId, top_left: Pos2) {
        if let Some(placed) = self.boxes.get_mut(handle.0) {
            placed.top_left = Some(top_left);
        }
    }

    fn place_line(&mut self, handle: &LineId, from: Pos2, to: Pos2) {
        if let Some(line) = self.lines.get_mut(handle.0) {
            line.ends = Some((from, to));
        }
    }

    fn box_at(&self, point: Pos2) -> Option<usize> {
        self.boxes.iter().rev().find_map(|placed| {
            let top_left = placed.top_left?;
            Rect::from_min_size(top_left, placed.visual.size)
                .contains(point)
                .then_some(placed.visual.node)
        })
    }
}
