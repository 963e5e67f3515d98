use eframe::egui::{Color32, Stroke, Vec2, vec2};

use crate::config::GeometryConfig;
use crate::diagram::{Entity, Relation};
use crate::geometry::BoxGeometry;

pub const BOX_FILL: Color32 = Color32::from_rgb(250, 235, 215);
pub const BOX_STROKE_WIDTH: f32 = 1.5;
pub const RULE_STROKE_WIDTH: f32 = 1.0;
pub const EDGE_STROKE_WIDTH: f32 = 1.0;
pub const INK: Color32 = Color32::BLACK;
pub const ATTRIBUTE_INK: Color32 = Color32::from_rgb(105, 105, 105);
pub const METHOD_INK: Color32 = Color32::from_rgb(128, 128, 128);

/// Which edge of the text sits on `anchor.y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Baseline {
    Bottom,
    Top,
}

/// A horizontally centred label; `anchor` is relative to the box's top-left.
#[derive(Clone, Debug, PartialEq)]
pub struct TextVisual {
    pub text: String,
    pub anchor: Vec2,
    pub baseline: Baseline,
    pub font_size: f32,
    pub color: Color32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RuleVisual {
    pub start: Vec2,
    pub end: Vec2,
    pub stroke: Stroke,
}

/// Everything drawn for one entity, in box-local coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxVisual {
    pub node: usize,
    pub size: Vec2,
    pub fill: Color32,
    pub stroke: Stroke,
    pub tooltip: String,
    pub title: TextVisual,
    pub title_rule: RuleVisual,
    pub attributes: Vec<TextVisual>,
    pub attribute_rule: RuleVisual,
    pub methods: Vec<TextVisual>,
}

impl BoxVisual {
    pub fn build(node: usize, entity: &Entity, config: &GeometryConfig) -> Self {
        let geometry = BoxGeometry::measure(entity, config);
        let middle = geometry.width * 0.5;

        let rule = |y: f32| RuleVisual {
            start: vec2(geometry.rule_start, y),
            end: vec2(geometry.rule_end, y),
            stroke: Stroke::new(RULE_STROKE_WIDTH, INK),
        };
        let label = |text: &str, y: f32, color: Color32| TextVisual {
            text: text.to_owned(),
            anchor: vec2(middle, y),
            baseline: Baseline::Top,
            font_size: geometry.label_font_size,
            color,
        };

        Self {
            node,
            size: vec2(geometry.width, geometry.height),
            fill: BOX_FILL,
            stroke: Stroke::new(BOX_STROKE_WIDTH, INK),
            tooltip: entity.name.clone(),
            title: TextVisual {
                text: entity.name.clone(),
                anchor: vec2(middle, geometry.title_baseline),
                baseline: Baseline::Bottom,
                font_size: geometry.title_font_size,
                color: INK,
            },
            title_rule: rule(geometry.title_rule),
            attributes: entity
                .attributes
                .iter()
                .zip(&geometry.attribute_offsets)
                .map(|(text, &y)| label(text.as_str(), y, ATTRIBUTE_INK))
                .collect(),
            attribute_rule: rule(geometry.attribute_rule),
            methods: entity
                .methods
                .iter()
                .zip(&geometry.method_offsets)
                .map(|(text, &y)| label(text.as_str(), y, METHOD_INK))
                .collect(),
        }
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextVisual> {
        std::iter::once(&self.title)
            .chain(&self.attributes)
            .chain(&self.methods)
    }

    pub fn rules(&self) -> [&RuleVisual; 2] {
        [&self.title_rule, &self.attribute_rule]
    }
}

/// A relation line between the centres of two boxes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeVisual {
    pub relation: usize,
    pub source: usize,
    pub target: usize,
    pub stroke: Stroke,
}

impl EdgeVisual {
    pub fn build(relation: usize, edge: &Relation) -> Self {
        Self {
            relation,
            source: edge.source,
            target: edge.target,
            stroke: Stroke::new(EDGE_STROKE_WIDTH, INK),
        }
    }
}
