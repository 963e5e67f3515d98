//! Box measurements in line units.
//!
//! Every vertical distance inside a class box is a multiple of one
//! font-relative length (the line unit). Nothing here touches positions or
//! fails; call it once per visual, not per tick.

use crate::config::GeometryConfig;
use crate::diagram::Entity;

/// Height of a box with no attributes and no methods.
pub const BASE_LINES: f32 = 2.1;
pub const TITLE_BASELINE: f32 = 1.3;
pub const TITLE_FONT_SCALE: f32 = 1.2;
pub const TITLE_RULE: f32 = 1.6;
pub const ATTRIBUTE_BASE: f32 = 1.7;
pub const ATTRIBUTE_RULE_GAP: f32 = 0.2;
pub const METHOD_BASE: f32 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelStack {
    Attributes,
    Methods,
}

impl LabelStack {
    fn base(self) -> f32 {
        match self {
            Self::Attributes => ATTRIBUTE_BASE,
            Self::Methods => METHOD_BASE,
        }
    }
}

pub fn box_height(entity: &Entity, line_unit: f32) -> f32 {
    line_unit * (BASE_LINES + entity.label_count() as f32)
}

/// Top of the `index`-th label in `stack`, after `preceding` labels from the
/// stacks above it.
pub fn label_offset(line_unit: f32, stack: LabelStack, index: usize, preceding: usize) -> f32 {
    line_unit * (stack.base() + preceding as f32 + index as f32)
}

pub fn attribute_rule_offset(entity: &Entity, line_unit: f32) -> f32 {
    line_unit * (ATTRIBUTE_BASE + entity.attributes.len() as f32 + ATTRIBUTE_RULE_GAP)
}

/// All offsets for one entity, measured from the top-left corner of its box.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxGeometry {
    pub width: f32,
    pub height: f32,
    pub title_baseline: f32,
    pub title_font_size: f32,
    pub title_rule: f32,
    pub attribute_offsets: Vec<f32>,
    pub attribute_rule: f32,
    pub method_offsets: Vec<f32>,
    pub label_font_size: f32,
    pub rule_start: f32,
    pub rule_end: f32,
}

impl BoxGeometry {
    pub fn measure(entity: &Entity, config: &GeometryConfig) -> Self {
        let unit = config.line_unit;
        let preceding = entity.attributes.len();

        Self {
            width: config.box_width,
            height: box_height(entity, unit),
            title_baseline: unit * TITLE_BASELINE,
            title_font_size: unit * TITLE_FONT_SCALE,
            title_rule: unit * TITLE_RULE,
            attribute_offsets: (0..entity.attributes.len())
                .map(|index| label_offset(unit, LabelStack::Attributes, index, 0))
                .collect(),
            attribute_rule: attribute_rule_offset(entity, unit),
            method_offsets: (0..entity.methods.len())
                .map(|index| label_offset(unit, LabelStack::Methods, index, preceding))
                .collect(),
            label_font_size: unit,
            rule_start: config.rule_inset,
            rule_end: config.box_width - config.rule_inset,
        }
    }
}
