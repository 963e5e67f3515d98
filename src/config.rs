use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::LoadError;

/// Force simulation tuning. Defaults reproduce the stock class-diagram feel:
/// strong repulsion, long springs, heavy damping.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    pub charge_strength: f32,
    pub charge_theta: f32,
    pub charge_min_distance: f32,
    pub link_distance: f32,
    pub center_strength: f32,
    pub collide_radius: f32,
    pub collide_strength: f32,
    pub velocity_decay: f32,
    pub initial_alpha: f32,
    pub alpha_min: f32,
    pub alpha_decay: f32,
    pub alpha_target: f32,
    pub drag_alpha_target: f32,
    pub ticks_per_second: f32,
    pub max_ticks_per_frame: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let alpha_min = 0.001_f32;
        Self {
            charge_strength: -200.0,
            charge_theta: 0.9,
            charge_min_distance: 1.0,
            link_distance: 300.0,
            center_strength: 0.1,
            collide_radius: 100.0,
            collide_strength: 1.0,
            velocity_decay: 0.6,
            initial_alpha: 0.7,
            alpha_min,
            // Reaches alpha_min from 1.0 in 300 ticks.
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
            alpha_target: 0.0,
            drag_alpha_target: 0.3,
            ticks_per_second: 60.0,
            max_ticks_per_frame: 4,
        }
    }
}

/// Box measurements. `line_unit` is the one font-relative length every
/// vertical offset is expressed in.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeometryConfig {
    pub line_unit: f32,
    pub box_width: f32,
    pub rule_inset: f32,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            line_unit: 16.0,
            box_width: 100.0,
            rule_inset: 10.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct DiagramConfig {
    pub layout: LayoutConfig,
    pub geometry: GeometryConfig,
}

impl DiagramConfig {
    pub fn from_json(raw: &str, origin: &str) -> Result<Self, LoadError> {
        serde_json::from_str(raw).map_err(|source| LoadError::Json {
            origin: origin.to_owned(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let raw = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw, &path.display().to_string())
    }
}
