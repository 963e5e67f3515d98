//! Pointer dragging of individual nodes.
//!
//! Each node is `Free`, `Held` (pressed, not yet moved) or `Dragging`. While
//! held or dragged the node is pinned in the simulation. The controller
//! counts active gestures so that overlapping drags reheat the simulation
//! once, on the first press, and cool it once, on the last release.

use eframe::egui::Vec2;
use tracing::{debug, warn};

use crate::config::LayoutConfig;
use crate::physics::Simulation;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragState {
    Free,
    /// `grab` is the node position minus the pointer at press time.
    Held { grab: Vec2 },
    Dragging { grab: Vec2 },
}

impl DragState {
    fn grab(self) -> Option<Vec2> {
        match self {
            Self::Free => None,
            Self::Held { grab } | Self::Dragging { grab } => Some(grab),
        }
    }
}

pub struct DragController {
    states: Vec<DragState>,
    active: usize,
    drag_alpha_target: f32,
    rest_alpha_target: f32,
}

impl DragController {
    pub fn new(node_count: usize, config: &LayoutConfig) -> Self {
        Self {
            states: vec![DragState::Free; node_count],
            active: 0,
            drag_alpha_target: config.drag_alpha_target,
            rest_alpha_target: config.alpha_target,
        }
    }

    pub fn state(&self, node: usize) -> Option<DragState> {
        self.states.get(node).copied()
    }

    pub fn active_gestures(&self) -> usize {
        self.active
    }

    pub fn is_dragging(&self) -> bool {
        self.active > 0
    }

    pub fn pointer_down(&mut self, simulation: &mut Simulation, node: usize, pointer: Vec2) -> bool {
        let Some(DragState::Free) = self.state(node) else {
            warn!(node, "pointer down ignored: node unknown or already held");
            return false;
        };
        let Some(position) = simulation.position(node) else {
            return false;
        };

        if self.active == 0 {
            simulation.set_alpha_target(self.drag_alpha_target);
            simulation.restart();
        }
        self.active += 1;

        simulation.pin(node, position);
        self.states[node] = DragState::Held {
            grab: position - pointer,
        };
        debug!(node, active = self.active, "drag started");
        true
    }

    /// Moves the pin so the node keeps its offset from the pointer.
    pub fn pointer_move(&mut self, simulation: &mut Simulation, node: usize, pointer: Vec2) -> bool {
        let Some(grab) = self.state(node).and_then(DragState::grab) else {
            return false;
        };

        simulation.pin(node, pointer + grab);
        self.states[node] = DragState::Dragging { grab };
        true
    }

    pub fn pointer_up(&mut self, simulation: &mut Simulation, node: usize) -> bool {
        if self.state(node).and_then(DragState::grab).is_none() {
            return false;
        }

        simulation.unpin(node);
        self.states[node] = DragState::Free;
        self.active = self.active.saturating_sub(1);
        if self.active == 0 {
            simulation.set_alpha_target(self.rest_alpha_target);
        }
        debug!(node, active = self.active, "drag ended");
        true
    }
}
