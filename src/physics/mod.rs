//! Force-directed layout engine.
//!
//! A [`Simulation`] owns one [`Kinematics`] record per entity and a fixed set
//! of forces. Each [`Simulation::step`] cools `alpha` toward its target,
//! lets every force adjust velocities (or, for centering, positions), then
//! integrates. Once `alpha` drops below `alpha_min` the simulation settles
//! and stops consuming ticks until something restarts it.

mod clock;
mod forces;
mod quadtree;

use std::f32::consts::PI;

use eframe::egui::{Vec2, vec2};
use tracing::debug;

use crate::config::LayoutConfig;
use crate::diagram::Relation;
use crate::error::ConfigError;

pub use clock::FrameClock;
pub use forces::{
    CenterForce, ChargeForce, CollideForce, Force, ForceKind, LinkForce, Spring,
};
use forces::Scratch;

const INITIAL_RADIUS: f32 = 10.0;

/// Position, velocity and optional pin of one node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Kinematics {
    pub position: Vec2,
    pub velocity: Vec2,
    pub pin: Option<Vec2>,
}

impl Kinematics {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            pin: None,
        }
    }

    pub fn is_pinned(&self) -> bool {
        self.pin.is_some()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Regime {
    Active,
    Settled,
}

impl Regime {
    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Settled => "settled",
        }
    }
}

pub struct Simulation {
    nodes: Vec<Kinematics>,
    forces: Vec<Force>,
    alpha: f32,
    alpha_min: f32,
    alpha_decay: f32,
    alpha_target: f32,
    initial_alpha: f32,
    velocity_decay: f32,
    regime: Regime,
    attached: bool,
    ticks: u64,
    scratch: Scratch,
}

impl Simulation {
    /// Resolves `relations` against `node_count` nodes and registers the
    /// charge, link, center and collide forces. Fails before anything is
    /// registered if a relation points outside the node range.
    pub fn bind(
        node_count: usize,
        relations: &[Relation],
        config: &LayoutConfig,
        center: Vec2,
    ) -> Result<Self, ConfigError> {
        let links = LinkForce::bind(node_count, relations, config.link_distance)?;

        let forces = vec![
            Force::Charge(ChargeForce {
                strength: config.charge_strength,
                theta: config.charge_theta,
                min_distance: config.charge_min_distance.max(0.0),
            }),
            Force::Link(links),
            Force::Center(CenterForce {
                center,
                strength: config.center_strength.clamp(0.0, 1.0),
            }),
            Force::Collide(CollideForce {
                radius: config.collide_radius.max(0.0),
                strength: config.collide_strength.clamp(0.0, 1.0),
            }),
        ];

        debug!(
            nodes = node_count,
            springs = relations.len(),
            "bound simulation"
        );

        Ok(Self {
            nodes: phyllotaxis(node_count, center),
            forces,
            alpha: config.initial_alpha.clamp(0.0, 1.0),
            alpha_min: config.alpha_min.max(0.0),
            alpha_decay: config.alpha_decay.clamp(0.0, 1.0),
            alpha_target: config.alpha_target.clamp(0.0, 1.0),
            initial_alpha: config.initial_alpha.clamp(0.0, 1.0),
            velocity_decay: config.velocity_decay.clamp(0.0, 1.0),
            regime: Regime::Active,
            attached: true,
            ticks: 0,
            scratch: Scratch::new(),
        })
    }

    pub fn nodes(&self) -> &[Kinematics] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&Kinematics> {
        self.nodes.get(index)
    }

    pub fn position(&self, index: usize) -> Option<Vec2> {
        self.nodes.get(index).map(|node| node.position)
    }

    pub fn forces(&self) -> impl Iterator<Item = ForceKind> + '_ {
        self.forces.iter().map(Force::kind)
    }

    fn links(&self) -> Option<&LinkForce> {
        self.forces.iter().find_map(|force| match force {
            Force::Link(links) => Some(links),
            _ => None,
        })
    }

    pub fn springs(&self) -> &[Spring] {
        self.links().map(LinkForce::springs).unwrap_or_default()
    }

    pub fn degree(&self, index: usize) -> Option<usize> {
        self.links().and_then(|links| links.degree(index))
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn alpha_target(&self) -> f32 {
        self.alpha_target
    }

    pub fn alpha_min(&self) -> f32 {
        self.alpha_min
    }

    pub fn set_alpha_target(&mut self, target: f32) {
        self.alpha_target = target.clamp(0.0, 1.0);
    }

    pub fn regime(&self) -> Regime {
        self.regime
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Whether the host should keep scheduling ticks.
    pub fn is_running(&self) -> bool {
        self.attached && self.regime == Regime::Active
    }

    /// Resumes ticking. Alpha is left alone; with a raised target it climbs
    /// on the next tick, otherwise the simulation settles again.
    pub fn restart(&mut self) {
        if !self.attached {
            return;
        }
        if self.regime != Regime::Active {
            debug!(alpha = self.alpha, target = self.alpha_target, "simulation restarted");
        }
        self.regime = Regime::Active;
    }

    pub fn reheat(&mut self) {
        self.alpha = self.alpha.max(self.initial_alpha);
        self.restart();
    }

    /// Detaches from the host scheduler. Takes effect before the next tick.
    pub fn stop(&mut self) {
        if self.attached {
            debug!(ticks = self.ticks, "simulation detached");
        }
        self.attached = false;
    }

    pub fn attach(&mut self) {
        self.attached = true;
        self.restart();
    }

    /// Fixes `index` at `pin`. The node's position follows immediately.
    pub fn pin(&mut self, index: usize, pin: Vec2) -> bool {
        let Some(node) = self.nodes.get_mut(index) else {
            return false;
        };
        node.pin = Some(pin);
        node.position = pin;
        node.velocity = Vec2::ZERO;
        true
    }

    pub fn unpin(&mut self, index: usize) -> bool {
        let Some(node) = self.nodes.get_mut(index) else {
            return false;
        };
        node.pin = None;
        true
    }

    /// Advances the physics by one tick, ignoring attachment and regime.
    /// Touches nothing outside the simulation.
    pub fn step(&mut self) -> Regime {
        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;

        for force in &self.forces {
            force.apply(&mut self.nodes, self.alpha, &mut self.scratch);
        }

        let retained = 1.0 - self.velocity_decay;
        for node in &mut self.nodes {
            match node.pin {
                Some(pin) => {
                    node.position = pin;
                    node.velocity = Vec2::ZERO;
                }
                None => {
                    node.velocity *= retained;
                    node.position += node.velocity;
                }
            }
        }

        self.ticks += 1;
        let regime = if self.alpha < self.alpha_min {
            Regime::Settled
        } else {
            Regime::Active
        };
        if regime != self.regime {
            debug!(
                alpha = self.alpha,
                ticks = self.ticks,
                regime = regime.label(),
                "simulation regime changed"
            );
        }
        self.regime = regime;
        regime
    }

    /// Runs up to `ticks` steps while the simulation is running, then hands
    /// the resulting node states to `on_tick` once. Returns the number of
    /// steps taken; `on_tick` is skipped when none were.
    pub fn run(&mut self, ticks: usize, on_tick: impl FnOnce(&[Kinematics])) -> usize {
        let mut taken = 0;
        while taken < ticks && self.is_running() {
            self.step();
            taken += 1;
        }
        if taken > 0 {
            on_tick(&self.nodes);
        }
        taken
    }

    pub fn tick(&mut self, on_tick: impl FnOnce(&[Kinematics])) -> bool {
        self.run(1, on_tick) == 1
    }
}

/// Sunflower spiral around `center`: deterministic and free of coincident
/// starting points.
fn phyllotaxis(count: usize, center: Vec2) -> Vec<Kinematics> {
    let angle_step = PI * (3.0 - 5.0_f32.sqrt());
    (0..count)
        .map(|index| {
            let radius = INITIAL_RADIUS * (0.5 + index as f32).sqrt();
            let angle = index as f32 * angle_step;
            Kinematics::at(center + vec2(angle.cos(), angle.sin()) * radius)
        })
        .collect()
}
