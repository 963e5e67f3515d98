use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};

use super::Kinematics;
use super::quadtree::QuadNode;
use crate::diagram::{Relation, check_relations};
use crate::error::ConfigError;

/// Below this separation two points count as coincident.
const COINCIDENT_EPSILON: f32 = 1e-6;
/// Length of the tie-break offset substituted for coincident points.
const TIE_BREAK_NUDGE: f32 = 1e-3;

/// Deterministic unit direction for the pair `(a, b)`; `tie_break(b, a)` is
/// its exact opposite so coincident nodes separate symmetrically.
fn tie_break(a: usize, b: usize) -> Vec2 {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    let angle = ((low as f32) * 0.618_034 + (high as f32) * 0.414_214 + 0.37) * TAU;
    let direction = vec2(angle.cos(), angle.sin());
    if a <= b { direction } else { -direction }
}

/// `delta` unless it is degenerate, in which case a tiny tie-break offset.
fn separated(delta: Vec2, from: usize, to: usize) -> Vec2 {
    if delta.length_sq() > COINCIDENT_EPSILON * COINCIDENT_EPSILON {
        delta
    } else {
        tie_break(from, to) * TIE_BREAK_NUDGE
    }
}

pub(super) struct Scratch {
    pub(super) points: Vec<Vec2>,
    pub(super) impulses: Vec<Vec2>,
}

impl Scratch {
    pub(super) fn new() -> Self {
        Self {
            points: Vec::new(),
            impulses: Vec::new(),
        }
    }

    fn load_positions(&mut self, nodes: &[Kinematics]) {
        self.points.clear();
        self.points.extend(nodes.iter().map(|node| node.position));
    }

    fn load_predicted(&mut self, nodes: &[Kinematics]) {
        self.points.clear();
        self.points
            .extend(nodes.iter().map(|node| node.position + node.velocity));
    }

    fn reset_impulses(&mut self, len: usize) {
        self.impulses.clear();
        self.impulses.resize(len, Vec2::ZERO);
    }
}

/// Many-body repulsion, approximated with Barnes–Hut.
#[derive(Clone, Copy, Debug)]
pub struct ChargeForce {
    pub strength: f32,
    pub theta: f32,
    pub min_distance: f32,
}

impl ChargeForce {
    fn apply(&self, nodes: &mut [Kinematics], alpha: f32, scratch: &mut Scratch) {
        scratch.load_positions(nodes);
        let Some(tree) = QuadNode::build(&scratch.points) else {
            return;
        };

        let theta_sq = (self.theta * self.theta).max(f32::EPSILON);
        let min_distance_sq = self.min_distance * self.min_distance;
        for (index, node) in nodes.iter_mut().enumerate() {
            let mut pull = Vec2::ZERO;
            self.accumulate(&tree, index, &scratch.points, theta_sq, min_distance_sq, &mut pull);
            node.velocity += pull * alpha;
        }
    }

    fn accumulate(
        &self,
        cell: &QuadNode,
        index: usize,
        points: &[Vec2],
        theta_sq: f32,
        min_distance_sq: f32,
        pull: &mut Vec2,
    ) {
        if cell.count <= 0.0 {
            return;
        }

        let point = points[index];

        if cell.is_leaf() {
            for &other in &cell.indices {
                if other == index {
                    continue;
                }
                let delta = separated(points[other] - point, index, other);
                *pull += self.contribution(delta, self.strength, min_distance_sq);
            }
            return;
        }

        let delta = cell.centroid - point;
        let side = cell.square.side();
        let far_enough = !cell.square.contains(point) && (side * side / theta_sq) < delta.length_sq();
        if far_enough {
            *pull += self.contribution(delta, self.strength * cell.count, min_distance_sq);
            return;
        }

        for child in cell.children() {
            self.accumulate(child, index, points, theta_sq, min_distance_sq, pull);
        }
    }

    fn contribution(&self, delta: Vec2, strength: f32, min_distance_sq: f32) -> Vec2 {
        let mut distance_sq = delta.length_sq();
        if distance_sq < min_distance_sq {
            distance_sq = (min_distance_sq * distance_sq).sqrt();
        }
        delta * (strength / distance_sq)
    }
}

/// A relation resolved against the simulation's node arena.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spring {
    pub source: usize,
    pub target: usize,
    pub strength: f32,
    pub bias: f32,
}

#[derive(Clone, Debug)]
pub struct LinkForce {
    springs: Vec<Spring>,
    degrees: Vec<usize>,
    distance: f32,
}

impl LinkForce {
    /// Resolves every relation or none: a single dangling index fails the
    /// whole bind.
    pub fn bind(
        node_count: usize,
        relations: &[Relation],
        distance: f32,
    ) -> Result<Self, ConfigError> {
        check_relations(node_count, relations)?;

        let mut degrees = vec![0usize; node_count];
        for relation in relations {
            degrees[relation.source] += 1;
            degrees[relation.target] += 1;
        }

        let springs = relations
            .iter()
            .map(|relation| {
                let source_degree = degrees[relation.source] as f32;
                let target_degree = degrees[relation.target] as f32;
                Spring {
                    source: relation.source,
                    target: relation.target,
                    strength: 1.0 / source_degree.min(target_degree),
                    bias: source_degree / (source_degree + target_degree),
                }
            })
            .collect();

        Ok(Self {
            springs,
            degrees,
            distance: distance.max(0.0),
        })
    }

    pub fn springs(&self) -> &[Spring] {
        &self.springs
    }

    pub fn degree(&self, node: usize) -> Option<usize> {
        self.degrees.get(node).copied()
    }

    fn apply(&self, nodes: &mut [Kinematics], alpha: f32) {
        for spring in &self.springs {
            let source = nodes[spring.source];
            let target = nodes[spring.target];
            let delta = separated(
                (target.position + target.velocity) - (source.position + source.velocity),
                spring.source,
                spring.target,
            );
            let length = delta.length();
            let stretch = (length - self.distance) / length * alpha * spring.strength;
            let correction = delta * stretch;

            nodes[spring.target].velocity -= correction * spring.bias;
            nodes[spring.source].velocity += correction * (1.0 - spring.bias);
        }
    }
}

/// Translates the whole layout so its mean drifts toward `center`.
#[derive(Clone, Copy, Debug)]
pub struct CenterForce {
    pub center: Vec2,
    pub strength: f32,
}

impl CenterForce {
    fn apply(&self, nodes: &mut [Kinematics]) {
        if nodes.is_empty() {
            return;
        }

        let mean = nodes
            .iter()
            .fold(Vec2::ZERO, |sum, node| sum + node.position)
            / nodes.len() as f32;
        let shift = (mean - self.center) * self.strength;
        for node in nodes {
            node.position -= shift;
        }
    }
}

/// Keeps node circles of `radius` from overlapping, on predicted positions.
#[derive(Clone, Copy, Debug)]
pub struct CollideForce {
    pub radius: f32,
    pub strength: f32,
}

impl CollideForce {
    fn apply(&self, nodes: &mut [Kinematics], scratch: &mut Scratch) {
        if self.radius <= 0.0 {
            return;
        }

        scratch.load_predicted(nodes);
        scratch.reset_impulses(nodes.len());
        let Some(tree) = QuadNode::build(&scratch.points) else {
            return;
        };

        let reach = self.radius * 2.0;
        self.collide_cells(&tree, &tree, true, &scratch.points, &mut scratch.impulses, reach);

        for (node, impulse) in nodes.iter_mut().zip(&scratch.impulses) {
            node.velocity += *impulse;
        }
    }

    fn collide_cells(
        &self,
        cell_a: &QuadNode,
        cell_b: &QuadNode,
        same_cell: bool,
        points: &[Vec2],
        impulses: &mut [Vec2],
        reach: f32,
    ) {
        if cell_a.square.gap_sq(cell_b.square) > reach * reach {
            return;
        }

        if cell_a.is_leaf() && cell_b.is_leaf() {
            if same_cell {
                for (offset, &from) in cell_a.indices.iter().enumerate() {
                    for &to in &cell_a.indices[offset + 1..] {
                        self.collide_pair(from, to, points, impulses, reach);
                    }
                }
            } else {
                for &from in &cell_a.indices {
                    for &to in &cell_b.indices {
                        self.collide_pair(from, to, points, impulses, reach);
                    }
                }
            }
            return;
        }

        if same_cell {
            let children = cell_a.children().collect::<Vec<_>>();
            for (first, child_a) in children.iter().enumerate() {
                self.collide_cells(child_a, child_a, true, points, impulses, reach);
                for child_b in &children[first + 1..] {
                    self.collide_cells(child_a, child_b, false, points, impulses, reach);
                }
            }
            return;
        }

        let split_a = if cell_a.is_leaf() {
            false
        } else if cell_b.is_leaf() {
            true
        } else {
            cell_a.square.half_extent >= cell_b.square.half_extent
        };

        if split_a {
            for child in cell_a.children() {
                self.collide_cells(child, cell_b, false, points, impulses, reach);
            }
        } else {
            for child in cell_b.children() {
                self.collide_cells(cell_a, child, false, points, impulses, reach);
            }
        }
    }

    fn collide_pair(
        &self,
        from: usize,
        to: usize,
        points: &[Vec2],
        impulses: &mut [Vec2],
        reach: f32,
    ) {
        let delta = points[from] - points[to];
        if delta.length_sq() >= reach * reach {
            return;
        }

        let delta = separated(delta, to, from);
        let distance = delta.length();
        let push = delta * ((reach - distance) / distance * self.strength);

        // Equal radii split the correction evenly.
        impulses[from] += push * 0.5;
        impulses[to] -= push * 0.5;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ForceKind {
    Charge,
    Link,
    Center,
    Collide,
}

impl ForceKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Charge => "charge",
            Self::Link => "link",
            Self::Center => "center",
            Self::Collide => "collide",
        }
    }
}

/// The forces a simulation applies each tick, in registration order.
#[derive(Clone, Debug)]
pub enum Force {
    Charge(ChargeForce),
    Link(LinkForce),
    Center(CenterForce),
    Collide(CollideForce),
}

impl Force {
    pub fn kind(&self) -> ForceKind {
        match self {
            Self::Charge(_) => ForceKind::Charge,
            Self::Link(_) => ForceKind::Link,
            Self::Center(_) => ForceKind::Center,
            Self::Collide(_) => ForceKind::Collide,
        }
    }

    pub(super) fn apply(&self, nodes: &mut [Kinematics], alpha: f32, scratch: &mut Scratch) {
        match self {
            Self::Charge(force) => force.apply(nodes, alpha, scratch),
            Self::Link(force) => force.apply(nodes, alpha),
            Self::Center(force) => force.apply(nodes),
            Self::Collide(force) => force.apply(nodes, scratch),
        }
    }
}
