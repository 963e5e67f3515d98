use eframe::egui::{Pos2, Vec2, vec2};
use tracing::info;

use crate::config::DiagramConfig;
use crate::diagram::{DiagramData, Entity, Relation, check_entities, sample_diagram};
use crate::drag::DragController;
use crate::error::DrawError;
use crate::physics::{FrameClock, Simulation};
use crate::render::{RenderSurface, Visuals, create_visuals, reposition};

/// Provides drawing surfaces by container id.
pub trait SurfaceHost {
    type Surface: RenderSurface;

    /// `None` when no container with this id exists.
    fn open_surface(&mut self, container_id: &str, size: Vec2) -> Option<Self::Surface>;
}

/// A live diagram: its data, the simulation laying it out, the drag state
/// and the surface showing it.
pub struct Diagram<S: RenderSurface> {
    entities: Vec<Entity>,
    relations: Vec<Relation>,
    size: Vec2,
    surface: S,
    visuals: Visuals<S::BoxHandle, S::LineHandle>,
    simulation: Simulation,
    drag: DragController,
    clock: FrameClock,
    needs_placement: bool,
}

/// Draws the built-in sample diagram into `container_id`.
pub fn draw<H: SurfaceHost>(
    host: &mut H,
    container_id: &str,
    width: f32,
    height: f32,
) -> Result<Diagram<H::Surface>, DrawError> {
    draw_diagram(
        host,
        container_id,
        vec2(width, height),
        sample_diagram(),
        &DiagramConfig::default(),
    )
}

/// Validates and binds `data`, then creates its visuals in `container_id`.
/// Nothing is drawn unless every step succeeds.
pub fn draw_diagram<H: SurfaceHost>(
    host: &mut H,
    container_id: &str,
    size: Vec2,
    data: DiagramData,
    config: &DiagramConfig,
) -> Result<Diagram<H::Surface>, DrawError> {
    let DiagramData {
        entities,
        relations,
    } = data;
    check_entities(&entities)?;

    info!("creating simulation");
    let simulation = Simulation::bind(entities.len(), &relations, &config.layout, size * 0.5)?;

    let mut surface = host
        .open_surface(container_id, size)
        .ok_or_else(|| DrawError::SurfaceUnavailable(container_id.to_owned()))?;

    info!(
        entities = entities.len(),
        relations = relations.len(),
        "creating visuals"
    );
    let visuals = create_visuals(&mut surface, &entities, &relations, &config.geometry);

    info!("attaching drag handling");
    let drag = DragController::new(entities.len(), &config.layout);

    Ok(Diagram {
        entities,
        relations,
        size,
        surface,
        visuals,
        simulation,
        drag,
        clock: FrameClock::new(
            config.layout.ticks_per_second,
            config.layout.max_ticks_per_frame,
        ),
        needs_placement: true,
    })
}

impl<S: RenderSurface> Diagram<S> {
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    /// Whether the host should keep scheduling frames.
    pub fn is_animating(&self) -> bool {
        self.simulation.is_running() || self.needs_placement
    }

    /// Runs the ticks due after `delta_seconds` and repositions visuals once.
    /// Returns true while the simulation is still active.
    pub fn frame(&mut self, delta_seconds: f32) -> bool {
        let due = if self.simulation.is_running() {
            self.clock.advance(delta_seconds)
        } else {
            self.clock.reset();
            0
        };

        let surface = &mut self.surface;
        let visuals = &self.visuals;
        let taken = self
            .simulation
            .run(due, |nodes| reposition(surface, visuals, nodes));

        if taken == 0 && self.needs_placement {
            reposition(&mut self.surface, &self.visuals, self.simulation.nodes());
        }
        self.needs_placement = false;
        self.simulation.is_running()
    }

    pub fn node_at(&self, point: Pos2) -> Option<usize> {
        self.surface.box_at(point)
    }

    pub fn pointer_down(&mut self, node: usize, pointer: Pos2) -> bool {
        let handled = self
            .drag
            .pointer_down(&mut self.simulation, node, pointer.to_vec2());
        self.needs_placement |= handled;
        handled
    }

    pub fn pointer_move(&mut self, node: usize, pointer: Pos2) -> bool {
        let handled = self
            .drag
            .pointer_move(&mut self.simulation, node, pointer.to_vec2());
        self.needs_placement |= handled;
        handled
    }

    pub fn pointer_up(&mut self, node: usize) -> bool {
        self.drag.pointer_up(&mut self.simulation, node)
    }

    pub fn reheat(&mut self) {
        self.simulation.reheat();
    }

    /// Detaches the simulation from the frame loop. Visuals stay where they
    /// are.
    pub fn stop(&mut self) {
        self.simulation.stop();
    }

    pub fn resume(&mut self) {
        self.simulation.attach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::render::testing::RecordingSurface;

    #[derive(Default)]
    struct Host {
        opened: Vec<String>,
    }

    impl SurfaceHost for Host {
        type Surface = RecordingSurface;

        fn open_surface(&mut self, container_id: &str, _size: Vec2) -> Option<RecordingSurface> {
            self.opened.push(container_id.to_owned());
            (container_id == "diagram").then(RecordingSurface::default)
        }
    }

    fn centre_of(diagram: &Diagram<RecordingSurface>, node: usize) -> Pos2 {
        let (visual, top_left) = &diagram.surface().boxes[node];
        top_left.expect("box placed") + visual.size * 0.5
    }

    #[test]
    fn sample_draw_creates_visuals_and_places_them_on_first_frame() {
        let mut host = Host::default();
        let mut diagram = draw(&mut host, "diagram", 1200.0, 900.0).expect("sample draws");

        assert_eq!(diagram.entities().len(), 5);
        assert_eq!(diagram.surface().lines.len(), 4);
        assert!(diagram.surface().boxes.iter().all(|(_, placed)| placed.is_none()));
        assert!(diagram.is_animating());

        diagram.frame(1.0 / 60.0);
        assert_eq!(diagram.simulation().ticks(), 1);
        assert!(diagram.surface().boxes.iter().all(|(_, placed)| placed.is_some()));
    }

    #[test]
    fn missing_container_is_reported() {
        let mut host = Host::default();
        let result = draw(&mut host, "elsewhere", 800.0, 600.0);
        assert!(matches!(result, Err(DrawError::SurfaceUnavailable(id)) if id == "elsewhere"));
    }

    #[test]
    fn invalid_relations_fail_before_any_surface_is_opened() {
        let mut host = Host::default();
        let data = DiagramData::new(vec![Entity::new("A")], vec![Relation::new(0, 3)]);
        let result = draw_diagram(
            &mut host,
            "diagram",
            vec2(800.0, 600.0),
            data,
            &DiagramConfig::default(),
        );

        assert!(matches!(
            result,
            Err(DrawError::Config(ConfigError::DanglingRelation { index: 3, .. }))
        ));
        assert!(host.opened.is_empty());
    }

    #[test]
    fn empty_diagram_draws_nothing_and_settles() {
        let mut host = Host::default();
        let mut diagram = draw_diagram(
            &mut host,
            "diagram",
            vec2(800.0, 600.0),
            DiagramData::default(),
            &DiagramConfig::default(),
        )
        .expect("empty diagram is valid");

        for _ in 0..2000 {
            if !diagram.frame(0.1) {
                break;
            }
        }
        assert!(!diagram.simulation().is_running());
        assert!(diagram.surface().created.is_empty());
    }

    #[test]
    fn dragged_box_follows_pointer_while_others_move() {
        let mut host = Host::default();
        let mut diagram = draw(&mut host, "diagram", 1200.0, 900.0).expect("sample draws");
        diagram.frame(1.0 / 60.0);

        let grab_point = centre_of(&diagram, 2);
        let node = diagram.node_at(grab_point).expect("box under its own centre");
        let before = centre_of(&diagram, node);
        assert!(diagram.pointer_down(node, grab_point));

        let delta = vec2(120.0, -80.0);
        assert!(diagram.pointer_move(node, grab_point + delta));
        for _ in 0..30 {
            diagram.frame(1.0 / 60.0);
        }

        assert!((centre_of(&diagram, node) - (before + delta)).length() < 1e-2);
        assert!(diagram.simulation().is_running());

        assert!(diagram.pointer_up(node));
        assert!(!diagram.drag().is_dragging());
    }

    #[test]
    fn stopped_diagram_still_tracks_drags() {
        let mut host = Host::default();
        let mut diagram = draw(&mut host, "diagram", 1200.0, 900.0).expect("sample draws");
        diagram.frame(1.0 / 60.0);
        diagram.stop();

        let ticks = diagram.simulation().ticks();
        let grab_point = centre_of(&diagram, 4);
        let before = centre_of(&diagram, 4);
        assert!(diagram.pointer_down(4, grab_point));
        let delta = vec2(-40.0, 25.0);
        diagram.pointer_move(4, grab_point + delta);
        diagram.frame(1.0 / 60.0);

        assert_eq!(diagram.simulation().ticks(), ticks);
        assert!((centre_of(&diagram, 4) - (before + delta)).length() < 1e-2);

        diagram.resume();
        assert!(diagram.frame(1.0 / 60.0));
        assert_eq!(diagram.simulation().ticks(), ticks + 1);
    }
}
