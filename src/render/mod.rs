//! Builds box and line visuals for a diagram and keeps them positioned.
//!
//! The drawing itself happens behind [`RenderSurface`]: the renderer hands
//! the surface fully described visuals once, keeps the returned handles bound
//! to entity and relation indices, and afterwards only moves them.

mod visual;

use eframe::egui::{Pos2, Vec2};
use tracing::debug;

use crate::config::GeometryConfig;
use crate::diagram::{Entity, Relation};
use crate::physics::Kinematics;

pub use visual::{
    ATTRIBUTE_INK, BOX_FILL, BOX_STROKE_WIDTH, Baseline, BoxVisual, EdgeVisual, INK, METHOD_INK,
    RuleVisual, TextVisual,
};

/// Drawing capability supplied by the host.
pub trait RenderSurface {
    type BoxHandle;
    type LineHandle;

    fn create_line(&mut self, visual: EdgeVisual) -> Self::LineHandle;
    fn create_box(&mut self, visual: BoxVisual) -> Self::BoxHandle;
    fn place_box(&mut self, handle: &Self::BoxHandle, top_left: Pos2);
    fn place_line(&mut self, handle: &Self::LineHandle, from: Pos2, to: Pos2);
    /// Node index of the topmost box under `point`, if any.
    fn box_at(&self, point: Pos2) -> Option<usize>;
}

pub struct BoundBox<H> {
    pub node: usize,
    pub size: Vec2,
    pub handle: H,
}

pub struct BoundLine<H> {
    pub relation: usize,
    pub source: usize,
    pub target: usize,
    pub handle: H,
}

pub struct Visuals<B, L> {
    pub boxes: Vec<BoundBox<B>>,
    pub lines: Vec<BoundLine<L>>,
}

/// Creates one line per relation, then one box per entity, in input order.
pub fn create_visuals<S: RenderSurface>(
    surface: &mut S,
    entities: &[Entity],
    relations: &[Relation],
    geometry: &GeometryConfig,
) -> Visuals<S::BoxHandle, S::LineHandle> {
    let lines = relations
        .iter()
        .enumerate()
        .map(|(relation, edge)| BoundLine {
            relation,
            source: edge.source,
            target: edge.target,
            handle: surface.create_line(EdgeVisual::build(relation, edge)),
        })
        .collect::<Vec<_>>();

    let boxes = entities
        .iter()
        .enumerate()
        .map(|(node, entity)| {
            let visual = BoxVisual::build(node, entity, geometry);
            BoundBox {
                node,
                size: visual.size,
                handle: surface.create_box(visual),
            }
        })
        .collect::<Vec<_>>();

    debug!(boxes = boxes.len(), lines = lines.len(), "created visuals");
    Visuals { boxes, lines }
}

/// Moves every visual to match `nodes`. Boxes are centred on their node.
pub fn reposition<S: RenderSurface>(
    surface: &mut S,
    visuals: &Visuals<S::BoxHandle, S::LineHandle>,
    nodes: &[Kinematics],
) {
    for line in &visuals.lines {
        let (Some(source), Some(target)) = (nodes.get(line.source), nodes.get(line.target)) else {
            continue;
        };
        surface.place_line(
            &line.handle,
            source.position.to_pos2(),
            target.position.to_pos2(),
        );
    }

    for bound in &visuals.boxes {
        let Some(node) = nodes.get(bound.node) else {
            continue;
        };
        surface.place_box(&bound.handle, (node.position - bound.size * 0.5).to_pos2());
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use eframe::egui::{Pos2, Rect};

    use super::{BoxVisual, EdgeVisual, RenderSurface};

    /// Keeps everything it is given, in creation order.
    #[derive(Default)]
    pub(crate) struct RecordingSurface {
        pub(crate) created: Vec<&'static str>,
        pub(crate) boxes: Vec<(BoxVisual, Option<Pos2>)>,
        pub(crate) lines: Vec<(EdgeVisual, Option<(Pos2, Pos2)>)>,
        pub(crate) placements: usize,
    }

    impl RenderSurface for RecordingSurface {
        type BoxHandle = usize;
        type LineHandle = usize;

        fn create_line(&mut self, visual: EdgeVisual) -> usize {
            self.created.push("line");
            self.lines.push((visual, None));
            self.lines.len() - 1
        }

        fn create_box(&mut self, visual: BoxVisual) -> usize {
            self.created.push("box");
            self.boxes.push((visual, None));
            self.boxes.len() - 1
        }

        fn place_box(&mut self, handle: &usize, top_left: Pos2) {
            self.boxes[*handle].1 = Some(top_left);
            self.placements += 1;
        }

        fn place_line(&mut self, handle: &usize, from: Pos2, to: Pos2) {
            self.lines[*handle].1 = Some((from, to));
            self.placements += 1;
        }

        fn box_at(&self, point: Pos2) -> Option<usize> {
            self.boxes.iter().rev().find_map(|(visual, top_left)| {
                let top_left = (*top_left)?;
                Rect::from_min_size(top_left, visual.size)
                    .contains(point)
                    .then_some(visual.node)
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::testing::RecordingSurface;
    use super::*;
    use crate::diagram::sample_diagram;

    #[test]
    fn lines_are_created_before_boxes_in_input_order() {
        let data = sample_diagram();
        let mut surface = RecordingSurface::default();
        let visuals = create_visuals(
            &mut surface,
            &data.entities,
            &data.relations,
            &GeometryConfig::default(),
        );

        let mut expected = vec!["line"; 4];
        expected.extend(["box"; 5]);
        assert_eq!(surface.created, expected);
        assert_eq!(
            visuals.boxes.iter().map(|bound| bound.node).collect::<Vec<_>>(),
            [0, 1, 2, 3, 4]
        );
        assert_eq!(visuals.lines[3].source, 2);
        assert_eq!(visuals.lines[3].target, 4);
        assert_eq!(surface.boxes[3].0.tooltip, "Account");
        assert_eq!(surface.boxes[3].0.methods[0].text, "login()");
        assert_eq!(surface.placements, 0);
    }

    #[test]
    fn labels_follow_geometry_offsets() {
        let entity = Entity::new("X")
            .with_attributes(["a", "b"])
            .with_methods(["m"]);
        let config = GeometryConfig {
            line_unit: 10.0,
            ..GeometryConfig::default()
        };
        let visual = BoxVisual::build(0, &entity, &config);

        assert!((visual.size.y - 51.0).abs() < 1e-4);
        assert!((visual.attributes[1].anchor.y - 27.0).abs() < 1e-4);
        assert!((visual.methods[0].anchor.y - 40.0).abs() < 1e-4);
        assert!((visual.attribute_rule.start.y - 39.0).abs() < 1e-4);
        assert_eq!(visual.attribute_rule.start.x, 10.0);
        assert_eq!(visual.attribute_rule.end.x, 90.0);
        assert_eq!(visual.texts().count(), 4);
        assert_eq!(visual.title.baseline, Baseline::Bottom);
    }

    #[test]
    fn unlabelled_entity_still_gets_both_rules() {
        let visual = BoxVisual::build(0, &Entity::new("A"), &GeometryConfig::default());
        let [title_rule, attribute_rule] = visual.rules();
        assert!(title_rule.start.y < attribute_rule.start.y);
        assert!(attribute_rule.start.y < visual.size.y);
        assert_eq!(visual.texts().count(), 1);
    }

    #[test]
    fn reposition_centres_boxes_and_joins_centres() {
        let entities = [Entity::new("A"), Entity::new("B")];
        let relations = [Relation::new(0, 1)];
        let mut surface = RecordingSurface::default();
        let visuals = create_visuals(&mut surface, &entities, &relations, &GeometryConfig::default());

        let nodes = [
            Kinematics::at(vec2(100.0, 100.0)),
            Kinematics::at(vec2(400.0, 300.0)),
        ];
        reposition(&mut surface, &visuals, &nodes);

        let size = surface.boxes[0].0.size;
        assert_eq!(surface.boxes[0].1, Some(pos2(100.0 - size.x * 0.5, 100.0 - size.y * 0.5)));
        assert_eq!(
            surface.lines[0].1,
            Some((pos2(100.0, 100.0), pos2(400.0, 300.0)))
        );
        assert_eq!(surface.box_at(pos2(400.0, 300.0)), Some(1));
        assert_eq!(surface.box_at(pos2(250.0, 200.0)), None);
    }
}
