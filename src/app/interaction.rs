use eframe::egui::{self, Pos2, Rect, Ui};

use super::ViewModel;

/// Primary-button state for one frame, in canvas coordinates.
#[derive(Clone, Copy, Debug, Default)]
pub(super) struct PointerFrame {
    pub(super) pressed: bool,
    pub(super) down: bool,
    pub(super) released: bool,
    pub(super) position: Option<Pos2>,
}

impl PointerFrame {
    pub(super) fn read(ui: &Ui, canvas: Rect) -> Self {
        let origin = canvas.min.to_vec2();
        ui.input(|input| Self {
            pressed: input.pointer.primary_pressed(),
            down: input.pointer.primary_down(),
            released: input.pointer.primary_released(),
            position: input.pointer.interact_pos().map(|pos| pos - origin),
        })
    }
}

impl ViewModel {
    /// Feeds one frame of pointer input to the diagram. A press only starts
    /// a drag when it lands on a box inside the canvas; the drag moves on
    /// later frames and ends on release or when the button is no longer down.
    pub(super) fn handle_pointer(&mut self, pointer: PointerFrame, canvas_hovered: bool) {
        if pointer.pressed && canvas_hovered && self.dragging.is_none() {
            if let Some(point) = pointer.position
                && let Some(node) = self.diagram.node_at(point)
                && self.diagram.pointer_down(node, point)
            {
                self.dragging = Some(node);
            }
            return;
        }

        let Some(node) = self.dragging else {
            return;
        };

        if pointer.released || !pointer.down {
            self.diagram.pointer_up(node);
            self.dragging = None;
            return;
        }

        if let Some(point) = pointer.position {
            self.diagram.pointer_move(node, point);
        }
    }

    pub(super) fn hovered_node(&self, ui: &Ui, canvas: Rect) -> Option<usize> {
        if let Some(node) = self.dragging {
            return Some(node);
        }

        let origin = canvas.min.to_vec2();
        ui.input(|input| input.pointer.hover_pos())
            .filter(|pos| canvas.contains(*pos))
            .and_then(|pos| self.diagram.node_at(pos - origin))
    }

    pub(super) fn update_cursor(&self, ui: &Ui, hovered: Option<usize>) {
        let icon = if self.dragging.is_some() {
            egui::CursorIcon::Grabbing
        } else if hovered.is_some() {
            egui::CursorIcon::Grab
        } else {
            return;
        };
        ui.output_mut(|output| {
            output.cursor_icon = icon;
        });
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use class_force::draw;

    use super::super::canvas::{CANVAS_CONTAINER, CanvasHost};
    use super::*;

    fn model() -> ViewModel {
        let mut host = CanvasHost::new(CANVAS_CONTAINER);
        let mut diagram = draw(&mut host, CANVAS_CONTAINER, 1200.0, 900.0).expect("sample draws");
        diagram.frame(1.0 / 60.0);
        ViewModel::new(diagram)
    }

    fn centre(model: &ViewModel, node: usize) -> Pos2 {
        model
            .diagram
            .simulation()
            .position(node)
            .expect("node exists")
            .to_pos2()
    }

    #[test]
    fn press_move_release_drives_one_drag() {
        let mut model = model();
        let start = centre(&model, 4);

        model.handle_pointer(
            PointerFrame {
                pressed: true,
                down: true,
                position: Some(start),
                ..Default::default()
            },
            true,
        );
        assert_eq!(model.dragging, Some(4));

        model.handle_pointer(
            PointerFrame {
                down: true,
                position: Some(start + vec2(30.0, 0.0)),
                ..Default::default()
            },
            true,
        );
        let pinned = model.diagram.simulation().node(4).and_then(|node| node.pin);
        assert!(pinned.is_some_and(|pin| (pin - (start.to_vec2() + vec2(30.0, 0.0))).length() < 1e-2));

        model.handle_pointer(
            PointerFrame {
                released: true,
                position: Some(start),
                ..Default::default()
            },
            true,
        );
        assert_eq!(model.dragging, None);
        assert!(!model.diagram.drag().is_dragging());
    }

    #[test]
    fn press_outside_canvas_or_on_background_does_nothing() {
        let mut model = model();
        let start = centre(&model, 0);
        let press = |position| PointerFrame {
            pressed: true,
            down: true,
            position: Some(position),
            ..Default::default()
        };

        model.handle_pointer(press(start), false);
        assert_eq!(model.dragging, None);

        model.handle_pointer(press(Pos2::new(-400.0, -400.0)), true);
        assert_eq!(model.dragging, None);
        assert!(!model.diagram.drag().is_dragging());
    }

    #[test]
    fn lost_button_ends_the_drag() {
        let mut model = model();
        let start = centre(&model, 4);
        model.handle_pointer(
            PointerFrame {
                pressed: true,
                down: true,
                position: Some(start),
                ..Default::default()
            },
            true,
        );
        model.handle_pointer(PointerFrame::default(), false);
        assert_eq!(model.dragging, None);
        assert!(!model.diagram.drag().is_dragging());
    }
}
