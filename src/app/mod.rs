use std::collections::VecDeque;

use eframe::egui::{self, Context, Sense, Ui, vec2};
use tracing::error;

use class_force::{Diagram, DiagramConfig, DiagramData, draw_diagram};

mod canvas;
mod interaction;
mod ui;

pub use canvas::CANVAS_CONTAINER;

use canvas::{Canvas, CanvasHost};
use interaction::PointerFrame;

/// Everything needed to open the viewer.
pub struct Launch {
    pub container: String,
    pub width: f32,
    pub height: f32,
    pub data: DiagramData,
    pub config: DiagramConfig,
}

pub struct ClassDiagramApp {
    state: AppState,
}

enum AppState {
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    diagram: Diagram<Canvas>,
    dragging: Option<usize>,
    live_physics: bool,
    fps_current: f32,
    fps_samples: VecDeque<f32>,
}

impl ClassDiagramApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, launch: Launch) -> Self {
        let mut host = CanvasHost::new(CANVAS_CONTAINER);
        let state = match draw_diagram(
            &mut host,
            &launch.container,
            vec2(launch.width, launch.height),
            launch.data,
            &launch.config,
        ) {
            Ok(diagram) => AppState::Ready(Box::new(ViewModel::new(diagram))),
            Err(err) => {
                error!(container = %launch.container, "failed to draw diagram: {err}");
                AppState::Error(err.to_string())
            }
        };
        Self { state }
    }
}

impl eframe::App for ClassDiagramApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        match &mut self.state {
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to draw the class diagram");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                });
            }
            AppState::Ready(model) => model.show(ctx),
        }
    }
}

impl ViewModel {
    fn new(diagram: Diagram<Canvas>) -> Self {
        Self {
            diagram,
            dragging: None,
            live_physics: true,
            fps_current: 0.0,
            fps_samples: VecDeque::new(),
        }
    }

    fn show(&mut self, ctx: &Context) {
        self.update_fps_counter(ctx);

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| self.draw_status_bar(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both()
                .auto_shrink([false, false])
                .show(ui, |ui| self.draw_canvas(ui));
        });
    }

    fn draw_canvas(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(self.diagram.size(), Sense::click_and_drag());

        self.handle_pointer(PointerFrame::read(ui, rect), response.hovered());

        let frame_delta_seconds = ui.ctx().input(|input| input.stable_dt);
        self.diagram.frame(frame_delta_seconds);

        if self.diagram.is_animating() || self.dragging.is_some() {
            ui.ctx().request_repaint();
        }

        let hovered = self.hovered_node(ui, rect);
        self.update_cursor(ui, hovered);

        let painter = ui.painter_at(rect);
        self.diagram
            .surface()
            .paint(&painter, rect.min.to_vec2(), hovered);

        if self.dragging.is_none()
            && let Some(name) = hovered.and_then(|node| self.diagram.surface().tooltip(node))
        {
            response.on_hover_text(name);
        }
    }
}
