use eframe::egui::{Align, Layout, Ui};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_status_bar(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.heading("class-force");
            ui.separator();
            ui.label(format!("classes: {}", self.diagram.entities().len()));
            ui.label(format!("relations: {}", self.diagram.relations().len()));
            ui.separator();
            ui.label(self.layout_status_text());

            if ui.button("Reheat").clicked() {
                self.diagram.reheat();
            }
            if ui.checkbox(&mut self.live_physics, "Live physics").changed() {
                if self.live_physics {
                    self.diagram.resume();
                } else {
                    self.diagram.stop();
                }
            }

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if let Some(fps_text) = self.fps_display_text() {
                    ui.label(fps_text);
                }
            });
        });
    }

    pub(in crate::app) fn layout_status_text(&self) -> String {
        let simulation = self.diagram.simulation();
        let regime = if simulation.is_attached() {
            simulation.regime().label()
        } else {
            "stopped"
        };
        format!(
            "layout: {regime} | alpha {:.3} | ticks {}",
            simulation.alpha(),
            simulation.ticks()
        )
    }
}
