use eframe::egui::Context;

use super::super::ViewModel;

const FPS_SAMPLE_WINDOW: usize = 180;

impl ViewModel {
    pub(in crate::app) fn update_fps_counter(&mut self, ctx: &Context) {
        let dt = ctx.input(|input| input.stable_dt);
        self.record_frame_time(dt);
    }

    fn record_frame_time(&mut self, dt: f32) {
        if dt <= f32::EPSILON {
            return;
        }

        self.fps_current = (1.0 / dt).clamp(0.0, 1000.0);
        self.fps_samples.push_back(self.fps_current);
        while self.fps_samples.len() > FPS_SAMPLE_WINDOW {
            self.fps_samples.pop_front();
        }
    }

    pub(in crate::app) fn fps_display_text(&self) -> Option<String> {
        if self.fps_samples.is_empty() {
            return None;
        }

        let avg = self.fps_samples.iter().sum::<f32>() / self.fps_samples.len() as f32;
        Some(format!(
            "FPS {:.0} | avg {:.1} | {:.1} ms",
            self.fps_current,
            avg,
            1000.0 / self.fps_current.max(f32::EPSILON)
        ))
    }
}

#[cfg(test)]
mod tests {
    use class_force::draw;

    use super::super::super::canvas::{CANVAS_CONTAINER, CanvasHost};
    use super::*;

    fn model() -> ViewModel {
        let mut host = CanvasHost::new(CANVAS_CONTAINER);
        ViewModel::new(draw(&mut host, CANVAS_CONTAINER, 400.0, 300.0).expect("sample draws"))
    }

    #[test]
    fn no_text_until_a_frame_is_recorded() {
        let mut model = model();
        assert_eq!(model.fps_display_text(), None);

        model.record_frame_time(0.0);
        assert_eq!(model.fps_display_text(), None);

        model.record_frame_time(0.02);
        assert_eq!(
            model.fps_display_text().as_deref(),
            Some("FPS 50 | avg 50.0 | 20.0 ms")
        );
    }

    #[test]
    fn sample_window_is_bounded() {
        let mut model = model();
        for _ in 0..(FPS_SAMPLE_WINDOW + 40) {
            model.record_frame_time(1.0 / 60.0);
        }
        assert_eq!(model.fps_samples.len(), FPS_SAMPLE_WINDOW);
    }
}
