/// Turns frame deltas from the host's animation loop into whole simulation
/// ticks at a fixed rate.
#[derive(Clone, Debug)]
pub struct FrameClock {
    tick_seconds: f32,
    max_ticks: usize,
    carry: f32,
}

impl FrameClock {
    /// Longest frame delta taken into account; anything longer (a stalled
    /// window, a debugger pause) is treated as this.
    const MAX_FRAME_SECONDS: f32 = 0.25;

    pub fn new(ticks_per_second: f32, max_ticks: usize) -> Self {
        Self {
            tick_seconds: 1.0 / ticks_per_second.clamp(1.0, 1000.0),
            max_ticks: max_ticks.max(1),
            carry: 0.0,
        }
    }

    pub fn advance(&mut self, delta_seconds: f32) -> usize {
        if !delta_seconds.is_finite() {
            return 0;
        }

        self.carry += delta_seconds.clamp(0.0, Self::MAX_FRAME_SECONDS);
        let due = (self.carry / self.tick_seconds).floor() as usize;
        let ticks = due.min(self.max_ticks);
        self.carry -= ticks as f32 * self.tick_seconds;
        if ticks == self.max_ticks {
            self.carry = self.carry.min(self.tick_seconds);
        }
        ticks
    }

    pub fn reset(&mut self) {
        self.carry = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sixty_hertz_frames_give_one_tick_on_average() {
        let mut clock = FrameClock::new(60.0, 4);
        let total: usize = (0..600).map(|_| clock.advance(1.0 / 60.0)).sum();
        assert!((599..=600).contains(&total), "{total}");
    }

    #[test]
    fn long_frames_are_capped_without_backlog() {
        let mut clock = FrameClock::new(60.0, 4);
        assert_eq!(clock.advance(2.0), 4);
        assert!(clock.advance(0.0) <= 1);
    }

    #[test]
    fn short_frames_accumulate() {
        let mut clock = FrameClock::new(60.0, 4);
        assert_eq!(clock.advance(1.0 / 240.0), 0);
        assert_eq!(clock.advance(1.0 / 240.0), 0);
        assert_eq!(clock.advance(1.0 / 240.0), 0);
        assert_eq!(clock.advance(1.0 / 120.0), 1);
    }
}
