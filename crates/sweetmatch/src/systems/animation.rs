/// Accumulate-and-check timer for the crush animation window.
/// The game logic waits on it; the host animates while it runs.
#[derive(Debug, Clone)]
pub struct CrushTimer {
    pub elapsed: f32,
    pub duration: f32,
    active: bool,
}

impl CrushTimer {
    pub fn new(duration: f32) -> Self {
        CrushTimer {
            elapsed: 0.0,
            duration,
            active: false,
        }
    }

    /// Restart from zero.
    pub fn start(&mut self) {
        self.elapsed = 0.0;
        self.active = true;
    }

    pub fn stop(&mut self) {
        self.elapsed = 0.0;
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Advance the timer. Returns true on the tick the window closes; the
    /// timer is then inactive until the next `start`.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.active {
            return false;
        }
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            self.stop();
            return true;
        }
        false
    }

    /// 0.0 -> 1.0 over the window.
    pub fn progress(&self) -> f32 {
        if !self.active || self.duration <= 0.0 {
            return 0.0;
        }
        (self.elapsed / self.duration).min(1.0)
    }
}

/// Flashing overlay strength for cells waiting to be crushed, in [0, 1].
pub fn match_pulse(time: f32) -> f32 {
    ((120.0 + 120.0 * (time * 20.0).sin()) / 255.0).clamp(0.0, 1.0)
}
