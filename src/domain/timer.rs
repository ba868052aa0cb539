/// Countdown: the per-scenario decision timer.
///
/// Owned by the session and driven by the fixed-interval sim tick, counting
/// abstract ticks (the loop decides how long a tick is). The rules:
///   - `start` arms it at full duration; `stop` disarms it.
///   - `tick` is a no-op while stopped, so a stopped timer can never fire.
///   - Expiry reports exactly once: the tick that reaches 0 stops the
///     timer and returns true.
///
/// Every path that leaves the playing-undecided state must `stop` the
/// countdown; `decide`, timeout, reset and finish all do.
#[derive(Clone, Debug)]
pub struct Countdown {
    remaining: u32,
    duration: u32,
    running: bool,
}

impl Countdown {
    /// A stopped countdown showing full duration.
    pub fn new(duration: u32) -> Self {
        Countdown { remaining: duration, duration, running: false }
    }

    /// Arm at full duration (restarts if already running).
    pub fn start(&mut self, duration: u32) {
        self.remaining = duration;
        self.duration = duration;
        self.running = true;
    }

    /// Disarm. Remaining keeps its last value for display.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    /// Remaining fraction: 1.0 freshly started, 0.0 expired.
    pub fn fraction(&self) -> f32 {
        if self.duration == 0 {
            return 0.0;
        }
        self.remaining as f32 / self.duration as f32
    }

    /// Advance one tick. Returns true on the tick that expires the timer.
    /// No-op (and false) while stopped; remaining never goes below 0.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        if self.remaining > 0 {
            self.remaining -= 1;
        }
        if self.remaining == 0 {
            self.running = false;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_lifecycle() {
        let mut c = Countdown::new(45);
        assert!(!c.is_running());
        assert_eq!(c.remaining(), 45);

        c.start(3);
        assert!(c.is_running());
        assert!(!c.tick()); // 3→2
        assert!(!c.tick()); // 2→1
        assert!(c.tick()); // 1→0, expired
        assert!(!c.is_running());
        assert_eq!(c.remaining(), 0);
    }

    #[test]
    fn expiry_fires_once() {
        let mut c = Countdown::new(1);
        c.start(1);
        assert!(c.tick());
        // Further ticks on the dead timer stay silent and stay at 0.
        assert!(!c.tick());
        assert!(!c.tick());
        assert_eq!(c.remaining(), 0);
    }

    #[test]
    fn stopped_timer_never_fires() {
        let mut c = Countdown::new(2);
        c.start(2);
        assert!(!c.tick()); // 2→1
        c.stop();
        for _ in 0..10 {
            assert!(!c.tick());
        }
        // Remaining frozen where stop caught it.
        assert_eq!(c.remaining(), 1);
    }

    #[test]
    fn restart_resets_remaining() {
        let mut c = Countdown::new(5);
        c.start(5);
        c.tick();
        c.tick();
        assert_eq!(c.remaining(), 3);
        c.start(5);
        assert_eq!(c.remaining(), 5);
        assert!(c.is_running());
    }

    #[test]
    fn fraction_spans_full_to_empty() {
        let mut c = Countdown::new(4);
        c.start(4);
        assert!((c.fraction() - 1.0).abs() < 0.01);
        c.tick();
        c.tick();
        assert!((c.fraction() - 0.5).abs() < 0.01);
        c.tick();
        c.tick();
        assert!((c.fraction() - 0.0).abs() < 0.01);
        // Degenerate zero duration reads as expired, not a division blowup.
        assert!((Countdown::new(0).fraction() - 0.0).abs() < 0.01);
    }

    #[test]
    fn zero_duration_expires_on_first_tick() {
        let mut c = Countdown::new(0);
        c.start(0);
        assert!(c.tick());
        assert!(!c.is_running());
    }
}
