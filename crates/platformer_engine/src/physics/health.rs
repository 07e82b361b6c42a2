//! Hit points with an invulnerability window

use crate::foundation::time::Cooldown;

/// Hit points gated by a post-hit invulnerability window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    current: u32,
    maximum: u32,
    invulnerability: Cooldown,
}

impl Health {
    /// Full health; the invulnerability window starts finished
    pub fn new(maximum: u32, invulnerability_millis: u64) -> Self {
        Self {
            current: maximum,
            maximum,
            invulnerability: Cooldown::finished_millis(invulnerability_millis),
        }
    }

    /// Apply one point of damage
    ///
    /// Ignored while the invulnerability window is running or when already at
    /// zero. A successful hit restarts the window. Returns whether damage was
    /// applied.
    pub fn damage(&mut self) -> bool {
        if !self.invulnerability.is_finished() || self.current == 0 {
            return false;
        }
        self.invulnerability.reset();
        self.current -= 1;
        true
    }

    /// Advance the invulnerability window
    pub fn update(&mut self, delta_time: f32) {
        self.invulnerability.update(delta_time);
    }

    /// Restore full health and clear the invulnerability window
    pub fn restore(&mut self) {
        self.current = self.maximum;
        self.invulnerability.finish();
    }

    /// Remaining hit points
    pub fn current(&self) -> u32 {
        self.current
    }

    /// Starting hit points
    pub fn maximum(&self) -> u32 {
        self.maximum
    }

    /// Whether hit points reached zero
    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }

    /// Whether hits are currently ignored
    pub fn is_invulnerable(&self) -> bool {
        !self.invulnerability.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_hit_inside_window_is_ignored() {
        let mut health = Health::new(10, 500);
        assert!(health.damage());
        assert!(health.is_invulnerable());

        health.update(0.1);
        assert!(!health.damage());
        assert_eq!(health.current(), 9);
    }

    #[test]
    fn test_hit_after_window_applies() {
        let mut health = Health::new(10, 500);
        health.damage();
        health.update(0.3);
        health.update(0.3);
        assert!(!health.is_invulnerable());
        assert!(health.damage());
        assert_eq!(health.current(), 8);
    }

    #[test]
    fn test_zero_window_allows_every_hit() {
        let mut health = Health::new(3, 0);
        assert!(health.damage());
        assert!(health.damage());
        assert!(health.damage());
        assert!(health.is_depleted());
        assert!(!health.damage());
        assert_eq!(health.current(), 0);
    }

    #[test]
    fn test_restore() {
        let mut health = Health::new(2, 500);
        health.damage();
        health.restore();
        assert_eq!(health.current(), 2);
        assert!(!health.is_invulnerable());
    }
}
