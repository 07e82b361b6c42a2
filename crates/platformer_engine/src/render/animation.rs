//! Frame-sequence animation state

use std::collections::HashMap;

/// Named frame sequences advanced at a fixed rate
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    sequences: HashMap<String, Vec<u32>>,
    frames_per_second: f32,
    current: String,
    frame: usize,
    elapsed: f32,
}

impl Animation {
    /// Animation with no sequences yet
    pub fn new(frames_per_second: f32) -> Self {
        Self {
            sequences: HashMap::new(),
            frames_per_second,
            current: String::new(),
            frame: 0,
            elapsed: 0.0,
        }
    }

    /// Register a sequence of atlas frame indices
    ///
    /// The first registered sequence becomes current.
    pub fn with_sequence(mut self, name: &str, frames: Vec<u32>) -> Self {
        debug_assert!(!frames.is_empty(), "sequence '{name}' has no frames");
        if self.sequences.is_empty() {
            self.current = name.to_string();
        }
        self.sequences.insert(name.to_string(), frames);
        self
    }

    /// Switch sequence; the frame restarts only when the name changes
    pub fn set_sequence(&mut self, name: &str) {
        if self.current == name {
            return;
        }
        if !self.sequences.contains_key(name) {
            log::warn!("Unknown animation sequence '{}'", name);
            return;
        }
        self.current = name.to_string();
        self.frame = 0;
        self.elapsed = 0.0;
    }

    /// Advance by `delta_time` seconds; returns true when the sequence wrapped
    pub fn update(&mut self, delta_time: f32) -> bool {
        let Some(frames) = self.sequences.get(&self.current) else {
            return false;
        };
        if self.frames_per_second <= 0.0 {
            return false;
        }

        let frame_time = 1.0 / self.frames_per_second;
        self.elapsed += delta_time;
        let mut wrapped = false;
        while self.elapsed >= frame_time {
            self.elapsed -= frame_time;
            self.frame += 1;
            if self.frame >= frames.len() {
                self.frame = 0;
                wrapped = true;
            }
        }
        wrapped
    }

    /// Name of the active sequence
    pub fn sequence(&self) -> &str {
        &self.current
    }

    /// Atlas index of the frame to draw
    pub fn current_frame(&self) -> u32 {
        self.sequences
            .get(&self.current)
            .and_then(|frames| frames.get(self.frame))
            .copied()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walker() -> Animation {
        Animation::new(10.0)
            .with_sequence("right_idle", vec![0])
            .with_sequence("right_walk", vec![1, 2, 3])
    }

    #[test]
    fn test_first_sequence_is_current() {
        let animation = walker();
        assert_eq!(animation.sequence(), "right_idle");
        assert_eq!(animation.current_frame(), 0);
    }

    #[test]
    fn test_advance_and_wrap() {
        let mut animation = walker();
        animation.set_sequence("right_walk");
        assert!(!animation.update(0.15));
        assert_eq!(animation.current_frame(), 2);
        assert!(!animation.update(0.1));
        assert_eq!(animation.current_frame(), 3);
        assert!(animation.update(0.1));
        assert_eq!(animation.current_frame(), 1);
    }

    #[test]
    fn test_same_sequence_does_not_restart() {
        let mut animation = walker();
        animation.set_sequence("right_walk");
        animation.update(0.15);
        animation.set_sequence("right_walk");
        assert_eq!(animation.current_frame(), 2);

        animation.set_sequence("right_idle");
        animation.set_sequence("right_walk");
        assert_eq!(animation.current_frame(), 1);
    }

    #[test]
    fn test_unknown_sequence_is_ignored() {
        let mut animation = walker();
        animation.set_sequence("left_fly");
        assert_eq!(animation.sequence(), "right_idle");
    }
}
