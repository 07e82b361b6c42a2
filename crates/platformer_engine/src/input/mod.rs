//! Input polling contract
//!
//! Gameplay code asks whether an action is held; the platform layer decides
//! which keys map to which action.

use bitflags::bitflags;

bitflags! {
    /// Logical game actions
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Actions: u8 {
        /// Move left
        const LEFT = 1 << 0;
        /// Move right
        const RIGHT = 1 << 1;
        /// Jump
        const UP = 1 << 2;
        /// Duck
        const DOWN = 1 << 3;
        /// Shoot
        const FIRE = 1 << 4;
    }
}

/// Something that can be polled for held actions
pub trait InputSource {
    /// Whether every action in `actions` is held
    fn is_pressed(&self, actions: Actions) -> bool;
}

/// Snapshot of held actions for one step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputState {
    held: Actions,
}

impl InputState {
    /// Snapshot with `held` actions down
    pub fn new(held: Actions) -> Self {
        Self { held }
    }

    /// Mark actions as held or released
    pub fn set(&mut self, actions: Actions, pressed: bool) {
        self.held.set(actions, pressed);
    }

    /// Currently held actions
    pub fn held(&self) -> Actions {
        self.held
    }
}

impl InputSource for InputState {
    fn is_pressed(&self, actions: Actions) -> bool {
        self.held.contains(actions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release() {
        let mut input = InputState::default();
        assert!(!input.is_pressed(Actions::LEFT));

        input.set(Actions::LEFT | Actions::FIRE, true);
        assert!(input.is_pressed(Actions::LEFT));
        assert!(input.is_pressed(Actions::FIRE));
        assert!(!input.is_pressed(Actions::RIGHT));

        input.set(Actions::LEFT, false);
        assert!(!input.is_pressed(Actions::LEFT));
        assert_eq!(input.held(), Actions::FIRE);
    }
}
