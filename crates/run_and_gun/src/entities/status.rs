//! Animation status of characters

use platformer_engine::render::Animation;
use std::fmt;

/// Horizontal facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    /// Facing negative x
    Left,
    /// Facing positive x
    #[default]
    Right,
}

impl Facing {
    /// -1 for left, 1 for right
    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    /// Facing from `from_x` toward `to_x`; ties face right
    pub fn toward(from_x: f32, to_x: f32) -> Self {
        if to_x < from_x {
            Self::Left
        } else {
            Self::Right
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Body pose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pose {
    /// Standing still
    #[default]
    Idle,
    /// Walking on a floor
    Walk,
    /// Airborne
    Jump,
    /// Crouching on a floor
    Duck,
}

impl Pose {
    const ALL: [Self; 4] = [Self::Idle, Self::Walk, Self::Jump, Self::Duck];

    fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Walk => "walk",
            Self::Jump => "jump",
            Self::Duck => "duck",
        }
    }
}

/// Facing plus pose, displayed as `"<facing>_<pose>"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Status {
    /// Horizontal facing
    pub facing: Facing,
    /// Body pose
    pub pose: Pose,
}

impl Status {
    /// Pose for this step, in priority order: duck, airborne, idle or walk
    pub fn resolve_pose(on_floor: bool, ducking: bool, moving: bool) -> Pose {
        if on_floor && ducking {
            Pose::Duck
        } else if !on_floor {
            Pose::Jump
        } else if moving {
            Pose::Walk
        } else {
            Pose::Idle
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.facing.as_str(), self.pose.as_str())
    }
}

/// Animation with a sequence for every status
///
/// Strip frames are laid out pose by pose (walking alternates two frames).
/// Both facings share a frame; left-facing sprites are drawn mirrored.
pub fn character_animation() -> Animation {
    let mut animation = Animation::new(10.0);
    let mut frame = 0;
    for pose in Pose::ALL {
        let frames = if pose == Pose::Walk {
            vec![frame, frame + 1]
        } else {
            vec![frame]
        };
        frame += frames.len() as u32;
        for facing in [Facing::Right, Facing::Left] {
            animation = animation.with_sequence(&Status { facing, pose }.to_string(), frames.clone());
        }
    }
    animation
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let status = Status {
            facing: Facing::Left,
            pose: Pose::Duck,
        };
        assert_eq!(status.to_string(), "left_duck");
        assert_eq!(Status::default().to_string(), "right_idle");
    }

    #[test]
    fn test_pose_priority() {
        assert_eq!(Status::resolve_pose(true, true, true), Pose::Duck);
        assert_eq!(Status::resolve_pose(false, true, false), Pose::Jump);
        assert_eq!(Status::resolve_pose(false, false, true), Pose::Jump);
        assert_eq!(Status::resolve_pose(true, false, true), Pose::Walk);
        assert_eq!(Status::resolve_pose(true, false, false), Pose::Idle);
    }

    #[test]
    fn test_toward() {
        assert_eq!(Facing::toward(100.0, 50.0), Facing::Left);
        assert_eq!(Facing::toward(100.0, 150.0), Facing::Right);
        assert_eq!(Facing::toward(100.0, 100.0), Facing::Right);
    }

    #[test]
    fn test_character_animation_has_every_status() {
        let mut animation = character_animation();
        assert_eq!(animation.sequence(), "right_idle");
        animation.set_sequence("left_walk");
        assert_eq!(animation.sequence(), "left_walk");
    }

    #[test]
    fn test_facings_share_frames() {
        let mut animation = character_animation();
        animation.set_sequence("right_duck");
        let right = animation.current_frame();
        animation.set_sequence("left_duck");
        assert_eq!(animation.current_frame(), right);
        assert_eq!(right, 4);
    }
}
