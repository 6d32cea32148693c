//! Per-tick locomotion step

use stride_core::Transform;

use crate::player::Character;

use super::{LocomotionConfig, LocomotionState, NavigationTarget};

/// Per-tick inputs owned by other systems
#[derive(Debug, Clone, Copy, Default)]
pub struct TickContext {
    /// Seconds since the previous tick
    pub delta_time: f32,
    /// Game is paused
    pub paused: bool,
    /// A placement sequence owns the character
    pub placement_active: bool,
}

/// What a locomotion step did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocomotionStep {
    /// Movement suppressed this tick, target kept
    Blocked,
    /// No target; the character is (now) idle
    Halted,
    /// Target reached and cleared
    Arrived,
    /// Moved toward the target
    Moved { remaining: f32 },
}

/// Integrates the character toward its navigation target
#[derive(Debug, Clone, Default)]
pub struct LocomotionController {
    /// Locomotion configuration
    pub config: LocomotionConfig,
}

impl LocomotionController {
    /// Create a controller with custom config
    pub fn with_config(config: LocomotionConfig) -> Self {
        Self { config }
    }

    /// Run one locomotion tick
    pub fn step(
        &self,
        character: &mut Character,
        target: &mut Option<NavigationTarget>,
        ctx: TickContext,
    ) -> LocomotionStep {
        let Some(nav) = *target else {
            character.state = LocomotionState::Idle;
            return LocomotionStep::Halted;
        };

        if ctx.paused || ctx.placement_active || character.is_colliding || character.is_teleporting {
            return LocomotionStep::Blocked;
        }

        let offset = character.transform.planar_offset_to(nav.point());
        let distance = offset.length();

        if distance < self.config.stop_threshold {
            *target = None;
            character.state = LocomotionState::Idle;
            return LocomotionStep::Arrived;
        }

        let running = nav.wants_run();
        character.state = if running {
            LocomotionState::Running
        } else {
            LocomotionState::Walking
        };

        let direction = offset / distance;
        let step = self.config.speed(running).min(distance);
        // Planar move, height untouched
        character.transform.position += direction * step;

        if let Some(desired) = Transform::facing_rotation(direction) {
            let t = self.config.turn_factor(ctx.delta_time);
            character.transform.rotation = character.transform.rotation.slerp(desired, t).normalize();
        }

        LocomotionStep::Moved {
            remaining: distance - step,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::{Quat, Vec3};

    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn ctx() -> TickContext {
        TickContext {
            delta_time: DT,
            ..Default::default()
        }
    }

    fn walk_to(point: Vec3) -> Option<NavigationTarget> {
        Some(NavigationTarget::Explicit { point, run: false })
    }

    #[test]
    fn test_single_walk_step() {
        let locomotion = LocomotionController::default();
        let mut character = Character::default();
        let mut target = walk_to(Vec3::new(5.0, 0.0, 0.0));

        let step = locomotion.step(&mut character, &mut target, ctx());

        assert!(matches!(step, LocomotionStep::Moved { .. }));
        assert!((character.position().x - 0.014).abs() < 1e-6);
        assert_eq!(character.position().y, 0.0);
        assert_eq!(character.position().z, 0.0);
        assert_eq!(character.state, LocomotionState::Walking);
    }

    #[test]
    fn test_each_step_closes_distance_by_speed() {
        let locomotion = LocomotionController::default();
        let mut character = Character::default();
        let goal = Vec3::new(1.0, 0.0, -2.0);
        let mut target = Some(NavigationTarget::Explicit {
            point: goal,
            run: true,
        });

        let mut distance = character.transform.planar_distance_to(goal);
        while distance >= locomotion.config.stop_threshold {
            locomotion.step(&mut character, &mut target, ctx());
            let next = character.transform.planar_distance_to(goal);
            assert!((distance - next - 0.035_f32.min(distance)).abs() < 1e-4);
            assert_eq!(character.state, LocomotionState::Running);
            distance = next;
        }

        locomotion.step(&mut character, &mut target, ctx());
        assert_eq!(character.state, LocomotionState::Idle);
        assert!(target.is_none());
    }

    #[test]
    fn test_walk_scenario_reaches_target() {
        let locomotion = LocomotionController::default();
        let mut character = Character::default();
        let goal = Vec3::new(5.0, 0.0, 0.0);
        let mut target = walk_to(goal);

        let ticks = (5.0_f32 / 0.014).ceil() as usize;
        for _ in 0..ticks {
            locomotion.step(&mut character, &mut target, ctx());
        }

        assert!(character.transform.planar_distance_to(goal) < 0.25);
        assert_eq!(character.state, LocomotionState::Idle);
        assert!(target.is_none());
    }

    #[test]
    fn test_close_target_clears_within_one_tick() {
        let locomotion = LocomotionController::default();
        let mut character = Character::default();
        character.state = LocomotionState::Walking;
        let mut target = walk_to(Vec3::new(0.1, 0.0, 0.1));

        let step = locomotion.step(&mut character, &mut target, ctx());

        assert_eq!(step, LocomotionStep::Arrived);
        assert_eq!(character.state, LocomotionState::Idle);
        assert!(target.is_none());
        assert_eq!(character.position(), Vec3::ZERO);
    }

    #[test]
    fn test_blocked_keeps_target_and_position() {
        let locomotion = LocomotionController::default();
        let goal = walk_to(Vec3::new(5.0, 0.0, 0.0));

        for ctx in [
            TickContext {
                paused: true,
                ..ctx()
            },
            TickContext {
                placement_active: true,
                ..ctx()
            },
        ] {
            let mut character = Character::default();
            let mut target = goal;
            assert_eq!(locomotion.step(&mut character, &mut target, ctx), LocomotionStep::Blocked);
            assert_eq!(character.position(), Vec3::ZERO);
            assert!(target.is_some());
        }

        let mut character = Character::default();
        character.is_colliding = true;
        let mut target = goal;
        assert_eq!(locomotion.step(&mut character, &mut target, ctx()), LocomotionStep::Blocked);

        let mut character = Character::default();
        character.is_teleporting = true;
        assert_eq!(locomotion.step(&mut character, &mut target, ctx()), LocomotionStep::Blocked);
    }

    #[test]
    fn test_no_target_halts_moving_character() {
        let locomotion = LocomotionController::default();
        let mut character = Character::default();
        character.state = LocomotionState::Running;
        let mut target = None;

        assert_eq!(locomotion.step(&mut character, &mut target, ctx()), LocomotionStep::Halted);
        assert_eq!(character.state, LocomotionState::Idle);
    }

    #[test]
    fn test_implicit_target_walks() {
        let locomotion = LocomotionController::default();
        let mut character = Character::default();
        let mut target = Some(NavigationTarget::Implicit {
            point: Vec3::new(0.0, 0.0, 3.0),
        });

        locomotion.step(&mut character, &mut target, ctx());
        assert_eq!(character.state, LocomotionState::Walking);
        assert!((character.position().z - 0.014).abs() < 1e-6);
    }

    #[test]
    fn test_turns_toward_travel_direction() {
        let locomotion = LocomotionController::default();
        let mut character = Character::default();
        let mut target = walk_to(Vec3::new(10.0, 0.0, 0.0));

        locomotion.step(&mut character, &mut target, ctx());
        let partial = character.transform.forward();
        assert!(partial.x > 0.0 && partial.x < 1.0);

        for _ in 0..120 {
            locomotion.step(&mut character, &mut target, ctx());
        }
        let facing = character.transform.forward();
        assert!((facing - Vec3::X).length() < 1e-3);
        assert!(character.transform.rotation.is_normalized());
        assert_ne!(character.transform.rotation, Quat::IDENTITY);
    }
}
