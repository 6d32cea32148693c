//! Kinematic collider that follows the controlled character
//!
//! The character controller integrates position itself; this body only
//! mirrors that position into the physics world so contacts with props are
//! detected and reported as collision events.

use glam::Vec3;
use rapier3d::prelude::*;

use crate::PhysicsWorld;

/// Character collider configuration
#[derive(Debug, Clone)]
pub struct CharacterBodyConfig {
    /// Half extents of the box collider (default: 0.35 x 1.0 x 0.35)
    pub half_extents: Vec3,
    /// Collider offset from the character's feet (default: 1.0 up)
    pub offset: Vec3,
}

impl Default for CharacterBodyConfig {
    fn default() -> Self {
        Self {
            half_extents: Vec3::new(0.35, 1.0, 0.35),
            offset: Vec3::new(0.0, 1.0, 0.0),
        }
    }
}

/// Handles of the character's kinematic body in the physics world
#[derive(Debug, Clone)]
pub struct CharacterBody {
    /// Configuration
    pub config: CharacterBodyConfig,
    /// Rigid body handle
    pub body: RigidBodyHandle,
    /// Collider handle, matched against contact events
    pub collider: ColliderHandle,
}

impl CharacterBody {
    /// Spawn the character body at `position` with the given user-data tag
    pub fn spawn(
        physics: &mut PhysicsWorld,
        config: CharacterBodyConfig,
        position: Vec3,
        tag: u128,
    ) -> Self {
        let rigid_body = RigidBodyBuilder::kinematic_position_based()
            .translation(vector![position.x, position.y, position.z])
            .build();

        let collider = ColliderBuilder::cuboid(
            config.half_extents.x,
            config.half_extents.y,
            config.half_extents.z,
        )
        .translation(vector![config.offset.x, config.offset.y, config.offset.z])
        .active_events(ActiveEvents::COLLISION_EVENTS)
        .active_collision_types(ActiveCollisionTypes::all())
        .user_data(tag)
        .build();

        let (body, collider) = physics.add_kinematic_body(rigid_body, collider);
        Self {
            config,
            body,
            collider,
        }
    }

    /// Move the body to `position` during the next physics step
    pub fn follow(&self, physics: &mut PhysicsWorld, position: Vec3) {
        if let Some(body) = physics.rigid_body_set.get_mut(self.body) {
            body.set_next_kinematic_translation(vector![position.x, position.y, position.z]);
        }
    }

    /// Place the body at `position` immediately (teleport)
    pub fn set_position(&self, physics: &mut PhysicsWorld, position: Vec3) {
        if let Some(body) = physics.rigid_body_set.get_mut(self.body) {
            body.set_translation(vector![position.x, position.y, position.z], true);
        }
    }

    /// Current body position
    pub fn position(&self, physics: &PhysicsWorld) -> Option<Vec3> {
        physics.rigid_body_set.get(self.body).map(|body| {
            let translation = body.translation();
            Vec3::new(translation.x, translation.y, translation.z)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_body_config() {
        let config = CharacterBodyConfig::default();
        assert_eq!(config.half_extents, Vec3::new(0.35, 1.0, 0.35));
        assert_eq!(config.offset.y, 1.0);
    }

    #[test]
    fn test_spawn_and_teleport() {
        let mut physics = PhysicsWorld::new();
        let body = CharacterBody::spawn(
            &mut physics,
            CharacterBodyConfig::default(),
            Vec3::new(1.0, 0.0, 2.0),
            42,
        );

        assert_eq!(physics.collider_tag(body.collider), Some(42));
        assert_eq!(body.position(&physics), Some(Vec3::new(1.0, 0.0, 2.0)));

        body.set_position(&mut physics, Vec3::new(5.0, 0.0, 5.0));
        assert_eq!(body.position(&physics), Some(Vec3::new(5.0, 0.0, 5.0)));
    }

    #[test]
    fn test_contact_with_static_box_is_recorded() {
        let mut physics = PhysicsWorld::new();
        let wall = physics.create_static_box(Vec3::splat(0.5), Vec3::new(3.0, 1.0, 0.0), 9);
        let body = CharacterBody::spawn(&mut physics, CharacterBodyConfig::default(), Vec3::ZERO, 42);

        physics.step();
        assert!(physics.drain_collisions().is_empty());

        body.follow(&mut physics, Vec3::new(2.5, 0.0, 0.0));
        physics.step();
        physics.step();

        let started: Vec<_> = physics
            .drain_collisions()
            .into_iter()
            .filter(|contact| contact.phase == crate::ContactPhase::Started)
            .filter_map(|contact| contact.other(body.collider))
            .collect();
        assert_eq!(started, vec![(wall, Some(9))]);
    }
}
