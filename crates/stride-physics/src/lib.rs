//! Stride Physics - Picking and collision events using rapier3d
//!
//! Provides the two services the character controller consumes from the
//! physics collaborator: ray casts that report every hit along a pick ray,
//! and collision enter/exit events against the character's collider.
//!
//! Every collider carries a `u128` user-data tag. The game layer stores its
//! scene node id there and maps hits and contacts back to scene objects.

mod character_body;
mod events;

pub use character_body::{CharacterBody, CharacterBodyConfig};
pub use events::{ContactEvent, ContactPhase};

use glam::Vec3;
use nalgebra::Unit;
use rapier3d::prelude::*;

use events::CollisionRecorder;

/// Physics world configuration
#[derive(Debug, Clone)]
pub struct PhysicsConfig {
    /// Gravity vector (default: -9.81 on Y axis)
    pub gravity: Vec3,
    /// Physics timestep (default: 1/60)
    pub timestep: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            timestep: 1.0 / 60.0,
        }
    }
}

/// The physics world backing scene picking and character contacts
pub struct PhysicsWorld {
    /// Configuration
    pub config: PhysicsConfig,

    /// Rigid body storage
    pub rigid_body_set: RigidBodySet,
    /// Collider storage
    pub collider_set: ColliderSet,
    /// Impulse joint storage
    pub impulse_joint_set: ImpulseJointSet,
    /// Multi-body joint storage
    pub multibody_joint_set: MultibodyJointSet,

    /// Integration parameters
    integration_parameters: IntegrationParameters,
    /// Physics pipeline
    physics_pipeline: PhysicsPipeline,
    /// Island manager
    island_manager: IslandManager,
    /// Broad phase collision detection
    broad_phase: DefaultBroadPhase,
    /// Narrow phase collision detection
    narrow_phase: NarrowPhase,
    /// Continuous collision detection solver
    ccd_solver: CCDSolver,
    /// Query pipeline for pick rays
    query_pipeline: QueryPipeline,
    /// Collision events recorded during the last steps
    collisions: CollisionRecorder,
}

impl PhysicsWorld {
    /// Create a new physics world with default configuration
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    /// Create a new physics world with custom configuration
    pub fn with_config(config: PhysicsConfig) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = config.timestep;

        Self {
            config,
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            collisions: CollisionRecorder::default(),
        }
    }

    /// Step the physics simulation, recording collision events
    pub fn step(&mut self) {
        let gravity = vector![self.config.gravity.x, self.config.gravity.y, self.config.gravity.z];

        self.physics_pipeline.step(
            &gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &self.collisions,
        );

        self.update_queries();
    }

    /// Rebuild the query pipeline so pick rays see newly added colliders
    pub fn update_queries(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Take every collision event recorded since the last call
    pub fn drain_collisions(&self) -> Vec<ContactEvent> {
        self.collisions.drain()
    }

    /// Add a static collider (ground, walls, props)
    pub fn add_static_collider(&mut self, collider: Collider) -> ColliderHandle {
        self.collider_set.insert(collider)
    }

    /// Add a kinematic rigid body with a collider
    pub fn add_kinematic_body(
        &mut self,
        rigid_body: RigidBody,
        collider: Collider,
    ) -> (RigidBodyHandle, ColliderHandle) {
        let rb_handle = self.rigid_body_set.insert(rigid_body);
        let col_handle =
            self.collider_set
                .insert_with_parent(collider, rb_handle, &mut self.rigid_body_set);
        (rb_handle, col_handle)
    }

    /// Get the user-data tag of a collider
    pub fn collider_tag(&self, handle: ColliderHandle) -> Option<u128> {
        self.collider_set.get(handle).map(|collider| collider.user_data)
    }

    /// Cast a ray and return the first hit
    pub fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: QueryFilter,
    ) -> Option<RaycastHit> {
        self.raycast_all(origin, direction, max_distance, filter)
            .into_iter()
            .next()
    }

    /// Cast a ray and return every hit, nearest first
    pub fn raycast_all(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: QueryFilter,
    ) -> Vec<RaycastHit> {
        let Some(direction) = direction.try_normalize() else {
            return Vec::new();
        };

        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![direction.x, direction.y, direction.z],
        );

        let mut hits = Vec::new();
        self.query_pipeline.intersections_with_ray(
            &self.rigid_body_set,
            &self.collider_set,
            &ray,
            max_distance,
            true,
            filter,
            |handle, intersection| {
                let distance = intersection.time_of_impact;
                hits.push(RaycastHit {
                    collider: handle,
                    tag: self.collider_tag(handle).unwrap_or_default(),
                    distance,
                    point: origin + direction * distance,
                    normal: Vec3::new(
                        intersection.normal.x,
                        intersection.normal.y,
                        intersection.normal.z,
                    ),
                });
                true
            },
        );

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    /// Create a ground plane collider
    pub fn create_ground(&mut self, y: f32, tag: u128) -> ColliderHandle {
        let normal = Unit::new_normalize(vector![0.0, 1.0, 0.0]);
        let ground = ColliderBuilder::halfspace(normal)
            .translation(vector![0.0, y, 0.0])
            .friction(0.7)
            .restitution(0.0)
            .user_data(tag)
            .build();
        self.add_static_collider(ground)
    }

    /// Create a static box collider that the character can bump into
    pub fn create_static_box(
        &mut self,
        half_extents: Vec3,
        position: Vec3,
        tag: u128,
    ) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vector![position.x, position.y, position.z])
            .friction(0.7)
            .active_collision_types(ActiveCollisionTypes::all())
            .user_data(tag)
            .build();
        self.add_static_collider(collider)
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Detailed raycast hit information
#[derive(Debug, Clone)]
pub struct RaycastHit {
    /// The collider that was hit
    pub collider: ColliderHandle,
    /// User-data tag of the hit collider
    pub tag: u128,
    /// Distance along the ray to the hit point
    pub distance: f32,
    /// World-space hit point
    pub point: Vec3,
    /// Surface normal at hit point
    pub normal: Vec3,
}
