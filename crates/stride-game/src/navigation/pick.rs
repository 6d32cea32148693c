//! Scene picking: ownership graph, pick tags and camera rays

use glam::{Mat4, Vec2, Vec3};
use rapier3d::prelude::QueryFilter;
use stride_physics::PhysicsWorld;
use tracing::warn;

use crate::player::CollisionPeer;

/// Kind string marking walkable ground
pub const FLOOR_KIND: &str = "floor";

/// Farthest distance a pick ray travels
pub const PICK_DISTANCE: f32 = 1000.0;

/// Index of a node in the [`PickGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Encode as a physics collider tag. Tag 0 means "no scene node".
    pub fn to_tag(self) -> u128 {
        u128::from(self.0) + 1
    }

    /// Decode a physics collider tag
    pub fn from_tag(tag: u128) -> Option<Self> {
        let index = tag.checked_sub(1)?;
        u32::try_from(index).ok().map(NodeId)
    }
}

/// Metadata that makes a node pickable
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PickTag {
    /// Clicking the node targets the object itself, not the ground under it
    pub interactive: bool,
    /// Object id, required for interactive nodes
    pub id: Option<String>,
    /// Object kind; [`FLOOR_KIND`] marks ground
    pub kind: Option<String>,
}

impl PickTag {
    /// Walkable ground
    pub fn floor() -> Self {
        Self {
            interactive: false,
            id: None,
            kind: Some(FLOOR_KIND.to_string()),
        }
    }

    /// An object the player can walk up to and interact with
    pub fn interactive(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            interactive: true,
            id: Some(id.into()),
            kind: Some(kind.into()),
        }
    }

    /// Pickable scenery that is neither ground nor interactive
    pub fn prop() -> Self {
        Self::default()
    }

    pub fn is_floor(&self) -> bool {
        self.kind.as_deref() == Some(FLOOR_KIND)
    }

    /// `{id, kind}` of an interactive node, `None` when either is missing
    pub fn interactive_object(&self) -> Option<InteractiveObject> {
        if !self.interactive {
            return None;
        }
        match (&self.id, &self.kind) {
            (Some(id), Some(kind)) if !id.is_empty() && !kind.is_empty() => Some(InteractiveObject {
                id: id.clone(),
                kind: kind.clone(),
            }),
            _ => None,
        }
    }
}

/// Identity of a clicked interactive object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractiveObject {
    pub id: String,
    pub kind: String,
}

#[derive(Debug, Clone)]
struct PickNode {
    name: String,
    parent: Option<NodeId>,
    tag: Option<PickTag>,
}

/// Ownership chain of scene objects as seen by picking.
///
/// Leaf meshes are usually untagged; a hit on them resolves to the nearest
/// tagged ancestor.
#[derive(Debug, Clone, Default)]
pub struct PickGraph {
    nodes: Vec<PickNode>,
}

impl PickGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node. Parents must already exist.
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        parent: Option<NodeId>,
        tag: Option<PickTag>,
    ) -> NodeId {
        let name = name.into();
        let parent = match parent {
            Some(parent) if self.contains(parent) => Some(parent),
            Some(parent) => {
                warn!(?parent, %name, "unknown parent node, adding as root");
                None
            }
            None => None,
        };

        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(PickNode { name, parent, tag });
        id
    }

    pub fn contains(&self, node: NodeId) -> bool {
        (node.0 as usize) < self.nodes.len()
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn name(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node.0 as usize).map(|n| n.name.as_str())
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0 as usize).and_then(|n| n.parent)
    }

    pub fn tag(&self, node: NodeId) -> Option<&PickTag> {
        self.nodes.get(node.0 as usize).and_then(|n| n.tag.as_ref())
    }

    /// Walk from `node` up its ownership chain to the first tagged node
    pub fn pickable_ancestor(&self, node: NodeId) -> Option<(NodeId, &PickTag)> {
        let mut current = Some(node);
        while let Some(id) = current {
            let entry = self.nodes.get(id.0 as usize)?;
            if let Some(tag) = &entry.tag {
                return Some((id, tag));
            }
            current = entry.parent;
        }
        None
    }

    /// Classify the object the character bumped into
    pub fn collision_peer(&self, node: NodeId) -> CollisionPeer {
        match self.pickable_ancestor(node) {
            Some((_, tag)) if tag.is_floor() => CollisionPeer::Floor,
            Some((_, tag)) => match tag.interactive_object() {
                Some(object) => CollisionPeer::Interactive { id: object.id },
                None => CollisionPeer::Obstacle,
            },
            None => CollisionPeer::Obstacle,
        }
    }
}

/// One intersection along a pick ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub node: NodeId,
    pub point: Vec3,
    pub distance: f32,
}

/// Ray intersection service of the physics/scene collaborator
pub trait PickService {
    /// Every intersection along the ray, nearest first
    fn cast_ray(&self, origin: Vec3, direction: Vec3) -> Vec<PickHit>;
}

impl PickService for PhysicsWorld {
    fn cast_ray(&self, origin: Vec3, direction: Vec3) -> Vec<PickHit> {
        self.raycast_all(origin, direction, PICK_DISTANCE, QueryFilter::default())
            .into_iter()
            .filter_map(|hit| {
                Some(PickHit {
                    node: NodeId::from_tag(hit.tag)?,
                    point: hit.point,
                    distance: hit.distance,
                })
            })
            .collect()
    }
}

/// Screen size in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Normalized device coordinates of a pixel position (y up)
    pub fn to_ndc(&self, position: Vec2) -> Option<Vec2> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        Some(Vec2::new(
            position.x / self.width * 2.0 - 1.0,
            -(position.y / self.height) * 2.0 + 1.0,
        ))
    }
}

/// A ray in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickRay {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Camera matrices used to turn clicks into rays
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickCamera {
    pub view: Mat4,
    pub projection: Mat4,
}

impl PickCamera {
    pub fn new(view: Mat4, projection: Mat4) -> Self {
        Self { view, projection }
    }

    /// Orthographic camera at `eye` looking at `target`, `height` world units tall
    pub fn orthographic(eye: Vec3, target: Vec3, height: f32, aspect: f32) -> Self {
        let half_height = height / 2.0;
        let half_width = half_height * aspect;
        Self {
            view: Mat4::look_at_rh(eye, target, Vec3::Y),
            projection: Mat4::orthographic_rh(
                -half_width,
                half_width,
                -half_height,
                half_height,
                0.1,
                PICK_DISTANCE,
            ),
        }
    }

    /// Ray from the near plane through an NDC position
    pub fn ray(&self, ndc: Vec2) -> Option<PickRay> {
        let inverse = (self.projection * self.view).inverse();
        let near = inverse.project_point3(ndc.extend(0.0));
        let far = inverse.project_point3(ndc.extend(1.0));
        let direction = (far - near).try_normalize()?;
        if !near.is_finite() {
            return None;
        }
        Some(PickRay {
            origin: near,
            direction,
        })
    }
}

/// Everything the resolver needs to turn a click into scene hits
pub struct PickContext<'a> {
    pub camera: &'a PickCamera,
    pub viewport: Viewport,
    pub graph: &'a PickGraph,
    pub picker: &'a dyn PickService,
}

impl PickContext<'_> {
    /// Ray under a pixel position
    pub fn ray_at(&self, position: Vec2) -> Option<PickRay> {
        self.camera.ray(self.viewport.to_ndc(position)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_round_trip_reserves_zero() {
        assert_eq!(NodeId::from_tag(0), None);
        assert_eq!(NodeId::from_tag(NodeId(4).to_tag()), Some(NodeId(4)));
    }

    #[test]
    fn test_pickable_ancestor_walks_up() {
        let mut graph = PickGraph::new();
        let table = graph.add_node("table", None, Some(PickTag::interactive("table-1", "project")));
        let leg = graph.add_node("leg", Some(table), None);
        let screw = graph.add_node("screw", Some(leg), None);
        let loose = graph.add_node("loose", None, None);

        let (node, tag) = graph.pickable_ancestor(screw).unwrap();
        assert_eq!(node, table);
        assert_eq!(tag.id.as_deref(), Some("table-1"));
        assert!(graph.pickable_ancestor(loose).is_none());
        assert_eq!(graph.name(leg), Some("leg"));
    }

    #[test]
    fn test_unknown_parent_becomes_root() {
        let mut graph = PickGraph::new();
        let node = graph.add_node("orphan", Some(NodeId(9)), None);
        assert_eq!(graph.parent(node), None);
    }

    #[test]
    fn test_interactive_object_requires_id_and_kind() {
        let mut tag = PickTag::interactive("crate-1", "crate");
        assert!(tag.interactive_object().is_some());
        tag.kind = None;
        assert!(tag.interactive_object().is_none());
        assert!(PickTag::floor().interactive_object().is_none());
    }

    #[test]
    fn test_collision_peer() {
        let mut graph = PickGraph::new();
        let floor = graph.add_node("floor", None, Some(PickTag::floor()));
        let wall = graph.add_node("wall", None, Some(PickTag::prop()));
        let desk = graph.add_node("desk", None, Some(PickTag::interactive("desk", "project")));
        let untagged = graph.add_node("mesh", None, None);

        assert_eq!(graph.collision_peer(floor), CollisionPeer::Floor);
        assert_eq!(graph.collision_peer(wall), CollisionPeer::Obstacle);
        assert_eq!(
            graph.collision_peer(desk),
            CollisionPeer::Interactive {
                id: "desk".to_string()
            }
        );
        assert_eq!(graph.collision_peer(untagged), CollisionPeer::Obstacle);
    }

    #[test]
    fn test_viewport_ndc() {
        let viewport = Viewport::new(800.0, 600.0);
        assert_eq!(viewport.to_ndc(Vec2::new(400.0, 300.0)), Some(Vec2::ZERO));
        assert_eq!(viewport.to_ndc(Vec2::ZERO), Some(Vec2::new(-1.0, 1.0)));
        assert_eq!(Viewport::new(0.0, 600.0).to_ndc(Vec2::ZERO), None);
    }

    #[test]
    fn test_orthographic_center_ray() {
        let camera = PickCamera::orthographic(Vec3::new(0.0, 10.0, 10.0), Vec3::ZERO, 10.0, 1.0);
        let ray = camera.ray(Vec2::ZERO).unwrap();

        let expected = (Vec3::ZERO - Vec3::new(0.0, 10.0, 10.0)).normalize();
        assert!((ray.direction - expected).length() < 1e-4);
        // Origin lies on the camera axis
        let to_origin = ray.origin - Vec3::new(0.0, 10.0, 10.0);
        assert!(to_origin.normalize().dot(expected) > 0.999);
    }

    #[test]
    fn test_physics_pick_service() {
        let mut physics = PhysicsWorld::new();
        let mut graph = PickGraph::new();
        let floor = graph.add_node("floor", None, Some(PickTag::floor()));
        physics.create_ground(0.0, floor.to_tag());
        physics.create_static_box(Vec3::splat(0.5), Vec3::new(3.0, 0.5, 0.0), 0);
        physics.update_queries();

        let hits = physics.cast_ray(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].node, floor);
        assert!(hits[0].point.y.abs() < 1e-4);
    }
}
