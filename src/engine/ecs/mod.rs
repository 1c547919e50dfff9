// Component store seen by the physics core
//
// The physics systems never own entity data. They read and write components
// in place through the `ComponentStore` trait, so any entity/component backend
// can drive them. `EntityStore` is the in-memory implementation used by the
// demo binary and the tests.

mod storage;
mod store;
mod transform;

use std::fmt;

use crate::engine::physics::{BoxCollider, RigidBody};

pub use storage::ComponentStorage;
pub use store::EntityStore;
pub use transform::Transform;

/// Opaque, stable entity identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u64);

impl EntityId {
    /// Get the raw u64 value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Component types the physics core knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Transform,
    RigidBody,
    BoxCollider,
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComponentKind::Transform => "Transform",
            ComponentKind::RigidBody => "RigidBody",
            ComponentKind::BoxCollider => "BoxCollider",
        };
        f.write_str(name)
    }
}

/// Closed set of component payloads
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Component {
    Transform(Transform),
    RigidBody(RigidBody),
    BoxCollider(BoxCollider),
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Transform(_) => ComponentKind::Transform,
            Component::RigidBody(_) => ComponentKind::RigidBody,
            Component::BoxCollider(_) => ComponentKind::BoxCollider,
        }
    }
}

impl From<Transform> for Component {
    fn from(value: Transform) -> Self {
        Component::Transform(value)
    }
}

impl From<RigidBody> for Component {
    fn from(value: RigidBody) -> Self {
        Component::RigidBody(value)
    }
}

impl From<BoxCollider> for Component {
    fn from(value: BoxCollider) -> Self {
        Component::BoxCollider(value)
    }
}

/// Entity store errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EcsError {
    #[error("Unknown entity: {0}")]
    UnknownEntity(EntityId),

    #[error("Entity {entity} has no {kind} component")]
    MissingComponent {
        entity: EntityId,
        kind: ComponentKind,
    },
}

/// Access to the authoritative component data
///
/// Accessors return `None` when the entity lacks the component; the physics
/// systems treat that as "skip", never as an error.
pub trait ComponentStore {
    /// All entities that carry every one of `kinds`
    ///
    /// Order is not significant to correctness.
    fn entities_with(&self, kinds: &[ComponentKind]) -> Vec<EntityId>;

    fn transform(&self, entity: EntityId) -> Option<&Transform>;
    fn transform_mut(&mut self, entity: EntityId) -> Option<&mut Transform>;

    fn rigid_body(&self, entity: EntityId) -> Option<&RigidBody>;
    fn rigid_body_mut(&mut self, entity: EntityId) -> Option<&mut RigidBody>;

    fn box_collider(&self, entity: EntityId) -> Option<&BoxCollider>;

    /// Check whether an entity carries a component of the given kind
    fn has(&self, entity: EntityId, kind: ComponentKind) -> bool {
        match kind {
            ComponentKind::Transform => self.transform(entity).is_some(),
            ComponentKind::RigidBody => self.rigid_body(entity).is_some(),
            ComponentKind::BoxCollider => self.box_collider(entity).is_some(),
        }
    }
}
