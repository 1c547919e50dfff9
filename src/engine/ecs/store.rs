// In-memory entity store

use std::collections::BTreeSet;

use log::debug;

use super::{
    Component, ComponentKind, ComponentStorage, ComponentStore, EcsError, EntityId, Transform,
};
use crate::engine::physics::{BoxCollider, RigidBody};

/// Reference `ComponentStore` backed by one typed array per component
#[derive(Debug, Default)]
pub struct EntityStore {
    next_id: u64,
    alive: BTreeSet<EntityId>,
    transforms: ComponentStorage<Transform>,
    rigid_bodies: ComponentStorage<RigidBody>,
    box_colliders: ComponentStorage<BoxCollider>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new entity without components
    pub fn spawn(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.alive.insert(id);
        id
    }

    /// Create a new entity with the given components
    pub fn spawn_with<I>(&mut self, components: I) -> EntityId
    where
        I: IntoIterator<Item = Component>,
    {
        let id = self.spawn();
        for component in components {
            self.attach(id, component);
        }
        id
    }

    /// Remove an entity and all of its components
    pub fn despawn(&mut self, entity: EntityId) -> Result<(), EcsError> {
        if !self.alive.remove(&entity) {
            return Err(EcsError::UnknownEntity(entity));
        }
        self.transforms.remove(entity);
        self.rigid_bodies.remove(entity);
        self.box_colliders.remove(entity);
        debug!("Despawned entity {}", entity);
        Ok(())
    }

    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.alive.contains(&entity)
    }

    pub fn len(&self) -> usize {
        self.alive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alive.is_empty()
    }

    /// Attach a component, replacing any previous one of the same kind
    pub fn insert(&mut self, entity: EntityId, component: Component) -> Result<(), EcsError> {
        self.check_alive(entity)?;
        self.attach(entity, component);
        Ok(())
    }

    fn attach(&mut self, entity: EntityId, component: Component) {
        match component {
            Component::Transform(t) => {
                self.transforms.insert(entity, t);
            }
            Component::RigidBody(b) => {
                self.rigid_bodies.insert(entity, b);
            }
            Component::BoxCollider(c) => {
                self.box_colliders.insert(entity, c);
            }
        }
    }

    /// Detach a component and hand it back
    pub fn remove(&mut self, entity: EntityId, kind: ComponentKind) -> Result<Component, EcsError> {
        if !self.is_alive(entity) {
            return Err(EcsError::UnknownEntity(entity));
        }
        let removed = match kind {
            ComponentKind::Transform => self.transforms.remove(entity).map(Component::Transform),
            ComponentKind::RigidBody => self.rigid_bodies.remove(entity).map(Component::RigidBody),
            ComponentKind::BoxCollider => {
                self.box_colliders.remove(entity).map(Component::BoxCollider)
            }
        };
        removed.ok_or(EcsError::MissingComponent { entity, kind })
    }

    pub fn try_transform(&self, entity: EntityId) -> Result<&Transform, EcsError> {
        self.check_alive(entity)?;
        self.transforms.get(entity).ok_or(EcsError::MissingComponent {
            entity,
            kind: ComponentKind::Transform,
        })
    }

    pub fn try_rigid_body(&self, entity: EntityId) -> Result<&RigidBody, EcsError> {
        self.check_alive(entity)?;
        self.rigid_bodies.get(entity).ok_or(EcsError::MissingComponent {
            entity,
            kind: ComponentKind::RigidBody,
        })
    }

    pub fn try_box_collider(&self, entity: EntityId) -> Result<&BoxCollider, EcsError> {
        self.check_alive(entity)?;
        self.box_colliders.get(entity).ok_or(EcsError::MissingComponent {
            entity,
            kind: ComponentKind::BoxCollider,
        })
    }

    fn check_alive(&self, entity: EntityId) -> Result<(), EcsError> {
        if self.is_alive(entity) {
            Ok(())
        } else {
            Err(EcsError::UnknownEntity(entity))
        }
    }
}

impl ComponentStore for EntityStore {
    fn entities_with(&self, kinds: &[ComponentKind]) -> Vec<EntityId> {
        self.alive
            .iter()
            .copied()
            .filter(|id| kinds.iter().all(|kind| self.has(*id, *kind)))
            .collect()
    }

    fn has(&self, entity: EntityId, kind: ComponentKind) -> bool {
        match kind {
            ComponentKind::Transform => self.transforms.contains(entity),
            ComponentKind::RigidBody => self.rigid_bodies.contains(entity),
            ComponentKind::BoxCollider => self.box_colliders.contains(entity),
        }
    }

    fn transform(&self, entity: EntityId) -> Option<&Transform> {
        self.transforms.get(entity)
    }

    fn transform_mut(&mut self, entity: EntityId) -> Option<&mut Transform> {
        self.transforms.get_mut(entity)
    }

    fn rigid_body(&self, entity: EntityId) -> Option<&RigidBody> {
        self.rigid_bodies.get(entity)
    }

    fn rigid_body_mut(&mut self, entity: EntityId) -> Option<&mut RigidBody> {
        self.rigid_bodies.get_mut(entity)
    }

    fn box_collider(&self, entity: EntityId) -> Option<&BoxCollider> {
        self.box_colliders.get(entity)
    }
}
