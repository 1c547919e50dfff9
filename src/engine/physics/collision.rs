use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, trace, warn};

use super::quadtree::{QuadTree, QuadTreeSnapshot};
use super::resolver::{resolve_box_pair, Contact, ResolverSettings};
use crate::core::math::Rect;
use crate::engine::ecs::{ComponentKind, ComponentStore, EntityId};

/// Counters for the last completed tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Bodies advanced by the integrator
    pub bodies_integrated: usize,

    /// Colliders indexed into the quadtree
    pub colliders_inserted: usize,

    /// Colliders the quadtree refused (outside the bounds or zero-sized root)
    pub insert_rejections: usize,

    /// Ordered pairs handed to the narrow phase
    pub candidate_pairs: usize,

    /// Pairs that were actually resolved
    pub contacts: usize,
}

/// Shared read access to the latest published quadtree snapshot
///
/// The collision system is the only writer; renderers clone the handle and
/// read whenever they draw.
#[derive(Debug, Clone, Default)]
pub struct QuadTreeDebugHandle {
    snapshot: Arc<RwLock<QuadTreeSnapshot>>,
}

impl QuadTreeDebugHandle {
    /// Copy of the latest snapshot (empty if nothing was published)
    pub fn read(&self) -> QuadTreeSnapshot {
        self.with(QuadTreeSnapshot::clone)
    }

    /// Run `f` against the latest snapshot without copying it
    pub fn with<R>(&self, f: impl FnOnce(&QuadTreeSnapshot) -> R) -> R {
        // Snapshots are only ever swapped whole; a poisoned lock holds a valid one
        let guard = self.snapshot.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    fn publish(&self, snapshot: QuadTreeSnapshot) {
        let mut slot = self.snapshot.write().unwrap_or_else(|poisoned| {
            warn!("Quadtree debug snapshot lock was poisoned, recovering");
            poisoned.into_inner()
        });
        *slot = snapshot;
    }
}

/// Broad phase plus narrow-phase dispatch
///
/// The quadtree is rebuilt from scratch on every update and carries no
/// state between ticks.
pub struct CollisionSystem {
    tree: QuadTree,
    settings: ResolverSettings,
    dedup_pairs: bool,
    publish_debug: bool,
    debug_handle: QuadTreeDebugHandle,

    /// Contacts resolved during the last update
    events: Vec<Contact>,
    stats: TickStats,

    // Scratch buffers reused between ticks
    candidates: Vec<EntityId>,
    resolved_pairs: HashSet<(EntityId, EntityId)>,
}

impl CollisionSystem {
    pub fn new(capacity: usize, max_depth: u32) -> Self {
        Self {
            tree: QuadTree::new(Rect::default(), capacity, max_depth),
            settings: ResolverSettings::default(),
            dedup_pairs: false,
            publish_debug: false,
            debug_handle: QuadTreeDebugHandle::default(),
            events: Vec::with_capacity(32),
            stats: TickStats::default(),
            candidates: Vec::new(),
            resolved_pairs: HashSet::new(),
        }
    }

    pub fn with_settings(mut self, settings: ResolverSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Resolve every unordered pair at most once per update
    pub fn with_pair_dedup(mut self, dedup_pairs: bool) -> Self {
        self.dedup_pairs = dedup_pairs;
        self
    }

    pub fn with_debug_publishing(mut self, publish: bool) -> Self {
        self.publish_debug = publish;
        self
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: ResolverSettings) {
        self.settings = settings;
    }

    pub fn dedup_pairs(&self) -> bool {
        self.dedup_pairs
    }

    /// The quadtree built during the last update
    pub fn tree(&self) -> &QuadTree {
        &self.tree
    }

    pub fn events(&self) -> &[Contact] {
        &self.events
    }

    pub fn stats(&self) -> &TickStats {
        &self.stats
    }

    pub fn debug_handle(&self) -> QuadTreeDebugHandle {
        self.debug_handle.clone()
    }

    /// Rebuild the broad phase and resolve every overlapping pair
    pub fn update<S: ComponentStore + ?Sized>(&mut self, world_bounds: &Rect, store: &mut S) {
        self.events.clear();
        self.resolved_pairs.clear();
        self.stats = TickStats::default();
        self.tree.reset(*world_bounds);

        let colliders = store.entities_with(&[ComponentKind::Transform, ComponentKind::BoxCollider]);

        for &entity in &colliders {
            let Some(transform) = store.transform(entity) else {
                continue;
            };
            if self.tree.insert(entity, transform.position) {
                self.stats.colliders_inserted += 1;
            } else {
                trace!("Entity {} left out of this tick's broad phase", entity);
                self.stats.insert_rejections += 1;
            }
        }

        let mut candidates = std::mem::take(&mut self.candidates);
        for &entity in &colliders {
            let (Some(transform), Some(collider)) =
                (store.transform(entity), store.box_collider(entity))
            else {
                continue;
            };
            // Twice the collider size around the centre
            let range = Rect::from_center_half_extents(transform.position, collider.size);

            candidates.clear();
            self.tree.query(&range, &mut candidates);

            for &other in &candidates {
                if other == entity {
                    continue;
                }
                if self.dedup_pairs && !self.resolved_pairs.insert(unordered(entity, other)) {
                    continue;
                }

                self.stats.candidate_pairs += 1;
                if let Some(contact) = resolve_box_pair(store, entity, other, &self.settings) {
                    self.events.push(contact);
                }
            }
        }
        self.candidates = candidates;
        self.stats.contacts = self.events.len();

        if self.publish_debug {
            self.debug_handle.publish(self.tree.snapshot());
        }

        debug!(
            "Collision pass: {} indexed, {} rejected, {} candidates, {} contacts, {} nodes",
            self.stats.colliders_inserted,
            self.stats.insert_rejections,
            self.stats.candidate_pairs,
            self.stats.contacts,
            self.tree.node_count()
        );
    }
}

fn unordered(a: EntityId, b: EntityId) -> (EntityId, EntityId) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}
