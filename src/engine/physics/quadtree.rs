// Quadtree broad phase
//
// Nodes live in one contiguous buffer and refer to their children by index.
// `clear` only rewinds the live-node counter, so a tree rebuilt every tick
// reuses both the node slots and their entity lists.

use glam::Vec2;
use log::{error, warn};

use crate::core::math::Rect;
use crate::engine::ecs::EntityId;

/// Index of a node inside a `QuadTree`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);
}

#[derive(Debug, Clone)]
struct Node {
    boundary: Rect,
    depth: u32,
    entities: Vec<EntityId>,
    /// NE, NW, SE, SW
    children: Option<[usize; 4]>,
}

impl Node {
    fn new(boundary: Rect, depth: u32, capacity: usize) -> Self {
        Self {
            boundary,
            depth,
            entities: Vec::with_capacity(capacity),
            children: None,
        }
    }
}

/// Recursive spatial index over entity positions
#[derive(Debug, Clone)]
pub struct QuadTree {
    nodes: Vec<Node>,
    live: usize,
    capacity: usize,
    max_depth: u32,
}

impl QuadTree {
    /// Create an empty tree whose root sits at depth 0
    pub fn new(boundary: Rect, capacity: usize, max_depth: u32) -> Self {
        Self::with_depth(boundary, capacity, max_depth, 0)
    }

    /// Create an empty tree whose root starts at `current_depth`
    pub fn with_depth(boundary: Rect, capacity: usize, max_depth: u32, current_depth: u32) -> Self {
        Self {
            nodes: vec![Node::new(boundary, current_depth, capacity)],
            live: 1,
            capacity,
            max_depth,
        }
    }

    pub fn boundary(&self) -> Rect {
        self.nodes[0].boundary
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Number of nodes currently in use
    pub fn node_count(&self) -> usize {
        self.live
    }

    /// Number of entity IDs stored across all nodes
    pub fn len(&self) -> usize {
        self.nodes[..self.live].iter().map(|n| n.entities.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert an entity at `point`
    ///
    /// Returns `false` when the point lies outside the tree or the boundary
    /// has no area. Nodes at `max_depth` keep accepting entities past their
    /// capacity instead of subdividing.
    pub fn insert(&mut self, id: EntityId, point: Vec2) -> bool {
        let root = &self.nodes[0];
        if root.boundary.is_degenerate() {
            warn!(
                "Rejected entity {} from quadtree node with zero width or height",
                id
            );
            return false;
        }
        if !root.boundary.contains(point) {
            return false;
        }
        self.insert_at(0, id, point)
    }

    // `point` is already known to lie inside the node
    fn insert_at(&mut self, index: usize, id: EntityId, point: Vec2) -> bool {
        let node = &self.nodes[index];

        if node.entities.len() < self.capacity {
            self.nodes[index].entities.push(id);
            return true;
        }

        if node.children.is_none() {
            if node.depth >= self.max_depth {
                self.nodes[index].entities.push(id);
                return true;
            }
            self.subdivide_node(index);
        }

        let Some(children) = self.nodes[index].children else {
            return false;
        };
        let child = children[self.quadrant_of(&children, point)];
        if !self.nodes[child].boundary.is_degenerate() {
            return self.insert_at(child, id, point);
        }

        error!(
            "Entity {} at {:?} fell into a zero-sized child of a node containing it",
            id, point
        );
        debug_assert!(false, "quadtree child too small to hold a contained point");
        false
    }

    /// Index into `children` of the first quadrant (NE, NW, SE, SW) that
    /// holds `point`
    ///
    /// Decided against the shared seams rather than each child's own far
    /// edges, so a point on the parent's boundary always finds a child.
    fn quadrant_of(&self, children: &[usize; 4], point: Vec2) -> usize {
        let seam = self.nodes[children[2]].boundary.position;
        let east = point.x >= seam.x;
        let north = point.y <= seam.y;

        match (north, east) {
            (true, true) => 0,
            (true, false) => 1,
            (false, true) => 2,
            (false, false) => 3,
        }
    }

    /// Split a node into four equal quadrants
    ///
    /// Entities already stored at the node stay there. Returns `false` if the
    /// node does not exist or is already subdivided.
    pub fn subdivide(&mut self, node: NodeId) -> bool {
        if node.0 >= self.live || self.nodes[node.0].children.is_some() {
            return false;
        }
        self.subdivide_node(node.0);
        true
    }

    fn subdivide_node(&mut self, index: usize) {
        let boundary = self.nodes[index].boundary;
        let depth = self.nodes[index].depth + 1;

        let mut children = [0; 4];
        for (slot, quadrant) in children.iter_mut().zip(boundary.quadrants()) {
            *slot = self.alloc_node(quadrant, depth);
        }
        self.nodes[index].children = Some(children);
    }

    fn alloc_node(&mut self, boundary: Rect, depth: u32) -> usize {
        let index = self.live;
        if let Some(node) = self.nodes.get_mut(index) {
            node.boundary = boundary;
            node.depth = depth;
            node.entities.clear();
            node.children = None;
        } else {
            self.nodes.push(Node::new(boundary, depth, self.capacity));
        }
        self.live += 1;
        index
    }

    /// Collect candidate entities for `range`
    ///
    /// Every entity stored in a node whose boundary intersects `range` is
    /// appended, without testing the entity itself against the range.
    pub fn query(&self, range: &Rect, found: &mut Vec<EntityId>) {
        self.query_at(0, range, found);
    }

    fn query_at(&self, index: usize, range: &Rect, found: &mut Vec<EntityId>) {
        let node = &self.nodes[index];
        if !node.boundary.intersects(range) {
            return;
        }

        found.extend_from_slice(&node.entities);

        if let Some(children) = node.children {
            for child in children {
                self.query_at(child, range, found);
            }
        }
    }

    /// Remove every entity and collapse the tree back to its root
    pub fn clear(&mut self) {
        self.live = 1;
        let root = &mut self.nodes[0];
        root.entities.clear();
        root.children = None;
    }

    /// Clear and move the root to a new boundary
    pub fn reset(&mut self, boundary: Rect) {
        self.clear();
        self.nodes[0].boundary = boundary;
    }

    /// Read-only view of the root node
    pub fn root(&self) -> NodeView<'_> {
        NodeView {
            tree: self,
            index: 0,
        }
    }

    pub fn node(&self, id: NodeId) -> Option<NodeView<'_>> {
        (id.0 < self.live).then_some(NodeView {
            tree: self,
            index: id.0,
        })
    }

    /// Owned copy of every live node outline, root first
    pub fn snapshot(&self) -> QuadTreeSnapshot {
        let nodes = self.nodes[..self.live]
            .iter()
            .map(|node| NodeOutline {
                boundary: node.boundary,
                depth: node.depth,
                subdivided: node.children.is_some(),
                entity_count: node.entities.len(),
            })
            .collect();
        QuadTreeSnapshot { nodes }
    }
}

/// Borrowed view of one quadtree node, for traversal
#[derive(Clone, Copy)]
pub struct NodeView<'a> {
    tree: &'a QuadTree,
    index: usize,
}

impl<'a> NodeView<'a> {
    pub fn id(&self) -> NodeId {
        NodeId(self.index)
    }

    pub fn boundary(&self) -> Rect {
        self.node().boundary
    }

    pub fn depth(&self) -> u32 {
        self.node().depth
    }

    pub fn is_subdivided(&self) -> bool {
        self.node().children.is_some()
    }

    /// Entities stored directly at this node
    pub fn entities(&self) -> &'a [EntityId] {
        &self.tree.nodes[self.index].entities
    }

    /// Children in NE, NW, SE, SW order
    pub fn children(&self) -> Option<[NodeView<'a>; 4]> {
        let tree = self.tree;
        self.node()
            .children
            .map(|indices| indices.map(|index| NodeView { tree, index }))
    }

    fn node(&self) -> &'a Node {
        &self.tree.nodes[self.index]
    }
}

/// Outline of a node, detached from the tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeOutline {
    pub boundary: Rect,
    pub depth: u32,
    pub subdivided: bool,
    pub entity_count: usize,
}

/// Copy of a tree's structure that a renderer can hold across ticks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuadTreeSnapshot {
    pub nodes: Vec<NodeOutline>,
}

impl QuadTreeSnapshot {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn max_depth(&self) -> u32 {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> Rect {
        Rect::new(0.0, 0.0, 100.0, 100.0)
    }

    fn query_all(tree: &QuadTree) -> Vec<EntityId> {
        let mut found = Vec::new();
        tree.query(&tree.boundary(), &mut found);
        found
    }

    #[test]
    fn test_insert_within_capacity_stays_at_root() {
        let mut tree = QuadTree::new(world(), 4, 5);
        for i in 0..4 {
            assert!(tree.insert(EntityId(i), Vec2::new(10.0 * i as f32, 10.0)));
        }
        assert!(!tree.root().is_subdivided());
        assert_eq!(tree.root().entities().len(), 4);
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn test_subdivision_trigger() {
        let mut tree = QuadTree::new(world(), 4, 1);
        for i in 0..5 {
            let p = Vec2::new(60.0 + i as f32, 10.0 + i as f32);
            assert!(tree.insert(EntityId(i), p));
        }

        let root = tree.root();
        assert!(root.is_subdivided());
        assert_eq!(root.entities().len(), 4);

        let [ne, nw, se, sw] = root.children().unwrap();
        assert_eq!(ne.entities(), &[EntityId(4)]);
        assert!(nw.entities().is_empty());
        assert!(se.entities().is_empty());
        assert!(sw.entities().is_empty());
        assert_eq!(ne.depth(), 1);

        let mut found = query_all(&tree);
        found.sort();
        assert_eq!(found, (0..5).map(EntityId).collect::<Vec<_>>());
    }

    #[test]
    fn test_depth_ceiling_keeps_overflow() {
        let mut tree = QuadTree::with_depth(world(), 4, 2, 2);
        for i in 0..10 {
            assert!(tree.insert(EntityId(i), Vec2::new(25.0, 25.0)));
        }

        assert!(!tree.root().is_subdivided());
        assert_eq!(tree.root().entities().len(), 10);
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn test_coincident_points_stop_at_max_depth() {
        let mut tree = QuadTree::new(world(), 2, 3);
        for i in 0..20 {
            assert!(tree.insert(EntityId(i), Vec2::new(10.0, 10.0)));
        }

        assert_eq!(tree.len(), 20);
        assert_eq!(tree.snapshot().max_depth(), 3);
        assert_eq!(query_all(&tree).len(), 20);
    }

    #[test]
    fn test_outside_point_is_rejected() {
        let mut tree = QuadTree::new(world(), 4, 5);
        assert!(!tree.insert(EntityId(1), Vec2::new(100.5, 50.0)));
        assert!(!tree.insert(EntityId(2), Vec2::new(-1.0, 50.0)));
        assert!(tree.insert(EntityId(3), Vec2::new(100.0, 100.0)));

        let found = query_all(&tree);
        assert_eq!(found, vec![EntityId(3)]);
    }

    #[test]
    fn test_zero_sized_boundary_rejects() {
        let mut tree = QuadTree::new(Rect::new(0.0, 0.0, 0.0, 100.0), 4, 5);
        assert!(!tree.insert(EntityId(1), Vec2::new(0.0, 10.0)));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_center_point_goes_to_ne_first() {
        let mut tree = QuadTree::new(world(), 1, 3);
        assert!(tree.insert(EntityId(0), Vec2::new(1.0, 1.0)));
        assert!(tree.insert(EntityId(1), Vec2::new(50.0, 50.0)));

        let [ne, ..] = tree.root().children().unwrap();
        assert_eq!(ne.entities(), &[EntityId(1)]);
    }

    #[test]
    fn test_query_skips_disjoint_nodes() {
        let mut tree = QuadTree::new(world(), 1, 3);
        tree.insert(EntityId(0), Vec2::new(90.0, 90.0));
        tree.insert(EntityId(1), Vec2::new(90.0, 90.0));
        tree.insert(EntityId(2), Vec2::new(10.0, 90.0));

        // Entity 0 sits at the root, which always intersects
        let mut found = Vec::new();
        tree.query(&Rect::new(80.0, 80.0, 5.0, 5.0), &mut found);
        found.sort();
        assert_eq!(found, vec![EntityId(0), EntityId(1)]);

        let mut found = Vec::new();
        tree.query(&Rect::new(200.0, 200.0, 5.0, 5.0), &mut found);
        assert!(found.is_empty());
    }

    #[test]
    fn test_completeness_many_points() {
        let mut tree = QuadTree::new(world(), 4, 6);
        // Deterministic scatter over the boundary, edges included
        let mut seed: u32 = 12345;
        let mut next = || {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            (seed >> 16) as f32 / 65_535.0 * 100.0
        };

        for i in 0..500 {
            let p = Vec2::new(next(), next());
            assert!(tree.insert(EntityId(i), p), "point {p:?} rejected");
        }

        let mut found = query_all(&tree);
        found.sort();
        found.dedup();
        assert_eq!(found.len(), 500);
    }

    #[test]
    fn test_clear_reuses_nodes() {
        let mut tree = QuadTree::new(world(), 1, 4);
        for i in 0..16 {
            tree.insert(EntityId(i), Vec2::new(i as f32 * 6.0, i as f32 * 6.0));
        }
        let nodes_before = tree.node_count();
        assert!(nodes_before > 1);

        tree.clear();
        assert_eq!(tree.node_count(), 1);
        assert!(tree.is_empty());
        assert!(!tree.root().is_subdivided());
        assert!(query_all(&tree).is_empty());

        for i in 0..16 {
            tree.insert(EntityId(i), Vec2::new(i as f32 * 6.0, i as f32 * 6.0));
        }
        assert_eq!(tree.node_count(), nodes_before);
        assert_eq!(query_all(&tree).len(), 16);
    }

    #[test]
    fn test_manual_subdivide() {
        let mut tree = QuadTree::new(world(), 4, 5);
        assert!(tree.subdivide(NodeId::ROOT));
        assert!(!tree.subdivide(NodeId::ROOT));
        assert!(!tree.subdivide(NodeId(99)));

        let children = tree.root().children().unwrap();
        let boundaries: Vec<Rect> = children.iter().map(|c| c.boundary()).collect();
        assert_eq!(boundaries, world().quadrants().to_vec());
        assert_eq!(tree.node(children[2].id()).unwrap().depth(), 1);
    }

    #[test]
    fn test_reset_moves_boundary() {
        let mut tree = QuadTree::new(world(), 4, 5);
        tree.insert(EntityId(0), Vec2::new(5.0, 5.0));
        tree.reset(Rect::new(100.0, 100.0, 50.0, 50.0));

        assert!(tree.is_empty());
        assert!(!tree.insert(EntityId(1), Vec2::new(5.0, 5.0)));
        assert!(tree.insert(EntityId(2), Vec2::new(120.0, 120.0)));
    }

    #[test]
    fn test_non_dyadic_boundary_keeps_edge_points() {
        let boundary = Rect::new(0.1, 0.0, 0.7, 1.0);
        let min = boundary.min();
        let max = boundary.max();
        let mid = boundary.center();

        let points = [
            Vec2::new(min.x, mid.y),
            Vec2::new(max.x, mid.y),
            Vec2::new(max.x, min.y),
            max,
            Vec2::new(min.x, max.y),
            mid,
            Vec2::new(mid.x, max.y),
            Vec2::new(max.x, 0.3),
            Vec2::new(mid.x, min.y),
            Vec2::new(0.3, max.y),
        ];

        let mut tree = QuadTree::new(boundary, 1, 3);
        for (i, p) in points.iter().enumerate() {
            assert!(boundary.contains(*p));
            assert!(tree.insert(EntityId(i as u64), *p), "edge point {p:?} rejected");
        }

        let mut found = query_all(&tree);
        found.sort();
        assert_eq!(found, (0..points.len() as u64).map(EntityId).collect::<Vec<_>>());
    }

    #[test]
    fn test_snapshot_mirrors_structure() {
        let mut tree = QuadTree::new(world(), 1, 2);
        tree.insert(EntityId(0), Vec2::new(10.0, 10.0));
        tree.insert(EntityId(1), Vec2::new(90.0, 10.0));

        let snapshot = tree.snapshot();
        assert_eq!(snapshot.nodes.len(), 5);
        assert!(snapshot.nodes[0].subdivided);
        assert_eq!(snapshot.nodes[0].boundary, world());
        assert_eq!(snapshot.nodes[1].entity_count, 1);
        assert!(snapshot.nodes[1..].iter().all(|n| n.depth == 1 && !n.subdivided));
    }
}
