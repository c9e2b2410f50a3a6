//! XZ-plane quadtree used for broadphase pruning.
//!
//! Height is ignored: every region is an infinite column along Y. An entry is
//! stored at the deepest node whose region fully contains its footprint, so a
//! footprint straddling child boundaries stays with the parent. Leaf visitors
//! therefore receive the leaf's own entries plus everything held by its
//! ancestors.

use glam::{Vec2, Vec3};

use crate::config::QuadTreeParams;

/// A value stored in the tree together with the box it was inserted with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadTreeEntry<T> {
    pub value: T,
    pub position: Vec3,
    pub half_sizes: Vec3,
}

impl<T> QuadTreeEntry<T> {
    fn footprint(&self) -> Footprint {
        Footprint::new(self.position, self.half_sizes)
    }
}

#[derive(Debug, Clone, Copy)]
struct Footprint {
    min: Vec2,
    max: Vec2,
}

impl Footprint {
    fn new(position: Vec3, half_sizes: Vec3) -> Self {
        let centre = Vec2::new(position.x, position.z);
        let half = Vec2::new(half_sizes.x.abs(), half_sizes.z.abs());
        Self {
            min: centre - half,
            max: centre + half,
        }
    }
}

#[derive(Debug, Clone)]
struct QuadTreeNode<T> {
    centre: Vec2,
    half_size: Vec2,
    entries: Vec<QuadTreeEntry<T>>,
    children: Option<Box<[QuadTreeNode<T>; 4]>>,
}

impl<T: Copy> QuadTreeNode<T> {
    fn new(centre: Vec2, half_size: Vec2) -> Self {
        Self {
            centre,
            half_size,
            entries: Vec::new(),
            children: None,
        }
    }

    fn contains(&self, footprint: &Footprint) -> bool {
        let min = self.centre - self.half_size;
        let max = self.centre + self.half_size;
        footprint.min.cmpge(min).all() && footprint.max.cmple(max).all()
    }

    fn overlaps(&self, footprint: &Footprint) -> bool {
        let min = self.centre - self.half_size;
        let max = self.centre + self.half_size;
        footprint.min.cmple(max).all() && footprint.max.cmpge(min).all()
    }

    fn child_containing(&mut self, footprint: &Footprint) -> Option<&mut QuadTreeNode<T>> {
        self.children
            .as_deref_mut()?
            .iter_mut()
            .find(|child| child.contains(footprint))
    }

    fn insert(&mut self, entry: QuadTreeEntry<T>, depth_left: u32, max_entries: usize) {
        let footprint = entry.footprint();
        if let Some(child) = self.child_containing(&footprint) {
            child.insert(entry, depth_left.saturating_sub(1), max_entries);
            return;
        }

        self.entries.push(entry);
        if self.children.is_none() && self.entries.len() > max_entries && depth_left > 0 {
            self.split(depth_left, max_entries);
        }
    }

    fn split(&mut self, depth_left: u32, max_entries: usize) {
        let quarter = self.half_size * 0.5;
        let c = self.centre;
        self.children = Some(Box::new([
            QuadTreeNode::new(c + Vec2::new(-quarter.x, quarter.y), quarter),
            QuadTreeNode::new(c + Vec2::new(quarter.x, quarter.y), quarter),
            QuadTreeNode::new(c + Vec2::new(-quarter.x, -quarter.y), quarter),
            QuadTreeNode::new(c + Vec2::new(quarter.x, -quarter.y), quarter),
        ]));

        let entries = std::mem::take(&mut self.entries);
        for entry in entries {
            let footprint = entry.footprint();
            match self.child_containing(&footprint) {
                Some(child) => child.insert(entry, depth_left - 1, max_entries),
                None => self.entries.push(entry),
            }
        }
    }

    fn visit_leaves<'a, F>(&'a self, inherited: &mut Vec<&'a QuadTreeEntry<T>>, visitor: &mut F)
    where
        F: FnMut(&[&'a QuadTreeEntry<T>]),
    {
        let mark = inherited.len();
        inherited.extend(self.entries.iter());
        match self.children.as_deref() {
            Some(children) => {
                for child in children {
                    child.visit_leaves(inherited, visitor);
                }
            }
            None => {
                if !inherited.is_empty() {
                    visitor(inherited);
                }
            }
        }
        inherited.truncate(mark);
    }

    fn visit_overlapping<'a, F>(
        &'a self,
        footprint: &Footprint,
        inherited: &mut Vec<&'a QuadTreeEntry<T>>,
        visitor: &mut F,
    ) where
        F: FnMut(&[&'a QuadTreeEntry<T>]),
    {
        let mark = inherited.len();
        inherited.extend(self.entries.iter());
        let mut descended = false;
        if let Some(children) = self.children.as_deref() {
            for child in children.iter().filter(|child| child.overlaps(footprint)) {
                descended = true;
                child.visit_overlapping(footprint, inherited, visitor);
            }
        }
        // Boxes outside every child still meet entries held at this node.
        if !descended && !inherited.is_empty() {
            visitor(inherited);
        }
        inherited.truncate(mark);
    }

    fn count_leaves(&self) -> usize {
        match self.children.as_deref() {
            Some(children) => children.iter().map(QuadTreeNode::count_leaves).sum(),
            None => 1,
        }
    }

    fn depth(&self) -> u32 {
        match self.children.as_deref() {
            Some(children) => 1 + children.iter().map(QuadTreeNode::depth).max().unwrap_or(0),
            None => 0,
        }
    }
}

/// Quadtree over the XZ plane centred on the world origin.
#[derive(Debug, Clone)]
pub struct QuadTree<T> {
    root: QuadTreeNode<T>,
    params: QuadTreeParams,
    len: usize,
}

impl<T: Copy> QuadTree<T> {
    pub fn new(params: QuadTreeParams) -> Self {
        Self {
            root: QuadTreeNode::new(Vec2::ZERO, params.world_half_extent),
            params,
            len: 0,
        }
    }

    pub fn params(&self) -> &QuadTreeParams {
        &self.params
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.root = QuadTreeNode::new(Vec2::ZERO, self.params.world_half_extent);
        self.len = 0;
    }

    /// Inserts a value with its broadphase box. Footprints outside the world
    /// region are kept at the root.
    pub fn insert(&mut self, value: T, position: Vec3, half_sizes: Vec3) {
        let entry = QuadTreeEntry {
            value,
            position,
            half_sizes,
        };
        self.root
            .insert(entry, self.params.max_depth, self.params.max_entries);
        self.len += 1;
    }

    /// Calls `visitor` once per non-empty leaf with every entry that may
    /// overlap that leaf.
    pub fn operate_on_contents<F>(&self, mut visitor: F)
    where
        F: FnMut(&[&QuadTreeEntry<T>]),
    {
        let mut scratch = Vec::new();
        self.root.visit_leaves(&mut scratch, &mut visitor);
    }

    /// Walks the tree as if inserting the given box, calling `visitor` with
    /// the contents of every leaf the box overlaps. The tree is not modified.
    pub fn dynamic_object_comparison<F>(&self, mut visitor: F, position: Vec3, half_sizes: Vec3)
    where
        F: FnMut(&[&QuadTreeEntry<T>]),
    {
        let footprint = Footprint::new(position, half_sizes);
        let mut scratch = Vec::new();
        self.root
            .visit_overlapping(&footprint, &mut scratch, &mut visitor);
    }

    pub fn leaf_count(&self) -> usize {
        self.root.count_leaves()
    }

    pub fn depth(&self) -> u32 {
        self.root.depth()
    }
}
