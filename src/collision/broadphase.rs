use std::collections::BTreeSet;

use glam::Vec3;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{
    collision::{contact::CollisionPair, quadtree::QuadTree},
    config::QuadTreeParams,
    core::rigidbody::RigidBody,
    utils::allocator::{Arena, BodyHandle},
};

/// A dynamic body's broadphase box, captured once per pass.
#[derive(Debug, Clone, Copy)]
struct DynamicEntry {
    handle: BodyHandle,
    position: Vec3,
    half_sizes: Vec3,
}

/// Quadtree broadphase.
///
/// Static bodies live in a tree that is built once per reset. Dynamic bodies
/// are gathered into a fresh tree every pass.
pub struct BroadPhase {
    params: QuadTreeParams,
    static_tree: QuadTree<BodyHandle>,
    dynamic_bodies: Vec<DynamicEntry>,
    candidates: BTreeSet<CollisionPair>,
}

impl BroadPhase {
    pub fn new(params: QuadTreeParams) -> Self {
        Self {
            params,
            static_tree: QuadTree::new(params),
            dynamic_bodies: Vec::new(),
            candidates: BTreeSet::new(),
        }
    }

    /// Rebuilds the static tree from every enabled static body with a volume.
    pub fn rebuild_static(&mut self, bodies: &Arena<RigidBody>) {
        self.static_tree.clear();
        for (handle, body) in bodies.iter() {
            if !body.is_static() {
                continue;
            }
            let Some(half_sizes) = body.broadphase_half_sizes() else {
                continue;
            };
            self.static_tree
                .insert(handle, body.transform.position, half_sizes);
        }
        log::debug!(
            "static quadtree rebuilt: {} entries in {} leaves",
            self.static_tree.len(),
            self.static_tree.leaf_count()
        );
    }

    /// Recomputes the candidate pair set for the current body positions.
    pub fn update(&mut self, bodies: &Arena<RigidBody>) -> &BTreeSet<CollisionPair> {
        self.candidates.clear();
        self.gather_dynamic(bodies);
        self.dynamic_versus_dynamic();
        self.dynamic_versus_static();
        &self.candidates
    }

    pub fn candidates(&self) -> &BTreeSet<CollisionPair> {
        &self.candidates
    }

    pub fn dynamic_count(&self) -> usize {
        self.dynamic_bodies.len()
    }

    pub fn static_tree(&self) -> &QuadTree<BodyHandle> {
        &self.static_tree
    }

    pub fn clear(&mut self) {
        self.static_tree.clear();
        self.dynamic_bodies.clear();
        self.candidates.clear();
    }

    fn gather_dynamic(&mut self, bodies: &Arena<RigidBody>) {
        self.dynamic_bodies.clear();
        for (handle, body) in bodies.iter() {
            if body.is_static() {
                continue;
            }
            let Some(half_sizes) = body.broadphase_half_sizes() else {
                continue;
            };
            self.dynamic_bodies.push(DynamicEntry {
                handle,
                position: body.transform.position,
                half_sizes,
            });
        }
    }

    fn dynamic_versus_dynamic(&mut self) {
        let mut tree = QuadTree::new(self.params);
        for entry in &self.dynamic_bodies {
            tree.insert(entry.handle, entry.position, entry.half_sizes);
        }

        let candidates = &mut self.candidates;
        tree.operate_on_contents(|contents| {
            for (i, first) in contents.iter().enumerate() {
                for second in &contents[i + 1..] {
                    if let Some(pair) = CollisionPair::new(first.value, second.value) {
                        candidates.insert(pair);
                    }
                }
            }
        });
    }

    fn static_pairs_for(tree: &QuadTree<BodyHandle>, entry: &DynamicEntry) -> Vec<CollisionPair> {
        let mut pairs = Vec::new();
        tree.dynamic_object_comparison(
            |contents| {
                pairs.extend(
                    contents
                        .iter()
                        .filter_map(|other| CollisionPair::new(other.value, entry.handle)),
                );
            },
            entry.position,
            entry.half_sizes,
        );
        pairs
    }

    #[cfg(not(feature = "parallel"))]
    fn dynamic_versus_static(&mut self) {
        if self.static_tree.is_empty() {
            return;
        }
        for entry in &self.dynamic_bodies {
            self.candidates
                .extend(Self::static_pairs_for(&self.static_tree, entry));
        }
    }

    #[cfg(feature = "parallel")]
    fn dynamic_versus_static(&mut self) {
        if self.static_tree.is_empty() {
            return;
        }
        let tree = &self.static_tree;
        let found: Vec<Vec<CollisionPair>> = self
            .dynamic_bodies
            .par_iter()
            .map(|entry| Self::static_pairs_for(tree, entry))
            .collect();
        self.candidates.extend(found.into_iter().flatten());
    }
}
