use std::collections::BTreeMap;

use glam::Vec3;

use crate::utils::allocator::BodyHandle;

/// Contact geometry produced by the narrowphase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactPoint {
    /// Unit normal pointing from body A toward body B.
    pub normal: Vec3,
    /// Overlap depth, never negative.
    pub penetration: f32,
    /// Contact location relative to A's centre.
    pub local_a: Vec3,
    /// Contact location relative to B's centre.
    pub local_b: Vec3,
}

impl ContactPoint {
    /// The same contact seen from the other body.
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            penetration: self.penetration,
            local_a: self.local_b,
            local_b: self.local_a,
        }
    }
}

/// Unordered body pair, stored as `(min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollisionPair {
    a: BodyHandle,
    b: BodyHandle,
}

impl CollisionPair {
    /// Returns `None` for a body paired with itself.
    pub fn new(x: BodyHandle, y: BodyHandle) -> Option<Self> {
        match x.cmp(&y) {
            std::cmp::Ordering::Less => Some(Self { a: x, b: y }),
            std::cmp::Ordering::Greater => Some(Self { a: y, b: x }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn a(&self) -> BodyHandle {
        self.a
    }

    pub fn b(&self) -> BodyHandle {
        self.b
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.a == handle || self.b == handle
    }
}

/// A confirmed collision that persists across frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionRecord {
    pub pair: CollisionPair,
    /// Latest contact, expressed from `pair.a()` toward `pair.b()`.
    pub point: ContactPoint,
    /// Frame updates left before the record expires unless re-confirmed.
    pub frames_left: u32,
    /// Set until the begin event for this record has been delivered.
    pub is_new: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionEventKind {
    Begin,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionEvent {
    pub kind: CollisionEventKind,
    pub pair: CollisionPair,
}

/// Persistent collision records keyed by pair.
#[derive(Debug, Default, Clone)]
pub struct ContactCache {
    records: BTreeMap<CollisionPair, CollisionRecord>,
}

impl ContactCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a confirmed contact. A pair already present is refreshed
    /// rather than duplicated, so its begin event fires only once.
    pub fn confirm(&mut self, pair: CollisionPair, point: ContactPoint, frames: u32) {
        self.records
            .entry(pair)
            .and_modify(|record| {
                record.point = point;
                record.frames_left = frames;
            })
            .or_insert(CollisionRecord {
                pair,
                point,
                frames_left: frames,
                is_new: true,
            });
    }

    /// Ages every record by one frame, returning begin events for fresh
    /// records and end events for expired ones, in pair order.
    pub fn advance_frame(&mut self) -> Vec<CollisionEvent> {
        let mut events = Vec::new();
        self.records.retain(|pair, record| {
            if record.is_new {
                record.is_new = false;
                events.push(CollisionEvent {
                    kind: CollisionEventKind::Begin,
                    pair: *pair,
                });
            }
            match record.frames_left.checked_sub(1) {
                Some(left) => {
                    record.frames_left = left;
                    true
                }
                None => {
                    events.push(CollisionEvent {
                        kind: CollisionEventKind::End,
                        pair: *pair,
                    });
                    false
                }
            }
        });
        events
    }

    pub fn get(&self, pair: &CollisionPair) -> Option<&CollisionRecord> {
        self.records.get(pair)
    }

    pub fn is_colliding(&self, x: BodyHandle, y: BodyHandle) -> bool {
        CollisionPair::new(x, y).is_some_and(|pair| self.records.contains_key(&pair))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CollisionRecord> + '_ {
        self.records.values()
    }

    /// Drops every record that involves `handle`.
    pub fn forget_body(&mut self, handle: BodyHandle) {
        self.records.retain(|pair, _| !pair.contains(handle));
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
