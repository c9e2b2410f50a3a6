use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Stable, generation-checked handle to a body stored in an [`Arena`].
///
/// Handles order by slot index first, then generation, which is the order
/// used to normalise collision pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct BodyHandle {
    index: u32,
    generation: u32,
}

impl BodyHandle {
    pub const INVALID: BodyHandle = BodyHandle {
        index: u32::MAX,
        generation: 0,
    };

    pub fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn index(&self) -> usize {
        self.index as usize
    }
}

impl Default for BodyHandle {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Generational arena owning every body in the world.
///
/// Iteration always walks slots in index order so per-frame passes see the
/// same body order every frame.
pub struct Arena<T> {
    slots: Vec<Option<T>>,
    generations: Vec<u32>,
    free_list: VecDeque<u32>,
    live: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free_list: VecDeque::new(),
            live: 0,
        }
    }

    pub fn insert(&mut self, item: T) -> BodyHandle {
        self.live += 1;
        if let Some(index) = self.free_list.pop_front() {
            let slot = index as usize;
            self.slots[slot] = Some(item);
            return BodyHandle::new(index, self.generations[slot]);
        }

        let index = self.slots.len() as u32;
        self.slots.push(Some(item));
        self.generations.push(0);
        BodyHandle::new(index, 0)
    }

    pub fn get(&self, handle: BodyHandle) -> Option<&T> {
        if !self.is_valid(handle) {
            return None;
        }
        self.slots.get(handle.index()).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut T> {
        if !self.is_valid(handle) {
            return None;
        }
        self.slots.get_mut(handle.index()).and_then(Option::as_mut)
    }

    /// Borrows two distinct entries mutably, in argument order.
    pub fn get_pair_mut(&mut self, a: BodyHandle, b: BodyHandle) -> Option<(&mut T, &mut T)> {
        if a.index() == b.index() || !self.is_valid(a) || !self.is_valid(b) {
            return None;
        }

        let flipped = a.index() > b.index();
        let (low, high) = if flipped { (b, a) } else { (a, b) };
        let (left, right) = self.slots.split_at_mut(high.index());
        let low_item = left.get_mut(low.index()).and_then(Option::as_mut)?;
        let high_item = right.first_mut().and_then(Option::as_mut)?;

        if flipped {
            Some((high_item, low_item))
        } else {
            Some((low_item, high_item))
        }
    }

    pub fn remove(&mut self, handle: BodyHandle) -> Option<T> {
        if !self.is_valid(handle) {
            return None;
        }
        let slot = handle.index();
        let item = self.slots[slot].take()?;
        self.generations[slot] = self.generations[slot].wrapping_add(1);
        self.free_list.push_back(handle.index);
        self.live -= 1;
        Some(item)
    }

    /// Drops every entry and invalidates all outstanding handles.
    pub fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.take().is_some() {
                self.generations[index] = self.generations[index].wrapping_add(1);
                self.free_list.push_back(index as u32);
            }
        }
        self.live = 0;
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.get(handle).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &T)> + '_ {
        self.slots.iter().enumerate().filter_map(move |(index, slot)| {
            slot.as_ref()
                .map(|item| (BodyHandle::new(index as u32, self.generations[index]), item))
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (BodyHandle, &mut T)> + '_ {
        let generations = &self.generations;
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(move |(index, slot)| {
                slot.as_mut()
                    .map(|item| (BodyHandle::new(index as u32, generations[index]), item))
            })
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    fn is_valid(&self, handle: BodyHandle) -> bool {
        self.generations
            .get(handle.index())
            .is_some_and(|generation| *generation == handle.generation)
    }
}
