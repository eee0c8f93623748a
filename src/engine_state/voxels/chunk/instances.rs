//! # Instance Lists
//!
//! A dense, growable list of render instances for one block type in one chunk.
//!
//! Slots are handed out append-style and removed with swap-remove: the last live
//! instance moves into the freed slot, so the list never has holes and removal is
//! O(1). The price is that a block's slot can change when another block of the
//! same type is removed; slots are a render index, never a block identity.

use cgmath::Point3;

use crate::engine_state::rendering::InstanceRaw;

#[derive(Clone, Debug, Default)]
pub struct InstanceList {
    /// Instance data, in slot order
    instances: Vec<InstanceRaw>,
    /// Chunk-local position of the block owning each slot
    owners: Vec<Point3<i32>>,
}

impl InstanceList {
    /// Appends an instance owned by the block at `owner` and returns its slot.
    pub fn push(&mut self, owner: Point3<i32>, instance: InstanceRaw) -> u32 {
        let slot = self.instances.len() as u32;
        self.instances.push(instance);
        self.owners.push(owner);
        slot
    }

    /// Removes the instance in `slot` by moving the last instance into it.
    ///
    /// # Returns
    /// The owner of the instance that now occupies `slot`, whose recorded slot must
    /// be updated. `None` if the removed instance was the last one (nothing moved)
    /// or if `slot` is not live.
    pub fn swap_remove(&mut self, slot: u32) -> Option<Point3<i32>> {
        let slot = slot as usize;
        if slot >= self.instances.len() {
            return None;
        }

        self.instances.swap_remove(slot);
        self.owners.swap_remove(slot);
        self.owners.get(slot).copied()
    }

    /// The owner of a live slot.
    pub fn owner(&self, slot: u32) -> Option<Point3<i32>> {
        self.owners.get(slot as usize).copied()
    }

    /// Live instances, in slot order.
    pub fn as_slice(&self) -> &[InstanceRaw] {
        &self.instances
    }

    /// Number of live instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Drops every instance.
    pub fn clear(&mut self) {
        self.instances.clear();
        self.owners.clear();
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point3;

    use super::InstanceList;
    use crate::engine_state::rendering::InstanceRaw;

    fn list_of(count: i32) -> InstanceList {
        let mut list = InstanceList::default();
        for i in 0..count {
            let owner = Point3::new(i, 0, 0);
            list.push(owner, InstanceRaw::new(owner));
        }
        list
    }

    #[test]
    fn push_hands_out_consecutive_slots() {
        let mut list = InstanceList::default();
        assert_eq!(list.push(Point3::new(0, 0, 0), InstanceRaw::new(Point3::new(0, 0, 0))), 0);
        assert_eq!(list.push(Point3::new(1, 0, 0), InstanceRaw::new(Point3::new(1, 0, 0))), 1);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn swap_remove_moves_the_last_instance_into_the_hole() {
        let mut list = list_of(4);

        let moved = list.swap_remove(1);

        assert_eq!(moved, Some(Point3::new(3, 0, 0)));
        assert_eq!(list.len(), 3);
        assert_eq!(list.owner(1), Some(Point3::new(3, 0, 0)));
        assert_eq!(list.as_slice()[1].position, [3.0, 0.0, 0.0]);
    }

    #[test]
    fn removing_the_last_slot_moves_nothing() {
        let mut list = list_of(3);
        assert_eq!(list.swap_remove(2), None);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn removing_a_dead_slot_is_ignored() {
        let mut list = list_of(2);
        assert_eq!(list.swap_remove(5), None);
        assert_eq!(list.len(), 2);
    }
}
