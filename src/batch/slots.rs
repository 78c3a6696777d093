//! Bounded texture-slot registry for one batch.

use crate::{backend::DrawBackend, data_structures::texture::TextureHandle};

/// Maps the textures referenced by the current batch to sampler slots.
///
/// Slot 0 always holds [`TextureHandle::WHITE`]. Other slots are handed out in
/// registration order and only released all at once by [`reset`](Self::reset).
#[derive(Debug)]
pub struct TextureSlotTable {
    slots: Vec<TextureHandle>,
    capacity: usize,
}

impl TextureSlotTable {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "texture slot table needs room for the white texture");
        let mut slots = Vec::with_capacity(capacity);
        slots.push(TextureHandle::WHITE);
        Self { slots, capacity }
    }

    /// Slot of `texture` if it is already bound in this batch.
    pub fn find(&self, texture: &TextureHandle) -> Option<u32> {
        self.slots
            .iter()
            .position(|bound| bound == texture)
            .map(|slot| slot as u32)
    }

    /// Returns the slot for `texture`, registering it if needed.
    ///
    /// `None` means the table is full and the batch must be flushed before
    /// this texture can be used.
    pub fn resolve(&mut self, texture: &TextureHandle) -> Option<u32> {
        if let Some(slot) = self.find(texture) {
            return Some(slot);
        }
        if self.is_full() {
            return None;
        }
        self.slots.push(*texture);
        Some(self.slots.len() as u32 - 1)
    }

    /// Drops every binding except the reserved white slot.
    pub fn reset(&mut self) {
        self.slots.truncate(1);
    }

    /// Hands every occupied non-reserved slot to the backend.
    pub fn bind_all<B: DrawBackend + ?Sized>(&self, backend: &mut B) {
        for (slot, texture) in self.slots.iter().enumerate().skip(1) {
            backend.bind_texture(*texture, slot as u32);
        }
    }

    /// Number of occupied slots, reserved slot included.
    pub fn active_count(&self) -> usize {
        self.slots.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tex(id: u32) -> TextureHandle {
        TextureHandle::new(id, 16, 16, 4)
    }

    #[test]
    fn starts_with_only_the_white_slot() {
        let table = TextureSlotTable::new(16);
        assert_eq!(table.active_count(), 1);
        assert_eq!(table.find(&TextureHandle::WHITE), Some(0));
        assert!(!table.is_full());
    }

    #[test]
    fn white_resolves_to_slot_zero_without_consuming() {
        let mut table = TextureSlotTable::new(4);
        assert_eq!(table.resolve(&TextureHandle::WHITE), Some(0));
        assert_eq!(table.active_count(), 1);
    }

    #[test]
    fn resolution_is_idempotent_within_a_batch() {
        let mut table = TextureSlotTable::new(16);
        let first = table.resolve(&tex(7));
        let second = table.resolve(&tex(7));
        assert_eq!(first, Some(1));
        assert_eq!(first, second);
        assert_eq!(table.active_count(), 2);
    }

    #[test]
    fn slots_are_assigned_in_registration_order() {
        let mut table = TextureSlotTable::new(16);
        assert_eq!(table.resolve(&tex(30)), Some(1));
        assert_eq!(table.resolve(&tex(10)), Some(2));
        assert_eq!(table.resolve(&tex(20)), Some(3));
        assert_eq!(table.resolve(&tex(10)), Some(2));
    }

    #[test]
    fn full_table_refuses_new_textures_but_keeps_known_ones() {
        let mut table = TextureSlotTable::new(3);
        assert_eq!(table.resolve(&tex(1)), Some(1));
        assert_eq!(table.resolve(&tex(2)), Some(2));
        assert!(table.is_full());
        assert_eq!(table.resolve(&tex(3)), None);
        assert_eq!(table.resolve(&tex(1)), Some(1));
        assert_eq!(table.active_count(), 3);
    }

    #[test]
    fn reset_keeps_only_the_reserved_slot() {
        let mut table = TextureSlotTable::new(3);
        table.resolve(&tex(1));
        table.resolve(&tex(2));
        table.reset();
        assert_eq!(table.active_count(), 1);
        assert_eq!(table.find(&tex(1)), None);
        assert_eq!(table.resolve(&tex(3)), Some(1));
    }
}
