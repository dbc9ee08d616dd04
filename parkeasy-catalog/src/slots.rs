use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Slot accounting for a single spot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotEntry {
    pub spot_id: Uuid,
    pub available_slots: i32,
    pub total_slots: i32,
    pub reserved_slots: i32,
}

/// In-memory slot tracker. Keeps the catalog's availability counts honest
/// while a booking is in flight: reserve on checkout, commit once the charge
/// succeeds, release on cancellation. In-process only.
pub struct SlotTracker {
    slots: HashMap<Uuid, SlotEntry>,
}

impl SlotTracker {
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }

    /// Register a spot's capacity
    pub fn initialize(&mut self, spot_id: Uuid, total_slots: i32, available_slots: i32) {
        self.slots.insert(
            spot_id,
            SlotEntry {
                spot_id,
                available_slots,
                total_slots,
                reserved_slots: 0,
            },
        );
    }

    pub fn get(&self, spot_id: &Uuid) -> Option<&SlotEntry> {
        self.slots.get(spot_id)
    }

    /// Available count, zero for unknown spots
    pub fn available(&self, spot_id: &Uuid) -> i32 {
        self.slots.get(spot_id).map_or(0, |e| e.available_slots)
    }

    /// Take slots out of the available pool while a booking is in flight
    pub fn reserve(&mut self, spot_id: &Uuid, count: i32) -> Result<(), SlotError> {
        let entry = self
            .slots
            .get_mut(spot_id)
            .ok_or_else(|| SlotError::NotFound(spot_id.to_string()))?;

        if entry.available_slots < count {
            return Err(SlotError::InsufficientSlots {
                requested: count,
                available: entry.available_slots,
            });
        }

        entry.available_slots -= count;
        entry.reserved_slots += count;

        Ok(())
    }

    /// Return slots to the available pool (booking cancelled or abandoned)
    pub fn release(&mut self, spot_id: &Uuid, count: i32) -> Result<(), SlotError> {
        let entry = self
            .slots
            .get_mut(spot_id)
            .ok_or_else(|| SlotError::NotFound(spot_id.to_string()))?;

        entry.available_slots = (entry.available_slots + count).min(entry.total_slots);
        entry.reserved_slots = entry.reserved_slots.saturating_sub(count);

        Ok(())
    }

    /// Finalize a reservation (booking confirmed)
    pub fn commit(&mut self, spot_id: &Uuid, count: i32) -> Result<(), SlotError> {
        let entry = self
            .slots
            .get_mut(spot_id)
            .ok_or_else(|| SlotError::NotFound(spot_id.to_string()))?;

        if entry.reserved_slots < count {
            return Err(SlotError::InsufficientReserved {
                requested: count,
                reserved: entry.reserved_slots,
            });
        }

        entry.reserved_slots -= count;

        Ok(())
    }

    /// Fraction of capacity in use
    pub fn occupancy(&self, spot_id: &Uuid) -> Option<f64> {
        self.slots.get(spot_id).map(|entry| {
            if entry.total_slots == 0 {
                0.0
            } else {
                1.0 - (entry.available_slots as f64 / entry.total_slots as f64)
            }
        })
    }
}

impl Default for SlotTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SlotError {
    #[error("Spot not tracked: {0}")]
    NotFound(String),

    #[error("Insufficient slots: requested {requested}, available {available}")]
    InsufficientSlots { requested: i32, available: i32 },

    #[error("Insufficient reserved slots: requested {requested}, reserved {reserved}")]
    InsufficientReserved { requested: i32, reserved: i32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_lifecycle() {
        let mut tracker = SlotTracker::new();
        let spot_id = Uuid::new_v4();

        tracker.initialize(spot_id, 20, 20);
        assert_eq!(tracker.available(&spot_id), 20);

        // Reserve
        tracker.reserve(&spot_id, 1).unwrap();
        assert_eq!(tracker.available(&spot_id), 19);
        assert_eq!(tracker.get(&spot_id).unwrap().reserved_slots, 1);

        // Commit
        tracker.commit(&spot_id, 1).unwrap();
        assert_eq!(tracker.get(&spot_id).unwrap().reserved_slots, 0);
        assert_eq!(tracker.available(&spot_id), 19);

        // Cancellation returns the slot
        tracker.release(&spot_id, 1).unwrap();
        assert_eq!(tracker.available(&spot_id), 20);
    }

    #[test]
    fn test_reserve_fails_when_full() {
        let mut tracker = SlotTracker::new();
        let spot_id = Uuid::new_v4();

        tracker.initialize(spot_id, 1, 0);
        let result = tracker.reserve(&spot_id, 1);
        assert!(matches!(result, Err(SlotError::InsufficientSlots { .. })));
    }

    #[test]
    fn test_release_never_exceeds_capacity() {
        let mut tracker = SlotTracker::new();
        let spot_id = Uuid::new_v4();

        tracker.initialize(spot_id, 5, 5);
        tracker.release(&spot_id, 3).unwrap();
        assert_eq!(tracker.available(&spot_id), 5);
    }

    #[test]
    fn test_occupancy() {
        let mut tracker = SlotTracker::new();
        let spot_id = Uuid::new_v4();

        tracker.initialize(spot_id, 10, 10);
        tracker.reserve(&spot_id, 3).unwrap();

        let occupancy = tracker.occupancy(&spot_id).unwrap();
        assert!((occupancy - 0.3).abs() < 0.01);
    }
}
