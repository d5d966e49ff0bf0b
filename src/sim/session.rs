//! Spin session state machine
//!
//! Owns the inventory, the current wheel, and the spin in flight. Side effect
//! order on a win is fixed: resolve winner, decrement stock, record the winner,
//! set the fallback caption, then report the finish. Inventory is therefore
//! already decremented by the time any popup or caption request happens.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::inventory::Inventory;
use super::spin::{SpinAnimator, spin_target};
use super::wheel::{WheelSlot, build_slots, resolve_winner, slice_width};
use crate::caption::{Honorific, fallback_caption};
use crate::records::WinnerRecord;

/// Current status of the wheel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SpinStatus {
    #[default]
    Idle,
    Spinning,
    /// Spin resolved, winner popup showing
    Finished,
}

/// Why a spin request was refused. These surface as validation messages, not
/// faults.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpinError {
    #[error("Vui lòng nhập tên trước khi quay!")]
    EmptyName,
    #[error("Tất cả giải thưởng đã hết sạch!")]
    OutOfPrizes,
    #[error("Vòng quay đang chạy, chờ chút nhé!")]
    AlreadySpinning,
}

/// Discrete outcomes of advancing the animation one frame
#[derive(Debug, Clone, PartialEq)]
pub enum SpinEvent {
    /// The wheel crossed a slice boundary (tick sound)
    Tick,
    /// The spin resolved
    Finished {
        slot_index: usize,
        prize_id: String,
        prize_name: String,
    },
}

/// The person currently at the wheel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entrant {
    pub name: String,
    pub honorific: Honorific,
    pub photo: Option<String>,
}

/// Everything the app mutates during play
#[derive(Debug, Clone)]
pub struct Session {
    pub inventory: Inventory,
    pub slots: Vec<WheelSlot>,
    pub rotation: f32,
    pub status: SpinStatus,
    pub winner: Option<WheelSlot>,
    pub caption: String,
    pub records: Vec<WinnerRecord>,
    animator: Option<SpinAnimator>,
    entrant: Option<Entrant>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Inventory::default())
    }
}

impl Session {
    pub fn new(inventory: Inventory) -> Self {
        let slots = build_slots(&inventory.available());
        Self {
            inventory,
            slots,
            rotation: 0.0,
            status: SpinStatus::Idle,
            winner: None,
            caption: String::new(),
            records: Vec::new(),
            animator: None,
            entrant: None,
        }
    }

    /// Recompute the wheel from the current inventory. Called after any inventory
    /// mutation; a wheel mid-spin keeps the slot list it started with.
    pub fn rebuild_slots(&mut self) {
        if self.status != SpinStatus::Spinning {
            self.slots = build_slots(&self.inventory.available());
        }
    }

    /// True while the wheel has at least one winnable slot
    pub fn can_spin(&self) -> bool {
        !self.slots.is_empty()
    }

    /// Begin a spin for `entrant`. Validation failures leave all state untouched.
    pub fn start_spin(
        &mut self,
        entrant: Entrant,
        now_ms: f64,
        rng: &mut impl Rng,
    ) -> Result<(), SpinError> {
        if self.status == SpinStatus::Spinning {
            return Err(SpinError::AlreadySpinning);
        }
        if entrant.name.trim().is_empty() {
            return Err(SpinError::EmptyName);
        }
        if self.slots.is_empty() {
            return Err(SpinError::OutOfPrizes);
        }

        let target = spin_target(rng, self.rotation);
        self.animator = Some(SpinAnimator::new(self.rotation, target, now_ms));
        self.entrant = Some(entrant);
        self.winner = None;
        self.caption.clear();
        self.status = SpinStatus::Spinning;
        Ok(())
    }

    /// Advance the animation to `now_ms`. Call once per animation frame.
    pub fn advance(&mut self, now_ms: f64) -> Vec<SpinEvent> {
        let mut events = Vec::new();
        let Some(animator) = self.animator.as_mut() else {
            return events;
        };

        let width = slice_width(self.slots.len());
        let (rotation, crossed, done) = animator.advance(now_ms, width);
        self.rotation = rotation;

        if crossed {
            events.push(SpinEvent::Tick);
        }
        if done {
            self.animator = None;
            if let Some(event) = self.finish(now_ms) {
                events.push(event);
            }
        }
        events
    }

    /// Resolve the spin at the final rotation. Decrements stock before anything
    /// user-visible happens.
    fn finish(&mut self, now_ms: f64) -> Option<SpinEvent> {
        let slot_index = resolve_winner(self.rotation, self.slots.len());
        let slot = self.slots.get(slot_index)?.clone();
        let entrant = self.entrant.take()?;

        self.inventory.decrement(&slot.prize_id);

        self.records.push(WinnerRecord {
            name: entrant.name.clone(),
            honorific: entrant.honorific,
            photo: entrant.photo,
            prize_name: slot.name.clone(),
            timestamp: now_ms,
        });

        self.caption = fallback_caption(entrant.honorific, &entrant.name, &slot.name);
        self.status = SpinStatus::Finished;
        self.winner = Some(slot.clone());
        self.slots = build_slots(&self.inventory.available());

        Some(SpinEvent::Finished {
            slot_index,
            prize_id: slot.prize_id,
            prize_name: slot.name,
        })
    }

    /// Replace the caption once the async request resolves (latest write wins)
    pub fn set_caption(&mut self, text: impl Into<String>) {
        self.caption = text.into();
    }

    /// Dismiss the winner popup
    pub fn dismiss_winner(&mut self) {
        if self.status == SpinStatus::Finished {
            self.status = SpinStatus::Idle;
        }
    }
}
