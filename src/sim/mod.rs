//! Deterministic wheel simulation
//!
//! All spin logic lives here. This module must be pure and deterministic:
//! - Wall-clock timestamps passed in, never sampled
//! - Seeded RNG only
//! - No rendering, network, or platform dependencies

pub mod inventory;
pub mod session;
pub mod spin;
pub mod wheel;

pub use inventory::{Inventory, Prize};
pub use session::{Entrant, Session, SpinError, SpinEvent, SpinStatus};
pub use spin::{SpinAnimator, ease_out_quart, spin_target};
pub use wheel::{WheelSlot, build_slots, resolve_winner, slice_width};
