//! Lucky Spin - a prize wheel for live events
//!
//! Core modules:
//! - `sim`: Deterministic wheel logic (inventory, geometry, spin animation, session)
//! - `caption`: Congratulatory caption with AI request + deterministic fallback
//! - `persistence`: Share-link codec (inventory in the URL fragment)
//! - `records`: Append-only winner log
//! - `settings`: User preferences (wallpaper, volumes, custom sounds)
//! - `audio`: Synthesized tick/fanfare sound effects

pub mod audio;
pub mod caption;
pub mod persistence;
pub mod records;
pub mod settings;
pub mod sim;

pub use records::{WinnerLog, WinnerRecord};
pub use settings::AppSettings;

/// Wheel configuration constants
pub mod consts {
    /// Spin duration in milliseconds (wall-clock, frame-rate independent)
    pub const SPIN_DURATION_MS: f64 = 8000.0;

    /// Minimum number of full extra turns per spin
    pub const MIN_EXTRA_TURNS: f32 = 10.0;
    /// Additional random full turns on top of the minimum (uniform in [0, range))
    pub const EXTRA_TURNS_RANGE: f32 = 5.0;

    /// Fixed pointer position in degrees (top of the circle)
    pub const POINTER_ANGLE_DEG: f32 = 270.0;

    /// Pad the wheel by repeating available prizes until it has this many slots
    pub const MIN_WHEEL_SLOTS: usize = 8;
    /// Hard cap on visual slots
    pub const MAX_WHEEL_SLOTS: usize = 16;

    /// Slot color palette, cycled by slot index
    pub const VIBRANT_COLORS: [&str; 16] = [
        "#f43f5e", "#ec4899", "#d946ef", "#a855f7", "#8b5cf6", "#6366f1", "#3b82f6", "#0ea5e9",
        "#06b6d4", "#14b8a6", "#10b981", "#22c55e", "#84cc16", "#eab308", "#f59e0b", "#f97316",
    ];
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_deg(angle: f32) -> f32 {
    let a = angle % 360.0;
    if a < 0.0 { a + 360.0 } else { a }
}
