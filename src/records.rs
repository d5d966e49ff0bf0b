//! Winner log
//!
//! Append-only record of every spin result, persisted to LocalStorage so the
//! event staff can hand out prizes after the fact. Records are never mutated once
//! written.

use serde::{Deserialize, Serialize};

use crate::caption::Honorific;

/// One resolved spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinnerRecord {
    /// Winner's name as entered
    pub name: String,
    /// Honorific category selected for the caption
    pub honorific: Honorific,
    /// Optional photo URL captured at the booth
    pub photo: Option<String>,
    /// Name of the prize at the moment it was won
    pub prize_name: String,
    /// Unix timestamp (ms) when the spin resolved
    pub timestamp: f64,
}

/// Append-only list of winners
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WinnerLog {
    pub entries: Vec<WinnerRecord>,
}

impl WinnerLog {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "lucky_spin_winners";

    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, record: WinnerRecord) {
        self.entries.push(record);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Most recent winner first
    pub fn latest(&self) -> Option<&WinnerRecord> {
        self.entries.last()
    }

    /// Load the log from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(log) = serde_json::from_str::<WinnerLog>(&json) {
                    log::info!("Loaded {} winner records", log.entries.len());
                    return log;
                }
            }
        }

        log::info!("No winner log found, starting fresh");
        Self::new()
    }

    /// Save the log to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Winner log saved ({} entries)", self.entries.len());
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

/// Format a timestamp as a relative date string
#[cfg(target_arch = "wasm32")]
pub fn format_date(timestamp: f64) -> String {
    let now = js_sys::Date::now();
    let diff_mins = (now - timestamp) / 60_000.0;
    let diff_hours = diff_mins / 60.0;

    if diff_hours >= 24.0 {
        let date = js_sys::Date::new(&wasm_bindgen::JsValue::from_f64(timestamp));
        format!(
            "{}/{}/{}",
            date.get_date(),
            date.get_month() + 1,
            date.get_full_year() % 100
        )
    } else if diff_hours >= 1.0 {
        format!("{} giờ trước", diff_hours.floor() as i32)
    } else if diff_mins >= 1.0 {
        format!("{} phút trước", diff_mins.floor() as i32)
    } else {
        "Vừa xong".to_string()
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn format_date(_timestamp: f64) -> String {
    "N/A".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, ts: f64) -> WinnerRecord {
        WinnerRecord {
            name: name.to_string(),
            honorific: Honorific::Anh,
            photo: None,
            prize_name: "1 Thùng bia".to_string(),
            timestamp: ts,
        }
    }

    #[test]
    fn test_log_is_append_only_ordered() {
        let mut log = WinnerLog::new();
        assert!(log.is_empty());

        log.push(record("LAN", 1.0));
        log.push(record("HÙNG", 2.0));

        assert_eq!(log.len(), 2);
        assert_eq!(log.entries[0].name, "LAN");
        assert_eq!(log.latest().unwrap().name, "HÙNG");
    }

    #[test]
    fn test_log_round_trips_through_json() {
        let mut log = WinnerLog::new();
        log.push(record("LAN", 1_700_000_000_000.0));

        let json = serde_json::to_string(&log).unwrap();
        let back: WinnerLog = serde_json::from_str(&json).unwrap();
        assert_eq!(back.entries, log.entries);
    }
}
