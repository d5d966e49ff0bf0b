//! App settings and preferences
//!
//! Persisted separately from the winner log in LocalStorage.

use serde::{Deserialize, Serialize};

/// Background wallpaper presets offered in the settings tab
pub const BG_PRESETS: [(&str, &str); 4] = [
    (
        "Đêm Huyền Bí",
        "https://images.unsplash.com/photo-1557683316-973673baf926?auto=format&fit=crop&w=1920&q=80",
    ),
    (
        "Hoàng Kim Luxury",
        "https://images.unsplash.com/photo-1513519245088-0e12902e5a38?auto=format&fit=crop&w=1920&q=80",
    ),
    (
        "Sân Khấu Ánh Sáng",
        "https://images.unsplash.com/photo-1492684223066-81342ee5ff30?auto=format&fit=crop&w=1920&q=80",
    ),
    (
        "Vũ Trụ Cyber",
        "https://images.unsplash.com/photo-1534796636912-3b95b3ab5986?auto=format&fit=crop&w=1920&q=80",
    ),
];

/// Built-in background music options; the first entry is the default track
pub const MUSIC_PLAYLIST: [(&str, &str); 4] = [
    (
        "Nhạc Xổ Số (Kiến Thiết)",
        "https://raw.githubusercontent.com/hoangjustinseo-ctrl/vongquaymayman/main/nhac-xo-so.mp3",
    ),
    (
        "Epic Horse Race",
        "https://cdn.pixabay.com/audio/2022/01/18/audio_d0a13f69d2.mp3",
    ),
    (
        "Hội Chợ Vui Nhộn",
        "https://cdn.pixabay.com/audio/2022/03/15/audio_73f089693c.mp3",
    ),
    (
        "Cinematic Winner",
        "https://cdn.pixabay.com/audio/2024/02/07/audio_03d3600938.mp3",
    ),
];

/// Built-in win sound options
pub const WIN_SOUNDS: [(&str, &str); 3] = [
    (
        "Pháo Hoa & Reo Hò",
        "https://cdn.pixabay.com/audio/2021/08/04/audio_12b0c7443c.mp3",
    ),
    (
        "Ting Ting Tài Khoản",
        "https://cdn.pixabay.com/audio/2021/08/04/audio_e6583996d9.mp3",
    ),
    (
        "Kèn Trumpet Thắng Lợi",
        "https://cdn.pixabay.com/audio/2022/03/10/audio_55a293b6e7.mp3",
    ),
];

/// User preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Wallpaper image URL behind the wheel
    pub wallpaper: String,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Background music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Background music URL (custom upload or playlist entry)
    pub bg_music_url: String,
    /// Win sound URL (custom upload or preset)
    pub win_sound_url: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            wallpaper: BG_PRESETS[0].1.to_string(),
            master_volume: 0.7,
            music_volume: 0.5,
            bg_music_url: MUSIC_PLAYLIST[0].1.to_string(),
            win_sound_url: WIN_SOUNDS[0].1.to_string(),
        }
    }
}

impl AppSettings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "lucky_spin_settings";

    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_use_first_presets() {
        let s = AppSettings::default();
        assert_eq!(s.wallpaper, BG_PRESETS[0].1);
        assert_eq!(s.bg_music_url, MUSIC_PLAYLIST[0].1);
        assert_eq!(s.win_sound_url, WIN_SOUNDS[0].1);
    }

    #[test]
    fn test_playlist_default_is_lottery_track() {
        assert_eq!(MUSIC_PLAYLIST[0].0, "Nhạc Xổ Số (Kiến Thiết)");
        assert_eq!(AppSettings::default().bg_music_url, MUSIC_PLAYLIST[0].1);
    }

    #[test]
    fn test_volume_clamped() {
        let mut s = AppSettings::default();
        s.set_master_volume(1.5);
        assert_eq!(s.master_volume, 1.0);
        s.set_music_volume(-0.2);
        assert_eq!(s.music_volume, 0.0);
    }

    #[test]
    fn test_settings_round_trip_json() {
        let s = AppSettings::default();
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(serde_json::from_str::<AppSettings>(&json).unwrap(), s);
    }
}
