//! Share-link persistence
//!
//! The configured inventory is carried in the URL fragment so a reload (or a
//! pasted link) restores the event's prize list. The encoding is compact JSON with
//! one-letter field names, hex-encoded so the fragment needs no escaping. Decoding
//! is defensive: anything malformed falls back to the default inventory.

use serde::{Deserialize, Serialize};

use crate::sim::inventory::{Prize, default_prizes};

/// Wire form of a prize, field names shortened to keep the link small
#[derive(Debug, Serialize, Deserialize)]
struct PackedPrize {
    i: String,
    n: String,
    m: String,
    c: String,
    q: u32,
}

impl From<&Prize> for PackedPrize {
    fn from(p: &Prize) -> Self {
        Self {
            i: p.id.clone(),
            n: p.name.clone(),
            m: p.image.clone(),
            c: p.color.clone(),
            q: p.count,
        }
    }
}

impl From<PackedPrize> for Prize {
    fn from(p: PackedPrize) -> Self {
        Self {
            id: p.i,
            name: p.n,
            image: p.m,
            color: p.c,
            count: p.q,
        }
    }
}

/// Encode an inventory list as a text-safe fragment string
pub fn encode_inventory(prizes: &[Prize]) -> String {
    let packed: Vec<PackedPrize> = prizes.iter().map(PackedPrize::from).collect();
    // Serializing plain data cannot fail; an empty fragment decodes to defaults
    let json = serde_json::to_string(&packed).unwrap_or_default();
    hex::encode(json)
}

/// Decode a fragment string back into an inventory list. Malformed or empty input
/// falls back to the default prizes without raising a user-visible error.
pub fn decode_inventory(text: &str) -> Vec<Prize> {
    let text = text.trim().trim_start_matches('#');
    if text.is_empty() {
        return default_prizes();
    }

    let bytes = match hex::decode(text) {
        Ok(b) => b,
        Err(e) => {
            log::warn!("Share link is not valid hex ({e}), using default prizes");
            return default_prizes();
        }
    };
    let packed: Vec<PackedPrize> = match serde_json::from_slice(&bytes) {
        Ok(p) => p,
        Err(e) => {
            log::warn!("Share link did not parse ({e}), using default prizes");
            return default_prizes();
        }
    };
    if packed.is_empty() {
        log::warn!("Share link held an empty prize list, using default prizes");
        return default_prizes();
    }
    if !ids_are_valid(&packed) {
        log::warn!("Share link held blank or duplicate prize ids, using default prizes");
        return default_prizes();
    }
    packed.into_iter().map(Prize::from).collect()
}

/// Ids must be non-blank and unique: `Inventory` looks prizes up by id, so a
/// duplicate would leave its second copy unreachable for decrements.
fn ids_are_valid(packed: &[PackedPrize]) -> bool {
    let mut ids: Vec<&str> = packed.iter().map(|p| p.i.trim()).collect();
    if ids.iter().any(|i| i.is_empty()) {
        return false;
    }
    let before = ids.len();
    ids.sort_unstable();
    ids.dedup();
    ids.len() == before
}

/// Read the inventory from `location.hash` (WASM only)
#[cfg(target_arch = "wasm32")]
pub fn load_from_location() -> Vec<Prize> {
    let hash = web_sys::window()
        .map(|w| w.location())
        .and_then(|l| l.hash().ok())
        .unwrap_or_default();
    decode_inventory(&hash)
}

/// Write the inventory into `location.hash` (WASM only)
#[cfg(target_arch = "wasm32")]
pub fn save_to_location(prizes: &[Prize]) {
    if let Some(location) = web_sys::window().map(|w| w.location()) {
        let _ = location.set_hash(&encode_inventory(prizes));
    }
}

/// Native stubs
#[cfg(not(target_arch = "wasm32"))]
pub fn load_from_location() -> Vec<Prize> {
    default_prizes()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn save_to_location(_prizes: &[Prize]) {
    // No-op for native
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_round_trip_default_inventory() {
        let prizes = default_prizes();
        let encoded = encode_inventory(&prizes);
        assert_eq!(decode_inventory(&encoded), prizes);
    }

    #[test]
    fn test_encoded_text_is_url_safe() {
        let encoded = encode_inventory(&default_prizes());
        assert!(encoded.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_leading_hash_is_stripped() {
        let prizes = default_prizes();
        let encoded = format!("#{}", encode_inventory(&prizes));
        assert_eq!(decode_inventory(&encoded), prizes);
    }

    #[test]
    fn test_malformed_input_falls_back() {
        for bad in ["zzzz", "deadbeef", "68656c6c6f", "#%%%", "5b5d"] {
            // "5b5d" is hex for "[]" - an empty list also falls back
            assert_eq!(decode_inventory(bad), default_prizes());
        }
    }

    #[test]
    fn test_duplicate_ids_fall_back() {
        // Both entries share id "1"; decrement lookups would only ever see the
        // first copy, so the whole payload is rejected
        let prizes = vec![Prize::new("1", "Prize A", 1), Prize::new("1", "Prize B", 2)];
        assert_eq!(decode_inventory(&encode_inventory(&prizes)), default_prizes());
    }

    #[test]
    fn test_blank_ids_fall_back() {
        let prizes = vec![Prize::new("  ", "Prize A", 1)];
        assert_eq!(decode_inventory(&encode_inventory(&prizes)), default_prizes());
    }

    #[test]
    fn test_missing_input_falls_back() {
        assert_eq!(decode_inventory(""), default_prizes());
        assert_eq!(decode_inventory("#"), default_prizes());
    }

    proptest! {
        #[test]
        fn prop_round_trip(counts in proptest::collection::vec(0u32..100, 1..10)) {
            let prizes: Vec<Prize> = counts
                .iter()
                .enumerate()
                .map(|(i, &c)| Prize::new(format!("p{i}"), format!("Giải {i}"), c))
                .collect();
            prop_assert_eq!(decode_inventory(&encode_inventory(&prizes)), prizes);
        }

        #[test]
        fn prop_decode_never_panics(junk in ".*") {
            let decoded = decode_inventory(&junk);
            prop_assert!(!decoded.is_empty());
        }
    }
}
