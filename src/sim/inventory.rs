//! Prize inventory
//!
//! The inventory is the only mutable store in the app. Counts go down by one on a
//! win (never below zero) and are otherwise edited through the settings tab.

use serde::{Deserialize, Serialize};

/// A prize in the inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prize {
    pub id: String,
    pub name: String,
    pub image: String,
    pub color: String,
    /// Remaining stock; 0 means the prize no longer appears on the wheel
    pub count: u32,
}

impl Prize {
    pub fn new(id: impl Into<String>, name: impl Into<String>, count: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image: DEFAULT_PRIZE_IMAGE.to_string(),
            color: crate::consts::VIBRANT_COLORS[0].to_string(),
            count,
        }
    }
}

/// Image used for prizes added through the settings tab
pub const DEFAULT_PRIZE_IMAGE: &str =
    "https://img.freepik.com/free-vector/gift-box-with-red-ribbon_1308-41071.jpg";

/// The stock prize list for a fresh event
pub fn default_prizes() -> Vec<Prize> {
    let stock = [
        ("1", "10 Chai nước tăng lực", 4, "#f59e0b", "3127/3127450"),
        ("2", "3 Thùng mì tôm", 3, "#ef4444", "3465/3465067"),
        ("3", "1 Thùng bia", 2, "#3b82f6", "931/931949"),
        ("4", "5 Chai nước ngọt", 10, "#10b981", "2405/2405479"),
        ("5", "2 Thùng sữa", 4, "#8b5cf6", "3050/3050165"),
        ("6", "10 Vỉ trứng gà", 6, "#ec4899", "2674/2674486"),
    ];
    stock
        .into_iter()
        .map(|(id, name, count, color, icon)| Prize {
            id: id.to_string(),
            name: name.to_string(),
            image: format!("https://cdn-icons-png.flaticon.com/512/{icon}.png"),
            color: color.to_string(),
            count,
        })
        .collect()
}

/// Prize inventory with remaining counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub prizes: Vec<Prize>,
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            prizes: default_prizes(),
        }
    }
}

impl Inventory {
    pub fn new(prizes: Vec<Prize>) -> Self {
        Self { prizes }
    }

    /// Prizes still in stock, in inventory order
    pub fn available(&self) -> Vec<&Prize> {
        self.prizes.iter().filter(|p| p.count > 0).collect()
    }

    /// True while at least one prize can still be won
    pub fn any_available(&self) -> bool {
        self.prizes.iter().any(|p| p.count > 0)
    }

    pub fn get(&self, id: &str) -> Option<&Prize> {
        self.prizes.iter().find(|p| p.id == id)
    }

    /// Decrement a prize count on a win, clamped at zero.
    /// Returns the new count, or None if the id is unknown.
    pub fn decrement(&mut self, id: &str) -> Option<u32> {
        let prize = self.prizes.iter_mut().find(|p| p.id == id)?;
        prize.count = prize.count.saturating_sub(1);
        Some(prize.count)
    }

    /// Add a fresh prize with a synthetic id (caller supplies the timestamp so the
    /// core stays deterministic)
    pub fn add_prize(&mut self, now_ms: f64) -> &Prize {
        let color = crate::consts::VIBRANT_COLORS[self.prizes.len() % 16];
        let prize = Prize {
            id: format!("{}", now_ms as u64),
            name: "QUÀ MỚI".to_string(),
            image: DEFAULT_PRIZE_IMAGE.to_string(),
            color: color.to_string(),
            count: 1,
        };
        self.prizes.push(prize);
        self.prizes.last().unwrap()
    }

    pub fn update_prize(&mut self, id: &str, f: impl FnOnce(&mut Prize)) -> bool {
        match self.prizes.iter_mut().find(|p| p.id == id) {
            Some(prize) => {
                f(prize);
                true
            }
            None => false,
        }
    }

    /// Delete a prize. The inventory keeps at least one entry so the settings tab
    /// never renders empty; returns false when the delete is refused.
    pub fn delete_prize(&mut self, id: &str) -> bool {
        if self.prizes.len() <= 1 {
            return false;
        }
        let before = self.prizes.len();
        self.prizes.retain(|p| p.id != id);
        self.prizes.len() < before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decrement_clamps_at_zero() {
        let mut inv = Inventory::new(vec![Prize::new("a", "Prize A", 1)]);
        assert_eq!(inv.decrement("a"), Some(0));
        assert_eq!(inv.decrement("a"), Some(0));
        assert_eq!(inv.get("a").unwrap().count, 0);
    }

    #[test]
    fn test_decrement_unknown_id() {
        let mut inv = Inventory::default();
        assert_eq!(inv.decrement("nope"), None);
    }

    #[test]
    fn test_available_filters_empty_stock() {
        let mut inv = Inventory::new(vec![
            Prize::new("a", "Prize A", 1),
            Prize::new("b", "Prize B", 0),
        ]);
        assert_eq!(inv.available().len(), 1);
        assert!(inv.any_available());

        inv.decrement("a");
        assert!(inv.available().is_empty());
        assert!(!inv.any_available());
    }

    #[test]
    fn test_update_prize_edits_fields() {
        let mut inv = Inventory::new(vec![Prize::new("a", "Prize A", 1)]);
        assert!(inv.update_prize("a", |p| {
            p.name = "Quà Tết".to_string();
            p.count = 7;
            p.color = "#123456".to_string();
        }));

        let p = inv.get("a").unwrap();
        assert_eq!(p.name, "Quà Tết");
        assert_eq!(p.count, 7);
        assert_eq!(p.color, "#123456");

        assert!(!inv.update_prize("zzz", |p| p.count = 0));
    }

    #[test]
    fn test_delete_keeps_last_prize() {
        let mut inv = Inventory::new(vec![Prize::new("a", "Prize A", 1)]);
        assert!(!inv.delete_prize("a"));
        assert_eq!(inv.prizes.len(), 1);

        inv.add_prize(1234.0);
        assert!(inv.delete_prize("a"));
        assert_eq!(inv.prizes.len(), 1);
    }

    #[test]
    fn test_default_inventory_is_spinnable() {
        let inv = Inventory::default();
        assert_eq!(inv.prizes.len(), 6);
        assert!(inv.any_available());
    }
}
