//! Built-in menu used to seed an empty catalog

use crate::models::{MenuCategory, MenuEntry};
use rust_decimal::Decimal;

const SEED: [(&str, MenuCategory, i64); 16] = [
    ("Pizza Margherita", MenuCategory::Food, 25),
    ("Pizza Pepperoni", MenuCategory::Food, 30),
    ("Burger Classic", MenuCategory::Food, 22),
    ("Burger Bacon", MenuCategory::Food, 28),
    ("Spaghetti Carbonara", MenuCategory::Food, 26),
    ("Spaghetti Bolognese", MenuCategory::Food, 24),
    ("Caesar Salad", MenuCategory::Food, 18),
    ("Greek Salad", MenuCategory::Food, 16),
    ("Coca Cola", MenuCategory::Drink, 8),
    ("Sprite", MenuCategory::Drink, 8),
    ("Orange Juice", MenuCategory::Drink, 10),
    ("Apple Juice", MenuCategory::Drink, 10),
    ("Coffee", MenuCategory::Drink, 12),
    ("Tea", MenuCategory::Drink, 10),
    ("Beer", MenuCategory::Drink, 15),
    ("Wine", MenuCategory::Drink, 20),
];

/// The fixed seed menu, all entries available
pub fn seed_menu() -> Vec<MenuEntry> {
    SEED.iter()
        .map(|(name, category, price)| MenuEntry::new(*name, *category, Decimal::from(*price)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_menu_shape() {
        let menu = seed_menu();
        assert_eq!(menu.len(), 16);
        assert_eq!(
            menu.iter()
                .filter(|e| e.category == MenuCategory::Drink)
                .count(),
            8
        );
        assert!(menu.iter().all(|e| e.available && e.id.is_empty()));
    }
}
