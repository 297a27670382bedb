//! Reference nutrition table for every label the food classifier can emit.
//!
//! Keys are kept exactly as the classifier's training classes spell them,
//! including the mixed casing, underscores and stray spaces. The resolver
//! depends on this order: earlier entries win ties.

use crate::nutrition::NutritionRecord;

/// One row of the reference table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoodEntry {
    pub label: &'static str,
    pub record: NutritionRecord,
}

const fn entry(label: &'static str, calories: u32, protein: f64, carbs: f64, fat: f64) -> FoodEntry {
    FoodEntry {
        label,
        record: NutritionRecord {
            calories,
            protein,
            carbs,
            fat,
        },
    }
}

/// Nutrition per serving (approx. 100g), in insertion order.
static REFERENCE_TABLE: [FoodEntry; 49] = [
    entry("Biriyani", 290, 12.0, 45.0, 8.0),
    entry("Boiled_egg", 68, 6.0, 0.5, 5.0),
    entry("Buter_Dal", 100, 7.0, 18.0, 0.5),
    entry("Cake", 340, 4.0, 50.0, 15.0),
    entry("Cha", 40, 0.5, 8.0, 1.0),
    entry("Chicken_curry", 190, 18.0, 8.0, 10.0),
    entry("Chicken_wings", 290, 26.0, 0.0, 20.0),
    entry("Chocolate_cake", 350, 5.0, 48.0, 17.0),
    entry("Chow_mein", 200, 8.0, 28.0, 6.0),
    entry("Crab_Dish_Kakra", 97, 19.0, 0.0, 1.5),
    entry("Fish Bhuna_Mach Bhuna", 210, 22.0, 5.0, 12.0),
    entry("French_fries", 312, 4.0, 41.0, 15.0),
    entry("Fried fish_Mach Bhaja", 200, 20.0, 8.0, 11.0),
    entry("Fried_rice", 250, 6.0, 38.0, 8.0),
    entry("Hilsha_Fish_Curry", 180, 20.0, 4.0, 10.0),
    entry("Kacchi", 300, 14.0, 42.0, 10.0),
    entry("Khichuri", 170, 8.0, 30.0, 3.0),
    entry("Lentil fritters_Dal Puri", 300, 8.0, 35.0, 15.0),
    entry("Lentil soup_Dal", 120, 9.0, 20.0, 0.5),
    entry("Meat Curry_Gosht Bhuna", 250, 20.0, 8.0, 16.0),
    entry("Misti", 320, 3.0, 65.0, 7.0),
    entry("Momos", 120, 6.0, 18.0, 3.0),
    entry("Naan Ruti", 262, 9.0, 45.0, 5.0),
    entry("Rosogolla", 125, 2.0, 28.0, 1.0),
    entry("Salad", 50, 2.0, 10.0, 0.5),
    entry("Sandwich", 250, 10.0, 35.0, 8.0),
    entry("Shik_kabab", 240, 22.0, 4.0, 16.0),
    entry("Singgara", 250, 5.0, 30.0, 12.0),
    entry("Vegetable fritters _Beguni", 280, 4.0, 35.0, 14.0),
    entry("Vorta", 120, 3.0, 15.0, 6.0),
    entry("bakorkhani", 400, 8.0, 70.0, 10.0),
    entry("cheesecake", 321, 6.0, 32.0, 19.0),
    entry("cup_cakes", 305, 3.0, 42.0, 14.0),
    entry("fuchka", 80, 2.0, 15.0, 2.0),
    entry("golap Jam", 150, 1.0, 35.0, 1.0),
    entry("haleem", 260, 18.0, 25.0, 12.0),
    entry("ice_cream", 207, 4.0, 24.0, 11.0),
    entry("jilapi", 310, 2.0, 70.0, 3.0),
    entry("kebab_Gosht Kebab", 250, 20.0, 5.0, 17.0),
    entry("morog_polao", 240, 12.0, 35.0, 7.0),
    entry("nehari", 210, 16.0, 8.0, 13.0),
    entry("omelette", 150, 12.0, 1.0, 11.0),
    entry("pakora", 315, 6.0, 38.0, 16.0),
    entry("pizza", 266, 11.0, 33.0, 10.0),
    entry("poached_egg", 71, 6.0, 0.4, 5.0),
    entry("porota", 330, 6.0, 45.0, 15.0),
    entry("roshmalai", 230, 5.0, 35.0, 9.0),
    entry("steak", 271, 26.0, 0.0, 18.0),
    entry("yogurt", 59, 3.5, 4.7, 3.3),
];

/// Read-only view of the reference table in insertion order.
pub fn reference_table() -> &'static [FoodEntry] {
    &REFERENCE_TABLE
}
