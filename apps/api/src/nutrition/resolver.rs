//! Label → nutrition resolution.
//!
//! Classifier labels do not follow the table's casing or delimiters, so the
//! lookup falls through four tiers, first match wins:
//! 1. exact key
//! 2. case-insensitive key
//! 3. case-insensitive substring, in either direction
//! 4. `DEFAULT_RECORD`
//!
//! Tiers 2 and 3 scan in table insertion order. Tier 3 is coarse: a short key
//! such as `"Cake"` captures any longer label containing it, even when a more
//! specific entry (`"cheesecake"`) sits later in the table. The empty string is
//! a substring of every key, so `""` lands on the first entry.

use serde::Serialize;

use crate::nutrition::table::{reference_table, FoodEntry};
use crate::nutrition::{NutritionRecord, DEFAULT_RECORD};

/// Which tier produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Exact,
    CaseInsensitive,
    Substring,
    Default,
}

/// A resolved record plus how it was found.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Resolution {
    pub record: NutritionRecord,
    /// Table key that matched; `None` for the default record.
    pub matched_label: Option<&'static str>,
    pub tier: MatchTier,
}

impl Resolution {
    fn from_entry(entry: &FoodEntry, tier: MatchTier) -> Self {
        Self {
            record: entry.record,
            matched_label: Some(entry.label),
            tier,
        }
    }

    fn fallback() -> Self {
        Self {
            record: DEFAULT_RECORD,
            matched_label: None,
            tier: MatchTier::Default,
        }
    }
}

/// Resolves a classifier label to a nutrition record. Never fails.
pub fn resolve(label: &str) -> NutritionRecord {
    resolve_match(label).record
}

/// Same as [`resolve`], but also reports the matched key and tier.
pub fn resolve_match(label: &str) -> Resolution {
    let table = reference_table();

    if let Some(e) = table.iter().find(|e| e.label == label) {
        return Resolution::from_entry(e, MatchTier::Exact);
    }

    let needle = label.to_lowercase();

    if let Some(e) = table.iter().find(|e| e.label.to_lowercase() == needle) {
        return Resolution::from_entry(e, MatchTier::CaseInsensitive);
    }

    let substring_hit = table.iter().find(|e| {
        let key = e.label.to_lowercase();
        key.contains(&needle) || needle.contains(&key)
    });
    if let Some(e) = substring_hit {
        return Resolution::from_entry(e, MatchTier::Substring);
    }

    Resolution::fallback()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(calories: u32, protein: f64, carbs: f64, fat: f64) -> NutritionRecord {
        NutritionRecord {
            calories,
            protein,
            carbs,
            fat,
        }
    }

    #[test]
    fn test_every_table_key_resolves_to_itself() {
        for e in reference_table() {
            let r = resolve_match(e.label);
            assert_eq!(r.record, e.record, "record altered for {}", e.label);
            assert_eq!(r.matched_label, Some(e.label));
            assert_eq!(r.tier, MatchTier::Exact);
        }
    }

    #[test]
    fn test_case_insensitive_biriyani() {
        let expected = record(290, 12.0, 45.0, 8.0);
        for label in ["BIRIYANI", "biriyani", "Biriyani", "bIrIyAnI"] {
            assert_eq!(resolve(label), expected, "label {label}");
        }
        assert_eq!(resolve_match("BIRIYANI").tier, MatchTier::CaseInsensitive);
    }

    #[test]
    fn test_case_insensitive_keeps_inner_spacing() {
        let r = resolve_match("FISH BHUNA_MACH BHUNA");
        assert_eq!(r.tier, MatchTier::CaseInsensitive);
        assert_eq!(r.matched_label, Some("Fish Bhuna_Mach Bhuna"));
    }

    #[test]
    fn test_input_containing_key_matches_by_substring() {
        let r = resolve_match("pizza slice");
        assert_eq!(r.record, record(266, 11.0, 33.0, 10.0));
        assert_eq!(r.matched_label, Some("pizza"));
        assert_eq!(r.tier, MatchTier::Substring);
    }

    #[test]
    fn test_key_containing_input_matches_by_substring() {
        let r = resolve_match("hilsha");
        assert_eq!(r.matched_label, Some("Hilsha_Fish_Curry"));
        assert_eq!(r.tier, MatchTier::Substring);
    }

    /// Known approximation: the first inserted key that is a substring wins,
    /// so "cheesecake slice" lands on "Cake" rather than "cheesecake".
    #[test]
    fn test_substring_tie_break_is_first_inserted() {
        let r = resolve_match("cheesecake slice");
        assert_eq!(r.matched_label, Some("Cake"));
        assert_eq!(r.record, record(340, 4.0, 50.0, 15.0));
    }

    /// Known approximation: a short key swallows unrelated labels.
    #[test]
    fn test_short_key_captures_unrelated_label() {
        assert_eq!(resolve_match("matcha latte").matched_label, Some("Cha"));
    }

    #[test]
    fn test_unknown_label_gets_default() {
        let r = resolve_match("totally_unknown_dish_xyz");
        assert_eq!(r.record, record(200, 8.0, 30.0, 6.0));
        assert_eq!(r.matched_label, None);
        assert_eq!(r.tier, MatchTier::Default);
    }

    /// Known approximation: blank input is a substring of some key, so it
    /// resolves to the first such key instead of the default record.
    #[test]
    fn test_blank_label_matches_first_key_by_substring() {
        let r = resolve_match("");
        assert_eq!(r.matched_label, Some("Biriyani"));
        assert_eq!(r.tier, MatchTier::Substring);

        let r = resolve_match(" ");
        assert_eq!(r.matched_label, Some("Fish Bhuna_Mach Bhuna"));
        assert_eq!(r.tier, MatchTier::Substring);

        // No key holds three consecutive spaces.
        assert_eq!(resolve_match("   ").record, DEFAULT_RECORD);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        for label in ["Momos", "MOMOS", "momos platter", "nothing like it", ""] {
            assert_eq!(resolve(label), resolve(label));
        }
    }

    fn flip_case(s: &str) -> String {
        s.chars()
            .flat_map(|c| {
                if c.is_uppercase() {
                    c.to_lowercase().collect::<Vec<_>>()
                } else {
                    c.to_uppercase().collect::<Vec<_>>()
                }
            })
            .collect()
    }

    fn generated_labels() -> Vec<String> {
        let mut labels: Vec<String> = [
            "",
            " ",
            "\t\n",
            "寿司",
            "crème brûlée",
            "\u{1F355}\u{1F35C}",
            "İstanbul kebap",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        for e in reference_table() {
            labels.push(flip_case(e.label));
            labels.push(format!("{} platter", e.label));
            labels.push(format!("spicy {}", e.label));
            labels.push(format!("ÄÖ{}ü", e.label.to_uppercase()));
            let chars: Vec<char> = e.label.chars().collect();
            for n in 0..chars.len() {
                labels.push(chars[..n].iter().collect());
            }
        }
        labels
    }

    #[test]
    fn test_generated_labels_resolve_to_known_records() {
        let known: Vec<NutritionRecord> = reference_table()
            .iter()
            .map(|e| e.record)
            .chain(std::iter::once(DEFAULT_RECORD))
            .collect();

        for label in generated_labels() {
            let first = resolve_match(&label);
            let r = first.record;
            assert!(
                r.protein >= 0.0 && r.carbs >= 0.0 && r.fat >= 0.0,
                "negative field for {label:?}"
            );
            assert!(known.contains(&r), "unexpected record for {label:?}");
            assert_eq!(resolve_match(&label), first, "not repeatable for {label:?}");
            assert_eq!(first.matched_label.is_none(), first.tier == MatchTier::Default);
        }
    }

    #[test]
    fn test_flipped_case_keys_resolve_case_insensitively() {
        for e in reference_table() {
            let r = resolve_match(&flip_case(e.label));
            assert_eq!(r.record, e.record, "label {}", e.label);
        }
    }

    #[test]
    fn test_records_always_non_negative() {
        for label in ["steak", "Poached_Egg", "yogurt cup", "???", "\u{1F355}", "a"] {
            let r = resolve(label);
            assert!(r.protein >= 0.0 && r.carbs >= 0.0 && r.fat >= 0.0, "label {label}");
        }
    }
}
