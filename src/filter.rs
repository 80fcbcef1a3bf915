//! Catalog filtering.
//!
//! [`filter`] is a pure function of the catalog and the current
//! [`FilterCriteria`]. It is cheap enough to run on every keystroke.

use std::fmt;

use crate::catalog::{Category, ServiceRecord};

/// Search radius around the reference point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Radius {
    #[default]
    OneKm,
    TwoKm,
    FiveKm,
}

impl Radius {
    /// Parse the free-text radius field.
    ///
    /// Only the exact spellings `1km` and `2km` are recognized. Anything else,
    /// including other casing or surrounding spaces, selects the widest radius.
    pub fn from_input(input: &str) -> Self {
        match input {
            "1km" => Self::OneKm,
            "2km" => Self::TwoKm,
            _ => Self::FiveKm,
        }
    }

    pub const fn threshold_meters(self) -> u32 {
        match self {
            Self::OneKm => 1000,
            Self::TwoKm => 2000,
            Self::FiveKm => 5000,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::OneKm => "1km",
            Self::TwoKm => "2km",
            Self::FiveKm => "5km",
        }
    }
}

impl fmt::Display for Radius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The user's current filter selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    pub neighborhood_text: String,
    pub radius: Radius,
    pub category: Category,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            neighborhood_text: String::new(),
            radius: Radius::OneKm,
            category: Category::AtHome,
        }
    }
}

impl FilterCriteria {
    pub const fn toggle_category(&mut self) {
        self.category = self.category.toggle();
    }

    /// Whether a single record passes every constraint.
    pub fn matches(&self, record: &ServiceRecord) -> bool {
        record.category == self.category
            && self.matches_text(record)
            && record.distance_meters <= self.radius.threshold_meters()
    }

    fn matches_text(&self, record: &ServiceRecord) -> bool {
        self.neighborhood_text.is_empty()
            || record
                .description
                .to_lowercase()
                .contains(&self.neighborhood_text.to_lowercase())
    }
}

/// Records from `catalog` that satisfy `criteria`, in catalog order.
pub fn filter(catalog: &[ServiceRecord], criteria: &FilterCriteria) -> Vec<ServiceRecord> {
    catalog
        .iter()
        .filter(|record| criteria.matches(record))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::catalog;

    fn criteria(text: &str, radius: Radius, category: Category) -> FilterCriteria {
        FilterCriteria {
            neighborhood_text: text.to_string(),
            radius,
            category,
        }
    }

    fn all_criteria(text: &str) -> Vec<FilterCriteria> {
        let mut out = Vec::new();
        for radius in [Radius::OneKm, Radius::TwoKm, Radius::FiveKm] {
            for category in [Category::AtHome, Category::Sidewalk] {
                out.push(criteria(text, radius, category));
            }
        }
        out
    }

    #[test]
    fn test_sidewalk_within_one_km_keeps_catalog_order() {
        let result = filter(catalog(), &criteria("", Radius::OneKm, Category::Sidewalk));
        let distances: Vec<u32> = result.iter().map(|r| r.distance_meters).collect();
        assert_eq!(distances, vec![200, 800, 300]);
        let ids: Vec<&str> = result.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3", "4"]);
    }

    #[test]
    fn test_no_match_text_yields_empty() {
        for c in all_criteria("zzz-no-match") {
            assert!(filter(catalog(), &c).is_empty());
        }
    }

    #[test]
    fn test_text_match_is_case_insensitive() {
        for text in ["PODA", "árvores", "Limpeza", "ruA"] {
            for c in all_criteria(text) {
                for record in filter(catalog(), &c) {
                    assert!(
                        record
                            .description
                            .to_lowercase()
                            .contains(&text.to_lowercase())
                    );
                }
            }
        }
        let result = filter(catalog(), &criteria("PODA", Radius::OneKm, Category::Sidewalk));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "3");
    }

    #[test]
    fn test_every_result_respects_category_and_radius() {
        for text in ["", "de", "ção"] {
            for c in all_criteria(text) {
                for record in filter(catalog(), &c) {
                    assert_eq!(record.category, c.category);
                    assert!(record.distance_meters <= c.radius.threshold_meters());
                }
            }
        }
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        for c in all_criteria("") {
            assert_eq!(filter(catalog(), &c), filter(catalog(), &c));
        }
    }

    #[test]
    fn test_radius_below_every_distance_is_empty() {
        let near = vec![
            ServiceRecord::new("a", "A", Category::AtHome, "far away", 10, 1500),
            ServiceRecord::new("b", "B", Category::AtHome, "farther", 10, 4000),
        ];
        assert!(filter(&near, &criteria("", Radius::OneKm, Category::AtHome)).is_empty());
        assert_eq!(
            filter(&near, &criteria("", Radius::TwoKm, Category::AtHome)).len(),
            1
        );
    }

    #[test]
    fn test_radius_parsing_defaults_to_widest() {
        assert_eq!(Radius::from_input("1km"), Radius::OneKm);
        assert_eq!(Radius::from_input("2km"), Radius::TwoKm);
        assert_eq!(Radius::from_input(" 2KM "), Radius::FiveKm);
        assert_eq!(Radius::from_input(" 1km"), Radius::FiveKm);
        assert_eq!(Radius::from_input("5km"), Radius::FiveKm);
        assert_eq!(Radius::from_input("10km"), Radius::FiveKm);
        assert_eq!(Radius::from_input(""), Radius::FiveKm);
        assert_eq!(Radius::from_input("").threshold_meters(), 5000);
    }

    #[test]
    fn test_misspelled_radius_keeps_distant_records() {
        let records = vec![ServiceRecord::new(
            "a",
            "A",
            Category::AtHome,
            "a bit further",
            10,
            1500,
        )];
        let shouted = criteria("", Radius::from_input("1KM"), Category::AtHome);
        assert_eq!(shouted.radius.threshold_meters(), 5000);
        assert_eq!(filter(&records, &shouted).len(), 1);

        let exact = criteria("", Radius::from_input("1km"), Category::AtHome);
        assert!(filter(&records, &exact).is_empty());
    }

    #[test]
    fn test_toggle_twice_restores_criteria() {
        let original = criteria("moema", Radius::TwoKm, Category::Sidewalk);
        let mut toggled = original.clone();
        toggled.toggle_category();
        assert_eq!(toggled.category, Category::AtHome);
        toggled.toggle_category();
        assert_eq!(toggled, original);
    }
}
