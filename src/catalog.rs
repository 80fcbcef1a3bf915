//! The fixed service catalog.
//!
//! Every record shown by the app comes from [`catalog()`]. The list is built
//! once and never mutated.

use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// Kind of service: performed inside the customer's home or out on the street.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    AtHome,
    Sidewalk,
}

impl Category {
    /// The other category. Applying it twice yields the original value.
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::AtHome => Self::Sidewalk,
            Self::Sidewalk => Self::AtHome,
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::AtHome => "At home",
            Self::Sidewalk => "Sidewalk",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "athome" | "at-home" | "home" => Ok(Self::AtHome),
            "sidewalk" | "street" => Ok(Self::Sidewalk),
            other => Err(format!("Unknown category: {other}")),
        }
    }
}

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// A bookable local service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub description: String,
    pub price: u32,
    pub distance_meters: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinate: Option<Coordinate>,
}

impl ServiceRecord {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: Category,
        description: impl Into<String>,
        price: u32,
        distance_meters: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            description: description.into(),
            price,
            distance_meters,
            coordinate: None,
        }
    }

    #[must_use]
    pub const fn at(mut self, latitude: f64, longitude: f64) -> Self {
        self.coordinate = Some(Coordinate::new(latitude, longitude));
        self
    }
}

/// Point the catalog distances are measured from (Moema, São Paulo).
pub const REFERENCE_POINT: Coordinate = Coordinate::new(-23.6010, -46.6650);

static CATALOG: LazyLock<Vec<ServiceRecord>> = LazyLock::new(|| {
    vec![
        ServiceRecord::new(
            "1",
            "Encanador Domicílio",
            Category::AtHome,
            "Reparo em vazamentos internos",
            150,
            500,
        )
        .at(-23.5975, -46.6621),
        ServiceRecord::new(
            "2",
            "Varredor Calçada",
            Category::Sidewalk,
            "Limpeza de rua pós-chuva",
            80,
            200,
        )
        .at(-23.6002, -46.6664),
        ServiceRecord::new(
            "3",
            "Jardineiro Calçada",
            Category::Sidewalk,
            "Poda de árvores urbanas",
            120,
            800,
        )
        .at(-23.6078, -46.6688),
        ServiceRecord::new(
            "4",
            "Pintor de Muros",
            Category::Sidewalk,
            "Revitalização de fachadas externas",
            250,
            300,
        )
        .at(-23.6035, -46.6631),
        ServiceRecord::new(
            "5",
            "Eletricista Domicílio",
            Category::AtHome,
            "Instalação de tomadas",
            200,
            600,
        )
        .at(-23.5968, -46.6689),
    ]
});

/// The process-wide, read-only service catalog.
pub fn catalog() -> &'static [ServiceRecord] {
    &CATALOG
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_catalog_ids_are_unique() {
        let ids: HashSet<&str> = catalog().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), catalog().len());
    }

    #[test]
    fn test_catalog_layout() {
        let distances: Vec<u32> = catalog().iter().map(|r| r.distance_meters).collect();
        assert_eq!(distances, vec![500, 200, 800, 300, 600]);

        let categories: Vec<Category> = catalog().iter().map(|r| r.category).collect();
        assert_eq!(
            categories,
            vec![
                Category::AtHome,
                Category::Sidewalk,
                Category::Sidewalk,
                Category::Sidewalk,
                Category::AtHome,
            ]
        );
        assert!(catalog().iter().all(|r| r.coordinate.is_some()));
    }

    #[test]
    fn test_category_toggle() {
        assert_eq!(Category::AtHome.toggle(), Category::Sidewalk);
        assert_eq!(Category::Sidewalk.toggle(), Category::AtHome);
        assert_eq!(Category::AtHome.toggle().toggle(), Category::AtHome);
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("atHome".parse::<Category>().unwrap(), Category::AtHome);
        assert_eq!("SIDEWALK".parse::<Category>().unwrap(), Category::Sidewalk);
        assert!("garage".parse::<Category>().is_err());
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let json = serde_json::to_value(&catalog()[1]).unwrap();
        assert_eq!(json["category"], "sidewalk");
        assert_eq!(json["distanceMeters"], 200);
        assert_eq!(json["coordinate"]["latitude"], -23.6002);
    }
}
