//! Catalog Model

use serde::{Deserialize, Serialize};

use super::selection::Selection;

/// Compare two catalog ids ignoring case, for any script
pub fn same_id(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// Publication status of a family or color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FamilyStatus {
    #[default]
    Active,
    Inactive,
}

impl FamilyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FamilyStatus::Active => "active",
            FamilyStatus::Inactive => "inactive",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, FamilyStatus::Active)
    }
}

impl std::fmt::Display for FamilyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FamilyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(FamilyStatus::Active),
            "inactive" => Ok(FamilyStatus::Inactive),
            other => Err(format!("unknown status '{other}', expected active|inactive")),
        }
    }
}

/// A selectable fabric color
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub color_id: String,
    pub name: String,
    pub hex: String,
    /// Remote swatch image, not owned by the client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swatch_url: Option<String>,
}

/// A named grouping of colors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Family {
    pub family_id: String,
    pub display_name: String,
    #[serde(default)]
    pub status: FamilyStatus,
    #[serde(default)]
    pub sort: i32,
    #[serde(default)]
    pub colors: Vec<Color>,
}

impl Family {
    /// Find a color of this family by exact id
    pub fn color(&self, color_id: &str) -> Option<&Color> {
        self.colors.iter().find(|c| c.color_id == color_id)
    }

    pub fn contains_color(&self, color_id: &str) -> bool {
        self.color(color_id).is_some()
    }

    pub fn first_color(&self) -> Option<&Color> {
        self.colors.first()
    }
}

/// `GET /catalog` response body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub families: Vec<Family>,
}

impl Catalog {
    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    pub fn family(&self, family_id: &str) -> Option<&Family> {
        self.families.iter().find(|f| f.family_id == family_id)
    }

    /// First active family, falling back to the first family
    pub fn default_family(&self) -> Option<&Family> {
        self.families
            .iter()
            .find(|f| f.status.is_active())
            .or_else(|| self.families.first())
    }

    /// Selection derived right after the catalog loads.
    ///
    /// Empty when the catalog is empty; the color part is empty when the
    /// default family has no colors.
    pub fn default_selection(&self) -> Selection {
        match self.default_family() {
            Some(family) => Selection::new(
                family.family_id.clone(),
                family
                    .first_color()
                    .map(|c| c.color_id.clone())
                    .unwrap_or_default(),
            ),
            None => Selection::default(),
        }
    }

    /// Locate a color by id, ignoring case, across every family.
    ///
    /// When two families share an id the last one wins, matching how the
    /// search index is built.
    pub fn locate_color(&self, color_id: &str) -> Option<(&Family, &Color)> {
        let needle = color_id.trim();
        if needle.is_empty() {
            return None;
        }
        self.families
            .iter()
            .flat_map(|f| f.colors.iter().map(move |c| (f, c)))
            .filter(|(_, c)| same_id(&c.color_id, needle))
            .last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color(id: &str) -> Color {
        Color {
            color_id: id.to_string(),
            name: id.to_uppercase(),
            hex: "#000000".to_string(),
            swatch_url: None,
        }
    }

    fn family(id: &str, status: FamilyStatus, colors: &[&str]) -> Family {
        Family {
            family_id: id.to_string(),
            display_name: id.to_string(),
            status,
            sort: 0,
            colors: colors.iter().map(|c| color(c)).collect(),
        }
    }

    #[test]
    fn default_family_prefers_first_active() {
        let catalog = Catalog {
            families: vec![
                family("linen", FamilyStatus::Inactive, &["linen-001"]),
                family("navy", FamilyStatus::Active, &["navy-001", "navy-002"]),
                family("grey", FamilyStatus::Active, &["grey-001"]),
            ],
        };
        let selection = catalog.default_selection();
        assert_eq!(selection.family_id, "navy");
        assert_eq!(selection.color_id, "navy-001");
    }

    #[test]
    fn default_family_falls_back_to_first() {
        let catalog = Catalog {
            families: vec![
                family("linen", FamilyStatus::Inactive, &[]),
                family("wool", FamilyStatus::Inactive, &["wool-001"]),
            ],
        };
        let selection = catalog.default_selection();
        assert_eq!(selection.family_id, "linen");
        assert_eq!(selection.color_id, "");
    }

    #[test]
    fn empty_catalog_has_empty_selection() {
        assert_eq!(Catalog::default().default_selection(), Selection::default());
    }

    #[test]
    fn locate_color_is_case_insensitive() {
        let catalog = Catalog {
            families: vec![family("navy", FamilyStatus::Active, &["navy-001"])],
        };
        let (fam, col) = catalog.locate_color("  NAVY-001 ").unwrap();
        assert_eq!(fam.family_id, "navy");
        assert_eq!(col.color_id, "navy-001");
        assert!(catalog.locate_color("").is_none());
        assert!(catalog.locate_color("unknown-999").is_none());
    }

    #[test]
    fn locate_color_folds_non_ascii_case() {
        let catalog = Catalog {
            families: vec![family("azul", FamilyStatus::Active, &["marino-001", "añil-001"])],
        };
        let (fam, col) = catalog.locate_color("AÑIL-001").unwrap();
        assert_eq!(fam.family_id, "azul");
        assert_eq!(col.color_id, "añil-001");
        assert!(same_id("Ñandú-7", "ñANDÚ-7"));
        assert!(!same_id("añil-001", "anil-001"));
    }

    #[test]
    fn duplicate_color_id_resolves_to_last_family() {
        let catalog = Catalog {
            families: vec![
                family("navy", FamilyStatus::Active, &["shared-01", "navy-001"]),
                family("grey", FamilyStatus::Active, &["grey-001", "SHARED-01"]),
            ],
        };
        let (fam, col) = catalog.locate_color("shared-01").unwrap();
        assert_eq!(fam.family_id, "grey");
        assert_eq!(col.color_id, "SHARED-01");
    }

    #[test]
    fn catalog_deserializes_with_missing_optionals() {
        let json = r##"{"families":[{"family_id":"navy","display_name":"Navy","status":"active","sort":1,
            "colors":[{"color_id":"navy-001","name":"Navy","hex":"#002244"}]}]}"##;
        let catalog: Catalog = serde_json::from_str(json).unwrap();
        assert_eq!(catalog.families[0].colors[0].swatch_url, None);
        assert!(catalog.families[0].status.is_active());
    }
}
