//! Catalog state holder
//!
//! Holds the catalog fetched once per session plus the current
//! family/color selection, and keeps the selection consistent with it.

use shared::models::{Catalog, Color, Family, Selection};
use stylist_client::ClientError;

use crate::error::SessionError;

/// Catalog + selection. Pure state; the session performs the fetch.
#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    catalog: Catalog,
    selection: Selection,
    load_started: bool,
    loading: bool,
    error: Option<String>,
}

impl CatalogState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the one-time fetch as started. Returns `false` if it already was.
    pub fn begin_load(&mut self) -> bool {
        if self.load_started {
            return false;
        }
        self.load_started = true;
        self.loading = true;
        true
    }

    /// Store the fetch result and derive the default selection.
    ///
    /// On failure the catalog stays empty and the error is kept for display.
    pub fn finish_load(
        &mut self,
        result: Result<Catalog, ClientError>,
    ) -> Result<(), SessionError> {
        self.loading = false;
        match result {
            Ok(catalog) => {
                self.selection = catalog.default_selection();
                self.catalog = catalog;
                self.error = None;
                tracing::info!(
                    families = self.catalog.families.len(),
                    family_id = %self.selection.family_id,
                    color_id = %self.selection.color_id,
                    "Catalog loaded"
                );
                Ok(())
            }
            Err(e) => {
                let err = SessionError::CatalogLoad(e);
                tracing::error!(error = %err, "Catalog load failed");
                self.catalog = Catalog::default();
                self.selection = Selection::default();
                self.error = Some(err.user_message());
                Err(err)
            }
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn current_family(&self) -> Option<&Family> {
        self.catalog.family(&self.selection.family_id)
    }

    pub fn current_color(&self) -> Option<&Color> {
        self.current_family()
            .and_then(|f| f.color(&self.selection.color_id))
    }

    /// Switch family. The color is kept when the new family has it, otherwise
    /// it resets to the family's first color (empty for an unknown or colorless family).
    pub fn select_family(&mut self, family_id: &str) {
        self.selection.family_id = family_id.to_string();
        let next_color = match self.catalog.family(family_id) {
            Some(family) if family.contains_color(&self.selection.color_id) => {
                self.selection.color_id.clone()
            }
            Some(family) => family
                .first_color()
                .map(|c| c.color_id.clone())
                .unwrap_or_default(),
            None => String::new(),
        };
        self.selection.color_id = next_color;
    }

    /// Switch color within the current family. Returns `false` (and changes
    /// nothing) when the color is not part of it.
    pub fn select_color(&mut self, color_id: &str) -> bool {
        let belongs = self
            .current_family()
            .is_some_and(|f| f.contains_color(color_id));
        if belongs {
            self.selection.color_id = color_id.to_string();
        } else {
            tracing::debug!(
                family_id = %self.selection.family_id,
                color_id,
                "Ignoring color outside the current family"
            );
        }
        belongs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::FamilyStatus;

    fn family(id: &str, status: FamilyStatus, colors: &[&str]) -> Family {
        Family {
            family_id: id.into(),
            display_name: id.into(),
            status,
            sort: 0,
            colors: colors
                .iter()
                .map(|c| Color {
                    color_id: (*c).into(),
                    name: (*c).into(),
                    hex: "#000000".into(),
                    swatch_url: None,
                })
                .collect(),
        }
    }

    fn loaded() -> CatalogState {
        let mut state = CatalogState::new();
        assert!(state.begin_load());
        state
            .finish_load(Ok(Catalog {
                families: vec![
                    family("navy", FamilyStatus::Active, &["navy-001", "shared-01"]),
                    family("grey", FamilyStatus::Active, &["grey-001", "shared-01"]),
                    family("empty", FamilyStatus::Inactive, &[]),
                ],
            }))
            .unwrap();
        state
    }

    #[test]
    fn load_happens_once() {
        let mut state = loaded();
        assert!(!state.begin_load());
        assert!(!state.is_loading());
        assert_eq!(state.selection(), &Selection::new("navy", "navy-001"));
    }

    #[test]
    fn failed_load_keeps_empty_catalog_and_message() {
        let mut state = CatalogState::new();
        state.begin_load();
        assert!(state.finish_load(Err(ClientError::Timeout)).is_err());
        assert!(state.catalog().is_empty());
        assert_eq!(state.error(), Some(crate::error::MSG_CATALOG_LOAD));
        assert_eq!(state.selection(), &Selection::default());
        assert!(!state.begin_load());
    }

    #[test]
    fn family_switch_keeps_shared_color() {
        let mut state = loaded();
        assert!(state.select_color("shared-01"));
        state.select_family("grey");
        assert_eq!(state.selection(), &Selection::new("grey", "shared-01"));
    }

    #[test]
    fn family_switch_resets_to_first_color() {
        let mut state = loaded();
        state.select_family("grey");
        assert_eq!(state.selection().color_id, "grey-001");

        state.select_family("empty");
        assert_eq!(state.selection(), &Selection::new("empty", ""));

        state.select_family("nope");
        assert_eq!(state.selection(), &Selection::new("nope", ""));
        assert!(state.current_family().is_none());
    }

    #[test]
    fn color_outside_family_is_rejected() {
        let mut state = loaded();
        assert!(!state.select_color("grey-001"));
        assert_eq!(state.selection().color_id, "navy-001");
        assert_eq!(state.current_color().unwrap().color_id, "navy-001");
    }

    #[test]
    fn family_switch_never_leaves_foreign_color() {
        let mut state = loaded();
        let families: Vec<String> = state
            .catalog()
            .families
            .iter()
            .map(|f| f.family_id.clone())
            .collect();
        for from in &families {
            for to in &families {
                state.select_family(from);
                state.select_family(to);
                let color = &state.selection().color_id;
                let fam = state.current_family().unwrap();
                assert!(color.is_empty() || fam.contains_color(color));
                if !fam.colors.is_empty() {
                    assert!(!color.is_empty());
                }
            }
        }
    }
}
