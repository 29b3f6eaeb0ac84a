//! Stylist Session - orchestration layer for the virtual stylist
//!
//! Catalog + selection, custom swatch upload, generation job polling and
//! search-by-id, owned by a single [`StylistSession`].

pub mod catalog;
pub mod error;
pub mod generation;
pub mod preview;
pub mod search;
pub mod session;
pub mod swatch;

pub use catalog::CatalogState;
pub use error::SessionError;
pub use generation::{
    GenerateOutcome, GenerationOrchestrator, GenerationPhase, GenerationView, PollConfig,
};
pub use preview::{PreviewHandle, PreviewRegistry};
pub use search::{SearchHistory, SearchOutcome, search_color};
pub use session::{LoadOutcome, SessionView, StylistSession};
pub use swatch::{CustomSwatchView, SwatchCoordinator};
