//! Local preview references
//!
//! Stand-ins for browser object URLs: a [`PreviewRegistry`] hands out
//! `blob:` references for user-chosen files and tracks which are still live.
//! Each reference is owned by exactly one [`PreviewHandle`], which releases
//! it once, either explicitly or on drop.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Live {
    refs: HashSet<String>,
}

/// Issues and tracks local preview references
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    live: Arc<Mutex<Live>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Live> {
        self.live.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Mint a fresh reference for `file_name`
    pub fn acquire(&self, file_name: &str) -> PreviewHandle {
        let reference = format!("blob:stylist/{}", uuid::Uuid::new_v4());
        self.lock().refs.insert(reference.clone());
        tracing::trace!(%reference, file_name, "Preview acquired");
        PreviewHandle {
            reference: Some(reference),
            registry: self.clone(),
        }
    }

    pub fn is_live(&self, reference: &str) -> bool {
        self.lock().refs.contains(reference)
    }

    /// Number of references not yet released
    pub fn live_count(&self) -> usize {
        self.lock().refs.len()
    }

    fn revoke(&self, reference: &str) {
        if self.lock().refs.remove(reference) {
            tracing::trace!(%reference, "Preview released");
        }
    }
}

/// Exclusive owner of one preview reference
#[derive(Debug)]
pub struct PreviewHandle {
    reference: Option<String>,
    registry: PreviewRegistry,
}

impl PreviewHandle {
    /// The reference, or `None` once released
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn is_released(&self) -> bool {
        self.reference.is_none()
    }

    /// Release the reference. Calling this again does nothing.
    pub fn release(&mut self) {
        if let Some(reference) = self.reference.take() {
            self.registry.revoke(&reference);
        }
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_is_idempotent() {
        let registry = PreviewRegistry::new();
        let mut handle = registry.acquire("tela.png");
        let reference = handle.reference().unwrap().to_string();
        assert!(reference.starts_with("blob:"));
        assert!(registry.is_live(&reference));

        handle.release();
        handle.release();
        assert!(handle.is_released());
        assert!(handle.reference().is_none());
        assert!(!registry.is_live(&reference));
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn drop_releases() {
        let registry = PreviewRegistry::new();
        {
            let _a = registry.acquire("a.png");
            let _b = registry.acquire("b.png");
            assert_eq!(registry.live_count(), 2);
        }
        assert_eq!(registry.live_count(), 0);
    }
}
