//! Application state for the press ledger API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::store::Ledger;

/// Shared application state.
///
/// Holds the one ledger every handler works against. Reads take the read
/// lock; mutations take the write lock.
#[derive(Clone)]
pub struct AppState {
    ledger: Arc<RwLock<Ledger>>,
}

impl AppState {
    /// Creates a new application state around `ledger`.
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger: Arc::new(RwLock::new(ledger)),
        }
    }

    /// Returns the shared ledger lock.
    pub fn ledger(&self) -> &RwLock<Ledger> {
        &self.ledger
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone + Send + Sync + 'static>() {}
        assert_clone::<AppState>();
    }

    #[tokio::test]
    async fn test_clones_share_one_ledger() {
        let state = AppState::new(Ledger::in_memory());
        let other = state.clone();

        other
            .ledger()
            .write()
            .await
            .add_department(crate::models::NewDepartment {
                name: "Design".to_string(),
                description: String::new(),
            })
            .unwrap();

        assert_eq!(state.ledger().read().await.departments().len(), 1);
    }
}
