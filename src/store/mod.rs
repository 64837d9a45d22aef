//! Record storage for the press ledger.
//!
//! The [`Ledger`] owns an in-memory [`Snapshot`] of every collection and
//! writes it through a [`SnapshotStore`] after each change.
//!
//! # Example
//!
//! ```
//! use press_ledger::models::NewDepartment;
//! use press_ledger::store::Ledger;
//!
//! let mut ledger = Ledger::in_memory();
//! let dept = ledger
//!     .add_department(NewDepartment {
//!         name: "Binding".to_string(),
//!         description: String::new(),
//!     })
//!     .unwrap();
//! assert_eq!(ledger.departments()[0].id, dept.id);
//! ```

mod backend;
mod ledger;
mod snapshot;

pub use backend::{JsonFileStore, MemoryStore, SnapshotStore};
pub use ledger::Ledger;
pub use snapshot::Snapshot;
