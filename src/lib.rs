//! Staff and payroll ledger for a small printing press.
//!
//! This crate keeps employees, departments, tasks, work logs, attendance,
//! salary advances and deductions, and computes each employee's net monthly
//! balance: base pay minus outstanding advances minus the month's
//! deductions. Records live in a local-first [`store::Ledger`] persisted to
//! memory or a JSON file, and are served over a JSON/HTTP API.

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod payroll;
pub mod store;
