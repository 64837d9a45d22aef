//! Payroll calculations for the press ledger.
//!
//! This module computes what an employee is owed for a month: base pay by
//! salary type, minus outstanding advances, minus the month's deductions.
//! It also assembles the monthly salary report for the active roster.
//! Everything here is a pure function of a record snapshot.

mod advances;
mod balance;
mod base_pay;
mod deductions;
mod records;
mod report;

pub use advances::{AdvanceCutoff, OutstandingAdvancesResult, sum_outstanding_advances};
pub use balance::{BalanceBreakdown, balance_breakdown, compute_net_balance};
pub use base_pay::{BasePayResult, calculate_base_pay};
pub use deductions::{MonthDeductionsResult, sum_month_deductions};
pub use records::PayrollRecords;
pub use report::{SalaryReport, SalaryReportLine, build_salary_report};
