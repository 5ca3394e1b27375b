// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! # Loyalty Points
//!
//! This library provides an in-memory loyalty points ledger: customers earn
//! points, redeem them for rewards, and look up their balance. Every balance
//! change is recorded in an append-only transaction log.
//!
//! ## Core Components
//!
//! - [`Ledger`]: Authoritative balances plus the transaction log
//! - [`Customer`]: Customer profile and point balance
//! - [`Transaction`]: Immutable record of one earn or redeem
//! - [`TransactionRecorder`]: Mints unique transaction IDs
//! - [`LedgerError`]: Error types for rejected operations
//! - [`api`]: HTTP routes over the ledger
//!
//! ## Example
//!
//! ```
//! use loyalty_points::{CustomerId, Ledger, LedgerError, TransactionKind};
//!
//! let ledger = Ledger::new();
//! let alice = CustomerId::from("alice");
//!
//! // First credit creates the customer
//! let (customer, tx) = ledger.credit(&alice, 100, "signup bonus").unwrap();
//! assert_eq!(customer.points, 100);
//! assert_eq!(tx.kind, TransactionKind::Earn);
//!
//! // Redemptions cannot overdraw
//! assert_eq!(
//!     ledger.debit(&alice, 500, "espresso machine"),
//!     Err(LedgerError::InsufficientPoints)
//! );
//!
//! let (customer, _) = ledger.debit(&alice, 40, "coffee").unwrap();
//! assert_eq!(customer.points, 60);
//! ```
//!
//! ## Thread Safety
//!
//! The ledger guards customers and log with one read/write lock. Lookups run
//! in parallel; credits and debits are serialized.

pub mod api;
mod base;
pub mod config;
mod customer;
pub mod error;
mod ledger;
mod recorder;
pub mod seed;
mod transaction;
mod transaction_log;

pub use base::{CustomerId, Points, TransactionId};
pub use customer::Customer;
pub use error::LedgerError;
pub use ledger::Ledger;
pub use recorder::TransactionRecorder;
pub use transaction::{Transaction, TransactionKind};
pub use transaction_log::TransactionLog;
