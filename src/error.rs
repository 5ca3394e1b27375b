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

//! Error types for ledger operations.

use thiserror::Error;

/// Ledger operation errors.
///
/// Every variant is an expected, recoverable outcome. A failed operation
/// never leaves a partially applied mutation behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Point amount is zero or negative
    #[error("points must be positive")]
    InvalidPoints,

    /// Credit would overflow the balance
    #[error("points balance overflow")]
    BalanceOverflow,

    /// No customer with the given ID
    #[error("customer not found")]
    CustomerNotFound,

    /// Redemption exceeds the current balance
    #[error("insufficient points")]
    InsufficientPoints,

    /// Customer is already registered
    #[error("customer already exists")]
    DuplicateCustomer,
}

impl LedgerError {
    /// Whether the error stems from the request's point amount rather than
    /// from ledger state.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidPoints | Self::BalanceOverflow)
    }
}
