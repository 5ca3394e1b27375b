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

//! Customer balances.
//!
//! # Example
//!
//! ```
//! use loyalty_points::{Customer, CustomerId};
//!
//! let customer = Customer::new(CustomerId::from("cust-042"));
//! assert_eq!(customer.points, 0);
//! assert!(customer.name.is_none());
//! ```

use crate::LedgerError;
use crate::base::{CustomerId, Points};
use serde::{Deserialize, Serialize};

/// Customer profile and point balance.
///
/// Values handed out by the ledger are snapshots; mutating one does not
/// affect the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub points: Points,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Customer {
    /// Creates a customer with a zero balance and no profile details.
    pub fn new(id: CustomerId) -> Self {
        Self {
            id,
            points: 0,
            name: None,
            email: None,
        }
    }

    pub fn with_points(mut self, points: Points) -> Self {
        self.points = points;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Ledger-side state for one customer.
///
/// `opening_points` is the balance the customer was registered with; the
/// current balance always equals it plus the signed sum of the customer's
/// log entries.
#[derive(Debug)]
pub(crate) struct CustomerRecord {
    customer: Customer,
    opening_points: Points,
}

impl CustomerRecord {
    pub(crate) fn new(id: CustomerId) -> Self {
        Self::opened(Customer::new(id))
    }

    pub(crate) fn opened(customer: Customer) -> Self {
        let opening_points = customer.points;
        let record = Self {
            customer,
            opening_points,
        };
        record.assert_invariants();
        record
    }

    fn assert_invariants(&self) {
        debug_assert!(
            self.customer.points >= 0,
            "Invariant violated: balance went negative for {}: {}",
            self.customer.id,
            self.customer.points
        );
    }

    pub(crate) fn customer(&self) -> &Customer {
        &self.customer
    }

    pub(crate) fn opening_points(&self) -> Points {
        self.opening_points
    }

    /// Increases the balance.
    pub(crate) fn earn(&mut self, points: Points) -> Result<(), LedgerError> {
        if points <= 0 {
            return Err(LedgerError::InvalidPoints);
        }
        self.customer.points = self
            .customer
            .points
            .checked_add(points)
            .ok_or(LedgerError::BalanceOverflow)?;
        self.assert_invariants();
        Ok(())
    }

    /// Decreases the balance.
    pub(crate) fn redeem(&mut self, points: Points) -> Result<(), LedgerError> {
        if points <= 0 {
            return Err(LedgerError::InvalidPoints);
        }
        if self.customer.points < points {
            return Err(LedgerError::InsufficientPoints);
        }
        self.customer.points -= points;
        self.assert_invariants();
        Ok(())
    }
}
