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

//! Transaction records.
//!
//! A [`Transaction`] is the immutable record of one balance mutation. The
//! point amount is always a positive magnitude; its sign comes from the
//! [`TransactionKind`].

use crate::base::{CustomerId, Points, TransactionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Points credited to the customer.
    Earn,
    /// Points debited in exchange for a reward.
    Redeem,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    pub id: TransactionId,
    pub customer_id: CustomerId,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub points: Points,
    /// Accrual reason for earns, reward label for redemptions.
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    /// Returns the balance delta this transaction applied.
    pub fn signed_points(&self) -> Points {
        match self.kind {
            TransactionKind::Earn => self.points,
            TransactionKind::Redeem => -self.points,
        }
    }
}
