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

//! Transaction record construction.
//!
//! The recorder is the only place that mints [`TransactionId`]s. Identifiers
//! have the form `tx-<unix-nanos>-<sequence>`; the sequence is a process-wide
//! atomic counter, so two records minted within the same clock tick still get
//! distinct identifiers.

use crate::base::{CustomerId, Points, TransactionId};
use crate::transaction::{Transaction, TransactionKind};
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct TransactionRecorder {
    sequence: AtomicU64,
}

impl TransactionRecorder {
    pub fn new() -> Self {
        Self {
            sequence: AtomicU64::new(0),
        }
    }

    /// Builds the immutable record for one balance mutation.
    pub fn record(
        &self,
        customer_id: CustomerId,
        kind: TransactionKind,
        points: Points,
        reason: String,
    ) -> Transaction {
        let timestamp = Utc::now();
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let nanos = timestamp.timestamp_nanos_opt().unwrap_or_default();

        Transaction {
            id: TransactionId(format!("tx-{nanos}-{sequence}")),
            customer_id,
            kind,
            points,
            reason,
            timestamp,
        }
    }

    /// Number of records minted so far.
    pub fn minted(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }
}
