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

//! Append-only transaction log.
//!
//! Preserves insertion order and indexes entries by transaction ID. The log
//! has no interior locking: the [`Ledger`](crate::Ledger) only touches it
//! while holding its own lock.

use crate::base::{CustomerId, TransactionId};
use crate::transaction::Transaction;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct TransactionLog {
    /// Entries in append order.
    entries: Vec<Transaction>,

    /// Position of each entry in `entries`, keyed by transaction ID.
    positions: HashMap<TransactionId, usize>,
}

impl TransactionLog {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Appends a transaction and returns a reference to the stored entry.
    ///
    /// Transaction IDs come from the recorder and are unique by construction.
    pub fn append(&mut self, transaction: Transaction) -> &Transaction {
        let position = self.entries.len();
        let previous = self.positions.insert(transaction.id.clone(), position);
        debug_assert!(
            previous.is_none(),
            "Invariant violated: duplicate transaction ID {}",
            transaction.id
        );
        self.entries.push(transaction);
        &self.entries[position]
    }

    pub fn get(&self, id: &str) -> Option<&Transaction> {
        self.positions.get(id).map(|&position| &self.entries[position])
    }

    /// Iterates entries in append order.
    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.entries.iter()
    }

    /// Iterates one customer's entries in append order.
    pub fn for_customer<'a>(
        &'a self,
        customer_id: &'a CustomerId,
    ) -> impl Iterator<Item = &'a Transaction> + 'a {
        self.entries
            .iter()
            .filter(move |tx| &tx.customer_id == customer_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::TransactionRecorder;
    use crate::transaction::TransactionKind;

    fn earn(recorder: &TransactionRecorder, customer: &str, points: i64) -> Transaction {
        recorder.record(
            CustomerId::from(customer),
            TransactionKind::Earn,
            points,
            "test".to_string(),
        )
    }

    #[test]
    fn preserves_append_order() {
        let recorder = TransactionRecorder::new();
        let mut log = TransactionLog::new();

        let first = log.append(earn(&recorder, "a", 1)).id.clone();
        let second = log.append(earn(&recorder, "b", 2)).id.clone();
        let third = log.append(earn(&recorder, "a", 3)).id.clone();

        let ids: Vec<_> = log.iter().map(|tx| tx.id.clone()).collect();
        assert_eq!(ids, vec![first, second, third]);
        assert_eq!(log.len(), 3);
        assert!(!log.is_empty());
    }

    #[test]
    fn lookup_by_id() {
        let recorder = TransactionRecorder::new();
        let mut log = TransactionLog::new();
        let id = log.append(earn(&recorder, "a", 7)).id.clone();

        assert_eq!(log.get(id.as_str()).map(|tx| tx.points), Some(7));
        assert!(log.get("tx-missing").is_none());
    }

    #[test]
    fn filters_by_customer() {
        let recorder = TransactionRecorder::new();
        let mut log = TransactionLog::new();
        log.append(earn(&recorder, "a", 1));
        log.append(earn(&recorder, "b", 2));
        log.append(earn(&recorder, "a", 3));

        let customer = CustomerId::from("a");
        let points: Vec<_> = log.for_customer(&customer).map(|tx| tx.points).collect();
        assert_eq!(points, vec![1, 3]);
    }

    #[test]
    fn new_log_is_empty() {
        let log = TransactionLog::new();
        assert!(log.is_empty());
        assert_eq!(log.iter().count(), 0);
    }
}
