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

//! Loyalty points ledger.
//!
//! The [`Ledger`] holds the authoritative customer balances together with the
//! append-only transaction log.
//!
//! # Operations
//!
//! - **Credit**: Adds points to a customer, creating the customer if needed.
//! - **Debit**: Removes points from an existing customer (fails if the
//!   balance is too low).
//! - **Balance lookup**: Returns a snapshot of one customer.
//!
//! # Thread Safety
//!
//! Customers and the log live behind a single [`RwLock`]. Lookups share the
//! read lock. Credits and debits take the write lock for the whole
//! validate → mutate → append sequence, so every observer sees each customer's
//! balance agree with the log. Concurrent mutations are applied in the order
//! they acquire the lock.

use crate::base::{CustomerId, Points};
use crate::customer::{Customer, CustomerRecord};
use crate::recorder::TransactionRecorder;
use crate::transaction::{Transaction, TransactionKind};
use crate::transaction_log::TransactionLog;
use crate::LedgerError;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::{debug, info};

#[derive(Debug, Default)]
struct LedgerState {
    customers: HashMap<CustomerId, CustomerRecord>,
    log: TransactionLog,
}

/// In-memory points ledger shared by all request handlers.
///
/// # Invariants
///
/// - A customer's balance is never negative.
/// - A customer's balance equals its opening balance plus the signed sum of
///   its log entries.
/// - The log is append-only and transaction IDs are unique.
/// - A failed operation changes nothing.
#[derive(Debug, Default)]
pub struct Ledger {
    state: RwLock<LedgerState>,
    recorder: TransactionRecorder,
}

impl Ledger {
    /// Creates a ledger with no customers or transactions.
    pub fn new() -> Self {
        Ledger {
            state: RwLock::new(LedgerState::default()),
            recorder: TransactionRecorder::new(),
        }
    }

    /// Registers a customer with an opening balance and profile.
    ///
    /// Used for seeding. The opening balance is not recorded in the log.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidPoints`] - Opening balance is negative.
    /// - [`LedgerError::DuplicateCustomer`] - Customer ID already registered.
    pub fn register(&self, customer: Customer) -> Result<(), LedgerError> {
        if customer.points < 0 {
            return Err(LedgerError::InvalidPoints);
        }

        let mut state = self.state.write();
        match state.customers.entry(customer.id.clone()) {
            Entry::Occupied(_) => Err(LedgerError::DuplicateCustomer),
            Entry::Vacant(entry) => {
                debug!(customer_id = %customer.id, points = customer.points, "customer registered");
                entry.insert(CustomerRecord::opened(customer));
                Ok(())
            }
        }
    }

    /// Returns a snapshot of one customer's balance and profile.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::CustomerNotFound`] - No such customer.
    pub fn get_balance(&self, customer_id: &CustomerId) -> Result<Customer, LedgerError> {
        self.state
            .read()
            .customers
            .get(customer_id)
            .map(|record| record.customer().clone())
            .ok_or(LedgerError::CustomerNotFound)
    }

    /// Adds points to a customer and appends an `earn` transaction.
    ///
    /// Unknown customers are created with a zero balance first.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidPoints`] - `points` is zero or negative.
    /// - [`LedgerError::BalanceOverflow`] - The new balance does not fit.
    pub fn credit(
        &self,
        customer_id: &CustomerId,
        points: Points,
        reason: impl Into<String>,
    ) -> Result<(Customer, Transaction), LedgerError> {
        let mut state = self.state.write();

        // Reject before the entry lookup so a bad credit never creates a customer.
        if points <= 0 {
            return Err(LedgerError::InvalidPoints);
        }

        let LedgerState { customers, log } = &mut *state;
        let record = customers.entry(customer_id.clone()).or_insert_with(|| {
            info!(customer_id = %customer_id, "creating customer on first credit");
            CustomerRecord::new(customer_id.clone())
        });
        record.earn(points)?;

        let transaction = self.recorder.record(
            customer_id.clone(),
            TransactionKind::Earn,
            points,
            reason.into(),
        );
        let transaction = log.append(transaction).clone();
        let customer = record.customer().clone();

        debug!(
            customer_id = %customer_id,
            transaction_id = %transaction.id,
            points,
            balance = customer.points,
            "points credited"
        );
        Ok((customer, transaction))
    }

    /// Removes points from a customer and appends a `redeem` transaction.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidPoints`] - `points` is zero or negative.
    /// - [`LedgerError::CustomerNotFound`] - No such customer.
    /// - [`LedgerError::InsufficientPoints`] - Balance is lower than `points`.
    pub fn debit(
        &self,
        customer_id: &CustomerId,
        points: Points,
        reward: impl Into<String>,
    ) -> Result<(Customer, Transaction), LedgerError> {
        let mut state = self.state.write();

        if points <= 0 {
            return Err(LedgerError::InvalidPoints);
        }

        let LedgerState { customers, log } = &mut *state;
        let record = customers
            .get_mut(customer_id)
            .ok_or(LedgerError::CustomerNotFound)?;
        record.redeem(points)?;

        let transaction = self.recorder.record(
            customer_id.clone(),
            TransactionKind::Redeem,
            points,
            reward.into(),
        );
        let transaction = log.append(transaction).clone();
        let customer = record.customer().clone();

        debug!(
            customer_id = %customer_id,
            transaction_id = %transaction.id,
            points,
            balance = customer.points,
            "points redeemed"
        );
        Ok((customer, transaction))
    }

    /// Returns snapshots of all customers, ordered by ID.
    pub fn customers(&self) -> Vec<Customer> {
        let mut customers: Vec<Customer> = self
            .state
            .read()
            .customers
            .values()
            .map(|record| record.customer().clone())
            .collect();
        customers.sort_by(|a, b| a.id.cmp(&b.id));
        customers
    }

    /// Returns the whole transaction log in append order.
    pub fn transactions(&self) -> Vec<Transaction> {
        self.state.read().log.iter().cloned().collect()
    }

    /// Returns one customer's transactions in append order.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::CustomerNotFound`] - No such customer.
    pub fn customer_transactions(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Vec<Transaction>, LedgerError> {
        let state = self.state.read();
        if !state.customers.contains_key(customer_id) {
            return Err(LedgerError::CustomerNotFound);
        }
        Ok(state.log.for_customer(customer_id).cloned().collect())
    }

    /// Looks up a transaction by ID.
    pub fn transaction(&self, transaction_id: &str) -> Option<Transaction> {
        self.state.read().log.get(transaction_id).cloned()
    }

    /// Recomputes a customer's balance from its opening balance and the log.
    ///
    /// Always equals the stored balance; exposed for auditing.
    pub fn replayed_points(&self, customer_id: &CustomerId) -> Result<Points, LedgerError> {
        let state = self.state.read();
        let record = state
            .customers
            .get(customer_id)
            .ok_or(LedgerError::CustomerNotFound)?;
        let delta: Points = state
            .log
            .for_customer(customer_id)
            .map(Transaction::signed_points)
            .sum();
        Ok(record.opening_points() + delta)
    }

    pub fn customer_count(&self) -> usize {
        self.state.read().customers.len()
    }

    pub fn transaction_count(&self) -> usize {
        self.state.read().log.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_credit_does_not_create_customer() {
        let ledger = Ledger::new();
        let id = CustomerId::from("ghost");

        assert_eq!(ledger.credit(&id, 0, "nothing"), Err(LedgerError::InvalidPoints));
        assert_eq!(ledger.get_balance(&id), Err(LedgerError::CustomerNotFound));
        assert_eq!(ledger.customer_count(), 0);
        assert_eq!(ledger.transaction_count(), 0);
    }

    #[test]
    fn overflowing_credit_appends_nothing() {
        let ledger = Ledger::new();
        let id = CustomerId::from("whale");
        ledger
            .register(Customer::new(id.clone()).with_points(Points::MAX))
            .unwrap();

        assert_eq!(ledger.credit(&id, 1, "bonus"), Err(LedgerError::BalanceOverflow));
        assert_eq!(ledger.get_balance(&id).unwrap().points, Points::MAX);
        assert_eq!(ledger.transaction_count(), 0);
    }

    #[test]
    fn write_lock_released_after_rejection() {
        let ledger = Ledger::new();
        let id = CustomerId::from("cust-001");

        let _ = ledger.debit(&id, 10, "mug");
        assert!(ledger.state.try_write().is_some());
    }

    #[test]
    fn register_rejects_negative_opening_balance() {
        let ledger = Ledger::new();
        let customer = Customer::new(CustomerId::from("cust-neg")).with_points(-1);
        assert_eq!(ledger.register(customer), Err(LedgerError::InvalidPoints));
        assert_eq!(ledger.customer_count(), 0);
    }
}
