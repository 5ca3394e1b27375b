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

//! Initial customer data.
//!
//! Customers can be preloaded from the built-in demo set or from a CSV file.

use crate::base::{CustomerId, Points};
use crate::customer::Customer;
use crate::ledger::Ledger;
use crate::LedgerError;
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::io::Read;
use tracing::warn;

/// The three demo customers the service starts with.
pub fn demo_customers() -> Vec<Customer> {
    vec![
        Customer::new(CustomerId::from("cust-001"))
            .with_points(150)
            .with_name("John Doe")
            .with_email("john@email.com"),
        Customer::new(CustomerId::from("cust-002"))
            .with_points(75)
            .with_name("Jane Smith")
            .with_email("jane@email.com"),
        Customer::new(CustomerId::from("cust-003"))
            .with_points(200)
            .with_name("Bob Wilson")
            .with_email("bob@email.com"),
    ]
}

/// Raw CSV record matching the seed format.
///
/// Fields: `id, points, name, email`
#[derive(Debug, Deserialize)]
struct CsvRecord {
    id: String,
    points: Points,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    name: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    email: Option<String>,
}

impl CsvRecord {
    /// Returns `None` for rows without a usable customer ID.
    fn into_customer(self) -> Option<Customer> {
        if self.id.is_empty() {
            return None;
        }
        Some(Customer {
            id: CustomerId(self.id),
            points: self.points,
            name: self.name.filter(|name| !name.is_empty()),
            email: self.email.filter(|email| !email.is_empty()),
        })
    }
}

/// Reads seed customers from a CSV reader.
///
/// # CSV Format
///
/// ```csv
/// id,points,name,email
/// cust-001,150,John Doe,john@email.com
/// cust-004,10,,
/// ```
///
/// Malformed rows are skipped with a warning.
///
/// # Errors
///
/// Returns a CSV error only if the header row cannot be read.
pub fn load_customers<R: Read>(reader: R) -> Result<Vec<Customer>, csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true) // rows may drop trailing columns
        .has_headers(true)
        .from_reader(reader);
    rdr.headers()?;

    let mut customers = Vec::new();
    for (row, result) in rdr.deserialize::<CsvRecord>().enumerate() {
        match result {
            Ok(record) => match record.into_customer() {
                Some(customer) => customers.push(customer),
                None => warn!(row = row + 1, "skipping seed row without customer id"),
            },
            Err(e) => warn!(row = row + 1, error = %e, "skipping malformed seed row"),
        }
    }

    Ok(customers)
}

/// Registers every customer, skipping rejected ones with a warning.
///
/// Returns the number of customers registered.
pub fn seed_ledger(ledger: &Ledger, customers: impl IntoIterator<Item = Customer>) -> usize {
    let mut registered = 0;
    for customer in customers {
        let id = customer.id.clone();
        match ledger.register(customer) {
            Ok(()) => registered += 1,
            Err(e @ (LedgerError::DuplicateCustomer | LedgerError::InvalidPoints)) => {
                warn!(customer_id = %id, error = %e, "skipping seed customer");
            }
            Err(e) => warn!(customer_id = %id, error = %e, "unexpected seed failure"),
        }
    }
    registered
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn demo_customers_match_initial_balances() {
        let customers = demo_customers();
        let balances: Vec<_> = customers
            .iter()
            .map(|c| (c.id.as_str(), c.points))
            .collect();
        assert_eq!(
            balances,
            vec![("cust-001", 150), ("cust-002", 75), ("cust-003", 200)]
        );
        assert_eq!(customers[0].name.as_deref(), Some("John Doe"));
    }

    #[test]
    fn parse_full_rows() {
        let csv = "id,points,name,email\n\
                   cust-010,40,Ada Lovelace,ada@email.com\n";
        let customers = load_customers(Cursor::new(csv)).unwrap();

        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].id.as_str(), "cust-010");
        assert_eq!(customers[0].points, 40);
        assert_eq!(customers[0].name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(customers[0].email.as_deref(), Some("ada@email.com"));
    }

    #[test]
    fn parse_rows_without_profile() {
        let csv = "id,points,name,email\n\
                   cust-011,5,,\n\
                   cust-012,6,,\n";
        let customers = load_customers(Cursor::new(csv)).unwrap();

        assert_eq!(customers.len(), 2);
        assert!(customers.iter().all(|c| c.name.is_none() && c.email.is_none()));
    }

    #[test]
    fn parse_with_whitespace() {
        let csv = "id,points,name,email\n cust-013 , 9 , Bob , bob@email.com \n";
        let customers = load_customers(Cursor::new(csv)).unwrap();

        assert_eq!(customers[0].id.as_str(), "cust-013");
        assert_eq!(customers[0].points, 9);
        assert_eq!(customers[0].name.as_deref(), Some("Bob"));
    }

    #[test]
    fn skip_malformed_rows() {
        let csv = "id,points,name,email\n\
                   cust-014,10,,\n\
                   cust-015,lots,,\n\
                   ,3,,\n\
                   cust-016,20,,\n";
        let customers = load_customers(Cursor::new(csv)).unwrap();

        let ids: Vec<_> = customers.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["cust-014", "cust-016"]);
    }

    #[test]
    fn seed_ledger_skips_duplicates_and_negatives() {
        let ledger = Ledger::new();
        let mut customers = demo_customers();
        customers.push(Customer::new(CustomerId::from("cust-001")).with_points(1));
        customers.push(Customer::new(CustomerId::from("cust-neg")).with_points(-4));

        assert_eq!(seed_ledger(&ledger, customers), 3);
        assert_eq!(ledger.customer_count(), 3);
        assert_eq!(
            ledger.get_balance(&CustomerId::from("cust-001")).unwrap().points,
            150
        );
    }
}
