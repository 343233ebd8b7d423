// Bibliotheca
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.


//! Business logic for the customer registry.

use bibliotheca_core::db::{Db, DbError};
use bibliotheca_core::driver::DriverError;
use std::sync::Arc;

mod accounts;
pub(crate) use accounts::single_account_store;
mod customers;
mod seed;
#[cfg(test)]
pub(crate) mod testutils;

/// Message returned when a customer does not exist.
const CUSTOMER_NOT_FOUND: &str = "Customer not found";

/// Converts a `DbError::NotFound` into the error reported for a missing customer.
fn map_not_found(e: DbError) -> DriverError {
    match e {
        DbError::NotFound => DriverError::NotFound(CUSTOMER_NOT_FOUND.to_owned()),
        e => DriverError::from(e),
    }
}

/// Business logic.
///
/// The public operations of the driver consume it so that each runs inside its own transaction.
#[derive(Clone)]
pub(crate) struct Driver {
    /// The database that the driver uses for persistence.
    db: Arc<dyn Db + Send + Sync>,
}

impl Driver {
    /// Creates a new driver backed by the given injected components.
    pub(crate) fn new(db: Arc<dyn Db + Send + Sync>) -> Self {
        Self { db }
    }
}
