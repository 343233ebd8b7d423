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


//! Initial contents of an empty registry.

use crate::db;
use crate::driver::Driver;
use crate::model::Customer;
use bibliotheca_core::driver::DriverResult;
use log::info;
use uuid::{Uuid, uuid};

/// Seeded customers: identifier, first name and last name.
const CUSTOMERS: &[(Uuid, &str, &str)] = &[
    (uuid!("70e8efbf-06ca-4520-9fbd-5762daa01348"), "Hans", "Test1"),
    (uuid!("bf93921b-d2de-432c-87eb-0c017349a427"), "Hans", "Test2"),
    (uuid!("06af7967-310b-4ebb-9ac0-cd2a790dd0b4"), "Hans", "Test3"),
    (uuid!("62bcbf30-3240-4886-9330-5af727b407ce"), "Hans", "Test4"),
];

impl Driver {
    /// Populates the database with sample customers unless it already has some.
    ///
    /// Returns true if the sample data was inserted.
    pub(crate) async fn seed(self) -> DriverResult<bool> {
        let mut tx = self.db.begin().await?;
        if !db::get_customers(tx.ex()).await?.is_empty() {
            info!("Database already contains customers; skipping seed data");
            return Ok(false);
        }

        for (identifier, first_name, last_name) in CUSTOMERS {
            let customer =
                Customer::new(*identifier, (*first_name).to_owned(), (*last_name).to_owned());
            db::create_customer(tx.ex(), &customer).await?;
        }
        tx.commit().await?;

        info!("Created {} customers", CUSTOMERS.len());
        Ok(true)
    }
}
