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


//! Test utilities for the business layer.

use crate::db;
use crate::driver::Driver;
use crate::model::Customer;
use bibliotheca_core::db::Db;
use bibliotheca_core::db::sqlite::testutils;
use std::sync::Arc;
use uuid::Uuid;

pub(crate) struct TestContext {
    db: Arc<dyn Db + Send + Sync>,
    driver: Driver,
}

impl TestContext {
    pub(crate) async fn setup() -> Self {
        let db: Arc<dyn Db + Send + Sync> = Arc::new(testutils::setup().await);
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let driver = Driver::new(db.clone());
        Self { db, driver }
    }

    pub(crate) fn driver(&self) -> Driver {
        self.driver.clone()
    }

    /// Stores a customer directly in the database, bypassing the driver.
    pub(crate) async fn create_customer(&self, first_name: &str, last_name: &str) -> Customer {
        let customer = Customer::new(Uuid::new_v4(), first_name.to_owned(), last_name.to_owned());
        db::create_customer(&mut self.db.ex().await.unwrap(), &customer).await.unwrap();
        customer
    }

    /// Checks if the customer with `identifier` exists in the database.
    pub(crate) async fn has_customer(&self, identifier: Uuid) -> bool {
        db::get_customer(&mut self.db.ex().await.unwrap(), identifier).await.is_ok()
    }
}
