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


//! Operations on the customer registry.

use crate::db;
use crate::driver::{Driver, map_not_found};
use crate::model::Customer;
use bibliotheca_core::db::DbError;
use bibliotheca_core::driver::DriverResult;
use log::info;
use uuid::Uuid;

impl Driver {
    /// Registers a new customer.
    pub(crate) async fn create_customer(
        self,
        first_name: String,
        last_name: String,
    ) -> DriverResult<Customer> {
        let customer = Customer::new(Uuid::new_v4(), first_name, last_name);

        let mut tx = self.db.begin().await?;
        db::create_customer(tx.ex(), &customer).await?;
        tx.commit().await?;

        info!("Created customer {}", customer.identifier());
        Ok(customer)
    }

    /// Gets all customers.
    pub(crate) async fn get_customers(self) -> DriverResult<Vec<Customer>> {
        let mut tx = self.db.begin().await?;
        let customers = db::get_customers(tx.ex()).await?;
        tx.commit().await?;
        Ok(customers)
    }

    /// Gets the customer with `identifier`.
    pub(crate) async fn get_customer(self, identifier: Uuid) -> DriverResult<Customer> {
        let mut tx = self.db.begin().await?;
        let customer = db::get_customer(tx.ex(), identifier).await.map_err(map_not_found)?;
        tx.commit().await?;
        Ok(customer)
    }

    /// Deletes the customer with `identifier`.  Returns false if there was no such customer.
    pub(crate) async fn delete_customer(self, identifier: Uuid) -> DriverResult<bool> {
        let mut tx = self.db.begin().await?;
        let deleted = match db::delete_customer(tx.ex(), identifier).await {
            Ok(()) => true,
            Err(DbError::NotFound) => false,
            Err(e) => return Err(e.into()),
        };
        tx.commit().await?;

        if deleted {
            info!("Deleted customer {}", identifier);
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use crate::driver::testutils::*;
    use bibliotheca_core::driver::DriverError;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_create_and_get() {
        let context = TestContext::setup().await;

        let customer = context
            .driver()
            .create_customer("Hans".to_owned(), "Test1".to_owned())
            .await
            .unwrap();
        assert_eq!("Hans", customer.first_name());
        assert_eq!("Test1", customer.last_name());

        assert_eq!(
            customer,
            context.driver().get_customer(*customer.identifier()).await.unwrap()
        );
        assert_eq!(vec![customer], context.driver().get_customers().await.unwrap());
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let context = TestContext::setup().await;

        match context.driver().get_customer(Uuid::new_v4()).await {
            Err(DriverError::NotFound(msg)) => assert_eq!("Customer not found", msg),
            e => panic!("{:?}", e),
        }
    }

    #[tokio::test]
    async fn test_delete() {
        let context = TestContext::setup().await;
        let customer = context.create_customer("Hans", "Test1").await;

        assert!(context.driver().delete_customer(*customer.identifier()).await.unwrap());
        assert!(!context.driver().delete_customer(*customer.identifier()).await.unwrap());
        assert!(context.driver().get_customers().await.unwrap().is_empty());
    }
}
