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


//! Database abstraction to manipulate customers.

use crate::model::Customer;
use bibliotheca_core::db::sqlite;
use bibliotheca_core::db::{DbError, DbResult, Executor};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use uuid::Uuid;


/// Common prefix of the queries that fetch customers.
const SELECT_CUSTOMERS: &str = "SELECT identifier, first_name, last_name FROM customers";

/// Initializes the database schema.
pub(crate) async fn init_schema(ex: &mut Executor) -> DbResult<()> {
    match ex {
        Executor::Sqlite(ex) => sqlite::run_schema(ex, include_str!("sqlite.sql")).await,

        #[allow(unused)]
        _ => unreachable!(),
    }
}

impl TryFrom<SqliteRow> for Customer {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let identifier: Uuid = row.try_get("identifier").map_err(sqlite::map_sqlx_error)?;
        let first_name: String = row.try_get("first_name").map_err(sqlite::map_sqlx_error)?;
        let last_name: String = row.try_get("last_name").map_err(sqlite::map_sqlx_error)?;
        Ok(Customer::new(identifier, first_name, last_name))
    }
}

/// Creates a new `customer`.
pub(crate) async fn create_customer(ex: &mut Executor, customer: &Customer) -> DbResult<()> {
    match ex {
        Executor::Sqlite(ex) => {
            let query_str =
                "INSERT INTO customers (identifier, first_name, last_name) VALUES (?, ?, ?)";
            sqlx::query(query_str)
                .bind(customer.identifier())
                .bind(customer.first_name())
                .bind(customer.last_name())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Ok(())
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets all customers, in creation order.
pub(crate) async fn get_customers(ex: &mut Executor) -> DbResult<Vec<Customer>> {
    match ex {
        Executor::Sqlite(ex) => {
            let query_str = format!("{} ORDER BY id", SELECT_CUSTOMERS);
            let raw_rows = sqlx::query(&query_str)
                .fetch_all(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            raw_rows.into_iter().map(Customer::try_from).collect()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets the customer with public `identifier`.
pub(crate) async fn get_customer(ex: &mut Executor, identifier: Uuid) -> DbResult<Customer> {
    match ex {
        Executor::Sqlite(ex) => {
            let query_str = format!("{} WHERE identifier = ?", SELECT_CUSTOMERS);
            let raw_row = sqlx::query(&query_str)
                .bind(identifier)
                .fetch_one(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Customer::try_from(raw_row)
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Deletes the customer with public `identifier`.
pub(crate) async fn delete_customer(ex: &mut Executor, identifier: Uuid) -> DbResult<()> {
    let rows_affected = match ex {
        Executor::Sqlite(ex) => sqlx::query("DELETE FROM customers WHERE identifier = ?")
            .bind(identifier)
            .execute(ex.conn())
            .await
            .map_err(sqlite::map_sqlx_error)?
            .rows_affected(),

        #[allow(unused)]
        _ => unreachable!(),
    };

    match rows_affected {
        0 => Err(DbError::NotFound),
        1 => Ok(()),
        _ => Err(DbError::BackendError("Delete affected more than one row".to_owned())),
    }
}
