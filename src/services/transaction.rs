//! Runs a unit of work inside one database transaction.
//!
//! The closure receives the open `DatabaseTransaction` and passes it to the
//! repository functions, which accept any `ConnectionTrait`. `Ok` commits,
//! `Err` rolls back and the error is returned to the caller.

use std::{future::Future, pin::Pin};

use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};
use tracing::{error, warn};

use crate::error::AppError;

pub type TxnFuture<'c, T> = Pin<Box<dyn Future<Output = Result<T, AppError>> + Send + 'c>>;

pub async fn with_transaction<T, F>(db: &DatabaseConnection, f: F) -> Result<T, AppError>
where
    F: for<'c> FnOnce(&'c DatabaseTransaction) -> TxnFuture<'c, T> + Send,
    T: Send,
{
    let txn = db.begin().await?;

    let result = f(&txn).await;

    match result {
        Ok(value) => {
            txn.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                if is_connection_gone(&rollback_err) {
                    warn!(error = %rollback_err, "rollback skipped, connection already closed");
                } else {
                    error!(error = %rollback_err, cause = %err, "transaction rollback failed");
                    return Err(AppError::Database(rollback_err));
                }
            }
            Err(err)
        }
    }
}

fn is_connection_gone(err: &DbErr) -> bool {
    matches!(err, DbErr::ConnectionAcquire(_) | DbErr::Conn(_))
}
