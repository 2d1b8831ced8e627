use sea_orm::{ActiveModelTrait, DatabaseConnection, DatabaseTransaction, TransactionTrait};
use tracing::{info, instrument, warn};

use models::user::{self, UserChanges};
use crate::errors::ServiceError;

async fn rollback(txn: DatabaseTransaction) {
    if let Err(e) = txn.rollback().await {
        warn!(error = %e, "transaction rollback failed");
    }
}

/// Create a user. A duplicate email rolls the insert back and yields `Conflict`.
#[instrument(skip(db, name, email))]
pub async fn create_user(db: &DatabaseConnection, name: &str, email: &str) -> Result<user::Model, ServiceError> {
    user::validate_name(name)?;
    user::validate_email(email)?;

    let txn = db.begin().await?;
    match user::create(&txn, name, email).await {
        Ok(created) => {
            txn.commit().await?;
            info!(user_id = created.id, "user created");
            Ok(created)
        }
        Err(e) => {
            rollback(txn).await;
            let err = ServiceError::from(e);
            if let ServiceError::Conflict(_) = err {
                info!("create rejected: email already registered");
            }
            Err(err)
        }
    }
}

/// List every user in insertion order.
pub async fn list_users(db: &DatabaseConnection) -> Result<Vec<user::Model>, ServiceError> {
    Ok(user::list_all(db).await?)
}

/// Get a user by id.
pub async fn get_user(db: &DatabaseConnection, id: i32) -> Result<user::Model, ServiceError> {
    user::find(db, id).await?.ok_or_else(|| ServiceError::not_found("user"))
}

/// Apply the supplied fields to an existing user.
///
/// An empty change set returns the current row untouched. When the new email
/// belongs to another user the transaction is rolled back and the stored row
/// keeps its previous email.
#[instrument(skip(db, changes), fields(user_id = id))]
pub async fn update_user(db: &DatabaseConnection, id: i32, changes: UserChanges) -> Result<user::Model, ServiceError> {
    changes.validate()?;

    let txn = db.begin().await?;
    let found = match user::find(&txn, id).await {
        Ok(Some(found)) => found,
        Ok(None) => {
            rollback(txn).await;
            return Err(ServiceError::not_found("user"));
        }
        Err(e) => {
            rollback(txn).await;
            return Err(e.into());
        }
    };

    if changes.is_empty() {
        txn.commit().await?;
        return Ok(found);
    }

    let am = changes.apply(found);
    match am.update(&txn).await {
        Ok(updated) => {
            txn.commit().await?;
            info!("user updated");
            Ok(updated)
        }
        Err(e) => {
            rollback(txn).await;
            let err = ServiceError::from(e);
            if let ServiceError::Conflict(_) = err {
                info!("update rejected: email already registered");
            }
            Err(err)
        }
    }
}

/// Permanently delete a user.
#[instrument(skip(db))]
pub async fn delete_user(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    let removed = user::hard_delete(db, id).await?;
    if removed == 0 {
        return Err(ServiceError::not_found("user"));
    }
    info!(user_id = id, "user deleted");
    Ok(())
}
