use sea_orm::{entity::prelude::*, ConnectionTrait, QueryOrder, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() {
        return Err(errors::ModelError::Validation("name required".into()));
    }
    Ok(())
}

/// Emails are opaque: only presence is checked.
pub fn validate_email(email: &str) -> Result<(), errors::ModelError> {
    if email.trim().is_empty() {
        return Err(errors::ModelError::Validation("email required".into()));
    }
    Ok(())
}

/// Fields supplied to an update. `None` means "leave unchanged".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }

    pub fn validate(&self) -> Result<(), errors::ModelError> {
        if let Some(name) = &self.name { validate_name(name)?; }
        if let Some(email) = &self.email { validate_email(email)?; }
        Ok(())
    }

    /// Turn a loaded row into an active model with only the supplied fields set.
    pub fn apply(&self, found: Model) -> ActiveModel {
        let mut am: ActiveModel = found.into();
        if let Some(name) = &self.name {
            am.name = Set(name.clone());
        }
        if let Some(email) = &self.email {
            am.email = Set(email.clone());
        }
        am
    }
}

pub async fn create<C>(db: &C, name: &str, email: &str) -> Result<Model, errors::ModelError>
where
    C: ConnectionTrait,
{
    validate_name(name)?;
    validate_email(email)?;
    let am = ActiveModel {
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

pub async fn find<C>(db: &C, id: i32) -> Result<Option<Model>, errors::ModelError>
where
    C: ConnectionTrait,
{
    Ok(Entity::find_by_id(id).one(db).await?)
}

/// All rows in insertion order.
pub async fn list_all<C>(db: &C) -> Result<Vec<Model>, errors::ModelError>
where
    C: ConnectionTrait,
{
    Ok(Entity::find().order_by_asc(Column::Id).all(db).await?)
}

pub async fn hard_delete<C>(db: &C, id: i32) -> Result<u64, errors::ModelError>
where
    C: ConnectionTrait,
{
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected)
}
