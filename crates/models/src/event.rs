use sea_orm::{entity::prelude::*, DatabaseConnection, QueryOrder, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;

pub const NAME_MAX_LEN: usize = 256;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "event")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Json", nullable)]
    pub payload: Option<Json>,
    pub notification_sent: bool,
    pub is_deleted: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Column values written by [`save`]; timestamps are managed here.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventFields {
    pub name: String,
    pub description: Option<String>,
    pub payload: Option<Json>,
    pub notification_sent: bool,
    pub is_deleted: bool,
}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() {
        return Err(errors::ModelError::Validation("name required".into()));
    }
    if name.chars().count() > NAME_MAX_LEN {
        return Err(errors::ModelError::Validation(format!("name longer than {NAME_MAX_LEN} characters")));
    }
    Ok(())
}

/// Insert when `id` is `None` or unknown, otherwise overwrite the row.
pub async fn save(db: &DatabaseConnection, id: Option<Uuid>, fields: EventFields) -> Result<Model, errors::ModelError> {
    validate_name(&fields.name)?;
    let now = Utc::now().into();

    let existing = match id {
        Some(id) => Entity::find_by_id(id).one(db).await?,
        None => None,
    };

    match existing {
        Some(found) => {
            let mut am: ActiveModel = found.into();
            am.name = Set(fields.name);
            am.description = Set(fields.description);
            am.payload = Set(fields.payload);
            am.notification_sent = Set(fields.notification_sent);
            am.is_deleted = Set(fields.is_deleted);
            am.updated_at = Set(now);
            Ok(am.update(db).await?)
        }
        None => {
            let am = ActiveModel {
                id: Set(id.unwrap_or_else(Uuid::new_v4)),
                name: Set(fields.name),
                description: Set(fields.description),
                payload: Set(fields.payload),
                notification_sent: Set(fields.notification_sent),
                is_deleted: Set(fields.is_deleted),
                created_at: Set(now),
                updated_at: Set(now),
            };
            Ok(am.insert(db).await?)
        }
    }
}

pub async fn find(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

/// List events in creation order, narrowed by whichever flags are given.
pub async fn list(
    db: &DatabaseConnection,
    notification_sent: Option<bool>,
    is_deleted: Option<bool>,
) -> Result<Vec<Model>, errors::ModelError> {
    let mut finder = Entity::find();
    if let Some(ns) = notification_sent { finder = finder.filter(Column::NotificationSent.eq(ns)); }
    if let Some(del) = is_deleted { finder = finder.filter(Column::IsDeleted.eq(del)); }
    let rows = finder
        .order_by_asc(Column::CreatedAt)
        .order_by_asc(Column::Id)
        .all(db)
        .await?;
    Ok(rows)
}
