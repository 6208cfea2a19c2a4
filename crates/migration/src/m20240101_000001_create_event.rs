//! Create `event` table.
//! Flags default to false; rows are only ever soft-deleted.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Event::Table)
                    .if_not_exists()
                    .col(uuid(Event::Id).primary_key())
                    .col(string_len(Event::Name, 256).not_null())
                    .col(text_null(Event::Description))
                    .col(json_null(Event::Payload))
                    .col(boolean(Event::NotificationSent).not_null().default(false))
                    .col(boolean(Event::IsDeleted).not_null().default(false))
                    .col(timestamp_with_time_zone(Event::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Event::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Event::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Event {
    Table,
    Id,
    Name,
    Description,
    Payload,
    NotificationSent,
    IsDeleted,
    CreatedAt,
    UpdatedAt,
}
