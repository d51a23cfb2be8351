//! Create `promotion` table.
//!
//! `title` and `priority` are unbounded text; `priority` holds the code as given
//! (`NORMAL`, `HIGH`, or anything else a caller saved).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Promotion::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Promotion::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(text(Promotion::Title))
                    .col(text_null(Promotion::Description))
                    .col(boolean(Promotion::Active).not_null().default(false))
                    .col(text(Promotion::Priority).default("NORMAL"))
                    .col(timestamp_with_time_zone(Promotion::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Promotion::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Promotion::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Promotion { Table, Id, Title, Description, Active, Priority, CreatedAt, UpdatedAt }
