use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Promotion: latest-active lookups filter on `active` and order by id
        manager
            .create_index(
                Index::create()
                    .name("idx_promotion_active_id")
                    .table(Promotion::Table)
                    .col(Promotion::Active)
                    .col(Promotion::Id)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_promotion_active_id").table(Promotion::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Promotion { Table, Id, Active }
