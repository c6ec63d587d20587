//! Create `dish` table.
//! Each dish row belongs to exactly one restaurant; deleting the
//! restaurant cascades to its dishes.
use sea_orm_migration::{prelude::*, schema::*};

use crate::m20240101_000001_create_restaurant::Restaurant;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Dish::Table)
                    .if_not_exists()
                    .col(big_integer(Dish::Id).primary_key().auto_increment())
                    .col(big_integer(Dish::RestaurantId).not_null())
                    .col(string_len(Dish::Name, 256).not_null())
                    .col(double(Dish::Price).not_null())
                    .col(boolean_null(Dish::Disponible))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dish_restaurant")
                            .from(Dish::Table, Dish::RestaurantId)
                            .to(Restaurant::Table, Restaurant::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_dish_restaurant")
                    .table(Dish::Table)
                    .col(Dish::RestaurantId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Dish::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Dish {
    Table,
    Id,
    RestaurantId,
    Name,
    Price,
    Disponible,
}
