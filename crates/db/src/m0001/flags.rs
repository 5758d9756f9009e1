use sea_query::{
    ColumnDef, ForeignKey, ForeignKeyAction, Table, TableCreateStatement, TableDropStatement,
};

use crate::table::{Flags, Ingredient};

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(Flags::Table)
        .col(
            ColumnDef::new(Flags::IngredientId)
                .integer()
                .not_null()
                .primary_key(),
        )
        .col(ColumnDef::new(Flags::Allergens).json_binary().not_null())
        .col(
            ColumnDef::new(Flags::DietaryRestrictions)
                .json_binary()
                .not_null(),
        )
        .col(ColumnDef::new(Flags::UmamiTags).json_binary().not_null())
        .col(ColumnDef::new(Flags::FlavorTags).json_binary().not_null())
        .foreign_key(
            ForeignKey::create()
                .name("fk_flags_ingredient")
                .from(Flags::Table, Flags::IngredientId)
                .to(Ingredient::Table, Ingredient::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(Flags::Table).to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateTable {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
