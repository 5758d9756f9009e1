use sea_query::{
    ColumnDef, ForeignKey, ForeignKeyAction, Table, TableCreateStatement, TableDropStatement,
};

use crate::table::{Ingredient, Tcm};

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(Tcm::Table)
        .col(
            ColumnDef::new(Tcm::IngredientId)
                .integer()
                .not_null()
                .primary_key(),
        )
        .col(ColumnDef::new(Tcm::FourQi).json_binary().not_null())
        .col(ColumnDef::new(Tcm::FiveFlavors).json_binary().not_null())
        .col(ColumnDef::new(Tcm::Meridians).json_binary().not_null())
        .col(ColumnDef::new(Tcm::Overview).text())
        .col(
            ColumnDef::new(Tcm::Confidence)
                .string()
                .not_null()
                .default("1.0"),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_tcm_ingredient")
                .from(Tcm::Table, Tcm::IngredientId)
                .to(Ingredient::Table, Ingredient::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(Tcm::Table).to_owned()
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
