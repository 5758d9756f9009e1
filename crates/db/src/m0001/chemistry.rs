use sea_query::{
    ColumnDef, ForeignKey, ForeignKeyAction, Table, TableCreateStatement, TableDropStatement,
};

use crate::table::{Chemistry, Ingredient};

pub struct CreateTable;

fn decimal(column: Chemistry) -> ColumnDef {
    ColumnDef::new(column)
        .string()
        .not_null()
        .default("0")
        .to_owned()
}

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(Chemistry::Table)
        .col(
            ColumnDef::new(Chemistry::IngredientId)
                .integer()
                .not_null()
                .primary_key(),
        )
        .col(decimal(Chemistry::Glu))
        .col(decimal(Chemistry::Asp))
        .col(decimal(Chemistry::Imp))
        .col(decimal(Chemistry::Gmp))
        .col(decimal(Chemistry::Amp))
        .col(decimal(Chemistry::UmamiAa))
        .col(decimal(Chemistry::UmamiNuc))
        .col(decimal(Chemistry::UmamiSynergy))
        .foreign_key(
            ForeignKey::create()
                .name("fk_chemistry_ingredient")
                .from(Chemistry::Table, Chemistry::IngredientId)
                .to(Ingredient::Table, Ingredient::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(Chemistry::Table).to_owned()
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
