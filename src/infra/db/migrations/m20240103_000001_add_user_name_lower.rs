//! Migration: Lowercased copy of the user name for search.
//!
//! SQLite's `LOWER` only folds ASCII, so the folded name is computed by the
//! application on every write. Rows written before this migration are
//! backfilled with the database's own `LOWER`.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Users::Table)
                    .add_column(
                        ColumnDef::new(Users::NameLower)
                            .string_len(100)
                            .not_null()
                            .default(""),
                    )
                    .to_owned(),
            )
            .await?;

        let backfill = Query::update()
            .table(Users::Table)
            .value(
                Users::NameLower,
                SimpleExpr::from(Func::lower(Expr::col(Users::Name))),
            )
            .to_owned();
        manager.exec_stmt(backfill).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Users::Table)
                    .drop_column(Users::NameLower)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Name,
    NameLower,
}
