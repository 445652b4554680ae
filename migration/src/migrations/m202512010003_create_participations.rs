use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202512010003_create_participations"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("participations"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("id"))
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Alias::new("contest_id")).big_integer().not_null())
                    .col(ColumnDef::new(Alias::new("contest_name")).string().not_null())
                    .col(ColumnDef::new(Alias::new("user_email")).string().not_null())
                    // Payment intent id; the unique key makes payment verification idempotent.
                    .col(
                        ColumnDef::new(Alias::new("transaction_id"))
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Alias::new("price")).double().not_null().default(0.0))
                    .col(
                        ColumnDef::new(Alias::new("status"))
                            .enumeration(
                                Alias::new("participation_status"),
                                vec![Alias::new("paid"), Alias::new("submitted")],
                            )
                            .not_null()
                            .default("paid"),
                    )
                    .col(ColumnDef::new(Alias::new("deadline")).timestamp())
                    .col(ColumnDef::new(Alias::new("submitted_task")).text())
                    .col(ColumnDef::new(Alias::new("submitted_at")).timestamp())
                    .col(
                        ColumnDef::new(Alias::new("payment_date"))
                            .timestamp()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("participations"), Alias::new("contest_id"))
                            .to(Alias::new("contests"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_participations_contest_user")
                    .table(Alias::new("participations"))
                    .col(Alias::new("contest_id"))
                    .col(Alias::new("user_email"))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("participations")).to_owned())
            .await
    }
}
