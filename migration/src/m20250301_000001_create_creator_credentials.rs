use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Status is plain text rather than a Postgres enum so the generic
        // column filters can compare it against a bound string.
        let create_table_sql = r#"
            CREATE TABLE IF NOT EXISTS youtube_creator.creator_credentials (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                creator_id UUID NOT NULL UNIQUE,
                email VARCHAR(255) NOT NULL UNIQUE,

                access_token TEXT NOT NULL,
                refresh_token TEXT NOT NULL DEFAULT '',
                status VARCHAR(32) NOT NULL DEFAULT 'active'
                    CHECK (status IN ('active', 'inactive', 'suspended')),

                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#;

        manager
            .get_connection()
            .execute_unprepared(create_table_sql)
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS idx_creator_credentials_status
                 ON youtube_creator.creator_credentials(status)",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS youtube_creator.creator_credentials")
            .await?;

        Ok(())
    }
}
