use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create venues table
        manager
            .create_table(
                Table::create()
                    .table(Venue::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Venue::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Venue::Name).string().not_null())
                    .col(ColumnDef::new(Venue::City).string_len(120).not_null())
                    .col(ColumnDef::new(Venue::State).string_len(120).not_null())
                    .col(ColumnDef::new(Venue::Address).string_len(120).not_null())
                    .col(ColumnDef::new(Venue::Phone).string_len(120))
                    .col(ColumnDef::new(Venue::ImageLink).string_len(500))
                    .col(ColumnDef::new(Venue::Genres).json().not_null())
                    .col(ColumnDef::new(Venue::FacebookLink).string_len(120))
                    .col(ColumnDef::new(Venue::WebsiteLink).string_len(120))
                    .col(
                        ColumnDef::new(Venue::SeekingTalent)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Venue::SeekingDescription).string_len(500))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_venues_city_state")
                    .table(Venue::Table)
                    .col(Venue::City)
                    .col(Venue::State)
                    .to_owned(),
            )
            .await?;

        // Create artists table
        manager
            .create_table(
                Table::create()
                    .table(Artist::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Artist::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Artist::Name).string().not_null())
                    .col(ColumnDef::new(Artist::City).string_len(120).not_null())
                    .col(ColumnDef::new(Artist::State).string_len(120).not_null())
                    .col(ColumnDef::new(Artist::Phone).string_len(120))
                    .col(ColumnDef::new(Artist::ImageLink).string_len(500))
                    .col(ColumnDef::new(Artist::Genres).json().not_null())
                    .col(ColumnDef::new(Artist::FacebookLink).string_len(120))
                    .col(ColumnDef::new(Artist::WebsiteLink).string_len(120))
                    .col(
                        ColumnDef::new(Artist::SeekingVenue)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Artist::SeekingDescription).string_len(500))
                    .to_owned(),
            )
            .await?;

        // Create shows table joining venues and artists
        manager
            .create_table(
                Table::create()
                    .table(Show::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Show::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Show::VenueId).integer().not_null())
                    .col(ColumnDef::new(Show::ArtistId).integer().not_null())
                    .col(
                        ColumnDef::new(Show::StartTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shows_venue_id")
                            .from(Show::Table, Show::VenueId)
                            .to(Venue::Table, Venue::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shows_artist_id")
                            .from(Show::Table, Show::ArtistId)
                            .to(Artist::Table, Artist::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_shows_venue_id")
                    .table(Show::Table)
                    .col(Show::VenueId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_shows_artist_id")
                    .table(Show::Table)
                    .col(Show::ArtistId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order
        manager
            .drop_table(Table::drop().table(Show::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Artist::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Venue::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Venue {
    #[sea_orm(iden = "venues")]
    Table,
    Id,
    Name,
    City,
    State,
    Address,
    Phone,
    ImageLink,
    Genres,
    FacebookLink,
    WebsiteLink,
    SeekingTalent,
    SeekingDescription,
}

#[derive(DeriveIden)]
enum Artist {
    #[sea_orm(iden = "artists")]
    Table,
    Id,
    Name,
    City,
    State,
    Phone,
    ImageLink,
    Genres,
    FacebookLink,
    WebsiteLink,
    SeekingVenue,
    SeekingDescription,
}

#[derive(DeriveIden)]
enum Show {
    #[sea_orm(iden = "shows")]
    Table,
    Id,
    VenueId,
    ArtistId,
    StartTime,
}
