use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Films::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Films::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(string(Films::Title))
                    .col(string(Films::Description))
                    .col(string(Films::ReleaseDate))
                    .col(integer(Films::DurationMinutes))
                    .col(integer(Films::AgeRatingId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(string(Users::Email))
                    .col(string(Users::Login))
                    .col(string(Users::Name))
                    .col(string(Users::Birthday))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Friendships::Table)
                    .if_not_exists()
                    .col(big_integer(Friendships::UserId))
                    .col(big_integer(Friendships::FriendId))
                    .primary_key(
                        Index::create().col(Friendships::UserId).col(Friendships::FriendId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Likes::Table)
                    .if_not_exists()
                    .col(big_integer(Likes::FilmId))
                    .col(big_integer(Likes::UserId))
                    .primary_key(Index::create().col(Likes::FilmId).col(Likes::UserId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Genres::Table)
                    .if_not_exists()
                    .col(integer(Genres::Id).primary_key())
                    .col(string(Genres::Name))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AgeRatings::Table)
                    .if_not_exists()
                    .col(integer(AgeRatings::Id).primary_key())
                    .col(string(AgeRatings::Name))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FilmGenres::Table)
                    .if_not_exists()
                    .col(big_integer(FilmGenres::FilmId))
                    .col(integer(FilmGenres::GenreId))
                    .col(integer(FilmGenres::Position))
                    .primary_key(Index::create().col(FilmGenres::FilmId).col(FilmGenres::GenreId))
                    .to_owned(),
            )
            .await?;

        let genres = [
            (1, "Comedy"),
            (2, "Drama"),
            (3, "Animation"),
            (4, "Thriller"),
            (5, "Documentary"),
            (6, "Action"),
        ];
        let mut insert = Query::insert()
            .into_table(Genres::Table)
            .columns([Genres::Id, Genres::Name])
            .to_owned();
        for (id, name) in genres {
            insert.values_panic([id.into(), name.into()]);
        }
        manager.exec_stmt(insert).await?;

        let ratings = [(1, "G"), (2, "PG"), (3, "PG-13"), (4, "R"), (5, "NC-17")];
        let mut insert = Query::insert()
            .into_table(AgeRatings::Table)
            .columns([AgeRatings::Id, AgeRatings::Name])
            .to_owned();
        for (id, name) in ratings {
            insert.values_panic([id.into(), name.into()]);
        }
        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(FilmGenres::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(AgeRatings::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Genres::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Likes::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Friendships::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Users::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Films::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Films {
    Table,
    Id,
    Title,
    Description,
    ReleaseDate,
    DurationMinutes,
    AgeRatingId,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    Login,
    Name,
    Birthday,
}

#[derive(DeriveIden)]
enum Friendships {
    Table,
    UserId,
    FriendId,
}

#[derive(DeriveIden)]
enum Likes {
    Table,
    FilmId,
    UserId,
}

#[derive(DeriveIden)]
enum Genres {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum AgeRatings {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum FilmGenres {
    Table,
    FilmId,
    GenreId,
    Position,
}
