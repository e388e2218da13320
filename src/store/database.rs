use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use jiff::civil::Date;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, Statement, TransactionTrait,
};

use crate::entities::{age_ratings, film_genres, films, friendships, genres, likes, users};
use crate::error::{EntityKind, Error, Result};
use crate::models::{
    AgeRating, AgeRatingId, Film, FilmId, Genre, GenreId, NewFilm, NewUser, User, UserId,
};
use crate::store::{FilmStore, ReferenceStore, UserStore};

fn parse_date(raw: &str) -> Result<Date> {
    raw.parse()
        .map_err(|e: jiff::Error| Error::Db(DbErr::Custom(format!("bad stored date `{raw}`: {e}"))))
}

fn film_from_parts(model: films::Model, genres: Vec<GenreId>) -> Result<Film> {
    Ok(Film {
        id: model.id,
        title: model.title,
        description: model.description,
        release_date: parse_date(&model.release_date)?,
        duration_minutes: model.duration_minutes,
        age_rating_id: model.age_rating_id,
        genres,
    })
}

fn user_from_model(model: users::Model) -> Result<User> {
    Ok(User {
        id: model.id,
        email: model.email,
        login: model.login,
        name: model.name,
        birthday: parse_date(&model.birthday)?,
    })
}

#[derive(Clone)]
pub struct DbFilmStore {
    db: DatabaseConnection,
}

impl DbFilmStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn genres_of<C: ConnectionTrait>(&self, conn: &C, film: FilmId) -> Result<Vec<GenreId>> {
        let rows = film_genres::Entity::find()
            .filter(film_genres::Column::FilmId.eq(film))
            .order_by_asc(film_genres::Column::Position)
            .all(conn)
            .await?;
        Ok(rows.into_iter().map(|r| r.genre_id).collect())
    }

    /// Genre lists for many films at once, keyed by film id.
    async fn genres_of_all(&self, film_ids: &[FilmId]) -> Result<HashMap<FilmId, Vec<GenreId>>> {
        let rows = film_genres::Entity::find()
            .filter(film_genres::Column::FilmId.is_in(film_ids.iter().copied()))
            .order_by_asc(film_genres::Column::FilmId)
            .order_by_asc(film_genres::Column::Position)
            .all(&self.db)
            .await?;

        let mut by_film: HashMap<FilmId, Vec<GenreId>> = HashMap::new();
        for row in rows {
            by_film.entry(row.film_id).or_default().push(row.genre_id);
        }
        Ok(by_film)
    }

    async fn write_genres<C: ConnectionTrait>(
        &self,
        conn: &C,
        film: FilmId,
        genres: &[GenreId],
    ) -> Result<()> {
        for (position, genre) in genres.iter().enumerate() {
            let row = film_genres::ActiveModel {
                film_id: Set(film),
                genre_id: Set(*genre),
                position: Set(position as i32),
            };
            // Duplicate genre ids in one submission collapse to one row.
            film_genres::Entity::insert(row)
                .on_conflict(
                    OnConflict::columns([
                        film_genres::Column::FilmId,
                        film_genres::Column::GenreId,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(conn)
                .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl FilmStore for DbFilmStore {
    async fn create(&self, film: NewFilm) -> Result<Film> {
        let txn = self.db.begin().await?;

        let row = films::ActiveModel {
            id: Default::default(),
            title: Set(film.title.clone()),
            description: Set(film.description.clone()),
            release_date: Set(film.release_date.to_string()),
            duration_minutes: Set(film.duration_minutes),
            age_rating_id: Set(film.age_rating_id),
        };
        let id = films::Entity::insert(row).exec(&txn).await?.last_insert_id;

        self.write_genres(&txn, id, &film.genres).await?;
        txn.commit().await?;

        Ok(Film {
            id,
            title: film.title,
            description: film.description,
            release_date: film.release_date,
            duration_minutes: film.duration_minutes,
            age_rating_id: film.age_rating_id,
            genres: film.genres,
        })
    }

    async fn replace(&self, id: FilmId, film: NewFilm) -> Result<Film> {
        let txn = self.db.begin().await?;

        if films::Entity::find_by_id(id).one(&txn).await?.is_none() {
            return Err(Error::not_found(EntityKind::Film, id));
        }

        let row = films::ActiveModel {
            id: Set(id),
            title: Set(film.title.clone()),
            description: Set(film.description.clone()),
            release_date: Set(film.release_date.to_string()),
            duration_minutes: Set(film.duration_minutes),
            age_rating_id: Set(film.age_rating_id),
        };
        row.update(&txn).await?;

        film_genres::Entity::delete_many()
            .filter(film_genres::Column::FilmId.eq(id))
            .exec(&txn)
            .await?;
        self.write_genres(&txn, id, &film.genres).await?;

        txn.commit().await?;

        Ok(Film {
            id,
            title: film.title,
            description: film.description,
            release_date: film.release_date,
            duration_minutes: film.duration_minutes,
            age_rating_id: film.age_rating_id,
            genres: film.genres,
        })
    }

    async fn get(&self, id: FilmId) -> Result<Film> {
        let Some(model) = films::Entity::find_by_id(id).one(&self.db).await? else {
            return Err(Error::not_found(EntityKind::Film, id));
        };
        let genres = self.genres_of(&self.db, id).await?;
        film_from_parts(model, genres)
    }

    async fn list(&self) -> Result<Vec<Film>> {
        let models = films::Entity::find().all(&self.db).await?;
        let ids: Vec<FilmId> = models.iter().map(|m| m.id).collect();
        let mut genres = self.genres_of_all(&ids).await?;

        models
            .into_iter()
            .map(|m| {
                let film_genres = genres.remove(&m.id).unwrap_or_default();
                film_from_parts(m, film_genres)
            })
            .collect()
    }

    async fn exists(&self, id: FilmId) -> Result<bool> {
        Ok(films::Entity::find_by_id(id).count(&self.db).await? > 0)
    }

    async fn popular(&self, count: u64) -> Result<Vec<Film>> {
        let sql = "SELECT f.id, f.title, f.description, f.release_date, \
                   f.duration_minutes, f.age_rating_id \
                   FROM films AS f \
                   LEFT JOIN likes AS l ON l.film_id = f.id \
                   GROUP BY f.id \
                   ORDER BY COUNT(l.user_id) DESC, f.id ASC \
                   LIMIT ?";
        let limit = i64::try_from(count).unwrap_or(i64::MAX);
        let models = films::Entity::find()
            .from_raw_sql(Statement::from_sql_and_values(
                self.db.get_database_backend(),
                sql,
                [limit.into()],
            ))
            .all(&self.db)
            .await?;

        let ids: Vec<FilmId> = models.iter().map(|m| m.id).collect();
        let mut genres = self.genres_of_all(&ids).await?;

        models
            .into_iter()
            .map(|m| {
                let film_genres = genres.remove(&m.id).unwrap_or_default();
                film_from_parts(m, film_genres)
            })
            .collect()
    }

    async fn add_like(&self, film: FilmId, user: UserId) -> Result<()> {
        let row = likes::ActiveModel { film_id: Set(film), user_id: Set(user) };
        likes::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([likes::Column::FilmId, likes::Column::UserId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }

    async fn remove_like(&self, film: FilmId, user: UserId) -> Result<()> {
        likes::Entity::delete_many()
            .filter(likes::Column::FilmId.eq(film))
            .filter(likes::Column::UserId.eq(user))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn like_count(&self, film: FilmId) -> Result<u64> {
        Ok(likes::Entity::find()
            .filter(likes::Column::FilmId.eq(film))
            .count(&self.db)
            .await?)
    }
}

#[derive(Clone)]
pub struct DbUserStore {
    db: DatabaseConnection,
}

impl DbUserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for DbUserStore {
    async fn create(&self, user: NewUser) -> Result<User> {
        let name = user.display_name();
        let row = users::ActiveModel {
            id: Default::default(),
            email: Set(user.email.clone()),
            login: Set(user.login.clone()),
            name: Set(name.clone()),
            birthday: Set(user.birthday.to_string()),
        };
        let id = users::Entity::insert(row).exec(&self.db).await?.last_insert_id;

        Ok(User { id, email: user.email, login: user.login, name, birthday: user.birthday })
    }

    async fn replace(&self, id: UserId, user: NewUser) -> Result<User> {
        if users::Entity::find_by_id(id).one(&self.db).await?.is_none() {
            return Err(Error::not_found(EntityKind::User, id));
        }

        let name = user.display_name();
        let row = users::ActiveModel {
            id: Set(id),
            email: Set(user.email.clone()),
            login: Set(user.login.clone()),
            name: Set(name.clone()),
            birthday: Set(user.birthday.to_string()),
        };
        row.update(&self.db).await?;

        Ok(User { id, email: user.email, login: user.login, name, birthday: user.birthday })
    }

    async fn get(&self, id: UserId) -> Result<User> {
        let Some(model) = users::Entity::find_by_id(id).one(&self.db).await? else {
            return Err(Error::not_found(EntityKind::User, id));
        };
        user_from_model(model)
    }

    async fn list(&self) -> Result<Vec<User>> {
        let models = users::Entity::find().all(&self.db).await?;
        models.into_iter().map(user_from_model).collect()
    }

    async fn exists(&self, id: UserId) -> Result<bool> {
        Ok(users::Entity::find_by_id(id).count(&self.db).await? > 0)
    }

    async fn add_friend(&self, a: UserId, b: UserId) -> Result<()> {
        let txn = self.db.begin().await?;
        for (user, friend) in [(a, b), (b, a)] {
            let row = friendships::ActiveModel { user_id: Set(user), friend_id: Set(friend) };
            friendships::Entity::insert(row)
                .on_conflict(
                    OnConflict::columns([
                        friendships::Column::UserId,
                        friendships::Column::FriendId,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(&txn)
                .await?;
        }
        txn.commit().await?;
        Ok(())
    }

    async fn remove_friend(&self, a: UserId, b: UserId) -> Result<()> {
        let txn = self.db.begin().await?;
        for (user, friend) in [(a, b), (b, a)] {
            friendships::Entity::delete_many()
                .filter(friendships::Column::UserId.eq(user))
                .filter(friendships::Column::FriendId.eq(friend))
                .exec(&txn)
                .await?;
        }
        txn.commit().await?;
        Ok(())
    }

    async fn friend_ids(&self, user: UserId) -> Result<HashSet<UserId>> {
        let rows = friendships::Entity::find()
            .filter(friendships::Column::UserId.eq(user))
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|r| r.friend_id).collect())
    }

    async fn friends(&self, user: UserId) -> Result<Vec<User>> {
        let sql = "SELECT u.id, u.email, u.login, u.name, u.birthday \
                   FROM users AS u \
                   JOIN friendships AS f ON f.friend_id = u.id \
                   WHERE f.user_id = ?";
        let models = users::Entity::find()
            .from_raw_sql(Statement::from_sql_and_values(
                self.db.get_database_backend(),
                sql,
                [user.into()],
            ))
            .all(&self.db)
            .await?;
        models.into_iter().map(user_from_model).collect()
    }

    async fn common_friends(&self, a: UserId, b: UserId) -> Result<Vec<User>> {
        let sql = "SELECT u.id, u.email, u.login, u.name, u.birthday \
                   FROM users AS u \
                   JOIN friendships AS f1 ON f1.friend_id = u.id \
                   JOIN friendships AS f2 ON f2.friend_id = u.id \
                   WHERE f1.user_id = ? AND f2.user_id = ?";
        let models = users::Entity::find()
            .from_raw_sql(Statement::from_sql_and_values(
                self.db.get_database_backend(),
                sql,
                [a.into(), b.into()],
            ))
            .all(&self.db)
            .await?;
        models.into_iter().map(user_from_model).collect()
    }
}

#[derive(Clone)]
pub struct DbReferenceStore {
    db: DatabaseConnection,
}

impl DbReferenceStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReferenceStore for DbReferenceStore {
    async fn genres(&self) -> Result<Vec<Genre>> {
        let rows = genres::Entity::find()
            .order_by_asc(genres::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|r| Genre { id: r.id, name: r.name }).collect())
    }

    async fn genre(&self, id: GenreId) -> Result<Option<Genre>> {
        let row = genres::Entity::find_by_id(id).one(&self.db).await?;
        Ok(row.map(|r| Genre { id: r.id, name: r.name }))
    }

    async fn genre_exists(&self, id: GenreId) -> Result<bool> {
        Ok(genres::Entity::find_by_id(id).count(&self.db).await? > 0)
    }

    async fn age_ratings(&self) -> Result<Vec<AgeRating>> {
        let rows = age_ratings::Entity::find()
            .order_by_asc(age_ratings::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|r| AgeRating { id: r.id, name: r.name }).collect())
    }

    async fn age_rating(&self, id: AgeRatingId) -> Result<Option<AgeRating>> {
        let row = age_ratings::Entity::find_by_id(id).one(&self.db).await?;
        Ok(row.map(|r| AgeRating { id: r.id, name: r.name }))
    }

    async fn age_rating_exists(&self, id: AgeRatingId) -> Result<bool> {
        Ok(age_ratings::Entity::find_by_id(id).count(&self.db).await? > 0)
    }
}
