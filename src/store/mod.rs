pub mod database;
pub mod memory;
pub mod relations;

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{Config, StorageBackend};
use crate::error::Result;
use crate::models::{
    AgeRating, AgeRatingId, Film, FilmId, Genre, GenreId, NewFilm, NewUser, User, UserId,
};

/// Film records plus the like relation they anchor. Implementations must be
/// safe under concurrent callers: ids are never handed out twice and every
/// mutation is atomic per key.
#[async_trait]
pub trait FilmStore: Send + Sync {
    async fn create(&self, film: NewFilm) -> Result<Film>;
    async fn replace(&self, id: FilmId, film: NewFilm) -> Result<Film>;
    async fn get(&self, id: FilmId) -> Result<Film>;
    async fn list(&self) -> Result<Vec<Film>>;
    async fn exists(&self, id: FilmId) -> Result<bool>;

    /// Top `count` films by like count, ties broken by ascending id.
    async fn popular(&self, count: u64) -> Result<Vec<Film>>;

    async fn add_like(&self, film: FilmId, user: UserId) -> Result<()>;
    async fn remove_like(&self, film: FilmId, user: UserId) -> Result<()>;
    async fn like_count(&self, film: FilmId) -> Result<u64>;
}

/// User records plus the friendship relation.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, user: NewUser) -> Result<User>;
    async fn replace(&self, id: UserId, user: NewUser) -> Result<User>;
    async fn get(&self, id: UserId) -> Result<User>;
    async fn list(&self) -> Result<Vec<User>>;
    async fn exists(&self, id: UserId) -> Result<bool>;

    async fn add_friend(&self, a: UserId, b: UserId) -> Result<()>;
    async fn remove_friend(&self, a: UserId, b: UserId) -> Result<()>;
    async fn friend_ids(&self, user: UserId) -> Result<HashSet<UserId>>;
    async fn friends(&self, user: UserId) -> Result<Vec<User>>;
    async fn common_friends(&self, a: UserId, b: UserId) -> Result<Vec<User>>;
}

/// Read-only genre and age-rating reference tables.
#[async_trait]
pub trait ReferenceStore: Send + Sync {
    async fn genres(&self) -> Result<Vec<Genre>>;
    async fn genre(&self, id: GenreId) -> Result<Option<Genre>>;
    async fn genre_exists(&self, id: GenreId) -> Result<bool>;
    async fn age_ratings(&self) -> Result<Vec<AgeRating>>;
    async fn age_rating(&self, id: AgeRatingId) -> Result<Option<AgeRating>>;
    async fn age_rating_exists(&self, id: AgeRatingId) -> Result<bool>;
}

#[derive(Clone)]
pub struct Stores {
    pub films: Arc<dyn FilmStore>,
    pub users: Arc<dyn UserStore>,
    pub reference: Arc<dyn ReferenceStore>,
}

impl Stores {
    pub fn in_memory() -> Self {
        Self {
            films: Arc::new(memory::MemoryFilmStore::new()),
            users: Arc::new(memory::MemoryUserStore::new()),
            reference: Arc::new(memory::MemoryReferenceStore::new()),
        }
    }

    pub fn database(db: sea_orm::DatabaseConnection) -> Self {
        Self {
            films: Arc::new(database::DbFilmStore::new(db.clone())),
            users: Arc::new(database::DbUserStore::new(db.clone())),
            reference: Arc::new(database::DbReferenceStore::new(db)),
        }
    }
}

/// Resolves the backend once at startup from configuration.
pub async fn connect(config: &Config) -> Result<Stores> {
    match config.storage {
        StorageBackend::Memory => Ok(Stores::in_memory()),
        StorageBackend::Database => {
            let db = crate::db::connect_and_migrate(&config.database_url).await?;
            Ok(Stores::database(db))
        },
    }
}
