use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;

use crate::error::{EntityKind, Error, Result};
use crate::models::{
    AgeRating, AgeRatingId, Film, FilmId, Genre, GenreId, NewFilm, NewUser, User, UserId,
    default_age_ratings, default_genres,
};
use crate::ranking;
use crate::store::relations::{FriendshipSet, LikeSet};
use crate::store::{FilmStore, ReferenceStore, UserStore};

// Lock poisoning only happens if a writer panicked mid-operation; at that
// point the process is already lost, so unwrapping the guards is fine.
fn read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}

#[derive(Default)]
pub struct MemoryFilmStore {
    films: RwLock<HashMap<FilmId, Film>>,
    likes: RwLock<LikeSet>,
    next_id: AtomicI64,
}

impl MemoryFilmStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FilmStore for MemoryFilmStore {
    async fn create(&self, film: NewFilm) -> Result<Film> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let film = Film {
            id,
            title: film.title,
            description: film.description,
            release_date: film.release_date,
            duration_minutes: film.duration_minutes,
            age_rating_id: film.age_rating_id,
            genres: film.genres,
        };
        write(&self.films).insert(id, film.clone());
        Ok(film)
    }

    async fn replace(&self, id: FilmId, film: NewFilm) -> Result<Film> {
        let mut films = write(&self.films);
        if !films.contains_key(&id) {
            return Err(Error::not_found(EntityKind::Film, id));
        }
        let film = Film {
            id,
            title: film.title,
            description: film.description,
            release_date: film.release_date,
            duration_minutes: film.duration_minutes,
            age_rating_id: film.age_rating_id,
            genres: film.genres,
        };
        films.insert(id, film.clone());
        Ok(film)
    }

    async fn get(&self, id: FilmId) -> Result<Film> {
        read(&self.films)
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::not_found(EntityKind::Film, id))
    }

    async fn list(&self) -> Result<Vec<Film>> {
        Ok(read(&self.films).values().cloned().collect())
    }

    async fn exists(&self, id: FilmId) -> Result<bool> {
        Ok(read(&self.films).contains_key(&id))
    }

    async fn popular(&self, count: u64) -> Result<Vec<Film>> {
        let films: Vec<Film> = read(&self.films).values().cloned().collect();
        let counts = read(&self.likes).counts();
        Ok(ranking::rank_by_likes(films, &counts, count))
    }

    async fn add_like(&self, film: FilmId, user: UserId) -> Result<()> {
        write(&self.likes).add(film, user);
        Ok(())
    }

    async fn remove_like(&self, film: FilmId, user: UserId) -> Result<()> {
        write(&self.likes).remove(film, user);
        Ok(())
    }

    async fn like_count(&self, film: FilmId) -> Result<u64> {
        Ok(read(&self.likes).count(film))
    }
}

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<UserId, User>>,
    friendships: RwLock<FriendshipSet>,
    next_id: AtomicI64,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn resolve(&self, ids: HashSet<UserId>) -> Vec<User> {
        let users = read(&self.users);
        ids.into_iter().filter_map(|id| users.get(&id).cloned()).collect()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, user: NewUser) -> Result<User> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let name = user.display_name();
        let user = User {
            id,
            email: user.email,
            login: user.login,
            name,
            birthday: user.birthday,
        };
        write(&self.users).insert(id, user.clone());
        Ok(user)
    }

    async fn replace(&self, id: UserId, user: NewUser) -> Result<User> {
        let mut users = write(&self.users);
        if !users.contains_key(&id) {
            return Err(Error::not_found(EntityKind::User, id));
        }
        let name = user.display_name();
        let user = User {
            id,
            email: user.email,
            login: user.login,
            name,
            birthday: user.birthday,
        };
        users.insert(id, user.clone());
        Ok(user)
    }

    async fn get(&self, id: UserId) -> Result<User> {
        read(&self.users)
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::not_found(EntityKind::User, id))
    }

    async fn list(&self) -> Result<Vec<User>> {
        Ok(read(&self.users).values().cloned().collect())
    }

    async fn exists(&self, id: UserId) -> Result<bool> {
        Ok(read(&self.users).contains_key(&id))
    }

    async fn add_friend(&self, a: UserId, b: UserId) -> Result<()> {
        write(&self.friendships).add(a, b);
        Ok(())
    }

    async fn remove_friend(&self, a: UserId, b: UserId) -> Result<()> {
        write(&self.friendships).remove(a, b);
        Ok(())
    }

    async fn friend_ids(&self, user: UserId) -> Result<HashSet<UserId>> {
        Ok(read(&self.friendships).friends_of(user))
    }

    async fn friends(&self, user: UserId) -> Result<Vec<User>> {
        let ids = read(&self.friendships).friends_of(user);
        Ok(self.resolve(ids))
    }

    async fn common_friends(&self, a: UserId, b: UserId) -> Result<Vec<User>> {
        let ids = read(&self.friendships).common(a, b);
        Ok(self.resolve(ids))
    }
}

pub struct MemoryReferenceStore {
    genres: Vec<Genre>,
    age_ratings: Vec<AgeRating>,
}

impl MemoryReferenceStore {
    pub fn new() -> Self {
        Self { genres: default_genres(), age_ratings: default_age_ratings() }
    }
}

impl Default for MemoryReferenceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReferenceStore for MemoryReferenceStore {
    async fn genres(&self) -> Result<Vec<Genre>> {
        Ok(self.genres.clone())
    }

    async fn genre(&self, id: GenreId) -> Result<Option<Genre>> {
        Ok(self.genres.iter().find(|g| g.id == id).cloned())
    }

    async fn genre_exists(&self, id: GenreId) -> Result<bool> {
        Ok(self.genres.iter().any(|g| g.id == id))
    }

    async fn age_ratings(&self) -> Result<Vec<AgeRating>> {
        Ok(self.age_ratings.clone())
    }

    async fn age_rating(&self, id: AgeRatingId) -> Result<Option<AgeRating>> {
        Ok(self.age_ratings.iter().find(|r| r.id == id).cloned())
    }

    async fn age_rating_exists(&self, id: AgeRatingId) -> Result<bool> {
        Ok(self.age_ratings.iter().any(|r| r.id == id))
    }
}
