use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{EntityKind, Error, Result};
use crate::models::{Film, FilmId, NewFilm, UserId};
use crate::store::{FilmStore, ReferenceStore, UserStore};

#[derive(Clone)]
pub struct FilmService {
    films: Arc<dyn FilmStore>,
    users: Arc<dyn UserStore>,
    reference: Arc<dyn ReferenceStore>,
}

impl FilmService {
    pub fn new(
        films: Arc<dyn FilmStore>,
        users: Arc<dyn UserStore>,
        reference: Arc<dyn ReferenceStore>,
    ) -> Self {
        Self { films, users, reference }
    }

    pub async fn create(&self, film: NewFilm) -> Result<Film> {
        debug!(title = %film.title, "creating film");
        self.check_references(&film).await?;
        let film = self.films.create(film).await?;
        info!(film_id = film.id, "created film");
        Ok(film)
    }

    pub async fn update(&self, id: FilmId, film: NewFilm) -> Result<Film> {
        debug!(film_id = id, "updating film");
        self.ensure_film(id).await?;
        self.check_references(&film).await?;
        let film = self.films.replace(id, film).await?;
        info!(film_id = id, "updated film");
        Ok(film)
    }

    pub async fn get(&self, id: FilmId) -> Result<Film> {
        self.films.get(id).await
    }

    pub async fn list(&self) -> Result<Vec<Film>> {
        self.films.list().await
    }

    pub async fn popular(&self, count: u64) -> Result<Vec<Film>> {
        debug!(count, "fetching popular films");
        self.films.popular(count).await
    }

    pub async fn add_like(&self, film_id: FilmId, user_id: UserId) -> Result<()> {
        self.ensure_film(film_id).await?;
        self.ensure_user(user_id).await?;
        self.films.add_like(film_id, user_id).await?;
        info!(film_id, user_id, "added like");
        Ok(())
    }

    pub async fn remove_like(&self, film_id: FilmId, user_id: UserId) -> Result<()> {
        self.ensure_film(film_id).await?;
        self.ensure_user(user_id).await?;
        self.films.remove_like(film_id, user_id).await?;
        info!(film_id, user_id, "removed like");
        Ok(())
    }

    pub async fn like_count(&self, film_id: FilmId) -> Result<u64> {
        self.ensure_film(film_id).await?;
        self.films.like_count(film_id).await
    }

    async fn ensure_film(&self, id: FilmId) -> Result<()> {
        if self.films.exists(id).await? {
            Ok(())
        } else {
            warn!(film_id = id, "film not found");
            Err(Error::not_found(EntityKind::Film, id))
        }
    }

    async fn ensure_user(&self, id: UserId) -> Result<()> {
        if self.users.exists(id).await? {
            Ok(())
        } else {
            warn!(user_id = id, "user not found");
            Err(Error::not_found(EntityKind::User, id))
        }
    }

    // Reference checks run before any row is written, so a rejected film
    // leaves no trace.
    async fn check_references(&self, film: &NewFilm) -> Result<()> {
        for &genre in &film.genres {
            if !self.reference.genre_exists(genre).await? {
                warn!(genre_id = genre, "unknown genre reference");
                return Err(Error::invalid_reference(EntityKind::Genre, i64::from(genre)));
            }
        }
        if !self.reference.age_rating_exists(film.age_rating_id).await? {
            warn!(age_rating_id = film.age_rating_id, "unknown age rating reference");
            return Err(Error::invalid_reference(
                EntityKind::AgeRating,
                i64::from(film.age_rating_id),
            ));
        }
        Ok(())
    }
}
