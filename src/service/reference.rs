use std::sync::Arc;

use crate::error::{EntityKind, Error, Result};
use crate::models::{AgeRating, AgeRatingId, Genre, GenreId};
use crate::store::ReferenceStore;

#[derive(Clone)]
pub struct ReferenceService {
    reference: Arc<dyn ReferenceStore>,
}

impl ReferenceService {
    pub fn new(reference: Arc<dyn ReferenceStore>) -> Self {
        Self { reference }
    }

    pub async fn genres(&self) -> Result<Vec<Genre>> {
        self.reference.genres().await
    }

    pub async fn genre(&self, id: GenreId) -> Result<Genre> {
        self.reference
            .genre(id)
            .await?
            .ok_or_else(|| Error::not_found(EntityKind::Genre, i64::from(id)))
    }

    pub async fn age_ratings(&self) -> Result<Vec<AgeRating>> {
        self.reference.age_ratings().await
    }

    pub async fn age_rating(&self, id: AgeRatingId) -> Result<AgeRating> {
        self.reference
            .age_rating(id)
            .await?
            .ok_or_else(|| Error::not_found(EntityKind::AgeRating, i64::from(id)))
    }
}
