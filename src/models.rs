use jiff::civil::Date;
use serde::{Deserialize, Serialize};

pub type FilmId = i64;
pub type UserId = i64;
pub type GenreId = i32;
pub type AgeRatingId = i32;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AgeRating {
    pub id: AgeRatingId,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Film {
    pub id: FilmId,
    pub title: String,
    pub description: String,
    pub release_date: Date,
    pub duration_minutes: i32,
    pub age_rating_id: AgeRatingId,
    /// Genre references in submission order.
    pub genres: Vec<GenreId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewFilm {
    pub title: String,
    pub description: String,
    pub release_date: Date,
    pub duration_minutes: i32,
    pub age_rating_id: AgeRatingId,
    pub genres: Vec<GenreId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub login: String,
    pub name: String,
    pub birthday: Date,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub login: String,
    pub name: Option<String>,
    pub birthday: Date,
}

impl NewUser {
    /// Display name with the login fallback applied. Resolved when the
    /// record is written, never on read.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => self.login.clone(),
        }
    }
}

pub fn default_genres() -> Vec<Genre> {
    [
        (1, "Comedy"),
        (2, "Drama"),
        (3, "Animation"),
        (4, "Thriller"),
        (5, "Documentary"),
        (6, "Action"),
    ]
    .into_iter()
    .map(|(id, name)| Genre { id, name: name.to_string() })
    .collect()
}

pub fn default_age_ratings() -> Vec<AgeRating> {
    [(1, "G"), (2, "PG"), (3, "PG-13"), (4, "R"), (5, "NC-17")]
        .into_iter()
        .map(|(id, name)| AgeRating { id, name: name.to_string() })
        .collect()
}
