pub mod age_ratings;
pub mod film_genres;
pub mod films;
pub mod friendships;
pub mod genres;
pub mod likes;
pub mod users;
