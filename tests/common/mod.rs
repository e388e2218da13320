use reelmate::models::{NewFilm, NewUser};

pub fn film(title: &str) -> NewFilm {
    NewFilm {
        title: title.to_string(),
        description: format!("{title} description"),
        release_date: jiff::civil::date(1999, 3, 31),
        duration_minutes: 136,
        age_rating_id: 4,
        genres: vec![6, 4],
    }
}

pub fn user(login: &str) -> NewUser {
    NewUser {
        email: format!("{login}@example.com"),
        login: login.to_string(),
        name: None,
        birthday: jiff::civil::date(1990, 6, 15),
    }
}
