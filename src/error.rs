use thiserror::Error;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EntityKind {
    Film,
    User,
    Genre,
    AgeRating,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EntityKind::Film => "film",
            EntityKind::User => "user",
            EntityKind::Genre => "genre",
            EntityKind::AgeRating => "age rating",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: i64 },

    #[error("{kind} {id} does not exist")]
    InvalidReference { kind: EntityKind, id: i64 },

    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
}

impl Error {
    pub fn not_found(kind: EntityKind, id: i64) -> Self {
        Error::NotFound { kind, id }
    }

    pub fn invalid_reference(kind: EntityKind, id: i64) -> Self {
        Error::InvalidReference { kind, id }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
