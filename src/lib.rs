pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod models;
pub mod ranking;
pub mod service;
pub mod store;

pub use config::{Config, StorageBackend};
pub use error::{EntityKind, Error, Result};
pub use service::{FilmService, ReferenceService, UserService};
pub use store::Stores;

/// The engine's whole inbound surface: one service per aggregate, all
/// sharing the backend chosen at startup.
#[derive(Clone)]
pub struct Engine {
    pub films: FilmService,
    pub users: UserService,
    pub reference: ReferenceService,
}

impl Engine {
    pub async fn from_config(config: &Config) -> Result<Self> {
        let stores = store::connect(config).await?;
        Ok(Self::from_stores(stores))
    }

    pub fn from_stores(stores: Stores) -> Self {
        Self {
            films: FilmService::new(
                stores.films.clone(),
                stores.users.clone(),
                stores.reference.clone(),
            ),
            users: UserService::new(stores.users),
            reference: ReferenceService::new(stores.reference),
        }
    }
}

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,reelmate=debug,sqlx=warn".to_string()),
        )
        .init();
}
