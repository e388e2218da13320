use anyhow::Context;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StorageBackend {
    Memory,
    Database,
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "database" | "db" => Ok(StorageBackend::Database),
            other => anyhow::bail!("unknown storage backend: {other}"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub storage: StorageBackend,
    pub database_url: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let storage = std::env::var("STORAGE")
            .unwrap_or_else(|_| "memory".to_string())
            .parse()
            .context("STORAGE")?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://reelmate.db?mode=rwc".to_string());

        Ok(Self { storage, database_url })
    }
}
