use anyhow::Context;

pub struct Config {
    /// Address the server binds to
    pub bind_addr: String,
    pub database_url: String,
    /// Secret the identity service signs viewer tokens with
    pub jwt_secret: String,
    /// Default tracing filter when RUST_LOG is unset
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Config> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt_secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
        let log_filter = std::env::var("LOG_FILTER")
            .unwrap_or_else(|_| "quill=debug,tower_http=debug".to_string());

        Ok(Config {
            bind_addr,
            database_url,
            jwt_secret,
            log_filter,
        })
    }
}
