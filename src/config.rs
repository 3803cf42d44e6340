use std::env;
use std::path::PathBuf;

use actix_web::cookie::Key;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_ENTRY_STORE: &str = "data/entries.json";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
const DEFAULT_MAX_CONNECTIONS: u32 = 8;

/// Server settings read from the environment (and `.env`, when present).
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub session_key: Key,
    pub entry_store_path: PathBuf,
    pub people_roster_path: Option<PathBuf>,
    pub admin_password: String,
    pub db_max_connections: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        if let Err(e) = dotenvy::dotenv() {
            log::debug!("No .env file loaded: {e}");
        }

        let database_url =
            env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let db_max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(val) => val
                .parse::<u32>()
                .map_err(|_| format!("DB_MAX_CONNECTIONS is not a number: {val}"))?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        let admin_password = env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
            log::warn!("No ADMIN_PASSWORD set, seeding the default admin password");
            DEFAULT_ADMIN_PASSWORD.to_string()
        });

        Ok(Self {
            database_url,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            session_key: session_key(),
            entry_store_path: env::var("ENTRY_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_ENTRY_STORE)),
            people_roster_path: env::var("PEOPLE_ROSTER_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            admin_password,
            db_max_connections,
        })
    }
}

/// Session encryption key from SESSION_KEY; a random key otherwise, which
/// invalidates sessions on restart.
fn session_key() -> Key {
    match env::var("SESSION_KEY") {
        Ok(val) if val.len() >= 64 => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        Ok(val) => {
            log::warn!("SESSION_KEY too short ({} bytes, need 64+), generating random key", val.len());
            Key::generate()
        }
        Err(_) => {
            log::warn!("No SESSION_KEY set, generating random key (sessions lost on restart)");
            Key::generate()
        }
    }
}
