use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub allowed_origins: Vec<String>,
    pub ai: AiConfig,
}

/// Settings for the outbound text-completion provider. A missing API key is
/// not a startup error: roadmap endpoints report it as content instead.
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;
        let jwt_secret = env_required("JWT_SECRET")?;

        let host: IpAddr = env_or("PLANFORGE_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid PLANFORGE_HOST: {e}"))?;

        let port: u16 = env_or("PLANFORGE_PORT", "5000")
            .parse()
            .map_err(|e| format!("Invalid PLANFORGE_PORT: {e}"))?;

        let log_level = env_or("PLANFORGE_LOG_LEVEL", "info");

        let allowed_origins: Vec<String> = env_or(
            "PLANFORGE_ALLOWED_ORIGINS",
            "http://localhost:3000,http://localhost:5173",
        )
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

        let ai = AiConfig {
            api_key: std::env::var("TOGETHER_API_KEY").ok(),
            api_url: env_or("PLANFORGE_AI_URL", "https://api.together.xyz/inference"),
            model: env_or("PLANFORGE_AI_MODEL", "mistralai/Mixtral-8x7B-Instruct-v0.1"),
        };

        Ok(Config {
            database_url,
            jwt_secret,
            host,
            port,
            log_level,
            allowed_origins,
            ai,
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
