use std::env;
use secrecy::SecretString;

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: SecretString,
    pub mongo_db_name: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub cors_allowed_origin: String,
    pub default_quiz_length: i64,
    pub default_options_per_question: i16,
    /// Fixed seed for the snippet sampler. Unset means seeded from entropy.
    pub sampler_seed: Option<u64>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            mongo_conn_string: SecretString::from(
                env::var("MONGO_CONN_STRING")
                    .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            ),
            mongo_db_name: env::var("MONGO_DB_NAME")
                .unwrap_or_else(|_| "mastery-local".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            default_quiz_length: env::var("DEFAULT_QUIZ_LENGTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(20),
            default_options_per_question: env::var("DEFAULT_OPTIONS_PER_QUESTION")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(4),
            sampler_seed: env::var("SAMPLER_SEED").ok().and_then(|s| s.parse().ok()),
        }
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.web_server_host.clone(), self.web_server_port)
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: SecretString::from("mongodb://localhost:27017".to_string()),
            mongo_db_name: "mastery-test".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            cors_allowed_origin: "http://localhost:3000".to_string(),
            default_quiz_length: 20,
            default_options_per_question: 4,
            sampler_seed: Some(42),
        }
    }
}
