use anyhow::{Context, Result};
use clap::Parser;
use std::env;

/// Cookie the auth provider sets on login.
pub const DEFAULT_SESSION_COOKIE: &str = "better-auth.session_token";

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
    pub session_cookie: String,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Marketplace product catalog API")]
pub struct Args {
    /// Host to bind to (overrides MARKET_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides MARKET_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Database URL (overrides MARKET_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Pool size (overrides MARKET_MAX_CONNECTIONS)
    #[arg(long)]
    pub max_connections: Option<u32>,

    /// Name of the session cookie (overrides MARKET_SESSION_COOKIE)
    #[arg(long)]
    pub session_cookie: Option<String>,

    /// Run migrations and exit
    #[arg(long)]
    pub migrate: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and migrate flag.
    pub fn from_env_and_args() -> Result<(Self, bool)> {
        let args = Args::parse();
        let migrate = args.migrate;
        Ok((Self::merge(args, |key| env::var(key))?, migrate))
    }

    /// CLI values win over environment values, which win over defaults.
    fn merge<F>(args: Args, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let env_host = lookup("MARKET_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = parse_var(&lookup, "MARKET_PORT", 3000u16)?;
        let env_db = lookup("MARKET_DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./data/market.db".into());
        let env_max_conn = parse_var(&lookup, "MARKET_MAX_CONNECTIONS", 5u32)?;
        let env_cookie =
            lookup("MARKET_SESSION_COOKIE").unwrap_or_else(|_| DEFAULT_SESSION_COOKIE.into());

        Ok(Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            database_url: args.database_url.unwrap_or(env_db),
            max_connections: args.max_connections.unwrap_or(env_max_conn).max(1),
            session_cookie: args.session_cookie.unwrap_or(env_cookie),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Result<String, env::VarError>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Ok(value) => value
            .parse::<T>()
            .with_context(|| format!("parsing {} value `{}`", key, value)),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(err) => Err(err).with_context(|| format!("reading {}", key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_in(
        vars: HashMap<&'static str, &'static str>,
    ) -> impl Fn(&str) -> Result<String, env::VarError> {
        move |key| {
            vars.get(key)
                .map(|v| v.to_string())
                .ok_or(env::VarError::NotPresent)
        }
    }

    #[test]
    fn defaults_apply_without_env_or_args() {
        let cfg = AppConfig::merge(Args::default(), lookup_in(HashMap::new())).unwrap();
        assert_eq!(cfg.addr(), "0.0.0.0:3000");
        assert_eq!(cfg.max_connections, 5);
        assert_eq!(cfg.session_cookie, DEFAULT_SESSION_COOKIE);
    }

    #[test]
    fn args_override_env() {
        let env = lookup_in(HashMap::from([("MARKET_PORT", "8080"), ("MARKET_HOST", "::")]));
        let args = Args {
            port: Some(9090),
            ..Default::default()
        };
        let cfg = AppConfig::merge(args, env).unwrap();
        assert_eq!(cfg.port, 9090);
        assert_eq!(cfg.host, "::");
    }

    #[test]
    fn bad_port_is_reported() {
        let env = lookup_in(HashMap::from([("MARKET_PORT", "eighty")]));
        let err = AppConfig::merge(Args::default(), env).unwrap_err();
        assert!(err.to_string().contains("MARKET_PORT"));
    }
}
