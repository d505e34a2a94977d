use jsonwebtoken::Algorithm;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
    #[error("{key} must use an HMAC algorithm (HS256, HS384, HS512), got {value}")]
    UnsupportedAlgorithm { key: &'static str, value: String },
    #[error("JWT_ACCESS_SECRET and JWT_REFRESH_SECRET must differ")]
    SharedSecret,
}

/// Signing settings for one token class.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClassConfig {
    pub secret: String,
    pub algorithm: Algorithm,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub issuer: String,
    pub audience: String,
    pub access: TokenClassConfig,
    pub refresh: TokenClassConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.into());

        let access = TokenClassConfig {
            secret: required("JWT_ACCESS_SECRET")?,
            algorithm: parse_algorithm(&lookup, "JWT_ACCESS_ALGORITHM")?,
            ttl_minutes: parse_ttl(&lookup, "JWT_ACCESS_TTL_MINUTES", 30)?,
        };
        let refresh = TokenClassConfig {
            secret: required("JWT_REFRESH_SECRET")?,
            algorithm: parse_algorithm(&lookup, "JWT_REFRESH_ALGORITHM")?,
            ttl_minutes: parse_ttl(&lookup, "JWT_REFRESH_TTL_MINUTES", 60 * 24 * 14)?,
        };
        if access.secret == refresh.secret {
            return Err(ConfigError::SharedSecret);
        }

        let port = or_default("APP_PORT", "8080");
        let port = port.parse::<u16>().map_err(|_| ConfigError::Invalid {
            key: "APP_PORT",
            value: port,
        })?;

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            host: or_default("APP_HOST", "0.0.0.0"),
            port,
            jwt: JwtConfig {
                issuer: or_default("JWT_ISSUER", "tagpress"),
                audience: or_default("JWT_AUDIENCE", "tagpress-users"),
                access,
                refresh,
            },
        })
    }
}

fn parse_algorithm<F>(lookup: &F, key: &'static str) -> Result<Algorithm, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key).unwrap_or_else(|| "HS256".into());
    match value.parse::<Algorithm>() {
        Ok(alg @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) => Ok(alg),
        Ok(_) => Err(ConfigError::UnsupportedAlgorithm { key, value }),
        Err(_) => Err(ConfigError::Invalid { key, value }),
    }
}

/// One year.
const MAX_TTL_MINUTES: i64 = 60 * 24 * 365;

fn parse_ttl<F>(lookup: &F, key: &'static str, default: i64) -> Result<i64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(key) else {
        return Ok(default);
    };
    match value.parse::<i64>() {
        Ok(minutes) if (1..=MAX_TTL_MINUTES).contains(&minutes) => Ok(minutes),
        _ => Err(ConfigError::Invalid { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const BASE: &[(&str, &str)] = &[
        ("DATABASE_URL", "postgres://localhost/tagpress"),
        ("JWT_ACCESS_SECRET", "access-secret"),
        ("JWT_REFRESH_SECRET", "refresh-secret"),
    ];

    #[test]
    fn defaults_apply_when_only_required_vars_set() {
        let cfg = AppConfig::from_lookup(lookup_from(BASE)).expect("config");
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.jwt.issuer, "tagpress");
        assert_eq!(cfg.jwt.access.ttl_minutes, 30);
        assert_eq!(cfg.jwt.refresh.ttl_minutes, 20160);
        assert_eq!(cfg.jwt.access.algorithm, Algorithm::HS256);
    }

    #[test]
    fn missing_secret_is_reported() {
        let err = AppConfig::from_lookup(lookup_from(&BASE[..2])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_REFRESH_SECRET")));
    }

    #[test]
    fn rejects_shared_secret() {
        let pairs = [
            ("DATABASE_URL", "postgres://localhost/tagpress"),
            ("JWT_ACCESS_SECRET", "same"),
            ("JWT_REFRESH_SECRET", "same"),
        ];
        let err = AppConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::SharedSecret));
    }

    #[test]
    fn rejects_asymmetric_algorithm_and_bad_ttl() {
        let mut pairs = BASE.to_vec();
        pairs.push(("JWT_ACCESS_ALGORITHM", "RS256"));
        let err = AppConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedAlgorithm { .. }));

        let mut pairs = BASE.to_vec();
        pairs.push(("JWT_REFRESH_TTL_MINUTES", "0"));
        let err = AppConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "JWT_REFRESH_TTL_MINUTES", .. }));
    }

    #[test]
    fn rejects_ttl_beyond_one_year() {
        let mut pairs = BASE.to_vec();
        pairs.push(("JWT_ACCESS_TTL_MINUTES", "9223372036854775807"));
        let err = AppConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "JWT_ACCESS_TTL_MINUTES", .. }));

        let mut pairs = BASE.to_vec();
        pairs.push(("JWT_REFRESH_TTL_MINUTES", "525600"));
        let cfg = AppConfig::from_lookup(lookup_from(&pairs)).expect("config");
        assert_eq!(cfg.jwt.refresh.ttl_minutes, MAX_TTL_MINUTES);
    }

    #[test]
    fn per_class_overrides_are_independent() {
        let mut pairs = BASE.to_vec();
        pairs.push(("JWT_REFRESH_ALGORITHM", "HS512"));
        pairs.push(("JWT_ACCESS_TTL_MINUTES", "5"));
        let cfg = AppConfig::from_lookup(lookup_from(&pairs)).expect("config");
        assert_eq!(cfg.jwt.access.algorithm, Algorithm::HS256);
        assert_eq!(cfg.jwt.refresh.algorithm, Algorithm::HS512);
        assert_eq!(cfg.jwt.access.ttl_minutes, 5);
        assert_eq!(cfg.jwt.refresh.ttl_minutes, 20160);
    }
}
