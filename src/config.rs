use crate::i18n::Language;
use anyhow::{bail, Result};

pub const DEFAULT_SESSION_COOKIE: &str = "locale_switch_session";
pub const DEFAULT_SESSION_LIFETIME_MINUTES: i64 = 120;

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,

    // Locale
    pub default_locale: Language,
    pub fallback_locale: Option<Language>,
    pub lang_path: String,

    // Session
    pub session_cookie_name: String,
    pub session_lifetime_minutes: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let default_locale = parse_locale("APP_LOCALE", &env_or("APP_LOCALE", "en"))?;

        let fallback_locale = match std::env::var("APP_FALLBACK_LOCALE") {
            Ok(code) if !code.trim().is_empty() => {
                Some(parse_locale("APP_FALLBACK_LOCALE", code.trim())?)
            }
            _ => None,
        };

        Ok(Self {
            // Server
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),

            // Locale
            default_locale,
            fallback_locale,
            lang_path: env_or("LANG_PATH", "lang"),

            // Session
            session_cookie_name: env_or("SESSION_COOKIE_NAME", DEFAULT_SESSION_COOKIE),
            session_lifetime_minutes: std::env::var("SESSION_LIFETIME_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|minutes: &i64| {
                    *minutes > 0 && chrono::Duration::try_minutes(*minutes).is_some()
                })
                .unwrap_or(DEFAULT_SESSION_LIFETIME_MINUTES),
        })
    }

    /// Session idle lifetime as a `chrono` duration.
    ///
    /// Values too large for a `chrono::Duration` fall back to the default.
    pub fn session_lifetime(&self) -> chrono::Duration {
        chrono::Duration::try_minutes(self.session_lifetime_minutes)
            .filter(|lifetime| *lifetime > chrono::Duration::zero())
            .unwrap_or_else(|| chrono::Duration::minutes(DEFAULT_SESSION_LIFETIME_MINUTES))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            default_locale: Language::En,
            fallback_locale: None,
            lang_path: "lang".to_string(),
            session_cookie_name: DEFAULT_SESSION_COOKIE.to_string(),
            session_lifetime_minutes: DEFAULT_SESSION_LIFETIME_MINUTES,
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_locale(var: &str, code: &str) -> Result<Language> {
    let Some(language) = Language::from_code(code) else {
        bail!("{} must be one of en, es, it, pt (got '{}')", var, code);
    };
    Ok(language)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 6] = [
        "PORT",
        "APP_LOCALE",
        "APP_FALLBACK_LOCALE",
        "LANG_PATH",
        "SESSION_COOKIE_NAME",
        "SESSION_LIFETIME_MINUTES",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        let config = Config::from_env().expect("Should load defaults");

        assert_eq!(config.port, 8080);
        assert_eq!(config.default_locale, Language::En);
        assert_eq!(config.fallback_locale, None);
        assert_eq!(config.lang_path, "lang");
        assert_eq!(config.session_cookie_name, DEFAULT_SESSION_COOKIE);
        assert_eq!(config.session_lifetime_minutes, 120);
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var("PORT", "3000");
        std::env::set_var("APP_LOCALE", "es");
        std::env::set_var("APP_FALLBACK_LOCALE", "en");
        std::env::set_var("LANG_PATH", "/srv/app/lang");
        std::env::set_var("SESSION_LIFETIME_MINUTES", "30");

        let config = Config::from_env().expect("Should load");
        clear_env();

        assert_eq!(config.port, 3000);
        assert_eq!(config.default_locale, Language::Es);
        assert_eq!(config.fallback_locale, Some(Language::En));
        assert_eq!(config.lang_path, "/srv/app/lang");
        assert_eq!(config.session_lifetime(), chrono::Duration::minutes(30));
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_default_locale() {
        clear_env();
        std::env::set_var("APP_LOCALE", "xx");

        let result = Config::from_env();
        clear_env();

        let err = result.unwrap_err().to_string();
        assert!(err.contains("APP_LOCALE"));
        assert!(err.contains("xx"));
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_fallback_locale() {
        clear_env();
        std::env::set_var("APP_FALLBACK_LOCALE", "fr");

        let result = Config::from_env();
        clear_env();

        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_bad_numbers_use_defaults() {
        clear_env();
        std::env::set_var("PORT", "not-a-port");
        std::env::set_var("SESSION_LIFETIME_MINUTES", "-5");

        let config = Config::from_env().expect("Should load");
        clear_env();

        assert_eq!(config.port, 8080);
        assert_eq!(config.session_lifetime_minutes, 120);
    }

    #[test]
    #[serial]
    fn test_from_env_huge_lifetime_uses_default() {
        clear_env();
        std::env::set_var("SESSION_LIFETIME_MINUTES", i64::MAX.to_string());

        let config = Config::from_env().expect("Should load");
        clear_env();

        assert_eq!(config.session_lifetime_minutes, 120);
        assert_eq!(config.session_lifetime(), chrono::Duration::minutes(120));
    }

    #[test]
    fn test_session_lifetime_out_of_range_field() {
        let config = Config {
            session_lifetime_minutes: i64::MAX,
            ..Config::default()
        };
        assert_eq!(config.session_lifetime(), chrono::Duration::minutes(120));

        let config = Config {
            session_lifetime_minutes: 0,
            ..Config::default()
        };
        assert_eq!(config.session_lifetime(), chrono::Duration::minutes(120));
    }
}
