use crate::error::ConfigError;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Loads a dotenv file into the process environment. Variables that are already
/// set are left untouched.
pub fn load_env_file(path: Option<&Path>) -> Result<(), ConfigError> {
    match path {
        Some(path) => {
            dotenvy::from_path(path)?;
        }
        None => match dotenvy::dotenv() {
            Ok(_) => {}
            Err(err) if err.not_found() => {}
            Err(err) => return Err(err.into()),
        },
    }
    Ok(())
}

/// Reads a named variable; empty values count as unset.
pub trait Lookup {
    fn get(&self, name: &str) -> Option<String>;
}

pub struct ProcessEnv;

impl Lookup for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl<F> Lookup for F
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, name: &str) -> Option<String> {
        self(name)
    }
}

struct Reader<'a, L: Lookup + ?Sized> {
    lookup: &'a L,
    missing: Vec<&'static str>,
}

impl<'a, L: Lookup + ?Sized> Reader<'a, L> {
    fn new(lookup: &'a L) -> Self {
        Self {
            lookup,
            missing: Vec::new(),
        }
    }

    fn optional(&self, name: &'static str) -> Option<String> {
        self.lookup
            .get(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn required(&mut self, name: &'static str) -> String {
        match self.optional(name) {
            Some(value) => value,
            None => {
                self.missing.push(name);
                String::new()
            }
        }
    }

    fn finish<T>(self, value: T) -> Result<T, ConfigError> {
        if self.missing.is_empty() {
            Ok(value)
        } else {
            Err(ConfigError::Missing(self.missing))
        }
    }
}

#[derive(Debug, Clone)]
pub struct FacebookCredentials {
    pub page_id: String,
    pub page_access_token: String,
    pub instagram_account_id: Option<String>,
}

impl FacebookCredentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&ProcessEnv)
    }

    pub fn from_lookup<L: Lookup + ?Sized>(lookup: &L) -> Result<Self, ConfigError> {
        let mut reader = Reader::new(lookup);
        let page_access_token = reader.required("FACEBOOK_PAGE_ACCESS_TOKEN");
        let page_id = reader.required("FACEBOOK_PAGE_ID");
        let instagram_account_id = reader.optional("INSTAGRAM_ACCOUNT_ID");
        reader.finish(Self {
            page_id,
            page_access_token,
            instagram_account_id,
        })
    }
}

/// What a LinkedIn carousel does when none of its images could be registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyCarouselPolicy {
    #[default]
    Post,
    Fail,
}

impl EmptyCarouselPolicy {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.to_ascii_lowercase().as_str() {
            "post" => Ok(Self::Post),
            "fail" => Ok(Self::Fail),
            other => Err(ConfigError::Invalid {
                name: "LINKEDIN_EMPTY_CAROUSEL",
                message: format!("expected post or fail, got {other}"),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LinkedInCredentials {
    pub access_token: String,
    pub organization_id: String,
    pub empty_carousel: EmptyCarouselPolicy,
}

impl LinkedInCredentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&ProcessEnv)
    }

    pub fn from_lookup<L: Lookup + ?Sized>(lookup: &L) -> Result<Self, ConfigError> {
        let mut reader = Reader::new(lookup);
        let access_token = reader.required("LINKEDIN_ACCESS_TOKEN");
        let organization_id = reader.required("LINKEDIN_ORGANIZATION_ID");
        let empty_carousel = reader.optional("LINKEDIN_EMPTY_CAROUSEL");
        let credentials = reader.finish(Self {
            access_token,
            organization_id,
            empty_carousel: EmptyCarouselPolicy::default(),
        })?;
        Ok(match empty_carousel {
            Some(value) => Self {
                empty_carousel: EmptyCarouselPolicy::parse(&value)?,
                ..credentials
            },
            None => credentials,
        })
    }
}

#[derive(Debug, Clone)]
pub struct TelegramCredentials {
    pub bot_token: String,
    pub chat_id: String,
}

impl TelegramCredentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&ProcessEnv)
    }

    pub fn from_lookup<L: Lookup + ?Sized>(lookup: &L) -> Result<Self, ConfigError> {
        let mut reader = Reader::new(lookup);
        let bot_token = reader.required("TELEGRAM_BOT_TOKEN");
        let chat_id = reader.required("TELEGRAM_CHAT_ID");
        reader.finish(Self { bot_token, chat_id })
    }
}

pub fn http_timeout() -> Result<Duration, ConfigError> {
    http_timeout_from(&ProcessEnv)
}

fn http_timeout_from<L: Lookup + ?Sized>(lookup: &L) -> Result<Duration, ConfigError> {
    let reader = Reader::new(lookup);
    let Some(value) = reader.optional("SOCIAL_HTTP_TIMEOUT_SECS") else {
        return Ok(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS));
    };
    match value.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::Invalid {
            name: "SOCIAL_HTTP_TIMEOUT_SECS",
            message: format!("expected a positive number of seconds, got {value}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn facebook_lists_all_missing() {
        let err = FacebookCredentials::from_lookup(&env(&[])).expect_err("error");
        match err {
            ConfigError::Missing(names) => {
                assert_eq!(names, vec!["FACEBOOK_PAGE_ACCESS_TOKEN", "FACEBOOK_PAGE_ID"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn facebook_instagram_is_optional() {
        let credentials = FacebookCredentials::from_lookup(&env(&[
            ("FACEBOOK_PAGE_ACCESS_TOKEN", "token"),
            ("FACEBOOK_PAGE_ID", "42"),
        ]))
        .expect("credentials");
        assert_eq!(credentials.page_id, "42");
        assert!(credentials.instagram_account_id.is_none());
    }

    #[test]
    fn empty_values_count_as_missing() {
        let err = TelegramCredentials::from_lookup(&env(&[
            ("TELEGRAM_BOT_TOKEN", "  "),
            ("TELEGRAM_CHAT_ID", "-100"),
        ]))
        .expect_err("error");
        assert!(err.to_string().contains("TELEGRAM_BOT_TOKEN"));
        assert!(!err.to_string().contains("TELEGRAM_CHAT_ID"));
    }

    #[test]
    fn linkedin_policy_defaults_to_post() {
        let credentials = LinkedInCredentials::from_lookup(&env(&[
            ("LINKEDIN_ACCESS_TOKEN", "token"),
            ("LINKEDIN_ORGANIZATION_ID", "123"),
        ]))
        .expect("credentials");
        assert_eq!(credentials.empty_carousel, EmptyCarouselPolicy::Post);
    }

    #[test]
    fn linkedin_policy_can_fail() {
        let credentials = LinkedInCredentials::from_lookup(&env(&[
            ("LINKEDIN_ACCESS_TOKEN", "token"),
            ("LINKEDIN_ORGANIZATION_ID", "123"),
            ("LINKEDIN_EMPTY_CAROUSEL", "FAIL"),
        ]))
        .expect("credentials");
        assert_eq!(credentials.empty_carousel, EmptyCarouselPolicy::Fail);
    }

    #[test]
    fn linkedin_policy_rejects_unknown() {
        let err = LinkedInCredentials::from_lookup(&env(&[
            ("LINKEDIN_ACCESS_TOKEN", "token"),
            ("LINKEDIN_ORGANIZATION_ID", "123"),
            ("LINKEDIN_EMPTY_CAROUSEL", "maybe"),
        ]))
        .expect_err("error");
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn timeout_default_and_override() {
        assert_eq!(
            http_timeout_from(&env(&[])).expect("timeout"),
            Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS)
        );
        assert_eq!(
            http_timeout_from(&env(&[("SOCIAL_HTTP_TIMEOUT_SECS", "5")])).expect("timeout"),
            Duration::from_secs(5)
        );
        assert!(http_timeout_from(&env(&[("SOCIAL_HTTP_TIMEOUT_SECS", "0")])).is_err());
    }
}
