use std::time::Duration;

use secrecy::SecretString;

use crate::error::{Error, Result};

/// How rows come back from `Client::get_row` and `Client::get_results`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ResultShape {
    /// Driver rows, for typed access and `FromRow`.
    #[default]
    Structured,
    /// Ordered column name to value maps.
    Associative,
}

impl std::str::FromStr for ResultShape {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "object" | "structured" => Ok(Self::Structured),
            "assoc" | "associative" => Ok(Self::Associative),
            _ => Err(Error::InvalidSetting {
                key: "results".to_owned(),
                value: value.to_owned(),
            }),
        }
    }
}

/// Connection settings for a [`Client`](crate::Client).
#[derive(Debug)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: SecretString,
    pub database: String,
    pub result_shape: ResultShape,
    pub charset: String,
    pub query_timeout: Option<Duration>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "localhost".to_owned(),
            port: 3306,
            user: String::new(),
            password: SecretString::from(String::new()),
            database: String::new(),
            result_shape: ResultShape::Structured,
            charset: "utf8mb4".to_owned(),
            query_timeout: None,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings from string pairs such as a parsed config file or env.
    ///
    /// Recognized keys: `host`, `port`, `user`, `password`, `database`,
    /// `results`, `charset` and `timeout` (milliseconds, `0` disables it).
    /// Other keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut settings = Self::default();
        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                "host" => settings.host = value.to_owned(),
                "port" => settings.port = parse_setting(key, value)?,
                "user" => settings.user = value.to_owned(),
                "password" => settings.password = SecretString::from(value.to_owned()),
                "database" => settings.database = value.to_owned(),
                "results" => settings.result_shape = value.parse()?,
                "charset" => settings.charset = value.to_owned(),
                "timeout" => {
                    let millis: u64 = parse_setting(key, value)?;
                    settings.query_timeout = (millis > 0).then(|| Duration::from_millis(millis));
                }
                _ => tracing::debug!(key, "ignoring unknown setting"),
            }
        }
        Ok(settings)
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = SecretString::from(password.into());
        self
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn result_shape(mut self, shape: ResultShape) -> Self {
        self.result_shape = shape;
        self
    }

    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = charset.into();
        self
    }

    pub fn query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = Some(timeout);
        self
    }

    #[cfg(feature = "mysql")]
    pub fn connect_options(&self) -> sqlx::mysql::MySqlConnectOptions {
        use secrecy::ExposeSecret;

        let mut options = sqlx::mysql::MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .charset(&self.charset);
        let password = self.password.expose_secret();
        if !password.is_empty() {
            options = options.password(password);
        }
        if !self.database.is_empty() {
            options = options.database(&self.database);
        }
        options
    }
}

fn parse_setting<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| Error::InvalidSetting {
        key: key.to_owned(),
        value: value.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_from_pairs_ignores_unknown_keys() {
        let settings = Settings::from_pairs([
            ("host", "db.internal"),
            ("user", "root"),
            ("password", "root"),
            ("database", "yourmagicdatabase"),
            ("results", "assoc"),
            ("persistent", "yes"),
        ])
        .unwrap();
        assert_eq!("db.internal", settings.host);
        assert_eq!(3306, settings.port);
        assert_eq!("root", settings.user);
        assert_eq!("root", settings.password.expose_secret());
        assert_eq!("yourmagicdatabase", settings.database);
        assert_eq!(ResultShape::Associative, settings.result_shape);
        assert_eq!("utf8mb4", settings.charset);
        assert_eq!(None, settings.query_timeout);
    }

    #[test]
    fn test_from_pairs_rejects_bad_values() {
        let err = Settings::from_pairs([("port", "mysql")]).unwrap_err();
        assert!(matches!(err, Error::InvalidSetting { ref key, .. } if key == "port"));
        let err = Settings::from_pairs([("results", "objects")]).unwrap_err();
        assert!(matches!(err, Error::InvalidSetting { ref key, .. } if key == "results"));
    }

    #[test]
    fn test_timeout_in_millis() {
        let settings = Settings::from_pairs(vec![
            ("timeout".to_owned(), "1500".to_owned()),
            ("charset".to_owned(), "utf8".to_owned()),
        ])
        .unwrap();
        assert_eq!(Some(Duration::from_millis(1500)), settings.query_timeout);
        assert_eq!("utf8", settings.charset);
        let settings = Settings::from_pairs([("timeout", "0")]).unwrap();
        assert_eq!(None, settings.query_timeout);
    }

    #[test]
    fn test_password_is_redacted() {
        let settings = Settings::new().user("app").password("hunter2");
        assert!(!format!("{settings:?}").contains("hunter2"));
    }
}
