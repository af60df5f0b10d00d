use config::File;
use secrecy::Secret;
use serde_aux::field_attributes::{deserialize_bool_from_anything, deserialize_number_from_string};
use std::path::PathBuf;

#[derive(serde::Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub email_client: EmailClientSettings,
    pub storage: StorageSettings,
}

#[derive(serde::Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Mail transport settings. The transport is only considered configured when
/// the full credential set (host, user, secret) is present; everything else
/// is an override with a default.
#[derive(serde::Deserialize)]
pub struct EmailClientSettings {
    pub host: Option<String>,
    pub user: Option<String>,
    pub secret: Option<Secret<String>>,
    #[serde(
        default = "default_mail_port",
        deserialize_with = "deserialize_number_from_string"
    )]
    pub port: u16,
    #[serde(default, deserialize_with = "deserialize_bool_from_anything")]
    pub secure: bool,
    pub recipient: Option<String>,
    pub sender: Option<String>,
    #[serde(
        default = "default_mail_timeout_ms",
        deserialize_with = "deserialize_number_from_string"
    )]
    pub timeout_milliseconds: u64,
}

pub struct MailCredentials<'a> {
    pub host: &'a str,
    pub user: &'a str,
    pub secret: &'a Secret<String>,
}

impl EmailClientSettings {
    pub fn credentials(&self) -> Option<MailCredentials<'_>> {
        match (&self.host, &self.user, &self.secret) {
            (Some(host), Some(user), Some(secret)) => Some(MailCredentials { host, user, secret }),
            _ => None,
        }
    }

    pub fn sender(&self) -> Option<&str> {
        self.sender.as_deref().or(self.user.as_deref())
    }

    pub fn recipient(&self) -> Option<&str> {
        self.recipient.as_deref().or(self.user.as_deref())
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_milliseconds)
    }
}

fn default_mail_port() -> u16 {
    587
}

fn default_mail_timeout_ms() -> u64 {
    5000
}

#[derive(serde::Deserialize)]
pub struct StorageSettings {
    pub data_dir: PathBuf,
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");
    let config_directory = base_path.join("configuration");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .expect("Failed to parse app environment");

    let env_file_name = format!("{}.yaml", environment.as_str());

    let config = config::Config::builder()
        .add_source(File::from(config_directory.join("base.yaml")))
        .add_source(File::from(config_directory.join(env_file_name)))
        // Overrides like `APP_EMAIL_CLIENT__SECRET=...` for values that should
        // never land in a checked-in yaml file.
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    return config.try_deserialize::<Settings>();
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} not a suppported environment. Use either `local` or `production`",
                other
            )),
        }
    }
}
