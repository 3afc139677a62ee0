use config::{Config, ConfigError, Environment as ConfigEnvironment, File};
use serde_aux::field_attributes::deserialize_number_from_string;
use tracing::error;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    #[serde(default)]
    pub lambda: LambdaSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
}

/// Settings for the remote mint function. Region and credentials follow the
/// standard `AWS_*` environment variables when present; `endpoint` points the
/// SDK client at a local stack instead of the real service.
#[derive(serde::Deserialize, Clone)]
pub struct LambdaSettings {
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_function_name")]
    pub function_name: String,
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl Default for LambdaSettings {
    fn default() -> Self {
        Self {
            region: default_region(),
            function_name: default_function_name(),
            endpoint: None,
        }
    }
}

fn default_region() -> String {
    "us-west-1".to_string()
}

fn default_function_name() -> String {
    "text_to_nft".to_string()
}

pub fn get_configuration() -> Result<Settings, ConfigError> {
    let base_path = std::env::current_dir()
        .expect("Failed to determine current directory")
        .join("configuration");

    let environment: AppEnvironment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .expect("Failed to parse APP_ENVIRONMENT");

    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = Config::builder()
        .add_source(File::from(base_path.join("base.yaml")))
        .add_source(File::from(base_path.join(&environment_filename)))
        .add_source(
            ConfigEnvironment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

pub enum AppEnvironment {
    Local,
    Production,
}

impl AppEnvironment {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppEnvironment::Local => "local",
            AppEnvironment::Production => "production",
        }
    }
}

impl TryFrom<String> for AppEnvironment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => {
                error!("Invalid environment: {}", other);
                Err(format!(
                    "{} is not a supported environment. Use either `local` or `production`.",
                    other
                ))
            }
        }
    }
}
