use std::collections::HashMap;
use std::env;

use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::InvocationType;
use aws_smithy_types::error::display::DisplayErrorContext;
use axum::http::StatusCode;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use crate::configuration::LambdaSettings;

// Placeholder metadata observed in the deployed function's contract. The
// function expects caller-supplied name/symbol eventually; until then these
// literals are part of the wire payload.
const NFT_NAME: &str = "name";
const NFT_SYMBOL: &str = "symbol";

#[derive(Debug, Error)]
pub enum MintError {
    #[error("invalid submission: {0}")]
    Validation(String),
    #[error("mint invocation failed: {0}")]
    Invocation(String),
}

impl From<&MintError> for StatusCode {
    fn from(error: &MintError) -> Self {
        match error {
            MintError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            MintError::Invocation(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

/// A validated submission: the receiver's wallet public key and the text
/// prompt the image is generated from.
#[derive(Debug, Clone)]
pub struct MintRequest {
    pub public_key: String,
    pub prompt: String,
}

impl MintRequest {
    /// Builds a request from the raw form field bundle. Fails before any
    /// network activity if either field is missing or empty.
    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Self, MintError> {
        let public_key = required_field(fields, "publickey")?;
        let prompt = required_field(fields, "prompt")?;
        Ok(Self { public_key, prompt })
    }
}

fn required_field(fields: &HashMap<String, String>, name: &str) -> Result<String, MintError> {
    match fields.get(name) {
        Some(value) if !value.trim().is_empty() => Ok(value.clone()),
        Some(_) => Err(MintError::Validation(format!(
            "field `{}` must not be empty",
            name
        ))),
        None => Err(MintError::Validation(format!("missing field `{}`", name))),
    }
}

// Wire payload for the mint function: exactly these four keys, always.
#[derive(Debug, Serialize)]
struct InvocationPayload<'a> {
    text: &'a str,
    name: &'a str,
    symbol: &'a str,
    receiver_public_key: &'a str,
}

impl<'a> InvocationPayload<'a> {
    fn new(request: &'a MintRequest) -> Self {
        Self {
            text: &request.prompt,
            name: NFT_NAME,
            symbol: NFT_SYMBOL,
            receiver_public_key: &request.public_key,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MinterConfig {
    pub region: String,
    pub function_name: String,
    pub endpoint: Option<String>,
    /// Explicit access-key/secret pair. When absent the SDK's default
    /// credential chain applies.
    pub credentials: Option<(String, String)>,
}

impl MinterConfig {
    pub fn from_settings(settings: &LambdaSettings) -> Self {
        let region = env::var("AWS_REGION").unwrap_or_else(|_| settings.region.clone());
        let credentials = match (
            env::var("AWS_ACCESS_KEY_ID"),
            env::var("AWS_SECRET_ACCESS_KEY"),
        ) {
            (Ok(access_key_id), Ok(secret_access_key)) => {
                Some((access_key_id, secret_access_key))
            }
            _ => None,
        };
        Self {
            region,
            function_name: settings.function_name.clone(),
            endpoint: settings.endpoint.clone(),
            credentials,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MintService {
    client: aws_sdk_lambda::Client,
    function_name: String,
}

impl MintService {
    /// Resolves the SDK configuration once; the resulting client is immutable
    /// and shared across requests. Retries are disabled: a duplicate mint is
    /// worse than a failed submission.
    pub async fn new(config: MinterConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region))
            .retry_config(RetryConfig::disabled());

        if let Some((access_key_id, secret_access_key)) = config.credentials {
            loader = loader.credentials_provider(Credentials::from_keys(
                access_key_id,
                secret_access_key,
                None,
            ));
        }
        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;
        Self {
            client: aws_sdk_lambda::Client::new(&sdk_config),
            function_name: config.function_name,
        }
    }

    /// Issues a single RequestResponse invocation of the mint function. The
    /// function's own response body is not surfaced; a function fault or a
    /// transport failure maps to `MintError::Invocation`.
    pub async fn mint(&self, request: &MintRequest) -> Result<(), MintError> {
        info!(
            "Invoking {} for receiver {}",
            self.function_name, request.public_key
        );

        let payload = serde_json::to_vec(&InvocationPayload::new(request))
            .map_err(|e| MintError::Invocation(format!("payload encoding failed: {}", e)))?;

        let output = self
            .client
            .invoke()
            .function_name(&self.function_name)
            .invocation_type(InvocationType::RequestResponse)
            .payload(Blob::new(payload))
            .send()
            .await
            .map_err(|e| {
                let message = DisplayErrorContext(&e).to_string();
                error!("Invocation of {} failed: {}", self.function_name, message);
                MintError::Invocation(message)
            })?;

        if let Some(fault) = output.function_error() {
            error!("{} reported a function error: {}", self.function_name, fault);
            return Err(MintError::Invocation(format!(
                "function error: {}",
                fault
            )));
        }

        info!("Completed invocation");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn payload_carries_exactly_four_keys() {
        let request = MintRequest {
            public_key: "By3RECZEGmkfkqd5FqeJAEAJBsV3ko8qbvMxQRck8uzy".to_string(),
            prompt: "zen temple".to_string(),
        };
        let value = serde_json::to_value(InvocationPayload::new(&request)).unwrap();
        assert_eq!(
            value,
            json!({
                "text": "zen temple",
                "name": "name",
                "symbol": "symbol",
                "receiver_public_key": "By3RECZEGmkfkqd5FqeJAEAJBsV3ko8qbvMxQRck8uzy",
            })
        );
    }

    #[test]
    fn well_formed_fields_build_a_request() {
        let request =
            MintRequest::from_fields(&fields(&[("publickey", "abc"), ("prompt", "a cat")]))
                .unwrap();
        assert_eq!(request.public_key, "abc");
        assert_eq!(request.prompt, "a cat");
    }

    #[test]
    fn missing_field_is_a_validation_error() {
        let err = MintRequest::from_fields(&fields(&[("prompt", "a cat")])).unwrap_err();
        assert!(matches!(err, MintError::Validation(_)));
        assert!(err.to_string().contains("publickey"));
    }

    #[test]
    fn empty_field_is_a_validation_error() {
        let err = MintRequest::from_fields(&fields(&[("publickey", ""), ("prompt", "a cat")]))
            .unwrap_err();
        assert!(matches!(err, MintError::Validation(_)));

        let err = MintRequest::from_fields(&fields(&[("publickey", "abc"), ("prompt", "   ")]))
            .unwrap_err();
        assert!(matches!(err, MintError::Validation(_)));
    }

    #[test]
    fn extra_fields_are_ignored() {
        let request = MintRequest::from_fields(&fields(&[
            ("publickey", "abc"),
            ("prompt", "a cat"),
            ("submit", "Submit"),
        ]))
        .unwrap();
        assert_eq!(request.prompt, "a cat");
    }

    #[test]
    fn errors_map_to_status_codes() {
        let validation = MintError::Validation("missing field `prompt`".to_string());
        assert_eq!(
            StatusCode::from(&validation),
            StatusCode::UNPROCESSABLE_ENTITY
        );

        let invocation = MintError::Invocation("connection refused".to_string());
        assert_eq!(StatusCode::from(&invocation), StatusCode::BAD_GATEWAY);
    }
}
