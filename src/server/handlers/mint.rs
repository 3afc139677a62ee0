use std::collections::HashMap;

use askama::Template;
use askama_axum::IntoResponse as AskamaIntoResponse;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::info;

use crate::server::config::AppState;
use crate::server::services::{MintError, MintRequest};

#[derive(Template)]
#[template(path = "pages/mint.html")]
struct MintTemplate {
    title: String,
}

#[derive(Template)]
#[template(path = "partials/mint_status.html")]
struct MintStatusTemplate {
    success: bool,
    message: String,
}

pub async fn mint_page(State(_state): State<AppState>) -> impl AskamaIntoResponse {
    MintTemplate {
        title: "Textmint".to_string(),
    }
}

/// Form action for the mint page. Translates the typed outcome into a status
/// fragment the page swaps in: success and failure render distinct states.
pub async fn handle_mint(State(state): State<AppState>, multipart: Multipart) -> Response {
    match process_submission(&state, multipart).await {
        Ok(()) => status_response(StatusCode::OK, true, "Mint request completed".to_string()),
        Err(e) => status_response(StatusCode::from(&e), false, e.to_string()),
    }
}

async fn process_submission(state: &AppState, multipart: Multipart) -> Result<(), MintError> {
    let fields = collect_fields(multipart).await?;
    let request = MintRequest::from_fields(&fields)?;
    info!("Handling mint request for {}", request.public_key);
    state.minter.mint(&request).await
}

async fn collect_fields(mut multipart: Multipart) -> Result<HashMap<String, String>, MintError> {
    let mut fields = HashMap::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| MintError::Validation(format!("malformed form payload: {}", e)))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        let value = field
            .text()
            .await
            .map_err(|e| MintError::Validation(format!("unreadable field `{}`: {}", name, e)))?;
        fields.insert(name, value);
    }
    Ok(fields)
}

fn status_response(status: StatusCode, success: bool, message: String) -> Response {
    (status, MintStatusTemplate { success, message }).into_response()
}
