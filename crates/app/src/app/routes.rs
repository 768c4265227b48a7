//! Route handlers for the demo server.

use std::sync::{Arc, OnceLock};

use anyhow::{anyhow, bail};
use axum::extract::Request;
use axum::http::{HeaderMap, header};
use jsonschema::JSONSchema;
use serde::Deserialize;
use serde_json::{Value, json};

use apikit_crypto::AuthKeys;
use apikit_errors::ApiError;
use apikit_response::{
    ApiResponse, ErrorsValue, SchemaErrors, invalid_api_response, invalid_value_api_response,
    invalid_value_error, unauthenticated_api_response,
};

const BODY_LIMIT: usize = 1024 * 1024;

pub async fn object(_req: Request) -> anyhow::Result<Value> {
    Ok(json!({"message": "Welcome to app!"}))
}

pub async fn string(_req: Request) -> anyhow::Result<Value> {
    Ok(json!("this is string!"))
}

pub async fn invalid_value(_req: Request) -> anyhow::Result<ApiResponse> {
    Ok(invalid_value_api_response("foo", "Foo is required."))
}

pub async fn invalid_api(_req: Request) -> anyhow::Result<ApiResponse> {
    let errors = ErrorsValue::new()
        .add("foo", "Foo is required.")
        .add("bar", "Bar is required.")
        .into_errors();

    Ok(invalid_api_response(Some(errors)))
}

pub async fn validation_error(_req: Request) -> anyhow::Result<ApiResponse> {
    let error = ErrorsValue::new()
        .add("foo", "Foo is required.")
        .add("bar", "Bar is required.")
        .into_error();

    Err(error.into())
}

pub async fn throw_invalid_value_error(_req: Request) -> anyhow::Result<ApiResponse> {
    Err(invalid_value_error("foo", "Foo is required."))
}

pub async fn server_error(_req: Request) -> anyhow::Result<Value> {
    bail!("Something exploded in the handler.")
}

pub async fn unauthenticated_error(_req: Request) -> anyhow::Result<ApiResponse> {
    Ok(unauthenticated_api_response())
}

fn user_schema() -> &'static JSONSchema {
    static SCHEMA: OnceLock<JSONSchema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        JSONSchema::compile(&json!({
            "type": "object",
            "required": ["name", "email"],
            "properties": {
                "name": {"type": "string"},
                "email": {"type": "string"},
                "addresses": {"type": "array", "items": {"type": "string"}},
                "posts": {
                    "type": "object",
                    "properties": {
                        "tagUsers": {"type": "array", "items": {"type": "string"}}
                    }
                }
            }
        }))
        .expect("static user schema compiles")
    })
}

pub async fn create_user(req: Request) -> anyhow::Result<ApiResponse> {
    let user = json_body(req).await?;
    SchemaErrors::check(user_schema(), &user)?;

    Ok(ApiResponse::new()
        .with_data(user)
        .with_message("User created successfully."))
}

#[derive(Debug, Deserialize)]
struct TokenRequest {
    subject: String,
}

pub async fn issue_token(req: Request) -> anyhow::Result<Value> {
    let keys = auth_keys(&req)?;
    let body = json_body(req).await?;

    let request: TokenRequest = serde_json::from_value(body)
        .map_err(|_| invalid_value_error("subject", "Subject is required."))?;

    let issued = keys.issue(&request.subject)?;
    Ok(json!({"token": issued.token, "dbToken": issued.db_token}))
}

pub async fn whoami(req: Request) -> anyhow::Result<Value> {
    let keys = auth_keys(&req)?;
    let token = bearer_token(req.headers())?;

    let payload = keys
        .verify(token)
        .map_err(|_| anyhow::Error::from(ApiError::unauthenticated()))?;

    Ok(json!({
        "subject": payload.subject(),
        "tokenId": payload.jwt_id(),
    }))
}

async fn json_body(req: Request) -> anyhow::Result<Value> {
    let bytes = axum::body::to_bytes(req.into_body(), BODY_LIMIT).await?;
    serde_json::from_slice(&bytes)
        .map_err(|_| invalid_value_error("body", "Request body must be valid JSON."))
}

fn auth_keys(req: &Request) -> anyhow::Result<Arc<AuthKeys>> {
    req.extensions()
        .get::<Arc<AuthKeys>>()
        .cloned()
        .ok_or_else(|| anyhow!("auth keys are not configured"))
}

fn bearer_token(headers: &HeaderMap) -> anyhow::Result<&str> {
    let header = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| anyhow::Error::from(ApiError::unauthenticated()))?;

    let header = header.to_str().map_err(|_| ApiError::unauthenticated())?;

    let header = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| anyhow::Error::from(ApiError::unauthenticated()))?;

    let token = header.trim();
    if token.is_empty() {
        return Err(ApiError::unauthenticated().into());
    }

    Ok(token)
}
