use axum::extract::Path;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::info;

use crate::database::{self, models::setting::Setting};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/settings: all rows flattened into one `{key: value}` object.
pub async fn get_all() -> ApiResult<Map<String, Value>> {
    let pool = database::pool()?;
    Ok(ApiResponse::success(Setting::get_all(&pool).await?))
}

/// GET /api/settings/:key
pub async fn get(Path(key): Path<String>) -> ApiResult<Value> {
    let pool = database::pool()?;
    let value = Setting::get_by_key(&pool, &key)
        .await?
        .ok_or_else(|| ApiError::not_found("Setting not found"))?;
    Ok(ApiResponse::success(json!({ "key": key, "value": value })))
}

#[derive(Debug, Deserialize)]
pub struct SettingValue {
    pub value: Option<String>,
}

/// PUT /api/settings/:key
pub async fn update(Path(key): Path<String>, Json(body): Json<SettingValue>) -> ApiResult<Value> {
    let value = body
        .value
        .ok_or_else(|| ApiError::bad_request("Please provide a value"))?;

    let pool = database::pool()?;
    Setting::update(&pool, &key, &value).await?;
    info!("setting {} updated", key);
    Ok(ApiResponse::success(json!({ "key": key, "value": value })))
}

/// PUT /api/settings: upsert every key of a partial object atomically.
pub async fn update_all(Json(body): Json<Map<String, Value>>) -> ApiResult<Map<String, Value>> {
    if body.is_empty() {
        return Err(ApiError::bad_request("No settings provided"));
    }

    let entries: Vec<(String, String)> = body
        .into_iter()
        .map(|(key, value)| (key, stringify(value)))
        .collect();

    let pool = database::pool()?;
    Setting::update_many(&pool, &entries).await?;
    info!("updated {} settings", entries.len());
    Ok(ApiResponse::success(Setting::get_all(&pool).await?))
}

/// Settings are stored as text; non-string JSON values keep their JSON form.
fn stringify(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_store_verbatim_and_scalars_as_json() {
        assert_eq!(stringify(json!("hello")), "hello");
        assert_eq!(stringify(json!(42)), "42");
        assert_eq!(stringify(json!(true)), "true");
        assert_eq!(stringify(json!({"a": 1})), r#"{"a":1}"#);
    }
}
