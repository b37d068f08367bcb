use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

/// Wrapper for API responses that automatically adds the success envelope.
///
/// Payload responses render as `{"success": true, "data": ...}`, message-only
/// responses as `{"success": true, "message": "..."}`.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize = ()> {
    payload: Payload<T>,
    status_code: StatusCode,
}

#[derive(Debug)]
enum Payload<T: Serialize> {
    Data(T),
    Message(String),
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful 200 response carrying a data payload.
    pub fn success(data: T) -> Self {
        Self {
            payload: Payload::Data(data),
            status_code: StatusCode::OK,
        }
    }

    /// 201 Created response carrying the newly created resource.
    pub fn created(data: T) -> Self {
        Self {
            payload: Payload::Data(data),
            status_code: StatusCode::CREATED,
        }
    }
}

impl ApiResponse<()> {
    /// Successful 200 response with a human-readable message and no payload.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            payload: Payload::Message(message.into()),
            status_code: StatusCode::OK,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let envelope = match self.payload {
            Payload::Message(message) => json!({
                "success": true,
                "message": message,
            }),
            Payload::Data(data) => match serde_json::to_value(&data) {
                Ok(value) => json!({
                    "success": true,
                    "data": value,
                }),
                Err(e) => {
                    tracing::error!("failed to serialize response data: {}", e);
                    return crate::error::ApiError::internal(
                        "Failed to serialize response data",
                    )
                    .into_response();
                }
            },
        };

        (self.status_code, Json(envelope)).into_response()
    }
}

/// Handler return type: enveloped success or an `ApiError` envelope.
pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn data_envelope_has_success_and_data() {
        let response = ApiResponse::success(json!({"id": 1})).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["id"], 1);
    }

    #[tokio::test]
    async fn created_uses_201() {
        let response = ApiResponse::created(json!({"id": 2})).into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn message_envelope_has_no_data_key() {
        let response = ApiResponse::message("Project deleted successfully").into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Project deleted successfully");
        assert!(body.get("data").is_none());
    }
}
