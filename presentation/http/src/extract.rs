//! Request extractors that reject with `{"message": ...}` bodies

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::{request::Parts, StatusCode},
    response::Json,
};
use espresso_core::prelude::*;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::{
    handle_core_error, ApiError, DeleteReviewParams, MessageResponse, INVALID_BODY, INVALID_ID, INVALID_PATH,
    INVALID_QUERY,
};

/// A `:id` path segment that must be a well-formed document identifier.
///
/// Malformed ids are rejected with `400 {"message": "Invalid ID"}` before the
/// handler runs.
#[derive(Debug, Clone, Copy)]
pub struct PathId(pub DocumentId);

#[async_trait]
impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| invalid_id())?;

        DocumentId::parse(&raw).map(PathId).map_err(|_| {
            warn!("Rejected malformed path id {:?}", raw);
            invalid_id()
        })
    }
}

/// A free-form path segment, such as an email or an id compared as text
#[derive(Debug, Clone)]
pub struct TokenPath(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for TokenPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state).await.map_err(|rejection| {
            warn!("Rejected path segment: {}", rejection.body_text());
            bad_request(INVALID_PATH)
        })?;
        Ok(TokenPath(raw))
    }
}

/// Query parameters deserialized into `T`
#[derive(Debug, Clone)]
pub struct MessageQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for MessageQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<T>::from_request_parts(parts, state).await.map_err(|rejection| {
            warn!("Rejected query string: {}", rejection.body_text());
            bad_request(INVALID_QUERY)
        })?;
        Ok(MessageQuery(params))
    }
}

/// The `requesterId` query parameter of a review deletion.
///
/// Missing, repeated or malformed values all give `400 {"message": "Invalid ID"}`.
#[derive(Debug, Clone, Copy)]
pub struct RequesterId(pub DocumentId);

#[async_trait]
impl<S> FromRequestParts<S> for RequesterId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<DeleteReviewParams>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                warn!("Rejected requesterId: {}", rejection.body_text());
                invalid_id()
            })?;
        parse_id(params.requester_id.as_deref()).map(RequesterId)
    }
}

/// A JSON object request body
#[derive(Debug, Clone)]
pub struct JsonBody(pub Document);

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            warn!("Unreadable request body: {}", rejection.body_text());
            (rejection.status(), Json(MessageResponse::new(INVALID_BODY)))
        })?;

        serde_json::from_slice::<Document>(&bytes)
            .map(JsonBody)
            .map_err(|e| handle_core_error(CoreError::from(e)))
    }
}

/// Parse an identifier that arrived outside the path, e.g. in a query string
pub fn parse_id(raw: Option<&str>) -> Result<DocumentId, ApiError> {
    raw.and_then(|s| DocumentId::parse(s).ok()).ok_or_else(invalid_id)
}

fn invalid_id() -> ApiError {
    bad_request(INVALID_ID)
}

fn bad_request(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(MessageResponse::new(message)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Params {
        role: Option<String>,
    }

    fn parts(uri: &str) -> Parts {
        let (parts, _) = axum::http::Request::builder().uri(uri).body(()).unwrap().into_parts();
        parts
    }

    #[test]
    fn test_parse_id() {
        let id = DocumentId::new();
        assert_eq!(parse_id(Some(&id.to_hex())).unwrap(), id);

        let (status, Json(body)) = parse_id(Some("nope")).unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.message, INVALID_ID);

        assert!(parse_id(None).is_err());
    }

    #[tokio::test]
    async fn test_message_query_rejects_repeated_keys() {
        let MessageQuery(params) = MessageQuery::<Params>::from_request_parts(&mut parts("/users?role=Buyer"), &())
            .await
            .unwrap();
        assert_eq!(params.role.as_deref(), Some("Buyer"));

        let (status, Json(body)) =
            MessageQuery::<Params>::from_request_parts(&mut parts("/users?role=Buyer&role=Seller"), &())
                .await
                .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.message, INVALID_QUERY);
    }

    #[tokio::test]
    async fn test_requester_id_rejections_are_invalid_id() {
        let id = DocumentId::new().to_hex();
        let RequesterId(parsed) = RequesterId::from_request_parts(&mut parts(&format!("/r?requesterId={id}")), &())
            .await
            .unwrap();
        assert_eq!(parsed.to_hex(), id);

        for uri in [
            "/r".to_string(),
            "/r?requesterId=nope".to_string(),
            format!("/r?requesterId={id}&requesterId={id}"),
        ] {
            let (status, Json(body)) = RequesterId::from_request_parts(&mut parts(&uri), &()).await.unwrap_err();
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body.message, INVALID_ID, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_json_body_goes_through_core_error() {
        let request = axum::http::Request::builder().body(Body::from("[1, 2]")).unwrap();
        let (status, Json(body)) = JsonBody::from_request(request, &()).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.message, INVALID_BODY);

        let request = axum::http::Request::builder().body(Body::from(r#"{"name": "Mocha"}"#)).unwrap();
        let JsonBody(document) = JsonBody::from_request(request, &()).await.unwrap();
        assert_eq!(document["name"], "Mocha");
    }
}
