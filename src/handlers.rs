//! HTTP routes.
//!
//! | Method | Path | Body | Response |
//! |--------|------|------|----------|
//! | GET | `/health` | | store health |
//! | GET | `/config` | | deployment parameters |
//! | POST | `/bid-id` | `Complaint` | `{ bidId }` |
//! | POST | `/complaints` | `{ complaint, signature, domainName }` | `{ bidId }` |
//! | GET | `/complaints/{bidId}` | | `{ bidId, exists }` |

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::types::{
    BidId, BidIdResponse, Complaint, ComplaintStatusResponse, ErrorResponse, ServiceInfoResponse,
    SubmitComplaintRequest, SubmitComplaintResponse,
};
use crate::verifier::{ComplaintVerifier, ReputationError};

pub fn routes(verifier: Arc<ComplaintVerifier>) -> Router {
    Router::new()
        .route("/health", get(get_health))
        .route("/config", get(get_config))
        .route("/bid-id", post(post_bid_id))
        .route("/complaints", post(post_complaint))
        .route("/complaints/{bid_id}", get(get_complaint))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(verifier)
}

async fn get_health(State(verifier): State<Arc<ComplaintVerifier>>) -> Response {
    let store = verifier.store();
    match store.health_check().await {
        Ok(()) => Json(json!({ "status": "ok", "store": store.store_type() })).into_response(),
        Err(e) => {
            error!(error = %e, "Complaint store health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable", "store": store.store_type() })),
            )
                .into_response()
        }
    }
}

async fn get_config(State(verifier): State<Arc<ComplaintVerifier>>) -> Json<ServiceInfoResponse> {
    let settings = verifier.settings();
    Json(ServiceInfoResponse {
        chain_id: settings.chain_id,
        reputation: settings.reputation,
        terminus_did: settings.terminus_did,
        tag_type_domain: settings.tag_type_domain.clone(),
        tag_name: settings.tag_name.clone(),
    })
}

async fn post_bid_id(
    State(verifier): State<Arc<ComplaintVerifier>>,
    body: Result<Json<Complaint>, JsonRejection>,
) -> Response {
    match body {
        Ok(Json(complaint)) => Json(BidIdResponse {
            bid_id: verifier.get_bid_id(&complaint),
        })
        .into_response(),
        Err(rejection) => rejection_response(rejection),
    }
}

async fn post_complaint(
    State(verifier): State<Arc<ComplaintVerifier>>,
    body: Result<Json<SubmitComplaintRequest>, JsonRejection>,
) -> Response {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(rejection),
    };
    match verifier
        .submit_complaint(&request.complaint, &request.signature, &request.domain_name)
        .await
    {
        Ok(bid_id) => Json(SubmitComplaintResponse { bid_id }).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn get_complaint(
    State(verifier): State<Arc<ComplaintVerifier>>,
    Path(bid_id): Path<String>,
) -> Response {
    let bid_id = match bid_id.parse::<BidId>() {
        Ok(bid_id) => bid_id,
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, "InvalidBidId", e.to_string());
        }
    };
    match verifier.has_complaint(&bid_id).await {
        Ok(exists) => Json(ComplaintStatusResponse { bid_id, exists }).into_response(),
        Err(e) => e.into_response(),
    }
}

fn error_response(status: StatusCode, error: &str, reason: String) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            reason,
        }),
    )
        .into_response()
}

fn rejection_response(rejection: JsonRejection) -> Response {
    warn!(error = %rejection.body_text(), "Rejected request body");
    error_response(rejection.status(), "InvalidRequest", rejection.body_text())
}

impl IntoResponse for ReputationError {
    fn into_response(self) -> Response {
        let status = match &self {
            ReputationError::DomainNotFound(_) => StatusCode::NOT_FOUND,
            ReputationError::InvalidSigner { .. } => StatusCode::FORBIDDEN,
            ReputationError::DuplicateBidId(_) => StatusCode::CONFLICT,
            ReputationError::InvalidSignature(_) => StatusCode::BAD_REQUEST,
            ReputationError::TagTypeNotReady { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ReputationError::Registry(_) => StatusCode::BAD_GATEWAY,
            ReputationError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %self, "Complaint request failed");
        } else {
            warn!(error = %self, "Complaint rejected");
        }
        error_response(status, self.code(), self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bid_id::derive_bid_id;
    use crate::types::tests::sample_complaint;
    use crate::verifier::tests::{setup, Fixture, REPUTATION};
    use alloy::primitives::Bytes;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    async fn send(fixture: &Fixture, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = routes(fixture.verifier.clone())
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn post_json(uri: &str, body: &impl serde::Serialize) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn submission(fixture: &Fixture, domain_name: &str) -> SubmitComplaintRequest {
        let complaint = sample_complaint();
        SubmitComplaintRequest {
            signature: Bytes::from(fixture.sign(&complaint)),
            complaint,
            domain_name: domain_name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_health_and_config() {
        let fixture = setup();

        let (status, body) = send(&fixture, get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["store"], "memory");

        let (status, body) = send(&fixture, get_request("/config")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["chainId"], 31337);
        assert_eq!(body["tagName"], "complaints");
        let reputation: alloy::primitives::Address =
            serde_json::from_value(body["reputation"].clone()).unwrap();
        assert_eq!(reputation, REPUTATION);
    }

    #[tokio::test]
    async fn test_bid_id_route() {
        let fixture = setup();
        let complaint = sample_complaint();

        let (status, body) = send(&fixture, post_json("/bid-id", &complaint)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["bidId"], derive_bid_id(&complaint).to_string());
    }

    #[tokio::test]
    async fn test_submit_then_duplicate() {
        let fixture = setup();
        fixture
            .registry
            .register("reputationTestUser", fixture.owner.address())
            .await;
        let request = submission(&fixture, "reputationTestUser");
        let bid_id = derive_bid_id(&request.complaint).to_string();

        let (status, body) = send(&fixture, post_json("/complaints", &request)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["bidId"], bid_id);

        let (status, body) = send(&fixture, post_json("/complaints", &request)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "DuplicateBidId");

        let (status, body) = send(&fixture, get_request(&format!("/complaints/{bid_id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["exists"], true);
    }

    #[tokio::test]
    async fn test_submit_error_statuses() {
        let fixture = setup();
        let (status, body) =
            send(&fixture, post_json("/complaints", &submission(&fixture, "nobody"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "DomainNoExists");

        fixture.registry.register("song.net", REPUTATION).await;
        let (status, body) =
            send(&fixture, post_json("/complaints", &submission(&fixture, "song.net"))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "InvalidSigner");

        let mut request = submission(&fixture, "song.net");
        request.signature = Bytes::from_static(&[1, 2, 3]);
        let (status, body) = send(&fixture, post_json("/complaints", &request)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "InvalidSignature");
    }

    #[tokio::test]
    async fn test_invalid_bodies_get_json_errors() {
        let fixture = setup();

        let (status, body) = send(
            &fixture,
            post_json("/complaints", &serde_json::json!({ "complaint": {} })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "InvalidRequest");
        assert!(body["reason"].as_str().unwrap().contains("srcChainId"));

        let request = Request::builder()
            .method("POST")
            .uri("/bid-id")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(&fixture, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "InvalidRequest");

        let request = Request::builder()
            .method("POST")
            .uri("/complaints")
            .body(Body::from("{}"))
            .unwrap();
        let (status, body) = send(&fixture, request).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["error"], "InvalidRequest");
    }

    #[tokio::test]
    async fn test_unknown_complaint() {
        let fixture = setup();
        let bid_id = derive_bid_id(&sample_complaint()).to_string();

        let (status, body) = send(&fixture, get_request(&format!("/complaints/{bid_id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["exists"], false);

        let (status, body) = send(&fixture, get_request("/complaints/not-a-bid-id")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "InvalidBidId");
    }
}
