//! HTTP routing for the provisioning façade.
//!
//! A thin JSON-over-HTTP front: each route deserializes one flat request
//! record, delegates to [`ProvisioningService`], and maps the canonical
//! error taxonomy onto HTTP statuses. No provisioning logic lives here.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http::{Method, Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::service::Service;
use provstack_core::ProvisioningService;
use provstack_model::error::{ErrorKind, ProvisionError};
use provstack_model::ops::{
    CreateBucketRequest, DeleteBucketRequest, GrantAccessRequest, RevokeAccessRequest,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

/// Response body type produced by the router.
pub type RouterBody = Full<Bytes>;

/// hyper service wrapping the provisioning façade.
pub struct ProvisionerHttpService {
    service: Arc<ProvisioningService>,
}

impl std::fmt::Debug for ProvisionerHttpService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProvisionerHttpService").finish_non_exhaustive()
    }
}

impl ProvisionerHttpService {
    /// Wrap a façade for serving.
    #[must_use]
    pub fn new(service: Arc<ProvisioningService>) -> Self {
        Self { service }
    }
}

impl Clone for ProvisionerHttpService {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
        }
    }
}

impl Service<Request<Incoming>> for ProvisionerHttpService {
    type Response = Response<RouterBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        let service = self.service.clone();
        Box::pin(async move { Ok(route(&service, req).await) })
    }
}

async fn route(service: &ProvisioningService, req: Request<Incoming>) -> Response<RouterBody> {
    let get = req.method() == Method::GET;
    let post = req.method() == Method::POST;
    let path = req.uri().path().to_owned();

    match path.as_str() {
        "/healthz" if get => text_response(StatusCode::OK, "ok"),
        "/v1/info" if get => match service.driver_info() {
            Ok(info) => json_response(StatusCode::OK, &info),
            Err(err) => error_response(&err),
        },
        "/v1/buckets" if post => {
            handle(req, |r: CreateBucketRequest| service.create_bucket(r)).await
        }
        "/v1/buckets/delete" if post => {
            handle_empty(req, |r: DeleteBucketRequest| service.delete_bucket(r)).await
        }
        "/v1/grants" if post => {
            handle(req, |r: GrantAccessRequest| service.grant_access(r)).await
        }
        "/v1/grants/revoke" if post => {
            handle_empty(req, |r: RevokeAccessRequest| service.revoke_access(r)).await
        }
        _ => text_response(StatusCode::NOT_FOUND, "no such route"),
    }
}

/// Decode the request, run the operation, encode the response record.
async fn handle<Req, Resp, F, Fut>(req: Request<Incoming>, op: F) -> Response<RouterBody>
where
    Req: DeserializeOwned,
    Resp: Serialize,
    F: FnOnce(Req) -> Fut,
    Fut: Future<Output = Result<Resp, ProvisionError>>,
{
    let parsed = match decode_body(req).await {
        Ok(parsed) => parsed,
        Err(resp) => return resp,
    };
    match op(parsed).await {
        Ok(resp) => json_response(StatusCode::OK, &resp),
        Err(err) => error_response(&err),
    }
}

/// As [`handle`], for operations returning no payload.
async fn handle_empty<Req, F, Fut>(req: Request<Incoming>, op: F) -> Response<RouterBody>
where
    Req: DeserializeOwned,
    F: FnOnce(Req) -> Fut,
    Fut: Future<Output = Result<(), ProvisionError>>,
{
    let parsed = match decode_body(req).await {
        Ok(parsed) => parsed,
        Err(resp) => return resp,
    };
    match op(parsed).await {
        Ok(()) => json_response(StatusCode::OK, &serde_json::json!({})),
        Err(err) => error_response(&err),
    }
}

async fn decode_body<Req: DeserializeOwned>(
    req: Request<Incoming>,
) -> Result<Req, Response<RouterBody>> {
    let body = req
        .into_body()
        .collect()
        .await
        .map_err(|err| {
            warn!(error = %err, "failed to read request body");
            text_response(StatusCode::BAD_REQUEST, "unreadable body")
        })?
        .to_bytes();

    serde_json::from_slice(&body)
        .map_err(|err| text_response(StatusCode::BAD_REQUEST, &format!("malformed request: {err}")))
}

/// Map the canonical error taxonomy onto HTTP statuses.
fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::AlreadyExists => StatusCode::CONFLICT,
        ErrorKind::FailedPrecondition => StatusCode::PRECONDITION_FAILED,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: &ProvisionError) -> Response<RouterBody> {
    let status = status_for(err.kind());
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        warn!(error = %err, "request failed");
    }
    json_response(status, &serde_json::json!({ "error": err.to_string() }))
}

fn json_response<T: Serialize>(status: StatusCode, value: &T) -> Response<RouterBody> {
    let body = serde_json::to_vec(value).unwrap_or_else(|_| b"{}".to_vec());
    Response::builder()
        .status(status)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::new())))
}

fn text_response(status: StatusCode, message: &str) -> Response<RouterBody> {
    Response::builder()
        .status(status)
        .header(http::header::CONTENT_TYPE, "text/plain")
        .body(Full::new(Bytes::from(message.to_owned())))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::new())))
}
