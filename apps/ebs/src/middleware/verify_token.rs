//! Token verification middleware.
//!
//! One middleware, two instantiations: [`AuthMiddleware`] pulls the token from
//! the `Authorization` header and verifies it as [`AuthClaims`];
//! [`TransactionMiddleware`] pulls it from the JSON body and verifies it as
//! [`TransactionClaims`]. On success the claims are attached to the request
//! and the inner service runs; on failure the request is answered here and
//! the inner service is never called.

use std::marker::PhantomData;
use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, Error, HttpMessage};
use async_trait::async_trait;
use futures_util::future::{ready, LocalBoxFuture, Ready};
use serde::de::DeserializeOwned;
use tracing::{error, warn};

use crate::auth::claims::{AuthClaims, TransactionClaims};
use crate::auth::verifier::VerifyError;
use crate::error::AppError;
use crate::extractors::bearer::bearer_token;
use crate::extractors::transaction_body::{decode_transaction_body, read_body, replay_payload};
use crate::extractors::verified::attach;
use crate::state::app_state::AppState;

/// Where a middleware finds its token. Each source owns its own
/// malformed-input checks; verification is shared.
#[async_trait(?Send)]
pub trait TokenSource: 'static {
    /// Label for logs
    const NAME: &'static str;
    /// Response body when the verifier itself fails
    const INTERNAL_FAILURE: &'static str;

    async fn extract(req: &mut ServiceRequest, state: &AppState) -> Result<String, AppError>;
}

/// `Authorization: Bearer <token>`
pub struct BearerHeader;

#[async_trait(?Send)]
impl TokenSource for BearerHeader {
    const NAME: &'static str = "authorization_header";
    const INTERNAL_FAILURE: &'static str = "Could not parse authorization header";

    async fn extract(req: &mut ServiceRequest, _state: &AppState) -> Result<String, AppError> {
        bearer_token(req.headers())
    }
}

/// `{"token": "<token>"}` request body
pub struct TransactionBodyToken;

#[async_trait(?Send)]
impl TokenSource for TransactionBodyToken {
    const NAME: &'static str = "transaction_body";
    const INTERNAL_FAILURE: &'static str = "Could not parse Bits transaction token";

    async fn extract(req: &mut ServiceRequest, state: &AppState) -> Result<String, AppError> {
        let mut payload = req.take_payload();
        let body = read_body(&mut payload, state.max_payload_size).await?;
        req.set_payload(replay_payload(body.clone()));

        Ok(decode_transaction_body(&body)?.token)
    }
}

pub type AuthMiddleware = VerifyToken<BearerHeader, AuthClaims>;
pub type TransactionMiddleware = VerifyToken<TransactionBodyToken, TransactionClaims>;

pub struct VerifyToken<Src, C> {
    _marker: PhantomData<fn() -> (Src, C)>,
}

impl<Src, C> VerifyToken<Src, C> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<Src, C> Default for VerifyToken<Src, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, B, Src, C> Transform<S, ServiceRequest> for VerifyToken<Src, C>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
    Src: TokenSource,
    C: DeserializeOwned + Clone + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = VerifyTokenMiddleware<S, Src, C>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(VerifyTokenMiddleware {
            service: Rc::new(service),
            _marker: PhantomData,
        }))
    }
}

pub struct VerifyTokenMiddleware<S, Src, C> {
    service: Rc<S>,
    _marker: PhantomData<fn() -> (Src, C)>,
}

impl<S, B, Src, C> Service<ServiceRequest> for VerifyTokenMiddleware<S, Src, C>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
    Src: TokenSource,
    C: DeserializeOwned + Clone + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            match authenticate::<Src, C>(&mut req).await {
                Ok(claims) => {
                    // Store claims in request extensions BEFORE calling the service
                    attach(&req, claims);
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(err) => {
                    warn!(
                        source = Src::NAME,
                        code = %err.code(),
                        status = err.status().as_u16(),
                        "request rejected"
                    );
                    Ok(req.error_response(err).map_into_right_body())
                }
            }
        })
    }
}

async fn authenticate<Src, C>(req: &mut ServiceRequest) -> Result<C, AppError>
where
    Src: TokenSource,
    C: DeserializeOwned,
{
    let state = req
        .app_data::<web::Data<AppState>>()
        .cloned()
        .ok_or_else(|| AppError::internal("AppState not available"))?;

    let token = Src::extract(req, &state).await?;

    state
        .verifier
        .verify::<C>(&token)
        .map_err(rejection_for::<Src>)
}

/// Client-facing error for a verifier refusal. Only `VerifyError::Internal`
/// becomes a 500; every token fault is a bare 401.
fn rejection_for<Src: TokenSource>(err: VerifyError) -> AppError {
    if err.is_internal() {
        error!(source = Src::NAME, error = %err, "token verifier failed");
        AppError::verifier_failure(Src::INTERNAL_FAILURE)
    } else {
        warn!(source = Src::NAME, reason = %err, "token rejected");
        AppError::unauthorized()
    }
}
