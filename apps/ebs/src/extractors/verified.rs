//! Request-scoped storage for verified claims.
//!
//! The verification middleware attaches claims to the request it is
//! processing; handlers take them back out with the [`Verified`] extractor.
//! Nothing outlives the request.

use std::ops::Deref;

use actix_web::dev::{Payload, ServiceRequest};
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::error::AppError;

/// Claims of type `C` whose signature and expiry have been checked.
#[derive(Debug, Clone)]
pub struct Verified<C>(pub C);

impl<C> Verified<C> {
    pub fn into_inner(self) -> C {
        self.0
    }
}

impl<C> Deref for Verified<C> {
    type Target = C;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Attach verified claims to `req` for downstream stages.
pub fn attach<C: 'static>(req: &ServiceRequest, claims: C) {
    req.extensions_mut().insert(Verified(claims));
}

impl<C> FromRequest for Verified<C>
where
    C: Clone + 'static,
{
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        // Absent claims mean the route was mounted without its verifier.
        ready(
            req.extensions()
                .get::<Verified<C>>()
                .cloned()
                .ok_or_else(|| AppError::internal("Verified claims missing from request")),
        )
    }
}
