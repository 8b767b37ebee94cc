//! Peer address geo context
//!
//! When a request carries no usable `x-forwarded-for` address, resolves the
//! socket peer address and attaches the result as [`AttachedGeo`]. Handlers
//! receive it explicitly through `Option<web::ReqData<AttachedGeo>>`.

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    dev::{ServiceRequest, ServiceResponse},
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::trace;

use crate::services::{IpResolver, LookupOutcome};
use crate::utils::extract_forwarded_ip;

/// Lookup result for the connection peer, computed before the handler runs
#[derive(Clone, Debug)]
pub struct AttachedGeo {
    pub ip: String,
    pub outcome: LookupOutcome,
}

#[derive(Clone, Default)]
pub struct GeoContextMiddleware;

impl<S, B> Transform<S, ServiceRequest> for GeoContextMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = GeoContextService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(GeoContextService {
            service: Rc::new(service),
        }))
    }
}

pub struct GeoContextService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for GeoContextService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();

        // 有转发头时由 handler 自己解析，避免重复查询
        if extract_forwarded_ip(req.headers()).is_none()
            && let Some(peer) = req.peer_addr()
            && let Some(resolver) = req.app_data::<web::Data<IpResolver>>()
        {
            let ip = peer.ip().to_string();
            let outcome = resolver.resolve(&ip);
            trace!("Attached geo context for peer {}: {:?}", ip, outcome);
            req.extensions_mut().insert(AttachedGeo { ip, outcome });
        }

        Box::pin(async move { srv.call(req).await })
    }
}
