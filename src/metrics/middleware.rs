//! Actix middleware feeding the HTTP metrics.
//!
//! Requests are labelled by route pattern (`/status`), falling back to the raw
//! path for unmatched requests, so query strings never create new series.

use crate::metrics::{ERROR_COUNTER, REQUEST_COUNTER, REQUEST_LATENCY};
use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::StatusCode,
    Error,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::{
    task::{Context, Poll},
    time::Instant,
};

pub struct MetricsMiddleware;

impl<S, B> Transform<S, ServiceRequest> for MetricsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = MetricsMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MetricsMiddlewareService { service }))
    }
}

pub struct MetricsMiddlewareService<S> {
    service: S,
}

/// Endpoint and method of one request plus the moment it arrived.
struct RequestTiming {
    endpoint: String,
    method: String,
    started: Instant,
}

impl RequestTiming {
    fn start(req: &ServiceRequest) -> Self {
        Self {
            endpoint: req
                .match_pattern()
                .unwrap_or_else(|| req.path().to_string()),
            method: req.method().to_string(),
            started: Instant::now(),
        }
    }

    fn finish(self, status: StatusCode) {
        let code = status.as_u16().to_string();
        let labels = [self.endpoint.as_str(), self.method.as_str(), code.as_str()];

        REQUEST_LATENCY
            .with_label_values(&labels)
            .observe(self.started.elapsed().as_secs_f64());
        REQUEST_COUNTER.with_label_values(&labels).inc();
        if status.is_client_error() || status.is_server_error() {
            ERROR_COUNTER.with_label_values(&labels).inc();
        }
    }
}

impl<S, B> Service<ServiceRequest> for MetricsMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let timing = RequestTiming::start(&req);
        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await;
            let status = match &res {
                Ok(response) => response.response().status(),
                Err(e) => e.as_response_error().status_code(),
            };
            timing.finish(status);
            res
        })
    }
}
