//! Per-request HTTP metrics
//!
//! - `http_requests_total` counter, labelled `method`, `path`, `status`
//! - `http_request_duration_seconds` histogram, labelled `method`, `path`

use std::time::Instant;

use axum::{body::Body, extract::MatchedPath, http::Request, middleware::Next, response::Response};

/// Path label for requests that matched no route; keeps label cardinality bounded.
pub const UNMATCHED_PATH: &str = "unmatched";

pub async fn http_metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_PATH.to_string());

    let start = Instant::now();
    let response = next.run(request).await;
    let duration = start.elapsed().as_secs_f64();

    let status = response.status().as_u16().to_string();

    metrics::counter!("http_requests_total", "method" => method.clone(), "path" => path.clone(), "status" => status)
        .increment(1);
    metrics::histogram!("http_request_duration_seconds", "method" => method, "path" => path)
        .record(duration);

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use axum::{middleware, Router};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use tower::Service;

    fn app() -> Router {
        Router::new()
            .route("/products/{id}", get(|| async { "ok" }))
            .layer(middleware::from_fn(http_metrics_middleware))
    }

    async fn hit(uri: &str) {
        let mut svc = app().into_service();
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        svc.call(req).await.unwrap();
    }

    #[tokio::test]
    async fn records_route_template_not_raw_path() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let _guard = metrics::set_default_local_recorder(&recorder);

        hit("/products/1").await;
        hit("/products/2").await;

        let rendered = handle.render();
        assert!(rendered.contains(
            r#"http_requests_total{method="GET",path="/products/{id}",status="200"} 2"#
        ));
        assert!(!rendered.contains("/products/1"));
    }

    #[tokio::test]
    async fn unknown_routes_share_one_label() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let _guard = metrics::set_default_local_recorder(&recorder);

        hit("/nope").await;

        let rendered = handle.render();
        assert!(rendered.contains(r#"path="unmatched",status="404""#));
    }
}
