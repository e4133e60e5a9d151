use axum::{extract::Request, middleware::Next, response::Response};
use uuid::Uuid;

/// Extension type for request ID
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

/// Middleware that tags every request with a unique ID, exposed to
/// handlers via extensions and echoed back in the X-Request-ID header.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();

    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    // Span field for correlation in logs
    tracing::Span::current().record("request_id", request_id.as_str());

    let mut response = next.run(request).await;

    if let Ok(value) = request_id.parse() {
        response.headers_mut().insert("X-Request-ID", value);
    }

    response
}
