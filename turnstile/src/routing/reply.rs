use bytes::Bytes;
use http::{header, HeaderValue, Response, StatusCode};
use serde::Serialize;

/// Response produced by controllers and the auth gate
pub type Reply = Response<Bytes>;

pub const UNAUTHORIZED_BODY: &str = "401 Unauthorized";

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const APPLICATION_JSON: &str = "application/json";

pub fn text(status: StatusCode, body: impl Into<String>) -> Reply {
    with_content_type(status, Bytes::from(body.into()), TEXT_PLAIN)
}

pub fn json<T: Serialize>(status: StatusCode, value: &T) -> Reply {
    match serde_json::to_vec(value) {
        Ok(body) => with_content_type(status, Bytes::from(body), APPLICATION_JSON),
        Err(e) => {
            tracing::error!("Failed to serialize response body: {}", e);
            text(StatusCode::INTERNAL_SERVER_ERROR, "500 Internal Server Error")
        }
    }
}

/// `{"error": message}` with the given status
pub fn error(status: StatusCode, message: impl Into<String>) -> Reply {
    json(status, &serde_json::json!({ "error": message.into() }))
}

/// The single rejection the auth gate ever produces
pub fn unauthorized() -> Reply {
    text(StatusCode::UNAUTHORIZED, UNAUTHORIZED_BODY)
}

pub fn no_content() -> Reply {
    let mut reply = Response::new(Bytes::new());
    *reply.status_mut() = StatusCode::NO_CONTENT;
    reply
}

fn with_content_type(status: StatusCode, body: Bytes, content_type: &'static str) -> Reply {
    let mut reply = Response::new(body);
    *reply.status_mut() = status;
    reply
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    reply
}
