pub mod metrics;
pub mod panic;
pub mod security_headers;
pub mod tracing;

pub use self::metrics::metrics_middleware;
pub use panic::panic_response;
pub use security_headers::security_headers_middleware;
pub use self::tracing::{REQUEST_ID_HEADER, http_request_span, request_id_middleware};
