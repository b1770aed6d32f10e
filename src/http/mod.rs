//! HTTP transport for the send endpoint.
//!
//! The client only needs one capability: POST a body with some headers and
//! get back a status, headers and a body. [`Transport`] is that seam.
//! [`ReqwestTransport`] is the production implementation and
//! [`MockTransport`] replays canned responses in tests.

mod mock;
mod transport;

pub use mock::MockTransport;
pub use transport::{HttpMethod, HttpRequest, HttpResponse, ReqwestTransport, Transport};

/// Content type of every send request.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
