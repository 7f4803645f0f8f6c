//! HTTP middleware stack for the site.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. CSP nonce (generate per-request nonce for the inline slider script)
//! 5. Security headers (CSP, frame options, etc.)
//! 6. Route guard (public / protected / admin decision)
//!
//! Rate limiting is applied to the login and register form posts only.

pub mod auth;
pub mod csp;
pub mod guard;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;

pub use auth::{AuthRejection, CurrentUser, OptionalAuth, RequireAdmin, RequireAuth};
pub use csp::{CspNonce, csp_nonce_middleware};
pub use guard::{GuardDecision, decide, route_guard_middleware};
pub use rate_limit::auth_rate_limiter;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
