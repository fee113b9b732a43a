//! Request middleware.
//!
//! Purpose: Define middleware components for request lifecycle concerns such as
//! tracing, panic recovery, deadlines, rate limiting and session identity.
//!
//! Wrap order, outermost first: [`Trace`], [`CatchPanic`], [`RequestTimeout`],
//! [`RateLimit`], [`SessionIdentity`].

pub mod catch_panic;
pub mod identity;
pub mod rate_limit;
pub mod timeout;
pub mod trace;

pub use catch_panic::CatchPanic;
pub use identity::SessionIdentity;
pub use rate_limit::{RateLimit, RateLimitConfig};
pub use timeout::RequestTimeout;
pub use trace::Trace;
