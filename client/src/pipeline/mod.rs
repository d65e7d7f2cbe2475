//! Request and response pipelines.
//!
//! Every call passes through [`RequestPipeline::prepare`] before dispatch and
//! [`ResponsePipeline::handle`] after it. Together they own the session policy:
//! attaching the bearer token, short-circuiting known-absent lookups, and
//! classifying each outcome exactly once.

pub mod request;
pub mod response;

pub use request::{PreDispatch, RequestPipeline};
pub use response::{Exchange, Outcome, ResponsePipeline};
