/*!
 * Monitoring
 * Structured tracing setup
 */

mod tracer;

pub use tracer::{init_tracing, span_demo, TRACE_JSON_ENV};
