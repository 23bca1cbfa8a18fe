//! Pipeline-level tests against in-memory fakes.

pub(crate) mod support;

mod pipeline;
