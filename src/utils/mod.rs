pub(crate) mod sync;
pub(crate) mod tracing;
