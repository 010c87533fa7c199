//! Integration test crate for the animatic engine.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on every animatic crate to verify they work together.

#[cfg(test)]
mod timeline;

#[cfg(test)]
mod render;

#[cfg(test)]
mod export;

#[cfg(test)]
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
