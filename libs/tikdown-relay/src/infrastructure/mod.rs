//! Infrastructure adapters for the domain ports

mod reqwest_transport;

pub use reqwest_transport::{ReqwestTransport, DEFAULT_MAX_BODY_BYTES, DEFAULT_USER_AGENT};
