//! Inbound adapters translating external requests into domain calls.
//!
//! Only HTTP exists today; see [`http`].

pub mod http;
