//! HTTP inbound adapter exposing the account endpoints and health probes.

pub mod accounts;
pub mod error;
pub mod health;
pub mod schemas;
pub mod session;
pub mod state;

pub use error::ApiResult;
