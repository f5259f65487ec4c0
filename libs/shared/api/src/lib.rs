pub mod client;

pub use client::{ApiClient, Envelope};
