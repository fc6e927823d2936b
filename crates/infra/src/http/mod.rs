//! HTTP transport shared by the provider clients

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};
