//! REST collaborator used by the list and KYC components
//!
//! The server is opaque: we only know how to send parameters to a path and
//! get JSON back. Endpoint paths vary per list instance and are passed in by
//! the caller as [`Endpoint`] values.

mod client;

pub use client::ApiClient;

/// How parameters are transmitted to an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// Parameters in the query string
    Get,
    /// Parameters as a form body
    Post,
}

/// A list or document endpoint relative to the API base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub path: String,
    pub method: HttpMethod,
}

impl Endpoint {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: HttpMethod::Get,
        }
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: HttpMethod::Post,
        }
    }
}
