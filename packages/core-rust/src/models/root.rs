//! Landing page and conformance documents.

use serde::{Deserialize, Serialize};

use super::link::Link;

/// Conformance class URI for the core tasking API.
pub const CORE: &str = "https://stapi.example.com/v0.1.0/core";

/// Document served by `GET /conformance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conformance {
    pub conforms_to: Vec<String>,
}

/// Landing page served by `GET /`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootDocument {
    pub id: String,
    pub title: String,
    pub description: String,
    pub conforms_to: Vec<String>,
    pub links: Vec<Link>,
}
