//! On-demand rendering server for folio docs.
//!
//! Resolves and renders each requested page at request time, answering 404
//! for slugs the content source does not know.

pub mod server;

pub use server::{DocsServer, ServerConfig, ServerError};
