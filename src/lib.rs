//! Client library for the administrative console of a certificate
//! management service.
//!
//! The backend owns every ACME interaction and all key material; this
//! crate is the console's side of the conversation. It covers three
//! concerns:
//!
//! - **Form state** ([`form`]): each editable resource keeps its state in
//!   a single JSON-shaped tree, and input widgets address fields with
//!   dotted paths such as `dataToSubmit.subject_alts.2`. The module
//!   provides the path-addressed editor, value coercion, select-option
//!   cascades, and validation-error bookkeeping (including index
//!   renumbering when an editable list shrinks).
//! - **Resource forms** ([`resource`]): one schema-driven engine runs the
//!   validate/submit/reset flow for all resource types — ACME accounts,
//!   ACME servers, certificates, private keys, and challenge providers.
//! - **Backend access** ([`Session`], [`api`]): an authenticated JSON
//!   client with transparent single-flight access-token refresh, plus the
//!   serde models for the backend's payloads.
//!
//! # Usage
//!
//! Connect once, log in, then hand the [`Session`] to as many
//! [`resource::ResourceForm`]s as needed:
//!
//! ```no_run
//! # async fn demo() -> eyre::Result<()> {
//! use console::{resource, Session};
//!
//! let session = Session::new("https://certs.example.com")?;
//! session.login("admin", "hunter2").await?;
//!
//! let schema = resource::private_key_schema();
//! let initial = serde_json::from_value(serde_json::json!({
//!     "dataToSubmit": { "name": "site-key", "algorithm_value": "ecdsap256" }
//! }))?;
//!
//! let mut form = resource::ResourceForm::new(schema, initial);
//! form.submit(&session).await?;
//! # Ok(())
//! # }
//! ```

#![deny(rust_2018_idioms, nonstandard_style, future_incompatible)]

mod error;
mod req;
mod session;

pub mod api;
pub mod form;
pub mod resource;


pub use crate::session::Session;
