//! HTTP handlers for the admin surface, one module per resource family.
//! Handlers stay thin: parse/validate the request, delegate to a service,
//! shape the response through [`crate::web::responses`].

pub mod epg;
pub mod events;
pub mod health;
pub mod migration;
pub mod stats;
