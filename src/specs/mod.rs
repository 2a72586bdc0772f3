// src/specs/mod.rs
//! # Page parsers
//!
//! One module per remote page. Each module knows **where the data lives in the
//! markup** and how to read it without falling over when the markup drifts.
//!
//! ## What lives here
//! - **Pure parsers** (`parse_*`, `fill_credentials`) that take markup and return
//!   small owned structs. They never fail on odd markup; missing pieces become `""`.
//! - **Thin fetchers** (`discover`, `fetch_roster`, `fetch_details`) that do one GET
//!   through `core::net::Session` and hand the body to the parser.
//!
//! ## What does **not** live here
//! - **Sequencing** (login before roster, wing filter, cancel checks): `worker`.
//! - **Layout and PDF output**: `render`.
//!
//! ## Typical call chain
//! ```text
//! worker::Orchestrator → specs::login::discover → fill_credentials → POST
//!                      → specs::roster::fetch_roster
//!                      → specs::details::fetch_details (per selected record)
//!                      → render::render_document
//! ```
//!
//! ## Current specs
//! - `login`: first `<form>` on the login page, hidden/submit payload, and the
//!   username/password field heuristic.
//! - `roster`: `.titulobkSingCAPS` blocks with fixed line offsets plus photo lookup.
//! - `details`: registration + description pages, one selector per field.
//!
//! ## Testing notes
//! Every parser is exercised offline against inline markup in its own `tests` module.
pub mod details;
pub mod login;
pub mod roster;
