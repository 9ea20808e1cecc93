//! Link Page Backend Library
//!
//! This library crate defines the modules of a content-sharing backend:
//! shareable "tree" pages carrying external music-service links, with
//! engagement-driven discovery and abuse throttling. It is the foundation
//! for the binary executable (`main.rs`).
//!
//! ## Architecture Modules
//! The system is composed of six loosely coupled subsystems:
//!
//! - **`discovery`**: The ranking core. Merges text filtering over pages and
//!   users with engagement signals (likes, comments, clicks) into a single
//!   ordered, viewer-personalized result sequence.
//! - **`throttle`**: The adaptive rate limiter. A per-fingerprint admission
//!   gate with binary exponential backoff, guarding sensitive public
//!   endpoints as reusable middleware.
//! - **`store`**: The data layer. Concurrent in-memory maps for pages,
//!   users, like edges, comments and newsletter subscriptions, behind the
//!   narrow adapter contract the ranking engine consumes.
//! - **`pages`**: The CRUD surface for pages and their engagement.
//! - **`viewer`**: Optional caller identity, resolved once per request and
//!   passed explicitly to whatever needs it.
//! - **`newsletter`**: Mailing-list signup endpoints.

pub mod discovery;
pub mod error;
pub mod newsletter;
pub mod pages;
pub mod store;
pub mod throttle;
pub mod viewer;
