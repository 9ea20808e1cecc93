//! Discovery Module
//!
//! The core ranking subsystem behind the public listing/search endpoint.
//!
//! ## Overview
//! A discovery request merges text filtering over two entity kinds (pages
//! and users) with engagement signals (likes, comments, clicks) into one
//! ordered, category-tagged result sequence, personalized with the viewer's
//! like-set.
//!
//! ## Responsibilities
//! - **Filtering**: visibility and case-insensitive multi-field text
//!   matching, delegated to the store as one batched candidate fetch.
//! - **Ranking**: weighted engagement scoring and dynamic sort/direction
//!   composition with a deterministic tiebreaker.
//! - **Personalization**: one batched like-set fetch turning `liked` into a
//!   concrete boolean when the viewer is known.
//! - **API**: the axum handler translating query parameters into the
//!   engine's request shape.
//!
//! ## Submodules
//! - **`engine`**: the ranking pass itself - pure over its inputs.
//! - **`handlers`**: HTTP request handler and parameter normalization.
//! - **`types`**: request model, policy constants, and response DTOs.

pub mod engine;
pub mod handlers;
pub mod types;
