//! Engagement Store Module
//!
//! The data layer: pages, users, like edges, comments, and newsletter
//! subscriptions, held in concurrent in-memory maps.
//!
//! ## Core Concepts
//! - **Adapter contract**: `EngagementStore` is the narrow read surface the
//!   discovery subsystem consumes - one candidate fetch, one like-set fetch.
//! - **Hydration**: pages are served as `PageCandidate`s carrying derived
//!   like/comment counts and an owner summary, so downstream code never
//!   issues per-page count queries.
//! - **Mutation surface**: CRUD operations used by the page, engagement and
//!   newsletter handlers live directly on `MemoryStore`.

pub mod adapter;
pub mod memory;
pub mod types;

#[cfg(test)]
mod tests;
