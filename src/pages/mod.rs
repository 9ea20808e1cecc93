//! Pages Module
//!
//! The CRUD surface for shareable link pages and their engagement:
//! lifecycle operations, likes, comments, click tracking, and the per-user
//! listings. Thin handlers over the engagement store; ownership checks live
//! here, response shapes come from the discovery DTOs so every listing in
//! the API serializes identically.

pub mod handlers;
pub mod types;
