//! Newsletter Module
//!
//! Subscribe/unsubscribe for the mailing list. Subscription is a public
//! mutating endpoint and sits behind the admission gate; actual mail
//! delivery is an external concern.

pub mod handlers;
