//! Core business logic - aggregation summaries and mutation operations.
//!
//! Each module owns one entity: pure summarizers over preloaded lookup
//! tables on the read side, `ServiceResponse` mutations on the write side.

pub mod assessment;
pub mod brain_food;
pub mod ingredient;
pub mod member;
pub mod purchase;
pub mod subject;
