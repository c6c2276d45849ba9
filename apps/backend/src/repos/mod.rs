//! Storage for finished games.

pub mod games;
