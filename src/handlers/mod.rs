// src/handlers/mod.rs

pub mod corpus;
pub mod mock;
