// src/models/mod.rs

pub mod exam;
pub mod index;
pub mod question;
pub mod result;
