// src/catalog/mod.rs
pub mod item;
pub mod layout;
pub mod select;
pub mod zipgen;
