// src/core/mod.rs
pub mod decode;
pub mod heel;
pub mod net;
pub mod num;
