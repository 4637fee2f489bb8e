// src/specs/mod.rs
//! # Format/site “specs” module
//!
//! This module hosts the **vendor-specific knowledge** of the pipeline.
//! Each spec focuses on a single external format or site and encodes
//! *where the ground truth lives* and *how to extract it robustly*.
//!
//! ## What lives here
//! - `anart` – parser for the raw “ANALISI ARTICOLI” CSV export: a
//!   paginated report with repeated row labels, wrapped quoted fields
//!   and carried-forward department/category/supplier columns.
//! - `media` – where the store keeps product photos: Magento media-tree
//!   URL candidates, cache-path collapsing, placeholder detection.
//!
//! ## What does **not** live here
//! - **Persistence** (`store::save_clean` / `store::load_clean_cache`) – that
//!   is handled by higher layers.
//! - **KPI/selection or export formatting** – the catalog layer reads
//!   canonical rows and applies its own transforms.
//!
//! ## Conventions & invariants
//! - Tolerant extraction: skip malformed rows, never abort the whole
//!   report over one bad line.
//! - Return **stable shapes** (documented per spec) so the rest of the
//!   pipeline can rely on them.
//! - Specs are testable **offline** against inline fixtures.
pub mod anart;
pub mod media;
