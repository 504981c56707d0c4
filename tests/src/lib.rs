//! # Ingestion Gateway Test Suite
//!
//! Unified test crate exercising the gateway end-to-end.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/      # HTTP surface driven against the in-memory bus
//!     ├── ingest_flow.rs
//!     └── health.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p ingest-tests
//!
//! # By category
//! cargo test -p ingest-tests integration::
//! ```

#![allow(unused_imports)]
#![allow(dead_code)]

pub mod integration;
