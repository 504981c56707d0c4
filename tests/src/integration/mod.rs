//! Cross-component flows: HTTP intake through enrichment to bus hand-off.

pub mod ingest_flow;
