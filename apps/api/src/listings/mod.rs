//! Internship listings: loading, location canonicalization, filtering and the
//! read-only views built on top of a filtered selection.

pub mod cache;
pub mod canonical;
pub mod dataset;
pub mod export;
pub mod extract;
pub mod facets;
pub mod filter;
pub mod handlers;
pub mod models;
pub mod normalize;
pub mod page;
pub mod rank;
pub mod regions;
pub mod stats;
