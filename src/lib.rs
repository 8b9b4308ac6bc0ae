//! Dashlens - a filter design/equivalence/relation engine for
//! data-exploration dashboards
//!
//! Widgets configure filters against dataset fields; dashlens provides:
//! - Declarative filter designs and their live, identity-carrying instances
//! - Structural compatibility and equivalence over deeply nested compounds
//! - Data source footprints that bucket live filters per column + operator
//! - Filter propagation across declared cross-table field relations
//! - A compact, URL-fragment-safe wire format for shareable links

pub mod catalog;
pub mod codec;
pub mod collection;
pub mod config;
pub mod design;
pub mod error;
pub mod filter;
pub mod source;
pub mod types;

pub use error::{Error, Result};
