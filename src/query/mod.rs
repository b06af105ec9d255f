//! # Query Construction
//!
//! The shared pagination + dynamic-filter pattern used by every
//! reporting endpoint: an allow-listed filter set that only ever emits
//! bound parameters, and a paginator that clamps bounds and derives
//! navigation links echoing the caller's original query string.

pub mod filter;
pub mod paginate;

pub use filter::FilterSet;
pub use paginate::{lenient_u32, PageLinks, PageRequest, Paginated, DEFAULT_LIMIT, MAX_LIMIT};
