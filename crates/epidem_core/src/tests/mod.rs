//! Tests for the sweep index and query engine
//!
//! Tests are organized by topic:
//! - `fixtures` - In-memory sweep files shared by the other modules
//! - `grid` - N-dimensional storage, slicing and NaN sanitization
//! - `container` - In-memory backend and JSON fixtures
//! - `metadata` - Run counts, focus sets and case table extraction
//! - `index` - Focus table, outcome references, shape and locations
//! - `query` - Outcome queries, aggregation and error paths

mod query;
