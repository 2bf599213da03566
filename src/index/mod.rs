//! Metadata indexing module
//!
//! This module turns a directory of recorder sidecar files into a query result:
//! - Listing `.meta` files in the base directory
//! - Parsing and validating each record
//! - Filtering by time range and device
//! - Grouping by timestamp, device and stream type

pub mod aggregate;
pub mod record;
pub mod scanner;

pub use aggregate::{aggregate, Aggregation, QueryFilter};
pub use record::{parse_record, MetadataRecord};
pub use scanner::{scan_directory, scan_directory_with_summary};
