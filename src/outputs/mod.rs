//! Output generation modules for JSON and Markdown.
//!
//! # Submodules
//!
//! - [`json`]: Writes a full run (records, rows, report) to a date-stamped
//!   JSON file for API consumption
//! - [`markdown`]: Renders the flattened table and per-category counts as a
//!   Markdown document
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! └── 2025-05-06/
//!     ├── morning.json
//!     ├── afternoon.json
//!     └── evening.json
//! output_dir/
//! └── 2025-05-06_morning.md
//! ```

pub mod json;
pub mod markdown;
