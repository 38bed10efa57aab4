//! # sizetablib
//!
//! Renders hierarchical, size-annotated label trees — the output of a
//! binary-size analysis — as bordered text tables, in plain ASCII or
//! Unicode line-drawing glyphs, optionally reStructuredText-compatible.
//!
//! ## Overview
//!
//! A size report is an ordered sequence of leaf [`Label`]s, each carrying
//! a name, a byte size, and its ancestor path through the report's data
//! sources (e.g. segment → symbol). [`DataSourceMap`] validates the
//! sequence once and aggregates ancestor sizes; [`TableBuilder`] lays the
//! hierarchy out as a bordered grid with a header, one column per depth,
//! a trailing size column, and a total row.
//!
//! Two reports can be reconciled with [`diff_maps`] into a
//! [`DiffDataSourceMap`]: the table then gains a leading status column
//! (`++` added, `--` removed), signed size deltas, and wholly-unchanged
//! top-level groups collapse to a single `(SAME)` row.
//!
//! ## Example
//!
//! ```rust
//! use sizetablib::{DataSourceMap, Label, RenderOptions, SourceMap, TableBuilder};
//!
//! let map = DataSourceMap::from_labels(
//!     vec!["memories".to_string(), "sections".to_string()],
//!     vec![
//!         Label::new("boot", 1024, ["FLASH"]),
//!         Label::new("heap", 4096, ["RAM"]),
//!     ],
//! )
//! .unwrap();
//!
//! let table = TableBuilder::new(&SourceMap::Plain(map), RenderOptions::new()).build();
//! assert!(table.contains("FLASH"));
//! assert!(table.contains("5,120"));
//! ```

pub mod charset;
pub mod diff;
pub mod error;
pub mod label;
pub mod map;
pub mod options;
pub mod table;

pub use charset::Charset;
pub use diff::diff_maps;
pub use error::SizetabError;
pub use label::{DiffStatus, Label};
pub use map::{DataSourceMap, DepthNode, DiffDataSourceMap, SourceMap};
pub use options::RenderOptions;
pub use table::TableBuilder;

/// Result type for sizetablib operations
pub type Result<T> = std::result::Result<T, SizetabError>;
