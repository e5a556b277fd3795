//! Report renderers for satisfaction results.
//!
//! - [`terminal`] — colored verdicts, summary box and result table; respects `--quiet`.
//!   JSON output is produced directly from [`crate::models`] with `serde_json`.

pub mod terminal;
