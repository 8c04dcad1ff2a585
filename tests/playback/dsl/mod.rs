//! Test DSL module
//!
//! Provides a builder pattern-based test DSL to drive a cursor over a chart in test code.
//!
//! # Core Types
//!
//! - [`TestCursorDriver`](TestCursorDriver) - Main driver owning the chart and the cursor
//! - [`CursorStepBuilder`](CursorStepBuilder) - Step builder for adding assertions
//!
//! # Usage Examples
//!
//! ## Simple Scenario
//!
//! ```ignore
//! TestCursorDriver::new(chart, CursorConfig::default())
//!     .to_ms(1500)
//!     .view(move |cursor| assert_eq!(cursor.zone_of(note), Some(Zone::Primary)))
//!     .events(|crossings| assert_eq!(crossings.len(), 2))
//!     .run();
//! ```
//!
//! ## Multiple Steps
//!
//! ```ignore
//! TestCursorDriver::new(chart, CursorConfig::default())
//!     .to_ms(1500)
//!         .view(move |cursor| assert_eq!(cursor.zone_of(note), Some(Zone::Primary)))
//!     .to_ms(2000)
//!         .view(move |cursor| assert_eq!(cursor.zone_of(note), Some(Zone::Secondary)))
//!     .to_ms(0)
//!         .view(move |cursor| assert_eq!(cursor.zone_of(note), Some(Zone::Ahead)))
//!     .run();
//! ```

mod helpers;

pub use driver::TestCursorDriver;
pub use helpers::{chip, dense_chart, secs, single_note_chart, summary};
pub use step::CursorStepBuilder;
