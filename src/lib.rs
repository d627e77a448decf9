//! Composes query documents for a remote content repository and dispatches
//! them over HTTP.
//!
//! ```text
//! views ──> document ──> select ──> window
//!   │          │           └──────> expression ──> ast
//!   │          └─────────────────────────────────> compiler
//!   └──> dispatcher ──> POST {base_url}/api/query
//! ```

pub mod ast;
pub mod compiler;
pub mod config;
pub mod dispatcher;
pub mod document;
pub mod error;
pub mod expression;
pub mod select;
pub mod views;
pub mod window;

pub use config::{DispatcherConfig, HistoryField, ProductProfile, RiskField};
pub use dispatcher::{HttpDispatcher, QueryExecutor};
pub use document::QueryDocument;
pub use error::{ConfigError, Error, Result};
pub use select::{SelectComposer, SelectTree, Selection};
pub use views::ContentViews;
pub use window::{Clock, Cutoff, FixedClock, RollingWindow, SystemClock, WindowUnit};
