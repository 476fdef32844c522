//! The staged workflow: select entities, search, extract, export.
//!
//! Each stage is a free function over trait objects so it can run against
//! real providers or scripted test doubles. [`Session`](crate::session::Session)
//! sequences them and holds their outputs.

pub mod entities;
pub mod export;
pub mod extract;
pub mod progress;
pub mod prompts;
pub mod search;
pub mod throttle;

pub use entities::extract_entities;
pub use export::{export_table, parse_export, write_back, write_csv_file, DEFAULT_EXPORT_FILE};
pub use extract::run_extraction;
pub use progress::{NoProgress, Progress};
pub use prompts::{format_results, render_prompt, render_query, Template};
pub use search::{run_search, SearchErrorPolicy, SearchOptions, DEFAULT_MAX_RESULTS};
pub use throttle::{FixedDelay, NoDelay, Throttle, DEFAULT_SEARCH_DELAY};
