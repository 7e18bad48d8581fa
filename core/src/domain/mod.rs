//! Domain layer - Pure command-line analysis and data models.
//!
//! This module contains the heuristics that turn a raw command line into a
//! source path and a service URL hint. Nothing here performs I/O, so it can be
//! tested in isolation.

mod classifier;
mod filter;
mod path;
mod raw_row;
mod record;
mod tokenizer;
mod url;

pub use classifier::{
    flag_consumes_next_argument, is_flag, is_inline_eval_flag, is_interpreter_executable,
    is_interpreter_flag, is_launcher, looks_like_file_path, strip_flag_prefix, DEPENDENCY_DIR,
    INLINE_EVAL_FLAGS, INTERPRETER,
};
pub use filter::{NameFilter, ScanOptions};
pub use path::{extract_path, truncate_at_dependency_dir, INLINE_PATH};
pub use raw_row::RawRow;
pub use record::{is_node_like, ListeningPort, ProcessRecord, RawProcessLine};
pub use tokenizer::tokenize;
pub use url::{infer_url, localhost_url, UrlHint, FRAMEWORK_DEFAULT_URL};
