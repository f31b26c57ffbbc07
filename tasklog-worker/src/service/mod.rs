//! Service layer
//!
//! Services contain the worker's file-access logic. None of them know about
//! connections: the processor calls exactly one service per command and
//! writes the result back itself.
//!
//! Every service is stateless apart from the read-only log root, so a single
//! instance can be shared across concurrently processed commands.

mod app_id;
mod file_reader;
mod lines;
mod path_guard;
mod remover;
mod roll_reader;

pub use app_id::extract_app_ids;
pub use file_reader::{read_all_bytes, read_whole_file};
pub use path_guard::PathGuard;
pub use remover::remove_log_file;
pub use roll_reader::RollingLineReader;
