use std::time::Duration;

pub const MAX_RETRIES: usize = 3;
pub const RETRY_DELAY: Duration = Duration::from_secs(1);

pub mod client;
pub mod document;
pub mod file;
pub mod node;
pub mod store;
pub mod types;


pub use client::FigmaClient;
pub use store::FigmaStore;
pub use types::{FileAttributes, FileRef, NodeAttributes};
