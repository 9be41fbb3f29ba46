pub mod config;
pub mod error;
pub mod event;
pub mod notify;
pub mod pipeline;
pub mod rate;
pub mod storage;

pub use config::Config;
pub use error::{ResizeError, ServiceError};
pub use event::{ResizeEvent, ResizeResult};
pub use notify::{Notifier, SnsNotifier};
pub use pipeline::Resizer;
pub use rate::RateTracker;
pub use storage::{ObjectStore, S3Store};
