mod error;
mod repository;
mod settings;
mod window;

pub use error::{Error, Result};
pub use repository::Repository;
pub use settings::{Settings, TrackerSettings};
pub use window::ReportWindow;
