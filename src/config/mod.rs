pub mod loader;
pub mod resolve;
pub mod schema;

pub use loader::{load_from_path, load_from_str, ConfigError};
pub use resolve::resolve;
pub use schema::{PatchFile, PatchParams, TextSource};
