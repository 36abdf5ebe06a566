pub mod error;
pub mod io;
pub mod paths;
pub mod prompt;
pub mod questions;
pub mod render;
pub mod scaffold;
pub mod store;
pub mod templates;
pub mod types;

pub use error::{HelmgenError, Result};
