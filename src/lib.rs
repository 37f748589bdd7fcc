//! brew-preview: a local preview server for themed homebrew documents.
//!
//! At startup the base theme stylesheets are compiled from SCSS into the build
//! tree. Afterwards every request that is not a static file renders the local
//! document through the page template and links the compiled themes into it.

pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod routes;
pub mod splice;
pub mod startup;
pub mod state;
pub mod templates;
pub mod theme;

pub use error::AppError;
pub use startup::{prepare, PreviewServer};
