pub mod api;
pub mod db;
pub mod error;
pub mod models;
pub mod validation;

pub use error::Error;
