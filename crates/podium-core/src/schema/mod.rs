pub mod db;
pub mod loader;
pub mod migrations;

pub use db::{Database, StoreStats};
pub use loader::{Loadable, Loader};
