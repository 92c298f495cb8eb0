pub mod backend;
pub mod config;
pub mod error;
pub mod io;
pub mod notify;
pub mod paths;
pub mod person;
pub mod reminder;
pub mod schedule;
pub mod session;
pub mod store;
pub mod week;

pub use error::{PickupError, Result};
