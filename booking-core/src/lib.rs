pub mod common;
pub mod database;
pub mod domain;
pub mod storage;

pub use common::error::{BookingError, Result};
pub use database::DatabaseManager;
pub use domain::*;
