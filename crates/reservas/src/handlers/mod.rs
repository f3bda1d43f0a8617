pub mod error;
pub mod health;
pub mod records;

pub use error::AppError;
