pub mod entities;
pub mod error;
pub mod health;

pub use error::AppError;
