pub mod driver;
pub use driver::Driver;

mod error;
pub use error::{Error, FieldErrors, IntoError};

pub mod schema;
pub use schema::{Schema, Schemas};

pub mod stmt;

/// A Result type alias that uses sheetorm's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

pub use async_trait::async_trait;
