#![forbid(unsafe_code)]

pub mod defaults;
pub mod error;
pub mod model;

pub use defaults::default_bank;
pub use error::Error;
