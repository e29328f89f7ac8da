//! Render-time tables the compiled artifacts dispatch against: the
//! registered-functions table with its bounded call-result cache, and the
//! translation table with plural selection and blueprint matching.

pub mod error;
pub mod functions;
pub mod translations;

pub use error::RuntimeError;
pub use functions::{FunctionRegistry, Value, DEFAULT_CACHE_BOUND};
pub use translations::TranslationTable;
