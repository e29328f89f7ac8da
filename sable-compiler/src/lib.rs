//! Compiles `s-*`-annotated HTML/XML templates into PHP artifacts for a
//! host evaluator: interpolation rewriting, directive attributes, control
//! flow, translation weaving, partial includes, and an mtime-checked
//! compile cache.

pub mod attrs;
pub mod cache;
pub mod compile;
pub mod emit;
pub mod error;
pub mod expr;
pub mod forloop;
pub mod interp;
pub mod translate;

pub use attrs::{CompiledAttr, CompiledAttrs, ControlOpen};
pub use cache::CompileCache;
pub use compile::{Compiler, CompilerOptions, TRANSPARENT_TAG};
pub use error::CompileError;
pub use expr::rewrite_calls;
pub use forloop::{parse_for_value, ForLoop};
pub use interp::{scan_interpolations, InterpSpan};
pub use sable_dom::ContentType;
