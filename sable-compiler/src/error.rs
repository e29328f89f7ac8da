use std::path::PathBuf;
use thiserror::Error;

/// Fatal compilation failures. There is no local recovery: every variant
/// aborts the in-flight compile and carries the template path (and tag
/// names where available) so the fault can be located.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("template not found: {path}")]
    TemplateNotFound { path: PathBuf },

    #[error("cache directory is not writable: {dir}")]
    CacheDirNotWritable { dir: PathBuf },

    #[error("failed to read {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("{template}: parse error: {message}")]
    Parse { template: String, message: String },

    #[error("{template}: translations may not be nested (<{outer}> contains <{inner}>)")]
    NestedTranslation {
        template: String,
        outer: String,
        inner: String,
    },

    #[error("{template}: s-bind on <{tag}> requires a target attribute (s-bind:<attr>)")]
    MissingBindType { template: String, tag: String },

    #[error("{template}: malformed s-for on <{tag}>: {value:?}")]
    MalformedFor {
        template: String,
        tag: String,
        value: String,
    },

    #[error("{template}: partial include depth exceeded at {path:?}")]
    IncludeDepth { template: String, path: String },
}
