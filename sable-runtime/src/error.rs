use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("unknown template function: {name}")]
    UnknownFunction { name: String },

    #[error("template function already registered: {name}")]
    DuplicateFunction { name: String },

    #[error("translation references <{tag}> which the blueprint does not contain")]
    BlueprintMismatch { tag: String },
}
