use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormError {
    #[error("unsupported attribute \"{name}\" on {node} node")]
    UnsupportedAttribute { node: String, name: String },

    #[error("{node} nodes do not support {capability}")]
    UnsupportedCapability {
        node: String,
        capability: &'static str,
    },

    #[error("no factory handler registered for key \"{0}\"")]
    UnknownFactoryArgument(String),

    #[error("unknown node class \"{0}\"")]
    UnknownNodeClass(String),

    #[error("invalid factory value: {0}")]
    InvalidFactoryValue(String),

    #[error("It seems you're not allowed to save data on {0}")]
    InvalidSecurityToken(String),

    #[error("You are not authorized to edit this content")]
    PermissionDenied,

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, FormError>;
