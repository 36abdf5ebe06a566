use thiserror::Error;

#[derive(Debug, Error)]
pub enum HelmgenError {
    #[error("{file} not found: run 'helmgen app' first to create the base chart")]
    MissingSharedFile { file: String },

    #[error("This project does not have any APIs to assign hooks to")]
    NoApis,

    #[error("unknown generator '{0}': expected app, app:api or app:hook")]
    UnknownGenerator(String),

    #[error("invalid hook type: {0}")]
    InvalidHookType(String),

    #[error("template not found: {0}")]
    TemplateNotFound(String),

    #[error("template '{template}' references unknown value '{name}'")]
    MissingTemplateValue { template: String, name: String },

    #[error("template '{template}' uses unknown filter '{filter}'")]
    UnknownFilter { template: String, filter: String },

    #[error("input closed before '{0}' was answered")]
    InputClosed(String),

    #[error("fragment marker '{0}' is not closed")]
    UnclosedMarker(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HelmgenError>;
