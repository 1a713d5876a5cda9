pub type StudioResult<T> = Result<T, StudioError>;

/// Every failure the studio core can report.
///
/// The display prefixes are stable so that front ends can route messages
/// (a selection warning is shown differently from an import failure).
#[derive(thiserror::Error, Debug)]
pub enum StudioError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("selection error: {0}")]
    Selection(String),

    #[error("import error: {0}")]
    Import(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("codegen error: {0}")]
    Codegen(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StudioError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn selection(msg: impl Into<String>) -> Self {
        Self::Selection(msg.into())
    }

    pub fn import(msg: impl Into<String>) -> Self {
        Self::Import(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn codegen(msg: impl Into<String>) -> Self {
        Self::Codegen(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
