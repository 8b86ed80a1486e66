//! Domain error types.
//!
//! Evaluation itself never fails for missing data: unavailable values
//! degrade to `false` at the predicate level. Errors here cover the outer
//! surfaces: configuration, predicate text, and bar retrieval.

/// A parse error with position information for predicate parsing.
#[derive(Debug, Clone, thiserror::Error)]
#[error("parse error at position {position}: {message}")]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl ParseError {
    /// Format the error with a caret pointing at the error position in the input.
    pub fn display_with_context(&self, input: &str) -> String {
        let caret = " ".repeat(self.position) + "^";
        format!(
            "{input}\n{caret}\n{err}",
            input = input,
            caret = caret,
            err = self
        )
    }
}

/// Top-level error type for tradesig.
#[derive(Debug, thiserror::Error)]
pub enum TradesigError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    PredicateParse(#[from] ParseError),

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TradesigError> for std::process::ExitCode {
    fn from(err: &TradesigError) -> Self {
        let code: u8 = match err {
            TradesigError::Io(_) => 1,
            TradesigError::ConfigParse { .. }
            | TradesigError::ConfigMissing { .. }
            | TradesigError::ConfigInvalid { .. } => 2,
            TradesigError::PredicateParse(_) => 4,
            TradesigError::Data { .. } | TradesigError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
