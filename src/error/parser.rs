use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParserError {
    #[error("failed to set parser language: {language}")]
    LanguageSetupFailed { language: String },

    #[error("failed to parse source code in {path}")]
    ParseFailed { path: PathBuf },

    #[error("syntax error in {path} at line {line}, column {column}")]
    SyntaxError {
        path: PathBuf,
        line: usize,
        column: usize,
    },
}

impl ParserError {
    pub fn language_setup_failed(language: impl Into<String>) -> Self {
        Self::LanguageSetupFailed {
            language: language.into(),
        }
    }

    pub fn parse_failed(path: impl Into<PathBuf>) -> Self {
        Self::ParseFailed { path: path.into() }
    }

    pub fn syntax_error(path: impl Into<PathBuf>, line: usize, column: usize) -> Self {
        Self::SyntaxError {
            path: path.into(),
            line,
            column,
        }
    }
}
