use crate::options::OptionsError;
use crate::pattern::PatternError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Pattern(#[from] PatternError),
    #[error(transparent)]
    Options(#[from] OptionsError),
}

pub type Result<T> = std::result::Result<T, Error>;
