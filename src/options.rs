use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_MAX_THREADS: usize = 4096;

bitflags! {
    /// Flags accepted by [`crate::compile`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CompileFlags: u8 {
        /// Treat whitespace tokens as significant instead of skipping them.
        const WITH_WHITESPACE = 0b00000001;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternOptions {
    pub include_whitespace: bool,
    /// Upper bound on live threads a matcher keeps between tokens.
    pub max_threads: usize,
}

impl Default for PatternOptions {
    fn default() -> Self {
        Self {
            include_whitespace: false,
            max_threads: DEFAULT_MAX_THREADS,
        }
    }
}

impl PatternOptions {
    pub fn builder() -> PatternOptionsBuilder {
        PatternOptionsBuilder::default()
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.max_threads == 0 {
            return Err(OptionsError::MaxThreadsInvalid {
                provided: self.max_threads,
            });
        }
        Ok(())
    }

    pub fn skips_whitespace(&self) -> bool {
        !self.include_whitespace
    }
}

impl From<CompileFlags> for PatternOptions {
    fn from(flags: CompileFlags) -> Self {
        Self {
            include_whitespace: flags.contains(CompileFlags::WITH_WHITESPACE),
            ..Self::default()
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct PatternOptionsBuilder {
    options: PatternOptions,
}

impl PatternOptionsBuilder {
    pub fn include_whitespace(mut self, value: bool) -> Self {
        self.options.include_whitespace = value;
        self
    }

    pub fn max_threads(mut self, value: usize) -> Self {
        self.options.max_threads = value;
        self
    }

    pub fn flags(mut self, flags: CompileFlags) -> Self {
        self.options.include_whitespace = flags.contains(CompileFlags::WITH_WHITESPACE);
        self
    }

    pub fn build(self) -> Result<PatternOptions, OptionsError> {
        let options = self.options;
        options.validate()?;
        Ok(options)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OptionsError {
    #[error("max_threads must be at least 1 (got {provided})")]
    MaxThreadsInvalid { provided: usize },
}
