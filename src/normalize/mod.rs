mod pattern;
mod structured;

use anyhow::{Context, Result};

pub use pattern::PatternNormalizer;
pub use structured::{AddressComponents, StructuredNormalizer};

use crate::config::NormalizerChoice;

/// A deterministic, I/O-free rewrite of a free-text address into a canonical form.
pub trait Normalize: Send + Sync {
    fn normalize(&self, raw: &str) -> String;

    /// Short strategy name, for logs.
    fn name(&self) -> &'static str;
}

/// The normalizer strategy chosen once at startup.
#[derive(Debug, Clone)]
pub enum Normalizer {
    Pattern(PatternNormalizer),
    Structured(StructuredNormalizer),
}

impl Normalizer {
    /// Run the capability check and commit to exactly one strategy.
    pub fn select(choice: NormalizerChoice) -> Result<Self> {
        let normalizer = match choice {
            NormalizerChoice::Pattern => Self::Pattern(PatternNormalizer::new()?),
            NormalizerChoice::Structured => {
                let parser = StructuredNormalizer::new()?;
                parser.self_test().context("structured normalizer requested but unavailable")?;
                Self::Structured(parser)
            }
            NormalizerChoice::Auto => Self::structured_or_pattern(StructuredNormalizer::new())?,
        };
        tracing::debug!(strategy = normalizer.name(), ?choice, "address normalizer selected");
        Ok(normalizer)
    }

    /// Keep the structured parser if it built and passes its self-test, else fall back to pattern rules.
    fn structured_or_pattern(parser: Result<StructuredNormalizer>) -> Result<Self> {
        match parser.and_then(|parser| parser.self_test().map(|_| parser)) {
            Ok(parser) => Ok(Self::Structured(parser)),
            Err(err) => {
                tracing::warn!(error = %err, "structured normalizer unavailable, using pattern rules");
                Ok(Self::Pattern(PatternNormalizer::new()?))
            }
        }
    }
}

impl Normalize for Normalizer {
    fn normalize(&self, raw: &str) -> String {
        match self {
            Self::Pattern(normalizer) => normalizer.normalize(raw),
            Self::Structured(normalizer) => normalizer.normalize(raw),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Pattern(normalizer) => normalizer.name(),
            Self::Structured(normalizer) => normalizer.name(),
        }
    }
}
