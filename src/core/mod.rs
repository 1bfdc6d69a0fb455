pub mod classifier;
pub mod engine;
pub mod instructions;
pub mod pathway;
pub mod pediatric;
pub mod rules;
pub mod segmenter;

pub use crate::domain::model::{CarePathway, SeverityTier, TriageResult};
pub use crate::domain::ports::{ContextRetriever, TextGenerator};
pub use crate::utils::error::Result;
