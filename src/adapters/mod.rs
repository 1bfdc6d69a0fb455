// Adapters layer: concrete implementations of the domain ports for external systems.

pub mod ollama;
pub mod pubmed;
pub mod unavailable;

pub use ollama::OllamaGenerator;
pub use pubmed::PubMedRetriever;
pub use unavailable::{UnavailableGenerator, UnavailableRetriever};
