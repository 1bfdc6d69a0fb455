pub mod fallback;
pub mod prompt;
pub mod service;

pub use service::TriageService;
