pub mod document;
pub mod envelope;
pub mod error;

pub use document::{AnalysisDocument, AnalysisSummary, MetricPoint};
pub use envelope::RawLogEnvelope;
pub use error::VigilError;
