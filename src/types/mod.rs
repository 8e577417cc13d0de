pub mod analysis;
pub mod response;

pub use analysis::{AnalysisRecord, AnalysisResult};
pub use response::{AnalysesResponse, StatsResponse, UserProfile};
