pub mod ensemble;
pub mod pipeline;
pub mod types;

pub use ensemble::EnsembleAverager;
pub use pipeline::DiagnosisPipeline;
pub use types::{Backbone, BackboneScores, Diagnosis, Prediction, Task};
