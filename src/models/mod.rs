pub mod extractor;
pub mod head;
pub mod manager;
pub mod session;

pub use extractor::{FeatureExtractor, OnnxFeatureExtractor};
pub use head::{ClassifierHead, OnnxClassifierHead};
pub use manager::{HeadPair, ModelManager, ModelStats};
pub use session::OnnxModel;
