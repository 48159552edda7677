use crate::diagnosis::{Backbone, Task};
use crate::models::OnnxModel;
use crate::utils::error::DiagnosisError;
use crate::{Config, Result};
use ndarray::Array2;

/// 将特征向量映射为 [0, 1] 标量的分类头
pub trait ClassifierHead: Send + Sync {
    fn predict(&self, features: &Array2<f32>) -> Result<f32>;
}

pub struct OnnxClassifierHead {
    model: OnnxModel,
}

impl OnnxClassifierHead {
    pub fn new(config: &Config, task: Task, backbone: Backbone) -> Result<Self> {
        let label = format!("{} {} head", task, backbone);
        let model = OnnxModel::load(
            &label,
            &config.head_model_path(task, backbone),
            &config.onnx_config,
        )?;

        Ok(Self { model })
    }
}

impl ClassifierHead for OnnxClassifierHead {
    fn predict(&self, features: &Array2<f32>) -> Result<f32> {
        let output = self.model.run(features.clone().into_dyn())?;
        first_score(output.iter().copied(), self.model.label())
    }
}

/// 取输出的 [0][0] 元素
pub(crate) fn first_score(mut values: impl Iterator<Item = f32>, label: &str) -> Result<f32> {
    match values.next() {
        Some(score) if score.is_finite() => Ok(score),
        Some(score) => Err(DiagnosisError::Inference(format!(
            "{} produced a non-finite score: {}",
            label, score
        ))),
        None => Err(DiagnosisError::Inference(format!(
            "{} produced an empty output",
            label
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_first_element() {
        let score = first_score([0.42_f32, 0.9].into_iter(), "test").unwrap();
        assert_eq!(score, 0.42);
    }

    #[test]
    fn rejects_empty_and_nan_outputs() {
        assert!(first_score(std::iter::empty(), "test").is_err());
        assert!(first_score([f32::NAN].into_iter(), "test").is_err());
    }
}
