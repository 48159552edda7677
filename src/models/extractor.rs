use crate::diagnosis::Backbone;
use crate::models::OnnxModel;
use crate::utils::error::DiagnosisError;
use crate::{Config, Result};
use ndarray::{Array2, Array4};

/// 预训练卷积特征提取器（去掉顶层分类层）
pub trait FeatureExtractor: Send + Sync {
    fn backbone(&self) -> Backbone;

    /// 输入已按 `backbone().normalization()` 处理的 (1, H, W, 3) 张量，
    /// 输出展平后的 (1, N) 特征
    fn extract(&self, pixels: &Array4<f32>) -> Result<Array2<f32>>;
}

pub struct OnnxFeatureExtractor {
    backbone: Backbone,
    model: OnnxModel,
}

impl OnnxFeatureExtractor {
    pub fn new(config: &Config, backbone: Backbone) -> Result<Self> {
        let label = format!("{} extractor", backbone);
        let model = OnnxModel::load(
            &label,
            &config.extractor_model_path(backbone),
            &config.onnx_config,
        )?;

        Ok(Self { backbone, model })
    }
}

impl FeatureExtractor for OnnxFeatureExtractor {
    fn backbone(&self) -> Backbone {
        self.backbone
    }

    fn extract(&self, pixels: &Array4<f32>) -> Result<Array2<f32>> {
        let feature_map = self.model.run(pixels.clone().into_dyn())?;
        flatten(feature_map.iter().copied().collect(), self.model.label())
    }
}

/// 按行优先顺序展平为单行
pub(crate) fn flatten(values: Vec<f32>, label: &str) -> Result<Array2<f32>> {
    if values.is_empty() {
        return Err(DiagnosisError::Inference(format!(
            "{} produced an empty feature map",
            label
        )));
    }

    let len = values.len();
    Array2::from_shape_vec((1, len), values)
        .map_err(|e| DiagnosisError::Inference(format!("{} reshape failed: {}", label, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn flatten_keeps_row_major_order() {
        let map = Array3::from_shape_fn((2, 2, 2), |(a, b, c)| (a * 4 + b * 2 + c) as f32);
        let flat = flatten(map.iter().copied().collect(), "test").unwrap();

        assert_eq!(flat.shape(), &[1, 8]);
        assert_eq!(flat.row(0).to_vec(), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn empty_feature_map_is_rejected() {
        assert!(matches!(
            flatten(Vec::new(), "test"),
            Err(DiagnosisError::Inference(_))
        ));
    }
}
