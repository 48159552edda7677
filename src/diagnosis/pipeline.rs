use crate::{
    diagnosis::{Backbone, BackboneScores, Diagnosis, EnsembleAverager, Task},
    image::ImageLoader,
    models::ModelManager,
    Result,
};
use ndarray::{Array2, Array4};
use std::path::Path;
use std::time::Instant;

/// 诊断流水线：加载图像 → 双网络特征提取 → 分类头 → 集成平均
pub struct DiagnosisPipeline;

impl DiagnosisPipeline {
    /// 对磁盘上的图像文件执行诊断
    pub fn diagnose(models: &ModelManager, task: Task, image_path: &Path) -> Result<Diagnosis> {
        let start_time = Instant::now();

        let pixels = ImageLoader::load_tensor(image_path)?;
        let preprocessing_time = start_time.elapsed();

        let diagnosis = Self::diagnose_tensor(models, task, &pixels)?;

        tracing::info!(
            "Diagnosis completed: model={}, prediction={}, confidence={:.4}, preprocess={:.3}s, total={:.3}s",
            diagnosis.model,
            diagnosis.prediction,
            diagnosis.confidence,
            preprocessing_time.as_secs_f32(),
            start_time.elapsed().as_secs_f32()
        );

        Ok(diagnosis)
    }

    /// 对已预处理的 (1, 224, 224, 3) 张量执行诊断
    pub fn diagnose_tensor(
        models: &ModelManager,
        task: Task,
        pixels: &Array4<f32>,
    ) -> Result<Diagnosis> {
        let vgg_features = Self::extract(models, Backbone::Vgg16, pixels)?;
        let resnet_features = Self::extract(models, Backbone::ResNet50, pixels)?;

        let heads = models.heads(task);
        let scores = BackboneScores {
            vgg: heads.vgg.predict(&vgg_features)?,
            resnet: heads.resnet.predict(&resnet_features)?,
        };

        tracing::debug!(
            "{} head scores: vgg={:.4}, resnet={:.4}",
            task,
            scores.vgg,
            scores.resnet
        );

        Ok(EnsembleAverager::combine(task, scores))
    }

    fn extract(models: &ModelManager, backbone: Backbone, pixels: &Array4<f32>) -> Result<Array2<f32>> {
        let extraction_start = Instant::now();
        let extractor = models.extractor(backbone);
        let input = backbone.normalization().apply(pixels);
        let features = extractor.extract(&input)?;

        tracing::debug!(
            "{} features: len={}, time={:.3}s",
            backbone,
            features.len(),
            extraction_start.elapsed().as_secs_f32()
        );

        Ok(features)
    }
}
