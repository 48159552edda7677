use crate::diagnosis::{Backbone, Task};
use crate::models::{ClassifierHead, FeatureExtractor, OnnxClassifierHead, OnnxFeatureExtractor};
use crate::utils::error::DiagnosisError;
use crate::{Config, Result};
use std::sync::Arc;

/// 同一任务下与两个特征提取器配对的分类头
#[derive(Clone)]
pub struct HeadPair {
    pub vgg: Arc<dyn ClassifierHead>,
    pub resnet: Arc<dyn ClassifierHead>,
}

impl HeadPair {
    pub fn new(vgg: Arc<dyn ClassifierHead>, resnet: Arc<dyn ClassifierHead>) -> Self {
        Self { vgg, resnet }
    }

    fn load(config: &Config, task: Task) -> Result<Self> {
        Ok(Self {
            vgg: Arc::new(OnnxClassifierHead::new(config, task, Backbone::Vgg16)?),
            resnet: Arc::new(OnnxClassifierHead::new(config, task, Backbone::ResNet50)?),
        })
    }
}

/// 进程级模型集合
///
/// 启动时构建一次，之后只读，通过 `Arc` 在请求间共享。
pub struct ModelManager {
    vgg: Arc<dyn FeatureExtractor>,
    resnet: Arc<dyn FeatureExtractor>,
    mri: HeadPair,
    spiral: HeadPair,
}

impl ModelManager {
    /// 从模型目录加载全部ONNX模型
    pub fn load(config: &Config) -> Result<Self> {
        tracing::info!("Initializing model manager...");

        let vgg: Arc<dyn FeatureExtractor> =
            Arc::new(OnnxFeatureExtractor::new(config, Backbone::Vgg16)?);
        let resnet: Arc<dyn FeatureExtractor> =
            Arc::new(OnnxFeatureExtractor::new(config, Backbone::ResNet50)?);
        let mri = HeadPair::load(config, Task::Mri)?;
        let spiral = HeadPair::load(config, Task::Spiral)?;

        let manager = Self::from_parts(vgg, resnet, mri, spiral)?;
        tracing::info!("Model manager initialized successfully");
        Ok(manager)
    }

    /// 由已构建的组件组装，提取器必须与其位置的网络一致
    pub fn from_parts(
        vgg: Arc<dyn FeatureExtractor>,
        resnet: Arc<dyn FeatureExtractor>,
        mri: HeadPair,
        spiral: HeadPair,
    ) -> Result<Self> {
        for (extractor, expected) in [(&vgg, Backbone::Vgg16), (&resnet, Backbone::ResNet50)] {
            if extractor.backbone() != expected {
                return Err(DiagnosisError::ModelLoad(format!(
                    "Expected {} extractor, got {}",
                    expected,
                    extractor.backbone()
                )));
            }
        }

        Ok(Self {
            vgg,
            resnet,
            mri,
            spiral,
        })
    }

    pub fn extractor(&self, backbone: Backbone) -> Arc<dyn FeatureExtractor> {
        match backbone {
            Backbone::Vgg16 => Arc::clone(&self.vgg),
            Backbone::ResNet50 => Arc::clone(&self.resnet),
        }
    }

    pub fn heads(&self, task: Task) -> &HeadPair {
        match task {
            Task::Mri => &self.mri,
            Task::Spiral => &self.spiral,
        }
    }

    /// 获取模型统计信息
    pub fn get_stats(&self, config: &Config) -> ModelStats {
        ModelStats {
            backbones: Backbone::ALL.iter().map(|b| b.name().to_string()).collect(),
            tasks: Task::ALL.iter().map(|t| t.tag().to_string()).collect(),
            classifier_heads: Task::ALL.len() * Backbone::ALL.len(),
            intra_threads: config.onnx_config.intra_threads,
            optimization_level: config.onnx_config.optimization_level,
        }
    }
}

/// 模型统计信息
#[derive(Debug, Clone, serde::Serialize)]
pub struct ModelStats {
    pub backbones: Vec<String>,
    pub tasks: Vec<String>,
    pub classifier_heads: usize,
    pub intra_threads: usize,
    pub optimization_level: i32,
}
