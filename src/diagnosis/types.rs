use crate::image::ChannelNormalization;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 诊断任务
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Task {
    #[serde(rename = "MRI")]
    Mri,
    #[serde(rename = "Spiral")]
    Spiral,
}

impl Task {
    pub const ALL: [Task; 2] = [Task::Mri, Task::Spiral];

    /// 响应中的模型标签
    pub fn tag(&self) -> &'static str {
        match self {
            Task::Mri => "MRI",
            Task::Spiral => "Spiral",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// 特征提取网络
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backbone {
    Vgg16,
    ResNet50,
}

impl Backbone {
    pub const ALL: [Backbone; 2] = [Backbone::Vgg16, Backbone::ResNet50];

    /// 该网络训练时使用的输入归一化
    pub fn normalization(&self) -> ChannelNormalization {
        match self {
            Backbone::Vgg16 => ChannelNormalization::CaffeBgr,
            Backbone::ResNet50 => ChannelNormalization::None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Backbone::Vgg16 => "vgg16",
            Backbone::ResNet50 => "resnet50",
        }
    }
}

impl fmt::Display for Backbone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Prediction {
    Parkinson,
    Healthy,
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prediction::Parkinson => f.write_str("Parkinson"),
            Prediction::Healthy => f.write_str("Healthy"),
        }
    }
}

/// 两个分类头各自的输出
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BackboneScores {
    #[serde(rename = "vgg_pred")]
    pub vgg: f32,
    #[serde(rename = "resnet_pred")]
    pub resnet: f32,
}

/// 单次请求的诊断结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub model: Task,
    pub prediction: Prediction,
    pub confidence: f32,

    /// 仅开发模式下返回
    #[serde(flatten)]
    pub scores: Option<BackboneScores>,
}

impl Diagnosis {
    pub fn without_scores(mut self) -> Self {
        self.scores = None;
        self
    }
}
