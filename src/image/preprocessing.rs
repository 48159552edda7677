use ndarray::{Array4, Axis};

/// ImageNet BGR 通道均值（caffe 风格）
pub const CAFFE_BGR_MEAN: [f32; 3] = [103.939, 116.779, 123.68];

/// 特征提取前的通道归一化
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelNormalization {
    /// 原始像素值
    None,
    /// RGB转BGR后减去通道均值
    CaffeBgr,
}

impl ChannelNormalization {
    pub fn apply(&self, pixels: &Array4<f32>) -> Array4<f32> {
        match self {
            ChannelNormalization::None => pixels.clone(),
            ChannelNormalization::CaffeBgr => ImagePreprocessor::caffe_normalize(pixels),
        }
    }
}

pub struct ImagePreprocessor;

impl ImagePreprocessor {
    /// NHWC 张量的 caffe 归一化，不做缩放
    pub fn caffe_normalize(pixels: &Array4<f32>) -> Array4<f32> {
        let mut bgr = pixels.clone();
        bgr.invert_axis(Axis(3));

        let mut normalized = bgr.as_standard_layout().into_owned();
        for (c, mut channel) in normalized.axis_iter_mut(Axis(3)).enumerate() {
            channel -= CAFFE_BGR_MEAN[c];
        }

        normalized
    }
}
