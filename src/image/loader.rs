use crate::Result;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use ndarray::Array4;
use std::path::Path;

/// 模型输入边长
pub const INPUT_SIZE: u32 = 224;

pub struct ImageLoader;

impl ImageLoader {
    /// 从文件路径加载图像，格式由文件内容判断
    pub fn from_path(path: &Path) -> Result<DynamicImage> {
        let image = ImageReader::open(path)?
            .with_guessed_format()?
            .decode()?;

        Ok(image)
    }

    /// 转换为 (1, 224, 224, 3) 的NHWC张量，像素值保持0-255
    ///
    /// 缩放使用最近邻采样，与训练时 Keras `load_img` 的默认行为一致。
    pub fn to_tensor(image: &DynamicImage) -> Array4<f32> {
        let rgb = image
            .resize_exact(INPUT_SIZE, INPUT_SIZE, FilterType::Nearest)
            .to_rgb8();

        let size = INPUT_SIZE as usize;
        Array4::from_shape_fn((1, size, size, 3), |(_, y, x, c)| {
            rgb.get_pixel(x as u32, y as u32)[c] as f32
        })
    }

    /// 加载并预处理，供特征提取使用
    pub fn load_tensor(path: &Path) -> Result<Array4<f32>> {
        let image = Self::from_path(path)?;
        tracing::debug!(
            "Decoded image {}: {}x{}",
            path.display(),
            image.width(),
            image.height()
        );
        Ok(Self::to_tensor(&image))
    }
}
