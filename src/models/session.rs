use crate::config::OnnxConfig;
use crate::utils::error::DiagnosisError;
use crate::Result;
use ndarray::ArrayD;
use ort::{
    inputs,
    session::{builder::GraphOptimizationLevel, Session},
    value::Tensor,
};
use parking_lot::Mutex;
use std::path::Path;

/// 单输入单输出的ONNX模型
pub struct OnnxModel {
    label: String,
    session: Mutex<Session>,
    input_name: String,  // 动态发现的输入名称
    output_name: String, // 动态发现的输出名称
}

impl OnnxModel {
    pub fn load(label: &str, model_path: &Path, onnx_config: &OnnxConfig) -> Result<Self> {
        if !model_path.exists() {
            return Err(DiagnosisError::ModelLoad(format!(
                "{} model not found: {}",
                label,
                model_path.display()
            )));
        }

        tracing::info!("Loading {} model from: {}", label, model_path.display());

        let session = Session::builder()?
            .with_optimization_level(optimization_level(onnx_config))?
            .with_intra_threads(onnx_config.intra_threads)?
            .commit_from_file(model_path)?;

        let input_name = match session.inputs.first() {
            Some(input) => input.name.clone(),
            None => {
                return Err(DiagnosisError::ModelLoad(format!(
                    "{} model has no inputs",
                    label
                )))
            }
        };

        let output_name = match session.outputs.first() {
            Some(output) => output.name.clone(),
            None => {
                return Err(DiagnosisError::ModelLoad(format!(
                    "{} model has no outputs",
                    label
                )))
            }
        };

        tracing::info!(
            "{} model ready: input '{}', output '{}'",
            label,
            input_name,
            output_name
        );

        Ok(Self {
            label: label.to_string(),
            session: Mutex::new(session),
            input_name,
            output_name,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// 执行一次推理，返回第一个输出
    pub fn run(&self, input: ArrayD<f32>) -> Result<ArrayD<f32>> {
        let input_tensor = Tensor::from_array(input)?;

        let mut session = self.session.lock();
        let outputs = session.run(inputs![self.input_name.as_str() => input_tensor])?;

        match outputs.get(self.output_name.as_str()) {
            Some(output) => Ok(output.try_extract_array::<f32>()?.into_owned()),
            None => {
                let available_outputs: Vec<String> =
                    outputs.keys().map(|s| s.to_string()).collect();
                Err(DiagnosisError::Inference(format!(
                    "{} output '{}' not found. Available outputs: {:?}",
                    self.label, self.output_name, available_outputs
                )))
            }
        }
    }
}

fn optimization_level(onnx_config: &OnnxConfig) -> GraphOptimizationLevel {
    if !onnx_config.enable_optimization {
        return GraphOptimizationLevel::Disable;
    }

    match onnx_config.optimization_level {
        i32::MIN..=0 => GraphOptimizationLevel::Disable,
        1 => GraphOptimizationLevel::Level1,
        2 => GraphOptimizationLevel::Level2,
        _ => GraphOptimizationLevel::Level3,
    }
}
