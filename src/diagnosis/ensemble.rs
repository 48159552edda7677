use crate::diagnosis::{BackboneScores, Diagnosis, Prediction, Task};

/// 集成平均与阈值判定
pub struct EnsembleAverager;

impl EnsembleAverager {
    pub const THRESHOLD: f32 = 0.5;

    pub fn average(scores: &BackboneScores) -> f32 {
        (scores.vgg + scores.resnet) / 2.0
    }

    /// 根据任务阈值给出标签
    ///
    /// MRI 与 Spiral 的判定方向相反：MRI 在 `avg >= 0.5` 时为 Parkinson，
    /// Spiral 在 `avg <= 0.5` 时为 Parkinson。两者在 0.5 处都判为 Parkinson。
    pub fn label(task: Task, average: f32) -> Prediction {
        let parkinson = match task {
            Task::Mri => average >= Self::THRESHOLD,
            Task::Spiral => average <= Self::THRESHOLD,
        };

        if parkinson {
            Prediction::Parkinson
        } else {
            Prediction::Healthy
        }
    }

    pub fn combine(task: Task, scores: BackboneScores) -> Diagnosis {
        let average = Self::average(&scores);

        Diagnosis {
            model: task,
            prediction: Self::label(task, average),
            confidence: average,
            scores: Some(scores),
        }
    }
}
