use crate::error::{InferenceError, LoadError};
use crate::image_classifier::interface::{ImageClassifier, ImageClassifierLoader, Prediction};
use crate::image_classifier::model_descriptor::{read_labels, ModelDescriptor, TensorLayout};
use crate::image_classifier::tract::image::prepare_input;
use crate::library::logger::interface::Logger;
use image::DynamicImage;
use std::sync::Arc;
use tract_onnx::prelude::*;

pub struct ImageClassifierTractOnnx {
    model: TypedRunnableModel<TypedModel>,
    labels: Vec<String>,
    descriptor: ModelDescriptor,
}

impl ImageClassifier for ImageClassifierTractOnnx {
    fn classify(&self, image: &DynamicImage) -> Result<Vec<Prediction>, InferenceError> {
        let input = prepare_input(
            image,
            self.descriptor.input_shape,
            self.descriptor.layout,
            self.descriptor.normalization,
        );

        let outputs = self
            .model
            .run(tvec!(input.into_tvalue()))
            .map_err(|e| InferenceError::Run(e.to_string()))?;

        let output = outputs
            .first()
            .ok_or_else(|| InferenceError::Run("model produced no output".to_string()))?;
        let scores: Vec<f32> = output
            .to_array_view::<f32>()
            .map_err(|e| InferenceError::Run(e.to_string()))?
            .iter()
            .copied()
            .collect();

        if scores.len() != self.labels.len() {
            return Err(InferenceError::ShapeMismatch {
                expected: self.labels.len(),
                got: scores.len(),
            });
        }

        let scores = if self.descriptor.apply_softmax {
            softmax(&scores)
        } else {
            scores
        };

        Ok(self
            .labels
            .iter()
            .zip(scores)
            .map(|(label, confidence)| Prediction {
                label: label.clone(),
                confidence,
            })
            .collect())
    }

    fn class_count(&self) -> usize {
        self.labels.len()
    }
}

pub struct ImageClassifierLoaderTractOnnx {
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ImageClassifierLoaderTractOnnx {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("image_classifier").with_namespace("tract_onnx"),
        }
    }
}

impl ImageClassifierLoader for ImageClassifierLoaderTractOnnx {
    fn load(
        &self,
        descriptor: &ModelDescriptor,
    ) -> Result<Arc<dyn ImageClassifier + Send + Sync>, LoadError> {
        let path = descriptor.model_path.display().to_string();
        let _ = self.logger.info(&format!("Loading model {}...", path));

        let labels = read_labels(&descriptor.metadata_path)?;

        let (width, height) = (
            descriptor.input_shape.0 as usize,
            descriptor.input_shape.1 as usize,
        );
        let shape = match descriptor.layout {
            TensorLayout::Nchw => [1, 3, height, width],
            TensorLayout::Nhwc => [1, height, width, 3],
        };

        let model = tract_onnx::onnx()
            .model_for_path(&descriptor.model_path)
            .and_then(|model| model.with_input_fact(0, f32::fact(shape).into()))
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| LoadError::Model {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        let _ = self.logger.info(&format!(
            "Model {} loaded with {} classes",
            path,
            labels.len()
        ));

        Ok(Arc::new(ImageClassifierTractOnnx {
            model,
            labels,
            descriptor: descriptor.clone(),
        }))
    }
}

pub fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum == 0.0 || !sum.is_finite() {
        return vec![0.0; scores.len()];
    }
    exps.into_iter().map(|e| e / sum).collect()
}
