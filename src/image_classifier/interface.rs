use crate::error::{InferenceError, LoadError};
use crate::image_classifier::model_descriptor::ModelDescriptor;
use image::DynamicImage;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub confidence: f32,
}

pub trait ImageClassifier: Send + Sync {
    /// One prediction per known class, in the model's class order.
    fn classify(&self, image: &DynamicImage) -> Result<Vec<Prediction>, InferenceError>;
    fn class_count(&self) -> usize;
}

pub trait ImageClassifierLoader: Send + Sync {
    fn load(
        &self,
        descriptor: &ModelDescriptor,
    ) -> Result<Arc<dyn ImageClassifier + Send + Sync>, LoadError>;
}
