use crate::error::{InferenceError, LoadError};
use crate::image_classifier::interface::{ImageClassifier, ImageClassifierLoader, Prediction};
use crate::image_classifier::model_descriptor::ModelDescriptor;
use crate::library::logger::interface::Logger;
use image::DynamicImage;
use rand::distr::{Distribution, Uniform};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub type ScriptedResult = Result<Vec<f32>, InferenceError>;

/// Answers with scripted scores when any are queued, random normalized scores otherwise.
pub struct ImageClassifierFake {
    labels: Vec<String>,
    script: Mutex<VecDeque<ScriptedResult>>,
    calls: AtomicUsize,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ImageClassifierFake {
    pub fn new(labels: Vec<String>, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            labels,
            script: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
            logger: logger.with_namespace("image_classifier").with_namespace("fake"),
        }
    }

    #[allow(dead_code)]
    pub fn push(&self, result: ScriptedResult) {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(result);
    }

    #[allow(dead_code)]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn random_scores(&self) -> Result<Vec<f32>, InferenceError> {
        let mut rng = rand::rng();
        let distribution =
            Uniform::new(0.0f32, 1.0).map_err(|e| InferenceError::Run(e.to_string()))?;
        let raw: Vec<f32> = self
            .labels
            .iter()
            .map(|_| distribution.sample(&mut rng))
            .collect();
        let sum: f32 = raw.iter().sum();
        if sum == 0.0 {
            let even = 1.0 / self.labels.len().max(1) as f32;
            return Ok(vec![even; self.labels.len()]);
        }
        Ok(raw.into_iter().map(|s| s / sum).collect())
    }
}

impl ImageClassifier for ImageClassifierFake {
    fn classify(&self, image: &DynamicImage) -> Result<Vec<Prediction>, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _ = self.logger.info(&format!(
            "Classifying {}x{} image with fake classifier...",
            image.width(),
            image.height()
        ));

        let scripted = self
            .script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        let scores = match scripted {
            Some(result) => result?,
            None => self.random_scores()?,
        };

        if scores.len() != self.labels.len() {
            return Err(InferenceError::ShapeMismatch {
                expected: self.labels.len(),
                got: scores.len(),
            });
        }

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

pub struct ImageClassifierLoaderFake {
    classifier: Arc<ImageClassifierFake>,
    failure: Option<String>,
}

impl ImageClassifierLoaderFake {
    pub fn new(classifier: Arc<ImageClassifierFake>) -> Self {
        Self {
            classifier,
            failure: None,
        }
    }

    #[allow(dead_code)]
    pub fn failing(classifier: Arc<ImageClassifierFake>, reason: &str) -> Self {
        Self {
            classifier,
            failure: Some(reason.to_string()),
        }
    }
}

impl ImageClassifierLoader for ImageClassifierLoaderFake {
    fn load(
        &self,
        descriptor: &ModelDescriptor,
    ) -> Result<Arc<dyn ImageClassifier + Send + Sync>, LoadError> {
        match &self.failure {
            Some(reason) => Err(LoadError::Model {
                path: descriptor.model_path.display().to_string(),
                reason: reason.clone(),
            }),
            None => Ok(self.classifier.clone()),
        }
    }
}
