use crate::config::Config;
use crate::error::{
    DeviceError, ImageDecodeError, InferenceError, LoadError, PreferenceError, SampleError,
};
use crate::image_classifier::interface::Prediction;
use crate::prediction::rank::{RankedPredictions, ResultSummary};
use crate::prediction::rows::RowSet;
use crate::preference_store::theme::Theme;
use crate::sampler::reveal::RevealSchedule;
use image::DynamicImage;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CaptureId(pub u64);

/// A decoded still image or a captured frame. Compared by identity.
#[derive(Clone)]
pub struct Frame(pub Arc<DynamicImage>);

impl Frame {
    pub fn new(image: DynamicImage) -> Self {
        Self(Arc::new(image))
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.0.width(), self.0.height())
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (width, height) = self.dimensions();
        write!(f, "Frame({}x{})", width, height)
    }
}

impl PartialEq for Frame {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Raw bytes of a submitted file.
#[derive(Clone, PartialEq)]
pub struct ImageBytes(pub Arc<Vec<u8>>);

impl ImageBytes {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(Arc::new(bytes))
    }
}

impl fmt::Debug for ImageBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageBytes({} bytes)", self.0.len())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ClassifierState {
    #[default]
    Loading,
    Ready {
        class_count: usize,
    },
    Failed {
        message: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ImageState {
    #[default]
    Empty,
    Decoding {
        request: RequestId,
        name: String,
    },
    Ready {
        image: Frame,
        name: String,
    },
    Classifying {
        image: Frame,
        name: String,
        request: RequestId,
    },
    Classified {
        image: Frame,
        name: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapturePhase {
    AcquiringFrame,
    Classifying { request: RequestId },
    /// Result rendered, next tick scheduled.
    Waiting,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum CaptureState {
    #[default]
    Idle,
    Opening {
        capture: CaptureId,
    },
    Capturing {
        capture: CaptureId,
        phase: CapturePhase,
        frames_rendered: u64,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultPanel {
    pub summary: Option<ResultSummary>,
    pub rows: RowSet,
}

impl ResultPanel {
    pub fn clear(&mut self) {
        self.summary = None;
        self.rows.clear();
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    pub theme: Theme,
    pub classifier: ClassifierState,
    pub image: ImageState,
    pub still: ResultPanel,
    pub capture: CaptureState,
    pub stream: ResultPanel,
    pub reveal: RevealSchedule,
    pub notice: Option<String>,
    pub exiting: bool,
    /// Set by the first toggle so a slow startup load cannot undo it.
    theme_chosen: bool,
    next_id: u64,
}

impl Model {
    fn next_request(&mut self) -> RequestId {
        self.next_id += 1;
        RequestId(self.next_id)
    }

    fn next_capture(&mut self) -> CaptureId {
        self.next_id += 1;
        CaptureId(self.next_id)
    }

    fn still_request(&self) -> Option<RequestId> {
        match &self.image {
            ImageState::Classifying { request, .. } => Some(*request),
            _ => None,
        }
    }

    fn stream_request(&self) -> Option<(CaptureId, RequestId)> {
        match &self.capture {
            CaptureState::Capturing {
                capture,
                phase: CapturePhase::Classifying { request },
                ..
            } => Some((*capture, *request)),
            _ => None,
        }
    }

    fn current_capture(&self) -> Option<CaptureId> {
        match &self.capture {
            CaptureState::Capturing { capture, .. } => Some(*capture),
            _ => None,
        }
    }

    fn is_in_phase(&self, capture: CaptureId, expected: CapturePhase) -> bool {
        matches!(
            &self.capture,
            CaptureState::Capturing { capture: current, phase, .. }
                if *current == capture && *phase == expected
        )
    }

    fn set_phase(&mut self, next: CapturePhase) {
        if let CaptureState::Capturing { phase, .. } = &mut self.capture {
            *phase = next;
        }
    }

    fn classifier_unavailable_notice(&self) -> Option<String> {
        match &self.classifier {
            ClassifierState::Loading => {
                Some("The model is still loading. Please wait a moment.".to_string())
            }
            ClassifierState::Failed { message } => {
                Some(format!("The model failed to load: {}", message))
            }
            ClassifierState::Ready { .. } => None,
        }
    }
}

#[derive(Debug)]
pub enum Event {
    ThemeLoaded(Result<Theme, PreferenceError>),
    ThemeToggled,
    ThemeSaveDone(Result<(), PreferenceError>),
    ModelLoadDone(Result<usize, LoadError>),
    ImageSubmitted {
        name: String,
        mime: Option<String>,
        bytes: ImageBytes,
    },
    ImageDecodeDone {
        request: RequestId,
        result: Result<Frame, ImageDecodeError>,
    },
    ClassifyRequested,
    ClassifyDone {
        request: RequestId,
        result: Result<Vec<Prediction>, InferenceError>,
    },
    ImageReset,
    CaptureStartRequested,
    CaptureOpenDone {
        capture: CaptureId,
        result: Result<(), DeviceError>,
    },
    FrameTick {
        capture: CaptureId,
    },
    FrameCaptureDone {
        capture: CaptureId,
        result: Result<Frame, DeviceError>,
    },
    CaptureStopRequested,
    CaptureCloseDone {
        capture: CaptureId,
        result: Result<(), DeviceError>,
    },
    SampleRequested,
    SampleDrawn(Result<Vec<i64>, SampleError>),
    RevealTick {
        generation: u64,
    },
    RevealCancelled,
    Shutdown,
}

impl Event {
    fn is_user_trigger(&self) -> bool {
        matches!(
            self,
            Event::ThemeToggled
                | Event::ImageSubmitted { .. }
                | Event::ClassifyRequested
                | Event::ImageReset
                | Event::CaptureStartRequested
                | Event::CaptureStopRequested
                | Event::SampleRequested
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    LoadTheme,
    SaveTheme(Theme),
    LoadModel,
    DecodeImage {
        request: RequestId,
        name: String,
        bytes: ImageBytes,
    },
    ClassifyImage {
        request: RequestId,
        image: Frame,
    },
    OpenCamera {
        capture: CaptureId,
    },
    CaptureFrame {
        capture: CaptureId,
    },
    ScheduleFrameTick {
        capture: CaptureId,
    },
    CloseCamera {
        capture: CaptureId,
    },
    DrawSample,
    ScheduleReveal {
        generation: u64,
    },
}

pub fn init() -> (Model, Vec<Effect>) {
    (Model::default(), vec![Effect::LoadTheme, Effect::LoadModel])
}

pub fn transition(config: &Config, mut model: Model, event: Event) -> (Model, Vec<Effect>) {
    if event.is_user_trigger() {
        model.notice = None;
    }

    match event {
        // Theme
        Event::ThemeLoaded(result) => {
            if !model.theme_chosen {
                model.theme = result.unwrap_or_default();
            }
            (model, vec![])
        }
        Event::ThemeToggled => {
            model.theme_chosen = true;
            model.theme = model.theme.toggled();
            let theme = model.theme;
            (model, vec![Effect::SaveTheme(theme)])
        }
        Event::ThemeSaveDone(Ok(())) => (model, vec![]),
        Event::ThemeSaveDone(Err(e)) => {
            model.notice = Some(format!("Could not save the theme: {}", e));
            (model, vec![])
        }

        // Model loading
        Event::ModelLoadDone(Ok(class_count)) => {
            model.classifier = ClassifierState::Ready { class_count };
            (model, vec![])
        }
        Event::ModelLoadDone(Err(e)) => {
            model.notice = Some(format!("The model failed to load: {}", e));
            model.classifier = ClassifierState::Failed {
                message: e.to_string(),
            };
            (model, vec![])
        }

        // Still image
        Event::ImageSubmitted { name, mime, bytes } => {
            if let Some(mime) = mime.filter(|mime| !mime.starts_with("image/")) {
                model.notice = Some(ImageDecodeError::NotAnImage { name, mime }.to_string());
                return (model, vec![]);
            }
            let request = model.next_request();
            model.image = ImageState::Decoding {
                request,
                name: name.clone(),
            };
            model.still.clear();
            (
                model,
                vec![Effect::DecodeImage {
                    request,
                    name,
                    bytes,
                }],
            )
        }
        Event::ImageDecodeDone { request, result } => match std::mem::take(&mut model.image) {
            ImageState::Decoding {
                request: pending,
                name,
            } if pending == request => {
                match result {
                    Ok(image) => model.image = ImageState::Ready { image, name },
                    Err(e) => model.notice = Some(e.to_string()),
                }
                (model, vec![])
            }
            other => {
                model.image = other;
                (model, vec![])
            }
        },
        Event::ClassifyRequested => {
            if matches!(model.image, ImageState::Classifying { .. }) {
                return (model, vec![]);
            }
            let (image, name) = match &model.image {
                ImageState::Ready { image, name } | ImageState::Classified { image, name } => {
                    (image.clone(), name.clone())
                }
                _ => return (model, vec![]),
            };
            if let Some(notice) = model.classifier_unavailable_notice() {
                model.notice = Some(notice);
                return (model, vec![]);
            }
            let request = model.next_request();
            model.image = ImageState::Classifying {
                image: image.clone(),
                name,
                request,
            };
            (model, vec![Effect::ClassifyImage { request, image }])
        }
        Event::ImageReset => {
            model.image = ImageState::Empty;
            model.still.clear();
            (model, vec![])
        }
        Event::ClassifyDone { request, result } => {
            if model.still_request() == Some(request) {
                return apply_still_result(config, model, result);
            }
            match model.stream_request() {
                Some((capture, pending)) if pending == request => {
                    apply_stream_result(config, model, capture, result)
                }
                // stale: superseded request or stopped stream
                _ => (model, vec![]),
            }
        }

        // Continuous capture
        Event::CaptureStartRequested => {
            if model.capture != CaptureState::Idle {
                return (model, vec![]);
            }
            if let Some(notice) = model.classifier_unavailable_notice() {
                model.notice = Some(notice);
                return (model, vec![]);
            }
            let capture = model.next_capture();
            model.capture = CaptureState::Opening { capture };
            (model, vec![Effect::OpenCamera { capture }])
        }
        Event::CaptureOpenDone { capture, result } => {
            let opening = model.capture == CaptureState::Opening { capture };
            match (opening, result) {
                (true, Ok(())) => {
                    model.capture = CaptureState::Capturing {
                        capture,
                        phase: CapturePhase::AcquiringFrame,
                        frames_rendered: 0,
                    };
                    model.stream.clear();
                    (model, vec![Effect::CaptureFrame { capture }])
                }
                (true, Err(e)) => {
                    model.capture = CaptureState::Idle;
                    model.notice = Some(format!("Could not start the camera: {}", e));
                    (model, vec![])
                }
                // stopped while opening
                (false, Ok(())) => (model, vec![Effect::CloseCamera { capture }]),
                (false, Err(_)) => (model, vec![]),
            }
        }
        Event::FrameTick { capture } => {
            if !model.is_in_phase(capture, CapturePhase::Waiting) {
                return (model, vec![]);
            }
            model.set_phase(CapturePhase::AcquiringFrame);
            (model, vec![Effect::CaptureFrame { capture }])
        }
        Event::FrameCaptureDone { capture, result } => {
            if !model.is_in_phase(capture, CapturePhase::AcquiringFrame) {
                return (model, vec![]);
            }
            match result {
                Ok(image) => {
                    let request = model.next_request();
                    model.set_phase(CapturePhase::Classifying { request });
                    (model, vec![Effect::ClassifyImage { request, image }])
                }
                Err(e) => {
                    model.capture = CaptureState::Idle;
                    model.notice = Some(format!("The camera stopped: {}", e));
                    (model, vec![Effect::CloseCamera { capture }])
                }
            }
        }
        Event::CaptureStopRequested => stop_capture(model),
        Event::CaptureCloseDone { .. } => (model, vec![]),

        // Sampler
        Event::SampleRequested => (model, vec![Effect::DrawSample]),
        Event::SampleDrawn(Ok(numbers)) => {
            let empty = numbers.is_empty();
            let generation = model.reveal.restart(numbers);
            if empty {
                (model, vec![])
            } else {
                (model, vec![Effect::ScheduleReveal { generation }])
            }
        }
        Event::SampleDrawn(Err(e)) => {
            model.reveal.cancel();
            model.notice = Some(e.to_string());
            (model, vec![])
        }
        Event::RevealTick { generation } => match model.reveal.advance(generation) {
            Some(true) => (model, vec![Effect::ScheduleReveal { generation }]),
            _ => (model, vec![]),
        },
        Event::RevealCancelled => {
            model.reveal.cancel();
            (model, vec![])
        }

        Event::Shutdown => {
            model.exiting = true;
            stop_capture(model)
        }
    }
}

fn stop_capture(mut model: Model) -> (Model, Vec<Effect>) {
    let capture = model.current_capture();
    model.capture = CaptureState::Idle;
    match capture {
        Some(capture) => (model, vec![Effect::CloseCamera { capture }]),
        // an opening device is closed once its open completes
        None => (model, vec![]),
    }
}

fn apply_still_result(
    config: &Config,
    mut model: Model,
    result: Result<Vec<Prediction>, InferenceError>,
) -> (Model, Vec<Effect>) {
    let (image, name) = match std::mem::take(&mut model.image) {
        ImageState::Classifying { image, name, .. } => (image, name),
        other => {
            model.image = other;
            return (model, vec![]);
        }
    };

    match result {
        Ok(predictions) => {
            let ranked = RankedPredictions::rank(predictions);
            model.still.summary = ResultSummary::from_ranked(&ranked, &config.label_metadata);
            model.still.rows.rebuild(&ranked, &config.label_metadata);
            model.image = ImageState::Classified { image, name };
        }
        Err(e) => {
            model.notice = Some(format!("Classification failed: {}", e));
            model.image = ImageState::Ready { image, name };
        }
    }
    (model, vec![])
}

fn apply_stream_result(
    config: &Config,
    mut model: Model,
    capture: CaptureId,
    result: Result<Vec<Prediction>, InferenceError>,
) -> (Model, Vec<Effect>) {
    match result {
        Ok(predictions) => {
            let ranked = RankedPredictions::rank(predictions);
            model.stream.summary = ResultSummary::from_ranked(&ranked, &config.label_metadata);
            model
                .stream
                .rows
                .update_in_place(&ranked, &config.label_metadata, config.row_keying);
            if let CaptureState::Capturing {
                frames_rendered, ..
            } = &mut model.capture
            {
                *frames_rendered += 1;
            }
        }
        Err(e) => {
            model.notice = Some(format!("Classification failed: {}", e));
        }
    }

    model.set_phase(CapturePhase::Waiting);
    (model, vec![Effect::ScheduleFrameTick { capture }])
}
