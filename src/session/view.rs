use crate::prediction::rank::ResultSummary;
use crate::prediction::rows::DisplayRow;
use crate::preference_store::theme::Theme;
use crate::session::core::{CapturePhase, CaptureState, ClassifierState, Frame, ImageState, Model};

#[derive(Debug, Clone, PartialEq)]
pub struct ButtonView {
    pub text: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImagePanel {
    Placeholder,
    Loading { name: String },
    Preview {
        name: String,
        width: u32,
        height: u32,
        image: Frame,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifyAction {
    Classify,
    Reset,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StillView {
    pub image: ImagePanel,
    /// Hidden until an image is ready.
    pub button: Option<(ButtonView, ClassifyAction)>,
    pub spinner: bool,
    pub summary: Option<ResultSummary>,
    pub rows: Vec<DisplayRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StreamView {
    pub status: String,
    pub capturing: bool,
    pub button: ButtonView,
    pub frames_rendered: u64,
    pub summary: Option<ResultSummary>,
    pub rows: Vec<DisplayRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SampleView {
    pub numbers: Vec<i64>,
    pub hidden: usize,
}

/// Everything the presentation surface needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub theme: Theme,
    pub theme_button: String,
    pub model_status: String,
    pub still: StillView,
    pub stream: StreamView,
    pub sample: SampleView,
    pub notice: Option<String>,
}

impl View {
    pub fn from_model(model: &Model) -> Self {
        Self {
            theme: model.theme,
            theme_button: match model.theme {
                Theme::Light => "Dark mode".to_string(),
                Theme::Dark => "Light mode".to_string(),
            },
            model_status: match &model.classifier {
                ClassifierState::Loading => "Loading model...".to_string(),
                ClassifierState::Ready { class_count } => {
                    format!("Model ready ({} classes)", class_count)
                }
                ClassifierState::Failed { .. } => "Model unavailable".to_string(),
            },
            still: still_view(model),
            stream: stream_view(model),
            sample: SampleView {
                numbers: model.reveal.visible().to_vec(),
                hidden: model.reveal.hidden_count(),
            },
            notice: model.notice.clone(),
        }
    }
}

fn still_view(model: &Model) -> StillView {
    let button = |text: &str, enabled: bool, action: ClassifyAction| {
        Some((
            ButtonView {
                text: text.to_string(),
                enabled,
            },
            action,
        ))
    };

    let (image, button, spinner) = match &model.image {
        ImageState::Empty => (ImagePanel::Placeholder, None, false),
        ImageState::Decoding { name, .. } => (ImagePanel::Loading { name: name.clone() }, None, false),
        ImageState::Ready { image, name } => (
            preview(name, image),
            button("Analyze", true, ClassifyAction::Classify),
            false,
        ),
        ImageState::Classifying { image, name, .. } => (
            preview(name, image),
            button("Analyzing...", false, ClassifyAction::Classify),
            true,
        ),
        ImageState::Classified { image, name } => (
            preview(name, image),
            button("Analyze another photo", true, ClassifyAction::Reset),
            false,
        ),
    };

    StillView {
        image,
        button,
        spinner,
        summary: model.still.summary.clone(),
        rows: model.still.rows.rows().to_vec(),
    }
}

fn preview(name: &str, image: &Frame) -> ImagePanel {
    let (width, height) = image.dimensions();
    ImagePanel::Preview {
        name: name.to_string(),
        width,
        height,
        image: image.clone(),
    }
}

fn stream_view(model: &Model) -> StreamView {
    let (status, capturing, frames_rendered) = match &model.capture {
        CaptureState::Idle => ("Camera off".to_string(), false, 0),
        CaptureState::Opening { .. } => ("Starting camera...".to_string(), true, 0),
        CaptureState::Capturing {
            phase,
            frames_rendered,
            ..
        } => {
            let status = match phase {
                CapturePhase::AcquiringFrame | CapturePhase::Waiting => "Live",
                CapturePhase::Classifying { .. } => "Live (analyzing)",
            };
            (status.to_string(), true, *frames_rendered)
        }
    };

    StreamView {
        status,
        capturing,
        button: ButtonView {
            text: if capturing { "Stop camera" } else { "Start camera" }.to_string(),
            enabled: matches!(model.classifier, ClassifierState::Ready { .. }) || capturing,
        },
        frames_rendered,
        summary: model.stream.summary.clone(),
        rows: model.stream.rows.rows().to_vec(),
    }
}
