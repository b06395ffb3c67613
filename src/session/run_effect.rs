use crate::error::{DeviceError, ImageDecodeError, InferenceError};
use crate::preference_store::theme::{load_theme, save_theme};
use crate::sampler::generate::generate;
use crate::session::core::{Effect, Event, Frame};
use crate::session::main::Session;

impl Session {
    pub fn run_effect(&self, effect: Effect) {
        match effect {
            Effect::LoadTheme => {
                let theme = load_theme(self.preference_store.as_ref());
                if let Err(e) = &theme {
                    let _ = self.logger.warn(&format!("Falling back to light theme: {}", e));
                }
                self.send(Event::ThemeLoaded(theme));
            }
            Effect::SaveTheme(theme) => {
                let saved = save_theme(self.preference_store.as_ref(), theme);
                self.send(Event::ThemeSaveDone(saved));
            }
            Effect::LoadModel => {
                let loaded = self
                    .image_classifier_loader
                    .load(&self.config.model)
                    .map(|classifier| {
                        let class_count = classifier.class_count();
                        *self
                            .image_classifier
                            .lock()
                            .unwrap_or_else(|e| e.into_inner()) = Some(classifier);
                        class_count
                    });
                if let Err(e) = &loaded {
                    let _ = self.logger.error(&format!("Error loading model: {}", e));
                }
                self.send(Event::ModelLoadDone(loaded));
            }
            Effect::DecodeImage {
                request,
                name,
                bytes,
            } => {
                let decoded = image::load_from_memory(&bytes.0)
                    .map(Frame::new)
                    .map_err(|e| ImageDecodeError::Decode {
                        name,
                        reason: e.to_string(),
                    });
                self.send(Event::ImageDecodeDone {
                    request,
                    result: decoded,
                });
            }
            Effect::ClassifyImage { request, image } => {
                let classifier = self
                    .image_classifier
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .clone();
                let classified = match classifier {
                    Some(classifier) => classifier.classify(&image.0),
                    None => Err(InferenceError::NotLoaded),
                };
                self.send(Event::ClassifyDone {
                    request,
                    result: classified,
                });
            }
            Effect::OpenCamera { capture } => {
                let opened = self
                    .device_camera
                    .open(&self.config.capture)
                    .map(|handle| self.adopt_capture(capture, handle));
                self.send(Event::CaptureOpenDone {
                    capture,
                    result: opened,
                });
            }
            Effect::CaptureFrame { capture } => {
                let handle = self
                    .capture_handles
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .get(&capture)
                    .cloned();
                let frame = match handle {
                    Some(handle) => handle.next_frame().map(Frame::new),
                    None => Err(DeviceError::Closed),
                };
                self.send(Event::FrameCaptureDone {
                    capture,
                    result: frame,
                });
            }
            Effect::ScheduleFrameTick { capture } => {
                std::thread::sleep(self.config.frame_interval);
                self.send(Event::FrameTick { capture });
            }
            Effect::CloseCamera { capture } => {
                let handle = self
                    .capture_handles
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .remove(&capture);
                let closed = match handle {
                    Some(handle) => handle.close(),
                    None => Ok(()),
                };
                if let Err(e) = &closed {
                    let _ = self.logger.warn(&format!("Closing camera failed: {}", e));
                }
                self.send(Event::CaptureCloseDone {
                    capture,
                    result: closed,
                });
            }
            Effect::DrawSample => {
                let drawn = {
                    let mut random_source = self
                        .random_source
                        .lock()
                        .unwrap_or_else(|e| e.into_inner());
                    generate(self.config.sample, &mut **random_source)
                };
                self.send(Event::SampleDrawn(drawn));
            }
            Effect::ScheduleReveal { generation } => {
                std::thread::sleep(self.config.reveal_delay);
                self.send(Event::RevealTick { generation });
            }
        }
    }
}
