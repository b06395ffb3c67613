use crate::device_display::interface::DeviceDisplay;
use crate::prediction::label_metadata::Accent;
use crate::prediction::rank::ResultSummary;
use crate::prediction::rows::DisplayRow;
use crate::preference_store::theme::Theme;
use crate::session::core::{Event, Frame, ImageBytes};
use crate::session::view::{ClassifyAction, ImagePanel, View};
use eframe::egui;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Guesses a MIME type from the extension, the way a browser labels a dropped file.
pub fn mime_from_path(path: &Path) -> Option<String> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "txt" => "text/plain",
        "pdf" => "application/pdf",
        _ => return None,
    };
    Some(mime.to_string())
}

/// Reads a file from disk into an [`Event::ImageSubmitted`].
pub fn image_submitted(path: &Path) -> std::io::Result<Event> {
    let bytes = std::fs::read(path)?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(Event::ImageSubmitted {
        name,
        mime: mime_from_path(path),
        bytes: ImageBytes::new(bytes),
    })
}

#[derive(Clone)]
pub struct DeviceDisplayGui {
    view: Arc<Mutex<Option<View>>>,
}

impl DeviceDisplayGui {
    pub fn new() -> Self {
        Self {
            view: Arc::new(Mutex::new(None)),
        }
    }

    pub fn window(&self, events: Sender<Event>) -> Window {
        Window {
            view: self.view.clone(),
            events,
            path_input: String::new(),
            local_notice: None,
            preview: None,
        }
    }
}

impl Default for DeviceDisplayGui {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceDisplay for DeviceDisplayGui {
    fn render(&mut self, view: &View) -> Result<(), Box<dyn Error + Send + Sync>> {
        *self.view.lock().unwrap_or_else(|e| e.into_inner()) = Some(view.clone());
        Ok(())
    }
}

pub struct Window {
    view: Arc<Mutex<Option<View>>>,
    events: Sender<Event>,
    path_input: String,
    local_notice: Option<String>,
    /// Texture of the image currently previewed, rebuilt when the image changes.
    preview: Option<(Frame, egui::TextureHandle)>,
}

const PREVIEW_SIZE: u32 = 320;

/// Downscales a frame into pixels egui can upload as a texture.
pub fn preview_pixels(frame: &Frame) -> egui::ColorImage {
    let rgba = frame.0.thumbnail(PREVIEW_SIZE, PREVIEW_SIZE).to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw())
}

impl Window {
    /// Blocks on the calling thread until the window is closed.
    pub fn run(self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default().with_inner_size([520.0, 760.0]),
            ..Default::default()
        };

        eframe::run_native("Lucky Lens", options, Box::new(|_cc| Box::new(self)))
            .map_err(|e| e.to_string().into())
    }

    fn preview_texture(&mut self, ctx: &egui::Context, frame: &Frame) -> egui::TextureHandle {
        if let Some((shown, texture)) = &self.preview {
            if shown == frame {
                return texture.clone();
            }
        }
        let texture = ctx.load_texture("preview", preview_pixels(frame), egui::TextureOptions::default());
        self.preview = Some((frame.clone(), texture.clone()));
        texture
    }

    fn send(&self, event: Event) {
        let _ = self.events.send(event);
    }

    fn submit_path(&mut self, path: &Path) {
        match image_submitted(path) {
            Ok(event) => {
                self.local_notice = None;
                self.send(event);
            }
            Err(e) => self.local_notice = Some(format!("Could not read {}: {}", path.display(), e)),
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .collect()
        });
        if let Some(path) = dropped.first() {
            self.submit_path(path);
        }
    }

    fn header(&mut self, ui: &mut egui::Ui, view: &View) {
        ui.horizontal(|ui| {
            ui.heading("Lucky Lens");
            if ui.button(view.theme_button.as_str()).clicked() {
                self.send(Event::ThemeToggled);
            }
        });
        ui.label(view.model_status.as_str());

        for notice in [view.notice.as_ref(), self.local_notice.as_ref()].into_iter().flatten() {
            ui.label(egui::RichText::new(notice.as_str()).color(egui::Color32::from_rgb(220, 80, 60)));
        }
    }

    fn photo_section(&mut self, ui: &mut egui::Ui, view: &View) {
        ui.heading("Photo");
        match &view.still.image {
            ImagePanel::Placeholder => {
                ui.label("Drop an image here or open one by path.");
            }
            ImagePanel::Loading { name } => {
                ui.label(format!("Loading {}...", name));
            }
            ImagePanel::Preview {
                name,
                width,
                height,
                image,
            } => {
                let texture = self.preview_texture(ui.ctx(), image);
                ui.add(
                    egui::Image::from_texture(egui::load::SizedTexture::from_handle(&texture))
                        .max_width(PREVIEW_SIZE as f32),
                );
                ui.label(format!("{} ({}x{})", name, width, height));
            }
        }

        ui.horizontal(|ui| {
            ui.text_edit_singleline(&mut self.path_input);
            if ui.button("Open").clicked() && !self.path_input.trim().is_empty() {
                let path = PathBuf::from(self.path_input.trim());
                self.submit_path(&path);
            }
        });

        if let Some((button, action)) = &view.still.button {
            let clicked = ui
                .add_enabled(button.enabled, egui::Button::new(button.text.as_str()))
                .clicked();
            if clicked {
                match action {
                    ClassifyAction::Classify => self.send(Event::ClassifyRequested),
                    ClassifyAction::Reset => {
                        self.path_input.clear();
                        self.send(Event::ImageReset);
                    }
                }
            }
        }
        if view.still.spinner {
            ui.spinner();
        }

        result(ui, view.still.summary.as_ref(), &view.still.rows);
    }

    fn camera_section(&mut self, ui: &mut egui::Ui, view: &View) {
        ui.heading("Camera");
        ui.label(format!(
            "{} ({} frames)",
            view.stream.status, view.stream.frames_rendered
        ));
        let button = &view.stream.button;
        if ui
            .add_enabled(button.enabled, egui::Button::new(button.text.as_str()))
            .clicked()
        {
            if view.stream.capturing {
                self.send(Event::CaptureStopRequested);
            } else {
                self.send(Event::CaptureStartRequested);
            }
        }
        if view.stream.capturing {
            result(ui, view.stream.summary.as_ref(), &view.stream.rows);
        }
    }

    fn numbers_section(&mut self, ui: &mut egui::Ui, view: &View) {
        ui.heading("Lucky numbers");
        if ui.button("Draw numbers").clicked() {
            self.send(Event::SampleRequested);
        }
        ui.horizontal(|ui| {
            for number in &view.sample.numbers {
                ui.label(egui::RichText::new(number.to_string()).size(24.0).strong());
            }
            for _ in 0..view.sample.hidden {
                ui.label(egui::RichText::new("?").size(24.0).weak());
            }
        });
    }
}

fn accent_color(ui: &egui::Ui, accent: Accent) -> egui::Color32 {
    match accent {
        Accent::Default => ui.visuals().selection.bg_fill,
        Accent::Muted => egui::Color32::GRAY,
        Accent::Rgb([r, g, b]) => egui::Color32::from_rgb(r, g, b),
    }
}

fn result(ui: &mut egui::Ui, summary: Option<&ResultSummary>, rows: &[DisplayRow]) {
    if let Some(summary) = summary {
        ui.label(
            egui::RichText::new(summary.headline.as_str())
                .strong()
                .color(accent_color(ui, summary.accent)),
        );
        ui.label(summary.description.as_str());
    }
    for row in rows {
        ui.horizontal(|ui| {
            ui.label(row.label.as_str());
            ui.add(
                egui::ProgressBar::new(row.fill)
                    .desired_width(220.0)
                    .fill(accent_color(ui, row.accent))
                    .text(row.percent_text.clone()),
            );
        });
    }
}

impl eframe::App for Window {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);

        let view = self.view.lock().unwrap_or_else(|e| e.into_inner()).clone();

        if let Some(view) = view {
            ctx.set_visuals(match view.theme {
                Theme::Light => egui::Visuals::light(),
                Theme::Dark => egui::Visuals::dark(),
            });

            egui::CentralPanel::default().show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.header(ui, &view);
                    ui.separator();
                    self.photo_section(ui, &view);
                    ui.separator();
                    self.camera_section(ui, &view);
                    ui.separator();
                    self.numbers_section(ui, &view);
                });
            });
        }

        // the session renders from its own thread
        ctx.request_repaint_after(Duration::from_millis(33));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_from_path() {
        assert_eq!(mime_from_path(Path::new("cat.JPG")).as_deref(), Some("image/jpeg"));
        assert_eq!(mime_from_path(Path::new("notes.txt")).as_deref(), Some("text/plain"));
        assert_eq!(mime_from_path(Path::new("no_extension")), None);
    }

    #[test]
    fn test_preview_pixels_keep_aspect_ratio() {
        let frame = Frame::new(image::DynamicImage::new_rgb8(640, 320));

        let pixels = preview_pixels(&frame);

        assert_eq!(pixels.size, [320, 160]);
        assert_eq!(pixels.pixels.len(), 320 * 160);
        assert_eq!(pixels.pixels[0], egui::Color32::from_rgb(0, 0, 0));
    }

    #[test]
    fn test_image_submitted_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pixel.png");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();

        match image_submitted(&path).unwrap() {
            Event::ImageSubmitted { name, mime, bytes } => {
                assert_eq!(name, "pixel.png");
                assert_eq!(mime.as_deref(), Some("image/png"));
                assert_eq!(bytes.0.as_slice(), &[1, 2, 3]);
            }
            other => panic!("Unexpected event: {:?}", other),
        }
    }
}
