use clap::Parser;
use config::Config;
use device_camera::impl_fake::DeviceCameraFake;
use device_camera::impl_frame_directory::DeviceCameraFrameDirectory;
use device_camera::interface::DeviceCamera;
use device_display::impl_console::DeviceDisplayConsole;
use device_display::impl_gui::DeviceDisplayGui;
use device_display::interface::DeviceDisplay;
use image_classifier::impl_fake::{ImageClassifierFake, ImageClassifierLoaderFake};
use image_classifier::impl_tract_onnx::ImageClassifierLoaderTractOnnx;
use image_classifier::interface::ImageClassifierLoader;
use library::logger::impl_console::LoggerConsole;
use library::logger::interface::Logger;
use preference_store::impl_file::PreferenceStoreFile;
use preference_store::impl_memory::PreferenceStoreMemory;
use preference_store::interface::PreferenceStore;
use sampler::random_source::impl_rand::RandomSourceRand;
use session::core::Event;
use session::main::Session;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

mod config;
mod console_commands;
mod device_camera;
mod device_display;
mod error;
mod image_classifier;
mod library;
mod preference_store;
mod prediction;
mod sampler;
mod session;

#[derive(Debug, Parser)]
#[command(name = "lucky-lens", about = "Classify photos and camera frames, draw lucky numbers")]
struct Cli {
    /// Configuration file (defaults to <config dir>/lucky-lens/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use the terminal instead of a window
    #[arg(long)]
    console: bool,

    /// Use a random classifier instead of the ONNX model
    #[arg(long)]
    fake_model: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;

    let logger: Arc<dyn Logger + Send + Sync> = Arc::new(LoggerConsole::new(config.logger_timezone));

    let image_classifier_loader: Arc<dyn ImageClassifierLoader + Send + Sync> = if cli.fake_model {
        Arc::new(ImageClassifierLoaderFake::new(Arc::new(ImageClassifierFake::new(
            config.fake_labels.clone(),
            logger.clone(),
        ))))
    } else {
        Arc::new(ImageClassifierLoaderTractOnnx::new(logger.clone()))
    };

    let device_camera: Arc<dyn DeviceCamera + Send + Sync> = match config.camera_frames_dir.clone() {
        Some(directory) => Arc::new(DeviceCameraFrameDirectory::new(directory, logger.clone())),
        None => Arc::new(DeviceCameraFake::new(logger.clone())),
    };

    let preference_store: Arc<dyn PreferenceStore + Send + Sync> = match config
        .preferences_path
        .clone()
        .or_else(PreferenceStoreFile::default_path)
    {
        Some(path) => Arc::new(PreferenceStoreFile::new(path, logger.clone())),
        None => {
            let _ = logger.warn("No config directory, preferences will not persist");
            Arc::new(PreferenceStoreMemory::new())
        }
    };

    let random_source = Box::new(RandomSourceRand::new());

    if cli.console {
        let device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>> =
            Arc::new(Mutex::new(DeviceDisplayConsole::new()));
        let session = Session::new(
            config,
            logger.clone(),
            image_classifier_loader,
            device_camera,
            preference_store,
            random_source,
            device_display,
        );

        let events = session.sender();
        std::thread::spawn(move || {
            console_commands::read_commands(std::io::stdin().lock(), events, logger);
        });

        session.run()?;
        return Ok(());
    }

    let gui = DeviceDisplayGui::new();
    let device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>> = Arc::new(Mutex::new(gui.clone()));
    let session = Session::new(
        config,
        logger.clone(),
        image_classifier_loader,
        device_camera,
        preference_store,
        random_source,
        device_display,
    );

    let window = gui.window(session.sender());

    let session_loop = {
        let session = session.clone();
        std::thread::spawn(move || session.run().map(|_| ()))
    };

    let window_result = window.run();

    session.send(Event::Shutdown);
    match session_loop.join() {
        Ok(result) => result?,
        Err(_) => {
            let _ = logger.error("Session loop panicked");
        }
    }

    window_result
}
