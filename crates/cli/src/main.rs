use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use skintone_core::analysis::domain::face_analyzer::FaceAnalyzer;
use skintone_core::annotation::domain::frame_annotator::FrameAnnotator;
use skintone_core::capture::domain::capture_error::CaptureError;
use skintone_core::capture::domain::frame_display::FrameDisplay;
use skintone_core::capture::domain::frame_source::FrameSource;
use skintone_core::capture::infrastructure::image_directory_display::ImageDirectoryDisplay;
use skintone_core::capture::infrastructure::image_sequence_source::{
    is_image, ImageSequenceSource,
};
use skintone_core::detection::domain::detection_params::DetectionParams;
use skintone_core::detection::domain::face_detector::FaceDetector;
use skintone_core::detection::infrastructure::detector_factory::{create_detector, DetectorBackend};
use skintone_core::pipeline::live_skin_tone_use_case::{
    FrameCallback, FrameReport, LiveSkinToneUseCase, LoopSettings,
};
use skintone_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use skintone_core::shared::constants::{
    DEFAULT_CAMERA_INDEX, DEFAULT_MIN_FACE_SIZE, DEFAULT_MIN_NEIGHBORS, DEFAULT_SCALE_FACTOR,
};
use skintone_core::shared::runtime;

/// Detects faces in live video, classifies each face's skin undertone and
/// overlays a matching color palette.
#[derive(Parser, Debug)]
#[command(name = "skintone")]
struct Cli {
    /// Camera device index (requires the `opencv` feature).
    #[arg(long)]
    camera: Option<i32>,

    /// Replay an image, a directory of images, or a video file instead of a camera.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Write annotated frames as PNG files to this directory instead of a window.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Face detector: seeta or haar (haar requires the `opencv` feature).
    #[arg(long)]
    detector: Option<String>,

    /// Detector model file; resolved from the cache or downloaded when omitted.
    #[arg(long)]
    model: Option<PathBuf>,

    /// Detector pyramid scale factor (> 1.0).
    #[arg(long, default_value_t = DEFAULT_SCALE_FACTOR)]
    scale_factor: f64,

    /// Overlapping detections required to keep a face.
    #[arg(long, default_value_t = DEFAULT_MIN_NEIGHBORS)]
    min_neighbors: i32,

    /// Smallest face edge in pixels.
    #[arg(long, default_value_t = DEFAULT_MIN_FACE_SIZE)]
    min_face_size: u32,

    /// Stop after this many frames.
    #[arg(long)]
    max_frames: Option<usize>,

    /// Append one JSON line per processed frame to this file.
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(exit_code(e.as_ref()));
    }
}

/// An unavailable camera ends the process like any other stop condition;
/// everything else is a startup failure.
fn exit_code(err: &(dyn std::error::Error + 'static)) -> i32 {
    match err.downcast_ref::<CaptureError>() {
        Some(CaptureError::DeviceUnavailable { .. }) => 0,
        _ => 1,
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    runtime::initialize()?;

    let detector = build_detector(&cli)?;
    let source = open_source(&cli)?;
    let display = open_display(cli.output.as_deref())?;
    let on_frame = match &cli.report {
        Some(path) => Some(report_writer(path)?),
        None => None,
    };

    let settings = LoopSettings {
        max_frames: cli.max_frames,
        ..Default::default()
    };
    let mut use_case = LiveSkinToneUseCase::new(
        source,
        detector,
        FaceAnalyzer::default(),
        build_annotator(),
        display,
        Box::new(StdoutPipelineLogger::default()),
        settings,
        on_frame,
    );
    let outcome = use_case.execute()?;
    log::info!(
        "Processed {} frame(s), stopped by {:?}",
        outcome.frames_processed,
        outcome.reason
    );
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), String> {
    if cli.camera.is_some() && cli.input.is_some() {
        return Err("--camera and --input are mutually exclusive".to_string());
    }
    if let Some(input) = &cli.input {
        if !input.exists() {
            return Err(format!("Input not found: {}", input.display()));
        }
        if input.is_file() && !is_image(input) && !cfg!(feature = "ffmpeg") {
            return Err(format!(
                "Video input requires building with the `ffmpeg` feature: {}",
                input.display()
            ));
        }
    } else if !cfg!(feature = "opencv") {
        return Err(
            "Camera capture requires building with the `opencv` feature; use --input".to_string(),
        );
    }
    if cli.output.is_none() && !cfg!(feature = "opencv") {
        return Err(
            "A display window requires building with the `opencv` feature; use --output"
                .to_string(),
        );
    }

    let backend = parse_backend(cli.detector.as_deref())?;
    if !backend.is_available() {
        return Err(format!(
            "Detector '{}' requires building with the `opencv` feature",
            cli.detector.as_deref().unwrap_or_default()
        ));
    }
    detection_params(cli).validate()?;

    if cli.max_frames == Some(0) {
        return Err("--max-frames must be at least 1".to_string());
    }
    Ok(())
}

fn parse_backend(name: Option<&str>) -> Result<DetectorBackend, String> {
    match name {
        None => Ok(DetectorBackend::default()),
        Some(name) => DetectorBackend::parse(name)
            .ok_or_else(|| format!("Detector must be 'seeta' or 'haar', got '{name}'")),
    }
}

fn detection_params(cli: &Cli) -> DetectionParams {
    DetectionParams {
        scale_factor: cli.scale_factor,
        min_neighbors: cli.min_neighbors,
        min_face_size: cli.min_face_size,
    }
}

fn build_detector(cli: &Cli) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
    let backend = parse_backend(cli.detector.as_deref())?;
    log::info!("Using {backend:?} face detector");
    let detector = create_detector(
        backend,
        cli.model.as_deref(),
        detection_params(cli),
        Some(Box::new(download_progress)),
    )?;
    Ok(detector)
}

fn open_source(cli: &Cli) -> Result<Box<dyn FrameSource>, Box<dyn std::error::Error>> {
    match &cli.input {
        Some(input) if input.is_dir() || is_image(input) => {
            Ok(Box::new(ImageSequenceSource::open(input)?))
        }
        Some(input) => open_video(input),
        None => open_camera(cli.camera.unwrap_or(DEFAULT_CAMERA_INDEX)),
    }
}

#[cfg(feature = "ffmpeg")]
fn open_video(path: &Path) -> Result<Box<dyn FrameSource>, Box<dyn std::error::Error>> {
    use skintone_core::capture::infrastructure::ffmpeg_video_source::FfmpegVideoSource;
    Ok(Box::new(FfmpegVideoSource::open(path)?))
}

#[cfg(not(feature = "ffmpeg"))]
fn open_video(path: &Path) -> Result<Box<dyn FrameSource>, Box<dyn std::error::Error>> {
    Err(format!("Cannot decode {} without the `ffmpeg` feature", path.display()).into())
}

#[cfg(feature = "opencv")]
fn open_camera(index: i32) -> Result<Box<dyn FrameSource>, Box<dyn std::error::Error>> {
    use skintone_core::capture::infrastructure::opencv_camera::OpenCvCamera;
    Ok(Box::new(OpenCvCamera::open(index)?))
}

#[cfg(not(feature = "opencv"))]
fn open_camera(index: i32) -> Result<Box<dyn FrameSource>, Box<dyn std::error::Error>> {
    Err(format!("Cannot open camera {index} without the `opencv` feature").into())
}

fn open_display(output: Option<&Path>) -> Result<Box<dyn FrameDisplay>, Box<dyn std::error::Error>> {
    if let Some(dir) = output {
        return Ok(Box::new(ImageDirectoryDisplay::new(dir)?));
    }
    open_window()
}

#[cfg(feature = "opencv")]
fn open_window() -> Result<Box<dyn FrameDisplay>, Box<dyn std::error::Error>> {
    use skintone_core::capture::infrastructure::highgui_display::HighGuiDisplay;
    use skintone_core::shared::constants::WINDOW_TITLE;
    Ok(Box::new(HighGuiDisplay::new(WINDOW_TITLE)?))
}

#[cfg(not(feature = "opencv"))]
fn open_window() -> Result<Box<dyn FrameDisplay>, Box<dyn std::error::Error>> {
    Err("A display window requires the `opencv` feature".into())
}

#[cfg(feature = "opencv")]
fn build_annotator() -> Box<dyn FrameAnnotator> {
    use skintone_core::annotation::infrastructure::opencv_annotator::OpenCvAnnotator;
    Box::new(OpenCvAnnotator)
}

#[cfg(not(feature = "opencv"))]
fn build_annotator() -> Box<dyn FrameAnnotator> {
    use skintone_core::annotation::infrastructure::cpu_annotator::CpuAnnotator;
    Box::new(CpuAnnotator::default())
}

/// Serializes each frame report as one JSON line.
fn report_writer(path: &Path) -> Result<FrameCallback, Box<dyn std::error::Error>> {
    let file: File = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = BufWriter::new(file);
    let path = path.to_path_buf();
    Ok(Box::new(move |report: &FrameReport| {
        let result = serde_json::to_writer(&mut writer, report)
            .map_err(std::io::Error::from)
            .and_then(|()| writer.write_all(b"\n"))
            .and_then(|()| writer.flush());
        if let Err(e) = result {
            log::warn!("Failed to write report to {}: {e}", path.display());
        }
    }))
}

fn download_progress(downloaded: u64, total: u64) {
    eprint!("{}", progress_line(downloaded, total));
}

/// Rewrites the current line; the final update ends it so later log output
/// starts on a fresh line.
fn progress_line(downloaded: u64, total: u64) -> String {
    if total == 0 {
        return format!("\rDownloading face detection model... {downloaded} bytes");
    }
    let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
    let end = if downloaded >= total { "\n" } else { "" };
    format!("\rDownloading face detection model... {pct}%{end}")
}
