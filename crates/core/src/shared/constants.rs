/// OpenCV's stock frontal-face Haar cascade.
pub const HAAR_CASCADE_NAME: &str = "haarcascade_frontalface_default.xml";
pub const HAAR_CASCADE_URL: &str =
    "https://raw.githubusercontent.com/opencv/opencv/4.x/data/haarcascades/haarcascade_frontalface_default.xml";

/// SeetaFace frontal detector used by the pure-Rust backend.
pub const SEETA_MODEL_NAME: &str = "seeta_fd_frontal_v1.0.bin";
pub const SEETA_MODEL_URL: &str =
    "https://github.com/atomashpolskiy/rustface/raw/master/model/seeta_fd_frontal_v1.0.bin";

pub const DEFAULT_CAMERA_INDEX: i32 = 0;

pub const DEFAULT_SCALE_FACTOR: f64 = 1.1;
pub const DEFAULT_MIN_NEIGHBORS: i32 = 4;
pub const DEFAULT_MIN_FACE_SIZE: u32 = 100;

/// Skin band in (Y, Cr, Cb) order, both ends inclusive.
pub const SKIN_LOWER_YCRCB: [u8; 3] = [0, 133, 77];
pub const SKIN_UPPER_YCRCB: [u8; 3] = [255, 173, 127];

/// Red-difference chroma at or above which an undertone is warm.
pub const WARM_CR_THRESHOLD: f64 = 150.0;
/// Red-difference chroma at or below which an undertone is cool.
pub const COOL_CR_THRESHOLD: f64 = 130.0;

pub const WINDOW_TITLE: &str = "Real-Time Skin Tone & Color Recommendation";
pub const WAIT_KEY_MS: i32 = 30;
pub const ESC_KEY: i32 = 27;

pub const BORDER_COLOR_BGR: [u8; 3] = [0, 255, 0];
pub const BORDER_THICKNESS: i32 = 3;
pub const TEXT_COLOR_BGR: [u8; 3] = [255, 255, 255];
pub const FONT_SCALE: f64 = 0.6;
pub const TEXT_THICKNESS: i32 = 2;
/// Baseline offsets above the face rectangle for the two label lines.
pub const TONE_LABEL_OFFSET: i32 = 30;
pub const PALETTE_LABEL_OFFSET: i32 = 10;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
