use std::sync::OnceLock;

static INIT: OnceLock<Result<(), String>> = OnceLock::new();

/// Process-wide setup of the native vision and codec libraries.
///
/// Runs once per process before any capture loop is constructed. Later
/// calls return the outcome of the first one without repeating the work.
pub fn initialize() -> Result<(), Box<dyn std::error::Error>> {
    INIT.get_or_init(|| {
        let result = init_native();
        match &result {
            Ok(()) => log::debug!("Native libraries initialized"),
            Err(e) => log::error!("Native library initialization failed: {e}"),
        }
        result
    })
    .clone()
    .map_err(Into::into)
}

fn init_native() -> Result<(), String> {
    #[cfg(feature = "ffmpeg")]
    ffmpeg_next::init().map_err(|e| format!("ffmpeg: {e}"))?;

    #[cfg(feature = "opencv")]
    {
        let version = opencv::core::get_version_string().map_err(|e| format!("opencv: {e}"))?;
        log::info!("OpenCV {version}");
    }

    Ok(())
}
