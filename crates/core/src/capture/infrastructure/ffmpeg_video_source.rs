use std::path::Path;

use ffmpeg_next::format::context::Input;
use ffmpeg_next::software::scaling;
use ffmpeg_next::util::frame::video::Video;

use crate::capture::domain::frame_source::FrameSource;
use crate::shared::frame::{Frame, BGR_CHANNELS};

/// Replays a recorded video file through ffmpeg-next.
///
/// Decoded frames are scaled straight to BGR24 so they match the camera
/// channel order. End of stream is reported as an empty frame.
pub struct FfmpegVideoSource {
    input: Option<Input>,
    decoder: ffmpeg_next::decoder::Video,
    scaler: scaling::Context,
    video_stream_index: usize,
    width: u32,
    height: u32,
    frame_index: usize,
    flushing: bool,
}

impl FfmpegVideoSource {
    pub fn open(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;
        let input = ffmpeg_next::format::input(path)?;

        let stream = input
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or("No video stream found")?;
        let video_stream_index = stream.index();
        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?;
        let decoder = codec_ctx.decoder().video()?;

        let width = decoder.width();
        let height = decoder.height();
        let scaler = scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::BGR24,
            width,
            height,
            scaling::Flags::BILINEAR,
        )?;

        log::info!(
            "Replaying {} ({width}x{height}, {})",
            path.display(),
            decoder
                .codec()
                .map(|c| c.name().to_string())
                .unwrap_or_default()
        );
        Ok(Self {
            input: Some(input),
            decoder,
            scaler,
            video_stream_index,
            width,
            height,
            frame_index: 0,
            flushing: false,
        })
    }

    fn try_receive(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        let mut decoded = Video::empty();
        match self.decoder.receive_frame(&mut decoded) {
            Ok(()) => {}
            Err(e) if is_drained(&e) => return Ok(None),
            Err(e) => return Err(format!("failed to decode frame {}: {e}", self.frame_index).into()),
        }
        let mut bgr = Video::empty();
        self.scaler.run(&decoded, &mut bgr)?;
        let pixels = extract_packed_pixels(&bgr, self.width, self.height);
        let frame = Frame::new(pixels, self.width, self.height, self.frame_index)?;
        self.frame_index += 1;
        Ok(Some(frame))
    }
}

impl FrameSource for FfmpegVideoSource {
    fn read(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        if self.input.is_none() {
            return Ok(None);
        }
        if let Some(frame) = self.try_receive()? {
            return Ok(Some(frame));
        }
        if self.flushing {
            return Ok(None);
        }

        loop {
            let next = match self.input.as_mut() {
                Some(input) => input
                    .packets()
                    .next()
                    .map(|(stream, packet)| (stream.index(), packet)),
                None => return Ok(None),
            };
            let Some((stream_index, packet)) = next else {
                match self.decoder.send_eof() {
                    Ok(()) => {}
                    Err(e) if is_drained(&e) => {}
                    Err(e) => return Err(e.into()),
                }
                self.flushing = true;
                return self.try_receive();
            };
            if stream_index != self.video_stream_index {
                continue;
            }
            self.decoder
                .send_packet(&packet)
                .map_err(|e| format!("corrupt packet before frame {}: {e}", self.frame_index))?;
            if let Some(frame) = self.try_receive()? {
                return Ok(Some(frame));
            }
        }
    }

    fn release(&mut self) {
        self.input = None;
    }
}

/// `Eof` and `EAGAIN` mean "no frame available now"; anything else is a
/// real decode failure.
fn is_drained(err: &ffmpeg_next::Error) -> bool {
    match err {
        ffmpeg_next::Error::Eof => true,
        ffmpeg_next::Error::Other { errno } => *errno == ffmpeg_next::util::error::EAGAIN,
        _ => false,
    }
}

/// Copies a packed 3-byte-per-pixel plane, dropping any row padding.
fn extract_packed_pixels(frame: &Video, width: u32, height: u32) -> Vec<u8> {
    let stride = frame.stride(0);
    let data = frame.data(0);
    let row_bytes = width as usize * BGR_CHANNELS;

    let mut pixels = Vec::with_capacity(row_bytes * height as usize);
    for row in 0..height as usize {
        let start = row * stride;
        pixels.extend_from_slice(&data[start..start + row_bytes]);
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_nonexistent_is_error() {
        assert!(FfmpegVideoSource::open(Path::new("/nonexistent/clip.mp4")).is_err());
    }

    #[test]
    fn test_end_of_stream_and_again_are_drained() {
        assert!(is_drained(&ffmpeg_next::Error::Eof));
        assert!(is_drained(&ffmpeg_next::Error::Other {
            errno: ffmpeg_next::util::error::EAGAIN
        }));
    }

    #[test]
    fn test_decode_failures_are_not_drained() {
        assert!(!is_drained(&ffmpeg_next::Error::InvalidData));
        assert!(!is_drained(&ffmpeg_next::Error::Other {
            errno: ffmpeg_next::util::error::EINVAL
        }));
    }
}
