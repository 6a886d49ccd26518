//! Video decoding adapter using libav bindings
//!
//! Frames are decoded in presentation order and converted to packed RGB24
//! before being handed out as [`RgbImage`] values.

use std::path::Path;

use ffmpeg_next::codec::context::Context as CodecContext;
use ffmpeg_next::format::{self, Pixel};
use ffmpeg_next::media;
use ffmpeg_next::software::scaling::{Context as ScalingContext, Flags as ScalingFlags};
use ffmpeg_next::util::frame::video::Video as VideoFrame;
use image::RgbImage;
use tracing::{debug, warn};

use crate::domain::errors::DomainError;
use crate::ports::{DecodePort, FrameStream};

/// Decoder backed by ffmpeg's libavformat/libavcodec
pub struct LibavDecodeAdapter;

impl LibavDecodeAdapter {
    pub fn new() -> Result<Self, DomainError> {
        ffmpeg_next::init()
            .map_err(|e| DomainError::DecodeFail(format!("FFmpeg initialization failed: {}", e)))?;
        Ok(Self)
    }
}

impl DecodePort for LibavDecodeAdapter {
    fn open(&self, source: &Path) -> Result<Box<dyn FrameStream>, DomainError> {
        let input = format::input(&source).map_err(|e| {
            DomainError::DecodeFail(format!("Failed to open {}: {}", source.display(), e))
        })?;

        let stream = input
            .streams()
            .best(media::Type::Video)
            .ok_or_else(|| DomainError::DecodeFail(format!("No video stream in {}", source.display())))?;
        let stream_index = stream.index();

        let rate = stream.avg_frame_rate();
        let frame_rate = if rate.denominator() != 0 {
            rate.numerator() as f64 / rate.denominator() as f64
        } else {
            0.0
        };

        let decoder = CodecContext::from_parameters(stream.parameters())
            .map_err(|e| DomainError::DecodeFail(format!("Failed to create decoder context: {}", e)))?
            .decoder()
            .video()
            .map_err(|e| DomainError::DecodeFail(format!("Failed to create video decoder: {}", e)))?;

        debug!(
            "Opened {} (stream {}, {}x{}, {:.3} fps)",
            source.display(),
            stream_index,
            decoder.width(),
            decoder.height(),
            frame_rate
        );

        Ok(Box::new(LibavFrameStream {
            input,
            decoder,
            scaler: None,
            stream_index,
            frame_rate,
            decoded: VideoFrame::empty(),
            eof_sent: false,
            finished: false,
        }))
    }
}

/// Pull-based frame iterator over one video stream
struct LibavFrameStream {
    input: format::context::Input,
    decoder: ffmpeg_next::decoder::Video,
    scaler: Option<ScalingContext>,
    stream_index: usize,
    frame_rate: f64,
    decoded: VideoFrame,
    eof_sent: bool,
    finished: bool,
}

impl LibavFrameStream {
    /// Try to take one frame already buffered in the decoder
    fn receive(&mut self) -> Result<Option<RgbImage>, DomainError> {
        if self.decoder.receive_frame(&mut self.decoded).is_err() {
            return Ok(None);
        }
        self.convert().map(Some).map_err(|e| {
            self.finished = true;
            DomainError::DecodeFail(format!("Could not convert decoded frame: {}", e))
        })
    }

    /// Scale the last decoded frame to packed RGB24
    fn convert(&mut self) -> Result<RgbImage, ffmpeg_next::Error> {
        let (width, height) = (self.decoded.width(), self.decoded.height());

        if self.scaler.is_none() {
            self.scaler = Some(ScalingContext::get(
                self.decoded.format(),
                width,
                height,
                Pixel::RGB24,
                width,
                height,
                ScalingFlags::BILINEAR,
            )?);
        }

        let mut rgb = VideoFrame::empty();
        if let Some(scaler) = self.scaler.as_mut() {
            scaler.run(&self.decoded, &mut rgb)?;
        }

        // Rows may be padded past width * 3
        let stride = rgb.stride(0);
        let row_bytes = width as usize * 3;
        let data = rgb.data(0);
        let mut buffer = Vec::with_capacity(row_bytes * height as usize);
        for row in 0..height as usize {
            let start = row * stride;
            buffer.extend_from_slice(&data[start..start + row_bytes]);
        }

        RgbImage::from_raw(width, height, buffer).ok_or(ffmpeg_next::Error::InvalidData)
    }
}

impl FrameStream for LibavFrameStream {
    fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    fn next_frame(&mut self) -> Result<Option<RgbImage>, DomainError> {
        loop {
            if self.finished {
                return Ok(None);
            }

            if let Some(image) = self.receive()? {
                return Ok(Some(image));
            }

            if self.eof_sent {
                self.finished = true;
                return Ok(None);
            }

            match self.input.packets().next() {
                Some((stream, packet)) => {
                    if stream.index() != self.stream_index {
                        continue;
                    }
                    if let Err(e) = self.decoder.send_packet(&packet) {
                        warn!("Skipping undecodable packet: {}", e);
                    }
                }
                None => {
                    if let Err(e) = self.decoder.send_eof() {
                        warn!("Failed to flush decoder: {}", e);
                    }
                    self.eof_sent = true;
                }
            }
        }
    }
}
