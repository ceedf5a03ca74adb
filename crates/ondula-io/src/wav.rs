//! Frame-at-a-time WAV reading and writing.
//!
//! A *frame* is one sample per channel, which is exactly what a filter with
//! `channels` inputs consumes per step. Integer PCM is normalized to
//! `[-1, 1)` on read and scaled back (with clamping) on write; 32-bit files
//! are IEEE float.

use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavWriter};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// WAV audio encoding format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavFormat {
    /// Linear PCM (integer samples).
    Pcm,
    /// IEEE 754 floating-point samples.
    IeeeFloat,
}

/// WAV file metadata extracted without loading sample data.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Number of audio channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Total number of frames (samples per channel).
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Audio encoding format.
    pub format: WavFormat,
}

/// Read WAV metadata without loading sample data.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let num_frames = u64::from(reader.duration());
    let duration_secs = num_frames as f64 / f64::from(spec.sample_rate);

    let format = match spec.sample_format {
        SampleFormat::Float => WavFormat::IeeeFloat,
        SampleFormat::Int => WavFormat::Pcm,
    };

    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        num_frames,
        duration_secs,
        format,
    })
}

/// WAV file specification.
///
/// 32 bits per sample means IEEE float; 8, 16 and 24 mean integer PCM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of audio channels.
    pub channels: u16,
    /// Sample rate in Hz (e.g., 44100, 48000).
    pub sample_rate: u32,
    /// Bit depth per sample (8, 16, 24 or 32).
    pub bits_per_sample: u16,
}

impl WavSpec {
    /// Fails unless the bit depth is one this crate can write.
    pub fn check(&self) -> Result<()> {
        match self.bits_per_sample {
            8 | 16 | 24 | 32 => Ok(()),
            bits => Err(Error::UnsupportedFormat(format!("{bits}-bit samples"))),
        }
    }

    fn is_float(&self) -> bool {
        self.bits_per_sample == 32
    }

    /// Full-scale magnitude for integer PCM.
    fn int_scale(&self) -> f32 {
        (1i64 << (self.bits_per_sample - 1)) as f32
    }
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 16,
        }
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: if spec.is_float() {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

/// Reads a WAV file one frame at a time.
///
/// Also an [`Iterator`] over `Result<Vec<f32>>`.
pub struct WavFrameSource {
    reader: WavReader<BufReader<File>>,
    spec: WavSpec,
    float: bool,
    scale: f32,
}

impl WavFrameSource {
    /// Opens `path` for reading.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = WavReader::open(path)?;
        let raw = reader.spec();
        let spec = WavSpec::from(raw);
        Ok(Self {
            reader,
            spec,
            float: raw.sample_format == SampleFormat::Float,
            scale: spec.int_scale(),
        })
    }

    /// Format of the file being read.
    pub fn spec(&self) -> WavSpec {
        self.spec
    }

    /// Number of channels, i.e. samples per frame.
    pub fn channels(&self) -> usize {
        usize::from(self.spec.channels)
    }

    /// Total frames in the file, read or not.
    pub fn total_frames(&self) -> u64 {
        u64::from(self.reader.duration())
    }

    /// Reads the next frame, or `None` at end of file.
    ///
    /// A trailing partial frame is treated as end of file.
    pub fn next_frame(&mut self) -> Result<Option<Vec<f32>>> {
        let channels = self.channels();
        let frame: Vec<f32> = if self.float {
            self.reader
                .samples::<f32>()
                .take(channels)
                .collect::<std::result::Result<_, _>>()?
        } else {
            let scale = self.scale;
            self.reader
                .samples::<i32>()
                .take(channels)
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<_, _>>()?
        };

        if frame.len() < channels || channels == 0 {
            return Ok(None);
        }
        Ok(Some(frame))
    }
}

impl Iterator for WavFrameSource {
    type Item = Result<Vec<f32>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_frame().transpose()
    }
}

/// Writes a WAV file one frame at a time.
///
/// Call [`finalize()`](Self::finalize) when done; dropping the sink without
/// it leaves a header with the wrong length.
pub struct WavFrameSink {
    writer: WavWriter<BufWriter<File>>,
    spec: WavSpec,
    frames_written: u64,
}

impl WavFrameSink {
    /// Creates (or truncates) `path` with the given format.
    pub fn create<P: AsRef<Path>>(path: P, spec: WavSpec) -> Result<Self> {
        spec.check()?;
        let writer = WavWriter::create(path, hound::WavSpec::from(spec))?;
        Ok(Self {
            writer,
            spec,
            frames_written: 0,
        })
    }

    /// Format of the file being written.
    pub fn spec(&self) -> WavSpec {
        self.spec
    }

    /// Frames written so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Appends one frame; its length must equal the channel count.
    pub fn write_frame(&mut self, frame: &[f32]) -> Result<()> {
        let expected = usize::from(self.spec.channels);
        if frame.len() != expected {
            return Err(Error::FrameWidth {
                expected,
                got: frame.len(),
            });
        }

        if self.spec.is_float() {
            for &sample in frame {
                self.writer.write_sample(sample)?;
            }
        } else {
            let max_val = self.spec.int_scale();
            for &sample in frame {
                let int_sample = (sample * max_val).clamp(-max_val, max_val - 1.0) as i32;
                self.writer.write_sample(int_sample)?;
            }
        }
        self.frames_written += 1;
        Ok(())
    }

    /// Flushes and patches the WAV header.
    pub fn finalize(self) -> Result<()> {
        self.writer.finalize()?;
        Ok(())
    }
}

/// Reads a whole WAV file as frames.
pub fn read_wav_frames<P: AsRef<Path>>(path: P) -> Result<(Vec<Vec<f32>>, WavSpec)> {
    let source = WavFrameSource::open(path)?;
    let spec = source.spec();
    let frames = source.collect::<Result<Vec<_>>>()?;
    Ok((frames, spec))
}

/// Writes `frames` to a WAV file.
pub fn write_wav_frames<P: AsRef<Path>>(path: P, frames: &[Vec<f32>], spec: WavSpec) -> Result<()> {
    let mut sink = WavFrameSink::create(path, spec)?;
    for frame in frames {
        sink.write_frame(frame)?;
    }
    sink.finalize()
}
