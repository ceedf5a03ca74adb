//! Streams a WAV file through a filter into another WAV file.

use crate::wav::{WavFrameSink, WavFrameSource, WavSpec};
use crate::{Error, Result};
use ondula_core::Filter;
use std::path::Path;
use std::time::{Duration, Instant};

/// Summary of a completed [`FilterRunner::run`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunStats {
    /// Frames pushed through the filter, tail included.
    pub frames: u64,
    /// Zero frames appended after the input ran out.
    pub tail_frames: u64,
    /// Sample rate shared by input and output.
    pub sample_rate: u32,
    /// Largest absolute input sample.
    pub input_peak: f32,
    /// Largest absolute output sample.
    pub output_peak: f32,
    /// Wall-clock time spent in the run.
    pub elapsed: Duration,
}

impl RunStats {
    /// Audio duration processed, in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.frames as f64 / f64::from(self.sample_rate)
    }

    /// Processed audio time over wall-clock time.
    pub fn realtime_factor(&self) -> f64 {
        let elapsed = self.elapsed.as_secs_f64();
        if elapsed > 0.0 {
            self.duration_secs() / elapsed
        } else {
            f64::INFINITY
        }
    }
}

/// Drives a [`Filter`] over a WAV file, one frame per step.
///
/// The filter's input count must equal the input file's channel count; the
/// output file gets one channel per filter output at the same sample rate.
/// Any filter error aborts the run.
pub struct FilterRunner {
    tail: u64,
    bit_depth: Option<u16>,
    progress: Option<Box<dyn FnMut(u64)>>,
}

impl FilterRunner {
    /// Creates a runner with no tail, keeping the input bit depth.
    pub fn new() -> Self {
        Self {
            tail: 0,
            bit_depth: None,
            progress: None,
        }
    }

    /// Appends `frames` zero frames after the input so feedback tails ring out.
    pub fn with_tail(mut self, frames: u64) -> Self {
        self.tail = frames;
        self
    }

    /// Writes the output at `bits` per sample instead of the input's depth.
    pub fn with_bit_depth(mut self, bits: u16) -> Self {
        self.bit_depth = Some(bits);
        self
    }

    /// Calls `callback` with the running frame count every 4096 frames and
    /// once at the end.
    pub fn with_progress(mut self, callback: impl FnMut(u64) + 'static) -> Self {
        self.progress = Some(Box::new(callback));
        self
    }

    /// Total frames a run over `input` will process.
    pub fn planned_frames<P: AsRef<Path>>(&self, input: P) -> Result<u64> {
        Ok(WavFrameSource::open(input)?.total_frames() + self.tail)
    }

    /// Processes `input` into `output`.
    pub fn run<F, P, Q>(&mut self, filter: &mut F, input: P, output: Q) -> Result<RunStats>
    where
        F: Filter + ?Sized,
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let started = Instant::now();
        let mut source = WavFrameSource::open(input.as_ref())?;
        let in_spec = source.spec();

        if filter.input_count() != source.channels() {
            return Err(Error::ChannelMismatch {
                expected: filter.input_count(),
                channels: in_spec.channels,
            });
        }

        let out_spec = WavSpec {
            channels: u16::try_from(filter.output_count()).map_err(|_| {
                Error::UnsupportedFormat(format!("{} output channels", filter.output_count()))
            })?,
            sample_rate: in_spec.sample_rate,
            bits_per_sample: self.bit_depth.unwrap_or(in_spec.bits_per_sample),
        };
        let mut sink = WavFrameSink::create(output.as_ref(), out_spec)?;

        tracing::info!(
            input = %input.as_ref().display(),
            output = %output.as_ref().display(),
            channels_in = in_spec.channels,
            channels_out = out_spec.channels,
            sample_rate = in_spec.sample_rate,
            tail = self.tail,
            "filter run started"
        );

        let mut stats = RunStats {
            frames: 0,
            tail_frames: 0,
            sample_rate: in_spec.sample_rate,
            input_peak: 0.0,
            output_peak: 0.0,
            elapsed: Duration::ZERO,
        };

        while let Some(frame) = source.next_frame()? {
            stats.input_peak = frame.iter().fold(stats.input_peak, |p, s| p.max(s.abs()));
            self.step(filter, &frame, &mut sink, &mut stats)?;
        }

        let silence = vec![0.0; source.channels()];
        for _ in 0..self.tail {
            self.step(filter, &silence, &mut sink, &mut stats)?;
            stats.tail_frames += 1;
        }

        sink.finalize()?;
        if let Some(progress) = self.progress.as_mut() {
            progress(stats.frames);
        }

        stats.elapsed = started.elapsed();
        tracing::info!(
            frames = stats.frames,
            output_peak = stats.output_peak,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "filter run finished"
        );
        Ok(stats)
    }

    fn step<F: Filter + ?Sized>(
        &mut self,
        filter: &mut F,
        frame: &[f32],
        sink: &mut WavFrameSink,
        stats: &mut RunStats,
    ) -> Result<()> {
        let out = filter
            .compute_one_step(frame)
            .map_err(|source| Error::Filter {
                frame: stats.frames,
                source,
            })?;
        stats.output_peak = out.iter().fold(stats.output_peak, |p, s| p.max(s.abs()));
        sink.write_frame(&out)?;
        stats.frames += 1;

        if stats.frames % 4096 == 0
            && let Some(progress) = self.progress.as_mut()
        {
            progress(stats.frames);
        }
        Ok(())
    }
}

impl Default for FilterRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FilterRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterRunner")
            .field("tail", &self.tail)
            .field("bit_depth", &self.bit_depth)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}
