//! WAV I/O and the driving harness for ondula filters.
//!
//! This crate provides:
//!
//! - **Frame I/O**: [`WavFrameSource`] and [`WavFrameSink`] read and write one
//!   frame (one sample per channel) at a time
//! - **Whole-file helpers**: [`read_wav_frames`], [`write_wav_frames`] and
//!   [`read_wav_info`]
//! - **Driving harness**: [`FilterRunner`] streams a WAV file through any
//!   [`Filter`](ondula_core::Filter) into another WAV file
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ondula_io::FilterRunner;
//!
//! let mut echo = ondula_effects::echo(0.6, 4410)?;
//! let stats = FilterRunner::new()
//!     .with_tail(44100)
//!     .run(&mut echo, "input.wav", "output.wav")?;
//! println!("{} frames", stats.frames);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod runner;
mod wav;

pub use runner::{FilterRunner, RunStats};
pub use wav::{
    WavFormat, WavFrameSink, WavFrameSource, WavInfo, WavSpec, read_wav_frames, read_wav_info,
    write_wav_frames,
};

/// Error types for WAV I/O and filter runs.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The filter failed on a frame; the run stops there.
    #[error("filter failed at frame {frame}: {source}")]
    Filter {
        /// Zero-based index of the failing frame.
        frame: u64,
        /// The filter's error.
        #[source]
        source: ondula_core::FilterError,
    },

    /// The filter's input count does not match the file's channel count.
    #[error("filter expects {expected} input channel(s) but the file has {channels}")]
    ChannelMismatch {
        /// Filter input count.
        expected: usize,
        /// Channels in the input file.
        channels: u16,
    },

    /// A frame of the wrong width was written to a sink.
    #[error("frame has {got} sample(s), sink expects {expected}")]
    FrameWidth {
        /// Channels in the sink.
        expected: usize,
        /// Samples supplied.
        got: usize,
    },

    /// The requested sample format is not supported.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),
}

/// Convenience result type for I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
