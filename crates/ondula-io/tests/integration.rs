//! Integration tests for ondula-io frame I/O and the filter runner.

use ondula_core::{Addition, CompositeFilter, Filter, FilterError, Gain};
use ondula_io::{
    Error, FilterRunner, WavFormat, WavFrameSink, WavFrameSource, WavSpec, read_wav_frames,
    read_wav_info, write_wav_frames,
};
use std::cell::Cell;
use std::rc::Rc;
use tempfile::NamedTempFile;

fn mono(samples: &[f32]) -> Vec<Vec<f32>> {
    samples.iter().map(|&s| vec![s]).collect()
}

fn float_spec(channels: u16) -> WavSpec {
    WavSpec {
        channels,
        sample_rate: 44100,
        bits_per_sample: 32,
    }
}

// ---------------------------------------------------------------------------
// Frame I/O
// ---------------------------------------------------------------------------

#[test]
fn float_frames_roundtrip_exactly() {
    let frames = vec![vec![0.5, -0.25], vec![1.0, 0.0], vec![-1.0, 0.125]];
    let file = NamedTempFile::new().unwrap();
    write_wav_frames(file.path(), &frames, float_spec(2)).unwrap();

    let (loaded, spec) = read_wav_frames(file.path()).unwrap();
    assert_eq!(spec, float_spec(2));
    assert_eq!(loaded, frames);
}

#[test]
fn int16_frames_roundtrip_within_quantization() {
    let samples: Vec<f32> = (0..100).map(|i| (i as f32 / 50.0) - 1.0).collect();
    let spec = WavSpec::default();
    let file = NamedTempFile::new().unwrap();
    write_wav_frames(file.path(), &mono(&samples), spec).unwrap();

    let (loaded, _) = read_wav_frames(file.path()).unwrap();
    assert_eq!(loaded.len(), samples.len());
    for (frame, &s) in loaded.iter().zip(&samples) {
        assert!((frame[0] - s).abs() < 1.0 / 16384.0, "{} vs {s}", frame[0]);
    }
}

#[test]
fn source_iterates_frames_and_reports_totals() {
    let file = NamedTempFile::new().unwrap();
    write_wav_frames(file.path(), &mono(&[0.1, 0.2, 0.3]), float_spec(1)).unwrap();

    let source = WavFrameSource::open(file.path()).unwrap();
    assert_eq!(source.total_frames(), 3);
    assert_eq!(source.channels(), 1);
    let frames: Vec<Vec<f32>> = source.map(Result::unwrap).collect();
    assert_eq!(frames, mono(&[0.1, 0.2, 0.3]));
}

#[test]
fn sink_rejects_wrong_frame_width() {
    let file = NamedTempFile::new().unwrap();
    let mut sink = WavFrameSink::create(file.path(), float_spec(2)).unwrap();
    assert!(matches!(
        sink.write_frame(&[0.0]),
        Err(Error::FrameWidth {
            expected: 2,
            got: 1
        })
    ));
    sink.write_frame(&[0.0, 0.0]).unwrap();
    assert_eq!(sink.frames_written(), 1);
    sink.finalize().unwrap();
}

#[test]
fn info_reads_header_only() {
    let file = NamedTempFile::new().unwrap();
    write_wav_frames(file.path(), &mono(&vec![0.0; 22050]), WavSpec::default()).unwrap();

    let info = read_wav_info(file.path()).unwrap();
    assert_eq!(info.channels, 1);
    assert_eq!(info.sample_rate, 44100);
    assert_eq!(info.bits_per_sample, 16);
    assert_eq!(info.num_frames, 22050);
    assert!((info.duration_secs - 0.5).abs() < 1e-9);
    assert_eq!(info.format, WavFormat::Pcm);
}

#[test]
fn missing_file_is_a_wav_error() {
    assert!(matches!(
        read_wav_info("/nonexistent/ondula/input.wav"),
        Err(Error::Wav(_))
    ));
}

// ---------------------------------------------------------------------------
// Filter runner
// ---------------------------------------------------------------------------

#[test]
fn runner_applies_echo_with_tail() {
    let input = NamedTempFile::new().unwrap();
    let output = NamedTempFile::new().unwrap();
    write_wav_frames(input.path(), &mono(&[1.0, 0.0, 0.0]), float_spec(1)).unwrap();

    let mut echo = ondula_effects::echo(0.5, 2).unwrap();
    let stats = FilterRunner::new()
        .with_tail(4)
        .run(&mut echo, input.path(), output.path())
        .unwrap();
    assert_eq!(stats.frames, 7);
    assert_eq!(stats.tail_frames, 4);
    assert_eq!(stats.input_peak, 1.0);
    assert_eq!(stats.output_peak, 1.0);

    let (frames, spec) = read_wav_frames(output.path()).unwrap();
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, 44100);
    assert_eq!(frames, mono(&[1.0, 0.0, 0.5, 0.0, 0.25, 0.0, 0.125]));
}

#[test]
fn runner_maps_channels_through_filter() {
    // Stereo in, mono sum out.
    let mut mix = CompositeFilter::new(2, 1);
    let sum = mix.add_block(Addition::new());
    let half = mix.add_block(Gain::new(0.5));
    mix.connect_input_to_block(0, sum, 0).unwrap();
    mix.connect_input_to_block(1, sum, 1).unwrap();
    mix.connect_block_to_block(sum, 0, half, 0).unwrap();
    mix.connect_block_to_output(half, 0, 0).unwrap();

    let input = NamedTempFile::new().unwrap();
    let output = NamedTempFile::new().unwrap();
    let frames = vec![vec![1.0, 0.0], vec![0.5, 0.5], vec![-1.0, 0.5]];
    write_wav_frames(input.path(), &frames, float_spec(2)).unwrap();

    FilterRunner::new()
        .run(&mut mix, input.path(), output.path())
        .unwrap();
    let (out, spec) = read_wav_frames(output.path()).unwrap();
    assert_eq!(spec.channels, 1);
    assert_eq!(out, mono(&[0.5, 0.5, -0.25]));
}

#[test]
fn runner_rejects_channel_mismatch() {
    let input = NamedTempFile::new().unwrap();
    let output = NamedTempFile::new().unwrap();
    write_wav_frames(input.path(), &[vec![0.0, 0.0]], float_spec(2)).unwrap();

    let mut echo = ondula_effects::echo(0.5, 2).unwrap();
    let err = FilterRunner::new()
        .run(&mut echo, input.path(), output.path())
        .unwrap_err();
    assert!(matches!(
        err,
        Error::ChannelMismatch {
            expected: 1,
            channels: 2
        }
    ));
}

#[test]
fn runner_stops_on_filter_error() {
    // Output never wired: the graph is invalid and the first step fails.
    let mut broken = CompositeFilter::new(1, 1);
    let g = broken.add_block(Gain::new(1.0));
    broken.connect_input_to_block(0, g, 0).unwrap();

    let input = NamedTempFile::new().unwrap();
    let output = NamedTempFile::new().unwrap();
    write_wav_frames(input.path(), &mono(&[0.1, 0.2]), float_spec(1)).unwrap();

    let err = FilterRunner::new()
        .run(&mut broken, input.path(), output.path())
        .unwrap_err();
    match err {
        Error::Filter { frame, source } => {
            assert_eq!(frame, 0);
            assert!(matches!(source, FilterError::IncompleteGraph(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn runner_converts_bit_depth_and_reports_progress() {
    let input = NamedTempFile::new().unwrap();
    let output = NamedTempFile::new().unwrap();
    write_wav_frames(input.path(), &mono(&vec![0.25; 5000]), float_spec(1)).unwrap();

    let seen = Rc::new(Cell::new(0u64));
    let sink = Rc::clone(&seen);
    let mut gain = CompositeFilter::new(1, 1);
    let g = gain.add_block(Gain::new(2.0));
    gain.connect_input_to_block(0, g, 0).unwrap();
    gain.connect_block_to_output(g, 0, 0).unwrap();

    let mut runner = FilterRunner::new()
        .with_bit_depth(16)
        .with_progress(move |frames| sink.set(frames));
    assert_eq!(runner.planned_frames(input.path()).unwrap(), 5000);
    let stats = runner.run(&mut gain, input.path(), output.path()).unwrap();
    assert_eq!(stats.frames, 5000);
    assert_eq!(seen.get(), 5000);
    assert!(gain.is_valid());

    let info = read_wav_info(output.path()).unwrap();
    assert_eq!(info.bits_per_sample, 16);
    assert_eq!(info.format, WavFormat::Pcm);
}
