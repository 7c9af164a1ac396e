//! Composition against WAV files on disk.

use std::num::NonZeroUsize;
use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};
use pretty_assertions::assert_eq;
use tempfile::tempdir;
use utapack_audio::{
    create_rng, read_clip, write_clip, ComposeSettings, Composer, WavFileSource, SAMPLE_RATE,
};
use utapack_core::oto::parse;
use utapack_core::{plan_batches, MemoryReporter, ToneRange};

fn write_tone_file(path: &Path, ms: u32, value: i16) {
    let spec = WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).unwrap();
    for _ in 0..(SAMPLE_RATE * ms / 1000) {
        writer.write_sample(value).unwrap();
    }
    writer.finalize().unwrap();
}

// ============================================================================
// Layout Tests
// ============================================================================

#[test]
fn test_two_entries_share_a_batch() {
    let dir = tempdir().unwrap();
    write_tone_file(&dir.path().join("a.wav"), 500, 111);
    write_tone_file(&dir.path().join("b.wav"), 500, 222);
    write_tone_file(&dir.path().join("c.wav"), 500, 333);

    let text = "a.wav=A,100,0,-50,0,0\nb.wav=B,200,0,-80,0,0\nc.wav=C,0,0,-10,0,0";
    let entries: Vec<_> = parse(text)
        .unwrap()
        .into_iter()
        .map(|e| e.rebased(dir.path()))
        .collect();
    let batches = plan_batches(entries, NonZeroUsize::new(2).unwrap());
    assert_eq!(batches.len(), 2);

    let mut composer = Composer::new(
        ComposeSettings::default(),
        WavFileSource::new(),
        MemoryReporter::new(),
    );
    let mut rng = create_rng(1);
    let first = composer.compose(&batches[0], &mut rng).unwrap();

    let new: Vec<(f64, f64)> = first
        .entries
        .iter()
        .map(|e| (e.offset, e.cutoff.to_stored()))
        .collect();
    assert_eq!(new, vec![(0.0, -50.0), (50.0, -80.0)]);

    let samples = first.audio.samples();
    assert_eq!(samples.len(), 2205 + 3528);
    assert!(samples[..2205].iter().all(|&s| s == 111));
    assert!(samples[2205..].iter().all(|&s| s == 222));

    let out = dir.path().join(&first.file_name);
    let written = write_clip(&out, &first.audio).unwrap();
    assert_eq!(written.num_samples, samples.len());
    assert_eq!(read_clip(&out).unwrap(), first.audio);
}

#[test]
fn test_offsets_increase_within_batch() {
    let dir = tempdir().unwrap();
    write_tone_file(&dir.path().join("a.wav"), 400, 500);

    let text = (0..6)
        .map(|i| format!("a.wav=a{i},{},0,-40,0,0", i * 50))
        .collect::<Vec<_>>()
        .join("\n");
    let entries: Vec<_> = parse(&text)
        .unwrap()
        .into_iter()
        .map(|e| e.rebased(dir.path()))
        .collect();
    let batches = plan_batches(entries, NonZeroUsize::new(6).unwrap());

    let settings = ComposeSettings {
        padding_ms: Some(8.0),
        tones: Some(ToneRange::default()),
        share_regions: false,
    };
    let mut composer = Composer::new(settings, WavFileSource::new(), MemoryReporter::new());
    let composed = composer.compose(&batches[0], &mut create_rng(7)).unwrap();

    for pair in composed.entries.windows(2) {
        let end = pair[0].offset - pair[0].cutoff.to_stored();
        assert!(pair[1].offset > end, "{:?} overlaps {:?}", pair[1], pair[0]);
    }
    let last = composed.entries.last().unwrap();
    assert!(last.offset - last.cutoff.to_stored() <= composed.audio.duration_ms() + 0.001);
}

// ============================================================================
// Determinism Tests
// ============================================================================

#[test]
fn test_same_seed_same_bytes() {
    let dir = tempdir().unwrap();
    write_tone_file(&dir.path().join("a.wav"), 300, -700);
    let entries: Vec<_> = parse("a.wav=x,10,0,-100,0,0\na.wav=y,150,0,50,0,0")
        .unwrap()
        .into_iter()
        .map(|e| e.rebased(dir.path()))
        .collect();
    let batches = plan_batches(entries, NonZeroUsize::new(4).unwrap());

    let settings = ComposeSettings {
        padding_ms: Some(4.0),
        tones: Some(ToneRange::default()),
        share_regions: false,
    };
    let render = |seed| {
        let mut composer = Composer::new(settings, WavFileSource::new(), MemoryReporter::new());
        let composed = composer.compose(&batches[0], &mut create_rng(seed)).unwrap();
        utapack_audio::WavResult::from_clip(&composed.audio).pcm_hash
    };

    assert_eq!(render(69420), render(69420));
    assert_ne!(render(69420), render(1));
}
