use cloud::{artifact_name, CloudOptions, CloudRenderer, DEFAULT_MAX_WORDS, DEFAULT_SIZE};
use std::collections::BTreeSet;
use std::fs;
use tempfile::tempdir;
use wordstat_core::{TermCounter, WordStat, UNATTRIBUTED};

fn sample_stat() -> WordStat {
    let mut stat = WordStat::new();
    stat.record("$u1", &[("cat", 4), ("nap", 2)].into_iter().collect::<TermCounter>());
    stat.record("$u2", &[("dog", 3)].into_iter().collect::<TermCounter>());
    stat.record(UNATTRIBUTED, &[("photo", 1)].into_iter().collect::<TermCounter>());
    stat
}

fn listing(dir: &std::path::Path) -> BTreeSet<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn one_image_per_bucket_and_stale_files_removed() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("output");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("stale.png"), b"old").unwrap();
    fs::write(out.join("$gone.png"), b"old").unwrap();

    let renderer = CloudRenderer::new(&CloudOptions { size: 96, ..CloudOptions::default() }).unwrap();
    let stat = sample_stat();
    let written = renderer.render_all(&stat, &out).unwrap();

    let expected: BTreeSet<String> = stat.buckets().map(|(k, _)| artifact_name(k)).collect();
    assert_eq!(written.len(), 4);
    assert_eq!(listing(&out), expected);

    let img = image::open(out.join("all.png")).unwrap();
    assert_eq!(img.width(), 96);
    assert_eq!(img.height(), 96);
}

#[test]
fn rerun_produces_same_file_set() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("clouds");
    let renderer = CloudRenderer::new(&CloudOptions { size: 64, ..CloudOptions::default() }).unwrap();
    let stat = sample_stat();
    renderer.render_all(&stat, &out).unwrap();
    let first = listing(&out);
    renderer.render_all(&stat, &out).unwrap();
    assert_eq!(listing(&out), first);
}

#[test]
fn full_size_cloud_places_every_allowed_word() {
    let counter: TermCounter = (0..400u64).map(|i| (format!("word{i:03}"), 400 - i)).collect();
    let renderer = CloudRenderer::new(&CloudOptions::default()).unwrap();
    let placed = renderer.place(&counter);
    assert_eq!(placed.len(), DEFAULT_MAX_WORDS);
    for (i, a) in placed.iter().enumerate() {
        assert!(a.x + a.width <= DEFAULT_SIZE && a.y + a.height <= DEFAULT_SIZE);
        for b in &placed[i + 1..] {
            let apart = a.x + a.width <= b.x || b.x + b.width <= a.x || a.y + a.height <= b.y || b.y + b.height <= a.y;
            assert!(apart, "{} overlaps {}", a.text, b.text);
        }
    }
}
