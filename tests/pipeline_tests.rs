//! Integration tests for the sample, parse, align and merge pipeline

mod common;

use std::path::PathBuf;

use common::{scripted_interactor, srt, write_job_inputs};
use stepdoc::app::StepSettings;
use tempfile::TempDir;

const OPEN_MENU: &str = "Open the settings menu from the top bar";
const NOTIFICATIONS: &str = "Now look at the notification preferences";
const PRIVACY: &str = "Select the privacy tab on the left side";

fn per_frame_settings() -> StepSettings {
    StepSettings {
        interval_sec: 1.0,
        ..Default::default()
    }
}

#[test]
fn test_similar_screens_and_short_captions_merge() {
    let dir = TempDir::new().unwrap();
    let captions = srt(&[
        (0, 0, OPEN_MENU),
        (1, 1, NOTIFICATIONS),
        (2, 2, PRIVACY),
        (3, 3, "Ok"),
    ]);
    let (video, captions) = write_job_inputs(dir.path(), Some(&captions));
    let shots = dir.path().join("screenshots");

    let outcome = scripted_interactor(1.0, &[1, 1, 2, 2])
        .extract(&video, &captions, &shots, &per_frame_settings())
        .unwrap();

    let steps = outcome.steps();
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0].representative_image, shots.join("frame_00000.png"));
    assert_eq!(steps[0].combined_text, format!("{} {}", OPEN_MENU, NOTIFICATIONS));
    assert_eq!(steps[0].frame_range, 0..2);
    assert_eq!(steps[1].representative_image, shots.join("frame_00002.png"));
    assert_eq!(steps[1].combined_text, format!("{} Ok", PRIVACY));
    assert_eq!(steps[1].frame_range, 2..4);
    assert!(outcome.merge.unfingerprinted.is_empty());
}

#[test]
fn test_identical_screens_every_five_seconds_form_one_step() {
    let dir = TempDir::new().unwrap();
    let captions = srt(&[
        (0, 4, "Open the app"),
        (5, 9, "Tap settings"),
        (10, 14, "Done"),
    ]);
    let (video, captions) = write_job_inputs(dir.path(), Some(&captions));
    let settings = StepSettings {
        interval_sec: 5.0,
        ..Default::default()
    };

    let outcome = scripted_interactor(1.0, &[7; 11])
        .extract(&video, &captions, &dir.path().join("shots"), &settings)
        .unwrap();

    assert_eq!(outcome.sampling.frames.len(), 3);
    assert_eq!(outcome.steps().len(), 1);
    assert_eq!(
        outcome.steps()[0].combined_text,
        "Open the app Tap settings Done"
    );
    assert_eq!(outcome.steps()[0].end_sec, 10.0);
}

#[test]
fn test_frames_are_written_in_lexical_order() {
    let dir = TempDir::new().unwrap();
    let captions = srt(&[(0, 9, OPEN_MENU)]);
    let (video, captions) = write_job_inputs(dir.path(), Some(&captions));
    let shots = dir.path().join("screenshots");

    let outcome = scripted_interactor(2.0, &[1, 2, 3, 4, 5, 6])
        .extract(&video, &captions, &shots, &per_frame_settings())
        .unwrap();

    let timestamps: Vec<f64> = outcome
        .sampling
        .frames
        .iter()
        .map(|f| f.timestamp_sec)
        .collect();
    assert_eq!(timestamps, vec![0.0, 1.0, 2.0]);

    let mut names: Vec<String> = std::fs::read_dir(&shots)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec!["frame_00000.png", "frame_00001.png", "frame_00002.png"]
    );
}

#[test]
fn test_distinct_screens_without_text_trigger_stay_apart() {
    let dir = TempDir::new().unwrap();
    let captions = srt(&[(0, 0, "a"), (1, 1, "b"), (2, 2, "c")]);
    let (video, captions) = write_job_inputs(dir.path(), Some(&captions));
    let settings = StepSettings {
        interval_sec: 1.0,
        min_text_length: 0,
        similarity_threshold: 0,
        require_captions: true,
    };

    let outcome = scripted_interactor(1.0, &[1, 2, 3])
        .extract(&video, &captions, &dir.path().join("shots"), &settings)
        .unwrap();

    let texts: Vec<&str> = outcome
        .steps()
        .iter()
        .map(|s| s.combined_text.as_str())
        .collect();
    assert_eq!(texts, vec!["a", "b", "c"]);
}

#[test]
fn test_maximum_threshold_yields_single_step() {
    let dir = TempDir::new().unwrap();
    let captions = srt(&[(0, 0, OPEN_MENU), (1, 1, NOTIFICATIONS), (2, 2, PRIVACY)]);
    let (video, captions) = write_job_inputs(dir.path(), Some(&captions));
    let settings = StepSettings {
        interval_sec: 1.0,
        min_text_length: 0,
        similarity_threshold: 64,
        require_captions: true,
    };

    let outcome = scripted_interactor(1.0, &[1, 2, 3])
        .extract(&video, &captions, &dir.path().join("shots"), &settings)
        .unwrap();

    assert_eq!(outcome.steps().len(), 1);
    assert_eq!(
        outcome.steps()[0].combined_text,
        format!("{} {} {}", OPEN_MENU, NOTIFICATIONS, PRIVACY)
    );
}

#[test]
fn test_uncovered_frames_fold_into_previous_step() {
    let dir = TempDir::new().unwrap();
    let captions = srt(&[(0, 0, OPEN_MENU)]);
    let (video, captions) = write_job_inputs(dir.path(), Some(&captions));

    let outcome = scripted_interactor(1.0, &[1, 2, 3, 4])
        .extract(&video, &captions, &dir.path().join("shots"), &per_frame_settings())
        .unwrap();

    assert_eq!(outcome.aligned.iter().filter(|a| a.text.is_empty()).count(), 3);
    assert_eq!(outcome.steps().len(), 1);
    assert_eq!(outcome.steps()[0].combined_text, OPEN_MENU);
    assert_eq!(outcome.steps()[0].frame_count(), 4);
}

#[test]
fn test_malformed_caption_block_is_skipped() {
    let dir = TempDir::new().unwrap();
    let captions = format!(
        "1\n00:00:00,000 --> 00:00:00,500\n{}\n\n2\n00:00:01,000 -> 00:00:01,500\n{}\n\n3\n00:00:02,000 --> 00:00:02,500\n{}\n",
        OPEN_MENU, NOTIFICATIONS, PRIVACY
    );
    let (video, captions) = write_job_inputs(dir.path(), Some(&captions));

    let outcome = scripted_interactor(1.0, &[1, 2, 3])
        .extract(&video, &captions, &dir.path().join("shots"), &per_frame_settings())
        .unwrap();

    assert_eq!(outcome.transcript.intervals.len(), 2);
    assert_eq!(outcome.transcript.skipped.len(), 1);
    assert_eq!(outcome.transcript.skipped[0].block, 2);
    assert_eq!(outcome.aligned[1].text, "");
}

#[test]
fn test_steps_partition_aligned_frames() {
    let dir = TempDir::new().unwrap();
    let captions = srt(&[
        (0, 0, OPEN_MENU),
        (1, 1, "Ok"),
        (2, 2, PRIVACY),
        (3, 3, NOTIFICATIONS),
        (4, 4, OPEN_MENU),
    ]);
    let (video, captions) = write_job_inputs(dir.path(), Some(&captions));

    let outcome = scripted_interactor(1.0, &[1, 2, 3, 3, 4])
        .extract(&video, &captions, &dir.path().join("shots"), &per_frame_settings())
        .unwrap();

    let steps = outcome.steps();
    assert!(!steps.is_empty() && steps.len() <= outcome.aligned.len());

    let mut next = 0;
    for step in steps {
        assert_eq!(step.frame_range.start, next);
        assert_eq!(
            step.representative_image,
            PathBuf::from(outcome.aligned[step.frame_range.start].image_path())
        );
        next = step.frame_range.end;
    }
    assert_eq!(next, outcome.aligned.len());

    let rebuilt: Vec<&str> = steps
        .iter()
        .map(|s| s.combined_text.as_str())
        .filter(|t| !t.is_empty())
        .collect();
    let original: Vec<&str> = outcome
        .aligned
        .iter()
        .map(|a| a.text.as_str())
        .filter(|t| !t.is_empty())
        .collect();
    assert_eq!(rebuilt.join(" "), original.join(" "));
}
