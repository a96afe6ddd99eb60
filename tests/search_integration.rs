use std::fs;
use std::path::Path;

use covida::config::{Config, CorpusConfig, LoggingConfig, OutputConfig};
use covida::corpus::load_corpus;
use covida::models::{Annotation, AnnotationData};
use covida_core::search::search;
use covida_core::strategy::MatchStrategy;
use tempfile::TempDir;

fn config_for(root: &Path, exclude_globs: &[&str]) -> Config {
    Config {
        corpus: CorpusConfig {
            root: root.to_path_buf(),
            include_globs: vec!["**/*.json".to_string()],
            exclude_globs: exclude_globs.iter().map(|g| g.to_string()).collect(),
            follow_symlinks: false,
        },
        output: OutputConfig::default(),
        logging: LoggingConfig::default(),
    }
}

fn write_video(path: &Path, source: &str, descriptions: &[&str]) -> AnnotationData {
    let mut data = AnnotationData::new(source, None);
    for (i, description) in descriptions.iter().enumerate() {
        let start = i as i64 * 1000;
        data.save(Annotation::new(start, start + 500).with_description(*description));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, serde_json::to_string_pretty(&data).unwrap()).unwrap();
    data
}

#[test]
fn test_matches_follow_stored_order_not_pass_order() {
    let tmp = TempDir::new().unwrap();
    write_video(
        &tmp.path().join("a.json"),
        "a.mp4",
        &["whiteboard sketch", "Video lecture", "DFKI Demo"],
    );

    let corpus = load_corpus(&config_for(tmp.path(), &[])).unwrap();
    let result = corpus.store().search(&["DFKI", "sketchy"]);

    assert_eq!(result.len(), 1);
    let matches = &result.videos()[0].matches;
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].position, 0);
    assert_eq!(matches[0].strategy, MatchStrategy::Levenshtein);
    assert_eq!(matches[0].token, "sketch");
    assert_eq!(matches[1].position, 2);
    assert_eq!(matches[1].strategy, MatchStrategy::Exact);
    assert_eq!(matches[1].candidate, "DFKI");
}

#[test]
fn test_loader_skips_excluded_and_git_files() {
    let tmp = TempDir::new().unwrap();
    write_video(&tmp.path().join("b.json"), "b.mp4", &["Video"]);
    write_video(&tmp.path().join("a.json"), "a.mp4", &["Video"]);
    write_video(&tmp.path().join(".git/objects/x.json"), "git.mp4", &["Video"]);
    write_video(&tmp.path().join("drafts/c.json"), "c.mp4", &["Video"]);

    let corpus = load_corpus(&config_for(tmp.path(), &["drafts/**"])).unwrap();
    let sources: Vec<&str> = corpus
        .store()
        .iter()
        .map(|d| d.video_source.as_str())
        .collect();
    assert_eq!(sources, vec!["a.mp4", "b.mp4"]);

    let result = corpus.store().search(&["Video"]);
    let found: Vec<&str> = result
        .videos()
        .iter()
        .map(|v| v.video_source.as_str())
        .collect();
    assert_eq!(found, vec!["a.mp4", "b.mp4"]);
}

#[test]
fn test_duplicate_video_file_is_skipped() {
    let tmp = TempDir::new().unwrap();
    let data = write_video(&tmp.path().join("a.json"), "a.mp4", &["Video"]);
    fs::write(
        tmp.path().join("b.json"),
        serde_json::to_string(&data).unwrap(),
    )
    .unwrap();

    let corpus = load_corpus(&config_for(tmp.path(), &[])).unwrap();
    assert_eq!(corpus.store().len(), 1);
    assert_eq!(corpus.skipped().len(), 1);
    assert!(corpus.skipped()[0].ends_with("b.json"));
}

#[test]
fn test_absent_inputs_give_empty_result() {
    let tmp = TempDir::new().unwrap();
    write_video(&tmp.path().join("a.json"), "a.mp4", &["Video"]);
    let corpus = load_corpus(&config_for(tmp.path(), &[])).unwrap();

    let candidates = ["Video"];
    assert!(search(None::<&[&str]>, Some(corpus.store().iter())).is_empty());
    assert!(search(Some(&candidates[..]), None::<Vec<&AnnotationData>>).is_empty());
    assert!(!search(Some(&candidates[..]), Some(corpus.store().iter())).is_empty());
}

#[test]
fn test_saved_video_is_searchable_after_reload() {
    let tmp = TempDir::new().unwrap();
    let config = config_for(tmp.path(), &[]);

    let mut corpus = load_corpus(&config).unwrap();
    let data = corpus
        .store_mut()
        .get_or_create("new.mp4", Some("New".to_string()));
    data.save(Annotation::new(0, 100).with_description("Gesture recognition"));
    let uuid = data.uuid;
    let path = corpus.save(uuid).unwrap();
    assert_eq!(path, tmp.path().join(format!("{}.json", uuid)));

    let reloaded = load_corpus(&config).unwrap();
    let result = reloaded.store().search(&["gesture"]);
    assert_eq!(result.total_matches(), 1);
    assert_eq!(
        result.videos()[0].matches[0].strategy,
        MatchStrategy::CaseInsensitive
    );
}

#[test]
fn test_missing_root_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let err = load_corpus(&config_for(&tmp.path().join("missing"), &[])).unwrap_err();
    assert!(err.to_string().contains("Corpus root does not exist"));
}
