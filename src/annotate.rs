//! Creating and removing annotations from the command line.
//!
//! Changes are applied to the loaded corpus and the affected video's file
//! is written back immediately.

use anyhow::{bail, Context, Result};
use chrono::Local;
use covida_core::models::{Annotation, Point, ShapeType};
use std::path::PathBuf;
use uuid::Uuid;

use crate::config::Config;
use crate::corpus;

/// Input for [`add_annotation`].
#[derive(Debug, Clone)]
pub struct NewAnnotation {
    pub video_source: String,
    pub title: Option<String>,
    pub description: String,
    pub time_start: i64,
    pub time_end: i64,
    pub shape: Vec<Point>,
    pub creator: Option<String>,
}

/// Store a new annotation, creating the video's data if needed.
///
/// Returns the new annotation's UUID and the file that was written.
pub fn add_annotation(config: &Config, new: NewAnnotation) -> Result<(Uuid, PathBuf)> {
    if new.time_end < new.time_start {
        bail!(
            "time_end ({}) must not be before time_start ({})",
            new.time_end,
            new.time_start
        );
    }

    let mut corpus = corpus::load_corpus(config)?;

    let mut annotation = Annotation::new(new.time_start, new.time_end)
        .with_description(new.description)
        .with_shape(new.shape)
        .with_date(Local::now().naive_local());
    if !annotation.shape.is_empty() {
        annotation = annotation.with_shape_type(ShapeType::Polygon);
    }
    if let Some(creator) = new.creator {
        annotation = annotation.with_creator(creator);
    }
    let annotation_uuid = annotation.uuid;

    let data = corpus
        .store_mut()
        .get_or_create(&new.video_source, new.title);
    data.save(annotation);
    let data_uuid = data.uuid;

    let path = corpus.save(data_uuid)?;
    tracing::info!(annotation = %annotation_uuid, video = %new.video_source, file = %path.display(), "annotation saved");
    Ok((annotation_uuid, path))
}

/// Remove an annotation by UUID and write its video's file back.
pub fn remove_annotation(config: &Config, id: &str) -> Result<PathBuf> {
    let uuid = Uuid::parse_str(id).with_context(|| format!("Invalid annotation id: {}", id))?;
    let mut corpus = corpus::load_corpus(config)?;
    let (data_uuid, _) = corpus.store_mut().remove_annotation(uuid)?;
    let path = corpus.save(data_uuid)?;
    tracing::info!(annotation = %uuid, file = %path.display(), "annotation removed");
    Ok(path)
}

pub fn run_add(config: &Config, new: NewAnnotation) -> Result<()> {
    let (uuid, path) = add_annotation(config, new)?;
    println!("{}", uuid);
    eprintln!("Saved to {}", path.display());
    Ok(())
}

pub fn run_remove(config: &Config, id: &str) -> Result<()> {
    let path = remove_annotation(config, id)?;
    println!("Removed {} from {}", id, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CorpusConfig, LoggingConfig, OutputConfig};
    use tempfile::TempDir;

    fn config_for(root: &std::path::Path) -> Config {
        Config {
            corpus: CorpusConfig {
                root: root.to_path_buf(),
                include_globs: vec!["**/*.json".to_string()],
                exclude_globs: Vec::new(),
                follow_symlinks: false,
            },
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    fn new_annotation(video: &str, description: &str) -> NewAnnotation {
        NewAnnotation {
            video_source: video.to_string(),
            title: Some("Demo".to_string()),
            description: description.to_string(),
            time_start: 1000,
            time_end: 4000,
            shape: vec![Point::new(1, 1), Point::new(20, 30)],
            creator: Some("tz".to_string()),
        }
    }

    #[test]
    fn test_add_then_remove() {
        let tmp = TempDir::new().unwrap();
        let config = config_for(tmp.path());

        let (first, path) = add_annotation(&config, new_annotation("demo.mp4", "DFKI Demo")).unwrap();
        let (second, path2) = add_annotation(&config, new_annotation("demo.mp4", "Video")).unwrap();
        assert_eq!(path, path2);

        let store = corpus::load_corpus(&config).unwrap().into_store();
        let data = store.by_source("demo.mp4").unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data.annotations()[0].uuid, first);
        assert!(data.annotations()[0].date.is_some());
        assert_eq!(data.annotations()[0].shape_type, Some(ShapeType::Polygon));

        remove_annotation(&config, &first.to_string()).unwrap();
        let store = corpus::load_corpus(&config).unwrap().into_store();
        let data = store.by_source("demo.mp4").unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data.annotations()[0].uuid, second);
    }

    #[test]
    fn test_rejects_inverted_segment() {
        let tmp = TempDir::new().unwrap();
        let mut new = new_annotation("demo.mp4", "x");
        new.time_end = 10;
        let err = add_annotation(&config_for(tmp.path()), new).unwrap_err();
        assert!(err.to_string().contains("time_end"));
    }

    #[test]
    fn test_remove_unknown_annotation_fails() {
        let tmp = TempDir::new().unwrap();
        let id = Uuid::new_v4().to_string();
        let err = remove_annotation(&config_for(tmp.path()), &id).unwrap_err();
        assert!(err.to_string().contains("Annotation not found"));
    }

    #[test]
    fn test_remove_rejects_bad_id() {
        let tmp = TempDir::new().unwrap();
        assert!(remove_annotation(&config_for(tmp.path()), "not-a-uuid").is_err());
    }
}
