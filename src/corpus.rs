//! Annotation corpus on disk.
//!
//! Each video's [`AnnotationData`] lives in its own JSON file below
//! `[corpus].root`. Loading walks the root, keeps files matching the
//! include globs and not matching the exclude globs, and parses them in
//! relative-path order. Unreadable or malformed files are logged and
//! skipped so one bad file never hides the rest of the corpus.

use anyhow::{bail, Context, Result};
use covida_core::models::AnnotationData;
use covida_core::store::AnnotationStore;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use uuid::Uuid;
use walkdir::WalkDir;

use crate::config::Config;

/// Loaded annotation data plus the file each video came from.
#[derive(Debug)]
pub struct Corpus {
    root: PathBuf,
    store: AnnotationStore,
    paths: HashMap<Uuid, PathBuf>,
    skipped: Vec<PathBuf>,
}

impl Corpus {
    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut AnnotationStore {
        &mut self.store
    }

    pub fn into_store(self) -> AnnotationStore {
        self.store
    }

    /// Files that matched the globs but could not be loaded.
    pub fn skipped(&self) -> &[PathBuf] {
        &self.skipped
    }

    /// File backing the given video: where it was loaded from, or
    /// `<root>/<uuid>.json` for a video created in this session.
    pub fn path_for(&self, uuid: Uuid) -> PathBuf {
        self.paths
            .get(&uuid)
            .cloned()
            .unwrap_or_else(|| self.root.join(format!("{}.json", uuid)))
    }

    /// Write one video's data back to disk.
    pub fn save(&mut self, uuid: Uuid) -> Result<PathBuf> {
        let data = self
            .store
            .get(uuid)
            .ok_or_else(|| anyhow::anyhow!("video not loaded: {}", uuid))?;
        let path = self.path_for(uuid);
        write_annotation_data(&path, data)?;
        self.paths.insert(uuid, path.clone());
        Ok(path)
    }
}

pub fn load_corpus(config: &Config) -> Result<Corpus> {
    let corpus_config = &config.corpus;
    let root = &corpus_config.root;
    if !root.exists() {
        bail!("Corpus root does not exist: {}", root.display());
    }

    let include_set = build_globset(&corpus_config.include_globs)?;

    let mut default_excludes = vec!["**/.git/**".to_string()];
    default_excludes.extend(corpus_config.exclude_globs.clone());
    let exclude_set = build_globset(&default_excludes)?;

    let mut files: Vec<(String, PathBuf)> = Vec::new();

    let walker = WalkDir::new(root).follow_links(corpus_config.follow_symlinks);
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        let rel_str = relative.to_string_lossy().to_string();

        if exclude_set.is_match(&rel_str) {
            continue;
        }
        if !include_set.is_match(&rel_str) {
            continue;
        }

        files.push((rel_str, path.to_path_buf()));
    }

    // Sort for deterministic ordering
    files.sort_by(|a, b| a.0.cmp(&b.0));

    let mut corpus = Corpus {
        root: root.clone(),
        store: AnnotationStore::new(),
        paths: HashMap::new(),
        skipped: Vec::new(),
    };

    for (rel_str, path) in files {
        let data = match read_annotation_data(&path) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(file = %rel_str, error = %format!("{:#}", e), "skipping annotation file");
                corpus.skipped.push(path);
                continue;
            }
        };

        if let Some(first) = corpus.paths.get(&data.uuid) {
            tracing::warn!(
                file = %rel_str,
                first = %first.display(),
                uuid = %data.uuid,
                "skipping annotation file with duplicate video uuid"
            );
            corpus.skipped.push(path);
            continue;
        }

        tracing::debug!(file = %rel_str, video = %data.video_source, annotations = data.len(), "loaded");
        corpus.paths.insert(data.uuid, path);
        corpus.store.insert(data);
    }

    Ok(corpus)
}

pub fn read_annotation_data(path: &Path) -> Result<AnnotationData> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let data = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(data)
}

pub fn write_annotation_data(path: &Path, data: &AnnotationData) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CorpusConfig, LoggingConfig, OutputConfig};
    use covida_core::models::Annotation;
    use tempfile::TempDir;

    fn config_for(root: &Path) -> Config {
        Config {
            corpus: CorpusConfig {
                root: root.to_path_buf(),
                include_globs: vec!["**/*.json".to_string()],
                exclude_globs: vec!["drafts/**".to_string()],
                follow_symlinks: false,
            },
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    fn sample(source: &str, description: &str) -> AnnotationData {
        let mut data = AnnotationData::new(source, None);
        data.save(Annotation::new(0, 1000).with_description(description));
        data
    }

    #[test]
    fn test_loads_in_path_order_and_applies_globs() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write_annotation_data(&root.join("b.json"), &sample("b.mp4", "second")).unwrap();
        write_annotation_data(&root.join("a.json"), &sample("a.mp4", "first")).unwrap();
        write_annotation_data(&root.join("drafts/c.json"), &sample("c.mp4", "draft")).unwrap();
        std::fs::write(root.join("notes.txt"), "not a corpus file").unwrap();

        let corpus = load_corpus(&config_for(root)).unwrap();
        let sources: Vec<_> = corpus
            .store()
            .iter()
            .map(|d| d.video_source.as_str())
            .collect();
        assert_eq!(sources, vec!["a.mp4", "b.mp4"]);
        assert!(corpus.skipped().is_empty());
    }

    #[test]
    fn test_malformed_file_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write_annotation_data(&root.join("good.json"), &sample("good.mp4", "ok")).unwrap();
        std::fs::write(root.join("bad.json"), "{ not json").unwrap();

        let corpus = load_corpus(&config_for(root)).unwrap();
        assert_eq!(corpus.store().len(), 1);
        assert_eq!(corpus.skipped(), &[root.join("bad.json")]);
    }

    #[test]
    fn test_duplicate_uuid_keeps_first_file() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        let data = sample("a.mp4", "original");
        let mut copy = data.clone();
        copy.video_source = "copy.mp4".to_string();
        write_annotation_data(&root.join("1.json"), &data).unwrap();
        write_annotation_data(&root.join("2.json"), &copy).unwrap();

        let corpus = load_corpus(&config_for(root)).unwrap();
        assert_eq!(corpus.store().len(), 1);
        assert_eq!(corpus.store().get(data.uuid).unwrap().video_source, "a.mp4");
        assert_eq!(corpus.skipped().len(), 1);
    }

    #[test]
    fn test_missing_root_is_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_corpus(&config_for(&tmp.path().join("missing"))).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_save_writes_back_to_source_file() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        let data = sample("a.mp4", "first");
        write_annotation_data(&root.join("lecture.json"), &data).unwrap();

        let mut corpus = load_corpus(&config_for(root)).unwrap();
        corpus
            .store_mut()
            .get_mut(data.uuid)
            .unwrap()
            .save(Annotation::new(5, 6).with_description("added"));
        let path = corpus.save(data.uuid).unwrap();
        assert_eq!(path, root.join("lecture.json"));

        let reloaded = read_annotation_data(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
    }

    #[test]
    fn test_save_new_video_uses_uuid_file_name() {
        let tmp = TempDir::new().unwrap();
        let mut corpus = load_corpus(&config_for(tmp.path())).unwrap();
        let uuid = corpus.store_mut().get_or_create("new.mp4", None).uuid;
        let path = corpus.save(uuid).unwrap();
        assert_eq!(path, tmp.path().join(format!("{}.json", uuid)));
        assert!(path.exists());
    }
}
