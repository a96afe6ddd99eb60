//! In-memory annotation store.
//!
//! [`AnnotationStore`] holds the [`AnnotationData`] of every open video, in
//! the order they were opened. It is a plain value: callers own it and pass
//! it where it is needed.

use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{Annotation, AnnotationData};
use crate::search::{search_annotations, SearchResult};

#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    videos: Vec<AnnotationData>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    /// Add a video's data, replacing an entry with the same UUID in place.
    pub fn insert(&mut self, data: AnnotationData) {
        match self.videos.iter_mut().find(|v| v.uuid == data.uuid) {
            Some(existing) => *existing = data,
            None => self.videos.push(data),
        }
    }

    pub fn get(&self, uuid: Uuid) -> Option<&AnnotationData> {
        self.videos.iter().find(|v| v.uuid == uuid)
    }

    pub fn get_mut(&mut self, uuid: Uuid) -> Option<&mut AnnotationData> {
        self.videos.iter_mut().find(|v| v.uuid == uuid)
    }

    /// Look up a video by its source identifier.
    pub fn by_source(&self, video_source: &str) -> Result<&AnnotationData, StoreError> {
        self.videos
            .iter()
            .find(|v| v.video_source == video_source)
            .ok_or_else(|| StoreError::VideoNotFound(video_source.to_string()))
    }

    /// Data for `video_source`, creating an empty entry if the video has
    /// never been annotated.
    pub fn get_or_create(
        &mut self,
        video_source: &str,
        title: Option<String>,
    ) -> &mut AnnotationData {
        let pos = match self
            .videos
            .iter()
            .position(|v| v.video_source == video_source)
        {
            Some(pos) => pos,
            None => {
                tracing::debug!(video_source, "creating annotation data for new video");
                self.videos.push(AnnotationData::new(video_source, title));
                self.videos.len() - 1
            }
        };
        &mut self.videos[pos]
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnnotationData> {
        self.videos.iter()
    }

    /// Drop a whole video's data.
    pub fn remove(&mut self, uuid: Uuid) -> Option<AnnotationData> {
        let pos = self.videos.iter().position(|v| v.uuid == uuid)?;
        Some(self.videos.remove(pos))
    }

    /// Remove an annotation from whichever video holds it.
    ///
    /// Returns the owning video's UUID together with the removed annotation.
    pub fn remove_annotation(&mut self, uuid: Uuid) -> Result<(Uuid, Annotation), StoreError> {
        for data in &mut self.videos {
            if let Some(annotation) = data.remove(uuid) {
                return Ok((data.uuid, annotation));
            }
        }
        Err(StoreError::AnnotationNotFound(uuid))
    }

    /// Find an annotation and the video it belongs to.
    pub fn find_annotation(&self, uuid: Uuid) -> Option<(&AnnotationData, &Annotation)> {
        self.videos
            .iter()
            .find_map(|data| data.get(uuid).map(|a| (data, a)))
    }

    /// Search every stored video. See [`search_annotations`].
    pub fn search<S: AsRef<str>>(&self, candidates: &[S]) -> SearchResult {
        search_annotations(candidates, self.videos.iter())
    }
}

impl FromIterator<AnnotationData> for AnnotationStore {
    fn from_iter<T: IntoIterator<Item = AnnotationData>>(iter: T) -> Self {
        let mut store = Self::new();
        for data in iter {
            store.insert(data);
        }
        store
    }
}
