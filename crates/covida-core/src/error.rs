use uuid::Uuid;

/// Lookup failures surfaced by [`AnnotationStore`](crate::store::AnnotationStore).
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Video not found: {0}")]
    VideoNotFound(String),

    #[error("Annotation not found: {0}")]
    AnnotationNotFound(Uuid),
}
