//! Annotation search over handwriting-recognition candidates.
//!
//! The engine takes the candidate strings produced by an external
//! recognizer and a corpus of [`AnnotationData`], and collects every
//! annotation whose description has a token matching a candidate.
//!
//! # Pass Order
//!
//! For each candidate, in order:
//!
//! 1. [`Exact`](MatchStrategy::Exact) over the whole corpus.
//! 2. [`CaseInsensitive`](MatchStrategy::CaseInsensitive) over the whole corpus.
//! 3. [`WrapAround`](MatchStrategy::WrapAround) over the whole corpus.
//! 4. [`Levenshtein`](MatchStrategy::Levenshtein) over the whole corpus.
//!
//! Within a description only the first token satisfying a pass counts. An
//! annotation is recorded once, with the pass, token, and candidate that
//! first matched it; later passes and candidates never duplicate it.
//!
//! # Result Order
//!
//! Videos appear in corpus order. Matches within a video appear in the
//! order the annotations are stored, regardless of which pass or candidate
//! found them.

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use uuid::Uuid;

use crate::models::{Annotation, AnnotationData};
use crate::strategy::MatchStrategy;
use crate::tokenize::tokens;

/// One matched annotation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotationMatch {
    /// Index of the annotation in its [`AnnotationData`].
    pub position: usize,
    /// Pass that first matched the annotation.
    pub strategy: MatchStrategy,
    /// Description token that matched.
    pub token: String,
    /// Candidate string that produced the match.
    pub candidate: String,
    /// Copy of the matched annotation.
    pub annotation: Annotation,
}

/// All matches for one video.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoMatches {
    /// UUID of the video's [`AnnotationData`].
    pub data_uuid: Uuid,
    /// Video file name or URL.
    pub video_source: String,
    /// Display title, if the video has one.
    pub title: Option<String>,
    /// Matches in stored annotation order.
    pub matches: Vec<AnnotationMatch>,
}

impl VideoMatches {
    pub fn annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.matches.iter().map(|m| &m.annotation)
    }
}

/// Search output: matched annotations grouped per video.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SearchResult {
    videos: Vec<VideoMatches>,
}

impl SearchResult {
    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    /// Number of videos with at least one match.
    pub fn len(&self) -> usize {
        self.videos.len()
    }

    /// Number of matched annotations across all videos.
    pub fn total_matches(&self) -> usize {
        self.videos.iter().map(|v| v.matches.len()).sum()
    }

    pub fn videos(&self) -> &[VideoMatches] {
        &self.videos
    }

    pub fn into_videos(self) -> Vec<VideoMatches> {
        self.videos
    }

    /// Matches for the video whose data has the given UUID.
    pub fn get(&self, data_uuid: Uuid) -> Option<&VideoMatches> {
        self.videos.iter().find(|v| v.data_uuid == data_uuid)
    }

    /// Matched annotations for one video, in stored order. Empty if the
    /// video had no match.
    pub fn annotations_for(&self, data_uuid: Uuid) -> Vec<&Annotation> {
        self.get(data_uuid)
            .map(|v| v.annotations().collect())
            .unwrap_or_default()
    }
}

/// Search with possibly absent inputs.
///
/// An absent candidate list or corpus yields an empty result. See
/// [`search_annotations`] for the matching rules.
pub fn search<'c, S, I>(candidates: Option<&[S]>, corpus: Option<I>) -> SearchResult
where
    S: AsRef<str>,
    I: IntoIterator,
    I::Item: Into<Option<&'c AnnotationData>>,
{
    match (candidates, corpus) {
        (Some(candidates), Some(corpus)) => search_annotations(candidates, corpus),
        _ => SearchResult::default(),
    }
}

/// Run all match passes for every candidate against the corpus.
///
/// Corpus items may be `&AnnotationData` or `Option<&AnnotationData>`;
/// `None` items are skipped. If the same video (by UUID) occurs more than
/// once only its first occurrence is searched. Annotations without a
/// description never match.
pub fn search_annotations<'c, 's, S, I>(candidates: &'s [S], corpus: I) -> SearchResult
where
    S: AsRef<str>,
    I: IntoIterator,
    I::Item: Into<Option<&'c AnnotationData>>,
{
    let corpus = collect_corpus(corpus);
    if candidates.is_empty() || corpus.is_empty() {
        return SearchResult::default();
    }

    let tokenized: Vec<Vec<Option<Vec<&'c str>>>> = corpus
        .iter()
        .map(|&data| {
            data.annotations()
                .iter()
                .map(|a| a.description.as_deref().map(tokens))
                .collect()
        })
        .collect();

    let mut builder = ResultBuilder::new(corpus.len());

    for candidate in candidates {
        let candidate = candidate.as_ref();
        for strategy in MatchStrategy::PASSES {
            let before = builder.total();
            for (d, descriptions) in tokenized.iter().enumerate() {
                for (position, description) in descriptions.iter().enumerate() {
                    let Some(description) = description else {
                        continue;
                    };
                    if builder.contains(d, position) {
                        continue;
                    }
                    if let Some(token) = strategy.first_match(description, candidate) {
                        builder.insert(d, position, strategy, token, candidate);
                    }
                }
            }
            tracing::debug!(
                candidate,
                pass = %strategy,
                new_matches = builder.total() - before,
                "search pass complete"
            );
        }
    }

    builder.finish(&corpus)
}

fn collect_corpus<'c, I>(corpus: I) -> Vec<&'c AnnotationData>
where
    I: IntoIterator,
    I::Item: Into<Option<&'c AnnotationData>>,
{
    let mut seen = HashSet::new();
    corpus
        .into_iter()
        .filter_map(|item| -> Option<&'c AnnotationData> { item.into() })
        .filter(|data| {
            let first = seen.insert(data.uuid);
            if !first {
                tracing::debug!(uuid = %data.uuid, "skipping repeated video in corpus");
            }
            first
        })
        .collect()
}

struct Hit<'c, 's> {
    strategy: MatchStrategy,
    token: &'c str,
    candidate: &'s str,
}

/// Per-call accumulator. Keyed by corpus index, then annotation position,
/// so output order falls out of the map order.
struct ResultBuilder<'c, 's> {
    hits: Vec<BTreeMap<usize, Hit<'c, 's>>>,
}

impl<'c, 's> ResultBuilder<'c, 's> {
    fn new(corpus_len: usize) -> Self {
        Self {
            hits: (0..corpus_len).map(|_| BTreeMap::new()).collect(),
        }
    }

    fn contains(&self, data: usize, position: usize) -> bool {
        self.hits[data].contains_key(&position)
    }

    fn total(&self) -> usize {
        self.hits.iter().map(BTreeMap::len).sum()
    }

    fn insert(
        &mut self,
        data: usize,
        position: usize,
        strategy: MatchStrategy,
        token: &'c str,
        candidate: &'s str,
    ) {
        self.hits[data].entry(position).or_insert(Hit {
            strategy,
            token,
            candidate,
        });
    }

    fn finish(self, corpus: &[&'c AnnotationData]) -> SearchResult {
        let videos = self
            .hits
            .into_iter()
            .zip(corpus)
            .filter(|(hits, _)| !hits.is_empty())
            .map(|(hits, data)| VideoMatches {
                data_uuid: data.uuid,
                video_source: data.video_source.clone(),
                title: data.title.clone(),
                matches: hits
                    .into_iter()
                    .map(|(position, hit)| AnnotationMatch {
                        position,
                        strategy: hit.strategy,
                        token: hit.token.to_string(),
                        candidate: hit.candidate.to_string(),
                        annotation: data.annotations()[position].clone(),
                    })
                    .collect(),
            })
            .collect();

        SearchResult { videos }
    }
}
