//! Annotation data model.
//!
//! An [`Annotation`] is a shape drawn over a video between two media
//! timestamps, optionally described with handwritten or typed text. All
//! annotations of one video source are grouped in an [`AnnotationData`].

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Timestamp format used for [`Annotation::date`].
pub const DATE_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// A 2D point of an annotation shape, in video pixel coordinates.
///
/// Serialized as the compact string `"x,y"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Error returned when a `"x,y"` point string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePointError(String);

impl fmt::Display for ParsePointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid point '{}': expected \"x,y\"", self.0)
    }
}

impl std::error::Error for ParsePointError {}

impl FromStr for Point {
    type Err = ParsePointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| ParsePointError(s.to_string()))?;
        let x = x
            .trim()
            .parse()
            .map_err(|_| ParsePointError(s.to_string()))?;
        let y = y
            .trim()
            .parse()
            .map_err(|_| ParsePointError(s.to_string()))?;
        Ok(Self { x, y })
    }
}

impl Serialize for Point {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Point {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Kind of outline drawn around an annotated region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeType {
    #[default]
    Polygon,
    Rectangle,
    Ellipse,
    Line,
}

/// A single annotation on a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub uuid: Uuid,
    /// Start of the annotated segment in media milliseconds.
    pub time_start: i64,
    /// End of the annotated segment in media milliseconds.
    pub time_end: i64,
    /// Recognized or typed description. `None` when the user never wrote one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Outline of the drawn shape.
    #[serde(default)]
    pub shape: Vec<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape_type: Option<ShapeType>,
    /// Handwriting strokes of the description, one point list per pen stroke.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub strokes: Vec<Vec<Point>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "date_format"
    )]
    pub date: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
}

impl Annotation {
    /// Create an undescribed annotation with a fresh UUID.
    pub fn new(time_start: i64, time_end: i64) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            time_start,
            time_end,
            description: None,
            shape: Vec::new(),
            shape_type: None,
            strokes: Vec::new(),
            date: None,
            creator: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_shape(mut self, shape: Vec<Point>) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_shape_type(mut self, shape_type: ShapeType) -> Self {
        self.shape_type = Some(shape_type);
        self
    }

    pub fn with_strokes(mut self, strokes: Vec<Vec<Point>>) -> Self {
        self.strokes = strokes;
        self
    }

    pub fn with_date(mut self, date: NaiveDateTime) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }

    /// Length of the annotated segment, saturating at zero.
    pub fn duration(&self) -> i64 {
        self.time_end.saturating_sub(self.time_start).max(0)
    }
}

/// All annotations recorded for one video source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationData {
    pub uuid: Uuid,
    pub video_source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    annotations: Vec<Annotation>,
}

impl AnnotationData {
    pub fn new(video_source: impl Into<String>, title: Option<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            video_source: video_source.into(),
            title,
            annotations: Vec::new(),
        }
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn get(&self, uuid: Uuid) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.uuid == uuid)
    }

    /// Store an annotation.
    ///
    /// An existing annotation with the same UUID is replaced; the saved
    /// annotation always ends up last in the list.
    pub fn save(&mut self, annotation: Annotation) {
        if let Some(pos) = self
            .annotations
            .iter()
            .position(|a| a.uuid == annotation.uuid)
        {
            self.annotations.remove(pos);
        }
        self.annotations.push(annotation);
    }

    /// Remove the annotation with the given UUID, returning it if present.
    pub fn remove(&mut self, uuid: Uuid) -> Option<Annotation> {
        let pos = self.annotations.iter().position(|a| a.uuid == uuid)?;
        Some(self.annotations.remove(pos))
    }

    /// Start times of all annotations, in list order.
    pub fn time_list(&self) -> Vec<i64> {
        self.annotations.iter().map(|a| a.time_start).collect()
    }
}

mod date_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::DATE_FORMAT;

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => serializer.collect_str(&d.format(DATE_FORMAT)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| NaiveDateTime::parse_from_str(&s, DATE_FORMAT))
            .transpose()
            .map_err(serde::de::Error::custom)
    }
}
