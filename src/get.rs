//! Annotation retrieval by UUID.
//!
//! Used by `covida get` to jump from a search hit to the full annotation
//! and the video segment it covers.

use anyhow::{Context, Result};
use covida_core::error::StoreError;
use covida_core::models::Annotation;
use serde::Serialize;
use uuid::Uuid;

use crate::config::Config;
use crate::corpus;
use crate::search::format_media_time;

#[derive(Debug, Clone, Serialize)]
pub struct AnnotationResponse {
    pub data_uuid: Uuid,
    pub video_source: String,
    pub title: Option<String>,
    pub annotation: Annotation,
}

/// Core get function returning structured data.
pub fn get_annotation(config: &Config, id: &str) -> Result<AnnotationResponse> {
    let uuid = Uuid::parse_str(id).with_context(|| format!("Invalid annotation id: {}", id))?;
    let corpus = corpus::load_corpus(config)?;

    let (data, annotation) = corpus
        .store()
        .find_annotation(uuid)
        .ok_or(StoreError::AnnotationNotFound(uuid))?;

    Ok(AnnotationResponse {
        data_uuid: data.uuid,
        video_source: data.video_source.clone(),
        title: data.title.clone(),
        annotation: annotation.clone(),
    })
}

pub fn run_get(config: &Config, id: &str, format: Option<&str>) -> Result<()> {
    let response = get_annotation(config, id)?;

    if format.unwrap_or(config.output.format.as_str()) == "json" {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    let a = &response.annotation;
    println!("Annotation:  {}", a.uuid);
    println!("Video:       {}", response.video_source);
    if let Some(title) = &response.title {
        println!("Title:       {}", title);
    }
    println!(
        "Segment:     {} - {} ({})",
        format_media_time(a.time_start),
        format_media_time(a.time_end),
        format_media_time(a.duration())
    );
    if let Some(shape_type) = &a.shape_type {
        println!("Shape type:  {:?}", shape_type);
    }
    if let Some(creator) = &a.creator {
        println!("Creator:     {}", creator);
    }
    if let Some(date) = &a.date {
        println!(
            "Date:        {}",
            date.format(covida_core::models::DATE_FORMAT)
        );
    }
    println!("Shape:       {} point(s)", a.shape.len());
    if !a.strokes.is_empty() {
        println!("Strokes:     {}", a.strokes.len());
    }
    println!();
    println!("{}", a.description.as_deref().unwrap_or("(no description)"));

    Ok(())
}
