//! `covida export`: write a video's annotations as Anvil XML.
//!
//! Two files are produced per video:
//!
//! - `<name>_spec.xml`: the annotation specification (one primary track
//!   with a `phaseType` value set).
//! - `<name>.anvil`: the annotation file. Each annotation becomes an `<el>`
//!   on the `main` track with its segment, description token, and the
//!   points of its handwriting strokes (or of its outline when no strokes
//!   were recorded).

use anyhow::{Context, Result};
use covida_core::models::{AnnotationData, Point};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::config::Config;
use crate::corpus;

const TRACK_NAME: &str = "main";

/// Paths written by [`export_video`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnvilExport {
    pub spec_path: PathBuf,
    pub annotation_path: PathBuf,
}

/// Export one video, looked up by UUID or by video source, into `out_dir`.
pub fn export_video(config: &Config, video: &str, out_dir: &Path) -> Result<AnvilExport> {
    let corpus = corpus::load_corpus(config)?;
    let store = corpus.store();
    let data = match Uuid::parse_str(video).ok().and_then(|uuid| store.get(uuid)) {
        Some(data) => data,
        None => store.by_source(video)?,
    };

    let name = export_name(data);
    let spec_file = format!("{}_spec.xml", name);
    let spec_path = out_dir.join(&spec_file);
    let annotation_path = out_dir.join(format!("{}.anvil", name));

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;
    std::fs::write(&spec_path, anvil_spec(data)?)
        .with_context(|| format!("Failed to write {}", spec_path.display()))?;
    std::fs::write(&annotation_path, anvil_annotation(data, &spec_file)?)
        .with_context(|| format!("Failed to write {}", annotation_path.display()))?;

    tracing::info!(
        video = %data.video_source,
        annotations = data.len(),
        file = %annotation_path.display(),
        "exported"
    );
    Ok(AnvilExport {
        spec_path,
        annotation_path,
    })
}

pub fn run_export(config: &Config, video: &str, out_dir: &Path) -> Result<()> {
    let export = export_video(config, video, out_dir)?;
    println!("{}", export.spec_path.display());
    println!("{}", export.annotation_path.display());
    Ok(())
}

/// File name stem for a video: the last path segment of its source, or the
/// data UUID when the source has none.
fn export_name(data: &AnnotationData) -> String {
    let source = data.video_source.trim_end_matches('/');
    let last = source
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or("");
    if last.is_empty() || last == "." || last == ".." {
        data.uuid.to_string()
    } else {
        last.to_string()
    }
}

/// Render the Anvil specification document.
pub fn anvil_spec(data: &AnnotationData) -> Result<String> {
    let mut w = Writer::new_with_indent(Vec::new(), b' ', 2);

    open(&mut w, BytesStart::new("annotation-spec"))?;
    open(&mut w, BytesStart::new("head"))?;
    open(&mut w, BytesStart::new("valuetype-def"))?;
    let mut valueset = BytesStart::new("valueset");
    valueset.push_attribute(("name", "phaseType"));
    open(&mut w, valueset)?;
    let mut value = BytesStart::new("value-el");
    value.push_attribute(("color", "#eeee00"));
    text_element(&mut w, value, "stroke")?;
    close(&mut w, "valueset")?;
    close(&mut w, "valuetype-def")?;
    close(&mut w, "head")?;

    open(&mut w, BytesStart::new("body"))?;
    let mut track = BytesStart::new("track-spec");
    track.push_attribute(("name", TRACK_NAME));
    track.push_attribute(("type", "primary"));
    track.push_attribute(("color-attr", "emphasis"));
    open(&mut w, track)?;
    let doc = data.title.as_deref().unwrap_or(&data.video_source);
    text_element(&mut w, BytesStart::new("doc"), doc)?;
    close(&mut w, "track-spec")?;
    close(&mut w, "body")?;
    close(&mut w, "annotation-spec")?;

    Ok(String::from_utf8(w.into_inner())?)
}

/// Render the Anvil annotation document referencing `spec_file`.
pub fn anvil_annotation(data: &AnnotationData, spec_file: &str) -> Result<String> {
    let mut w = Writer::new_with_indent(Vec::new(), b' ', 2);

    open(&mut w, BytesStart::new("annotation"))?;
    open(&mut w, BytesStart::new("head"))?;
    let mut specification = BytesStart::new("specification");
    specification.push_attribute(("src", spec_file));
    w.write_event(Event::Empty(specification))?;
    let mut video = BytesStart::new("video");
    video.push_attribute(("src", data.video_source.as_str()));
    w.write_event(Event::Empty(video))?;
    close(&mut w, "head")?;

    open(&mut w, BytesStart::new("body"))?;
    let mut track = BytesStart::new("track");
    track.push_attribute(("name", TRACK_NAME));
    track.push_attribute(("type", "primary"));
    open(&mut w, track)?;

    for (index, annotation) in data.annotations().iter().enumerate() {
        let index = index.to_string();
        let start = annotation.time_start.to_string();
        let end = annotation.time_end.to_string();
        let mut el = BytesStart::new("el");
        el.push_attribute(("index", index.as_str()));
        el.push_attribute(("start", start.as_str()));
        el.push_attribute(("end", end.as_str()));
        open(&mut w, el)?;

        text_element(
            &mut w,
            BytesStart::new("token"),
            annotation.description.as_deref().unwrap_or(""),
        )?;

        let points: Box<dyn Iterator<Item = &Point>> = if annotation.strokes.is_empty() {
            Box::new(annotation.shape.iter())
        } else {
            Box::new(annotation.strokes.iter().flatten())
        };
        for point in points {
            text_element(&mut w, BytesStart::new("point"), &point.to_string())?;
        }

        close(&mut w, "el")?;
    }

    close(&mut w, "track")?;
    close(&mut w, "body")?;
    close(&mut w, "annotation")?;

    Ok(String::from_utf8(w.into_inner())?)
}

fn open(w: &mut Writer<Vec<u8>>, start: BytesStart<'_>) -> Result<()> {
    w.write_event(Event::Start(start))?;
    Ok(())
}

fn close(w: &mut Writer<Vec<u8>>, name: &str) -> Result<()> {
    w.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn text_element(w: &mut Writer<Vec<u8>>, start: BytesStart<'_>, text: &str) -> Result<()> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    w.write_event(Event::Start(start))?;
    w.write_event(Event::Text(BytesText::new(text)))?;
    close(w, &name)
}
