//! `covida search`: look up annotations from recognized handwriting.
//!
//! Loads the corpus, runs the core engine over every video, and prints the
//! matches grouped by video, either as a text listing or as JSON.

use anyhow::{bail, Result};
use covida_core::search::{SearchResult, VideoMatches};

use crate::config::Config;
use crate::corpus;

/// Load the configured corpus and search it.
pub fn search_corpus(config: &Config, candidates: &[String]) -> Result<SearchResult> {
    let corpus = corpus::load_corpus(config)?;
    let store = corpus.store();
    tracing::info!(
        videos = store.len(),
        candidates = candidates.len(),
        "searching annotations"
    );
    Ok(store.search(candidates))
}

pub fn run_search(config: &Config, candidates: &[String], format: Option<&str>) -> Result<()> {
    let format = format.unwrap_or(config.output.format.as_str());
    match format {
        "text" | "json" => {}
        _ => bail!("Unknown output format: {}. Use text or json.", format),
    }

    let result = search_corpus(config, candidates)?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if result.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for (i, video) in result.videos().iter().enumerate() {
        if i > 0 {
            println!();
        }
        print_video(video);
    }
    println!();
    println!(
        "{} annotation(s) in {} video(s)",
        result.total_matches(),
        result.len()
    );

    Ok(())
}

fn print_video(video: &VideoMatches) {
    match &video.title {
        Some(title) => println!("{} ({})", video.video_source, title),
        None => println!("{}", video.video_source),
    }
    for m in &video.matches {
        let a = &m.annotation;
        println!(
            "  [{} - {}] {:<16} {:?} ~ {:?}  {}",
            format_media_time(a.time_start),
            format_media_time(a.time_end),
            m.strategy.as_str(),
            m.token,
            m.candidate,
            a.uuid
        );
        if let Some(description) = &a.description {
            println!("      {}", description);
        }
    }
}

/// Render media milliseconds as `mm:ss.mmm`, or `h:mm:ss.mmm` past an hour.
pub fn format_media_time(ms: i64) -> String {
    let sign = if ms < 0 { "-" } else { "" };
    let ms = ms.unsigned_abs();
    let millis = ms % 1000;
    let secs = (ms / 1000) % 60;
    let mins = (ms / 60_000) % 60;
    let hours = ms / 3_600_000;
    if hours > 0 {
        format!("{}{}:{:02}:{:02}.{:03}", sign, hours, mins, secs, millis)
    } else {
        format!("{}{:02}:{:02}.{:03}", sign, mins, secs, millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_media_time() {
        assert_eq!(format_media_time(0), "00:00.000");
        assert_eq!(format_media_time(61_250), "01:01.250");
        assert_eq!(format_media_time(3_723_004), "1:02:03.004");
        assert_eq!(format_media_time(-1500), "-00:01.500");
    }
}
