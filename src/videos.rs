use anyhow::Result;

use crate::config::Config;
use crate::corpus;

pub fn list_videos(config: &Config) -> Result<()> {
    let corpus = corpus::load_corpus(config)?;
    let store = corpus.store();

    if store.is_empty() {
        println!("No videos.");
    } else {
        println!(
            "{:<32} {:<24} {:>11}  UUID",
            "VIDEO", "TITLE", "ANNOTATIONS"
        );
        for data in store.iter() {
            println!(
                "{:<32} {:<24} {:>11}  {}",
                data.video_source,
                data.title.as_deref().unwrap_or("-"),
                data.len(),
                data.uuid
            );
        }
    }

    for path in corpus.skipped() {
        println!("skipped: {}", path.display());
    }

    Ok(())
}
