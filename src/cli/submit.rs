use crate::services::upload::{ServiceSubmitter, StagedFile, UploadQueue, UploadRules};
use crate::storage::LocalBlobStore;
use crate::{Config, Database};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Bulk-stages photos from disk and pushes them through the same
/// validate-store-record pipeline the upload endpoint uses. Everything
/// lands in the moderation queue.
pub async fn run(config_path: &Path, event_id: i64, files: Vec<PathBuf>) -> Result<()> {
    let config = Config::load(config_path)?;
    let db = Database::open(&config.database.path)?;
    db.migrate()?;

    let store = LocalBlobStore::new(
        PathBuf::from(&config.media.upload_dir),
        config.media.public_url_prefix.clone(),
    );
    let rules = UploadRules::from_config(&config.media);

    let mut queue = UploadQueue::new(event_id, rules.clone());

    let staged = files
        .iter()
        .map(|path| {
            let data = std::fs::read(path)?;
            let mime_type = mime_guess::from_path(path).first_or_octet_stream().to_string();
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown")
                .to_string();
            Ok(StagedFile {
                name,
                mime_type,
                data,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    queue.enqueue(staged);

    let mut submitter = ServiceSubmitter {
        db: &db,
        store: &store,
        rules,
    };
    let outcomes = queue.upload_all(&mut submitter).await;

    let mut submitted = 0;
    for outcome in &outcomes {
        match (&outcome.blob_url, &outcome.error) {
            (Some(url), _) => {
                submitted += 1;
                println!("  ok    {} -> {}", outcome.name, url);
            }
            (None, Some(error)) => println!("  fail  {} ({})", outcome.name, error),
            (None, None) => {}
        }
    }

    println!();
    println!(
        "{} of {} submitted for event {}; awaiting moderation",
        submitted,
        outcomes.len(),
        event_id
    );

    Ok(())
}
