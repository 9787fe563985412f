use crate::catalog::CatalogClient;
use crate::services::upload::UploadRules;
use crate::storage::BlobStore;
use crate::{Config, Database};
use std::path::PathBuf;
use std::sync::Arc;

pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub blobs: Arc<dyn BlobStore>,
    pub catalog: CatalogClient,
    pub upload_rules: UploadRules,
    pub media_root: PathBuf,
}

impl AppState {
    pub fn new(config: Config, db: Database, blobs: Arc<dyn BlobStore>, catalog: CatalogClient) -> Self {
        let upload_rules = UploadRules::from_config(&config.media);
        let media_root = PathBuf::from(&config.media.upload_dir);

        Self {
            config,
            db,
            blobs,
            catalog,
            upload_rules,
            media_root,
        }
    }
}
