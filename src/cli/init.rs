use crate::config::{
    AuthConfig, CatalogConfig, Config, DatabaseConfig, MediaConfig, ServerConfig, SiteConfig,
};
use crate::Database;
use anyhow::Result;
use std::path::PathBuf;

pub async fn run(path: PathBuf, name: Option<String>) -> Result<()> {
    std::fs::create_dir_all(&path)?;

    let config_path = path.join("backline.toml");
    if config_path.exists() {
        anyhow::bail!("{} already exists", config_path.display());
    }

    let title = name.unwrap_or_else(|| "My Band".to_string());

    let config = Config {
        site: SiteConfig {
            title: title.clone(),
            description: String::new(),
            url: "http://localhost:3000".to_string(),
        },
        server: ServerConfig::default(),
        database: DatabaseConfig {
            path: "data/backline.db".to_string(),
        },
        media: MediaConfig {
            upload_dir: "media".to_string(),
            public_url_prefix: "/media".to_string(),
            max_upload_mb: 15,
            allowed_types: ["image/jpeg", "image/png", "image/webp", "image/gif"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        },
        catalog: CatalogConfig::default(),
        auth: AuthConfig::default(),
    };

    std::fs::write(&config_path, toml::to_string_pretty(&config)?)?;

    let db_path = path.join(&config.database.path);
    let db = Database::open(&db_path.to_string_lossy())?;
    db.migrate()?;

    println!("Initialized '{}' in {}", title, path.display());
    println!();
    println!("Next steps:");
    println!("  backline user add --email you@example.com --role admin");
    println!("  backline serve");
    println!();
    println!("Set CATALOG_CLIENT_ID / CATALOG_CLIENT_SECRET and catalog.artist_id");
    println!("in backline.toml to enable album, track and radio endpoints.");

    Ok(())
}
