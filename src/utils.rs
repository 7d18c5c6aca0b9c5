use log::info;
use std::io;
use std::path::{Path, PathBuf};

const STORE_DIR_NAME: &str = "climate_scrape";

/// Default folder for the on-disk weather store, inside the user's data directory.
pub fn get_store_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join(STORE_DIR_NAME))
}

pub async fn ensure_dir_exists(path: &Path) -> io::Result<()> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(io::Error::other(format!(
                    "Store path exists but is not a directory: {}",
                    path.display()
                )));
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Creating store directory: {}", path.display());
            tokio::fs::create_dir_all(path).await
        }
        Err(e) => Err(e),
    }
}
