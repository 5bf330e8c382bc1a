// # File IP Cache
//
// File-based implementation of IpCache.
//
// ## File Format
//
// A single line holding the last applied address, e.g. `203.0.113.5`.
// Surrounding whitespace is ignored on load.
//
// ## Durability
//
// - Atomic writes: the new value goes to `<path>.tmp`, then is renamed over `<path>`
// - Parent directories are created on first write
// - An unreadable file is reported as "nothing cached"

use async_trait::async_trait;
use std::io::ErrorKind;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::Error;
use crate::traits::IpCache;

/// File name used when no cache path is configured
const DEFAULT_CACHE_FILE: &str = ".current-ip";

/// Default cache location: `.current-ip` in the system temp directory
pub fn default_cache_path() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_CACHE_FILE)
}

/// Single-line text file cache
///
/// # Example
///
/// ```rust,no_run
/// use cfzone_core::cache::FileIpCache;
/// use cfzone_core::traits::IpCache;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let cache = FileIpCache::new("/var/tmp/.current-ip");
///
///     cache.store("203.0.113.5".parse()?).await?;
///     assert_eq!(cache.load().await?, Some("203.0.113.5".to_string()));
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileIpCache {
    path: PathBuf,
}

impl FileIpCache {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the cache file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get path to temporary file for atomic writes
    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone().into_os_string();
        temp.push(".tmp");
        PathBuf::from(temp)
    }

    async fn ensure_parent_dir(&self) -> Result<(), Error> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await.map_err(|e| {
                Error::cache(format!(
                    "Failed to create cache directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl IpCache for FileIpCache {
    async fn load(&self) -> Result<Option<String>, Error> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => {
                let cached = content.trim().to_string();
                tracing::debug!("Loaded cached IP '{}' from {}", cached, self.path.display());
                Ok(Some(cached))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("Cache file does not exist: {}", self.path.display());
                Ok(None)
            }
            Err(e) => {
                tracing::warn!(
                    "Cache file {} is not readable ({}), treating as empty",
                    self.path.display(),
                    e
                );
                Ok(None)
            }
        }
    }

    async fn store(&self, ip: IpAddr) -> Result<(), Error> {
        self.ensure_parent_dir().await?;

        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path).await.map_err(|e| {
                Error::cache(format!(
                    "Failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.write_all(ip.to_string().as_bytes()).await.map_err(|e| {
                Error::cache(format!(
                    "Failed to write to temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.flush().await.map_err(|e| {
                Error::cache(format!(
                    "Failed to flush temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        }

        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::cache(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        tracing::trace!("Cached IP {} in {}", ip, self.path.display());
        Ok(())
    }
}
