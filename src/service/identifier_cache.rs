use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Remembers the last PromptPay identifier so it need not be typed again.
pub trait IdentifierCache {
    fn load(&self) -> io::Result<Option<String>>;
    fn store(&mut self, identifier: &str) -> io::Result<()>;
}

/// One identifier per file, as a single line.
#[derive(Debug, Clone)]
pub struct FileIdentifierCache {
    path: PathBuf,
}

impl FileIdentifierCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileIdentifierCache { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IdentifierCache for FileIdentifierCache {
    fn load(&self) -> io::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let identifier = contents.trim();
                Ok((!identifier.is_empty()).then(|| identifier.to_string()))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn store(&mut self, identifier: &str) -> io::Result<()> {
        fs::write(&self.path, format!("{}\n", identifier.trim()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryIdentifierCache {
    identifier: Option<String>,
}

impl IdentifierCache for MemoryIdentifierCache {
    fn load(&self) -> io::Result<Option<String>> {
        Ok(self.identifier.clone())
    }

    fn store(&mut self, identifier: &str) -> io::Result<()> {
        self.identifier = Some(identifier.trim().to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_cache_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = FileIdentifierCache::new(dir.path().join("promptpay_id"));

        assert_eq!(cache.load().unwrap(), None);
        cache.store("  081-234-5678 ").unwrap();
        assert_eq!(cache.load().unwrap().as_deref(), Some("081-234-5678"));
        cache.store("1234567890123").unwrap();
        assert_eq!(cache.load().unwrap().as_deref(), Some("1234567890123"));
    }

    #[test]
    fn test_blank_file_is_empty_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("promptpay_id");
        fs::write(&path, "\n  \n").unwrap();
        assert_eq!(FileIdentifierCache::new(path).load().unwrap(), None);
    }

    #[test]
    fn test_memory_cache() {
        let mut cache = MemoryIdentifierCache::default();
        assert_eq!(cache.load().unwrap(), None);
        cache.store("0812345678").unwrap();
        assert_eq!(cache.load().unwrap().as_deref(), Some("0812345678"));
    }
}
