use crate::error::{Result, SplitterError};
use std::path::{Component, Path, PathBuf};

/// Supplies the full text to split
pub trait CodeSource {
    /// Fetch the whole code body into memory
    fn fetch(&self) -> Result<String>;
}

/// Code carried inline in the request
#[derive(Debug, Clone)]
pub struct InlineSource<'a> {
    code: &'a str,
}

impl<'a> InlineSource<'a> {
    pub const fn new(code: &'a str) -> Self {
        Self { code }
    }
}

impl CodeSource for InlineSource<'_> {
    fn fetch(&self) -> Result<String> {
        Ok(self.code.to_string())
    }
}

/// Directory standing in for a bucket of uploaded sources
#[derive(Debug, Clone)]
pub struct ObjectStore {
    root: PathBuf,
}

impl ObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Source for one object; the key is validated before any IO happens
    pub fn source(&self, key: &str) -> Result<ObjectSource> {
        let relative = sanitize_key(key)?;
        Ok(ObjectSource {
            key: key.to_string(),
            path: self.root.join(relative),
        })
    }
}

/// One object inside an [`ObjectStore`]
#[derive(Debug, Clone)]
pub struct ObjectSource {
    key: String,
    path: PathBuf,
}

impl ObjectSource {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CodeSource for ObjectSource {
    fn fetch(&self) -> Result<String> {
        log::debug!("Fetching code from object store: {}", self.key);
        std::fs::read_to_string(&self.path).map_err(|e| SplitterError::retrieval(&self.key, e))
    }
}

/// Reject keys that would escape the store root
fn sanitize_key(key: &str) -> Result<PathBuf> {
    if key.trim().is_empty() {
        return Err(SplitterError::invalid_input("sourceKey is empty"));
    }

    let mut relative = PathBuf::new();
    for component in Path::new(key).components() {
        match component {
            Component::Prefix(_) | Component::RootDir => {
                return Err(SplitterError::invalid_input(format!(
                    "absolute sourceKey not allowed: {key}"
                )));
            }
            Component::ParentDir => {
                return Err(SplitterError::invalid_input(format!(
                    "parent directory traversal not allowed: {key}"
                )));
            }
            Component::CurDir => continue,
            Component::Normal(part) => relative.push(part),
        }
    }

    if relative.as_os_str().is_empty() {
        return Err(SplitterError::invalid_input(format!(
            "sourceKey has no usable components: {key}"
        )));
    }

    Ok(relative)
}
