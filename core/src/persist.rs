use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::model::{SparseVector, VectorSpaceModel};

pub const CACHE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_resources: u32,
    pub created_at: String,
    pub version: u32,
}

/// Filesystem layout of the cached model artifacts.
pub struct CachePaths {
    pub root: PathBuf,
}

impl CachePaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    fn vectorizer(&self) -> PathBuf {
        self.root.join("vectorizer.bin")
    }
    fn vectors(&self) -> PathBuf {
        self.root.join("vectors.bin")
    }
    fn meta(&self) -> PathBuf {
        self.root.join("meta.json")
    }
}

/// Persist the fitted model and catalog vectors for reuse at the next start.
pub fn save_model(
    paths: &CachePaths,
    model: &VectorSpaceModel,
    vectors: &[SparseVector],
) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.vectorizer())?;
    f.write_all(&bincode::serialize(model)?)?;
    let mut f = File::create(paths.vectors())?;
    f.write_all(&bincode::serialize(vectors)?)?;
    let meta = MetaFile {
        num_resources: vectors.len() as u32,
        created_at: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| String::new()),
        version: CACHE_VERSION,
    };
    let mut f = File::create(paths.meta())?;
    f.write_all(serde_json::to_string_pretty(&meta)?.as_bytes())?;
    Ok(())
}

/// Attempt to restore a previously persisted model. The cache is advisory:
/// a missing, truncated, or undecodable artifact yields `None` and the
/// caller rebuilds from the catalog. Never an error.
pub fn try_load_model(paths: &CachePaths) -> Option<(VectorSpaceModel, Vec<SparseVector>)> {
    match load_model(paths) {
        Ok(loaded) => Some(loaded),
        Err(e) => {
            tracing::warn!(
                root = %paths.root.display(),
                error = %e,
                "model cache unusable, rebuilding from catalog"
            );
            None
        }
    }
}

fn load_model(paths: &CachePaths) -> Result<(VectorSpaceModel, Vec<SparseVector>)> {
    let meta = load_meta(paths)?;
    if meta.version != CACHE_VERSION {
        anyhow::bail!(
            "cache version {} does not match expected {CACHE_VERSION}",
            meta.version
        );
    }

    let mut buf = Vec::new();
    File::open(paths.vectorizer())?.read_to_end(&mut buf)?;
    let model: VectorSpaceModel = bincode::deserialize(&buf)?;

    buf.clear();
    File::open(paths.vectors())?.read_to_end(&mut buf)?;
    let vectors: Vec<SparseVector> = bincode::deserialize(&buf)?;
    Ok((model, vectors))
}

pub fn load_meta(paths: &CachePaths) -> Result<MetaFile> {
    let mut buf = String::new();
    File::open(paths.meta())?.read_to_string(&mut buf)?;
    Ok(serde_json::from_str(&buf)?)
}
