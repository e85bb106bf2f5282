//! Default filesystem-backed and in-memory port implementations.

use crate::ports::{InventorySource, LoadedInventory, MatrixSource, WritePort};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use tracing::debug;
use trmcheck_hash::sha256_hex;
use trmcheck_matrix::LoadedMatrix;
use trmcheck_types::inventory::Inventory;

/// Reads the inventory YAML from disk.
#[derive(Debug, Clone)]
pub struct FsInventorySource {
    pub path: Utf8PathBuf,
}

impl FsInventorySource {
    pub fn new(path: Utf8PathBuf) -> Self {
        Self { path }
    }
}

impl InventorySource for FsInventorySource {
    fn load_inventory(&self) -> anyhow::Result<LoadedInventory> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("read inventory {}", self.path))?;
        let inventory: Inventory = serde_yaml::from_str(&contents)
            .with_context(|| format!("parse inventory {}", self.path))?;

        debug!(path = %self.path, entries = inventory.trm_entries.len(), "loaded inventory");

        Ok(LoadedInventory {
            path: self.path.clone(),
            sha256: Some(sha256_hex(contents.as_bytes())),
            inventory,
        })
    }
}

/// In-memory inventory for embedding and testing.
#[derive(Debug, Clone)]
pub struct InMemoryInventorySource {
    inventory: Inventory,
}

impl InMemoryInventorySource {
    pub fn new(inventory: Inventory) -> Self {
        Self { inventory }
    }
}

impl InventorySource for InMemoryInventorySource {
    fn load_inventory(&self) -> anyhow::Result<LoadedInventory> {
        Ok(LoadedInventory {
            path: Utf8PathBuf::from("<memory>"),
            sha256: None,
            inventory: self.inventory.clone(),
        })
    }
}

/// Loads snapshots via `trmcheck_matrix::load_matrices`.
#[derive(Debug, Clone)]
pub struct FsMatrixSource {
    pub matrices_dir: Utf8PathBuf,
}

impl FsMatrixSource {
    pub fn new(matrices_dir: Utf8PathBuf) -> Self {
        Self { matrices_dir }
    }
}

impl MatrixSource for FsMatrixSource {
    fn load_matrices(&self) -> anyhow::Result<Vec<LoadedMatrix>> {
        trmcheck_matrix::load_matrices(&self.matrices_dir)
            .with_context(|| format!("load matrices from {}", self.matrices_dir))
    }
}

/// In-memory snapshot source, sorted by path on construction to match [`FsMatrixSource`].
#[derive(Debug, Clone)]
pub struct InMemoryMatrixSource {
    matrices: Vec<LoadedMatrix>,
}

impl InMemoryMatrixSource {
    pub fn new(mut matrices: Vec<LoadedMatrix>) -> Self {
        matrices.sort_by(|a, b| a.path.cmp(&b.path));
        Self { matrices }
    }
}

impl MatrixSource for InMemoryMatrixSource {
    fn load_matrices(&self) -> anyhow::Result<Vec<LoadedMatrix>> {
        Ok(self.matrices.clone())
    }
}

/// Filesystem write operations.
#[derive(Debug, Clone, Default)]
pub struct FsWritePort;

impl WritePort for FsWritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create parent dir for {}", path))?;
        }
        fs::write(path, contents).with_context(|| format!("write {}", path))
    }

    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()> {
        fs::create_dir_all(path).with_context(|| format!("create_dir_all {}", path))
    }
}
