//! Port traits abstracting all I/O away from the pipeline.

use camino::{Utf8Path, Utf8PathBuf};
use trmcheck_matrix::LoadedMatrix;
use trmcheck_types::inventory::Inventory;

/// An inventory together with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedInventory {
    pub path: Utf8PathBuf,
    pub sha256: Option<String>,
    pub inventory: Inventory,
}

/// Source of the tracked-tool inventory.
pub trait InventorySource {
    fn load_inventory(&self) -> anyhow::Result<LoadedInventory>;
}

/// Source of decision-matrix snapshots.
pub trait MatrixSource {
    fn load_matrices(&self) -> anyhow::Result<Vec<LoadedMatrix>>;
}

/// File-system write operations.
pub trait WritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()>;
    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()>;
}
