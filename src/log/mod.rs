use fs_err as fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Where one generation's intermediate artifacts are written.
#[derive(Debug, Clone)]
pub struct TxLog {
    dir: PathBuf,
}

fn tx_dir(root: &Path, tx: Uuid) -> PathBuf {
    root.join("tx").join(tx.to_string())
}

impl TxLog {
    pub fn new(root: &Path, tx: Uuid) -> Self {
        Self { dir: tx_dir(root, tx) }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `<stage>` under the transaction directory and return its path.
    pub fn save_stage(&self, stage: &str, contents: &str) -> anyhow::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let p = self.dir.join(stage);
        fs::write(&p, contents)?;
        Ok(p)
    }
}
