//! Plan persistence
//!
//! Writes the compiled plan to `.weft/plan.json` for hand-off to an
//! external provisioning engine, keeping one backup of the previous plan.

use crate::error::Result;
use crate::plan::Plan;
use std::path::{Path, PathBuf};
use tokio::fs;

const PLAN_DIR: &str = ".weft";
const PLAN_FILE: &str = "plan.json";
const PLAN_BACKUP: &str = "plan.json.backup";

/// Reads and writes plan files under a project root
pub struct PlanWriter {
    project_root: PathBuf,
}

impl PlanWriter {
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            project_root: project_root.as_ref().to_path_buf(),
        }
    }

    fn plan_dir(&self) -> PathBuf {
        self.project_root.join(PLAN_DIR)
    }

    fn plan_path(&self) -> PathBuf {
        self.plan_dir().join(PLAN_FILE)
    }

    fn backup_path(&self) -> PathBuf {
        self.plan_dir().join(PLAN_BACKUP)
    }

    async fn ensure_plan_dir(&self) -> Result<()> {
        let dir = self.plan_dir();
        if !dir.exists() {
            fs::create_dir_all(&dir).await?;
            tracing::debug!("Created plan directory: {}", dir.display());
        }
        Ok(())
    }

    /// Save a plan, rotating any previous plan to the backup file
    pub async fn save(&self, plan: &Plan) -> Result<()> {
        self.ensure_plan_dir().await?;

        let path = self.plan_path();
        let backup = self.backup_path();

        if path.exists() {
            if backup.exists() {
                fs::remove_file(&backup).await?;
            }
            fs::rename(&path, &backup).await?;
            tracing::debug!("Rotated previous plan to backup");
        }

        let content = serde_json::to_string_pretty(plan)?;
        fs::write(&path, content).await?;

        tracing::debug!(summary = %plan.summary(), "Saved plan");
        Ok(())
    }

    /// Load the last saved plan, if any
    pub async fn load(&self) -> Result<Option<Plan>> {
        let path = self.plan_path();
        if !path.exists() {
            tracing::debug!("Plan file not found");
            return Ok(None);
        }

        let content = fs::read_to_string(&path).await?;
        let plan: Plan = serde_json::from_str(&content)?;
        Ok(Some(plan))
    }
}
