use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;

use crate::session::Session;
use crate::store::KvStore;

/// File name of one exported chart, e.g. `habit-2024-03-sleep.svg`.
pub fn chart_file_name(year: i32, month: u32, slug: &str) -> String {
    format!("habit-{year}-{month:02}-{slug}.svg")
}

/// Writes every rendered chart of the session into `dir`.
pub fn write_charts<S: KvStore>(session: &Session<S>, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("could not create export directory {}", dir.display()))?;

    let month = session.month();
    let mut written = Vec::with_capacity(session.charts().len());
    for panel in session.charts() {
        let path = dir.join(chart_file_name(month.year, month.month, panel.target.slug()));
        fs::write(&path, panel.scene.to_svg())
            .with_context(|| format!("could not write {}", path.display()))?;
        written.push(path);
    }

    info!(
        "event=chart_export module=export status=ok month={} files={} dir={}",
        month,
        written.len(),
        dir.display()
    );
    Ok(written)
}
