//! Clean the public directory

use anyhow::Result;
use std::fs;

use crate::PostView;

/// Delete the generated pages
pub fn run(app: &PostView) -> Result<()> {
    if app.public_dir.exists() {
        fs::remove_dir_all(&app.public_dir)?;
        tracing::info!("Deleted: {:?}", app.public_dir);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::testing::ScriptedSink;
    use std::sync::Arc;

    #[test]
    fn test_clean_removes_public_dir() {
        let dir = tempfile::tempdir().unwrap();
        let app = crate::testing::app(dir.path(), Arc::new(ScriptedSink::succeeding()));
        fs::create_dir_all(app.public_dir.join("post")).unwrap();

        run(&app).unwrap();
        assert!(!app.public_dir.exists());

        // Nothing to delete is fine
        run(&app).unwrap();
    }
}
