//! Input data availability checks.

use std::path::PathBuf;

use serde::Serialize;
use tracing::info;

use crate::catalog::{self, VariableSpec};
use crate::config::Settings;
use crate::context::ServiceContext;
use crate::error::CorrectionError;

/// Outcome of checking one variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    /// Variable that was checked.
    pub variable: String,
    /// `true` when every required file exists.
    pub ok: bool,
    /// Required files that do not exist, in catalogue order.
    pub missing: Vec<PathBuf>,
    /// Directories this call had to create, in creation order.
    pub created_dirs: Vec<PathBuf>,
}

/// Directories a run of `spec` needs: its data folder, the output root
/// and the models folder.
#[must_use]
pub fn required_dirs(settings: &Settings, spec: &VariableSpec) -> [PathBuf; 3] {
    [settings.data_dir.join(spec.data_folder), settings.output_dir.clone(), settings.models_dir()]
}

/// Full paths of the input files `spec` needs.
#[must_use]
pub fn required_files(settings: &Settings, spec: &VariableSpec) -> Vec<PathBuf> {
    let base = settings.data_dir.join(spec.data_folder);
    spec.required_files.iter().map(|file| base.join(file)).collect()
}

/// Checks that `variable`'s input files exist, creating any missing
/// working directories along the way.
///
/// Only existence is checked. Directory creation is idempotent: existing
/// directories are left alone and not reported.
///
/// # Errors
///
/// Returns [`CorrectionError::UnknownVariable`] (with no filesystem
/// mutation) for an unknown id, or [`CorrectionError::FileSystem`] if a
/// directory cannot be created.
pub fn check(
    ctx: &ServiceContext,
    settings: &Settings,
    variable: &str,
) -> Result<CheckResult, CorrectionError> {
    let spec = catalog::lookup(variable)?;

    let mut created_dirs = Vec::new();
    for dir in required_dirs(settings, spec) {
        if ctx.fs.exists(&dir) {
            continue;
        }
        ctx.fs
            .create_dir_all(&dir)
            .map_err(|e| CorrectionError::fs("create directory", &dir, &*e))?;
        info!(variable, dir = %dir.display(), "created directory");
        created_dirs.push(dir);
    }

    let missing: Vec<PathBuf> =
        required_files(settings, spec).into_iter().filter(|path| !ctx.fs.exists(path)).collect();

    Ok(CheckResult { variable: spec.id.to_string(), ok: missing.is_empty(), missing, created_dirs })
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::context::fakes::{context, MemFs, ScriptedLauncher};

    fn settings() -> Settings {
        Settings {
            data_dir: PathBuf::from("/work/data"),
            output_dir: PathBuf::from("/work/output"),
            ..Settings::default()
        }
    }

    #[test]
    fn reports_exactly_the_missing_subset() {
        for spec in catalog::VARIABLES {
            let all = required_files(&settings(), spec);
            // Keep every other file.
            let mut fs = MemFs::default();
            for path in all.iter().step_by(2) {
                fs = fs.with_file(path.clone(), "");
            }
            let ctx = context(&fs, &ScriptedLauncher::exiting(&fs, 0));

            let result = check(&ctx, &settings(), spec.id).unwrap();

            let expected: Vec<PathBuf> = all.iter().skip(1).step_by(2).cloned().collect();
            assert_eq!(result.missing, expected, "variable {}", spec.id);
            assert_eq!(result.ok, expected.is_empty());
        }
    }

    #[test]
    fn all_files_present_is_ok() {
        let mut fs = MemFs::default();
        for path in required_files(&settings(), &catalog::S200MAVG) {
            fs = fs.with_file(path, "");
        }
        let ctx = context(&fs, &ScriptedLauncher::exiting(&fs, 0));

        let result = check(&ctx, &settings(), "s200mavg").unwrap();
        assert!(result.ok);
        assert!(result.missing.is_empty());
    }

    #[test]
    fn s200mavg_reads_from_the_so_folder() {
        let files = required_files(&settings(), &catalog::S200MAVG);
        assert!(files.iter().all(|p| p.starts_with("/work/data/so")));
    }

    #[test]
    fn creates_missing_dirs_once() {
        let fs = MemFs::default().with_dir("/work/output");
        let ctx = context(&fs, &ScriptedLauncher::exiting(&fs, 0));

        let first = check(&ctx, &settings(), "sss").unwrap();
        assert_eq!(
            first.created_dirs,
            vec![PathBuf::from("/work/data/sss"), PathBuf::from("/work/output/models")]
        );

        let second = check(&ctx, &settings(), "sss").unwrap();
        assert!(second.created_dirs.is_empty());
        assert!(ctx.fs.exists(Path::new("/work/data/sss")));
        assert!(ctx.fs.exists(Path::new("/work/output/models")));
    }

    #[test]
    fn directory_failure_is_reported_without_creating_anything() {
        let fs = MemFs::default().failing_mkdirs();
        let ctx = context(&fs, &ScriptedLauncher::exiting(&fs, 0));
        let before = fs.snapshot();

        let result = check(&ctx, &settings(), "sss");

        assert!(matches!(
            result,
            Err(CorrectionError::FileSystem { action: "create directory", ref path, .. })
                if path == Path::new("/work/data/sss")
        ));
        assert_eq!(fs.snapshot(), before);
    }

    #[test]
    fn unknown_variable_touches_nothing() {
        let fs = MemFs::default();
        let ctx = context(&fs, &ScriptedLauncher::exiting(&fs, 0));
        let before = fs.snapshot();

        let result = check(&ctx, &settings(), "sst");

        assert!(matches!(result, Err(CorrectionError::UnknownVariable(id)) if id == "sst"));
        assert_eq!(fs.snapshot(), before);
    }
}
