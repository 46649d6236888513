//! Locating source files, the component TOC and stale outputs.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};
use walkdir::WalkDir;

use crate::error::{EngineError, Result};

/// Source file extension, without the dot.
pub const SOURCE_EXTENSION: &str = "tsc";

/// `<Component>_component_test.rst`
pub fn toc_file_name(component: &str) -> String {
    format!("{component}_component_test.rst")
}

/// Every `<Component>_*.tsc` file below `test_path`, sorted by path.
#[instrument(skip(test_path), fields(test_path = %test_path.display()))]
pub fn discover_sources(test_path: &Path, component: &str) -> Result<Vec<PathBuf>> {
    let prefix = format!("{component}_");
    let mut sources: Vec<PathBuf> = walk_files(test_path)?
        .into_iter()
        .filter(|path| {
            let is_source = path.extension().and_then(|e| e.to_str()) == Some(SOURCE_EXTENSION);
            is_source && file_name(path).is_some_and(|name| name.starts_with(&prefix))
        })
        .collect();
    sources.sort();

    debug!(count = sources.len(), "discovered sources");
    Ok(sources)
}

/// Find the component TOC below `spec_path`.
///
/// A file directly in `spec_path` wins; otherwise the shallowest match.
/// Two or more matches at that depth are [`EngineError::TocAmbiguous`].
#[instrument(skip(spec_path), fields(spec_path = %spec_path.display()))]
pub fn locate_toc(spec_path: &Path, component: &str) -> Result<PathBuf> {
    let name = toc_file_name(component);

    let mut matches: Vec<(usize, PathBuf)> = walk_files(spec_path)?
        .into_iter()
        .filter(|path| file_name(path) == Some(name.as_str()))
        .filter_map(|path| {
            let depth = tscdoc_common_fs::path::depth_below(&path, spec_path)?;
            Some((depth, path))
        })
        .collect();
    matches.sort();

    let Some(shallowest) = matches.first().map(|(depth, _)| *depth) else {
        return Err(EngineError::TocNotFound {
            name,
            spec_path: spec_path.to_path_buf(),
        });
    };
    let mut candidates: Vec<PathBuf> = matches
        .into_iter()
        .filter(|(depth, _)| *depth == shallowest)
        .map(|(_, path)| path)
        .collect();

    if candidates.len() > 1 {
        return Err(EngineError::TocAmbiguous { name, candidates });
    }
    let toc = candidates.remove(0);
    debug!(toc = %toc.display(), depth = shallowest, "located toc");
    Ok(toc)
}

/// Earlier generated documents in `dir` that are not in `keep`.
pub fn stale_generated_files(
    dir: &Path,
    component: &str,
    keep: &[PathBuf],
) -> Result<Vec<PathBuf>> {
    let prefix = format!("{component}_oAW_");
    let stale = tscdoc_common_fs::list_files(dir)?
        .into_iter()
        .filter(|path| {
            path.extension().and_then(|e| e.to_str()) == Some("rst")
                && file_name(path).is_some_and(|name| name.starts_with(&prefix))
                && !keep.contains(path)
        })
        .collect();
    Ok(stale)
}

/// Regular files below `root`, symlinks resolved.
fn walk_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| EngineError::Discovery {
            path: e.path().unwrap_or(root).to_path_buf(),
            message: e.to_string(),
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn touch(root: &Path, rel: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "").unwrap();
        path
    }

    #[test]
    fn test_discover_sources_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let b = touch(root, "sub/Crypto_Sign_B.tsc");
        let a = touch(root, "Crypto_Generate_A.tsc");
        touch(root, "Hash_Generate_A.tsc");
        touch(root, "Crypto_Generate_A.txt");
        touch(root, "CryptoX_Generate_A.tsc");

        assert_eq!(discover_sources(root, "Crypto").unwrap(), vec![a, b]);
    }

    #[cfg(unix)]
    #[test]
    fn test_discover_sources_follows_symlinks() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let target = touch(root, "shared/Other_Sign_Ed25519.tsc");
        let link = root.join("Crypto_Sign_Ed25519.tsc");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let linked_dir = root.join("linked");
        std::os::unix::fs::symlink(root.join("shared"), &linked_dir).unwrap();
        touch(root, "shared/Crypto_Generate_A.tsc");

        assert_eq!(
            discover_sources(root, "Crypto").unwrap(),
            vec![
                link,
                linked_dir.join("Crypto_Generate_A.tsc"),
                root.join("shared/Crypto_Generate_A.tsc"),
            ]
        );
    }

    #[test]
    fn test_discover_sources_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_sources(dir.path(), "Crypto").unwrap().is_empty());
    }

    #[test]
    fn test_locate_toc_prefers_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, "a/Crypto_component_test.rst");
        let top = touch(root, "Crypto_component_test.rst");
        assert_eq!(locate_toc(root, "Crypto").unwrap(), top);
    }

    #[test]
    fn test_locate_toc_shallowest() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, "a/b/Crypto_component_test.rst");
        let shallow = touch(root, "c/Crypto_component_test.rst");
        assert_eq!(locate_toc(root, "Crypto").unwrap(), shallow);
    }

    #[test]
    fn test_locate_toc_ambiguous() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let a = touch(root, "a/Crypto_component_test.rst");
        let b = touch(root, "b/Crypto_component_test.rst");
        match locate_toc(root, "Crypto") {
            Err(EngineError::TocAmbiguous { candidates, .. }) => assert_eq!(candidates, vec![a, b]),
            other => panic!("expected TocAmbiguous, got {other:?}"),
        }
    }

    #[test]
    fn test_locate_toc_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            locate_toc(dir.path(), "Crypto"),
            Err(EngineError::TocNotFound { .. })
        ));
    }

    #[test]
    fn test_stale_generated_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let keep = touch(root, "Crypto_oAW_Generator_Tests.rst");
        let stale = touch(root, "Crypto_oAW_Old_Tests.rst");
        touch(root, "Crypto_component_test.rst");
        touch(root, "Hash_oAW_Generator_Tests.rst");
        touch(root, "nested/Crypto_oAW_Deep_Tests.rst");

        assert_eq!(
            stale_generated_files(root, "Crypto", &[keep]).unwrap(),
            vec![stale]
        );
    }
}
