//! Bundle identifier discovery from Xcode projects

use crate::error::{Error, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;
use walkdir::WalkDir;

const PROJECT_FILE_NAME: &str = "project.pbxproj";

/// CocoaPods' generated project, never the app's own
const PODS_DIR_NAME: &str = "Pods";

fn bundle_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"PRODUCT_BUNDLE_IDENTIFIER\s*=\s*([^;]+);")
            .expect("hardcoded bundle id pattern is valid")
    })
}

/// Find the `project.pbxproj` of the iOS app under a project directory
///
/// Looks in `<path>/ios`, then `<path>/../ios` for nested Flutter layouts.
/// `Pods/` is not searched. Matches are sorted so the result does not depend
/// on directory order.
pub fn find_project_file(project_path: &Path) -> Option<PathBuf> {
    let mut ios_dir = project_path.join("ios");
    if !ios_dir.is_dir() {
        // A relative path like "." has no usable parent until resolved.
        let resolved = fs::canonicalize(project_path)
            .or_else(|_| std::path::absolute(project_path))
            .ok()?;
        ios_dir = resolved.parent()?.join("ios");
    }

    let mut candidates: Vec<PathBuf> = WalkDir::new(&ios_dir)
        .into_iter()
        .filter_entry(|e| !(e.file_type().is_dir() && e.file_name() == PODS_DIR_NAME))
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file() && e.file_name() == PROJECT_FILE_NAME)
        .map(walkdir::DirEntry::into_path)
        .collect();
    candidates.sort();

    debug!("Found {} project file(s) under {}", candidates.len(), ios_dir.display());
    candidates.into_iter().next()
}

/// Extract the app's bundle identifier from project file contents
///
/// Build-setting references such as `$(PRODUCT_BUNDLE_IDENTIFIER)` or
/// `${BASE_ID}` are skipped. Test-target identifiers (ending in `Tests`) are used only when
/// nothing else is present.
pub fn extract_bundle_id(contents: &str) -> Option<String> {
    let literals: Vec<String> = bundle_id_regex()
        .captures_iter(contents)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim().trim_matches('"').to_string())
        .filter(|id| !id.is_empty() && !is_build_setting_reference(id))
        .collect();

    literals
        .iter()
        .find(|id| !id.ends_with("Tests"))
        .or_else(|| literals.first())
        .cloned()
}

fn is_build_setting_reference(value: &str) -> bool {
    value.contains("$(") || value.contains("${")
}

/// Discover the bundle identifier for the project at `project_path`
pub fn discover_bundle_id(project_path: &Path) -> Result<String> {
    let project_file = find_project_file(project_path)
        .ok_or_else(|| Error::ProjectNotFound(project_path.to_path_buf()))?;

    let contents = fs::read_to_string(&project_file)?;
    extract_bundle_id(&contents).ok_or(Error::BundleIdNotFound(project_file))
}
