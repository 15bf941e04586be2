//! Build metadata attached to a deployment event.
//!
//! Values come from the CI environment (`GIT_*`, `SVN_*`, `JOB_NAME`, ...).
//! Every field is optional; absent variables are simply omitted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Descriptive properties sent along with a deployment event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentProperties {
    /// Branch being built (`GIT_BRANCH`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_branch_name: Option<String>,
    /// Commit or revision being built.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_revision_number: Option<String>,
    /// Repository clone URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_url: Option<String>,
    /// Last path segment of the URL, without `.git`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_name: Option<String>,
    /// Previously built commit (`GIT_PREVIOUS_COMMIT`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_previous_revision_number: Option<String>,
    /// Build job id (`JOB_NAME`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_plan_id: Option<String>,
    /// Build job name (`JOB_NAME`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_plan_name: Option<String>,
    /// Build number (`BUILD_NUMBER`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_plan_number: Option<String>,
    /// Link to the build result page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_plan_result_url: Option<String>,
}

impl DeploymentProperties {
    /// Extracts properties from a snapshot of environment variables.
    pub fn from_vars(vars: &BTreeMap<String, String>) -> Self {
        let repository_url = first_present(vars, &["GIT_URL", "SVN_URL"]);
        let repository_name = repository_url.as_deref().and_then(repository_name);

        Self {
            repository_branch_name: first_present(vars, &["GIT_BRANCH"]),
            repository_revision_number: first_present(vars, &["GIT_COMMIT", "SVN_REVISION"]),
            repository_url,
            repository_name,
            repository_previous_revision_number: first_present(vars, &["GIT_PREVIOUS_COMMIT"]),
            build_plan_id: first_present(vars, &["JOB_NAME"]),
            build_plan_name: first_present(vars, &["JOB_NAME"]),
            build_plan_number: first_present(vars, &["BUILD_NUMBER"]),
            build_plan_result_url: first_present(vars, &["RUN_DISPLAY_URL"]),
        }
    }

    /// Extracts properties from the current process environment.
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped.
    pub fn from_process_env() -> Self {
        let vars: BTreeMap<String, String> = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Self::from_vars(&vars)
    }
}

/// First variable in `keys` that is set, even if set to an empty string.
fn first_present(vars: &BTreeMap<String, String>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| vars.get(*k).cloned())
}

/// `https://host/org/widget.git` -> `widget`
fn repository_name(url: &str) -> Option<String> {
    let last = url.split('/').rfind(|seg| !seg.is_empty())?;
    let name = last.strip_suffix(".git").unwrap_or(last);
    Some(name.to_string())
}
