//! `rstest` fixtures for sandbox inputs.
//!
//! Request them by name in an `#[rstest]` test after
//! `use sandbox_test_utils::fixtures::*;`.

use rstest::fixture;
use sandbox_fs::{FixtureConfig, LocatedResource, Resource, ResourceLocator, project_root};
use sandbox_git::naming::{self, RemoteRole};

/// Configuration discovered for the project under test.
///
/// # Panics
/// Panics if `tests/git-sandbox.toml` exists but cannot be parsed.
#[fixture]
pub fn fixture_config() -> FixtureConfig {
    FixtureConfig::discover(&project_root())
        .unwrap_or_else(|e| panic!("fixture_config: failed to load configuration: {e}"))
}

fn locate(config: &FixtureConfig, resource: Resource) -> LocatedResource {
    ResourceLocator::from_config(config, &project_root())
        .locate(resource)
        .unwrap_or_else(|e| panic!("failed to locate {resource}: {e}"))
}

/// The templated Git configuration, override or bundled.
#[fixture]
pub fn gitconfig(fixture_config: FixtureConfig) -> LocatedResource {
    locate(&fixture_config, Resource::GitConfig)
}

/// The initialization script, override or bundled.
#[fixture]
pub fn git_init_script(fixture_config: FixtureConfig) -> LocatedResource {
    locate(&fixture_config, Resource::GitInitScript)
}

/// Message of the initial commit.
#[fixture]
pub fn git_commit_message() -> String {
    naming::commit_message()
}

/// Initial branch name, pinned to `master`.
#[fixture]
pub fn git_initial_branch_name() -> String {
    naming::initial_branch_name()
}

/// Name of the remote referencing the fork.
#[fixture]
pub fn git_remote_name_fork() -> String {
    naming::remote_name(RemoteRole::Fork)
}

/// Name of the remote referencing upstream.
#[fixture]
pub fn git_remote_name_upstream() -> String {
    naming::remote_name(RemoteRole::Upstream)
}

/// Name of the file committed into the repository.
#[fixture]
pub fn git_test_filename() -> String {
    naming::test_filename()
}

/// Branch the work tree is checked out on.
#[fixture]
pub fn git_work_tree_branch_name() -> String {
    naming::branch_name()
}
