//! Parameter and resource fixtures, no git or gpg required.

use rstest::rstest;
use sandbox_fs::{LocatedResource, ResourceLocator, project_root};
use sandbox_test_utils::fixtures::*;

#[rstest]
fn test_gitconfig(gitconfig: LocatedResource) {
    assert!(gitconfig.path().exists());
}

#[rstest]
fn test_git_init_script(git_init_script: LocatedResource) {
    assert!(git_init_script.path().exists());
}

#[rstest]
fn test_git_commit_message(git_commit_message: String) {
    assert!(!git_commit_message.is_empty());
    assert_ne!(git_commit_message, "Initial commit: .");
}

#[rstest]
fn test_git_initial_branch_name(git_initial_branch_name: String) {
    assert_eq!(git_initial_branch_name, "master");
}

#[rstest]
fn test_git_remote_name_fork(git_remote_name_fork: String) {
    assert!(!git_remote_name_fork.is_empty());
    assert_ne!(git_remote_name_fork, "fork-");
}

#[rstest]
fn test_git_remote_name_upstream(git_remote_name_upstream: String) {
    assert!(!git_remote_name_upstream.is_empty());
    assert_ne!(git_remote_name_upstream, "upstream-");
}

#[rstest]
fn test_git_test_filename(git_test_filename: String) {
    assert!(!git_test_filename.is_empty());
    assert_ne!(git_test_filename, "test-.txt");
}

#[rstest]
fn test_git_work_tree_branch_name(git_work_tree_branch_name: String) {
    assert!(!git_work_tree_branch_name.is_empty());
    assert_ne!(git_work_tree_branch_name, "branch-");
}

#[test]
fn test_get_user_defined_file() {
    let locator = ResourceLocator::for_project(&project_root());
    assert_eq!(locator.find_override("does_not_exist"), None);
}

#[rstest]
fn test_materialized_resources_are_scoped(gitconfig: LocatedResource) {
    let path = gitconfig.path().to_path_buf();
    let is_override = gitconfig.is_override();
    drop(gitconfig);

    // Only copies this crate created are removed
    assert_eq!(path.exists(), is_override);
}
