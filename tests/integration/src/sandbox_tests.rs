//! End-to-end provisioning against real `git` and `gpg`.
//!
//! Every test skips itself when either binary is missing from `PATH`.

use pretty_assertions::assert_eq;
use rstest::rstest;
use sandbox_fs::{FixtureConfig, project_root};
use sandbox_git::{LogTarget, inspect};
use sandbox_test_utils::{GitRepo, git_available, gpg_available, init_test_logging};

macro_rules! require_tools {
    () => {
        init_test_logging();
        if !(git_available() && gpg_available()) {
            eprintln!("skipping: git and gpg are required");
            return;
        }
    };
}

fn provision() -> GitRepo {
    GitRepo::provision().unwrap_or_else(|e| panic!("failed to provision sandbox: {e}"))
}

#[test]
fn test_git_repo() {
    require_tools!();
    let repo = provision();

    assert!(repo.clone_git_dir.exists());
    assert!(repo.clone_work_tree.exists());
    assert!(repo.fork_path.exists());
    assert!(repo.upstream_path.exists());
    assert!(repo.work_tree.exists());
    assert!(repo.work_tree_git_dir.exists());
    assert!(repo.home_dir.exists());
    assert!(repo.sandbox().root().is_dir());
    assert!(repo.missing_paths().is_empty());

    let gitconfig = std::fs::read_to_string(&repo.git_config_path).unwrap();
    assert!(!gitconfig.contains("$GIT"));

    assert!(!repo.commit_message.is_empty());
    assert_eq!(repo.initial_branch_name, "master");
    assert!(!repo.remote_name_fork.is_empty());
    assert!(!repo.remote_name_upstream.is_empty());
    assert!(!repo.work_tree_branch_name.is_empty());
    assert!(repo.clone_work_tree.join(&repo.test_filename).is_file());
    assert_eq!(&repo.identity, repo.keypair().identity());
}

#[test]
fn test_sanity_check() {
    require_tools!();
    let repo = provision();

    let log = repo.signature_log(LogTarget::Clone).unwrap();
    assert!(inspect::has_good_signature(&log), "clone log:\n{log}");
    assert!(log.contains(&repo.commit_message));

    let log = repo.signature_log(LogTarget::WorkTree).unwrap();
    assert!(inspect::has_good_signature(&log), "work tree log:\n{log}");
    assert!(log.contains(&repo.commit_message));
}

#[test]
fn test_upstream_has_one_signed_commit() {
    require_tools!();
    let repo = provision();

    let head = inspect::upstream_head(&repo).unwrap();

    assert_eq!(head.message, repo.commit_message);
    assert!(head.signed);
    assert_eq!(head.history_len, 1);
}

#[test]
fn test_fork_is_never_pushed_to() {
    require_tools!();
    let repo = provision();

    let refs = inspect::fork_refs(&repo).unwrap();
    assert!(refs.is_empty(), "fork has refs: {refs:?}");
}

#[test]
fn test_clone_remotes() {
    require_tools!();
    let repo = provision();

    let remotes = inspect::clone_remotes(&repo).unwrap();
    let url_of = |name: &str| {
        remotes
            .iter()
            .find(|(remote, _)| remote == name)
            .map(|(_, url)| url.clone())
            .unwrap_or_else(|| panic!("remote {name} missing from {remotes:?}"))
    };

    assert_eq!(
        url_of(&repo.remote_name_fork),
        repo.fork_path.to_string_lossy()
    );
    assert_eq!(
        url_of(&repo.remote_name_upstream),
        repo.upstream_path.to_string_lossy()
    );
}

#[test]
fn test_work_tree_is_on_its_own_branch() {
    require_tools!();
    let repo = provision();

    let work_tree = git2::Repository::open(&repo.work_tree).unwrap();
    let head = work_tree.head().unwrap();

    assert_eq!(head.shorthand(), Some(repo.work_tree_branch_name.as_str()));
    assert_eq!(
        head.peel_to_commit().unwrap().id().to_string(),
        inspect::upstream_head(&repo).unwrap().id
    );
}

#[test]
fn test_sandboxes_are_disjoint() {
    require_tools!();
    let first = provision();
    let second = provision();

    assert!(!first.home_dir.starts_with(&second.home_dir));
    assert!(!second.home_dir.starts_with(&first.home_dir));
    assert_ne!(first.work_tree_branch_name, second.work_tree_branch_name);
    assert_ne!(first.remote_name_fork, second.remote_name_fork);
    assert_ne!(first.remote_name_upstream, second.remote_name_upstream);
    assert_ne!(first.test_filename, second.test_filename);
    assert_ne!(first.commit_message, second.commit_message);
}

#[test]
fn test_sandbox_removed_after_failed_test() {
    require_tools!();
    let repo = provision();
    let home = repo.home_dir.clone();
    let root = repo.sandbox().root().to_path_buf();
    let gnupg_home = repo.keypair().home().to_path_buf();

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
        let repo = repo;
        assert_eq!(repo.commit_message, "not the commit message");
    }));

    assert!(result.is_err());
    assert!(!home.exists());
    assert!(!root.exists());
    assert!(!gnupg_home.exists());
}

#[rstest]
#[case::double_quote("q\"uote-")]
#[case::dollar("d$ollar-")]
#[case::backtick("back`tick-")]
#[case::space("my sandbox-")]
fn test_commit_signed_under_shell_special_root(#[case] prefix: &str) {
    require_tools!();
    let config = FixtureConfig {
        sandbox_prefix: prefix.to_string(),
        ..FixtureConfig::default()
    };
    let repo = GitRepo::provision_with(config, &project_root())
        .unwrap_or_else(|e| panic!("failed to provision under {prefix:?}: {e}"));
    assert!(repo.home_dir.to_string_lossy().contains(prefix));

    assert!(inspect::upstream_head(&repo).unwrap().signed);
    let log = repo.signature_log(LogTarget::WorkTree).unwrap();
    assert!(inspect::has_good_signature(&log), "work tree log:\n{log}");
}

#[test]
fn test_parallel_provisioning() {
    require_tools!();

    let results: Vec<_> = std::thread::scope(|scope| {
        let workers: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    let repo = GitRepo::provision()?;
                    let log = repo.signature_log(LogTarget::Clone)?;
                    Ok::<_, sandbox_test_utils::FixtureError>((
                        repo.home_dir.clone(),
                        inspect::has_good_signature(&log),
                    ))
                })
            })
            .collect();
        workers
            .into_iter()
            .map(|worker| worker.join().expect("provisioning thread panicked"))
            .collect()
    });

    let mut homes = Vec::new();
    for result in results {
        let (home, signed) = result.unwrap_or_else(|e| panic!("parallel provisioning failed: {e}"));
        assert!(signed, "unsigned commit in {}", home.display());
        homes.push(home);
    }
    homes.sort();
    homes.dedup();
    assert_eq!(homes.len(), 4);
}
