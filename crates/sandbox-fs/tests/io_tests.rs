use sandbox_fs::io;
use std::fs;
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::TempDir;

#[test]
fn test_write_atomic_creates_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(".gitconfig");

    io::write_atomic(&path, b"[user]\n").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "[user]\n");
}

#[test]
fn test_write_atomic_overwrites_existing() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(".gitconfig");
    fs::write(&path, "original").unwrap();

    io::write_atomic(&path, b"updated").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "updated");
}

#[test]
fn test_write_atomic_leaves_no_temp_files() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(".gitconfig");

    io::write_text(&path, "first").unwrap();
    io::write_text(&path, "second").unwrap();

    let entries: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries.len(), 1, "unexpected entries: {entries:?}");
}

#[test]
fn test_failed_rename_removes_staged_file() {
    let temp = TempDir::new().unwrap();
    // A non-empty directory cannot be replaced by a file
    let path = temp.path().join(".gitconfig");
    fs::create_dir(&path).unwrap();
    fs::write(path.join("keep"), "x").unwrap();

    let err = io::write_text(&path, "content").unwrap_err();

    assert!(err.to_string().contains(".gitconfig"), "{err}");
    let entries: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from(".gitconfig")]);
    assert!(path.join("keep").is_file());
}

#[test]
fn test_concurrent_writes_leave_one_complete_value() {
    let temp = TempDir::new().unwrap();
    let path = Arc::new(temp.path().join("concurrent.txt"));
    let num_threads = 8;
    let barrier = Arc::new(Barrier::new(num_threads));

    let handles: Vec<_> = (0..num_threads)
        .map(|thread_id| {
            let path = Arc::clone(&path);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..10 {
                    io::write_text(&path, &format!("thread{thread_id}:write{i}\n")).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread should not panic");
    }

    let content = fs::read_to_string(path.as_path()).unwrap();
    assert!(content.starts_with("thread"));
    assert_eq!(content.matches("thread").count(), 1);
}
