//! Integration tests for the filesystem adapter.
//!
//! Every scenario runs `ForgeFs` against `MockForge`, so the exact remote
//! call sequence can be asserted alongside the resulting snapshot.

use std::io::{Read, Write};
use std::sync::Arc;

use forgefs::core::tree::EntryKind;
use forgefs::forge::mock::{FailOn, MockForge, MockOperation};
use forgefs::forge::{Forge, ForgeError};
use forgefs::fs::{Filesystem, ForgeFs, FsError};
use forgefs::mem::{FileMode, OpenFlags};

async fn mount(files: &[(&str, &[u8])]) -> (MockForge, ForgeFs) {
    let forge = MockForge::with_files("main", files);
    let fs = ForgeFs::connect(Arc::new(forge.clone()), "main")
        .await
        .unwrap();
    (forge, fs)
}

async fn names(fs: &ForgeFs, dir: &str) -> Vec<String> {
    fs.open(dir)
        .await
        .unwrap()
        .read_dir()
        .unwrap()
        .into_iter()
        .map(|info| info.name)
        .collect()
}

async fn read(fs: &ForgeFs, path: &str) -> Vec<u8> {
    let mut handle = fs.open(path).await.unwrap();
    let mut buf = Vec::new();
    handle.read_to_end(&mut buf).unwrap();
    buf
}

fn conflict() -> ForgeError {
    ForgeError::Conflict("simulated".into())
}

mod snapshot {
    use super::*;

    #[tokio::test]
    async fn entries_match_remote_listing() {
        let (forge, fs) = mount(&[
            ("README.md", b"readme".as_slice()),
            ("src/lib.rs", b"lib".as_slice()),
            ("src/fs/mod.rs", b"mod".as_slice()),
        ])
        .await;

        let snap = fs.snapshot().await;
        let remote = forge.get_tree(&snap.tree.sha).await.unwrap();
        assert_eq!(snap.tree, remote);

        for entry in &remote.entries {
            assert!(fs.find_entry(&entry.path).await.is_some(), "{}", entry.path);
        }
        for absent in ["src/main.rs", "fs", "src/fs/mod", "READ"] {
            assert!(fs.find_entry(absent).await.is_none(), "{}", absent);
        }
    }

    #[tokio::test]
    async fn connect_to_missing_branch_fails() {
        let forge = MockForge::with_files("main", &[]);
        let err = ForgeFs::connect(Arc::new(forge), "release").await.unwrap_err();
        assert!(matches!(err, FsError::Remote(ForgeError::NotFound(_))));
    }

    #[tokio::test]
    async fn connect_fails_when_tree_fetch_fails() {
        let forge = MockForge::with_files("main", &[("a", b"a".as_slice())])
            .fail_on(FailOn::GetTree(ForgeError::NetworkError("down".into())));
        let err = ForgeFs::connect(Arc::new(forge), "main").await.unwrap_err();
        assert!(matches!(err, FsError::Remote(ForgeError::NetworkError(_))));
    }
}

mod synthesis {
    use super::*;

    #[tokio::test]
    async fn root_lists_only_top_level() {
        let (_, fs) = mount(&[
            ("README.md", b"r".as_slice()),
            ("docs/guide.md", b"g".as_slice()),
            ("docs/api/index.md", b"i".as_slice()),
        ])
        .await;

        assert_eq!(names(&fs, "/").await, vec!["README.md", "docs"]);
        assert_eq!(names(&fs, "docs").await, vec!["api", "guide.md"]);
        assert_eq!(names(&fs, "docs/api").await, vec!["index.md"]);
    }

    #[tokio::test]
    async fn child_modes() {
        let (_, fs) = mount(&[("a.txt", b"a".as_slice()), ("d/b.txt", b"b".as_slice())]).await;
        let listing = fs.open("").await.unwrap().read_dir().unwrap();

        assert_eq!(listing[0].name, "a.txt");
        assert_eq!(listing[0].mode, FileMode::FILE);
        assert_eq!(listing[0].size, 1);
        assert_eq!(listing[1].name, "d");
        assert_eq!(listing[1].mode, FileMode::DIR);
        assert!(listing[1].is_dir());
    }

    #[tokio::test]
    async fn file_reads_from_start() {
        let (forge, fs) = mount(&[("notes/todo.txt", b"buy milk\n".as_slice())]).await;
        forge.clear_operations();

        assert_eq!(read(&fs, "/notes/todo.txt").await, b"buy milk\n");
        assert!(matches!(
            forge.operations().as_slice(),
            [MockOperation::GetBlob { .. }]
        ));
    }

    #[tokio::test]
    async fn open_is_not_cached() {
        let (forge, fs) = mount(&[("a", b"a".as_slice())]).await;
        forge.clear_operations();

        fs.open("a").await.unwrap();
        fs.open("a").await.unwrap();
        assert_eq!(forge.operations().len(), 2);
    }

    #[tokio::test]
    async fn handle_writes_stay_local() {
        let (forge, fs) = mount(&[("a.txt", b"abc".as_slice())]).await;

        let mut handle = fs
            .open_file("a.txt", OpenFlags::WRITE_ONLY | OpenFlags::APPEND, FileMode::FILE)
            .await
            .unwrap();
        handle.write_all(b"def").unwrap();
        assert_eq!(handle.contents(), Some(&b"abcdef"[..]));

        assert_eq!(forge.read_file("main", "a.txt").unwrap(), b"abc");
        assert_eq!(read(&fs, "a.txt").await, b"abc");
    }

    #[tokio::test]
    async fn open_file_on_directory_keeps_it_a_directory() {
        let (_, fs) = mount(&[("docs/a.md", b"a".as_slice())]).await;
        let handle = fs
            .open_file("docs", OpenFlags::READ_ONLY, FileMode::new(0o755))
            .await
            .unwrap();

        assert!(handle.is_dir());
        let info = handle.stat();
        assert!(info.is_dir());
        assert_eq!(info.mode.perm(), 0o755);
        assert_eq!(handle.read_dir().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn truncate_flag_empties_handle() {
        let (_, fs) = mount(&[("a.txt", b"abc".as_slice())]).await;
        let handle = fs
            .open_file("a.txt", OpenFlags::READ_WRITE | OpenFlags::TRUNCATE, FileMode::FILE)
            .await
            .unwrap();
        assert_eq!(handle.contents(), Some(&b""[..]));
    }

    #[tokio::test]
    async fn stat_shares_open_failures() {
        let (_, fs) = mount(&[("a", b"a".as_slice())]).await;
        assert!(fs.stat("missing").await.unwrap_err().is_not_found());
        assert!(fs.open("missing").await.unwrap_err().is_not_found());

        let info = fs.stat("/").await.unwrap();
        assert!(info.is_dir());
    }
}

mod mkdir {
    use super::*;

    #[tokio::test]
    async fn mkdir_all_creates_chain_in_order() {
        let (forge, fs) = mount(&[("README.md", b"r".as_slice())]).await;
        forge.clear_operations();

        fs.mkdir_all("a/b/c", FileMode::new(0o755)).await.unwrap();

        let snap = fs.snapshot().await;
        let added: Vec<_> = snap.tree.entries[1..]
            .iter()
            .map(|e| (e.path.as_str(), e.kind))
            .collect();
        assert_eq!(
            added,
            vec![
                ("a", EntryKind::Tree),
                ("a/b", EntryKind::Tree),
                ("a/b/c", EntryKind::Tree),
            ]
        );
        assert!(forge.operations().is_empty());
    }

    #[tokio::test]
    async fn mkdir_all_twice_is_tolerated() {
        let (_, fs) = mount(&[]).await;
        fs.mkdir_all("a/b/c", FileMode::DIR).await.unwrap();
        fs.mkdir_all("a/b/c", FileMode::DIR).await.unwrap();

        let snap = fs.snapshot().await;
        let leaves = snap.tree.entries.iter().filter(|e| e.path == "a/b/c").count();
        assert_eq!(leaves, 2);
        assert_eq!(names(&fs, "a/b").await, vec!["c"]);
    }

    #[tokio::test]
    async fn mkdir_without_parent() {
        let (_, fs) = mount(&[]).await;
        let err = fs.mkdir("x/y", FileMode::DIR).await.unwrap_err();
        assert!(matches!(err, FsError::NotFound(p) if p == "x"));
    }

    #[tokio::test]
    async fn local_directory_is_listed() {
        let (_, fs) = mount(&[("docs/a.md", b"a".as_slice())]).await;
        fs.mkdir("docs/drafts", FileMode::DIR).await.unwrap();
        assert_eq!(names(&fs, "docs").await, vec!["a.md", "drafts"]);
        assert!(names(&fs, "docs/drafts").await.is_empty());
    }

    #[tokio::test]
    async fn create_does_not_persist() {
        let (forge, fs) = mount(&[("README.md", b"r".as_slice())]).await;
        forge.clear_operations();

        fs.mkdir_all("x/y", FileMode::new(0o700)).await.unwrap();
        let handle = fs.create("x/y/z").await.unwrap();
        assert_eq!(handle.name(), "z");

        let snap = fs.snapshot().await;
        let x = snap.find_entry("x").unwrap();
        let xy = snap.find_entry("x/y").unwrap();
        assert_eq!(x.kind, EntryKind::Tree);
        assert_eq!(xy.kind, EntryKind::Tree);
        assert!(fs.find_entry("x/y/z").await.is_none());
        assert!(fs.open("x/y/z").await.unwrap_err().is_not_found());
        assert!(forge.operations().is_empty());
    }

    #[tokio::test]
    async fn local_markers_vanish_on_refresh() {
        let (_, fs) = mount(&[("a", b"a".as_slice())]).await;
        fs.mkdir("scratch", FileMode::DIR).await.unwrap();
        fs.write_file("b", b"b").await.unwrap();
        assert!(fs.find_entry("scratch").await.is_none());
    }
}

mod remove {
    use super::*;

    #[tokio::test]
    async fn remove_commits_one_delete() {
        let (forge, fs) = mount(&[("a.txt", b"a".as_slice()), ("b.txt", b"b".as_slice())]).await;
        let sha = fs.find_entry("a.txt").await.unwrap().sha.unwrap();
        forge.clear_operations();

        fs.remove("/a.txt").await.unwrap();

        let ops = forge.operations();
        assert!(matches!(
            &ops[0],
            MockOperation::DeleteFile { path, sha: s, branch, message }
                if path == "a.txt" && *s == sha && branch == "main" && message == "automatic commit"
        ));
        assert!(matches!(&ops[1], MockOperation::GetTree { .. }));
        assert_eq!(ops.len(), 2);

        assert!(fs.find_entry("a.txt").await.is_none());
        assert_eq!(forge.file_paths("main"), vec!["b.txt"]);

        let snap = fs.snapshot().await;
        assert_eq!(Some(snap.branch.head_commit), forge.head("main"));
        assert_eq!(snap.branch.head_tree, snap.tree.sha);
    }

    #[tokio::test]
    async fn remove_missing() {
        let (forge, fs) = mount(&[]).await;
        forge.clear_operations();
        assert!(fs.remove("nope").await.unwrap_err().is_not_found());
        assert!(forge.operations().is_empty());
    }

    #[tokio::test]
    async fn remove_with_stale_precondition() {
        let (forge, fs) = mount(&[("a.txt", b"old".as_slice())]).await;
        forge.push_file("main", "a.txt", b"new").unwrap();

        let err = fs.remove("a.txt").await.unwrap_err();
        assert!(matches!(err, FsError::Remote(ForgeError::Conflict(_))));
        assert_eq!(forge.read_file("main", "a.txt").unwrap(), b"new");
    }

    #[tokio::test]
    async fn remove_all_skips_directory_markers() {
        let (forge, fs) = mount(&[
            ("keep.txt", b"k".as_slice()),
            ("dir/a", b"a".as_slice()),
            ("dir/sub/b", b"b".as_slice()),
            ("dirt/c", b"c".as_slice()),
        ])
        .await;
        fs.mkdir("dir/empty", FileMode::DIR).await.unwrap();
        forge.clear_operations();

        fs.remove_all("dir").await.unwrap();

        let deleted: Vec<_> = forge
            .operations()
            .into_iter()
            .filter_map(|op| match op {
                MockOperation::DeleteFile { path, .. } => Some(path),
                _ => None,
            })
            .collect();
        assert_eq!(deleted, vec!["dir/a", "dir/sub/b"]);
        assert_eq!(forge.file_paths("main"), vec!["dirt/c", "keep.txt"]);
    }

    #[tokio::test]
    async fn remove_all_marker_only_directory() {
        let (forge, fs) = mount(&[("a", b"a".as_slice())]).await;
        fs.mkdir_all("x/y", FileMode::DIR).await.unwrap();
        forge.clear_operations();

        fs.remove_all("x").await.unwrap();

        assert!(forge.operations().is_empty());
        assert!(fs.find_entry("x").await.is_some());
        assert!(fs.find_entry("x/y").await.is_some());
    }

    #[tokio::test]
    async fn remove_all_on_file_delegates() {
        let (forge, fs) = mount(&[("a", b"a".as_slice()), ("b", b"b".as_slice())]).await;
        fs.remove_all("a").await.unwrap();
        assert_eq!(forge.file_paths("main"), vec!["b"]);
    }

    #[tokio::test]
    async fn remove_all_missing() {
        let (_, fs) = mount(&[("a", b"a".as_slice())]).await;
        assert!(fs.remove_all("ghost").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn remove_all_partial_failure_keeps_earlier_deletes() {
        let (forge, fs) = mount(&[
            ("dir/1", b"1".as_slice()),
            ("dir/2", b"2".as_slice()),
            ("dir/3", b"3".as_slice()),
        ])
        .await;
        forge.set_fail_on(FailOn::DeleteFile(conflict()), 1);

        let err = fs.remove_all("dir").await.unwrap_err();
        assert!(matches!(err, FsError::Remote(ForgeError::Conflict(_))));

        assert_eq!(forge.file_paths("main"), vec!["dir/2", "dir/3"]);
        assert!(fs.find_entry("dir/1").await.is_none());
        assert!(fs.find_entry("dir/2").await.is_some());
    }
}

mod rename {
    use super::*;

    #[tokio::test]
    async fn rename_preserves_content_identity() {
        let (forge, fs) =
            mount(&[("a.md", b"alpha".as_slice()), ("b.md", b"beta".as_slice())]).await;
        let before = fs.find_entry("a.md").await.unwrap();

        fs.rename("/a.md", "/c.md").await.unwrap();

        let after = fs.find_entry("c.md").await.unwrap();
        assert_eq!(after.sha, before.sha);
        assert_eq!(after.kind, before.kind);
        assert!(fs.find_entry("a.md").await.is_none());
        assert_eq!(forge.file_paths("main"), vec!["b.md", "c.md"]);
        assert_eq!(read(&fs, "c.md").await, b"alpha");
    }

    #[tokio::test]
    async fn rename_call_sequence() {
        let (forge, fs) = mount(&[("a", b"a".as_slice())]).await;
        let parent = forge.head("main").unwrap();
        forge.clear_operations();

        fs.rename("a", "b").await.unwrap();

        let ops = forge.operations();
        assert!(matches!(&ops[0], MockOperation::GetBranch { branch } if branch == "main"));
        assert!(matches!(&ops[1], MockOperation::GetTree { .. }));
        assert!(matches!(
            &ops[2],
            MockOperation::CreateTree { base_tree: None, paths } if paths == &vec!["b".to_string()]
        ));
        assert!(matches!(&ops[3], MockOperation::GetTree { .. }));
        assert!(matches!(
            &ops[4],
            MockOperation::CreateCommit { parents, message, .. }
                if parents == &vec![parent.clone()] && message == "auto commit from git"
        ));
        assert!(matches!(
            &ops[5],
            MockOperation::UpdateRef { branch, force: false, .. } if branch == "main"
        ));
        assert_eq!(ops.len(), 6);

        let snap = fs.snapshot().await;
        assert_eq!(Some(snap.branch.head_commit), forge.head("main"));
    }

    #[tokio::test]
    async fn rename_resyncs_with_external_commits() {
        let (forge, fs) = mount(&[("a", b"a".as_slice())]).await;
        forge.push_file("main", "pushed", b"p").unwrap();

        fs.rename("a", "b").await.unwrap();

        assert_eq!(forge.file_paths("main"), vec!["b", "pushed"]);
        assert!(fs.find_entry("pushed").await.is_some());
    }

    #[tokio::test]
    async fn rename_directory_moves_only_the_tree_entry() {
        let (forge, fs) = mount(&[("docs/a.md", b"alpha".as_slice())]).await;
        let subtree = fs.find_entry("docs").await.unwrap();

        fs.rename("docs", "guide").await.unwrap();

        assert_eq!(forge.file_paths("main"), vec!["docs/a.md", "guide/a.md"]);
        let paths: Vec<String> = fs
            .snapshot()
            .await
            .tree
            .entries
            .into_iter()
            .map(|e| e.path)
            .collect();
        assert_eq!(paths, vec!["docs", "docs/a.md", "guide", "guide/a.md"]);

        let guide = fs.find_entry("guide").await.unwrap();
        assert_eq!(guide.kind, EntryKind::Tree);
        assert_eq!(guide.sha, subtree.sha);
        assert_eq!(read(&fs, "guide/a.md").await, b"alpha");
        assert_eq!(read(&fs, "docs/a.md").await, b"alpha");
    }

    #[tokio::test]
    async fn rename_missing_source() {
        let (forge, fs) = mount(&[("a", b"a".as_slice())]).await;
        let head = forge.head("main");
        assert!(fs.rename("nope", "b").await.unwrap_err().is_not_found());
        assert_eq!(forge.head("main"), head);
    }

    #[tokio::test]
    async fn ref_update_failure_leaves_tree_ahead() {
        let (forge, fs) = mount(&[("a", b"a".as_slice())]).await;
        let head = forge.head("main").unwrap();
        forge.set_fail_on(FailOn::UpdateRef(conflict()), 0);

        let err = fs.rename("a", "b").await.unwrap_err();
        assert!(matches!(err, FsError::Remote(ForgeError::Conflict(_))));

        assert_eq!(forge.head("main"), Some(head.clone()));
        let snap = fs.snapshot().await;
        assert_eq!(snap.branch.head_commit, head);
        assert_ne!(snap.tree.sha, snap.branch.head_tree);
        assert!(snap.find_entry("b").is_some());

        // The next rename resynchronizes from the branch
        forge.clear_fail_on();
        fs.rename("a", "c").await.unwrap();
        assert_eq!(forge.file_paths("main"), vec!["c"]);
    }

    #[tokio::test]
    async fn commit_failure_propagates_verbatim() {
        let (forge, fs) = mount(&[("a", b"a".as_slice())]).await;
        forge.set_fail_on(
            FailOn::CreateCommit(ForgeError::ApiError {
                status: 422,
                message: "bad tree".into(),
            }),
            0,
        );
        let err = fs.rename("a", "b").await.unwrap_err();
        assert!(matches!(
            err,
            FsError::Remote(ForgeError::ApiError { status: 422, message }) if message == "bad tree"
        ));
    }
}

mod write {
    use super::*;

    #[tokio::test]
    async fn create_then_write_persists() {
        let (forge, fs) = mount(&[("README.md", b"r".as_slice())]).await;

        let mut handle = fs.create("notes/today.md").await.unwrap();
        handle.write_all(b"# Today").unwrap();
        fs.write_file("notes/today.md", handle.contents().unwrap())
            .await
            .unwrap();

        assert_eq!(forge.read_file("main", "notes/today.md").unwrap(), b"# Today");
        assert_eq!(names(&fs, "notes").await, vec!["today.md"]);
        assert_eq!(read(&fs, "notes/today.md").await, b"# Today");
    }

    #[tokio::test]
    async fn overwrite_uses_existing_sha() {
        let (forge, fs) = mount(&[("a", b"one".as_slice())]).await;
        let sha = fs.find_entry("a").await.unwrap().sha;
        forge.clear_operations();

        fs.write_file("a", b"two").await.unwrap();

        assert!(matches!(
            &forge.operations()[0],
            MockOperation::PutFile { sha: s, len: 3, .. } if *s == sha
        ));
        assert_eq!(forge.read_file("main", "a").unwrap(), b"two");
    }

    #[tokio::test]
    async fn write_to_directory() {
        let (forge, fs) = mount(&[("d/a", b"a".as_slice())]).await;
        forge.clear_operations();
        assert!(matches!(
            fs.write_file("d", b"x").await,
            Err(FsError::IsADirectory(_))
        ));
        assert!(matches!(
            fs.write_file("/", b"x").await,
            Err(FsError::IsADirectory(_))
        ));
        assert!(forge.operations().is_empty());
    }
}

mod locking {
    use super::*;

    #[tokio::test]
    async fn lock_released_after_error() {
        let (forge, fs) = mount(&[("a", b"a".as_slice())]).await;
        forge.set_fail_on(FailOn::GetBlob(ForgeError::NetworkError("reset".into())), 0);

        assert!(matches!(
            fs.open("a").await,
            Err(FsError::Remote(ForgeError::NetworkError(_)))
        ));

        forge.clear_fail_on();
        assert_eq!(read(&fs, "a").await, b"a");
    }

    #[tokio::test]
    async fn concurrent_operations_serialize() {
        let files: Vec<(String, Vec<u8>)> = (0..8)
            .map(|i| (format!("f{}", i), vec![b'x'; i + 1]))
            .collect();
        let refs: Vec<(&str, &[u8])> = files
            .iter()
            .map(|(p, c)| (p.as_str(), c.as_slice()))
            .collect();
        let (forge, fs) = mount(&refs).await;
        let fs = Arc::new(fs);

        let mut tasks = Vec::new();
        for i in 0..8 {
            let fs = Arc::clone(&fs);
            tasks.push(tokio::spawn(async move {
                fs.remove(&format!("f{}", i)).await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert!(forge.file_paths("main").is_empty());
        assert!(fs.snapshot().await.tree.entries.is_empty());
    }

    #[tokio::test]
    async fn instances_are_independent() {
        let forge = MockForge::with_files("main", &[("a", b"a".as_slice())]);
        let first = ForgeFs::connect(Arc::new(forge.clone()), "main").await.unwrap();
        let second = ForgeFs::connect(Arc::new(forge.clone()), "main").await.unwrap();

        first.write_file("b", b"b").await.unwrap();

        assert!(first.find_entry("b").await.is_some());
        assert!(second.find_entry("b").await.is_none());
    }
}
