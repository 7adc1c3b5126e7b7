//! Tests for GameService
//!
//! All tests run against the real filesystem inside temp directories.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use sgftree::application::services::GameService;
use sgftree::application::ApplicationError;
use sgftree::config::Settings;
use sgftree::domain::{DomainError, ParseMode};
use sgftree::infrastructure::di::ServiceContainer;
use sgftree::infrastructure::traits::RealFileSystem;

const GAME: &str = "(;FF[4]GM[1]SZ[19];B[pd];W[dd](;B[pq])(;B[dp]))";

fn service(mode: ParseMode) -> GameService {
    GameService::new(Arc::new(RealFileSystem), mode)
}

fn write(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

// ============================================================
// load() / save()
// ============================================================

#[test]
fn given_sgf_file_when_load_then_returns_tree() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "game.sgf", GAME);

    let tree = service(ParseMode::Lenient)
        .load(&temp.path().join("game.sgf"))
        .unwrap();

    assert_eq!(tree.len(), 5);
    assert_eq!(tree.leaf_count(), 2);
}

#[test]
fn given_missing_file_when_load_then_file_not_found() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("nope.sgf");

    let result = service(ParseMode::Lenient).load(&missing);

    assert!(matches!(result, Err(ApplicationError::FileNotFound(p)) if p == missing));
}

#[test]
fn given_malformed_file_when_load_strict_then_parse_error_with_path() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "bad.sgf", "(;B[pd]))");
    let path = temp.path().join("bad.sgf");

    let err = service(ParseMode::Strict).load(&path).unwrap_err();

    match err {
        ApplicationError::Parse { path: p, source } => {
            assert_eq!(p, path);
            assert_eq!(source, DomainError::UnbalancedClose { offset: 8 });
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn given_malformed_file_when_load_lenient_then_recovers() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "bad.sgf", "(;B[pd]))");

    let tree = service(ParseMode::Lenient)
        .load(&temp.path().join("bad.sgf"))
        .unwrap();

    assert_eq!(tree.len(), 1);
}

#[test]
fn given_tree_when_save_then_creates_parent_dirs_and_round_trips() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "game.sgf", GAME);
    let svc = service(ParseMode::Lenient);
    let tree = svc.load(&temp.path().join("game.sgf")).unwrap();

    let target = temp.path().join("out/nested/copy.sgf");
    svc.save(&tree, &target).unwrap();

    assert_eq!(fs::read_to_string(&target).unwrap(), GAME);
}

#[test]
fn given_existing_target_when_save_then_replaces_content() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "game.sgf", "(;C[old])");
    let svc = service(ParseMode::Lenient);
    let path = temp.path().join("game.sgf");

    let tree = sgftree::parse("(;C[new])");
    svc.save(&tree, &path).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "(;C[new])");
    // no temp files left next to the target
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[cfg(unix)]
fn mode(path: &Path) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path).unwrap().permissions().mode() & 0o777
}

#[cfg(unix)]
#[test]
fn given_new_target_when_save_then_file_is_world_readable_minus_umask() {
    let temp = TempDir::new().unwrap();
    // a plain create shows the effective umask: 0666 & !umask
    let reference = temp.path().join("reference");
    fs::write(&reference, "").unwrap();
    let expected = mode(&reference) & 0o644;
    let target = temp.path().join("fresh.sgf");

    service(ParseMode::Lenient)
        .save(&sgftree::parse("(;B[aa])"), &target)
        .unwrap();

    assert_eq!(mode(&target), expected);
}

#[cfg(unix)]
#[test]
fn given_existing_target_when_save_then_keeps_its_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let svc = service(ParseMode::Lenient);
    for original in [0o644, 0o640] {
        let target = temp.path().join(format!("game_{original:o}.sgf"));
        fs::write(&target, "(;C[old])").unwrap();
        fs::set_permissions(&target, fs::Permissions::from_mode(original)).unwrap();

        svc.save(&sgftree::parse("(;B[aa])"), &target).unwrap();

        assert_eq!(mode(&target), original);
        assert_eq!(fs::read_to_string(&target).unwrap(), "(;B[aa])");
    }
}

#[test]
fn given_formatted_file_when_normalize_then_returns_canonical_text() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "pretty.sgf",
        "(\n  ;FF[4]\n   C[hi]\n  (;B[aa])\n)\n",
    );

    let text = service(ParseMode::Lenient)
        .normalize(&temp.path().join("pretty.sgf"))
        .unwrap();

    assert_eq!(text, "(;FF[4]C[hi];B[aa])");
}

// ============================================================
// check()
// ============================================================

#[test]
fn given_directory_when_check_then_reports_every_sgf_file_sorted() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "good.sgf", GAME);
    write(temp.path(), "bad.SGF", "(;B[aa]");
    write(temp.path(), "sub/deep.sgf", "(;C[x])");
    write(temp.path(), "notes.txt", "not a game");

    let reports = service(ParseMode::Lenient).check(temp.path()).unwrap();

    let names: Vec<String> = reports
        .iter()
        .map(|r| {
            r.path
                .strip_prefix(temp.path())
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    assert_eq!(names, vec!["bad.SGF", "good.sgf", "sub/deep.sgf"]);

    // check always parses strictly, whatever the service mode
    assert!(!reports[0].is_ok());
    assert!(reports[1].is_ok());
    let stats = reports[1].result.as_ref().unwrap();
    assert_eq!(stats.nodes, 5);
    assert_eq!(stats.variations, 2);
    assert_eq!(stats.main_line, 4);
    assert!(reports[2].is_ok());
}

#[test]
fn given_single_file_when_check_then_one_report() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "game.sgf", GAME);

    let reports = service(ParseMode::Strict)
        .check(&temp.path().join("game.sgf"))
        .unwrap();

    assert_eq!(reports.len(), 1);
    assert!(reports[0].is_ok());
}

#[test]
fn given_missing_path_when_check_then_file_not_found() {
    let temp = TempDir::new().unwrap();

    let result = service(ParseMode::Strict).check(&temp.path().join("missing"));

    assert!(matches!(result, Err(ApplicationError::FileNotFound(_))));
}

// ============================================================
// ServiceContainer
// ============================================================

#[test]
fn given_strict_settings_when_building_container_then_service_uses_strict_mode() {
    let settings = Settings {
        mode: ParseMode::Strict,
        ..Settings::default()
    };

    let container = ServiceContainer::with_deps(settings, Arc::new(RealFileSystem));

    assert_eq!(container.games.mode(), ParseMode::Strict);
    assert_eq!(container.settings.mode, ParseMode::Strict);
}
