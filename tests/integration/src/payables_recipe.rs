//! End-to-end test of the payables controller rewrite
//!
//! Copies `test-fixtures/payables` into a temporary workspace and drives the
//! recipe through the public splice-core API.

use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use splice_core::{
    BackupStore, DEFAULT_BACKUP_DIR, Error, ReplaceOptions, Replacer, load_request, replace_block,
};
use splice_fs::NormalizedPath;
use splice_test_utils::TestWorkspace;

const MARKER: &str = "return Inertia::render('AccountantPage/Payables', [";
const DELIMITER: &str = "]);";
const CONTROLLER: &str = "PayableController.php";
const PAYLOAD: &str = "payables_block.php.txt";

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../test-fixtures/payables")
}

fn fixture(name: &str) -> String {
    fs::read_to_string(fixtures_dir().join(name)).unwrap()
}

/// A workspace holding a fresh copy of the payables fixtures.
fn setup() -> TestWorkspace {
    let ws = TestWorkspace::new();
    for name in [CONTROLLER, PAYLOAD, "recipe.toml"] {
        ws.write_file(name, &fixture(name));
    }
    ws
}

/// The controller as the recipe should leave it.
fn expected_controller() -> String {
    let original = fixture(CONTROLLER);
    let start = original.find(MARKER).unwrap();
    let end = original[start..].find(DELIMITER).unwrap() + start + DELIMITER.len();
    format!("{}{}{}", &original[..start], fixture(PAYLOAD), &original[end..])
}

#[test]
fn recipe_rewrites_only_the_index_props() {
    let ws = setup();
    let request = load_request(ws.path("recipe.toml")).unwrap();

    let outcome = Replacer::default().replace(&request).unwrap();

    assert!(outcome.written);
    assert_eq!(outcome.lines.first, 23);
    assert_eq!(outcome.lines.last, 25);
    let updated = ws.read_file(CONTROLLER);
    assert_eq!(updated, expected_controller());
    assert!(updated.contains("'payable' => $payable,\n        ]);"));
    assert!(updated.contains("return back();"));
    assert_eq!(updated.matches(MARKER).count(), 1);
}

#[test]
fn recipe_is_idempotent() {
    let ws = setup();
    let request = load_request(ws.path("recipe.toml")).unwrap();
    let replacer = Replacer::default();

    replacer.replace(&request).unwrap();
    let once = ws.read_file(CONTROLLER);
    let second = replacer.replace(&request).unwrap();

    assert_eq!(ws.read_file(CONTROLLER), once);
    assert_eq!(second.diff.inserted, 0);
    assert_eq!(second.diff.deleted, 0);
}

#[test]
fn dry_run_reports_diff_without_writing() {
    let ws = setup();
    let request = load_request(ws.path("recipe.toml")).unwrap();
    let replacer = Replacer::new(ReplaceOptions::default().with_dry_run(true));

    let outcome = replacer.replace(&request).unwrap();

    assert!(outcome.dry_run);
    assert!(!outcome.written);
    assert!(outcome.diff.unified.contains("+                'meta' => ["));
    assert!(outcome.diff.unified.contains("-            'payables' => $paginated,"));
    assert_eq!(ws.read_file(CONTROLLER), fixture(CONTROLLER));
    assert!(ws.list_dir(DEFAULT_BACKUP_DIR).is_empty());
}

#[test]
fn backup_then_restore_round_trip() {
    let ws = setup();
    let request = load_request(ws.path("recipe.toml")).unwrap();
    let replacer = Replacer::new(ReplaceOptions::default().with_backup(true));

    let outcome = replacer.replace(&request).unwrap();
    let record = outcome.backup.expect("backup requested");
    assert_eq!(fs::read_to_string(record.backup_path()).unwrap(), fixture(CONTROLLER));

    let target = NormalizedPath::new(ws.path(CONTROLLER));
    let listed = BackupStore::for_target(&target).list(&target).unwrap();
    assert_eq!(listed.len(), 1);

    replacer.restore_latest(&target).unwrap();
    assert_eq!(ws.read_file(CONTROLLER), fixture(CONTROLLER));
}

#[test]
fn direct_call_matches_recipe() {
    let ws = setup();
    let payload = fixture(PAYLOAD);

    replace_block(ws.path(CONTROLLER), MARKER, DELIMITER, &payload).unwrap();

    assert_eq!(ws.read_file(CONTROLLER), expected_controller());
}

#[test]
fn renamed_page_is_left_alone() {
    let ws = setup();
    let renamed = fixture(CONTROLLER).replace("AccountantPage/Payables", "AccountantPage/Bills");
    ws.write_file(CONTROLLER, &renamed);
    let request = load_request(ws.path("recipe.toml")).unwrap();

    let err = Replacer::default().replace(&request).unwrap_err();

    assert!(matches!(err, Error::Content(_)));
    assert_eq!(ws.read_file(CONTROLLER), renamed);
}
