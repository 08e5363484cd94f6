use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

mod common;

use common::command::{repository_dir, run_dirc_command};
use common::{IndexBuilder, RawEntry, write_index};

fn sample_index() -> Vec<u8> {
    let mut conflicted = RawEntry::new("src/main.rs");
    conflicted.flags |= 2 << 12;

    IndexBuilder::new(2)
        .entry(&RawEntry::new("README.md"))
        .entry(&conflicted)
        .extension(b"ZZZZ", b"opaque")
        .build()
}

#[rstest]
fn ls_files_lists_paths_in_order(repository_dir: TempDir) {
    write_index(repository_dir.path(), &sample_index());

    run_dirc_command(repository_dir.path(), &["ls-files"])
        .assert()
        .success()
        .stdout("README.md\nsrc/main.rs\n");
}

#[rstest]
fn ls_files_stage_matches_git_layout(repository_dir: TempDir) {
    write_index(repository_dir.path(), &sample_index());

    let readme = dirc::artifacts::objects::object_id::ObjectId::hash(b"README.md");
    run_dirc_command(repository_dir.path(), &["ls-files", "--stage"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("100644 {readme} 0\tREADME.md\n")))
        .stdout(predicate::str::contains(" 2\tsrc/main.rs\n"));
}

#[rstest]
fn index_path_can_be_overridden(repository_dir: TempDir) {
    let path = repository_dir.path().join("other-index");
    std::fs::write(&path, sample_index()).expect("Failed to write index");

    run_dirc_command(
        repository_dir.path(),
        &["--index", "other-index", "ls-files"],
    )
    .assert()
    .success()
    .stdout(predicate::str::contains("README.md"));
}

#[rstest]
fn show_index_prints_every_field(repository_dir: TempDir) {
    write_index(repository_dir.path(), &sample_index());

    run_dirc_command(repository_dir.path(), &["show-index"])
        .assert()
        .success()
        .stdout(predicate::str::contains("version      2"))
        .stdout(predicate::str::contains("entries      2"))
        .stdout(predicate::str::contains("entry 1: src/main.rs"))
        .stdout(predicate::str::contains("2023-11-14 22:13:20.000000001 UTC"))
        .stdout(predicate::str::contains("mode         100644 (file)"))
        .stdout(predicate::str::contains("stage        2"))
        .stdout(predicate::str::contains("verified     yes"));
}

#[rstest]
fn verify_accepts_a_sound_index(repository_dir: TempDir) {
    write_index(repository_dir.path(), &sample_index());

    run_dirc_command(repository_dir.path(), &["verify"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ok"))
        .stdout(predicate::str::contains("encoding  identical"));
}

#[rstest]
fn verify_fails_on_checksum_mismatch(repository_dir: TempDir) {
    let mut bytes = sample_index();
    bytes[12] ^= 0xff;
    write_index(repository_dir.path(), &bytes);

    run_dirc_command(repository_dir.path(), &["verify"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("mismatch"))
        .stderr(predicate::str::contains("checksum mismatch"));
}

#[rstest]
fn extensions_are_listed(repository_dir: TempDir) {
    write_index(repository_dir.path(), &sample_index());

    run_dirc_command(repository_dir.path(), &["extensions"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ZZZZ"))
        .stdout(predicate::str::contains("6 bytes  unknown"));
}

#[rstest]
fn bad_signature_is_reported(repository_dir: TempDir) {
    let mut bytes = sample_index();
    bytes[0] = b'X';
    write_index(repository_dir.path(), &bytes);

    run_dirc_command(repository_dir.path(), &["ls-files"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad signature"));
}

#[rstest]
fn dirty_padding_needs_lenient(repository_dir: TempDir) {
    let bytes = IndexBuilder::new(2)
        .entry(&RawEntry::new("ab").with_padding_byte(b'!'))
        .build();
    write_index(repository_dir.path(), &bytes);

    run_dirc_command(repository_dir.path(), &["ls-files"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("padding"))
        .stderr(predicate::str::contains("(entry #0)"));

    run_dirc_command(repository_dir.path(), &["--lenient", "ls-files"])
        .assert()
        .success()
        .stdout("ab\n");
}

#[rstest]
fn verbose_logs_the_load(repository_dir: TempDir) {
    write_index(repository_dir.path(), &sample_index());

    run_dirc_command(repository_dir.path(), &["-v", "ls-files"])
        .assert()
        .success()
        .stderr(predicate::str::contains("2 entries, 1 extensions"));
}

#[rstest]
fn quiet_by_default_but_rust_log_is_honoured(repository_dir: TempDir) {
    write_index(repository_dir.path(), &sample_index());

    run_dirc_command(repository_dir.path(), &["ls-files"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());

    run_dirc_command(repository_dir.path(), &["ls-files"])
        .env("RUST_LOG", "debug")
        .assert()
        .success()
        .stderr(predicate::str::contains("DEBUG"))
        .stderr(predicate::str::contains("2 entries, 1 extensions"));
}

#[rstest]
fn missing_index_is_an_error(repository_dir: TempDir) {
    run_dirc_command(repository_dir.path(), &["ls-files"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot open index file"));
}
