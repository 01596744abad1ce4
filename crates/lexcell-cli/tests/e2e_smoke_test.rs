use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::tempdir;

use lexcell::{LexcellError, Wordlist};
use lexcell_cli::{Args, Command, run};

/// Demo files are at workspace root, relative to workspace not the crate
fn demos_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(Path::parent)
        .map(|root| root.join("demos"))
        .expect("Crate should live two levels below the workspace root")
}

/// Collects all files in a directory whose name ends with `suffix`
fn collect_files(dir: PathBuf, suffix: &str) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path
                        .file_name()
                        .and_then(|s| s.to_str())
                        .is_some_and(|name| name.ends_with(suffix))
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

fn args(command: Command) -> Args {
    Args {
        command,
        config: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_parse_cells() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let cell_files = collect_files(demos_path(), ".cells.json");
    assert!(!cell_files.is_empty(), "No cell files found in demos/");

    for path in &cell_files {
        let output = temp_dir.path().join("forms.json");
        let result = run(&args(Command::Parse {
            input: path.to_string_lossy().to_string(),
            output: output.to_string_lossy().to_string(),
            strict: false,
        }));
        assert!(
            result.is_ok(),
            "Failed to parse {}: {:?}",
            path.display(),
            result.err()
        );

        let written = fs::read_to_string(&output).expect("Failed to read forms");
        let cells: serde_json::Value = serde_json::from_str(&written).expect("Invalid JSON");
        assert!(cells.as_array().is_some_and(|cells| !cells.is_empty()));
    }
}

#[test]
fn e2e_strict_parse_fails_on_rejected_cell() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output = temp_dir.path().join("forms.json");
    let result = run(&args(Command::Parse {
        input: demos_path()
            .join("maweti.cells.json")
            .to_string_lossy()
            .to_string(),
        output: output.to_string_lossy().to_string(),
        strict: true,
    }));

    match result {
        Err(LexcellError::Parse {
            err, coordinate, ..
        }) => {
            assert_eq!(coordinate, "Sheet1.C4");
            assert!(err.diagnostics().iter().any(|d| d.severity().is_error()));
        }
        other => panic!("Expected a parse error, got {other:?}"),
    }
    assert!(!output.exists(), "Nothing should be written on failure");
}

#[test]
fn e2e_smoke_test_valid_wordlists() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let wordlists = collect_files(demos_path(), ".wordlist.json");
    assert!(!wordlists.is_empty(), "No wordlists found in demos/");

    let mut failed = Vec::new();
    for path in &wordlists {
        let summary = temp_dir.path().join("summary.json");
        let result = run(&args(Command::Check {
            input: path.to_string_lossy().to_string(),
            strict: true,
            clusters: Some(summary.to_string_lossy().to_string()),
        }));
        if let Err(e) = result {
            failed.push((path.clone(), e));
        }
    }

    if !failed.is_empty() {
        eprintln!("\nValid wordlists that failed:");
        for (path, err) in &failed {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} valid wordlist(s) failed unexpectedly", failed.len());
    }
}

#[test]
fn e2e_smoke_test_error_wordlists() {
    let error_wordlists = collect_files(demos_path().join("errors"), ".wordlist.json");
    assert!(
        !error_wordlists.is_empty(),
        "No error wordlists found in demos/errors/"
    );

    let unexpectedly_succeeded: Vec<_> = error_wordlists
        .iter()
        .filter(|path| {
            run(&args(Command::Check {
                input: path.to_string_lossy().to_string(),
                strict: false,
                clusters: None,
            }))
            .is_ok()
        })
        .collect();

    assert!(
        unexpectedly_succeeded.is_empty(),
        "Error wordlists succeeded unexpectedly: {unexpectedly_succeeded:?}"
    );
}

#[test]
fn e2e_smoke_test_singletons_cover_every_segment() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = demos_path().join("iriundi.wordlist.json");
    let output = temp_dir.path().join("completed.json");

    run(&args(Command::Singletons {
        input: input.to_string_lossy().to_string(),
        output: output.to_string_lossy().to_string(),
    }))
    .expect("Failed to add singletons");

    let completed = Wordlist::from_json(&fs::read_to_string(&output).expect("Failed to read"))
        .expect("Invalid wordlist");
    let singleton = completed
        .cognatesets
        .iter()
        .find(|set| set.id == "X_maweti_give_birth_1")
        .expect("Expected a singleton for the uncovered first segment");
    assert_eq!(singleton.status.as_deref(), Some("automatic singleton"));

    // The completed wordlist passes the check that also reports gaps
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "[validation]\nreport_uncovered = true\nstrict = true\n")
        .expect("Failed to write config");
    let summary = temp_dir.path().join("summary.json");
    let mut check = args(Command::Check {
        input: output.to_string_lossy().to_string(),
        strict: false,
        clusters: Some(summary.to_string_lossy().to_string()),
    });
    check.config = Some(config_path.to_string_lossy().to_string());
    run(&check).expect("Completed wordlist should validate");

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&summary).expect("Failed to read summary"))
            .expect("Invalid summary");
    assert_eq!(summary["warnings"], 0);
    assert_eq!(summary["errors"], 0);
}

#[test]
fn e2e_missing_input_is_an_io_error() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let result = run(&args(Command::Singletons {
        input: temp_dir.path().join("absent.json").to_string_lossy().to_string(),
        output: temp_dir.path().join("out.json").to_string_lossy().to_string(),
    }));
    assert!(matches!(result, Err(LexcellError::Io(_))));
}
