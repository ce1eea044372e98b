use std::{fs, path::PathBuf};

use tempfile::tempdir;

use bytefield_cli::{Args, run};

/// Collects all .bf files from a directory
fn collect_bf_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("bf")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

fn demos_dir() -> PathBuf {
    // Demo scripts are at the workspace root, relative to this crate.
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

fn args_for(input: &str, output: &str) -> Args {
    Args {
        input: input.to_string(),
        output: output.to_string(),
        embedded: false,
        config: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_demo_scripts() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let demos = collect_bf_files(demos_dir());

    assert!(!demos.is_empty(), "No demo scripts found in demos/");

    let mut failed = Vec::new();

    for demo_path in &demos {
        let output_filename =
            format!("{}.svg", demo_path.file_stem().unwrap().to_string_lossy());
        let output_path = temp_dir.path().join(output_filename);

        let args = args_for(
            &demo_path.to_string_lossy(),
            &output_path.to_string_lossy(),
        );

        if let Err(e) = run(&args) {
            failed.push((demo_path.clone(), e));
            continue;
        }

        let svg = fs::read_to_string(&output_path).expect("output file should exist");
        assert!(svg.starts_with("<?xml"), "{} missing declaration", demo_path.display());
        assert!(svg.contains("<svg"), "{} missing svg root", demo_path.display());
    }

    if !failed.is_empty() {
        eprintln!("\nDemo scripts that failed:");
        for (path, err) in &failed {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} demo script(s) failed unexpectedly", failed.len());
    }
}

#[test]
fn e2e_embedded_output_has_no_declaration() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = demos_dir().join("minimal.bf");
    let output = temp_dir.path().join("minimal.svg");

    let mut args = args_for(&input.to_string_lossy(), &output.to_string_lossy());
    args.embedded = true;

    run(&args).expect("demo should render");

    let svg = fs::read_to_string(&output).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(!svg.contains("<?xml"));
}

#[test]
fn e2e_config_file_changes_grid() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("bytefield.toml");
    fs::write(&config_path, "[metrics]\nboxes-per-row = 16\nbox-width = 20\n").unwrap();

    let input = demos_dir().join("minimal.bf");
    let output = temp_dir.path().join("minimal.svg");

    let mut args = args_for(&input.to_string_lossy(), &output.to_string_lossy());
    args.config = Some(config_path.to_string_lossy().to_string());

    run(&args).expect("demo should render");

    // Halving the byte width halves the row span: 40 + 16 * 20.
    let svg = fs::read_to_string(&output).unwrap();
    assert!(svg.contains("x2=\"360\""));
}

#[test]
fn e2e_missing_input_is_an_io_error() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output = temp_dir.path().join("out.svg");

    let args = args_for("/nonexistent/diagram.bf", &output.to_string_lossy());
    let err = run(&args).expect_err("missing input should fail");
    assert!(matches!(err, bytefield::BytefieldError::Io(_)));
}
