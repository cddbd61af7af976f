use std::process::Command;

use bs_test_fixtures::{copy_fixture_to_temp, fixtures_root};

#[test]
fn inspect_and_messages_run_on_every_fixture_project() {
    let bin = env!("CARGO_BIN_EXE_brickscope");
    let mut projects = std::fs::read_dir(fixtures_root())
        .expect("fixtures root must exist")
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.join("project.json").is_file())
        .collect::<Vec<_>>();
    projects.sort();
    assert!(!projects.is_empty(), "expected fixture projects");

    for project in projects {
        for command in ["inspect", "messages", "rehydrate"] {
            let output = Command::new(bin)
                .arg(command)
                .arg("--project-dir")
                .arg(&project)
                .output()
                .expect("cli should execute");
            let stdout = String::from_utf8_lossy(&output.stdout);
            assert!(
                output.status.success() && stdout.starts_with("RESULT:OK"),
                "{} failed for {}\nstdout:\n{}\nstderr:\n{}",
                command,
                project.display(),
                stdout,
                String::from_utf8_lossy(&output.stderr)
            );
        }
    }
}

#[test]
fn rename_scene_round_trips_through_the_binary() {
    let bin = env!("CARGO_BIN_EXE_brickscope");
    let project = copy_fixture_to_temp("SpaceHop", "smoke-rename");

    let output = Command::new(bin)
        .args(["rename-scene", "--project-dir"])
        .arg(&project)
        .args(["--scene", "Finale", "--to", "Victory"])
        .env("BRICKSCOPE_LOG", "info")
        .output()
        .expect("cli should execute");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stdout:\n{}", stdout);
    assert!(stdout.contains(r#"SCENES_JSON:["Title","Level1","Victory"]"#));
    assert!(String::from_utf8_lossy(&output.stderr).contains("renamed scene"));

    let output = Command::new(bin)
        .args(["merge", "--project-dir"])
        .arg(&project)
        .args(["--scene", "Level1"])
        .output()
        .expect("cli should execute");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.contains("RESULT:ERROR"));
    assert!(stdout.contains("ERROR_CODE:SCOPE_LOCAL_COLLISION"));
}
