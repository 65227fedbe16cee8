mod test_support;

use serde_json::json;
use test_support::{create, request_ok, select_workspace, spawn_sidecar, temp_dir};

#[test]
fn rows_survive_a_sidecar_restart() {
    let workspace = temp_dir("examd-persist");

    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, &workspace);
    let building = create(
        &mut stdin,
        &mut reader,
        "buildings",
        "building",
        json!({ "name": "A Block", "address": "Campus North" }),
    );
    let hall = create(
        &mut stdin,
        &mut reader,
        "halls",
        "hall",
        json!({ "buildingId": building, "name": "A-101", "capacity": 40 }),
    );
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "rename",
        "halls.update",
        json!({ "id": hall, "buildingId": building, "name": "A-101 (renovated)", "capacity": 36 }),
    );
    drop(stdin);
    let _ = child.wait();

    assert!(workspace.join("examd.sqlite3").is_file());

    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, &workspace);
    let halls = request_ok(&mut stdin, &mut reader, "list", "halls.list", json!({}));
    let halls = halls.get("halls").and_then(|v| v.as_array()).expect("halls");
    assert_eq!(halls.len(), 1);
    assert_eq!(halls[0].get("id").and_then(|v| v.as_str()), Some(hall.as_str()));
    assert_eq!(
        halls[0].get("name").and_then(|v| v.as_str()),
        Some("A-101 (renovated)")
    );
    assert_eq!(halls[0].get("capacity").and_then(|v| v.as_u64()), Some(36));

    let health = request_ok(&mut stdin, &mut reader, "health", "health", json!({}));
    assert_eq!(
        health.get("workspacePath").and_then(|v| v.as_str()),
        Some(workspace.to_string_lossy().as_ref())
    );

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}

#[test]
fn workspace_from_environment_is_opened_at_startup() {
    let workspace = temp_dir("examd-persist-env");

    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, &workspace);
    let _ = create(
        &mut stdin,
        &mut reader,
        "topics",
        "topic",
        json!({ "courseId": "CRS-1", "name": "Loops" }),
    );
    drop(stdin);
    let _ = child.wait();

    let mut child = std::process::Command::new(env!("CARGO_BIN_EXE_examd"))
        .env("EXAMD_WORKSPACE", &workspace)
        .stdin(std::process::Stdio::piped())
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::null())
        .spawn()
        .expect("spawn examd");
    let mut stdin = child.stdin.take().expect("child stdin");
    let mut reader = std::io::BufReader::new(child.stdout.take().expect("child stdout"));
    let topics = request_ok(&mut stdin, &mut reader, "1", "topics.list", json!({}));
    let topics = topics.get("topics").and_then(|v| v.as_array()).expect("topics");
    assert_eq!(topics.len(), 1);
    assert_eq!(topics[0].get("name").and_then(|v| v.as_str()), Some("Loops"));

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}
