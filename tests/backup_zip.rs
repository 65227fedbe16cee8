mod test_support;

use serde_json::json;
use std::fs::File;
use std::io::{Read, Write};
use test_support::{
    create, error_code, list_len, request, request_ok, select_workspace, spawn_sidecar, temp_dir,
};

#[test]
fn bundle_export_and_import_roundtrip_between_workspaces() {
    let source = temp_dir("examd-backup-src");
    let target = temp_dir("examd-backup-dst");
    let out_dir = temp_dir("examd-backup-out");
    let bundle_path = out_dir.join("workspace.examd.zip");

    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, &source);
    let exam = create(&mut stdin, &mut reader, "exams", "exam", json!({ "name": "Finals" }));
    let _ = create(
        &mut stdin,
        &mut reader,
        "students",
        "student",
        json!({ "studentNumber": "42", "firstName": "Deniz", "lastName": "Arslan" }),
    );
    let export = request_ok(
        &mut stdin,
        &mut reader,
        "exp",
        "backup.exportWorkspaceBundle",
        json!({ "outPath": bundle_path.to_string_lossy() }),
    );
    assert_eq!(
        export.get("bundleFormat").and_then(|v| v.as_str()),
        Some("examd-workspace-v1")
    );
    assert_eq!(export.get("entryCount").and_then(|v| v.as_u64()), Some(3));
    drop(stdin);
    let _ = child.wait();

    let f = File::open(&bundle_path).expect("open bundle");
    let mut archive = zip::ZipArchive::new(f).expect("open zip archive");
    let mut manifest = String::new();
    archive
        .by_name("manifest.json")
        .expect("manifest entry")
        .read_to_string(&mut manifest)
        .expect("read manifest");
    assert!(manifest.contains("examd-workspace-v1"));
    archive
        .by_name("collections/ems_exams_v1.json")
        .expect("exams entry in bundle");

    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, &target);
    let stale = create(&mut stdin, &mut reader, "exams", "exam", json!({ "name": "Overwritten" }));
    let _ = create(
        &mut stdin,
        &mut reader,
        "sessions",
        "session",
        json!({ "examId": stale, "name": "Morning" }),
    );
    let _ = create(
        &mut stdin,
        &mut reader,
        "schools",
        "school",
        json!({ "name": "Engineering", "code": "ENG" }),
    );
    let import = request_ok(
        &mut stdin,
        &mut reader,
        "imp",
        "backup.importWorkspaceBundle",
        json!({ "inPath": bundle_path.to_string_lossy() }),
    );
    assert_eq!(
        import.get("bundleFormatDetected").and_then(|v| v.as_str()),
        Some("examd-workspace-v1")
    );
    let exams = request_ok(&mut stdin, &mut reader, "list", "exams.list", json!({}));
    let exams = exams.get("exams").and_then(|v| v.as_array()).expect("exams");
    assert_eq!(exams.len(), 1);
    assert_eq!(exams[0].get("id").and_then(|v| v.as_str()), Some(exam.as_str()));
    let students = request_ok(&mut stdin, &mut reader, "list2", "students.list", json!({}));
    assert_eq!(
        students
            .get("students")
            .and_then(|v| v.as_array())
            .map(|a| a.len()),
        Some(1)
    );
    assert_eq!(list_len(&mut stdin, &mut reader, "sessions"), 0);
    assert_eq!(list_len(&mut stdin, &mut reader, "schools"), 0);
    drop(stdin);
    let _ = child.wait();

    let _ = std::fs::remove_dir_all(source);
    let _ = std::fs::remove_dir_all(target);
    let _ = std::fs::remove_dir_all(out_dir);
}

#[test]
fn tampered_bundle_is_rejected_without_touching_the_store() {
    let workspace = temp_dir("examd-backup-tamper");
    let bundle_path = workspace.join("tampered.zip");

    let f = File::create(&bundle_path).expect("create bundle");
    let mut zip = zip::ZipWriter::new(f);
    let opts = zip::write::FileOptions::default();
    zip.start_file("manifest.json", opts).expect("start manifest");
    zip.write_all(
        json!({
            "format": "examd-workspace-v1",
            "version": 1,
            "entries": { "ems_exams_v1": "0000" }
        })
        .to_string()
        .as_bytes(),
    )
    .expect("write manifest");
    zip.start_file("collections/ems_exams_v1.json", opts)
        .expect("start entry");
    zip.write_all(b"[]").expect("write entry");
    zip.finish().expect("finish zip");

    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, &workspace);
    let _ = create(&mut stdin, &mut reader, "exams", "exam", json!({ "name": "Kept" }));

    let import = request(
        &mut stdin,
        &mut reader,
        "imp",
        "backup.importWorkspaceBundle",
        json!({ "inPath": bundle_path.to_string_lossy() }),
    );
    assert_eq!(error_code(&import), "backup_failed");

    let exams = request_ok(&mut stdin, &mut reader, "list", "exams.list", json!({}));
    assert_eq!(
        exams.get("exams").and_then(|v| v.as_array()).map(|a| a.len()),
        Some(1)
    );

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}
