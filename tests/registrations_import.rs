mod test_support;

use serde_json::json;
use test_support::{create, list_len, request_ok, select_workspace, spawn_sidecar, temp_dir};

#[test]
fn import_resolves_codes_against_exam_courses_and_counts_duplicates() {
    let workspace = temp_dir("examd-import");
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, &workspace);

    let school = create(
        &mut stdin,
        &mut reader,
        "schools",
        "school",
        json!({ "name": "Business" }),
    );
    let dep = create(
        &mut stdin,
        &mut reader,
        "departments",
        "department",
        json!({ "schoolId": school, "name": "Management" }),
    );
    let yon701 = create(
        &mut stdin,
        &mut reader,
        "courses",
        "course",
        json!({ "departmentId": dep, "code": "YON701", "name": "Strategy" }),
    );
    let _ = create(
        &mut stdin,
        &mut reader,
        "courses",
        "course",
        json!({ "departmentId": dep, "code": "YON702", "name": "Not in this exam" }),
    );
    let exam = create(&mut stdin, &mut reader, "exams", "exam", json!({ "name": "Spring Finals" }));
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "ec",
        "examCourses.add",
        json!({ "examId": exam, "courseId": yon701, "questionCount": 20, "duration": 45 }),
    );
    let existing = create(
        &mut stdin,
        &mut reader,
        "students",
        "student",
        json!({ "studentNumber": "2024001", "firstName": "Ayşe", "lastName": "Yılmaz" }),
    );

    let summary = request_ok(
        &mut stdin,
        &mut reader,
        "imp",
        "registrations.import",
        json!({
            "examId": exam,
            "rows": [
                ["2024001", "Ayşe", "Yılmaz", "YON701"],
                ["2024002", "Mehmet", "Kaya", " yon701 "],
                ["2024002", "Mehmet", "Kaya", "YON701"],
                ["2024003", "Zeynep", "Demir", "YON702"],
                ["2024004", "Ali"]
            ]
        }),
    );
    assert_eq!(summary.get("total").and_then(|v| v.as_u64()), Some(5));
    assert_eq!(summary.get("success").and_then(|v| v.as_u64()), Some(2));
    assert_eq!(summary.get("duplicates").and_then(|v| v.as_u64()), Some(1));
    assert_eq!(summary.get("skipped").and_then(|v| v.as_u64()), Some(2));
    assert_eq!(summary.get("studentsCreated").and_then(|v| v.as_u64()), Some(1));
    assert_eq!(list_len(&mut stdin, &mut reader, "students"), 2);

    let again = request_ok(
        &mut stdin,
        &mut reader,
        "imp2",
        "registrations.import",
        json!({ "examId": exam, "rows": [["2024001", "Ayşe", "Yılmaz", "YON701"]] }),
    );
    assert_eq!(again.get("success").and_then(|v| v.as_u64()), Some(0));
    assert_eq!(again.get("duplicates").and_then(|v| v.as_u64()), Some(1));

    let removed = request_ok(
        &mut stdin,
        &mut reader,
        "rm",
        "registrations.remove",
        json!({ "examId": exam, "courseId": yon701, "studentId": existing }),
    );
    assert_eq!(removed, json!({ "removed": true }));
    let readded = request_ok(
        &mut stdin,
        &mut reader,
        "add",
        "registrations.add",
        json!({ "examId": exam, "courseId": yon701, "studentId": existing }),
    );
    assert_eq!(readded, json!({ "added": true }));

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}
