mod test_support;

use serde_json::json;
use test_support::{create, request_ok, select_workspace, spawn_sidecar, temp_dir};

fn points_of(result: &serde_json::Value) -> Vec<f64> {
    result
        .get("questions")
        .and_then(|v| v.as_array())
        .expect("questions")
        .iter()
        .map(|q| q.get("points").and_then(|v| v.as_f64()).expect("points"))
        .collect()
}

#[test]
fn points_are_spread_evenly_per_exam_course_group() {
    let workspace = temp_dir("examd-points");
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, &workspace);

    let mut questions = Vec::new();
    for i in 0..4 {
        questions.push(create(
            &mut stdin,
            &mut reader,
            "questions",
            "question",
            json!({
                "courseId": "CRS-1",
                "type": "TEST",
                "text": format!("Question {}", i + 1),
                "options": ["a", "b", "c", "d"],
                "correctAnswer": 0
            }),
        ));
    }

    let four = request_ok(
        &mut stdin,
        &mut reader,
        "a1",
        "examCourseQuestions.assign",
        json!({ "examId": "EXM-1", "courseId": "CRS-1", "questionIds": questions }),
    );
    assert_eq!(four.get("added").and_then(|v| v.as_u64()), Some(4));
    assert_eq!(points_of(&four), vec![25.0; 4]);

    let other = request_ok(
        &mut stdin,
        &mut reader,
        "a2",
        "examCourseQuestions.assign",
        json!({ "examId": "EXM-2", "courseId": "CRS-1", "questionIds": [questions[0]] }),
    );
    assert_eq!(points_of(&other), vec![100.0]);

    let removed = request_ok(
        &mut stdin,
        &mut reader,
        "r1",
        "examCourseQuestions.remove",
        json!({ "examId": "EXM-1", "courseId": "CRS-1", "questionId": questions[3] }),
    );
    assert_eq!(removed, json!({ "removed": true }));
    let three = request_ok(
        &mut stdin,
        &mut reader,
        "l1",
        "examCourseQuestions.list",
        json!({ "examId": "EXM-1", "courseId": "CRS-1" }),
    );
    assert_eq!(points_of(&three), vec![33.33; 3]);

    let untouched = request_ok(
        &mut stdin,
        &mut reader,
        "l2",
        "examCourseQuestions.list",
        json!({ "examId": "EXM-2", "courseId": "CRS-1" }),
    );
    assert_eq!(points_of(&untouched), vec![100.0]);

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "d1",
        "questions.delete",
        json!({ "id": questions[0] }),
    );
    let two = request_ok(
        &mut stdin,
        &mut reader,
        "l3",
        "examCourseQuestions.list",
        json!({ "examId": "EXM-1", "courseId": "CRS-1" }),
    );
    assert_eq!(points_of(&two), vec![50.0; 2]);
    let emptied = request_ok(
        &mut stdin,
        &mut reader,
        "l4",
        "examCourseQuestions.list",
        json!({ "examId": "EXM-2", "courseId": "CRS-1" }),
    );
    assert!(points_of(&emptied).is_empty());

    let recalculated = request_ok(
        &mut stdin,
        &mut reader,
        "rc",
        "examCourseQuestions.recalculate",
        json!({ "examId": "EXM-1", "courseId": "CRS-1" }),
    );
    assert_eq!(recalculated.get("points").and_then(|v| v.as_f64()), Some(50.0));

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}
