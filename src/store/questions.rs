//! Question bank and the per exam-course question sets.

use std::collections::BTreeSet;

use super::model::{ExamCourseQuestion, Question, Topic};
use super::{add_record, join_row, triple, Store};
use crate::ids::now_stamp;

/// Equal share of 100 points, rounded to 2 decimals. The shares of a group
/// need not add up to exactly 100 (3 questions give 33.33 each).
pub fn round_points(count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    ((100.0 / count as f64) * 100.0).round() / 100.0
}

impl Store {
    pub fn add_topic(&mut self, topic: Topic) -> Topic {
        let topic = add_record(&mut self.topics, topic);
        self.flush();
        topic
    }

    pub fn update_topic(&mut self, topic: Topic) -> bool {
        let hit = self.topics.replace(topic);
        self.flush();
        hit
    }

    /// Questions under the topic stay in the bank without a topic.
    pub fn delete_topic(&mut self, id: &str) -> bool {
        if self.topics.remove(id).is_none() {
            return false;
        }
        self.questions
            .modify_where(|q| q.topic_id.as_deref() == Some(id), |q| q.topic_id = None);
        self.flush();
        true
    }

    pub fn add_question(&mut self, mut question: Question) -> Question {
        if question.created_at.is_empty() {
            question.created_at = now_stamp();
        }
        let question = add_record(&mut self.questions, question);
        self.flush();
        question
    }

    pub fn update_question(&mut self, question: Question) -> bool {
        let hit = self.questions.replace(question);
        self.flush();
        hit
    }

    /// Removes the question from every exam set it belonged to and
    /// rebalances those sets.
    pub fn delete_question(&mut self, id: &str) -> bool {
        if self.questions.remove(id).is_none() {
            return false;
        }
        let removed = self.exam_course_questions.retain(|r| r.question_id != id);
        let groups: BTreeSet<(String, String)> = removed
            .into_iter()
            .map(|r| (r.exam_id, r.course_id))
            .collect();
        for (exam_id, course_id) in &groups {
            self.rebalance_points(exam_id, course_id);
        }
        self.flush();
        true
    }

    /// Adds the questions to the (exam, course) set, skipping ones already
    /// in it, then spreads 100 points over the whole set. Returns how many
    /// were added.
    pub fn assign_questions_to_exam(
        &mut self,
        exam_id: &str,
        course_id: &str,
        question_ids: &[String],
    ) -> usize {
        let mut added = 0;
        for question_id in question_ids {
            let inserted = self.exam_course_questions.insert(join_row(ExamCourseQuestion {
                id: String::new(),
                exam_id: exam_id.to_string(),
                course_id: course_id.to_string(),
                question_id: question_id.clone(),
                points: 0.0,
            }));
            if inserted {
                added += 1;
            }
        }
        self.rebalance_points(exam_id, course_id);
        self.flush();
        added
    }

    pub fn remove_question_from_exam(
        &mut self,
        exam_id: &str,
        course_id: &str,
        question_id: &str,
    ) -> bool {
        let hit = !self
            .exam_course_questions
            .remove_key(&triple(exam_id, course_id, question_id))
            .is_empty();
        if hit {
            self.rebalance_points(exam_id, course_id);
        }
        self.flush();
        hit
    }

    /// Returns the per-question share now in effect.
    pub fn recalculate_points(&mut self, exam_id: &str, course_id: &str) -> f64 {
        let points = self.rebalance_points(exam_id, course_id);
        self.flush();
        points
    }

    pub fn exam_course_question_set(
        &self,
        exam_id: &str,
        course_id: &str,
    ) -> Vec<&ExamCourseQuestion> {
        self.exam_course_questions
            .rows()
            .iter()
            .filter(|r| r.exam_id == exam_id && r.course_id == course_id)
            .collect()
    }

    fn rebalance_points(&mut self, exam_id: &str, course_id: &str) -> f64 {
        let in_group = |r: &ExamCourseQuestion| r.exam_id == exam_id && r.course_id == course_id;
        let count = self
            .exam_course_questions
            .rows()
            .iter()
            .filter(|r| in_group(*r))
            .count();
        let points = round_points(count);
        self.exam_course_questions
            .modify_where(in_group, |r| r.points = points);
        points
    }
}
