//! Schools, departments, teachers and courses.

use super::model::{Course, Department, School, Teacher};
use super::{add_record, Store};

impl Store {
    pub fn add_school(&mut self, school: School) -> School {
        let school = add_record(&mut self.schools, school);
        self.flush();
        school
    }

    pub fn update_school(&mut self, school: School) -> bool {
        let hit = self.schools.replace(school);
        self.flush();
        hit
    }

    /// Removes the school and every department under it.
    pub fn delete_school(&mut self, id: &str) -> bool {
        if self.schools.remove(id).is_none() {
            return false;
        }
        let departments: Vec<String> = self
            .departments
            .rows()
            .iter()
            .filter(|d| d.school_id == id)
            .map(|d| d.id.clone())
            .collect();
        for dep in &departments {
            self.drop_department(dep);
        }
        tracing::debug!(school = id, departments = departments.len(), "school deleted");
        self.flush();
        true
    }

    pub fn add_department(&mut self, department: Department) -> Department {
        let department = add_record(&mut self.departments, department);
        self.flush();
        department
    }

    pub fn update_department(&mut self, department: Department) -> bool {
        let hit = self.departments.replace(department);
        self.flush();
        hit
    }

    pub fn delete_department(&mut self, id: &str) -> bool {
        let hit = self.drop_department(id);
        self.flush();
        hit
    }

    pub(super) fn drop_department(&mut self, id: &str) -> bool {
        if self.departments.remove(id).is_none() {
            return false;
        }
        let courses: Vec<String> = self
            .courses
            .rows()
            .iter()
            .filter(|c| c.department_id == id)
            .map(|c| c.id.clone())
            .collect();
        for course in &courses {
            self.drop_course(course);
        }
        self.session_departments.retain(|r| r.department_id != id);
        self.session_halls.retain(|r| r.department_id != id);
        self.hall_assignments.retain(|r| r.department_id != id);
        self.print_statuses.retain(|r| r.department_id != id);
        true
    }

    pub fn add_teacher(&mut self, teacher: Teacher) -> Teacher {
        let teacher = add_record(&mut self.teachers, teacher);
        self.flush();
        teacher
    }

    pub fn update_teacher(&mut self, teacher: Teacher) -> bool {
        let hit = self.teachers.replace(teacher);
        self.flush();
        hit
    }

    /// Courses keep their `teacher_id`; it may dangle afterwards.
    pub fn delete_teacher(&mut self, id: &str) -> bool {
        let hit = self.teachers.remove(id).is_some();
        self.flush();
        hit
    }

    pub fn add_course(&mut self, course: Course) -> Course {
        let course = add_record(&mut self.courses, course);
        self.flush();
        course
    }

    pub fn update_course(&mut self, course: Course) -> bool {
        let hit = self.courses.replace(course);
        self.flush();
        hit
    }

    pub fn delete_course(&mut self, id: &str) -> bool {
        let hit = self.drop_course(id);
        self.flush();
        hit
    }

    pub(super) fn drop_course(&mut self, id: &str) -> bool {
        if self.courses.remove(id).is_none() {
            return false;
        }
        self.session_courses.retain(|r| r.course_id != id);
        self.exam_courses.retain(|r| r.course_id != id);
        self.exam_course_questions.retain(|r| r.course_id != id);
        self.registrations.retain(|r| r.course_id != id);
        true
    }

    pub fn department_courses(&self, department_id: &str) -> Vec<&Course> {
        self.courses
            .rows()
            .iter()
            .filter(|c| c.department_id == department_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::store::testing::store;
    use crate::store::*;

    fn school(name: &str) -> School {
        School {
            id: String::new(),
            name: name.into(),
            code: String::new(),
        }
    }

    fn department(school_id: &str, name: &str) -> Department {
        Department {
            id: String::new(),
            school_id: school_id.into(),
            name: name.into(),
            code: String::new(),
        }
    }

    fn course(department_id: &str, code: &str) -> Course {
        Course {
            id: String::new(),
            department_id: department_id.into(),
            teacher_id: None,
            code: code.into(),
            name: format!("Course {code}"),
            class_level: Some(1),
        }
    }

    #[test]
    fn add_assigns_fresh_id_and_prepends() {
        let mut s = store();
        let a = s.add_school(school("A"));
        let b = s.add_school(school("B"));
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("SCH"));
        assert_eq!(s.schools()[0], b);
        assert_eq!(s.schools().iter().find(|x| x.id == a.id), Some(&a));
    }

    #[test]
    fn update_and_delete_of_unknown_id_are_noops() {
        let mut s = store();
        s.add_school(school("A"));
        let before = s.schools().to_vec();

        let mut ghost = school("Ghost");
        ghost.id = "SCH-missing".into();
        assert!(!s.update_school(ghost));
        assert!(!s.delete_school("SCH-missing"));
        assert_eq!(s.schools(), before.as_slice());
    }

    #[test]
    fn deleting_school_cascades_through_departments_to_courses() {
        let mut s = store();
        let eng = s.add_school(school("Engineering"));
        let arts = s.add_school(school("Arts"));
        let cs = s.add_department(department(&eng.id, "Computer Science"));
        let ee = s.add_department(department(&eng.id, "Electrical"));
        let music = s.add_department(department(&arts.id, "Music"));
        let c1 = s.add_course(course(&cs.id, "CS101"));
        s.add_course(course(&ee.id, "EE201"));
        let m1 = s.add_course(course(&music.id, "MUS110"));

        let exam = s.add_exam(Exam {
            id: String::new(),
            name: "Finals".into(),
            description: None,
            closing_date: String::new(),
            is_active: true,
        });
        s.upsert_exam_course(&exam.id, &c1.id, ExamCoursePatch::default());
        s.upsert_exam_course(&exam.id, &m1.id, ExamCoursePatch::default());

        assert!(s.delete_school(&eng.id));

        assert_eq!(s.schools().len(), 1);
        assert_eq!(s.departments().len(), 1);
        assert_eq!(s.departments()[0].id, music.id);
        assert_eq!(s.courses().len(), 1);
        assert_eq!(s.courses()[0].id, m1.id);
        assert_eq!(s.exam_courses().len(), 1);
        assert_eq!(s.exam_courses()[0].course_id, m1.id);
    }

    #[test]
    fn deleting_department_removes_its_session_links() {
        let mut s = store();
        let sch = s.add_school(school("S"));
        let dep = s.add_department(department(&sch.id, "D"));
        s.add_session_department("SES1", &dep.id);
        s.add_session_hall("SES1", &dep.id, "HAL1");
        s.add_session_hall("SES1", "DEP-other", "HAL1");

        assert!(s.delete_department(&dep.id));
        assert!(s.session_departments().is_empty());
        assert_eq!(s.session_halls().len(), 1);
        assert_eq!(s.session_halls()[0].department_id, "DEP-other");
    }
}
