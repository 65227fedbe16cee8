//! Proctors, their duty slots and their requests for duty.

use serde::Deserialize;

use super::model::{
    AssignmentStatus, Attendant, AttendantAssignment, TaskRequest, TaskRequestStatus,
};
use super::{add_record, join_row, pair, Store};
use crate::ids::now_stamp;

/// Where an approved task request lands.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DutySlot {
    pub building_id: String,
    pub role_name: String,
    pub hall_id: Option<String>,
}

impl Store {
    pub fn add_attendant(&mut self, attendant: Attendant) -> Attendant {
        let attendant = add_record(&mut self.attendants, attendant);
        self.flush();
        attendant
    }

    pub fn update_attendant(&mut self, attendant: Attendant) -> bool {
        let hit = self.attendants.replace(attendant);
        self.flush();
        hit
    }

    pub fn toggle_attendant_status(&mut self, id: &str) -> bool {
        let hit = self.attendants.modify(id, |a| a.is_active = !a.is_active);
        self.flush();
        hit
    }

    pub fn delete_attendant(&mut self, id: &str) -> bool {
        if self.attendants.remove(id).is_none() {
            return false;
        }
        self.attendant_assignments.retain(|r| r.attendant_id != id);
        self.task_requests.retain(|r| r.attendant_id != id);
        self.flush();
        true
    }

    /// Fills or clears one duty slot. Whatever occupies
    /// (session, building, role, hall) is removed first; an empty
    /// `attendant_id` leaves the slot empty.
    pub fn update_attendant_assignment(
        &mut self,
        session_id: &str,
        building_id: &str,
        role_name: &str,
        attendant_id: &str,
        hall_id: Option<&str>,
    ) -> Option<AttendantAssignment> {
        let hall_id = hall_id.filter(|h| !h.is_empty()).map(str::to_string);
        let key = (
            session_id.to_string(),
            building_id.to_string(),
            role_name.to_string(),
            hall_id.clone(),
        );
        self.attendant_assignments.remove_key(&key);

        let assigned = if attendant_id.is_empty() {
            None
        } else {
            let row = join_row(AttendantAssignment {
                id: String::new(),
                session_id: session_id.to_string(),
                building_id: building_id.to_string(),
                hall_id,
                role_name: role_name.to_string(),
                attendant_id: attendant_id.to_string(),
                status: AssignmentStatus::Assigned,
            });
            self.attendant_assignments.insert(row.clone());
            Some(row)
        };
        self.flush();
        assigned
    }

    /// The proctor's answer to an assignment.
    pub fn respond_attendant_assignment(&mut self, id: &str, status: AssignmentStatus) -> bool {
        let hit = self.attendant_assignments.modify_id(id, |r| r.status = status);
        self.flush();
        hit
    }

    pub fn add_task_request(&mut self, attendant_id: &str, session_id: &str) -> bool {
        let added = self.task_requests.insert(join_row(TaskRequest {
            id: String::new(),
            attendant_id: attendant_id.to_string(),
            session_id: session_id.to_string(),
            status: TaskRequestStatus::Pending,
            requested_at: now_stamp(),
        }));
        self.flush();
        added
    }

    pub fn remove_task_request(&mut self, attendant_id: &str, session_id: &str) -> bool {
        let hit = !self
            .task_requests
            .remove_key(&pair(attendant_id, session_id))
            .is_empty();
        self.flush();
        hit
    }

    /// Approves or rejects a pending request. An approval with a slot also
    /// assigns the requesting proctor to it.
    pub fn resolve_task_request(
        &mut self,
        id: &str,
        approve: bool,
        slot: Option<DutySlot>,
    ) -> bool {
        let Some(request) = self.task_requests.get(id).cloned() else {
            return false;
        };
        let status = if approve {
            TaskRequestStatus::Approved
        } else {
            TaskRequestStatus::Rejected
        };
        self.task_requests.modify_id(id, |r| r.status = status);
        if let (true, Some(slot)) = (approve, slot) {
            self.update_attendant_assignment(
                &request.session_id,
                &slot.building_id,
                &slot.role_name,
                &request.attendant_id,
                slot.hall_id.as_deref(),
            );
        }
        self.flush();
        true
    }
}
