//! Buildings and halls.

use super::model::{Building, Hall};
use super::{add_record, Store};

impl Store {
    pub fn add_building(&mut self, building: Building) -> Building {
        let building = add_record(&mut self.buildings, building);
        self.flush();
        building
    }

    pub fn update_building(&mut self, building: Building) -> bool {
        let hit = self.buildings.replace(building);
        self.flush();
        hit
    }

    /// Removes the building, its halls and the proctor slots in it.
    pub fn delete_building(&mut self, id: &str) -> bool {
        if self.buildings.remove(id).is_none() {
            return false;
        }
        let halls: Vec<String> = self
            .halls
            .rows()
            .iter()
            .filter(|h| h.building_id == id)
            .map(|h| h.id.clone())
            .collect();
        for hall in &halls {
            self.drop_hall(hall);
        }
        self.attendant_assignments.retain(|r| r.building_id != id);
        self.flush();
        true
    }

    pub fn add_hall(&mut self, hall: Hall) -> Hall {
        let hall = add_record(&mut self.halls, hall);
        self.flush();
        hall
    }

    pub fn update_hall(&mut self, hall: Hall) -> bool {
        let hit = self.halls.replace(hall);
        self.flush();
        hit
    }

    pub fn delete_hall(&mut self, id: &str) -> bool {
        let hit = self.drop_hall(id);
        self.flush();
        hit
    }

    fn drop_hall(&mut self, id: &str) -> bool {
        if self.halls.remove(id).is_none() {
            return false;
        }
        self.exam_halls.retain(|r| r.hall_id != id);
        self.session_halls.retain(|r| r.hall_id != id);
        self.hall_assignments.retain(|r| r.hall_id != id);
        self.print_statuses.retain(|r| r.hall_id != id);
        self.attendant_assignments
            .retain(|r| r.hall_id.as_deref() != Some(id));
        true
    }
}
