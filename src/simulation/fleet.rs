//! Vehicles and their availability timelines

use ordered_float::OrderedFloat;

use super::types::VehicleId;

/// A service vehicle
#[derive(Debug, Clone)]
pub struct SimVehicle {
    pub id: VehicleId,
    /// Simulated hour at which the vehicle is free for its next trip
    pub busy_until: OrderedFloat<f64>,
    pub hours_worked: f64,
}

impl SimVehicle {
    pub fn new(id: VehicleId) -> Self {
        Self {
            id,
            busy_until: OrderedFloat(0.0),
            hours_worked: 0.0,
        }
    }

    /// Book a trip of `duration` hours starting at `start`.
    /// Returns the hour the vehicle becomes free again.
    pub fn assign(&mut self, start: f64, duration: f64) -> f64 {
        let end = OrderedFloat(start + duration);
        // start is never before busy_until, so this only moves forward
        self.busy_until = self.busy_until.max(end);
        self.hours_worked += duration;
        self.busy_until.0
    }
}

#[derive(Debug, Clone)]
pub struct Fleet {
    vehicles: Vec<SimVehicle>,
}

impl Fleet {
    /// Create `count` idle vehicles with ids `0..count`
    pub fn new(count: usize) -> Self {
        Self {
            vehicles: (0..count).map(|i| SimVehicle::new(VehicleId(i))).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub fn get(&self, id: VehicleId) -> Option<&SimVehicle> {
        self.vehicles.get(id.0)
    }

    pub fn get_mut(&mut self, id: VehicleId) -> Option<&mut SimVehicle> {
        self.vehicles.get_mut(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SimVehicle> {
        self.vehicles.iter()
    }

    /// Vehicle ids ordered by earliest availability, ties by id
    pub fn by_availability(&self) -> Vec<VehicleId> {
        let mut order: Vec<(OrderedFloat<f64>, VehicleId)> =
            self.vehicles.iter().map(|v| (v.busy_until, v.id)).collect();
        order.sort();
        order.into_iter().map(|(_, id)| id).collect()
    }

    pub fn total_hours_worked(&self) -> f64 {
        self.vehicles.iter().map(|v| v.hours_worked).sum()
    }
}
