//! Device Entity
//!
//! A robot registered with the fleet. `password` is the device's own login
//! and never leaves the server.

use chrono::{DateTime, Utc};
use kernel::id::Id;
use kernel::repository::Entity;

use crate::domain::value_object::{
    device_kind::{Company, DeviceStatus, DeviceType},
    ids::DeviceId,
};

#[derive(Debug, Clone)]
pub struct Device {
    pub id: DeviceId,
    pub device_type: DeviceType,
    pub company: Company,
    pub ip: Option<String>,
    pub port: i32,
    pub user_name: Option<String>,
    pub password: Option<String>,
    pub status: DeviceStatus,
    pub extra_info: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Device {
    /// Create an offline device
    pub fn new(device_type: DeviceType, company: Company, port: i32) -> Self {
        let now = Utc::now();

        Self {
            id: Id::unassigned(),
            device_type,
            company,
            ip: None,
            port,
            user_name: None,
            password: None,
            status: DeviceStatus::Offline,
            extra_info: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Entity for Device {
    const NAME: &'static str = "device";

    fn id(&self) -> Id<Self> {
        self.id
    }

    fn set_id(&mut self, id: Id<Self>) {
        self.id = id;
    }
}
