//! Device management

use std::sync::Arc;

use kernel::pagination::{Page, PageRequest};
use kernel::patch::Patch;
use kernel::repository::not_found;

use crate::application::rules;
use crate::domain::entity::device::Device;
use crate::domain::repository::DeviceRepository;
use crate::domain::value_object::{
    device_kind::{Company, DeviceStatus, DeviceType},
    ids::DeviceId,
};
use crate::error::{FleetError, FleetResult};

pub struct CreateDeviceInput {
    pub device_type: String,
    pub company: String,
    pub ip: Option<String>,
    pub port: i32,
    pub user_name: Option<String>,
    pub password: Option<String>,
    pub extra_info: Option<String>,
}

/// Absent fields are left unchanged
#[derive(Default)]
pub struct UpdateDeviceInput {
    pub device_type: Option<String>,
    pub company: Option<String>,
    pub ip: Patch<String>,
    pub port: Option<i32>,
    pub user_name: Patch<String>,
    pub password: Patch<String>,
    pub status: Option<String>,
    pub extra_info: Patch<String>,
}

pub struct DeviceService<D>
where
    D: DeviceRepository,
{
    devices: Arc<D>,
}

impl<D> DeviceService<D>
where
    D: DeviceRepository,
{
    pub fn new(devices: Arc<D>) -> Self {
        Self { devices }
    }

    /// Register a device; it always starts `offline`
    pub async fn create(&self, input: CreateDeviceInput) -> FleetResult<Device> {
        let mut device = Device::new(
            parse_type(&input.device_type)?,
            parse_company(&input.company)?,
            rules::port(input.port)?,
        );
        device.ip = input.ip;
        device.user_name = input.user_name;
        device.password = input.password;
        device.extra_info = input.extra_info;

        let device = self.devices.create(device).await?;
        tracing::info!(device_id = %device.id, device_type = %device.device_type, "Device created");
        Ok(device)
    }

    pub async fn update(&self, id: DeviceId, input: UpdateDeviceInput) -> FleetResult<()> {
        let mut device = self.get(id).await?;

        if let Some(code) = input.device_type {
            device.device_type = parse_type(&code)?;
        }
        if let Some(code) = input.company {
            device.company = parse_company(&code)?;
        }
        if let Some(port) = input.port {
            device.port = rules::port(port)?;
        }
        if let Some(code) = input.status {
            device.status = parse_status(&code)?;
        }
        input.ip.apply_to(&mut device.ip);
        input.user_name.apply_to(&mut device.user_name);
        input.password.apply_to(&mut device.password);
        input.extra_info.apply_to(&mut device.extra_info);
        device.touch();

        self.devices.update(&device).await?;
        tracing::info!(device_id = %id, status = %device.status, "Device updated");
        Ok(())
    }

    pub async fn delete(&self, id: DeviceId) -> FleetResult<()> {
        self.devices.delete(id).await?;
        tracing::info!(device_id = %id, "Device deleted");
        Ok(())
    }

    pub async fn get(&self, id: DeviceId) -> FleetResult<Device> {
        self.devices
            .find_by_id(id)
            .await?
            .ok_or_else(|| FleetError::from(not_found(id)))
    }

    pub async fn list(&self, request: PageRequest) -> FleetResult<Page<Device>> {
        let window = request.resolve();
        let (items, total) = self.devices.find_page(window).await?;
        Ok(Page::new(items, total, window))
    }
}

fn parse_type(code: &str) -> FleetResult<DeviceType> {
    DeviceType::from_code(code).ok_or_else(|| {
        FleetError::Validation("type must be one of robot_wheel, robot_biped".to_string())
    })
}

fn parse_company(code: &str) -> FleetResult<Company> {
    Company::from_code(code)
        .ok_or_else(|| FleetError::Validation("company must be cyborg".to_string()))
}

fn parse_status(code: &str) -> FleetResult<DeviceStatus> {
    DeviceStatus::from_code(code).ok_or_else(|| {
        FleetError::Validation("status must be one of offline, online, busy, error".to_string())
    })
}
