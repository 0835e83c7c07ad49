//! The control panel: every page's service wired to one publisher.

use serde::Serialize;

use orchard_domain::climate::ClimateZone;
use orchard_domain::device::DeviceStatus;
use orchard_domain::event::Subsystem;
use orchard_domain::irrigation::{IrrigationZone, Reservoir};
use orchard_domain::lighting::LightingZone;
use orchard_domain::zone::Zone;

use crate::ports::EventPublisher;
use crate::seed::Session;
use crate::services::device_service::DeviceService;
use crate::services::media_service::MediaService;
use crate::services::zone_service::ZoneService;

/// All pages of one panel session.
pub struct ControlPanel<P> {
    pub climate: ZoneService<ClimateZone, P>,
    pub irrigation: ZoneService<IrrigationZone, P>,
    pub advanced_irrigation: ZoneService<IrrigationZone, P>,
    pub lighting: ZoneService<LightingZone, P>,
    pub devices: DeviceService<P>,
    pub media: MediaService<P>,
    pub reservoir: Reservoir,
}

/// Headline figures for one zone page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    pub subsystem: Subsystem,
    pub enabled: bool,
    pub saving_mode: bool,
    pub active_zones: usize,
    pub total_zones: usize,
}

/// Dashboard view across every page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overview {
    pub pages: Vec<PageSummary>,
    pub devices_online: usize,
    pub devices_total: usize,
    pub music_playing: bool,
    pub now_playing: String,
}

impl<P: EventPublisher + Clone> ControlPanel<P> {
    pub fn new(session: Session, publisher: P) -> Self {
        Self {
            climate: ZoneService::new(Subsystem::Climate, session.climate, publisher.clone()),
            irrigation: ZoneService::new(
                Subsystem::Irrigation,
                session.irrigation,
                publisher.clone(),
            ),
            advanced_irrigation: ZoneService::new(
                Subsystem::AdvancedIrrigation,
                session.advanced_irrigation,
                publisher.clone(),
            ),
            lighting: ZoneService::new(Subsystem::Lighting, session.lighting, publisher.clone()),
            devices: DeviceService::new(session.devices, publisher.clone()),
            media: MediaService::new(session.player, session.broadcast, publisher),
            reservoir: session.reservoir,
        }
    }
}

impl<P: EventPublisher> ControlPanel<P> {
    #[must_use]
    pub fn overview(&self) -> Overview {
        let registry = self.devices.registry();
        let player = self.media.player();
        Overview {
            pages: vec![
                summary(&self.climate),
                summary(&self.irrigation),
                summary(&self.advanced_irrigation),
                summary(&self.lighting),
            ],
            devices_online: registry.count_by_status(DeviceStatus::Online),
            devices_total: registry.devices().len(),
            music_playing: player.playing,
            now_playing: player.current_track().title.clone(),
        }
    }
}

fn summary<Z, P>(service: &ZoneService<Z, P>) -> PageSummary
where
    Z: Zone,
    Z::SystemMode: Serialize,
    P: EventPublisher,
{
    let control = service.control();
    PageSummary {
        subsystem: service.subsystem(),
        enabled: control.system().enabled,
        saving_mode: control.system().saving_mode,
        active_zones: control.active_count(),
        total_zones: control.zones().len(),
    }
}
