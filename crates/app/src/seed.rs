//! Session seed: the state every page starts from.
//!
//! The panel has no persistence: each session begins from the same
//! orchard layout built here.

use chrono::{Duration, NaiveTime, Weekday};

use orchard_domain::climate::{ClimateControl, ClimateZone};
use orchard_domain::device::{Device, DeviceKind, DeviceRegistry, DeviceStatus};
use orchard_domain::error::OrchardError;
use orchard_domain::irrigation::{
    IrrigationControl, IrrigationZone, IrrigationZoneBuilder, Reservoir, WateringSchedule,
};
use orchard_domain::lighting::{Color, LightingControl, LightingZone};
use orchard_domain::media::{Broadcast, BroadcastDays, Player, ScheduledBroadcast, Track};
use orchard_domain::mode::{ControlMode, LightingMode};
use orchard_domain::system::SystemState;
use orchard_domain::time::now;

/// Initial state for every control page.
#[derive(Debug, Clone)]
pub struct Session {
    pub climate: ClimateControl,
    pub irrigation: IrrigationControl,
    pub advanced_irrigation: IrrigationControl,
    pub lighting: LightingControl,
    pub devices: DeviceRegistry,
    pub player: Player,
    pub broadcast: Broadcast,
    pub reservoir: Reservoir,
}

impl Session {
    /// Build the standard orchard layout.
    ///
    /// # Errors
    ///
    /// Returns an error if any seeded value violates a domain invariant.
    pub fn orchard() -> Result<Self, OrchardError> {
        Ok(Self {
            climate: climate()?,
            irrigation: irrigation()?,
            advanced_irrigation: advanced_irrigation()?,
            lighting: lighting()?,
            devices: devices()?,
            player: player()?,
            broadcast: broadcast(),
            reservoir: Reservoir {
                water_level: 85.0,
                pressure: 3.5,
            },
        })
    }
}

fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

fn climate() -> Result<ClimateControl, OrchardError> {
    let zone = |name: &str,
                active: bool,
                temperature: (f64, f64),
                humidity: (f64, f64),
                mode: ControlMode|
     -> Result<ClimateZone, OrchardError> {
        ClimateZone::builder()
            .name(name)
            .active(active)
            .temperature(temperature.0, temperature.1)
            .humidity(humidity.0, humidity.1)
            .mode(mode)
            .build()
    };
    ClimateControl::new(
        SystemState::new(true, true, ControlMode::Auto),
        vec![
            zone("Greenhouse", true, (24.0, 25.0), (65.0, 70.0), ControlMode::Auto)?,
            zone("Nursery", true, (26.0, 26.0), (75.0, 75.0), ControlMode::Auto)?,
            zone("Storage", false, (18.0, 18.0), (50.0, 50.0), ControlMode::Manual)?,
            zone("Office", true, (22.0, 22.0), (55.0, 55.0), ControlMode::Auto)?,
        ],
    )
}

struct Block {
    name: &'static str,
    active: bool,
    moisture: f64,
    threshold: f64,
    mode: ControlMode,
    schedule: WateringSchedule,
    flow_rate: f64,
}

fn blocks() -> [Block; 4] {
    [
        Block {
            name: "Apples",
            active: false,
            moisture: 65.0,
            threshold: 40.0,
            mode: ControlMode::Auto,
            schedule: WateringSchedule {
                days: vec![Weekday::Mon, Weekday::Wed, Weekday::Fri],
                start: at(7, 0),
                duration_minutes: Some(30),
            },
            flow_rate: 4.0,
        },
        Block {
            name: "Pears",
            active: true,
            moisture: 35.0,
            threshold: 35.0,
            mode: ControlMode::Manual,
            schedule: WateringSchedule {
                days: vec![Weekday::Tue, Weekday::Thu, Weekday::Sat],
                start: at(6, 30),
                duration_minutes: Some(45),
            },
            flow_rate: 5.0,
        },
        Block {
            name: "Grapes",
            active: false,
            moisture: 70.0,
            threshold: 45.0,
            mode: ControlMode::Auto,
            schedule: WateringSchedule {
                days: vec![Weekday::Mon, Weekday::Thu],
                start: at(17, 0),
                duration_minutes: Some(25),
            },
            flow_rate: 3.0,
        },
        Block {
            name: "Vegetables",
            active: false,
            moisture: 50.0,
            threshold: 50.0,
            mode: ControlMode::Auto,
            schedule: WateringSchedule {
                duration_minutes: Some(20),
                ..WateringSchedule::daily(at(6, 0))
            },
            flow_rate: 2.5,
        },
    ]
}

fn block_builder(block: Block) -> IrrigationZoneBuilder {
    IrrigationZone::builder()
        .name(block.name)
        .active(block.active)
        .moisture(block.moisture)
        .threshold(block.threshold)
        .mode(block.mode)
        .schedule(block.schedule)
        .flow_rate(block.flow_rate)
}

fn irrigation() -> Result<IrrigationControl, OrchardError> {
    let zones = blocks()
        .into_iter()
        .map(|block| block_builder(block).build())
        .collect::<Result<Vec<_>, _>>()?;
    IrrigationControl::new(SystemState::new(true, false, ControlMode::Auto), zones)
}

fn advanced_irrigation() -> Result<IrrigationControl, OrchardError> {
    // (usage L/h, efficiency %, soil, crop, water saving)
    let details = [
        (120.0, 85.0, "sandy loam", "apple trees", true),
        (150.0, 80.0, "clay", "pear trees", false),
        (90.0, 90.0, "loam", "grapes", true),
        (80.0, 95.0, "humus", "mixed vegetables", true),
    ];
    let zones = blocks()
        .into_iter()
        .zip(details)
        .map(|(block, (usage, efficiency, soil, crop, saving))| {
            block_builder(block)
                .water_usage(usage)
                .efficiency(efficiency)
                .soil_type(soil)
                .crop_type(crop)
                .water_saving(saving)
                .build()
        })
        .collect::<Result<Vec<_>, _>>()?;
    IrrigationControl::new(SystemState::new(true, true, ControlMode::Auto), zones)
}

fn lighting() -> Result<LightingControl, OrchardError> {
    let zone = |name: &str,
                on: bool,
                brightness: f64,
                color: &str,
                mode: ControlMode,
                schedule: (NaiveTime, NaiveTime)|
     -> Result<LightingZone, OrchardError> {
        let color: Color = color.parse()?;
        LightingZone::builder()
            .name(name)
            .on(on)
            .brightness(brightness)
            .color(color)
            .mode(mode)
            .schedule(schedule.0, schedule.1)
            .build()
    };
    LightingControl::new(
        SystemState::new(true, true, LightingMode::Day),
        vec![
            zone("Main", true, 75.0, "#FFEB3B", ControlMode::Auto, (at(6, 0), at(19, 0)))?,
            zone("Nursery", true, 85.0, "#8BC34A", ControlMode::Manual, (at(5, 30), at(20, 0)))?,
            zone("Storage", false, 60.0, "#FFFFFF", ControlMode::Auto, (at(7, 0), at(18, 0)))?,
            zone("Office", false, 70.0, "#FFF9C4", ControlMode::Auto, (at(8, 0), at(17, 0)))?,
        ],
    )
}

fn devices() -> Result<DeviceRegistry, OrchardError> {
    let ts = now();
    DeviceRegistry::new(vec![
        Device::builder()
            .name("Temp-A1")
            .kind(DeviceKind::Sensor)
            .location("Apples")
            .status(DeviceStatus::Online)
            .battery(85)
            .signal_strength(90)
            .last_active(ts - Duration::minutes(5))
            .build()?,
        Device::builder()
            .name("Valve-B2")
            .kind(DeviceKind::Controller)
            .location("Pears")
            .status(DeviceStatus::Online)
            .battery(72)
            .signal_strength(85)
            .last_active(ts)
            .build()?,
        Device::builder()
            .name("Light-C3")
            .kind(DeviceKind::Sensor)
            .location("Grapes")
            .status(DeviceStatus::Offline)
            .battery(15)
            .signal_strength(0)
            .last_active(ts - Duration::hours(2))
            .build()?,
        Device::builder()
            .name("Humidity-D4")
            .kind(DeviceKind::Sensor)
            .location("Vegetables")
            .status(DeviceStatus::Warning)
            .battery(45)
            .signal_strength(60)
            .last_active(ts - Duration::minutes(10))
            .build()?,
        Device::builder()
            .name("Camera-E5")
            .kind(DeviceKind::Camera)
            .location("Warehouse")
            .status(DeviceStatus::Online)
            .battery(90)
            .signal_strength(95)
            .last_active(ts)
            .build()?,
    ])
}

fn player() -> Result<Player, OrchardError> {
    let mut player = Player::new(vec![
        Track::new("Dawn Melody", "Sounds of Nature", 185, "calm"),
        Track::new("Forest After Rain", "Sounds of Nature", 237, "calm"),
        Track::new("Harvest Song", "Folk Collection", 198, "lively"),
        Track::new("Country Tune", "Folk Collection", 210, "lively"),
        Track::new("Night Crickets", "Sounds of Nature", 245, "calm"),
    ])?;
    player.next_track();
    player.seek(75);
    player.play_pause();
    Ok(player)
}

fn broadcast() -> Broadcast {
    let entry = |time: NaiveTime, message: &str, days: BroadcastDays| ScheduledBroadcast {
        time,
        message: message.to_string(),
        days,
    };
    Broadcast {
        enabled: false,
        volume: 85,
        last_broadcast: None,
        schedule: vec![
            entry(at(8, 0), "Morning weather forecast", BroadcastDays::Daily),
            entry(at(12, 0), "Midday reminder", BroadcastDays::Weekdays),
            entry(at(18, 0), "Evening summary", BroadcastDays::Weekdays),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orchard_domain::zone::Zone;

    #[test]
    fn should_build_orchard_session() {
        let session = Session::orchard().unwrap();
        assert_eq!(session.climate.zones().len(), 4);
        assert_eq!(session.irrigation.zones().len(), 4);
        assert_eq!(session.lighting.zones().len(), 4);
        assert_eq!(session.devices.devices().len(), 5);
    }

    #[test]
    fn should_start_player_on_second_track() {
        let session = Session::orchard().unwrap();
        assert_eq!(session.player.current_track().title, "Forest After Rain");
        assert_eq!(session.player.position_secs(), 75);
        assert!(session.player.playing);
    }

    #[test]
    fn should_seed_advanced_blocks_with_details() {
        let session = Session::orchard().unwrap();
        let pears = session.advanced_irrigation.zone_by_name("Pears").unwrap();
        assert!(pears.is_active());
        assert!(!pears.water_saving);
        assert_eq!(pears.crop_type.as_deref(), Some("pear trees"));

        let basic = session.irrigation.zone_by_name("Pears").unwrap();
        assert!(basic.crop_type.is_none());
    }
}
