use crate::agents::AgentKind;
use crate::geom::Vec3;
use crate::personality::Personality;
use crate::spline::point::PointId;
use rand::Rng;
use std::collections::HashSet;

pub type ZoneId = String; // Alias for ZoneId

/// Spatial predicate deciding whether a zone governs a position.
#[derive(Debug, Clone)]
pub enum ZonePredicate {
    /// Membership in a named set of spline points (preferred).
    PointSet(HashSet<PointId>),
    /// Axis-aligned rectangle in the ground (XZ) plane (fallback).
    WorldRect {
        min_x: f32,
        min_z: f32,
        max_x: f32,
        max_z: f32,
    },
}

impl ZonePredicate {
    /// Whether the predicate matches the given point/position pair.
    pub fn matches(&self, point_id: PointId, world_pos: &Vec3) -> bool {
        match self {
            ZonePredicate::PointSet(points) => points.contains(&point_id),
            ZonePredicate::WorldRect {
                min_x,
                min_z,
                max_x,
                max_z,
            } => {
                world_pos.x >= *min_x
                    && world_pos.x <= *max_x
                    && world_pos.z >= *min_z
                    && world_pos.z <= *max_z
            }
        }
    }
}

/// Personality distribution of the drivers spawned in a zone.
///
/// The three ratios must sum to at most 1; the remainder is the probability
/// of a very aggressive driver.
#[derive(Debug, Clone, Copy)]
pub struct DriverProfile {
    pub timid_ratio: f64,
    pub normal_ratio: f64,
    pub aggressive_ratio: f64,
}

impl DriverProfile {
    /// Constructs a new profile from the three ratios.
    pub fn new(timid_ratio: f64, normal_ratio: f64, aggressive_ratio: f64) -> Self {
        Self {
            timid_ratio,
            normal_ratio,
            aggressive_ratio,
        }
    }

    /// Draws a personality from this profile.
    pub fn draw(&self, rng: &mut impl Rng) -> Personality {
        Personality::random_personality_with(
            rng,
            self.timid_ratio,
            self.normal_ratio,
            self.aggressive_ratio,
        )
    }
}

/// One named region of the road.
#[derive(Debug, Clone)]
pub struct Zone {
    /// Unique zone identifier; also the key of configuration overrides.
    pub id: ZoneId,
    /// Spatial predicate; first matching zone wins.
    pub predicate: ZonePredicate,
    /// Number of lanes in this region.
    pub lane_count: u8,
    /// Factor applied to the base density target.
    pub density_multiplier: f64,
    /// Speed-limit cap for vehicles spawned here (m/s).
    pub speed_limit: f32,
    /// Probability of spawning a truck rather than a car.
    pub truck_ratio: f64,
    /// Personality distribution of spawned drivers.
    pub profile: DriverProfile,
    /// Disabled zones never spawn; set through configuration overrides.
    pub enabled: bool,
}

impl Zone {
    /// Constructs a new `ZoneBuilder` for building a `Zone` object.
    ///
    /// # Arguments
    /// * `id` - A unique identifier for the zone.
    ///
    /// # Example
    /// ```
    /// use traffic_ai_core::zones::{Zone, ZonePredicate};
    /// let zone = Zone::new("highway")
    ///     .with_predicate(ZonePredicate::WorldRect {
    ///         min_x: -1000.0, min_z: -1000.0, max_x: 1000.0, max_z: 1000.0,
    ///     })
    ///     .with_speed_limit(33.0)
    ///     .with_lane_count(3)
    ///     .build();
    /// println!("Zone: {:?}", zone);
    /// ```
    pub fn new(id: impl Into<ZoneId>) -> ZoneBuilder {
        ZoneBuilder {
            zone: Zone {
                id: id.into(),
                predicate: ZonePredicate::PointSet(HashSet::new()),
                lane_count: 1,
                density_multiplier: 1.0,
                speed_limit: 27.8,
                truck_ratio: 0.0,
                profile: DriverProfile::new(0.2, 0.55, 0.2),
                enabled: true,
            },
        }
    }

    /// Draws the body class of a spawned vehicle.
    pub fn draw_kind(&self, rng: &mut impl Rng) -> AgentKind {
        if rng.random::<f64>() < self.truck_ratio {
            AgentKind::Truck
        } else {
            AgentKind::Car
        }
    }
}

/// A builder pattern implementation for constructing `Zone` objects.
pub struct ZoneBuilder {
    zone: Zone,
}

impl ZoneBuilder {
    /// Sets the spatial predicate.
    pub fn with_predicate(mut self, predicate: ZonePredicate) -> Self {
        self.zone.predicate = predicate;
        self
    }

    /// Sets the predicate to membership in the given point set.
    pub fn with_points(mut self, points: impl IntoIterator<Item = PointId>) -> Self {
        self.zone.predicate = ZonePredicate::PointSet(points.into_iter().collect());
        self
    }

    /// Sets the lane count.
    pub fn with_lane_count(mut self, lane_count: u8) -> Self {
        self.zone.lane_count = lane_count;
        self
    }

    /// Sets the density multiplier.
    pub fn with_density_multiplier(mut self, multiplier: f64) -> Self {
        self.zone.density_multiplier = multiplier;
        self
    }

    /// Sets the speed limit (m/s).
    pub fn with_speed_limit(mut self, speed_limit: f32) -> Self {
        self.zone.speed_limit = speed_limit;
        self
    }

    /// Sets the truck ratio.
    pub fn with_truck_ratio(mut self, truck_ratio: f64) -> Self {
        self.zone.truck_ratio = truck_ratio;
        self
    }

    /// Sets the driver profile.
    pub fn with_profile(mut self, profile: DriverProfile) -> Self {
        self.zone.profile = profile;
        self
    }

    /// Enables or disables the zone.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.zone.enabled = enabled;
        self
    }

    /// Builds the final `Zone` object with the configured properties.
    pub fn build(self) -> Zone {
        self.zone
    }
}

/// Storage of all registered zones with first-match lookup.
#[derive(Debug, Default)]
pub struct ZonesStorage {
    zones: Vec<Zone>,
}

impl ZonesStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self { zones: Vec::new() }
    }

    /// Registers a zone. Zones are probed in registration order.
    pub fn add_zone(&mut self, zone: Zone) {
        self.zones.push(zone);
    }

    /// Number of registered zones.
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Whether no zone is registered.
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Selects the governing zone for a position by first match.
    ///
    /// # Returns
    /// The first zone whose predicate matches, or `None` for unknown
    /// positions (which disables spawning there).
    pub fn zone_at(&self, point_id: PointId, world_pos: &Vec3) -> Option<&Zone> {
        self.zones
            .iter()
            .find(|zone| zone.predicate.matches(point_id, world_pos))
    }

    /// Looks up a zone by id.
    pub fn get_zone_mut(&mut self, id: &str) -> Option<&mut Zone> {
        self.zones.iter_mut().find(|zone| zone.id == id)
    }

    /// Iterates over all zones.
    pub fn iter(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter()
    }
}
