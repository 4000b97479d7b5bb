//! Los Mochis (Sinaloa) stops and traces.
//!
//! Approximate street-level positions, good enough to exercise distances and
//! thinning on a realistic city-scale route.

use route_geometry::Coordinate;

/// A named stop.
#[derive(Debug, Clone)]
pub struct Stop {
    pub name: &'static str,
    pub lon: f64,
    pub lat: f64,
}

impl Stop {
    pub const fn new(name: &'static str, lon: f64, lat: f64) -> Self {
        Self { name, lon, lat }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lon, self.lat)
    }
}

pub const DOWNTOWN_STOPS: &[Stop] = &[
    Stop::new("Plazuela 27 de Septiembre", -108.9937, 25.7903),
    Stop::new("Mercado Independencia", -108.9921, 25.7931),
    Stop::new("Catedral Sagrado Corazon", -108.9950, 25.7917),
    Stop::new("Central de Autobuses", -108.9821, 25.7931),
    Stop::new("Parque Sinaloa", -108.9999, 25.7953),
];

/// A route drawn by hand on a map: dense clicks along Boulevard Rosales,
/// a turn, then a straight run east. Several points are near-duplicates
/// or sit on the line between their neighbours.
pub fn drawn_boulevard_route() -> Vec<Coordinate> {
    vec![
        Coordinate::new(-108.9999, 25.7953),
        Coordinate::new(-108.99985, 25.79525),
        Coordinate::new(-108.9980, 25.7950),
        Coordinate::new(-108.9960, 25.7947),
        Coordinate::new(-108.99599, 25.79469),
        Coordinate::new(-108.9950, 25.7931),
        Coordinate::new(-108.9940, 25.7931),
        Coordinate::new(-108.9920, 25.7931),
        Coordinate::new(-108.9900, 25.7931),
        Coordinate::new(-108.9860, 25.7931),
        Coordinate::new(-108.9821, 25.7931),
    ]
}

/// Downtown stops in visiting order.
pub fn downtown_loop() -> Vec<Coordinate> {
    DOWNTOWN_STOPS.iter().map(Stop::coordinate).collect()
}

/// A few points along Boulevard Princesse Grace in Monaco.
pub fn monaco_trace() -> Vec<Coordinate> {
    vec![
        Coordinate::new(7.4322, 43.7440),
        Coordinate::new(7.4331, 43.7447),
        Coordinate::new(7.4341, 43.7455),
        Coordinate::new(7.4350, 43.7462),
    ]
}
