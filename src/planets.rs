//! Saturn-system target bodies.
//!
//! Mean radii and tri-axial radii (a, b, c) with their published
//! uncertainties, in kilometers.

/// A target body of the Saturn system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Planet {
    /// Body name.
    pub name: &'static str,
    /// Mean radius ± error [km].
    pub mean_radius: (f64, f64),
    /// Tri-axial radii (a, b, c) ± errors [km].
    pub radii: [(f64, f64); 3],
}

impl Planet {
    /// Mean radius [km].
    pub fn radius(&self) -> f64 {
        self.mean_radius.0
    }

    /// Tri-axial radii (a, b, c) [km].
    pub fn abc(&self) -> (f64, f64, f64) {
        (self.radii[0].0, self.radii[1].0, self.radii[2].0)
    }

    /// a-axis radius [km].
    pub fn a(&self) -> f64 {
        self.radii[0].0
    }

    /// b-axis radius [km].
    pub fn b(&self) -> f64 {
        self.radii[1].0
    }

    /// c-axis radius [km].
    pub fn c(&self) -> f64 {
        self.radii[2].0
    }

    /// Case-insensitive lookup in the catalog.
    pub fn from_name(name: &str) -> Option<&'static Planet> {
        CATALOG
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for Planet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Titan (Zebker et al. 2009, doi:10.1126/science.1168905).
pub const TITAN: Planet = Planet {
    name: "Titan",
    mean_radius: (2574.73, 0.09),
    radii: [(2574.32, 0.05), (2574.36, 0.03), (2574.91, 0.11)],
};

/// Enceladus (Roatsch et al. 2013).
pub const ENCELADUS: Planet = Planet {
    name: "Enceladus",
    mean_radius: (252.1, 0.2),
    radii: [(256.6, 0.6), (251.4, 0.2), (248.3, 0.2)],
};

/// Mimas.
pub const MIMAS: Planet = Planet {
    name: "Mimas",
    mean_radius: (198.2, 0.4),
    radii: [(207.8, 0.5), (196.7, 0.5), (190.6, 0.3)],
};

/// Tethys.
pub const TETHYS: Planet = Planet {
    name: "Tethys",
    mean_radius: (531.1, 0.6),
    radii: [(538.4, 0.3), (528.3, 1.1), (526.3, 0.6)],
};

/// Dione.
pub const DIONE: Planet = Planet {
    name: "Dione",
    mean_radius: (561.4, 0.4),
    radii: [(563.4, 0.6), (561.3, 0.5), (559.6, 0.4)],
};

/// Rhea.
pub const RHEA: Planet = Planet {
    name: "Rhea",
    mean_radius: (763.8, 1.0),
    radii: [(765.0, 0.7), (763.1, 0.6), (762.4, 0.6)],
};

/// Hyperion.
pub const HYPERION: Planet = Planet {
    name: "Hyperion",
    mean_radius: (135.0, 4.0),
    radii: [(180.1, 2.0), (133.0, 4.5), (102.7, 4.5)],
};

/// Iapetus.
pub const IAPETUS: Planet = Planet {
    name: "Iapetus",
    mean_radius: (734.5, 2.8),
    radii: [(745.7, 2.9), (745.7, 2.9), (712.1, 1.6)],
};

/// Saturn (IAU 2015 nominal 1-bar level).
pub const SATURN: Planet = Planet {
    name: "Saturn",
    mean_radius: (58232.0, 6.0),
    radii: [(60268.0, 4.0), (60268.0, 4.0), (54364.0, 10.0)],
};

/// All the cataloged bodies.
pub const CATALOG: [Planet; 9] = [
    TITAN, ENCELADUS, MIMAS, TETHYS, DIONE, RHEA, HYPERION, IAPETUS, SATURN,
];
