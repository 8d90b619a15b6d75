//! Real Campinas-area locations for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap. All residential points sit
//! within ~5 km of the industrial destinations, matching the commuter
//! scale the planner is built for.

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

// ============================================================================
// Destinations (plants / distribution centers)
// ============================================================================

pub const PLANTS: &[Location] = &[
    Location::new("Distrito Industrial Plant", -22.9358, -47.1042),
    Location::new("Amoreiras Distribution Center", -22.9211, -47.0823),
    Location::new("Techno Park Office", -22.8475, -47.1370),
];

// ============================================================================
// Residential pickup addresses — Centro / Cambuí
// ============================================================================

pub const CENTRO: &[Location] = &[
    Location::new("R. Barão de Jaguara 1100", -22.9056, -47.0608),
    Location::new("Av. Francisco Glicério 880", -22.9041, -47.0635),
    Location::new("R. General Osório 560", -22.9029, -47.0598),
    Location::new("R. Conceição 233", -22.9019, -47.0571),
    Location::new("Av. Anchieta 200", -22.9003, -47.0583),
    Location::new("R. Dr. Quirino 1300", -22.9048, -47.0564),
    Location::new("R. Regente Feijó 930", -22.9067, -47.0577),
    Location::new("Largo do Rosário", -22.9036, -47.0607),
    Location::new("R. Coronel Quirino 1500", -22.8972, -47.0521),
    Location::new("R. Maria Monteiro 810", -22.8946, -47.0494),
    Location::new("Av. Coronel Silva Teles 700", -22.8929, -47.0478),
    Location::new("R. Sampainho 417", -22.8958, -47.0545),
];

// ============================================================================
// Residential pickup addresses — Taquaral / Guanabara
// ============================================================================

pub const TAQUARAL: &[Location] = &[
    Location::new("Av. Heitor Penteado 520", -22.8766, -47.0456),
    Location::new("R. Latino Coelho 1200", -22.8842, -47.0595),
    Location::new("Av. Barão de Itapura 2700", -22.8851, -47.0672),
    Location::new("R. Padre Almeida 515", -22.8937, -47.0587),
    Location::new("R. Buarque de Macedo 420", -22.8899, -47.0636),
    Location::new("Parque Portugal Gate 5", -22.8745, -47.0541),
    Location::new("R. Jorge Figueiredo 88", -22.8718, -47.0492),
    Location::new("Av. Dr. Alberto Sarmento 350", -22.8805, -47.0711),
    Location::new("R. Bento da Silva Leite 170", -22.8779, -47.0512),
    Location::new("Av. Princesa d'Oeste 1500", -22.9104, -47.0689),
];

// ============================================================================
// Residential pickup addresses — Vila Industrial / São Bernardo
// ============================================================================

pub const VILA_INDUSTRIAL: &[Location] = &[
    Location::new("R. Sales de Oliveira 1450", -22.9165, -47.0750),
    Location::new("Av. da Saudade 780", -22.9121, -47.0703),
    Location::new("R. Luiz Gama 560", -22.9188, -47.0695),
    Location::new("R. Pedro Domingos Vitali 220", -22.9227, -47.0771),
    Location::new("Av. Prestes Maia 680", -22.9274, -47.0826),
    Location::new("R. Uruguaiana 900", -22.9149, -47.0659),
    Location::new("R. Abolição 1890", -22.9235, -47.0642),
    Location::new("Av. das Amoreiras 2200", -22.9257, -47.0907),
    Location::new("R. Carlos Guimarães 150", -22.9300, -47.0874),
    Location::new("R. Onze de Agosto 1010", -22.9109, -47.0627),
];

// ============================================================================
// Residential pickup addresses — Ponte Preta / Parque Itália
// ============================================================================

pub const PONTE_PRETA: &[Location] = &[
    Location::new("R. Benjamin Constant 2300", -22.9137, -47.0553),
    Location::new("Av. Lix da Cunha 450", -22.9203, -47.0585),
    Location::new("R. Pariquera Açu 75", -22.9246, -47.0563),
    Location::new("R. Luverci Pereira de Souza 340", -22.9311, -47.0611),
    Location::new("Av. Washington Luís 1205", -22.9282, -47.0698),
    Location::new("R. da Boa Morte 880", -22.9194, -47.0524),
    Location::new("R. Francisco Teodoro 620", -22.9171, -47.0611),
    Location::new("Praça Pompéia", -22.9329, -47.0725),
    Location::new("R. Serra Dourada 410", -22.9356, -47.0788),
    Location::new("Av. João Jorge 300", -22.9129, -47.0781),
];

// ============================================================================
// Residential pickup addresses — Bonfim / Castelo
// ============================================================================

pub const BONFIM: &[Location] = &[
    Location::new("Av. Marechal Rondon 700", -22.8901, -47.0778),
    Location::new("R. Padre Manoel Bernardes 420", -22.8867, -47.0822),
    Location::new("Av. Andrade Neves 2100", -22.8932, -47.0731),
    Location::new("R. Mogi Mirim 95", -22.8846, -47.0747),
    Location::new("Praça do Castelo", -22.8820, -47.0692),
    Location::new("R. Culto à Ciência 485", -22.8985, -47.0664),
    Location::new("R. Barbosa da Cunha 700", -22.8874, -47.0658),
    Location::new("Av. Ruy Rodriguez 180", -22.9343, -47.0944),
];

/// Every residential location, in a fixed deterministic order.
/// Clustering is insertion-order dependent; tests rely on this order.
pub fn all_passengers() -> Vec<Location> {
    CENTRO
        .iter()
        .chain(TAQUARAL.iter())
        .chain(VILA_INDUSTRIAL.iter())
        .chain(PONTE_PRETA.iter())
        .chain(BONFIM.iter())
        .cloned()
        .collect()
}
