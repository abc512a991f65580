/// Lodging tier used when a request omits it.
pub const DEFAULT_HOTEL_TYPE: &str = "standard";

/// Travel mode used when a request omits it.
pub const DEFAULT_TRAVEL_MODE: &str = "road";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelMode {
    Air,
    Rail,
    Road,
}

impl TravelMode {
    /// Unknown labels resolve to `Road` rather than failing.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.eq_ignore_ascii_case("air") || label.eq_ignore_ascii_case("plane") {
            TravelMode::Air
        } else if label.eq_ignore_ascii_case("rail") || label.eq_ignore_ascii_case("train") {
            TravelMode::Rail
        } else {
            TravelMode::Road
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            TravelMode::Air => 5.0,
            TravelMode::Rail => 1.5,
            TravelMode::Road => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LodgingTier {
    Luxury,
    Standard,
    Budget,
}

impl LodgingTier {
    /// Unknown labels resolve to `Budget` rather than failing.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.eq_ignore_ascii_case("luxury") {
            LodgingTier::Luxury
        } else if label.eq_ignore_ascii_case("standard") {
            LodgingTier::Standard
        } else {
            LodgingTier::Budget
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            LodgingTier::Luxury => 2.5,
            LodgingTier::Standard => 1.5,
            LodgingTier::Budget => 1.0,
        }
    }
}

pub struct PricingService;

impl PricingService {
    pub fn travel_multiplier(mode: &str) -> f64 {
        TravelMode::from_label(mode).multiplier()
    }

    pub fn hotel_multiplier(tier: &str) -> f64 {
        LodgingTier::from_label(tier).multiplier()
    }

    /// Total trip cost: base price × travelers × travel multiplier × hotel multiplier.
    /// Not rounded; callers round for display only.
    pub fn calculate_total_cost(base_price: f64, travelers: u32, mode: &str, tier: &str) -> f64 {
        base_price
            * f64::from(travelers)
            * Self::travel_multiplier(mode)
            * Self::hotel_multiplier(tier)
    }
}
