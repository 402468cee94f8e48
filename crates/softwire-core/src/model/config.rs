// ── Validated MAP snapshot ──

use serde::{Deserialize, Serialize};

use super::rule::MapRule;

/// Softwire mechanism reported by the backend.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
pub enum MapType {
    #[strum(to_string = "MAP-E")]
    MapE,
    #[strum(to_string = "MAP-T")]
    MapT,
    #[strum(to_string = "LW4over6")]
    Lw4over6,
    #[default]
    #[strum(to_string = "Unknown")]
    Unknown,
}

impl MapType {
    /// Map a raw backend tag. Exact, case-sensitive match only.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "map-e" => Self::MapE,
            "map-t" => Self::MapT,
            "lw4o6" => Self::Lw4over6,
            _ => Self::Unknown,
        }
    }
}

/// Immutable view of one reported MAP state.
///
/// Rebuilt from every status refresh; never mutated in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapConfig {
    pub map_type: MapType,
    /// Underlying tunnel / uplink interface.
    pub link: Option<String>,
    /// 1-based index into `rules`. Bounds are checked on resolution, so an
    /// out-of-range value is kept here and simply yields no BMR.
    pub bmr_index: Option<i64>,
    /// Backend order is significant and preserved.
    pub rules: Vec<MapRule>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_mapping_is_exact() {
        assert_eq!(MapType::from_tag("map-e"), MapType::MapE);
        assert_eq!(MapType::from_tag("map-t"), MapType::MapT);
        assert_eq!(MapType::from_tag("lw4o6"), MapType::Lw4over6);
        assert_eq!(MapType::from_tag("MAP-E"), MapType::Unknown);
        assert_eq!(MapType::from_tag("map-e "), MapType::Unknown);
        assert_eq!(MapType::from_tag(""), MapType::Unknown);
    }

    #[test]
    fn display_labels() {
        assert_eq!(MapType::MapE.to_string(), "MAP-E");
        assert_eq!(MapType::Lw4over6.to_string(), "LW4over6");
        assert_eq!(MapType::Unknown.to_string(), "Unknown");
    }
}
