use crate::domain::{Coordinate, SourceMode};
use crate::map::{LineStyle, MarkerKind, MarkerSpec};

const REFERENCE_Z_INDEX: i32 = 500;
const USER_Z_INDEX: i32 = 1000;
const ROUTE_COLOR: &str = "#ff4444";

pub fn reference_marker(position: Coordinate, label: &str, region: &str) -> MarkerSpec {
    MarkerSpec {
        kind: MarkerKind::Reference,
        position,
        popup: format!("{}\n{}\n{}", label, region, dms(&position)),
        z_index_offset: REFERENCE_Z_INDEX,
    }
}

pub fn user_marker(position: Coordinate) -> MarkerSpec {
    MarkerSpec {
        kind: MarkerKind::User,
        position,
        popup: format!("📍 Your Location\n{}", position),
        z_index_offset: USER_Z_INDEX,
    }
}

/// Routed paths are drawn solid, straight-line fallbacks dashed.
pub fn route_style(source_mode: SourceMode) -> LineStyle {
    LineStyle {
        color: ROUTE_COLOR.to_string(),
        weight: 6,
        opacity: 0.8,
        dash_array: match source_mode {
            SourceMode::Routed => None,
            SourceMode::Fallback => Some("10, 5".to_string()),
        },
    }
}

/// Formats a coordinate as degrees, minutes and seconds, e.g. `6°35'40"S 106°47'19"E`.
pub fn dms(coordinate: &Coordinate) -> String {
    let latitude_hemisphere = if coordinate.latitude() < 0.0 { 'S' } else { 'N' };
    let longitude_hemisphere = if coordinate.longitude() < 0.0 { 'W' } else { 'E' };

    format!(
        "{}{} {}{}",
        dms_component(coordinate.latitude()),
        latitude_hemisphere,
        dms_component(coordinate.longitude()),
        longitude_hemisphere
    )
}

fn dms_component(degrees: f64) -> String {
    let total_seconds = (degrees.abs() * 3600.0).round() as u64;
    format!("{}°{}'{}\"", total_seconds / 3600, (total_seconds % 3600) / 60, total_seconds % 60)
}
