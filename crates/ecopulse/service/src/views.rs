//! Cross-sectional views
//!
//! District and national rows are fixed multiples of the latest stored AQI.
//! They illustrate spread across areas; nothing here is measured, and every
//! row is marked `derived`.

use ecopulse_analytics::round_to;
use ecopulse_types::{DistrictView, NationalView};

struct District {
    name: &'static str,
    multiplier: f64,
    vulnerability: &'static str,
    risk: &'static str,
    trend: &'static str,
}

const DISTRICTS: [District; 4] = [
    District {
        name: "Central Business District",
        multiplier: 1.0,
        vulnerability: "High",
        risk: "Traffic",
        trend: "Rising",
    },
    District {
        name: "Industrial North",
        multiplier: 1.3,
        vulnerability: "Critical",
        risk: "Industrial",
        trend: "Stable",
    },
    District {
        name: "Residential South",
        multiplier: 0.7,
        vulnerability: "Low",
        risk: "Dust",
        trend: "Falling",
    },
    District {
        name: "Green Belt West",
        multiplier: 0.5,
        vulnerability: "Minimal",
        risk: "None",
        trend: "Optimal",
    },
];

const REGIONS: [(&str, &str, f64); 4] = [
    ("IN-MH", "Maharashtra", 1.1),
    ("IN-DL", "Delhi", 1.8),
    ("IN-KA", "Karnataka", 0.8),
    ("IN-KL", "Kerala", 0.5),
];

pub fn district_view(latest_aqi: f64) -> Vec<DistrictView> {
    DISTRICTS
        .iter()
        .map(|district| DistrictView {
            name: district.name.to_string(),
            aqi: round_to(latest_aqi * district.multiplier, 2),
            vulnerability: district.vulnerability.to_string(),
            risk: district.risk.to_string(),
            trend: district.trend.to_string(),
            derived: true,
        })
        .collect()
}

pub fn national_view(latest_aqi: f64) -> Vec<NationalView> {
    REGIONS
        .iter()
        .map(|(id, name, multiplier)| NationalView {
            id: id.to_string(),
            name: name.to_string(),
            aqi: round_to(latest_aqi * multiplier, 2),
            derived: true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn districts_scale_latest_aqi() {
        let rows = district_view(100.0);
        let aqi: Vec<f64> = rows.iter().map(|row| row.aqi).collect();
        assert_eq!(aqi, vec![100.0, 130.0, 70.0, 50.0]);
        assert_eq!(rows[1].vulnerability, "Critical");
        assert!(rows.iter().all(|row| row.derived));
    }

    #[test]
    fn regions_round_to_two_places() {
        let rows = national_view(33.333);
        assert_eq!(rows[0].id, "IN-MH");
        assert_eq!(rows[0].aqi, 36.67);
        assert_eq!(rows[1].aqi, 60.0);
        assert_eq!(rows[3].name, "Kerala");
    }
}
