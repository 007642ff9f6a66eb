//! Synthetic uptime checks.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::{json, Value};

use crate::catalog::{IndustryProfile, Perturbation};
use crate::synth::document::{iso_timestamp, DocumentLabels};

/// Probability a check is up when no scenario is active.
pub const BASELINE_UPTIME: f64 = 0.98;

const REGIONS: &[&str] = &["us-east-1", "us-west-2", "eu-west-1", "ap-southeast-1"];

/// One probe result.
#[derive(Debug, Clone)]
pub struct SyntheticCheck {
    pub timestamp: DateTime<Utc>,
    pub service: &'static str,
    pub is_up: bool,
    pub duration_us: u64,
    pub region: &'static str,
    pub url: String,
}

impl SyntheticCheck {
    pub fn status_code(&self) -> u16 {
        if self.is_up {
            200
        } else {
            503
        }
    }

    pub fn to_document(&self, labels: &DocumentLabels) -> Value {
        json!({
            "@timestamp": iso_timestamp(self.timestamp),
            "monitor.name": format!("{}-health", self.service),
            "monitor.type": "http",
            "monitor.status": if self.is_up { "up" } else { "down" },
            "monitor.duration.us": self.duration_us,
            "observer.geo.name": self.region,
            "url.full": self.url,
            "http.response.status_code": self.status_code(),
            "labels": labels.to_value(),
        })
    }
}

/// Uptime probability under a perturbation: `1 - 2 * error_rate` during a scenario.
pub fn uptime_probability(perturbation: &Perturbation) -> f64 {
    if perturbation.is_active() {
        (1.0 - perturbation.error_rate * 2.0).max(0.0)
    } else {
        BASELINE_UPTIME
    }
}

/// Probe a random service's health endpoint.
pub fn generate_check<R: Rng + ?Sized>(
    topology: &IndustryProfile,
    perturbation: &Perturbation,
    timestamp: DateTime<Utc>,
    rng: &mut R,
) -> SyntheticCheck {
    let service = topology.services.choose(rng).copied().unwrap_or(topology.key);
    let is_up = rng.gen::<f64>() < uptime_probability(perturbation);

    SyntheticCheck {
        timestamp,
        service,
        is_up,
        duration_us: rng.gen_range(50_000..=300_000),
        region: REGIONS.choose(rng).copied().unwrap_or("us-east-1"),
        url: format!("https://{}.{}.example.com/health", service, topology.key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_uptime_probability() {
        assert_eq!(uptime_probability(&Perturbation::baseline()), 0.98);
        let ddos = catalog::resolve_perturbation("gaming", Some("ddos-attack")).unwrap();
        assert!((uptime_probability(&ddos) - 0.4).abs() < 1e-9);
        let total = Perturbation { scenario: Some("x".into()), error_rate: 0.9, ..Perturbation::baseline() };
        assert_eq!(uptime_probability(&total), 0.0);
    }

    #[test]
    fn test_check_fields() {
        let mut rng = StdRng::seed_from_u64(6);
        let profile = catalog::industry("logistics").unwrap();
        let p = Perturbation::baseline();
        for _ in 0..200 {
            let check = generate_check(profile, &p, Utc::now(), &mut rng);
            assert!((50_000..=300_000).contains(&check.duration_us));
            assert!(REGIONS.contains(&check.region));
            assert!(check.url.ends_with(".logistics.example.com/health"));

            let labels = DocumentLabels { industry: "logistics".into(), scenario: None };
            let doc = check.to_document(&labels);
            assert_eq!(doc["http.response.status_code"], check.status_code());
            assert_eq!(doc["monitor.status"], if check.is_up { "up" } else { "down" });
        }
    }

    #[test]
    fn test_scenario_lowers_uptime() {
        let mut rng = StdRng::seed_from_u64(12);
        let profile = catalog::industry("gaming").unwrap();
        let ddos = catalog::resolve_perturbation("gaming", Some("ddos-attack")).unwrap();
        let up = (0..2_000)
            .filter(|_| generate_check(profile, &ddos, Utc::now(), &mut rng).is_up)
            .count();
        assert!((700..=900).contains(&up), "up {}", up);
    }
}
