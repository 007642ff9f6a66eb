//! Span timing model.
//!
//! Services are classified by an ordered substring rule table (first match wins,
//! case-insensitive). Each category has a base latency range in milliseconds; a
//! sample is drawn uniformly from it, scaled by the latency multiplier and floored.

use rand::Rng;
use serde::Serialize;

/// Coarse service category, reported as `span.type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Cache,
    Db,
    Messaging,
    Storage,
    External,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Cache => "cache",
            Category::Db => "db",
            Category::Messaging => "messaging",
            Category::Storage => "storage",
            Category::External => "external",
        }
    }

    /// Base latency range in milliseconds (inclusive).
    pub fn base_range_ms(&self) -> (u64, u64) {
        match self {
            Category::Cache => (1, 10),
            Category::Db => (5, 50),
            Category::Messaging => (10, 100),
            Category::Storage | Category::External => (20, 200),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category plus technology subtype (`db` / `postgresql`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceKind {
    pub category: Category,
    pub subtype: &'static str,
}

struct Rule {
    patterns: &'static [&'static str],
    kind: ServiceKind,
}

const fn rule(patterns: &'static [&'static str], category: Category, subtype: &'static str) -> Rule {
    Rule {
        patterns,
        kind: ServiceKind { category, subtype },
    }
}

// Order matters: "mongodb-*" names hit the "db" rule before "mongo".
static RULES: &[Rule] = &[
    rule(&["redis", "cache", "memcached"], Category::Cache, "redis"),
    rule(&["postgres", "mysql", "db"], Category::Db, "postgresql"),
    rule(&["mongo"], Category::Db, "mongodb"),
    rule(&["kafka", "queue", "rabbitmq"], Category::Messaging, "kafka"),
    rule(&["s3", "storage", "blob"], Category::Storage, "s3"),
];

const FALLBACK: ServiceKind = ServiceKind {
    category: Category::External,
    subtype: "http",
};

/// Classify a service by name.
pub fn classify(service: &str) -> ServiceKind {
    let name = service.to_ascii_lowercase();
    RULES
        .iter()
        .find(|r| r.patterns.iter().any(|p| name.contains(p)))
        .map(|r| r.kind)
        .unwrap_or(FALLBACK)
}

/// Draw a span duration in whole milliseconds.
///
/// `multiplier` is expected to be >= 1; negative values are treated as 0.
pub fn sample_duration_ms<R: Rng + ?Sized>(category: Category, multiplier: f64, rng: &mut R) -> u64 {
    let (lo, hi) = category.base_range_ms();
    let base = rng.gen_range(lo..=hi);
    (base as f64 * multiplier.max(0.0)).floor() as u64
}

/// Classify and sample in one step.
pub fn span_duration_ms<R: Rng + ?Sized>(service: &str, multiplier: f64, rng: &mut R) -> u64 {
    sample_duration_ms(classify(service).category, multiplier, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_classification_table() {
        let cases = [
            ("redis-cache", Category::Cache, "redis"),
            ("Memcached-Sessions", Category::Cache, "redis"),
            ("postgres-db", Category::Db, "postgresql"),
            ("orders-mysql", Category::Db, "postgresql"),
            ("mongo-events", Category::Db, "mongodb"),
            ("kafka-broker", Category::Messaging, "kafka"),
            ("email-queue", Category::Messaging, "kafka"),
            ("s3-archive", Category::Storage, "s3"),
            ("blob-store", Category::Storage, "s3"),
            ("matchmaking-service", Category::External, "http"),
            ("anti-cheat", Category::External, "http"),
        ];
        for (name, category, subtype) in cases {
            let kind = classify(name);
            assert_eq!(kind.category, category, "{}", name);
            assert_eq!(kind.subtype, subtype, "{}", name);
        }
    }

    #[test]
    fn test_first_match_wins() {
        // "mongodb-player" contains "db", which is checked before "mongo".
        assert_eq!(classify("mongodb-player").subtype, "postgresql");
        // "cache" outranks "db".
        assert_eq!(classify("db-cache").category, Category::Cache);
    }

    #[test]
    fn test_unit_multiplier_stays_in_base_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for category in [
            Category::Cache,
            Category::Db,
            Category::Messaging,
            Category::Storage,
            Category::External,
        ] {
            let (lo, hi) = category.base_range_ms();
            for _ in 0..2_000 {
                let d = sample_duration_ms(category, 1.0, &mut rng);
                assert!((lo..=hi).contains(&d), "{} out of range for {}", d, category);
            }
        }
    }

    #[test]
    fn test_multiplier_scales_mean() {
        let mut rng = StdRng::seed_from_u64(42);
        let n = 20_000;
        let mean = |m: f64, rng: &mut StdRng| {
            (0..n).map(|_| sample_duration_ms(Category::Db, m, rng)).sum::<u64>() as f64 / n as f64
        };
        let single = mean(1.0, &mut rng);
        let double = mean(2.0, &mut rng);

        assert!((single - 27.5).abs() < 1.0, "mean {}", single);
        assert!((double / single - 2.0).abs() < 0.1, "ratio {}", double / single);
    }

    #[test]
    fn test_fractional_multiplier_floors() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1_000 {
            let d = sample_duration_ms(Category::Cache, 1.5, &mut rng);
            assert!((1..=15).contains(&d));
        }
    }
}
