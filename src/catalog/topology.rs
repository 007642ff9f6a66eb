//! Per-industry service topologies.
//!
//! Each industry is a fixed service list plus a one-hop adjacency map
//! (service → direct callees). Callees are not required to appear in the
//! service list; the engine treats unknown ones as opaque leaves.

/// Static description of one industry's service graph.
#[derive(Debug)]
pub struct IndustryProfile {
    /// Lookup key (`"gaming"`).
    pub key: &'static str,
    pub display_name: &'static str,
    pub icon: &'static str,
    pub services: &'static [&'static str],
    dependencies: &'static [(&'static str, &'static [&'static str])],
}

impl IndustryProfile {
    pub const fn new(
        key: &'static str,
        display_name: &'static str,
        icon: &'static str,
        services: &'static [&'static str],
        dependencies: &'static [(&'static str, &'static [&'static str])],
    ) -> Self {
        Self {
            key,
            display_name,
            icon,
            services,
            dependencies,
        }
    }

    /// Direct callees of `service`, empty when it declares none.
    pub fn dependencies_of(&self, service: &str) -> &'static [&'static str] {
        self.dependencies
            .iter()
            .find(|(caller, _)| *caller == service)
            .map(|(_, callees)| *callees)
            .unwrap_or(&[])
    }

    pub fn has_dependencies(&self) -> bool {
        !self.dependencies.is_empty()
    }

    /// Every (caller, callees) edge set in declaration order.
    pub fn dependency_edges(&self) -> impl Iterator<Item = (&'static str, &'static [&'static str])> + '_ {
        self.dependencies.iter().copied()
    }

    pub fn declares(&self, service: &str) -> bool {
        self.services.contains(&service)
    }
}

pub(crate) static INDUSTRIES: &[IndustryProfile] = &[
    IndustryProfile {
        key: "ecommerce",
        display_name: "E-Commerce Platform",
        icon: "🛒",
        services: &[
            "web-frontend", "mobile-app", "product-catalog", "search-service",
            "shopping-cart", "checkout-service", "payment-gateway",
            "order-processing", "inventory-service", "shipping-service",
            "recommendation-engine", "user-service", "review-service",
            "notification-service", "analytics-service", "image-service",
            "redis-cache", "postgres-db", "mongodb-catalog",
        ],
        dependencies: &[
            ("web-frontend", &["product-catalog", "search-service", "shopping-cart", "user-service", "redis-cache"]),
            ("mobile-app", &["product-catalog", "shopping-cart", "user-service", "redis-cache"]),
            ("product-catalog", &["inventory-service", "image-service", "postgres-db", "redis-cache"]),
            ("search-service", &["product-catalog", "recommendation-engine", "mongodb-catalog"]),
            ("shopping-cart", &["product-catalog", "user-service", "redis-cache"]),
            ("checkout-service", &["shopping-cart", "payment-gateway", "inventory-service", "user-service"]),
            ("payment-gateway", &["order-processing", "notification-service"]),
            ("order-processing", &["inventory-service", "shipping-service", "notification-service", "postgres-db"]),
            ("recommendation-engine", &["product-catalog", "user-service", "analytics-service"]),
            ("shipping-service", &["notification-service", "postgres-db"]),
            ("review-service", &["user-service", "product-catalog", "mongodb-catalog"]),
            ("inventory-service", &["postgres-db", "notification-service"]),
        ],
    },
    IndustryProfile {
        key: "banking",
        display_name: "Digital Banking",
        icon: "🏦",
        services: &[
            "mobile-banking", "web-banking", "api-gateway",
            "auth-service", "account-service", "transaction-service",
            "payment-service", "card-service", "loan-service",
            "fraud-detection", "kyc-service", "notification-service",
            "reporting-service", "audit-service", "currency-service",
            "redis-cache", "postgres-db", "kafka-broker",
        ],
        dependencies: &[
            ("mobile-banking", &["api-gateway", "auth-service", "redis-cache"]),
            ("web-banking", &["api-gateway", "auth-service", "redis-cache"]),
            ("api-gateway", &["auth-service", "account-service", "transaction-service"]),
            ("auth-service", &["kyc-service", "redis-cache", "postgres-db"]),
            ("account-service", &["transaction-service", "fraud-detection", "postgres-db"]),
            ("transaction-service", &["payment-service", "fraud-detection", "audit-service", "kafka-broker"]),
            ("payment-service", &["card-service", "notification-service", "postgres-db"]),
            ("fraud-detection", &["audit-service", "notification-service", "kafka-broker"]),
            ("loan-service", &["account-service", "credit-check", "notification-service"]),
            ("reporting-service", &["account-service", "transaction-service", "postgres-db"]),
        ],
    },
    IndustryProfile {
        key: "gaming",
        display_name: "Online Gaming",
        icon: "🎮",
        services: &[
            "game-client", "game-server", "matchmaking-service",
            "player-service", "session-service", "chat-service",
            "leaderboard-service", "achievement-service", "inventory-service",
            "store-service", "payment-service", "anti-cheat",
            "voice-service", "analytics-service", "cdn-service",
            "redis-cache", "mongodb-player", "postgres-db",
        ],
        dependencies: &[
            ("game-client", &["game-server", "cdn-service"]),
            ("game-server", &["matchmaking-service", "player-service", "session-service", "anti-cheat"]),
            ("matchmaking-service", &["player-service", "leaderboard-service", "redis-cache"]),
            ("player-service", &["inventory-service", "achievement-service", "mongodb-player"]),
            ("session-service", &["redis-cache", "analytics-service"]),
            ("chat-service", &["player-service", "anti-cheat", "redis-cache"]),
            ("store-service", &["inventory-service", "payment-service", "player-service"]),
            ("leaderboard-service", &["player-service", "redis-cache", "analytics-service"]),
            ("inventory-service", &["player-service", "mongodb-player"]),
            ("achievement-service", &["player-service", "analytics-service", "mongodb-player"]),
        ],
    },
    IndustryProfile {
        key: "healthcare",
        display_name: "Healthcare System",
        icon: "🏥",
        services: &[
            "patient-portal", "provider-portal", "appointment-service",
            "ehr-service", "billing-service", "insurance-service",
            "prescription-service", "lab-service", "imaging-service",
            "telemedicine-service", "notification-service", "compliance-service",
            "integration-hub", "analytics-service", "patient-monitoring",
            "redis-cache", "postgres-db", "mongodb-ehr",
        ],
        dependencies: &[
            ("patient-portal", &["appointment-service", "ehr-service", "prescription-service", "redis-cache"]),
            ("provider-portal", &["ehr-service", "appointment-service", "lab-service", "redis-cache"]),
            ("appointment-service", &["notification-service", "patient-monitoring", "postgres-db"]),
            ("ehr-service", &["prescription-service", "lab-service", "imaging-service", "mongodb-ehr"]),
            ("billing-service", &["insurance-service", "compliance-service", "postgres-db"]),
            ("prescription-service", &["ehr-service", "notification-service", "postgres-db"]),
            ("lab-service", &["ehr-service", "integration-hub", "postgres-db"]),
            ("telemedicine-service", &["ehr-service", "appointment-service", "notification-service"]),
            ("insurance-service", &["integration-hub", "compliance-service", "postgres-db"]),
        ],
    },
    IndustryProfile {
        key: "logistics",
        display_name: "Logistics Platform",
        icon: "📦",
        services: &[
            "customer-portal", "driver-app", "order-service",
            "warehouse-service", "inventory-service", "shipping-service",
            "tracking-service", "route-optimization", "fleet-management",
            "billing-service", "analytics-service", "notification-service",
            "integration-hub", "customs-service", "delivery-service",
            "redis-cache", "postgres-db", "mongodb-tracking",
        ],
        dependencies: &[
            ("customer-portal", &["order-service", "tracking-service", "redis-cache"]),
            ("driver-app", &["delivery-service", "route-optimization", "tracking-service"]),
            ("order-service", &["warehouse-service", "shipping-service", "inventory-service", "postgres-db"]),
            ("warehouse-service", &["inventory-service", "route-optimization", "postgres-db"]),
            ("shipping-service", &["tracking-service", "notification-service", "integration-hub"]),
            ("tracking-service", &["mongodb-tracking", "notification-service", "analytics-service"]),
            ("route-optimization", &["fleet-management", "delivery-service", "redis-cache"]),
            ("fleet-management", &["driver-app", "analytics-service", "postgres-db"]),
            ("delivery-service", &["tracking-service", "notification-service", "mongodb-tracking"]),
        ],
    },
    IndustryProfile {
        key: "insurance",
        display_name: "Insurance Platform",
        icon: "🛡️",
        services: &[
            "customer-portal", "agent-portal", "policy-service",
            "claims-service", "underwriting-service", "risk-assessment",
            "premium-calculation", "payment-service", "document-service",
            "fraud-detection", "notification-service", "reporting-service",
            "renewal-service", "quote-engine", "integration-hub",
            "redis-cache", "postgres-db", "mongodb-documents",
        ],
        dependencies: &[
            ("customer-portal", &["policy-service", "claims-service", "payment-service", "redis-cache"]),
            ("agent-portal", &["quote-engine", "underwriting-service", "customer-service", "redis-cache"]),
            ("policy-service", &["premium-calculation", "renewal-service", "postgres-db"]),
            ("claims-service", &["fraud-detection", "document-service", "payment-service", "postgres-db"]),
            ("underwriting-service", &["risk-assessment", "quote-engine", "integration-hub"]),
            ("risk-assessment", &["integration-hub", "analytics-service", "postgres-db"]),
            ("quote-engine", &["premium-calculation", "policy-service", "redis-cache"]),
            ("fraud-detection", &["claims-service", "notification-service", "analytics-service"]),
            ("document-service", &["mongodb-documents", "notification-service"]),
        ],
    },
];
