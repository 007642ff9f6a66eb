//! Incident scenario profiles.
//!
//! A scenario raises the error rate and stretches latency for a subset of an
//! industry's services. Presentation text (name, description, narrative) is
//! carried for the control surface only.

use serde::Serialize;

/// Error rate used when no scenario is active.
pub const BASELINE_ERROR_RATE: f64 = 0.02;

/// Latency multiplier used when no scenario is active.
pub const BASELINE_LATENCY_MULTIPLIER: f64 = 1.0;

/// A named incident profile.
#[derive(Debug)]
pub struct Scenario {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub narrative: &'static str,
    /// Suggested run length.
    pub duration_minutes: u64,
    pub error_rate: f64,
    pub latency_multiplier: f64,
    pub affected_services: &'static [&'static str],
}

/// A scenario resolved for one generation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Perturbation {
    /// Display name of the active scenario, `None` for the baseline.
    pub scenario: Option<String>,
    pub error_rate: f64,
    pub latency_multiplier: f64,
    pub affected_services: Vec<String>,
}

impl Perturbation {
    /// No incident: baseline error rate, no latency change.
    pub fn baseline() -> Self {
        Self {
            scenario: None,
            error_rate: BASELINE_ERROR_RATE,
            latency_multiplier: BASELINE_LATENCY_MULTIPLIER,
            affected_services: Vec::new(),
        }
    }

    /// Whether a scenario (not the baseline) drives this run.
    pub fn is_active(&self) -> bool {
        self.scenario.is_some()
    }

    /// Latency multiplier for one service.
    ///
    /// Only members of the affected set are slowed down. An empty set affects
    /// nothing.
    pub fn multiplier_for(&self, service: &str) -> f64 {
        if self.affected_services.iter().any(|s| s == service) {
            self.latency_multiplier
        } else {
            BASELINE_LATENCY_MULTIPLIER
        }
    }
}

impl Default for Perturbation {
    fn default() -> Self {
        Self::baseline()
    }
}

impl From<&Scenario> for Perturbation {
    fn from(scenario: &Scenario) -> Self {
        Self {
            scenario: Some(scenario.name.to_string()),
            error_rate: scenario.error_rate,
            latency_multiplier: scenario.latency_multiplier,
            affected_services: scenario
                .affected_services
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

macro_rules! scenario {
    ($key:literal, $name:literal, $description:literal, $narrative:literal,
     $minutes:literal, $error_rate:literal, $multiplier:literal, [$($svc:literal),* $(,)?]) => {
        Scenario {
            key: $key,
            name: $name,
            description: $description,
            narrative: $narrative,
            duration_minutes: $minutes,
            error_rate: $error_rate,
            latency_multiplier: $multiplier,
            affected_services: &[$($svc),*],
        }
    };
}

pub(crate) static SCENARIOS: &[(&str, &[Scenario])] = &[
    ("ecommerce", &[
        scenario!("black-friday", "Black Friday Traffic Spike",
            "Traffic increases 10x, latency degrades, some services struggle",
            "It's Black Friday and your e-commerce platform is experiencing unprecedented traffic. The search and recommendation services are showing increased latency.",
            15, 0.05, 3.0, ["search-service", "recommendation-engine", "checkout-service"]),
        scenario!("payment-failures", "Payment Gateway Failures",
            "Payment gateway experiencing intermittent failures (15% error rate)",
            "The payment gateway is having issues. Customers are reporting failed transactions, causing cart abandonment.",
            20, 0.15, 2.0, ["payment-gateway", "checkout-service"]),
        scenario!("search-degradation", "Search Performance Degradation",
            "Search service response times increase dramatically",
            "Search queries are taking too long. Users are experiencing delays when searching for products.",
            30, 0.03, 5.0, ["search-service"]),
        scenario!("cart-abandonment", "Cart Abandonment Pattern",
            "Shopping cart service errors causing abandoned carts",
            "Users are adding items to cart but experiencing errors during checkout flow.",
            25, 0.08, 1.5, ["shopping-cart", "checkout-service"]),
        scenario!("inventory-sync", "Inventory Sync Issues",
            "Inventory management system out of sync, causing overselling",
            "Inventory counts are not updating correctly, leading to overselling and customer complaints.",
            45, 0.06, 2.5, ["inventory-management", "product-catalog"]),
        scenario!("recommendation-slow", "Recommendation Engine Slowdown",
            "ML-powered recommendations taking too long to compute",
            "The recommendation engine is struggling with increased load, causing slow page loads.",
            20, 0.02, 4.0, ["recommendation-engine"]),
    ]),
    ("banking", &[
        scenario!("atm-outage", "ATM Network Issues",
            "Regional ATM network experiencing connectivity problems",
            "ATMs across the northeast region are unable to connect to core banking systems.",
            30, 0.12, 3.0, ["transaction-service", "account-service"]),
        scenario!("fraud-alerts", "Fraud Detection Alert Storm",
            "Fraud detection system generating high volume of alerts",
            "The fraud detection system is triggering alerts at 5x normal rate, overwhelming the review queue.",
            40, 0.04, 2.0, ["fraud-detection", "transaction-service"]),
        scenario!("db-pool-exhaustion", "Database Connection Pool Exhaustion",
            "All database connections in use, causing timeouts",
            "The database connection pool is exhausted. Transactions are timing out and failing.",
            25, 0.20, 4.0, ["account-service", "transaction-service", "payment-service"]),
        scenario!("mobile-login-fail", "Mobile App Login Failures",
            "Authentication service issues preventing mobile logins",
            "Mobile banking users cannot log in. The authentication service is returning errors.",
            15, 0.25, 1.5, ["mobile-banking-app", "authentication-service"]),
        scenario!("payment-delays", "Payment Processing Delays",
            "Payments taking longer than usual to process",
            "Customer payments are being processed but with significant delays, causing frustration.",
            35, 0.05, 6.0, ["payment-service", "transaction-service"]),
        scenario!("regulatory-report", "Regulatory Report Generation",
            "End-of-month regulatory reporting causing system load",
            "Running regulatory compliance reports is putting heavy load on reporting systems.",
            60, 0.03, 2.5, ["reporting-service", "audit-service"]),
    ]),
    ("insurance", &[
        scenario!("claims-backlog", "Claims Processing Backlog",
            "High volume of claims causing processing delays",
            "A major storm has resulted in thousands of claims being filed simultaneously.",
            45, 0.04, 3.5, ["claims-processing", "document-management"]),
        scenario!("renewal-rush", "Policy Renewal Rush",
            "End of quarter policy renewals overwhelming the system",
            "It's policy renewal season and the system is processing thousands of renewals per hour.",
            50, 0.06, 2.5, ["policy-management", "renewal-service", "payment-service"]),
        scenario!("underwriting-overload", "Underwriting System Overload",
            "Risk assessment system struggling with complex calculations",
            "Complex underwriting calculations are taking too long, delaying quote generation.",
            30, 0.05, 4.0, ["underwriting-engine", "risk-assessment", "quote-engine"]),
        scenario!("disaster-claims", "Natural Disaster Claims Surge",
            "Hurricane causes massive influx of property claims",
            "A hurricane has hit and we're receiving claims at 20x normal volume.",
            120, 0.08, 3.0, ["claims-processing", "fraud-detection", "document-management", "customer-portal"]),
    ]),
    ("gaming", &[
        scenario!("matchmaking-delays", "Server Matchmaking Delays",
            "Matchmaking service taking too long to find matches",
            "Players are waiting in queue for extended periods. Matchmaking algorithms are struggling.",
            20, 0.04, 5.0, ["matchmaking-service", "game-server"]),
        scenario!("ddos-attack", "DDoS Attack Pattern",
            "Distributed denial of service attack overwhelming servers",
            "We're under DDoS attack. Game servers are receiving malicious traffic.",
            35, 0.30, 8.0, ["game-server", "authentication-service", "session-management"]),
        scenario!("season-launch", "Season Launch Traffic",
            "New game season causing massive player surge",
            "New season just launched and we have 10x normal concurrent players trying to log in.",
            40, 0.07, 4.0, ["game-server", "authentication-service", "player-service", "leaderboard-service"]),
        scenario!("store-issues", "In-game Store Issues",
            "Microtransaction system experiencing payment failures",
            "Players can't complete purchases in the store. Payment processing is failing.",
            25, 0.15, 2.0, ["store-service", "payment-service", "inventory-service"]),
        scenario!("ban-wave", "Player Ban Wave Processing",
            "Anti-cheat system processing large ban wave",
            "Anti-cheat detected widespread cheating. Processing thousands of account bans.",
            30, 0.03, 2.5, ["anti-cheat", "player-service", "analytics-service"]),
    ]),
    ("healthcare", &[
        scenario!("ehr-slowdown", "EHR System Slowdown",
            "Electronic health records system experiencing performance issues",
            "Physicians are reporting slow access to patient records. EHR system is degraded.",
            35, 0.06, 4.5, ["ehr-service", "patient-monitoring", "prescription-service"]),
        scenario!("appointment-surge", "Appointment Scheduling Surge",
            "Flu season causing appointment booking spike",
            "It's flu season. Appointment scheduling system overwhelmed with booking requests.",
            45, 0.05, 3.0, ["appointment-scheduling", "patient-portal", "notification-service"]),
        scenario!("lab-delays", "Lab Results Processing Delay",
            "Lab interface experiencing delays in result delivery",
            "Lab results are delayed. Integration with external lab systems is slow.",
            50, 0.08, 5.0, ["lab-results", "integration-hub", "notification-service"]),
        scenario!("emergency-alert", "Emergency Alert System Test",
            "Testing emergency notification system under load",
            "Running quarterly emergency notification test. System sending alerts to all providers.",
            15, 0.02, 2.0, ["emergency-service", "notification-service", "provider-directory"]),
    ]),
    ("logistics", &[
        scenario!("holiday-rush", "Holiday Shipping Rush",
            "Peak holiday season causing system overload",
            "Holiday season is here. Order volumes are 15x normal and system is struggling.",
            60, 0.06, 3.5, ["order-management", "warehouse-management", "shipping-service", "tracking-service"]),
        scenario!("weather-delays", "Weather-Related Delays",
            "Severe weather affecting route optimization and tracking",
            "Snowstorm in midwest disrupting deliveries. Route optimization recalculating constantly.",
            90, 0.10, 4.0, ["route-optimization", "driver-app", "tracking-service", "delivery-scheduling"]),
        scenario!("warehouse-automation", "Warehouse Automation Issues",
            "Automated warehouse systems experiencing malfunctions",
            "Warehouse robots are reporting errors. Inventory movements are delayed.",
            40, 0.12, 3.0, ["warehouse-management", "inventory-service", "order-management"]),
        scenario!("route-failures", "Route Optimization Failures",
            "Route calculation system producing suboptimal routes",
            "Route optimization algorithm failing. Drivers getting inefficient routes, increasing costs.",
            35, 0.15, 6.0, ["route-optimization", "fleet-management"]),
        scenario!("last-mile-surge", "Last-Mile Delivery Surge",
            "Same-day delivery promises causing driver app overload",
            "Same-day delivery spike. Driver app struggling with real-time updates and location tracking.",
            30, 0.08, 2.5, ["driver-app", "delivery-scheduling", "tracking-service", "customer-portal"]),
    ]),
];
