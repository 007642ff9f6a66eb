//! Canned entry-point operations per service family.

use rand::seq::SliceRandom;
use rand::Rng;

/// A synthetic HTTP operation on an entry service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub name: &'static str,
    pub method: &'static str,
    pub path: &'static str,
}

const fn op(name: &'static str, method: &'static str, path: &'static str) -> Operation {
    Operation { name, method, path }
}

/// Used when no family matches the entry service.
pub const DEFAULT_OPERATION: Operation = op("GET /", "GET", "/");

// Family key matches when it is a substring of the entry service name.
static FAMILIES: &[(&str, &[Operation])] = &[
    ("web-frontend", &[
        op("GET /products", "GET", "/products"),
        op("GET /product/:id", "GET", "/product/12345"),
        op("POST /cart/add", "POST", "/cart/add"),
        op("GET /checkout", "GET", "/checkout"),
    ]),
    ("mobile-app", &[
        op("POST /api/login", "POST", "/api/login"),
        op("GET /api/products", "GET", "/api/products"),
        op("POST /api/orders", "POST", "/api/orders"),
    ]),
    ("mobile-banking", &[
        op("POST /api/transfer", "POST", "/api/transfer"),
        op("GET /api/accounts", "GET", "/api/accounts"),
        op("GET /api/transactions", "GET", "/api/transactions"),
    ]),
    ("game-client", &[
        op("POST /match/join", "POST", "/match/join"),
        op("GET /player/stats", "GET", "/player/stats"),
        op("POST /game/action", "POST", "/game/action"),
    ]),
    ("patient-portal", &[
        op("GET /appointments", "GET", "/appointments"),
        op("POST /appointments/book", "POST", "/appointments/book"),
        op("GET /records", "GET", "/records"),
    ]),
];

/// Pick an operation for the entry service.
pub fn pick_operation<R: Rng + ?Sized>(service: &str, rng: &mut R) -> Operation {
    let name = service.to_ascii_lowercase();
    FAMILIES
        .iter()
        .find(|(family, _)| name.contains(family))
        .and_then(|(_, ops)| ops.choose(rng).copied())
        .unwrap_or(DEFAULT_OPERATION)
}
