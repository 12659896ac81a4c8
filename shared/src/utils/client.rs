//! Client identifier construction for login throttling

/// Placeholder used when the client address cannot be determined
pub const UNKNOWN_CLIENT: &str = "unknown-ip";

/// Build the rate-limiting identifier for a client
///
/// Combines the network address with the attempted username so that one
/// address cannot exhaust the budget of every account, and one account
/// cannot be locked out from every address.
pub fn client_identifier(ip: Option<&str>, username: Option<&str>) -> String {
    let ip = ip
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .unwrap_or(UNKNOWN_CLIENT);

    match username.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => format!("{}:{}", ip, name),
        None => ip.to_string(),
    }
}
