use serde_json::Value;

/// Render a response payload as pretty-printed JSON.
pub fn render_json(payload: &Value) -> String {
    serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string())
}

/// Render the node/status pair as a short human-readable summary.
pub fn render_status(node: &Value, status: &Value) -> String {
    let mut out = String::new();

    let version = node["version"].as_str().unwrap_or("unknown");
    let hostname = node["hostname"].as_str().unwrap_or("unknown");
    out.push_str(&format!("Gateway {} on {}\n", version, hostname));

    if let Some(reachable) = status["database"]["reachable"].as_bool() {
        out.push_str(&format!(
            "  database: {}\n",
            if reachable { "reachable" } else { "UNREACHABLE" }
        ));
    }

    let server = &status["server"];
    for key in [
        "connections_accepted",
        "connections_active",
        "total_requests",
    ] {
        if let Some(count) = server[key].as_u64() {
            out.push_str(&format!("  {}: {}\n", key, count));
        }
    }

    out
}
