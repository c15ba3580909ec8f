pub const INVALID_INPUT: &str = "invalid_input";
pub const UNKNOWN_TOOL: &str = "unknown_tool";
pub const NOT_CONFIGURED: &str = "not_configured";
pub const UPSTREAM_ERROR: &str = "upstream_error";
pub const TRANSPORT_ERROR: &str = "transport_error";
