//! Canonical schema constants for structured logging and events

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";

// Entity identifiers
pub const FIELD_CONTAINER_ID: &str = "container_id";
pub const FIELD_ELEMENT_ID: &str = "element_id";
pub const FIELD_RELATION_NAME: &str = "relation_name";
pub const FIELD_TYPE_TAG: &str = "type_tag";

// Cascade results
pub const FIELD_VISITED: &str = "visited";
pub const FIELD_CREATED: &str = "created";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
