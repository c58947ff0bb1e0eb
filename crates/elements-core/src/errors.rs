use elements_core_types::{RequestId, TraceId};
use thiserror::Error;

/// Result type alias using ElementsError
pub type Result<T> = std::result::Result<T, ElementsError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that outer surfaces (CLI, HTTP glue)
/// can use for programmatic handling without matching on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Existence
    NotFound,

    // Validation
    InvalidInput,
    InvalidTitle,
    InvalidConfiguration,
    RelationNotPermitted,
    UnknownElementType,

    // Traversal
    PublishTargetUnreachable,
    CascadeDepthExceeded,
    CycleDetected,

    // Integration/IO
    Io,
    Serialization,
    Persistence,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidTitle => "ERR_INVALID_TITLE",
            ExErrorKind::InvalidConfiguration => "ERR_INVALID_CONFIGURATION",
            ExErrorKind::RelationNotPermitted => "ERR_RELATION_NOT_PERMITTED",
            ExErrorKind::UnknownElementType => "ERR_UNKNOWN_ELEMENT_TYPE",
            ExErrorKind::PublishTargetUnreachable => "ERR_PUBLISH_TARGET_UNREACHABLE",
            ExErrorKind::CascadeDepthExceeded => "ERR_CASCADE_DEPTH_EXCEEDED",
            ExErrorKind::CycleDetected => "ERR_CYCLE_DETECTED",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// HTTP-equivalent status for the administrative surface
    pub fn http_status(&self) -> u16 {
        match self {
            ExErrorKind::NotFound => 404,
            ExErrorKind::InvalidInput
            | ExErrorKind::InvalidTitle
            | ExErrorKind::RelationNotPermitted
            | ExErrorKind::UnknownElementType => 400,
            ExErrorKind::PublishTargetUnreachable => 409,
            _ => 500,
        }
    }
}

/// Canonical structured error type
///
/// Carries classification plus the context an operator needs to find the
/// offending record: which operation, which entity, which request.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context (container or element id)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " (request_id: {})", request_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for element relation, cascade and seeding operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ElementsError {
    // ===== Existence =====
    /// Referenced container does not resolve to a loadable record
    #[error("Container not found: {container_id}")]
    ContainerNotFound { container_id: String },

    /// Referenced element does not resolve to a loadable record
    #[error("Element not found: {element_id}")]
    ElementNotFound { element_id: String },

    // ===== Validation =====
    #[error("Invalid title: {reason}")]
    InvalidTitle { reason: String },

    /// A configured type tag or inherit-from pointer is unusable
    #[error("Invalid configuration for {type_name}: {reason}")]
    InvalidConfiguration { type_name: String, reason: String },

    /// The relation/type pair is not declared for the owner type
    #[error("Element type {type_tag} is not permitted in relation {relation_name} of {owner_type}")]
    RelationNotPermitted {
        owner_type: String,
        relation_name: String,
        type_tag: String,
    },

    /// The type tag is not a registered element type
    #[error("Unknown element type: {type_tag}")]
    UnknownElementType { type_tag: String },

    /// A sibling already holds the largest representable sort position
    #[error("No sort position left after {max_sort} in {holder}")]
    SortExhausted { holder: String, max_sort: u32 },

    // ===== Traversal =====
    /// Walking up from the element never reached a root container
    #[error("No root container reachable from element {element_id}")]
    PublishTargetUnreachable { element_id: String },

    /// Tree deeper than the configured bound (treated as corruption)
    #[error("Cascade from {root_id} exceeded maximum depth {max_depth}")]
    CascadeDepthExceeded { root_id: String, max_depth: usize },

    /// An element was reached twice during one traversal
    #[error("Cycle detected at element {element_id}")]
    CycleDetected { element_id: String },

    // ===== Storage =====
    /// Storage write or read failed; cascades are left partially applied
    #[error("Persistence error in {op}: {message}")]
    Persistence { op: String, message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ElementsError {
    /// Canonical kind of this error
    pub fn kind(&self) -> ExErrorKind {
        match self {
            ElementsError::ContainerNotFound { .. } | ElementsError::ElementNotFound { .. } => {
                ExErrorKind::NotFound
            }
            ElementsError::InvalidTitle { .. } => ExErrorKind::InvalidTitle,
            ElementsError::InvalidConfiguration { .. } => ExErrorKind::InvalidConfiguration,
            ElementsError::RelationNotPermitted { .. } => ExErrorKind::RelationNotPermitted,
            ElementsError::UnknownElementType { .. } => ExErrorKind::UnknownElementType,
            ElementsError::SortExhausted { .. } => ExErrorKind::InvalidInput,
            ElementsError::PublishTargetUnreachable { .. } => {
                ExErrorKind::PublishTargetUnreachable
            }
            ElementsError::CascadeDepthExceeded { .. } => ExErrorKind::CascadeDepthExceeded,
            ElementsError::CycleDetected { .. } => ExErrorKind::CycleDetected,
            ElementsError::Persistence { .. } => ExErrorKind::Persistence,
            ElementsError::Serialization { .. } => ExErrorKind::Serialization,
            ElementsError::Internal { .. } => ExErrorKind::Internal,
        }
    }

    /// Persistence error helper for storage implementations
    pub fn persistence(op: impl Into<String>, message: impl Into<String>) -> Self {
        ElementsError::Persistence {
            op: op.into(),
            message: message.into(),
        }
    }
}

impl From<ElementsError> for ExError {
    fn from(err: ElementsError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        let ex = ExError::new(kind).with_message(message);

        match err {
            ElementsError::ContainerNotFound { container_id } => ex.with_entity_id(container_id),
            ElementsError::ElementNotFound { element_id }
            | ElementsError::PublishTargetUnreachable { element_id }
            | ElementsError::CycleDetected { element_id } => ex.with_entity_id(element_id),
            ElementsError::InvalidConfiguration { type_name, .. } => {
                ex.with_op("relation_config").with_entity_id(type_name)
            }
            ElementsError::RelationNotPermitted { owner_type, .. } => {
                ex.with_op("add_element").with_entity_id(owner_type)
            }
            ElementsError::UnknownElementType { type_tag } => {
                ex.with_op("instantiate").with_entity_id(type_tag)
            }
            ElementsError::CascadeDepthExceeded { root_id, .. } => {
                ex.with_op("cascade").with_entity_id(root_id)
            }
            ElementsError::SortExhausted { holder, .. } => {
                ex.with_op("next_sort").with_entity_id(holder)
            }
            ElementsError::Persistence { op, .. } => ex.with_op(op),
            ElementsError::InvalidTitle { .. }
            | ElementsError::Serialization { .. }
            | ElementsError::Internal { .. } => ex,
        }
    }
}

impl From<serde_json::Error> for ElementsError {
    fn from(err: serde_json::Error) -> Self {
        ElementsError::Serialization {
            message: err.to_string(),
        }
    }
}
