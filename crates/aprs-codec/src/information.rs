//! The APRS information field and dialect dispatch.
//!
//! [`InformationField::classify`] tags a payload with its [`DataType`] and
//! keeps the raw bytes. Callers that want a dialect decoded further (for
//! example to turn a position payload into coordinates) register a
//! [`DialectHandler`] for that tag in a [`HandlerRegistry`] and classify
//! with [`InformationField::classify_with`].

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt::{self, Write as _};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::data_type::DataType;

// ---------------------------------------------------------------------------
// InformationField
// ---------------------------------------------------------------------------

/// The payload that follows the address field of a frame.
///
/// `payload` includes the leading data type identifier byte.
///
/// # Examples
///
/// ```
/// use aprs_codec::{DataType, InformationField};
///
/// let info = InformationField::classify(b">hello");
/// assert_eq!(info.data_type(), DataType::Status);
/// assert_eq!(info.to_string(), ">hello");
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct InformationField {
    data_type: DataType,
    payload: Vec<u8>,
    trusted_text: bool,
}

impl InformationField {
    /// Build a field from already classified parts.
    ///
    /// `trusted_text` selects the escaping text rendering (`true`) over the
    /// replacement-character one (`false`).
    pub fn new(payload: impl Into<Vec<u8>>, data_type: DataType, trusted_text: bool) -> Self {
        Self {
            data_type,
            payload: payload.into(),
            trusted_text,
        }
    }

    /// Classify `payload` by its first byte and keep it verbatim.
    pub fn classify(payload: &[u8]) -> Self {
        Self::classify_with(payload, &HandlerRegistry::default())
    }

    /// Classify `payload`, handing it to the handler registered for its
    /// data type when there is one.
    pub fn classify_with(payload: &[u8], handlers: &HandlerRegistry) -> Self {
        let Some(&identifier) = payload.first() else {
            return Self::default();
        };

        let data_type = DataType::from_identifier(identifier);
        match handlers.handler_for(data_type) {
            Some(handler) => handler.handle(payload, data_type),
            None => Self::new(payload, data_type, true),
        }
    }

    /// The dialect announced by the first payload byte.
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// The raw payload, data type identifier included.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Consume the field and return the raw payload.
    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    /// Whether the payload is rendered with escaped, rather than replaced,
    /// invalid UTF-8.
    pub fn is_trusted_text(&self) -> bool {
        self.trusted_text
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Render the payload as text.
    ///
    /// Trusted payloads keep invalid UTF-8 visible as `\xNN` escapes; other
    /// payloads substitute U+FFFD. Rendering never fails.
    pub fn to_text(&self) -> Cow<'_, str> {
        if self.trusted_text {
            escape_invalid_utf8(&self.payload)
        } else {
            String::from_utf8_lossy(&self.payload)
        }
    }
}

impl fmt::Display for InformationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

fn escape_invalid_utf8(bytes: &[u8]) -> Cow<'_, str> {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(bytes.len() + 8);
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
        for byte in chunk.invalid() {
            let _ = write!(out, "\\x{byte:02x}");
        }
    }
    Cow::Owned(out)
}

// ---------------------------------------------------------------------------
// Dialect handlers
// ---------------------------------------------------------------------------

/// Decodes the payload of one APRS dialect.
///
/// Any `Fn(&[u8], DataType) -> InformationField` closure is a handler.
pub trait DialectHandler: Send + Sync {
    /// Produce the information field for `payload`, whose first byte
    /// announced `data_type`.
    fn handle(&self, payload: &[u8], data_type: DataType) -> InformationField;
}

impl<F> DialectHandler for F
where
    F: Fn(&[u8], DataType) -> InformationField + Send + Sync,
{
    fn handle(&self, payload: &[u8], data_type: DataType) -> InformationField {
        self(payload, data_type)
    }
}

/// Maps data types to the handlers that decode them.
///
/// Data types without a dedicated handler go to the fallback handler when
/// one is set, and are otherwise stored raw.
///
/// ```
/// use aprs_codec::{DataType, HandlerRegistry, InformationField};
///
/// let handlers = HandlerRegistry::new().on(DataType::Status, |payload: &[u8], data_type| {
///     InformationField::new(payload.to_ascii_uppercase(), data_type, true)
/// });
///
/// let info = InformationField::classify_with(b">hello", &handlers);
/// assert_eq!(info.payload(), b">HELLO");
/// ```
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<DataType, Arc<dyn DialectHandler>>,
    fallback: Option<Arc<dyn DialectHandler>>,
}

impl HandlerRegistry {
    /// An empty registry: every payload is stored raw.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `data_type`, replacing any previous one.
    pub fn on(mut self, data_type: DataType, handler: impl DialectHandler + 'static) -> Self {
        self.register(data_type, handler);
        self
    }

    /// Set the handler used for data types without a dedicated handler.
    pub fn otherwise(mut self, handler: impl DialectHandler + 'static) -> Self {
        self.fallback = Some(Arc::new(handler));
        self
    }

    /// Register `handler` for `data_type` in place.
    pub fn register(&mut self, data_type: DataType, handler: impl DialectHandler + 'static) {
        self.handlers.insert(data_type, Arc::new(handler));
    }

    /// The handler that will receive payloads of `data_type`, if any.
    pub fn handler_for(&self, data_type: DataType) -> Option<&dyn DialectHandler> {
        self.handlers
            .get(&data_type)
            .or(self.fallback.as_ref())
            .map(|handler| handler.as_ref())
    }

    /// Whether no handler at all is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty() && self.fallback.is_none()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handled", &self.handlers.keys().collect::<Vec<_>>())
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
