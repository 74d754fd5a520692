//! Method-channel surface: calls, replies, and the dispatch table.
//!
//! A [`MethodChannel`] maps method names to handler functions. The host
//! runtime that owns the transport decodes an incoming message into a
//! [`MethodCall`], hands it to [`MethodChannel::dispatch`], and sends the
//! returned [`MethodReply`] back over the same channel.

use std::collections::HashMap;

/// A dynamically typed argument value, covering the scalar set a UI-layer
/// message codec delivers.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Map(HashMap<String, Value>),
}

impl Value {
    /// Numeric view of the value. Integers and doubles both coerce;
    /// everything else is `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Double(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Bytes(bytes)
    }
}

/// A named method invocation with named arguments.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MethodCall {
    method: String,
    arguments: HashMap<String, Value>,
}

impl MethodCall {
    pub fn new(method: impl Into<String>) -> Self {
        MethodCall {
            method: method.into(),
            arguments: HashMap::new(),
        }
    }

    pub fn with_argument(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(name.into(), value.into());
        self
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments.get(name)
    }
}

/// The outcome of dispatching a [`MethodCall`].
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum MethodReply {
    Success(Value),
    Error { code: String, message: String },
    NotImplemented,
}

impl MethodReply {
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        MethodReply::Error {
            code: code.into(),
            message: message.into(),
        }
    }
}

type Handler = Box<dyn Fn(&MethodCall) -> MethodReply + Send + Sync>;

/// A named dispatch table of method handlers.
///
/// Handlers take `&MethodCall` and the table is only read after
/// registration, so independent calls may be dispatched concurrently.
pub struct MethodChannel {
    name: String,
    handlers: HashMap<String, Handler>,
}

impl MethodChannel {
    pub fn new(name: impl Into<String>) -> Self {
        MethodChannel {
            name: name.into(),
            handlers: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn register<F>(&mut self, method: impl Into<String>, handler: F)
    where
        F: Fn(&MethodCall) -> MethodReply + Send + Sync + 'static,
    {
        self.handlers.insert(method.into(), Box::new(handler));
    }

    /// Invoke the handler registered for the call's method name.
    ///
    /// Unknown method names get [`MethodReply::NotImplemented`], not an
    /// error.
    pub fn dispatch(&self, call: &MethodCall) -> MethodReply {
        match self.handlers.get(call.method()) {
            Some(handler) => handler(call),
            None => {
                log::debug!(
                    "No handler registered on `{}` for method `{}`",
                    self.name,
                    call.method()
                );
                MethodReply::NotImplemented
            }
        }
    }
}

#[test]
fn dispatch_unknown_method_is_not_implemented() {
    let channel = MethodChannel::new("test/channel");
    let call = MethodCall::new("rotateMarker");

    assert_eq!(channel.dispatch(&call), MethodReply::NotImplemented);
}

#[test]
fn dispatch_invokes_registered_handler() {
    let mut channel = MethodChannel::new("test/channel");
    channel.register("echo", |call| {
        MethodReply::Success(call.argument("value").cloned().unwrap_or(Value::Null))
    });

    let call = MethodCall::new("echo").with_argument("value", "marker");
    assert_eq!(
        channel.dispatch(&call),
        MethodReply::Success(Value::Str("marker".to_string()))
    );
}

#[test]
fn numeric_values_coerce_to_f64() {
    assert_eq!(Value::Int(42).as_f64(), Some(42.0));
    assert_eq!(Value::Double(2.5).as_f64(), Some(2.5));
    assert_eq!(Value::Str("42".to_string()).as_f64(), None);
    assert_eq!(Value::Null.as_f64(), None);
}

#[test]
fn only_byte_buffers_expose_bytes() {
    assert_eq!(Value::Bytes(vec![1, 2, 3]).as_bytes(), Some(&[1u8, 2, 3][..]));
    assert_eq!(Value::Str("abc".to_string()).as_bytes(), None);
}
