use std::time::Duration;

use crate::session::Session;

/// Status reported for any call that did not produce an HTTP response.
pub const TRANSPORT_FAILURE_STATUS: u16 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// How long a single call may take before it is abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutClass {
    /// Every call made while scenarios are running.
    Normal,
    /// The one-off request that resets the target's data.
    Reset,
}

impl TimeoutClass {
    pub fn duration(&self) -> Duration {
        match self {
            TimeoutClass::Normal => Duration::from_secs(30),
            TimeoutClass::Reset => Duration::from_secs(12 * 60),
        }
    }
}

/// One logical call to the target: a method, a path with its query and an optional form body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,
    path: String,
    form: Vec<(String, String)>,
}

impl Request {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            form: Vec::new(),
        }
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            form: Vec::new(),
        }
    }

    pub fn with_form_field(mut self, name: &str, value: impl Into<String>) -> Self {
        self.form.push((name.to_string(), value.into()));
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn form(&self) -> &[(String, String)] {
        &self.form
    }
}

/// What the scenario code sees of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub session: Session,
}

/// A rendered page, as fetched by the validation checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub status: u16,
    pub body: String,
}
