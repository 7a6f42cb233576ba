//=========================================================================
// Global Variables
//=========================================================================
//
// Mutable runtime values shared across scenes (score, difficulty, last
// checkpoint, ...). Plain storage; no change notification. Publish an
// event through the dispatcher when other systems need to react.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::fmt;

//=== VarValue ============================================================

/// A single runtime variable.
#[derive(Debug, Clone, PartialEq)]
pub enum VarValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl fmt::Display for VarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarValue::Int(v) => write!(f, "{v}"),
            VarValue::Float(v) => write!(f, "{v}"),
            VarValue::Bool(v) => write!(f, "{v}"),
            VarValue::Text(v) => f.write_str(v),
        }
    }
}

impl From<i64> for VarValue {
    fn from(value: i64) -> Self {
        VarValue::Int(value)
    }
}

impl From<f64> for VarValue {
    fn from(value: f64) -> Self {
        VarValue::Float(value)
    }
}

impl From<bool> for VarValue {
    fn from(value: bool) -> Self {
        VarValue::Bool(value)
    }
}

impl From<String> for VarValue {
    fn from(value: String) -> Self {
        VarValue::Text(value)
    }
}

impl From<&str> for VarValue {
    fn from(value: &str) -> Self {
        VarValue::Text(value.to_string())
    }
}

//=== GlobalVars ==========================================================

/// Named mutable values.
#[derive(Debug, Clone, Default)]
pub struct GlobalVars {
    values: HashMap<String, VarValue>,
}

impl GlobalVars {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name`, returning the previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<VarValue>) -> Option<VarValue> {
        self.values.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&VarValue> {
        self.values.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<VarValue> {
        self.values.remove(name)
    }

    /// Integer value, `None` if unset or not an integer.
    pub fn get_int(&self, name: &str) -> Option<i64> {
        match self.values.get(name)? {
            VarValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Float value; integers are widened.
    pub fn get_float(&self, name: &str) -> Option<f64> {
        match self.values.get(name)? {
            VarValue::Float(v) => Some(*v),
            VarValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.values.get(name)? {
            VarValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn get_text(&self, name: &str) -> Option<&str> {
        match self.values.get(name)? {
            VarValue::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Adds `delta` to an integer variable, starting from zero if unset.
    ///
    /// Returns the new value, or `None` (leaving the variable alone) if it
    /// holds a non-integer or the sum overflows `i64`.
    pub fn add_int(&mut self, name: &str, delta: i64) -> Option<i64> {
        let slot = self
            .values
            .entry(name.to_string())
            .or_insert(VarValue::Int(0));

        match slot {
            VarValue::Int(v) => {
                *v = v.checked_add(delta)?;
                Some(*v)
            }
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Removes every variable.
    pub fn clear(&mut self) {
        self.values.clear();
    }
}

//=========================================================================
// Tests
//=========================================================================
