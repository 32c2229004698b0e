//! Literal value domain for command arguments.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A literal argument value. This is the whole domain the command grammar
/// admits: scalars and flat-or-nested ordered lists of them, nothing else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
}

impl Value {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric view: integers widen to float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// Model-facing rendering, used in usage lines and help text. The dialect is
/// the one the model is expected to emit, so strings come out quoted and the
/// word literals use their capitalized spellings.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "None"),
            Self::Bool(true) => write!(f, "True"),
            Self::Bool(false) => write!(f, "False"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(text) => {
                write!(f, "\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
            }
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_model_facing_dialect() {
        assert_eq!(Value::Null.to_string(), "None");
        assert_eq!(Value::Bool(true).to_string(), "True");
        assert_eq!(Value::Int(-3).to_string(), "-3");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::Str("hi \"there\"".into()).to_string(), "\"hi \\\"there\\\"\"");
        assert_eq!(
            Value::List(vec![Value::Int(1), Value::Str("a".into())]).to_string(),
            "[1, \"a\"]"
        );
    }

    #[test]
    fn numeric_accessors_widen_but_never_narrow() {
        assert_eq!(Value::Int(7).as_f64(), Some(7.0));
        assert_eq!(Value::Float(7.0).as_i64(), None);
        assert_eq!(Value::Str("7".into()).as_f64(), None);
    }

    #[test]
    fn serde_round_trip() {
        let value = Value::List(vec![
            Value::Int(1),
            Value::Float(2.5),
            Value::Str("x".into()),
            Value::Bool(false),
            Value::Null,
        ]);
        let encoded = serde_json::to_string(&value).expect("serialize");
        let decoded: Value = serde_json::from_str(&encoded).expect("deserialize");
        assert_eq!(decoded, value);
    }
}
