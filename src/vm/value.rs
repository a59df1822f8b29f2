use std::fmt::Display;

/// A constant known at compile time, and the only thing the VM ever stores on its stack.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Bool(bool),
    String(String),
    Null,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    Integer,
    Float,
    Bool,
    String,
    Null,
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Integer(_) => ValueType::Integer,
            Value::Float(_) => ValueType::Float,
            Value::Bool(_) => ValueType::Bool,
            Value::String(_) => ValueType::String,
            Value::Null => ValueType::Null,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Integer(i) => *i != 0,
            Value::Float(n) => *n != 0.0,
            Value::String(s) => !s.is_empty(),
        }
    }

    /// Turns a finite Float with no fractional part into the equivalent Integer,
    /// provided it fits. Every other value is returned unchanged.
    pub fn narrow(self) -> Self {
        match self {
            Value::Float(n)
                if n.is_finite() && n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 =>
            {
                Value::Integer(n as i64)
            }
            other => other,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(n) => write!(f, "{:?}", n),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::String(s) => write!(f, "{}", s),
            Value::Null => write!(f, "null"),
        }
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ValueType::Integer => write!(f, "Integer"),
            ValueType::Float => write!(f, "Float"),
            ValueType::Bool => write!(f, "Bool"),
            ValueType::String => write!(f, "String"),
            ValueType::Null => write!(f, "Null"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Value::Integer(-12)), "-12");
        assert_eq!(format!("{}", Value::Float(2.0)), "2.0");
        assert_eq!(format!("{}", Value::Float(0.1)), "0.1");
        assert_eq!(format!("{}", Value::Bool(true)), "True");
        assert_eq!(format!("{}", Value::String("abc".to_string())), "abc");
        assert_eq!(format!("{}", Value::Null), "null");
        assert_eq!(format!("{}", ValueType::Integer), "Integer");
    }

    #[test]
    fn test_narrow() {
        assert_eq!(Value::Float(124.0).narrow(), Value::Integer(124));
        assert_eq!(Value::Float(-3.0).narrow(), Value::Integer(-3));
        assert_eq!(Value::Float(124.2).narrow(), Value::Float(124.2));
        assert_eq!(Value::Float(1e300).narrow(), Value::Float(1e300));
        assert!(matches!(Value::Float(f64::NAN).narrow(), Value::Float(n) if n.is_nan()));
        assert_eq!(Value::String("1.0".to_string()).narrow(), Value::String("1.0".to_string()));
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Integer(0).is_truthy());
        assert!(!Value::Float(0.0).is_truthy());
        assert!(!Value::String(String::new()).is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(Value::Integer(-1).is_truthy());
    }
}
