use std::any::Any;
use std::cmp::Ordering;
use std::fmt::{Debug, Display};
use std::rc::Rc;

/// A value produced by a native function that scripts can only pass around.
pub trait HostObject: Debug + Display {
    fn as_any(&self) -> &dyn Any;
}

#[derive(Debug, Clone)]
pub enum Object {
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Opaque(Rc<dyn HostObject>),
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) => true,
            (Self::Null, Self::Null) => true,
            (Self::Boolean(left), Self::Boolean(right)) => left == right,
            (Self::Number(left), Self::Number(right)) => left == right,
            (Self::String(left), Self::String(right)) => left == right,
            (Self::Opaque(left), Self::Opaque(right)) => Rc::ptr_eq(left, right),
            _ => false,
        }
    }
}

impl Object {
    pub fn opaque<T: HostObject + 'static>(value: T) -> Self {
        Self::Opaque(Rc::new(value))
    }

    pub fn number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn string(&self) -> Option<String> {
        match self {
            Self::String(s) => Some(s.clone()),
            _ => None,
        }
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        match self {
            Self::Opaque(host) => host.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Falsy values are `false`, `undefined` and `null`; everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Self::Undefined | Self::Null | Self::Boolean(false))
    }

    pub fn to_number(&self) -> f64 {
        match self {
            Self::Undefined | Self::Opaque(_) => f64::NAN,
            Self::Null => 0.0,
            Self::Boolean(b) => f64::from(u8::from(*b)),
            Self::Number(n) => *n,
            Self::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse().unwrap_or(f64::NAN)
                }
            }
        }
    }

    /// `+` concatenates as soon as one side is a string, otherwise it adds numerically.
    pub fn plus(&self, other: &Object) -> Object {
        match (self, other) {
            (Self::String(_), _) | (_, Self::String(_)) => Self::String(format!("{self}{other}")),
            _ => Self::Number(self.to_number() + other.to_number()),
        }
    }

    /// Equality used by `==` and `!=`: `null` and `undefined` only equal each other,
    /// strings compare by content, host objects by identity and the rest numerically.
    pub fn loosely_equals(&self, other: &Object) -> bool {
        match (self, other) {
            (Self::Undefined | Self::Null, Self::Undefined | Self::Null) => true,
            (Self::Undefined | Self::Null, _) | (_, Self::Undefined | Self::Null) => false,
            (Self::String(left), Self::String(right)) => left == right,
            (Self::Opaque(left), Self::Opaque(right)) => Rc::ptr_eq(left, right),
            (Self::Opaque(_), _) | (_, Self::Opaque(_)) => false,
            _ => self.to_number() == other.to_number(),
        }
    }

    /// Ordering used by `<`, `<=`, `>` and `>=`. `None` when the values are unordered,
    /// which makes every relational comparison false.
    pub fn compare(&self, other: &Object) -> Option<Ordering> {
        match (self, other) {
            (Self::String(left), Self::String(right)) => Some(left.cmp(right)),
            _ => self.to_number().partial_cmp(&other.to_number()),
        }
    }
}

impl Display for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Undefined => write!(f, "undefined"),
            Self::Null => write!(f, "null"),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Number(n) if n.is_infinite() => {
                write!(f, "{}Infinity", if n.is_sign_negative() { "-" } else { "" })
            }
            Self::Number(n) => write!(f, "{}", n),
            Self::String(s) => write!(f, "{}", s),
            Self::Opaque(host) => write!(f, "{}", host),
        }
    }
}
