//! Pact code as a small expression tree.
//!
//! Building code by splicing strings lets a crafted argument close a string
//! literal and append its own forms. Values here are escaped when rendered
//! and symbols are validated on construction.

use pactsign_types::{PactError, PactResult};
use std::fmt;

/// A Pact expression.
#[derive(Debug, Clone, PartialEq)]
pub enum PactExpr {
    /// A bare name such as `coin.transfer`.
    Symbol(String),
    Str(String),
    Integer(i64),
    /// Rendered with a decimal point, as Pact requires. Must be finite;
    /// [`PactExpr::decimal`] and [`PactExpr::app`] reject NaN and infinities.
    Decimal(f64),
    Bool(bool),
    List(Vec<PactExpr>),
    Object(Vec<(String, PactExpr)>),
    /// Function application `(f a b ...)`.
    App(String, Vec<PactExpr>),
}

impl PactExpr {
    /// A validated symbol.
    pub fn symbol(name: &str) -> PactResult<Self> {
        validate_symbol(name)?;
        Ok(Self::Symbol(name.to_string()))
    }

    /// A validated application, e.g. `app("coin.transfer", [...])`.
    pub fn app(func: &str, args: impl IntoIterator<Item = PactExpr>) -> PactResult<Self> {
        validate_symbol(func)?;
        let args: Vec<PactExpr> = args.into_iter().collect();
        args.iter().try_for_each(PactExpr::validate_numbers)?;
        Ok(Self::App(func.to_string(), args))
    }

    pub fn decimal(value: f64) -> PactResult<Self> {
        if !value.is_finite() {
            return Err(PactError::InvalidArgument(format!(
                "Pact decimals must be finite, got {value}"
            )));
        }
        Ok(Self::Decimal(value))
    }

    fn validate_numbers(&self) -> PactResult<()> {
        match self {
            Self::Decimal(d) => Self::decimal(*d).map(|_| ()),
            Self::List(items) | Self::App(_, items) => {
                items.iter().try_for_each(Self::validate_numbers)
            }
            Self::Object(fields) => fields
                .iter()
                .try_for_each(|(_, value)| value.validate_numbers()),
            _ => Ok(()),
        }
    }

    pub fn string(s: impl Into<String>) -> Self {
        Self::Str(s.into())
    }

    /// `(read-keyset "name")`
    pub fn read_keyset(name: impl Into<String>) -> Self {
        Self::App("read-keyset".into(), vec![Self::Str(name.into())])
    }

    /// `(read-msg "key")`
    pub fn read_msg(key: impl Into<String>) -> Self {
        Self::App("read-msg".into(), vec![Self::Str(key.into())])
    }

    /// `(read-decimal "key")`
    pub fn read_decimal(key: impl Into<String>) -> Self {
        Self::App("read-decimal".into(), vec![Self::Str(key.into())])
    }
}

/// Builds `(func arg ...)` as a code string.
pub fn mk_exp(func: &str, args: impl IntoIterator<Item = PactExpr>) -> PactResult<String> {
    Ok(PactExpr::app(func, args)?.to_string())
}

fn validate_symbol(name: &str) -> PactResult<()> {
    let bad = |c: char| c.is_whitespace() || matches!(c, '(' | ')' | '[' | ']' | '{' | '}' | '"' | ',' | ';');
    if name.is_empty() || name.chars().any(bad) {
        return Err(PactError::InvalidArgument(format!(
            "not a valid Pact symbol: {name:?}"
        )));
    }
    Ok(())
}

fn write_str_literal(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            _ => write!(f, "{c}")?,
        }
    }
    f.write_str("\"")
}

impl fmt::Display for PactExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Symbol(name) => f.write_str(name),
            Self::Str(s) => write_str_literal(f, s),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Decimal(d) => {
                let rendered = d.to_string();
                if rendered.contains('.') {
                    f.write_str(&rendered)
                } else {
                    write!(f, "{rendered}.0")
                }
            }
            Self::Bool(b) => write!(f, "{b}"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Object(fields) => {
                f.write_str("{")?;
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_str_literal(f, key)?;
                    write!(f, ": {value}")?;
                }
                f.write_str("}")
            }
            Self::App(func, args) => {
                write!(f, "({func}")?;
                for arg in args {
                    write!(f, " {arg}")?;
                }
                f.write_str(")")
            }
        }
    }
}
