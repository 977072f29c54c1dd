//! Numeric view of literal terms used by comparisons, ordering and aggregation.
//!
//! Promotion follows the XSD numeric tower: integer < decimal < double. Values are held
//! in `oxsdatatypes` types, so decimal arithmetic is exact. Integer overflow promotes to
//! decimal, decimal overflow to double. `xsd:float` is read as a double.

use crate::core::term::{Term, XSD, XSD_DECIMAL, XSD_DOUBLE, XSD_FLOAT, XSD_INTEGER};
use oxsdatatypes::{Decimal, Double, Integer};
use std::cmp::Ordering;
use std::str::FromStr;

const INTEGER_TYPES: &[&str] = &[
    "integer",
    "int",
    "long",
    "short",
    "byte",
    "nonNegativeInteger",
    "nonPositiveInteger",
    "positiveInteger",
    "negativeInteger",
    "unsignedLong",
    "unsignedInt",
    "unsignedShort",
    "unsignedByte",
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Integer(Integer),
    Decimal(Decimal),
    Double(Double),
}

impl Numeric {
    /// Coerces a literal to a number.
    ///
    /// Typed literals must carry an XSD numeric datatype with a valid lexical form;
    /// doubles and floats also accept `INF`, `-INF` and `NaN`. Plain literals without
    /// language tag are accepted when their lexical form is a finite number.
    pub fn from_term(term: &Term) -> Option<Numeric> {
        match term {
            Term::TypedLiteral { value, datatype } => {
                let local = datatype.strip_prefix(XSD)?;
                let value = value.trim();
                if INTEGER_TYPES.contains(&local) {
                    Integer::from_str(value).ok().map(Numeric::Integer)
                } else if local == "decimal" {
                    Decimal::from_str(value).ok().map(Numeric::Decimal)
                } else if local == "double" || local == "float" {
                    parse_double(value).map(Numeric::Double)
                } else {
                    None
                }
            }
            Term::PlainLiteral { value, language: None } => parse_lexical(value.trim()),
            _ => None,
        }
    }

    fn to_decimal(self) -> Option<Decimal> {
        match self {
            Numeric::Integer(i) => Some(i.into()),
            Numeric::Decimal(d) => Some(d),
            Numeric::Double(d) => {
                let value = f64::from(d);
                // Integral doubles in i64 range convert exactly
                if value.fract() == 0.0 && value.abs() < 9.223_372_036_854_775_807e18 {
                    Some(Decimal::from(value as i64))
                } else {
                    Decimal::try_from(d).ok()
                }
            }
        }
    }

    /// Correctly rounded double value, monotone in the exact value.
    fn approximate(self) -> f64 {
        match self {
            Numeric::Integer(i) => f64::from(Double::from(i)),
            Numeric::Decimal(d) => {
                d.to_string().parse::<f64>().unwrap_or_else(|_| f64::from(Double::from(d)))
            }
            Numeric::Double(d) => f64::from(d),
        }
    }

    fn to_double(self) -> Double {
        match self {
            Numeric::Integer(i) => i.into(),
            Numeric::Decimal(d) => d.into(),
            Numeric::Double(d) => d,
        }
    }

    fn is_nan(self) -> bool {
        matches!(self, Numeric::Double(d) if d.is_nan())
    }

    pub fn add(self, other: Numeric) -> Numeric {
        match (self, other) {
            (Numeric::Integer(a), Numeric::Integer(b)) => match a.checked_add(b) {
                Some(sum) => Numeric::Integer(sum),
                None => add_decimals(a.into(), b.into()),
            },
            (Numeric::Double(_), _) | (_, Numeric::Double(_)) => {
                Numeric::Double(self.to_double() + other.to_double())
            }
            _ => match (self.to_decimal(), other.to_decimal()) {
                (Some(a), Some(b)) => add_decimals(a, b),
                _ => Numeric::Double(self.to_double() + other.to_double()),
            },
        }
    }

    /// Divides by a positive count. Integers stay integral only on exact division.
    pub fn divide_by(self, count: usize) -> Numeric {
        let Ok(divisor) = i64::try_from(count) else {
            return Numeric::Double(self.to_double() / Double::from(count as f64));
        };
        let divisor = Integer::from(divisor);
        match self {
            Numeric::Integer(sum) => {
                if sum.checked_rem(divisor).is_some_and(|rest| rest == Integer::from(0)) {
                    if let Some(quotient) = sum.checked_div(divisor) {
                        return Numeric::Integer(quotient);
                    }
                }
                divide_decimal(sum.into(), divisor)
            }
            Numeric::Decimal(sum) => divide_decimal(sum, divisor),
            Numeric::Double(sum) => Numeric::Double(sum / Double::from(divisor)),
        }
    }

    /// Value comparison; `None` when either side is NaN.
    pub fn compare(self, other: Numeric) -> Option<Ordering> {
        if self.is_nan() || other.is_nan() {
            return None;
        }
        Some(self.total_cmp(other))
    }

    /// Total order over all numbers, consistent with [`Numeric::compare`] where that is
    /// defined. Values rank by their double approximation first and by their exact
    /// decimal value when approximations tie; NaN sorts after `INF`.
    pub fn total_cmp(self, other: Numeric) -> Ordering {
        if let (Numeric::Integer(a), Numeric::Integer(b)) = (self, other) {
            return a.cmp(&b);
        }
        self.approximate()
            .total_cmp(&other.approximate())
            .then_with(|| self.to_decimal().cmp(&other.to_decimal()))
    }

    pub fn is_zero(self) -> bool {
        match self {
            Numeric::Integer(i) => i == Integer::from(0),
            Numeric::Decimal(d) => d == Decimal::from(0),
            Numeric::Double(d) => d.is_nan() || f64::from(d) == 0.0,
        }
    }

    pub fn to_term(self) -> Term {
        match self {
            Numeric::Integer(i) => Term::typed(i.to_string(), XSD_INTEGER),
            Numeric::Decimal(d) => Term::typed(d.to_string(), XSD_DECIMAL),
            Numeric::Double(d) if d.is_finite() => {
                Term::typed(format!("{:E}", f64::from(d)), XSD_DOUBLE)
            }
            Numeric::Double(d) => Term::typed(d.to_string(), XSD_DOUBLE),
        }
    }
}

fn add_decimals(a: Decimal, b: Decimal) -> Numeric {
    match a.checked_add(b) {
        Some(sum) => Numeric::Decimal(sum),
        None => Numeric::Double(Double::from(a) + Double::from(b)),
    }
}

fn divide_decimal(sum: Decimal, divisor: Integer) -> Numeric {
    match sum.checked_div(divisor) {
        Some(quotient) => Numeric::Decimal(quotient),
        None => Numeric::Double(Double::from(sum) / Double::from(divisor)),
    }
}

/// True when the datatype IRI names one of the XSD numeric types.
pub fn is_numeric_datatype(datatype: &str) -> bool {
    datatype == XSD_DECIMAL
        || datatype == XSD_DOUBLE
        || datatype == XSD_FLOAT
        || datatype.strip_prefix(XSD).is_some_and(|local| INTEGER_TYPES.contains(&local))
}

fn parse_lexical(value: &str) -> Option<Numeric> {
    if !is_number_lexical(value) {
        return None;
    }
    if let Ok(i) = Integer::from_str(value) {
        return Some(Numeric::Integer(i));
    }
    if !value.contains(['e', 'E']) {
        if let Ok(d) = Decimal::from_str(value) {
            return Some(Numeric::Decimal(d));
        }
    }
    Double::from_str(value).ok().filter(|d| d.is_finite()).map(Numeric::Double)
}

fn parse_double(value: &str) -> Option<Double> {
    match value {
        "INF" | "+INF" => Some(Double::INFINITY),
        "-INF" => Some(Double::NEG_INFINITY),
        "NaN" => Some(Double::NAN),
        // str::parse also takes "inf" and "infinity", which are not XSD lexical forms
        _ if is_number_lexical(value) => Double::from_str(value).ok(),
        _ => None,
    }
}

fn is_number_lexical(value: &str) -> bool {
    !value.is_empty()
        && value.chars().any(|c| c.is_ascii_digit())
        && value.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
}
