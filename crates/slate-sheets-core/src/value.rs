//! Cell value result types

use std::fmt;

/// Formula error values
///
/// These are result values, not failures: they flow out of evaluation,
/// are cached like any other result, and propagate through formulas that
/// read a cell carrying one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellError {
    /// #REF! - Invalid cell reference
    Ref,
    /// #VALUE! - Wrong type of operand
    Value,
    /// #DIV/0! - Division by zero
    Div0,
}

impl CellError {
    /// Get the display token for this error
    pub fn as_str(&self) -> &'static str {
        match self {
            CellError::Ref => "#REF!",
            CellError::Value => "#VALUE!",
            CellError::Div0 => "#DIV/0!",
        }
    }

    /// Parse an error token
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "#REF!" => Some(CellError::Ref),
            "#VALUE!" => Some(CellError::Value),
            "#DIV/0!" => Some(CellError::Div0),
            _ => None,
        }
    }
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The value a cell presents to readers
///
/// Empty cells present the empty string; text cells their display text;
/// formula cells a number or a [`CellError`].
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Numeric value
    Number(f64),
    /// String value
    String(String),
    /// Formula error value
    Error(CellError),
}

impl CellValue {
    /// Try to get the value as a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get the value as a string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the error value, if any
    pub fn as_error(&self) -> Option<CellError> {
        match self {
            CellValue::Error(e) => Some(*e),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write_number(f, *n),
            CellValue::String(s) => write!(f, "{}", s),
            CellValue::Error(e) => write!(f, "{}", e),
        }
    }
}

/// Render a number the way a default-configured output stream does: six
/// significant digits, fixed notation for exponents in [-4, 5], scientific
/// notation otherwise, trailing zeros dropped
fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if !n.is_finite() {
        return write!(f, "{}", n);
    }
    if n == 0.0 {
        return write!(f, "{}", if n.is_sign_negative() { "-0" } else { "0" });
    }

    // round to six significant digits first; the rounded exponent picks
    // the notation
    let sci = format!("{:.5e}", n);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return write!(f, "{}", n);
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return write!(f, "{}", n);
    };

    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let digits: String = mantissa.chars().filter(|c| c.is_ascii_digit()).collect();

    if (-4..6).contains(&exp) {
        if exp >= 0 {
            let split = (exp + 1) as usize;
            let int_part = &digits[..split];
            let frac_part = digits[split..].trim_end_matches('0');
            if frac_part.is_empty() {
                write!(f, "{}{}", sign, int_part)
            } else {
                write!(f, "{}{}.{}", sign, int_part, frac_part)
            }
        } else {
            let frac = digits.trim_end_matches('0');
            let leading_zeros = "0".repeat((-exp - 1) as usize);
            write!(f, "{}0.{}{}", sign, leading_zeros, frac)
        }
    } else {
        let exp_sign = if exp < 0 { '-' } else { '+' };
        let frac = digits[1..].trim_end_matches('0');
        if frac.is_empty() {
            write!(f, "{}{}e{}{:02}", sign, &digits[..1], exp_sign, exp.abs())
        } else {
            write!(
                f,
                "{}{}.{}e{}{:02}",
                sign,
                &digits[..1],
                frac,
                exp_sign,
                exp.abs()
            )
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.into())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<CellError> for CellValue {
    fn from(e: CellError) -> Self {
        CellValue::Error(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_error_display() {
        assert_eq!(CellError::Ref.to_string(), "#REF!");
        assert_eq!(CellError::Value.to_string(), "#VALUE!");
        assert_eq!(CellError::Div0.to_string(), "#DIV/0!");
    }

    #[test]
    fn test_cell_error_parse() {
        assert_eq!(CellError::from_str("#REF!"), Some(CellError::Ref));
        assert_eq!(CellError::from_str("#DIV/0!"), Some(CellError::Div0));
        assert_eq!(CellError::from_str("#NAME?"), None);
    }

    #[test]
    fn test_cell_value_display() {
        assert_eq!(CellValue::Number(5.0).to_string(), "5");
        assert_eq!(CellValue::Number(3.14).to_string(), "3.14");
        assert_eq!(CellValue::String("hi".into()).to_string(), "hi");
        assert_eq!(CellValue::Error(CellError::Value).to_string(), "#VALUE!");
    }

    #[test]
    fn test_number_display_six_significant_digits() {
        assert_eq!(CellValue::Number(1.0 / 3.0).to_string(), "0.333333");
        assert_eq!(CellValue::Number(2.0 / 3.0).to_string(), "0.666667");
        assert_eq!(CellValue::Number(-2.5).to_string(), "-2.5");
        assert_eq!(CellValue::Number(0.0).to_string(), "0");

        // fixed notation up to six integer digits, then scientific
        assert_eq!(CellValue::Number(123456.0).to_string(), "123456");
        assert_eq!(CellValue::Number(1234567.0).to_string(), "1.23457e+06");
        assert_eq!(CellValue::Number(1e10).to_string(), "1e+10");

        // fixed notation down to 1e-4, then scientific
        assert_eq!(CellValue::Number(0.0001).to_string(), "0.0001");
        assert_eq!(CellValue::Number(0.00001).to_string(), "1e-05");
    }

    #[test]
    fn test_cell_value_accessors() {
        assert_eq!(CellValue::Number(2.0).as_number(), Some(2.0));
        assert_eq!(CellValue::from("x").as_string(), Some("x"));
        assert_eq!(
            CellValue::from(CellError::Ref).as_error(),
            Some(CellError::Ref)
        );
        assert_eq!(CellValue::Number(2.0).as_string(), None);
    }
}
