/// Format a float as a dollar amount with thousands separators: $1,234.56
pub fn money(val: f64) -> String {
    let negative = val < 0.0;
    let cents = format!("{:.2}", val.abs());
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((&cents, "00"));

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    if negative {
        format!("-${with_commas}.{dec_part}")
    } else {
        format!("${with_commas}.{dec_part}")
    }
}

/// Sign bucket used to color amounts. Zero is positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    pub fn of(val: f64) -> Self {
        if val >= 0.0 {
            Self::Positive
        } else {
            Self::Negative
        }
    }
}

/// Round to cents. Negative zero comes back as `0.0`.
pub fn round_cents(val: f64) -> f64 {
    let rounded = (val * 100.0).round() / 100.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Fixed two-decimal text plus the sign that decides its color. Both come
/// from the value rounded to cents, so `-0.004` reads `0.00` and is positive.
#[derive(Debug, Clone, PartialEq)]
pub struct Amount {
    pub text: String,
    pub sign: Sign,
}

impl Amount {
    pub fn new(val: f64) -> Self {
        let cents = round_cents(val);
        Self {
            text: format!("{cents:.2}"),
            sign: Sign::of(cents),
        }
    }
}
