/// Format a count or ratio for display: `,` groups thousands, `.` marks
/// `decimals` fractional digits.
///
/// ```
/// use dashboard_core::formatting::format_number;
///
/// assert_eq!(format_number(99441.0, 0), "99,441");
/// assert_eq!(format_number(3.25, 2), "3.25");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    format_with_separators(value, decimals, ',', '.')
}

/// Format a monetary amount as Brazilian reais, pt-BR style: `.` groups
/// thousands, `,` marks decimals, two decimal places.
///
/// # Examples
///
/// ```
/// use dashboard_core::formatting::format_brl;
///
/// assert_eq!(format_brl(1234.56), "R$ 1.234,56");
/// assert_eq!(format_brl(0.0),     "R$ 0,00");
/// assert_eq!(format_brl(-9.99),   "-R$ 9,99");
/// ```
pub fn format_brl(amount: f64) -> String {
    let body = format_with_separators(amount.abs(), 2, '.', ',');
    if amount < 0.0 {
        format!("-R$ {}", body)
    } else {
        format!("R$ {}", body)
    }
}

/// Round `value` half away from zero to `decimals` places.
///
/// Used for presentation only; aggregations keep full precision.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn format_with_separators(value: f64, decimals: u32, group_sep: char, decimal_sep: char) -> String {
    let negative = value < 0.0;
    let abs_value = value.abs();

    // Nudge by a relative epsilon so exact binary midpoints such as 1.005
    // round upward.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let integer_part = rounded.trunc() as u64;
    let frac_part = rounded - rounded.trunc();

    let grouped = group_thousands(&integer_part.to_string(), group_sep);

    let result = if decimals == 0 {
        grouped
    } else {
        let frac_str = format!("{:.prec$}", frac_part, prec = decimals as usize);
        // `frac_str` is "0.xx"; keep only the digits after the point.
        let digits = &frac_str[2..];
        format!("{}{}{}", grouped, decimal_sep, digits)
    };

    if negative && rounded != 0.0 {
        format!("-{}", result)
    } else {
        result
    }
}

/// Insert `sep` between groups of three digits, counted from the right.
fn group_thousands(digits: &str, sep: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(c);
    }
    out
}

// ── Tests ──────────────────────────────────────────────────────────────────────
