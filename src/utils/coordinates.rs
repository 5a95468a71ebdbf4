use crate::error::{PtfError, Result};

/// Convert a sexagesimal string (`DD:MM:SS.s`) to decimal units of its leading field
///
/// # Examples
/// ```
/// use ptf_images::utils::sexagesimal_to_decimal;
///
/// let decimal = sexagesimal_to_decimal("50:30:15").unwrap();
/// assert!((decimal - 50.504167).abs() < 0.000001);
/// ```
pub fn sexagesimal_to_decimal(value: &str) -> Result<f64> {
    let parts: Vec<&str> = value.trim().split(':').collect();

    if parts.len() != 3 {
        return Err(PtfError::InvalidCoordinate(format!(
            "Invalid sexagesimal format: '{}'. Expected format: 'DD:MM:SS'",
            value
        )));
    }

    // The sign lives on the leading field, which may be "-0"
    let is_negative = value.trim_start().starts_with('-');

    let degrees = parts[0].parse::<f64>().map_err(|_| {
        PtfError::InvalidCoordinate(format!("Invalid degrees value: '{}'", parts[0]))
    })?;

    let minutes = parts[1].parse::<f64>().map_err(|_| {
        PtfError::InvalidCoordinate(format!("Invalid minutes value: '{}'", parts[1]))
    })?;

    let seconds = parts[2].parse::<f64>().map_err(|_| {
        PtfError::InvalidCoordinate(format!("Invalid seconds value: '{}'", parts[2]))
    })?;

    if !(0.0..60.0).contains(&minutes) {
        return Err(PtfError::InvalidCoordinate(format!(
            "Minutes must be between 0 and 60, got: {}",
            minutes
        )));
    }

    if !(0.0..60.0).contains(&seconds) {
        return Err(PtfError::InvalidCoordinate(format!(
            "Seconds must be between 0 and 60, got: {}",
            seconds
        )));
    }

    let decimal_value = degrees.abs() + minutes / 60.0 + seconds / 3600.0;

    if is_negative {
        Ok(-decimal_value)
    } else {
        Ok(decimal_value)
    }
}

/// Convert decimal units to sexagesimal `D:MM:SS.ss`
pub fn decimal_to_sexagesimal(decimal: f64) -> String {
    let sign = if decimal < 0.0 { "-" } else { "" };
    let abs_decimal = decimal.abs();

    let whole = abs_decimal.floor() as i32;
    let minutes_decimal = (abs_decimal - whole as f64) * 60.0;
    let minutes = minutes_decimal.floor() as i32;
    let seconds = (minutes_decimal - minutes as f64) * 60.0;

    format!("{}{}:{:02}:{:05.2}", sign, whole, minutes, seconds)
}

/// Parse right ascension given in decimal degrees or `hh:mm:ss`
pub fn parse_ra(value: &str) -> Result<f64> {
    let trimmed = value.trim();

    if !trimmed.contains(':') {
        parse_decimal(trimmed)
    } else {
        // 1 hour of right ascension = 15 degrees
        Ok(sexagesimal_to_decimal(trimmed)? * 15.0)
    }
}

/// Parse declination given in decimal degrees or `dd:mm:ss`
pub fn parse_dec(value: &str) -> Result<f64> {
    let trimmed = value.trim();

    if !trimmed.contains(':') {
        parse_decimal(trimmed)
    } else {
        sexagesimal_to_decimal(trimmed)
    }
}

fn parse_decimal(value: &str) -> Result<f64> {
    match value.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => Ok(parsed),
        _ => Err(PtfError::InvalidCoordinate(format!(
            "Invalid coordinate value: '{}'",
            value
        ))),
    }
}
