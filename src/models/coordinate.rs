use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Sky position in decimal degrees
///
/// The range rules are advisory: the search service is the final arbiter and
/// the URL builder passes values through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct Coordinate {
    #[validate(range(min = 0.0, max = 360.0))]
    pub ra: f64,

    #[validate(range(min = -90.0, max = 90.0))]
    pub dec: f64,
}

impl Coordinate {
    pub fn new(ra: f64, dec: f64) -> Self {
        Self { ra, dec }
    }

    /// `ra,dec` with six decimal places, as the search endpoint expects
    pub fn to_query_value(&self) -> String {
        format!("{:3.6},{:3.6}", self.ra, self.dec)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(ra={:.6}, dec={:.6})", self.ra, self.dec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_value_has_six_decimals() {
        let coord = Coordinate::new(150.1, -2.25);
        assert_eq!(coord.to_query_value(), "150.100000,-2.250000");

        let coord = Coordinate::new(0.0, 0.0);
        assert_eq!(coord.to_query_value(), "0.000000,0.000000");
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(Coordinate::new(187.5, 12.3).validate().is_ok());
        assert!(Coordinate::new(400.0, 12.3).validate().is_err());
        assert!(Coordinate::new(10.0, -91.0).validate().is_err());
    }
}
