//! Validated value types shared across the chart crates.
//!
//! Each type checks its range once at construction, so code holding an `Age`, a
//! `ViralLoad` or a `Cd4Count` never has to re-check it.

/// Oldest age accepted for a patient, in whole years.
pub const MAX_AGE: u8 = 120;

/// Errors that can occur when creating validated value types.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TypeError {
    /// The age was outside `0..=MAX_AGE`
    #[error("age must be between 0 and {max}, got {0}", max = MAX_AGE)]
    AgeOutOfRange(i64),
    /// A measurement was below zero
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },
    /// A measurement was NaN or infinite
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
}

/// A patient's age in whole years, guaranteed to lie in `0..=MAX_AGE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Age(u8);

impl Age {
    /// Creates a new `Age`.
    ///
    /// The input is signed so that negative values coming from user input are reported
    /// as a range error rather than failing to parse.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::AgeOutOfRange` if `years` is negative or above `MAX_AGE`.
    pub fn new(years: i64) -> Result<Self, TypeError> {
        match u8::try_from(years) {
            Ok(v) if v <= MAX_AGE => Ok(Self(v)),
            _ => Err(TypeError::AgeOutOfRange(years)),
        }
    }

    /// Returns the age in years.
    pub fn years(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for Age {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl serde::Serialize for Age {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Age {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let years = i64::deserialize(deserializer)?;
        Age::new(years).map_err(serde::de::Error::custom)
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<f64, TypeError> {
    if !value.is_finite() {
        return Err(TypeError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(TypeError::Negative { field, value });
    }
    Ok(value)
}

/// Defines a non-negative, finite measurement newtype.
///
/// `Display` renders the whole-number part only, so large readings never show in
/// scientific notation.
macro_rules! measurement {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
        pub struct $name(f64);

        impl $name {
            /// The field name used in error messages.
            pub const FIELD: &'static str = $field;

            /// Creates a new measurement.
            ///
            /// # Errors
            ///
            /// Returns `TypeError::Negative` for values below zero and
            /// `TypeError::NotFinite` for NaN or infinities.
            pub fn new(value: f64) -> Result<Self, TypeError> {
                non_negative(Self::FIELD, value).map(Self)
            }

            /// Returns the raw measured value.
            pub fn value(self) -> f64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{:.0}", self.0.trunc())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_f64(self.0)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let value = f64::deserialize(deserializer)?;
                $name::new(value).map_err(serde::de::Error::custom)
            }
        }
    };
}

measurement!(
    /// Viral load measurement (copies/mL). Input to the recommendation rule.
    ViralLoad,
    "viral load"
);

measurement!(
    /// CD4 cell count. Recorded alongside each observation but not used for decisions.
    Cd4Count,
    "CD4 count"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_accepts_bounds() {
        assert_eq!(Age::new(0).expect("0 is valid").years(), 0);
        assert_eq!(Age::new(120).expect("120 is valid").years(), 120);
    }

    #[test]
    fn test_age_rejects_out_of_range() {
        assert_eq!(Age::new(121), Err(TypeError::AgeOutOfRange(121)));
        assert_eq!(Age::new(150), Err(TypeError::AgeOutOfRange(150)));
        assert_eq!(Age::new(-1), Err(TypeError::AgeOutOfRange(-1)));
        assert_eq!(Age::new(300), Err(TypeError::AgeOutOfRange(300)));
    }

    #[test]
    fn test_measurement_rejects_negative_and_non_finite() {
        let err = ViralLoad::new(-0.5).expect_err("should reject negative");
        assert!(matches!(err, TypeError::Negative { field: "viral load", .. }));

        let err = Cd4Count::new(f64::NAN).expect_err("should reject NaN");
        assert_eq!(err, TypeError::NotFinite { field: "CD4 count" });

        assert!(ViralLoad::new(f64::INFINITY).is_err());
        assert!(ViralLoad::new(0.0).is_ok());
    }

    #[test]
    fn test_measurement_display_is_whole_number() {
        let vl = ViralLoad::new(12_345_678.9).unwrap();
        assert_eq!(vl.to_string(), "12345678");
        assert_eq!(Cd4Count::new(500.0).unwrap().to_string(), "500");
        assert_eq!(Cd4Count::new(0.99).unwrap().to_string(), "0");
    }

    #[test]
    fn test_measurement_display_beyond_u64() {
        let vl = ViralLoad::new(1e20).unwrap();
        assert_eq!(vl.to_string(), "100000000000000000000");
    }

    #[test]
    fn test_deserialize_validates() {
        let age: Age = serde_json::from_str("40").expect("should parse");
        assert_eq!(age.years(), 40);
        assert!(serde_json::from_str::<Age>("150").is_err());
        assert!(serde_json::from_str::<ViralLoad>("-3").is_err());

        let cd4: Cd4Count = serde_json::from_str("350.0").expect("should parse");
        assert_eq!(cd4.value(), 350.0);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            TypeError::AgeOutOfRange(150).to_string(),
            "age must be between 0 and 120, got 150"
        );
        assert_eq!(
            ViralLoad::new(-2.0).unwrap_err().to_string(),
            "viral load must not be negative, got -2"
        );
    }
}
