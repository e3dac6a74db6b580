//! Core units, constants, and shared primitives for the rocketry calculator workspace.

/// Physical constants expressed in SI units.
pub mod constants {
    /// Standard gravity at Earth's surface (m/s²).
    pub const STANDARD_GRAVITY: f64 = 9.80665;
    /// Air density used by the drag model (kg/m³).
    pub const AIR_DENSITY_SEA_LEVEL: f64 = 1.205;
}

/// Geometry helpers in SI units.
pub mod units {
    /// Frontal area of a circular cross-section with the given diameter.
    #[inline]
    pub fn circle_area(diameter: f64) -> f64 {
        let r = diameter * 0.5;
        std::f64::consts::PI * r * r
    }
}

/// Metric prefix scaling used when round-tripping user-facing input units.
///
/// The simulation core always works in SI base units; these helpers exist for
/// front ends that let users type grams or centimetres.
pub mod prefix {
    use thiserror::Error;

    /// Decimal metric prefixes from yotta down to yocto. `Base` is the bare unit.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum MetricPrefix {
        Yotta,
        Zetta,
        Exa,
        Peta,
        Tera,
        Giga,
        Mega,
        Kilo,
        Hecto,
        Deka,
        Base,
        Deci,
        Centi,
        Milli,
        Micro,
        Nano,
        Pico,
        Femto,
        Atto,
        Zepto,
        Yocto,
    }

    #[derive(Debug, Error, PartialEq, Eq)]
    pub enum PrefixError {
        #[error("unknown metric prefix `{0}`")]
        Unknown(String),
        #[error("`{0}` is not a number with an optional prefixed unit")]
        InvalidNumber(String),
    }

    impl MetricPrefix {
        pub const ALL: [MetricPrefix; 21] = [
            MetricPrefix::Yotta,
            MetricPrefix::Zetta,
            MetricPrefix::Exa,
            MetricPrefix::Peta,
            MetricPrefix::Tera,
            MetricPrefix::Giga,
            MetricPrefix::Mega,
            MetricPrefix::Kilo,
            MetricPrefix::Hecto,
            MetricPrefix::Deka,
            MetricPrefix::Base,
            MetricPrefix::Deci,
            MetricPrefix::Centi,
            MetricPrefix::Milli,
            MetricPrefix::Micro,
            MetricPrefix::Nano,
            MetricPrefix::Pico,
            MetricPrefix::Femto,
            MetricPrefix::Atto,
            MetricPrefix::Zepto,
            MetricPrefix::Yocto,
        ];

        /// Symbol as typed by users. The bare unit is written `-`.
        pub fn symbol(self) -> &'static str {
            match self {
                MetricPrefix::Yotta => "Y",
                MetricPrefix::Zetta => "Z",
                MetricPrefix::Exa => "E",
                MetricPrefix::Peta => "P",
                MetricPrefix::Tera => "T",
                MetricPrefix::Giga => "G",
                MetricPrefix::Mega => "M",
                MetricPrefix::Kilo => "k",
                MetricPrefix::Hecto => "h",
                MetricPrefix::Deka => "da",
                MetricPrefix::Base => "-",
                MetricPrefix::Deci => "d",
                MetricPrefix::Centi => "c",
                MetricPrefix::Milli => "m",
                MetricPrefix::Micro => "u",
                MetricPrefix::Nano => "n",
                MetricPrefix::Pico => "p",
                MetricPrefix::Femto => "f",
                MetricPrefix::Atto => "a",
                MetricPrefix::Zepto => "z",
                MetricPrefix::Yocto => "y",
            }
        }

        /// Power of ten the prefix stands for.
        pub fn exponent(self) -> i32 {
            match self {
                MetricPrefix::Yotta => 24,
                MetricPrefix::Zetta => 21,
                MetricPrefix::Exa => 18,
                MetricPrefix::Peta => 15,
                MetricPrefix::Tera => 12,
                MetricPrefix::Giga => 9,
                MetricPrefix::Mega => 6,
                MetricPrefix::Kilo => 3,
                MetricPrefix::Hecto => 2,
                MetricPrefix::Deka => 1,
                MetricPrefix::Base => 0,
                MetricPrefix::Deci => -1,
                MetricPrefix::Centi => -2,
                MetricPrefix::Milli => -3,
                MetricPrefix::Micro => -6,
                MetricPrefix::Nano => -9,
                MetricPrefix::Pico => -12,
                MetricPrefix::Femto => -15,
                MetricPrefix::Atto => -18,
                MetricPrefix::Zepto => -21,
                MetricPrefix::Yocto => -24,
            }
        }

        #[inline]
        pub fn factor(self) -> f64 {
            10f64.powi(self.exponent())
        }

        /// Look up a prefix by symbol. Case-sensitive, since `m` and `M` differ.
        pub fn from_symbol(symbol: &str) -> Result<Self, PrefixError> {
            Self::ALL
                .iter()
                .copied()
                .find(|p| p.symbol() == symbol)
                .ok_or_else(|| PrefixError::Unknown(symbol.to_string()))
        }
    }

    /// Rescale `value` from one prefixed unit to another (e.g. `c` → `-` for cm → m).
    pub fn metric_convert(value: f64, from: MetricPrefix, to: MetricPrefix) -> f64 {
        value * 10f64.powi(from.exponent() - to.exponent())
    }

    /// Symbol-based variant of [`metric_convert`].
    pub fn metric_convert_symbols(value: f64, from: &str, to: &str) -> Result<f64, PrefixError> {
        Ok(metric_convert(
            value,
            MetricPrefix::from_symbol(from)?,
            MetricPrefix::from_symbol(to)?,
        ))
    }

    /// Parse `<number>[<prefix><unit>]` and express it in `target`-prefixed units.
    ///
    /// A bare number is taken to be in `target` units already, so with
    /// `unit = "g"` and `target = Kilo` both `"34g"` and `"0.034"` give `0.034`.
    pub fn parse_quantity(
        input: &str,
        unit: &str,
        target: MetricPrefix,
    ) -> Result<f64, PrefixError> {
        let input = input.trim();
        let (number, suffix) = input.split_at(number_len(input));
        let value: f64 = number
            .parse()
            .map_err(|_| PrefixError::InvalidNumber(input.to_string()))?;
        let suffix = suffix.trim();
        if suffix.is_empty() {
            return Ok(value);
        }
        let symbol = suffix
            .strip_suffix(unit)
            .ok_or_else(|| PrefixError::Unknown(suffix.to_string()))?;
        let from = if symbol.is_empty() {
            MetricPrefix::Base
        } else {
            MetricPrefix::from_symbol(symbol)?
        };
        Ok(metric_convert(value, from, target))
    }

    /// Length of the leading decimal literal. An `e`/`E` counts as an exponent
    /// only when digits follow, so `3Em` still reads as exametres.
    fn number_len(input: &str) -> usize {
        let bytes = input.as_bytes();
        let mut end = 0;
        let mut seen_digit = false;
        let mut seen_exponent = false;
        while end < bytes.len() {
            match bytes[end] {
                b'0'..=b'9' => seen_digit = true,
                b'.' if !seen_exponent => {}
                b'+' | b'-' if end == 0 => {}
                b'e' | b'E' if seen_digit && !seen_exponent => {
                    let mut next = end + 1;
                    if matches!(bytes.get(next), Some(b'+' | b'-')) {
                        next += 1;
                    }
                    if !matches!(bytes.get(next), Some(b'0'..=b'9')) {
                        break;
                    }
                    seen_exponent = true;
                    end = next;
                }
                _ => break,
            }
            end += 1;
        }
        end
    }
}

/// Presentation helpers. Never used for internal computation.
pub mod display {
    /// Round to a fixed number of decimal places.
    #[inline]
    pub fn round_to(value: f64, places: u32) -> f64 {
        let scale = 10f64.powi(places as i32);
        (value * scale).round() / scale
    }
}

#[cfg(test)]
mod tests {
    use super::display::round_to;
    use super::prefix::{
        MetricPrefix, PrefixError, metric_convert, metric_convert_symbols, parse_quantity,
    };
    use super::units::circle_area;

    #[test]
    fn grams_to_kilograms() {
        let kg = metric_convert(100.0, MetricPrefix::Base, MetricPrefix::Kilo);
        assert!((kg - 0.1).abs() < 1e-12);
    }

    #[test]
    fn centimetres_round_trip() {
        let m = metric_convert_symbols(5.0, "c", "-").unwrap();
        assert!((m - 0.05).abs() < 1e-12);
        let cm = metric_convert_symbols(m, "-", "c").unwrap();
        assert!((cm - 5.0).abs() < 1e-12);
    }

    #[test]
    fn deka_and_micro_symbols_resolve() {
        assert_eq!(MetricPrefix::from_symbol("da").unwrap(), MetricPrefix::Deka);
        assert_eq!(MetricPrefix::from_symbol("u").unwrap(), MetricPrefix::Micro);
        assert_eq!(MetricPrefix::from_symbol("M").unwrap(), MetricPrefix::Mega);
        assert_eq!(MetricPrefix::from_symbol("m").unwrap(), MetricPrefix::Milli);
    }

    #[test]
    fn unknown_prefix_is_rejected() {
        assert_eq!(
            metric_convert_symbols(1.0, "x", "-"),
            Err(PrefixError::Unknown("x".to_string()))
        );
    }

    #[test]
    fn quantities_with_units_scale_to_si() {
        let kg = parse_quantity("34g", "g", MetricPrefix::Kilo).unwrap();
        assert!((kg - 0.034).abs() < 1e-12);
        assert_eq!(parse_quantity("0.2kg", "g", MetricPrefix::Kilo).unwrap(), 0.2);
        assert_eq!(parse_quantity("0.034", "g", MetricPrefix::Kilo).unwrap(), 0.034);

        let m = parse_quantity("25mm", "m", MetricPrefix::Base).unwrap();
        assert!((m - 0.025).abs() < 1e-12);
        assert_eq!(parse_quantity(" 0.5 m", "m", MetricPrefix::Base).unwrap(), 0.5);
    }

    #[test]
    fn scientific_notation_is_part_of_the_number() {
        assert_eq!(parse_quantity("1e-3", "g", MetricPrefix::Kilo).unwrap(), 1e-3);
        let kg = parse_quantity("1.5e2g", "g", MetricPrefix::Kilo).unwrap();
        assert!((kg - 0.15).abs() < 1e-12);
        let m = parse_quantity("2E+1mm", "m", MetricPrefix::Base).unwrap();
        assert!((m - 0.02).abs() < 1e-12);

        // Without a following digit the `E` is the exa prefix.
        assert_eq!(parse_quantity("3Em", "m", MetricPrefix::Base).unwrap(), 3e18);
        assert_eq!(
            parse_quantity("2em", "m", MetricPrefix::Base),
            Err(PrefixError::Unknown("e".to_string()))
        );
    }

    #[test]
    fn malformed_quantities_are_rejected() {
        assert!(matches!(
            parse_quantity("heavy", "g", MetricPrefix::Kilo),
            Err(PrefixError::InvalidNumber(_))
        ));
        assert_eq!(
            parse_quantity("3xm", "m", MetricPrefix::Base),
            Err(PrefixError::Unknown("x".to_string()))
        );
        assert_eq!(
            parse_quantity("3kN", "m", MetricPrefix::Base),
            Err(PrefixError::Unknown("kN".to_string()))
        );
    }

    #[test]
    fn area_of_five_centimetre_tube() {
        let area = circle_area(0.05);
        assert!((area - 0.001_963_495).abs() < 1e-8);
    }

    #[test]
    fn rounding_is_display_only() {
        assert_eq!(round_to(9.166_666, 3), 9.167);
        assert_eq!(round_to(-1.25, 1), -1.3);
    }
}
