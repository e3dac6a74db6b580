//! RASP `.eng` motor file parser and file-name designation heuristics.
//!
//! Format: `;` comment lines, one header line
//! `designation diameter_mm length_mm delays propellant_kg total_kg manufacturer`,
//! then `time thrust` pairs separated by spaces or tabs.

use crate::MotorError;
use crate::curve::{Header, ThrustCurve, ThrustSample};

/// File-name tokens that stand for a case size rather than a designation.
const CASE_SIZE_MARKERS: &[(&str, &str)] = &[("MMX", "MicroMaxx")];

const MANUFACTURERS: &[(&str, &str)] = &[
    ("A", "AeroTech"),
    ("AT", "AeroTech"),
    ("AeroTech", "AeroTech"),
    ("AMW", "Animal Motor Works"),
    ("Apogee", "Apogee Components"),
    ("C", "Cesaroni Technology"),
    ("CTI", "Cesaroni Technology"),
    ("E", "Estes Industries"),
    ("Estes", "Estes Industries"),
    ("Hypertek", "Hypertek"),
    ("K", "Kosdon"),
    ("Klima", "Klima"),
    ("L", "Loki Research"),
    ("Loki", "Loki Research"),
    ("PML", "Public Missiles"),
    ("Q", "Quest Aerospace"),
    ("Quest", "Quest Aerospace"),
    ("SkyR", "SkyRipper Systems"),
];

/// Full manufacturer name for a header code. Unknown codes pass through.
pub fn manufacturer_name(code: &str) -> &str {
    MANUFACTURERS
        .iter()
        .find(|(abbrev, _)| *abbrev == code)
        .map(|(_, name)| *name)
        .unwrap_or(code)
}

/// Display designation derived from a `Manufacturer_Designation[_variant].eng` file name.
///
/// * a case-size marker token maps to its known name (`MMX` → `MicroMaxx`)
/// * a numeric token followed by another joins with a slash (`1_2A6` → `1/2A6`)
/// * a trailing numeric token is a reload variant shown as `(#n+1)`
/// * other leftover tokens are appended with `-`
///
/// Falls back to the header designation when the file name carries none.
pub fn designation_from_file_name(file_name: &str, header_designation: &str) -> String {
    let stem = file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(file_name);
    let mut tokens: Vec<&str> = stem
        .split('_')
        .skip(1)
        .filter(|t| !t.is_empty())
        .collect();
    if tokens.is_empty() {
        return header_designation.to_string();
    }

    let mut name = if let Some((_, known)) = CASE_SIZE_MARKERS.iter().find(|(m, _)| *m == tokens[0])
    {
        tokens.remove(0);
        (*known).to_string()
    } else if is_numeric(tokens[0]) && tokens.len() >= 2 {
        let joined = format!("{}/{}", tokens[0], tokens[1]);
        tokens.drain(..2);
        joined
    } else {
        tokens.remove(0).to_string()
    };

    let variant = tokens
        .last()
        .filter(|t| is_numeric(t))
        .and_then(|t| t.parse::<u32>().ok());
    if variant.is_some() {
        tokens.pop();
    }

    for token in tokens {
        name.push('-');
        name.push_str(token);
    }
    if let Some(index) = variant {
        name.push_str(&format!(" (#{})", u64::from(index) + 1));
    }
    name
}

fn is_numeric(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

/// Parse the text of one motor file. `id` is the file name the text came from.
pub fn parse_eng(id: &str, text: &str) -> Result<ThrustCurve, MotorError> {
    let malformed = |line: usize, reason: String| MotorError::Malformed {
        file: id.to_string(),
        line,
        reason,
    };

    let mut retained = text
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with(';'));

    let (header_line, header_text) = retained
        .next()
        .ok_or_else(|| malformed(0, "missing header line".to_string()))?;
    let header = parse_header(header_text).map_err(|reason| malformed(header_line, reason))?;

    let mut samples: Vec<ThrustSample> = Vec::new();
    let mut last_line = header_line;
    for (line_no, line) in retained {
        last_line = line_no;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 2 {
            return Err(malformed(
                line_no,
                format!("expected `time thrust`, got `{line}`"),
            ));
        }
        let time_s = parse_number(tokens[0], "time").map_err(|r| malformed(line_no, r))?;
        let thrust_n =
            parse_number(tokens[tokens.len() - 1], "thrust").map_err(|r| malformed(line_no, r))?;
        if time_s < 0.0 {
            return Err(malformed(line_no, format!("negative time {time_s}")));
        }
        if thrust_n < 0.0 {
            return Err(malformed(line_no, format!("negative thrust {thrust_n}")));
        }
        samples.push(ThrustSample::new(time_s, thrust_n));
    }

    let samples = normalize(samples);
    if samples.len() < 2 {
        return Err(malformed(
            last_line,
            format!("need at least 2 data points, found {}", samples.len()),
        ));
    }

    let designation = designation_from_file_name(id, &header.designation);
    let manufacturer = manufacturer_name(&header.manufacturer_code).to_string();
    Ok(ThrustCurve::from_parts(
        id.to_string(),
        designation,
        manufacturer,
        header,
        samples,
    ))
}

fn parse_header(line: &str) -> Result<Header, String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 7 {
        return Err(format!(
            "header has {} fields, expected 7 (designation diameter length delays propellant total manufacturer)",
            tokens.len()
        ));
    }
    Ok(Header {
        designation: tokens[0].to_string(),
        diameter_mm: parse_number(tokens[1], "diameter")?,
        length_mm: parse_number(tokens[2], "length")?,
        delays: tokens[3].to_string(),
        propellant_mass_kg: parse_number(tokens[4], "propellant mass")?,
        total_mass_kg: parse_number(tokens[5], "total mass")?,
        manufacturer_code: tokens[6].to_string(),
    })
}

fn parse_number(token: &str, field: &str) -> Result<f64, String> {
    match token.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("{field} `{token}` is not a number")),
    }
}

/// Sort by time, keep the last value for repeated timestamps, and anchor at `(0, 0)`.
fn normalize(mut samples: Vec<ThrustSample>) -> Vec<ThrustSample> {
    if !samples.iter().any(|s| s.time_s == 0.0) {
        samples.push(ThrustSample::new(0.0, 0.0));
    }
    // Stable sort keeps file order among equal times, so the later duplicate wins below.
    samples.sort_by(|a, b| a.time_s.total_cmp(&b.time_s));
    let mut out: Vec<ThrustSample> = Vec::with_capacity(samples.len());
    for sample in samples {
        match out.last_mut() {
            Some(prev) if prev.time_s == sample.time_s => *prev = sample,
            _ => out.push(sample),
        }
    }
    out
}
