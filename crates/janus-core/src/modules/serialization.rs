use std::fs;
use std::path::Path;

/// Shortest round-trip rendering of `value` in the spelling the beam-spot
/// database uses (`0.0`, `-0.19`, `5e-06`, `1e+16`, `nan`).
pub fn format_repr_f64(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value.is_sign_negative() {
            "-inf".to_string()
        } else {
            "inf".to_string()
        };
    }

    let scientific = format!("{value:e}");
    let (mantissa, exponent) = scientific
        .split_once('e')
        .map(|(mantissa, exponent)| (mantissa, exponent.parse::<i32>().unwrap_or(0)))
        .unwrap_or((scientific.as_str(), 0));

    if (-4..16).contains(&exponent) {
        let mut fixed = format!("{value}");
        if !fixed.contains('.') {
            fixed.push_str(".0");
        }
        fixed
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.abs())
    }
}

/// Fixed-point rendering with `precision` decimals (`%.Nf`).
pub fn format_fixed_f64(value: f64, precision: usize) -> String {
    format!("{value:.precision$}", precision = precision)
}

pub fn join_repr_f64(values: &[f64]) -> String {
    values
        .iter()
        .map(|value| format_repr_f64(*value))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn join_fixed_f64(values: &[f64], precision: usize) -> String {
    values
        .iter()
        .map(|value| format_fixed_f64(*value, precision))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn normalize_text_artifact(content: &str) -> String {
    let mut normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    if !normalized.is_empty() && !normalized.ends_with('\n') {
        normalized.push('\n');
    }
    normalized
}

pub fn write_text_artifact(path: &Path, content: &str) -> std::io::Result<()> {
    fs::write(path, normalize_text_artifact(content))
}

#[cfg(test)]
mod tests {
    use super::{
        format_fixed_f64, format_repr_f64, join_fixed_f64, join_repr_f64, normalize_text_artifact,
        write_text_artifact,
    };
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn repr_formatting_matches_database_spelling() {
        assert_eq!(format_repr_f64(0.0), "0.0");
        assert_eq!(format_repr_f64(-0.2), "-0.2");
        assert_eq!(format_repr_f64(0.125), "0.125");
        assert_eq!(format_repr_f64(1.0), "1.0");
        assert_eq!(format_repr_f64(5.0e-6), "5e-06");
        assert_eq!(format_repr_f64(1.0e-4), "0.0001");
        assert_eq!(format_repr_f64(1.5e-5), "1.5e-05");
        assert_eq!(format_repr_f64(1.0e16), "1e+16");
        assert_eq!(format_repr_f64(f64::NAN), "nan");
        assert_eq!(format_repr_f64(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn grid_offsets_keep_their_binary_noise() {
        assert_eq!(format_repr_f64(1.0 / 100.0 - 0.2), "-0.19");
        assert_eq!(format_repr_f64(2.0 / 100.0 - 0.2), "-0.18000000000000002");
    }

    #[test]
    fn fixed_formatting_rounds_to_precision() {
        assert_eq!(format_fixed_f64(21.456, 2), "21.46");
        assert_eq!(format_fixed_f64(-180.0, 1), "-180.0");
        assert_eq!(join_fixed_f64(&[1.0, 2.26, -3.5], 1), "1.0,2.3,-3.5");
    }

    #[test]
    fn joined_values_have_no_trailing_separator() {
        assert_eq!(join_repr_f64(&[0.5, 0.25, 0.0]), "0.5,0.25,0.0");
        assert_eq!(join_repr_f64(&[]), "");
    }

    #[test]
    fn normalize_text_artifact_uses_canonical_line_endings() {
        let normalized = normalize_text_artifact("alpha\r\nbeta\rgamma");
        assert_eq!(normalized, "alpha\nbeta\ngamma\n");
    }

    #[test]
    fn repeated_text_writes_produce_identical_bytes() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("pattern.txt");
        let input = "line 1\r\nline 2\rline 3";

        write_text_artifact(&path, input).expect("first write should succeed");
        let first = fs::read(&path).expect("artifact should be readable");

        write_text_artifact(&path, input).expect("second write should succeed");
        let second = fs::read(&path).expect("artifact should be readable");

        assert_eq!(first, second);
        assert_eq!(second, b"line 1\nline 2\nline 3\n");
    }
}
