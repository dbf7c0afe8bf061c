//! Adobe/Resolve `.cube` 3D LUT format.
//!
//! # Format
//!
//! ```text
//! # Comment
//! TITLE "LUT Name"
//! LUT_3D_SIZE 33
//! DOMAIN_MIN 0.0 0.0 0.0
//! DOMAIN_MAX 1.0 1.0 1.0
//! 0.0 0.0 0.0
//! ...
//! 1.0 1.0 1.0
//! ```
//!
//! Data lines are red-fastest. Any content that does not parse, or an
//! entry count other than `size^3`, is reported as [`LutError::Malformed`].

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::{Lut3D, LutError, LutResult};

/// Reads a 3D LUT from a `.cube` file.
pub fn read_3d<P: AsRef<Path>>(path: P) -> LutResult<Lut3D> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let lut = parse_3d(BufReader::new(file))?;
    debug!(path = %path.display(), size = lut.size, "loaded cube LUT");
    Ok(lut)
}

/// Parses a 3D LUT from a reader.
pub fn parse_3d<R: BufRead>(reader: R) -> LutResult<Lut3D> {
    let mut size: Option<usize> = None;
    let mut domain_min = [0.0_f32; 3];
    let mut domain_max = [1.0_f32; 3];
    let mut data: Vec<[f32; 3]> = Vec::new();

    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with("TITLE") {
            continue;
        } else if line.starts_with("LUT_3D_SIZE") {
            size = Some(parse_size(line)?);
        } else if line.starts_with("LUT_1D_SIZE") {
            return Err(LutError::Malformed("expected 3D LUT, found 1D".into()));
        } else if line.starts_with("LUT_3D_INPUT_RANGE") {
            let [lo, hi] = parse_range(line)?;
            domain_min = [lo; 3];
            domain_max = [hi; 3];
        } else if line.starts_with("DOMAIN_MIN") {
            domain_min = parse_triple(&line["DOMAIN_MIN".len()..], "DOMAIN_MIN")?;
        } else if line.starts_with("DOMAIN_MAX") {
            domain_max = parse_triple(&line["DOMAIN_MAX".len()..], "DOMAIN_MAX")?;
        } else {
            data.push(parse_triple(line, &format!("line {}", lineno + 1))?);
        }
    }

    let size = size.ok_or_else(|| LutError::Malformed("missing LUT_3D_SIZE".into()))?;
    let expected =
        Lut3D::checked_entry_count(size).map_err(|e| LutError::Malformed(e.to_string()))?;

    if data.len() != expected {
        return Err(LutError::Malformed(format!(
            "expected {} values for size {}, found {}",
            expected,
            size,
            data.len()
        )));
    }

    Lut3D::from_data(data, size)
        .map(|lut| lut.with_domain(domain_min, domain_max))
        .map_err(|e| LutError::Malformed(e.to_string()))
}

/// Writes a 3D LUT to a `.cube` file.
pub fn write_3d<P: AsRef<Path>>(path: P, lut: &Lut3D) -> LutResult<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "# Generated by gridtone")?;
    writeln!(writer, "LUT_3D_SIZE {}", lut.size)?;

    let min = lut.domain_min;
    let max = lut.domain_max;
    if min != [0.0, 0.0, 0.0] || max != [1.0, 1.0, 1.0] {
        writeln!(writer, "DOMAIN_MIN {} {} {}", min[0], min[1], min[2])?;
        writeln!(writer, "DOMAIN_MAX {} {} {}", max[0], max[1], max[2])?;
    }
    writeln!(writer)?;

    for rgb in &lut.data {
        writeln!(writer, "{:.6} {:.6} {:.6}", rgb[0], rgb[1], rgb[2])?;
    }
    writer.flush()?;
    Ok(())
}

fn parse_size(line: &str) -> LutResult<usize> {
    line.split_whitespace()
        .nth(1)
        .ok_or_else(|| LutError::Malformed("invalid size line".into()))?
        .parse()
        .map_err(|_| LutError::Malformed(format!("invalid size value: {}", line)))
}

fn parse_range(line: &str) -> LutResult<[f32; 2]> {
    let parts: Vec<&str> = line.split_whitespace().skip(1).collect();
    if parts.len() != 2 {
        return Err(LutError::Malformed("invalid LUT_3D_INPUT_RANGE line".into()));
    }
    let lo = parse_number(parts[0], "LUT_3D_INPUT_RANGE")?;
    let hi = parse_number(parts[1], "LUT_3D_INPUT_RANGE")?;
    Ok([lo, hi])
}

fn parse_triple(text: &str, what: &str) -> LutResult<[f32; 3]> {
    let parts: Vec<&str> = text.split_whitespace().collect();
    if parts.len() != 3 {
        return Err(LutError::Malformed(format!(
            "{}: expected 3 values, found {}",
            what,
            parts.len()
        )));
    }
    Ok([
        parse_number(parts[0], what)?,
        parse_number(parts[1], what)?,
        parse_number(parts[2], what)?,
    ])
}

fn parse_number(s: &str, what: &str) -> LutResult<f32> {
    s.parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| LutError::Malformed(format!("{}: non-numeric value {:?}", what, s)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const CUBE_2: &str = r#"
# Test LUT
TITLE "Test Grade"
LUT_3D_SIZE 2
DOMAIN_MIN 0.0 0.0 0.0
DOMAIN_MAX 1.0 1.0 1.0
0.0 0.0 0.0
1.0 0.0 0.0
0.0 1.0 0.0
1.0 1.0 0.0
0.0 0.0 1.0
1.0 0.0 1.0
0.0 1.0 1.0
1.0 1.0 1.0
"#;

    #[test]
    fn parse_3d_cube() {
        let lut = parse_3d(Cursor::new(CUBE_2)).unwrap();
        assert_eq!(lut.size, 2);
        assert_eq!(lut.apply([1.0, 0.0, 0.0]), [1.0, 0.0, 0.0]);
        assert_eq!(lut.apply([0.0, 1.0, 1.0]), [0.0, 1.0, 1.0]);
    }

    #[test]
    fn rejects_wrong_count() {
        let text = CUBE_2.replace("1.0 1.0 1.0\n", "");
        let err = parse_3d(Cursor::new(text)).unwrap_err();
        assert!(matches!(err, LutError::Malformed(_)));
    }

    #[test]
    fn rejects_non_numeric() {
        let text = CUBE_2.replace("1.0 0.0 1.0", "1.0 zero 1.0");
        assert!(matches!(parse_3d(Cursor::new(text)), Err(LutError::Malformed(_))));
    }

    #[test]
    fn rejects_missing_size() {
        let text = "0 0 0\n";
        assert!(matches!(parse_3d(Cursor::new(text)), Err(LutError::Malformed(_))));
    }

    #[test]
    fn rejects_huge_size() {
        for text in ["LUT_3D_SIZE 4194304\n", "LUT_3D_SIZE 257\n0 0 0\n", "LUT_3D_SIZE 18446744073709551615\n"] {
            let err = parse_3d(Cursor::new(text)).unwrap_err();
            assert!(matches!(err, LutError::Malformed(_)), "{text:?}: {err:?}");
        }
    }

    #[test]
    fn input_range_sets_domain() {
        let text = CUBE_2.replace("DOMAIN_MIN 0.0 0.0 0.0\nDOMAIN_MAX 1.0 1.0 1.0", "LUT_3D_INPUT_RANGE 0.0 2.0");
        let lut = parse_3d(Cursor::new(text)).unwrap();
        assert_eq!(lut.domain_max, [2.0; 3]);
        assert_eq!(lut.apply([1.0, 0.0, 0.0]), [0.5, 0.0, 0.0]);
    }

    #[test]
    fn write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("warm.cube");
        let mut lut = Lut3D::identity(3);
        for e in &mut lut.data {
            e[0] = (e[0] * 1.1).min(1.0);
        }
        write_3d(&path, &lut).unwrap();
        let back = read_3d(&path).unwrap();
        assert_eq!(back.size, 3);
        for (a, b) in lut.data.iter().zip(&back.data) {
            for i in 0..3 {
                assert!((a[i] - b[i]).abs() < 1e-6);
            }
        }
    }
}
