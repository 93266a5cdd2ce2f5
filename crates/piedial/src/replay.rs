use derive_more::Display;
use piesection::{AngularSection, Fit};
use std::io::BufRead;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

/// How each replayed value is measured against the section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumString, StrumDisplay)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum QueryKind {
    /// Signed distance to the center, following the value.
    #[default]
    Center,
    /// Distance from the lower bound, following the value.
    Lower,
    /// Distance from the upper bound, following the value.
    Upper,
    /// Signed distance to the center, leaving the section in place.
    Peek,
}

impl QueryKind {
    pub fn apply(&self, section: &mut AngularSection, value: f64) -> Sample {
        let (diff, fit) = match self {
            QueryKind::Peek => (section.distance_to_center(value), Fit::Unchanged),
            QueryKind::Center => {
                let (offset, fit) = section.fit_and_offset(value);
                (offset - section.half_width(), fit)
            }
            QueryKind::Lower => section.fit_and_offset(value),
            QueryKind::Upper => {
                let (offset, fit) = section.fit_and_offset(value);
                (offset - section.section_size(), fit)
            }
        };

        Sample {
            value,
            diff,
            fit,
            lower_bound: section.lower_bound(),
            upper_bound: section.upper_bound(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Display)]
#[display("{value:>10.3} {diff:>+10.3}  {fit:<9} [{lower_bound:.3}, {upper_bound:.3}]")]
pub struct Sample {
    pub value: f64,
    pub diff: f64,
    pub fit: Fit,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Line {line}: cannot read {text:?} as a number")]
    Parse {
        line: usize,
        text: String,
        #[source]
        source: std::num::ParseFloatError,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub fn replay_values(section: &mut AngularSection, kind: QueryKind, values: &[f64]) -> Vec<Sample> {
    values
        .iter()
        .map(|&value| kind.apply(section, value))
        .collect()
}

/// Feeds one value per line of `reader` through `kind`, handing every sample
/// to `emit` as soon as it is computed. Blank lines and `#` comments are
/// skipped. Returns the number of samples.
pub fn replay<R: BufRead>(
    section: &mut AngularSection,
    kind: QueryKind,
    reader: R,
    mut emit: impl FnMut(Sample),
) -> Result<usize, ReplayError> {
    let mut count = 0;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let text = line.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        let value = text.parse::<f64>().map_err(|source| ReplayError::Parse {
            line: idx + 1,
            text: text.to_string(),
            source,
        })?;

        emit(kind.apply(section, value));
        count += 1;
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn section_at(center: f64) -> AngularSection {
        let mut section = AngularSection::new(90.0, 360.0).unwrap();
        section.set_center(center);
        section
    }

    #[test]
    fn test_query_kind_parsing() {
        assert_eq!("center".parse::<QueryKind>().unwrap(), QueryKind::Center);
        assert_eq!("LOWER".parse::<QueryKind>().unwrap(), QueryKind::Lower);
        assert_eq!("Peek".parse::<QueryKind>().unwrap(), QueryKind::Peek);
        assert!("middle".parse::<QueryKind>().is_err());
        assert_eq!(QueryKind::Upper.to_string(), "upper");
    }

    #[test]
    fn test_replay_values_follows_cursor() {
        let mut section = section_at(180.0);
        let samples = replay_values(&mut section, QueryKind::Center, &[180.0, 225.0, 235.0, 135.0]);

        let diffs: Vec<f64> = samples.iter().map(|s| s.diff).collect();
        assert_eq!(diffs, vec![0.0, 45.0, 45.0, -45.0]);

        let fits: Vec<Fit> = samples.iter().map(|s| s.fit).collect();
        assert_eq!(
            fits,
            vec![Fit::Unchanged, Fit::Unchanged, Fit::Upper, Fit::Lower]
        );
        assert_eq!(samples[2].upper_bound, 235.0);
        assert_eq!(samples[2].lower_bound, 145.0);
        assert_eq!(section.lower_bound(), 135.0);
        assert_eq!(section.upper_bound(), 225.0);
    }

    #[test]
    fn test_peek_leaves_section_in_place() {
        let mut section = section_at(180.0);
        let samples = replay_values(&mut section, QueryKind::Peek, &[0.0, 270.0]);
        assert_eq!(samples[0].diff, 180.0);
        assert_eq!(samples[1].diff, 90.0);
        assert!(samples.iter().all(|s| s.fit == Fit::Unchanged));
        assert_eq!(section, section_at(180.0));
    }

    #[test]
    fn test_bound_queries() {
        let mut section = section_at(180.0);
        let lower = QueryKind::Lower.apply(&mut section, 180.0);
        assert_eq!(lower.diff, 45.0);
        let upper = QueryKind::Upper.apply(&mut section, 180.0);
        assert_eq!(upper.diff, -45.0);
    }

    #[test]
    fn test_replay_reads_lines() {
        let input = "# sweep over the seam\n350\n\n  10 \n-20\n";
        let mut section = section_at(0.0);
        let mut samples = Vec::new();

        let count = replay(
            &mut section,
            QueryKind::Center,
            Cursor::new(input),
            |s| samples.push(s),
        )
        .unwrap();

        assert_eq!(count, 3);
        let diffs: Vec<f64> = samples.iter().map(|s| s.diff).collect();
        assert_eq!(diffs, vec![-10.0, 10.0, -20.0]);
    }

    #[test]
    fn test_replay_reports_bad_line() {
        let mut section = section_at(0.0);
        let err = replay(
            &mut section,
            QueryKind::Center,
            Cursor::new("10\nabc\n20\n"),
            |_| {},
        )
        .unwrap_err();

        match err {
            ReplayError::Parse { line, text, .. } => {
                assert_eq!(line, 2);
                assert_eq!(text, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_replay_skips_non_finite_values() {
        let mut section = section_at(0.0);
        let mut samples = Vec::new();

        replay(
            &mut section,
            QueryKind::Center,
            Cursor::new("inf\nnan\n45\n"),
            |s| samples.push(s),
        )
        .unwrap();

        assert!(samples[0].diff.is_nan());
        assert!(samples[1].diff.is_nan());
        assert_eq!(samples[0].fit, Fit::Unchanged);
        assert_eq!(samples[0].lower_bound, 315.0);
        assert_eq!(samples[0].upper_bound, 45.0);
        assert_eq!(samples[2].diff, 45.0);
        assert_eq!(section, section_at(0.0));
    }

    #[test]
    fn test_sample_display() {
        let sample = Sample {
            value: 10.0,
            diff: 45.0,
            fit: Fit::Upper,
            lower_bound: 280.0,
            upper_bound: 10.0,
        };
        assert_eq!(
            sample.to_string(),
            "    10.000    +45.000  upper     [280.000, 10.000]"
        );
    }
}
