use std::fmt;
use strum::Display as StrumDisplay;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SectionError {
    #[error("Invalid pie section (section {section_size}, pie {pie_size}): {reason}")]
    InvalidConfiguration {
        section_size: f64,
        pie_size: f64,
        reason: &'static str,
    },
}

/// Which bound a query moved to bring the value inside the section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum Fit {
    Unchanged,
    Lower,
    Upper,
}

impl Fit {
    pub fn moved(&self) -> bool {
        *self != Fit::Unchanged
    }
}

/// A fixed-width sector of a circular domain `[0, pie_size)`.
///
/// Only the two bounds are stored. The center is always derived from the lower
/// bound, and every setter rewrites both bounds so that the upper bound sits
/// `section_size` after the lower one, wrapping over the seam when needed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngularSection {
    lower_bound: f64,
    upper_bound: f64,
    section_size: f64,
    half_width: f64,
    pie_size: f64,
}

impl AngularSection {
    /// Creates a section spanning `[0, section_size]`.
    ///
    /// # Errors
    ///
    /// Returns [`SectionError::InvalidConfiguration`] when `section_size` is not
    /// strictly smaller than `pie_size`, when `pie_size` is not positive, when
    /// `section_size` is negative, or when either size is not finite.
    pub fn new(section_size: f64, pie_size: f64) -> Result<Self, SectionError> {
        let invalid = |reason| SectionError::InvalidConfiguration {
            section_size,
            pie_size,
            reason,
        };

        if !section_size.is_finite() || !pie_size.is_finite() {
            return Err(invalid("sizes must be finite"));
        }
        if pie_size <= 0.0 {
            return Err(invalid("pie size must be positive"));
        }
        if section_size < 0.0 {
            return Err(invalid("section size must not be negative"));
        }
        if section_size >= pie_size {
            return Err(invalid("section size must be smaller than the pie size"));
        }

        Ok(Self {
            lower_bound: 0.0,
            upper_bound: section_size,
            section_size,
            half_width: section_size / 2.0,
            pie_size,
        })
    }

    pub fn lower_bound(&self) -> f64 {
        self.lower_bound
    }

    pub fn upper_bound(&self) -> f64 {
        self.upper_bound
    }

    pub fn section_size(&self) -> f64 {
        self.section_size
    }

    pub fn half_width(&self) -> f64 {
        self.half_width
    }

    pub fn pie_size(&self) -> f64 {
        self.pie_size
    }

    pub fn center(&self) -> f64 {
        self.wrap(self.lower_bound + self.half_width)
    }

    /// Moves the section so it is centered on `value`. Non-finite values are
    /// ignored, as in the bound setters.
    pub fn set_center(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        self.lower_bound = self.wrap(value - self.half_width);
        self.upper_bound = self.wrap(value + self.half_width);
    }

    pub fn set_lower_bound(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        self.lower_bound = self.wrap(value);
        self.upper_bound = self.wrap(self.lower_bound + self.section_size);
    }

    pub fn set_upper_bound(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        self.upper_bound = self.wrap(value);
        self.lower_bound = self.wrap(self.upper_bound - self.section_size);
    }

    /// True when the section straddles the `0` / `pie_size` seam.
    pub fn crosses_seam(&self) -> bool {
        self.lower_bound > self.upper_bound
    }

    /// Checks whether `value` lies within `[lower_bound, upper_bound]`, both
    /// ends included, following the wrap.
    pub fn contains(&self, value: f64) -> bool {
        let unskewed = self.unskew(value);
        (0.0..=self.section_size).contains(&unskewed)
    }

    /// Signed distance from the center to `value`, after relocating the
    /// section onto `value` if it lies outside.
    ///
    /// A value on the lower bound yields `-half_width`, on the upper bound
    /// `+half_width`, on the center `0`. Because of the relocation the result
    /// always stays within `[-half_width, half_width]`, and the bounds may have
    /// changed once this returns.
    pub fn diff_with_center(&mut self, value: f64) -> f64 {
        let (offset, _) = self.fit_and_offset(value);
        offset - self.half_width
    }

    /// Distance from the lower bound to `value`, in `[0, section_size]`.
    pub fn diff_with_lower_bound(&mut self, value: f64) -> f64 {
        self.fit_and_offset(value).0
    }

    /// Distance from the upper bound to `value`, in `[-section_size, 0]`.
    pub fn diff_with_upper_bound(&mut self, value: f64) -> f64 {
        let (offset, _) = self.fit_and_offset(value);
        offset - self.section_size
    }

    /// Fits the section to `value`, then returns the offset of `value` from
    /// the lower bound together with the bound that moved. The `diff_with_*`
    /// methods are this offset shifted by a constant.
    ///
    /// A non-finite `value` leaves the section alone and yields a NaN offset.
    pub fn fit_and_offset(&mut self, value: f64) -> (f64, Fit) {
        let value = self.wrap(value);
        let fit = self.fit_to_value(value);
        (self.unskew(value), fit)
    }

    /// Same measure as [`diff_with_center`](Self::diff_with_center) without
    /// relocating the section. Values outside the section map past
    /// `half_width`, up to `pie_size - half_width`.
    pub fn distance_to_center(&self, value: f64) -> f64 {
        self.unskew(value) - self.half_width
    }

    /// Returns a copy of this section fitted to `value`, leaving `self` as is.
    pub fn fitted(&self, value: f64) -> (Self, Fit) {
        let mut next = *self;
        let fit = next.fit_to_value(value);
        (next, fit)
    }

    /// Relocates the section so that `value` sits on its nearest bound.
    ///
    /// The nearest bound is chosen going around the circle: when the value is
    /// numerically below (or above) both bounds, the bound reached by crossing
    /// the seam is also considered. Moving a bound goes through its setter, so
    /// the other bound follows and the width never changes. Non-finite values
    /// have no position on the circle and leave the section unchanged.
    pub fn fit_to_value(&mut self, value: f64) -> Fit {
        if !value.is_finite() {
            log::debug!("Ignoring non-finite value {}", value);
            return Fit::Unchanged;
        }
        if self.contains(value) {
            log::trace!("{} already inside {}", value, self);
            return Fit::Unchanged;
        }

        let value = self.wrap(value);
        let (lower, upper) = (self.lower_bound, self.upper_bound);
        let dist_to_lower = (value - lower).abs();
        let dist_to_upper = (value - upper).abs();

        let move_upper = if value < lower && value > upper {
            // in the gap of a section crossing the seam
            dist_to_upper < dist_to_lower
        } else if value < lower && value < upper {
            let dist_to_upper_via_wrap = self.pie_size - upper + value;
            !(dist_to_lower < dist_to_upper && dist_to_lower < dist_to_upper_via_wrap)
        } else {
            let dist_to_lower_via_wrap = self.pie_size - value + lower;
            dist_to_upper < dist_to_lower && dist_to_upper < dist_to_lower_via_wrap
        };

        let fit = if move_upper {
            self.set_upper_bound(value);
            Fit::Upper
        } else {
            self.set_lower_bound(value);
            Fit::Lower
        };

        log::debug!("Moved {} bound to {}, section is now {}", fit, value, self);
        fit
    }

    fn unskew(&self, value: f64) -> f64 {
        self.wrap(value - self.lower_bound)
    }

    fn wrap(&self, value: f64) -> f64 {
        let wrapped = value.rem_euclid(self.pie_size);
        // rem_euclid rounds tiny negative remainders up to the modulus itself
        if wrapped >= self.pie_size {
            0.0
        } else {
            wrapped
        }
    }
}

impl fmt::Display for AngularSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}] of {}",
            self.lower_bound, self.upper_bound, self.pie_size
        )
    }
}
