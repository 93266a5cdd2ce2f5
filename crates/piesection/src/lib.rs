//! Angular sections on a circular domain that wraps at `pie_size`.
//!
//! ```
//! use piesection::AngularSection;
//!
//! let mut section = AngularSection::new(90.0, 360.0)?;
//! section.set_center(350.0);
//! assert_eq!((section.lower_bound(), section.upper_bound()), (305.0, 35.0));
//!
//! // Past the upper bound: the section follows the value.
//! assert_eq!(section.diff_with_center(45.0), 45.0);
//! assert_eq!(section.upper_bound(), 45.0);
//! # Ok::<(), piesection::SectionError>(())
//! ```

pub mod section;

pub use section::{AngularSection, Fit, SectionError};
