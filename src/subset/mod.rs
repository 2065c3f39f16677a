//! Header projection.
//!
//! A [`FieldSubset`] names the logical fields a caller wants, in the order
//! the caller wants them, plus where the header comes from
//! ([`HeaderSource`]). Once the header is known it is resolved into a
//! [`Projection`]:
//!
//! - the physical column index of every requested field, sorted ascending;
//! - a skip schedule: how many columns to skip before each requested one,
//!   so the tokenizer never materializes the columns in between;
//! - a permutation from declaration order to scan order.
//!
//! ```
//! use quickcsv::{FieldSubset, HeaderSource};
//!
//! let subset = FieldSubset::new(["C3", "C4", "C1"], HeaderSource::from_source());
//! let header = ["C1", "C2", "C3", "C4", "C5"].map(String::from).to_vec();
//! let projection = subset.resolve(header)?;
//!
//! assert_eq!(projection.field_indexes(), &[0, 2, 3]);
//! assert_eq!(projection.skip_schedule(), &[0, 1, 0]);
//! assert_eq!(projection.scan_position(0), Some(1)); // C3
//! # Ok::<(), quickcsv::CsvError>(())
//! ```

use tracing::debug;

use crate::error::CsvError;

/// Where the header of a projected parse comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderSource {
    /// Read from line `row` (zero-based) of the input. That line and every
    /// line before it are not emitted as records.
    FromSource {
        /// Zero-based line index of the header.
        row: usize,
    },
    /// Supplied by the caller; the input has no header line.
    Explicit(Vec<String>),
}

impl HeaderSource {
    /// Header taken from the first line of the input.
    pub fn from_source() -> Self {
        Self::FromSource { row: 0 }
    }

    /// Header taken from line `row` of the input.
    pub fn from_source_row(row: usize) -> Self {
        Self::FromSource { row }
    }

    /// Header given by the caller.
    pub fn explicit<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Explicit(names.into_iter().map(Into::into).collect())
    }
}

/// A fixed set of logical fields, usually implemented by a field enum.
///
/// ```
/// use quickcsv::{Column, FieldSubset, HeaderSource};
///
/// #[derive(Clone, Copy)]
/// enum City { Name, Population }
///
/// impl Column for City {
///     const ALL: &'static [Self] = &[City::Name, City::Population];
///     fn name(self) -> &'static str {
///         match self {
///             City::Name => "AccentCity",
///             City::Population => "Population",
///         }
///     }
///     fn index(self) -> usize {
///         self as usize
///     }
/// }
///
/// let subset = FieldSubset::of::<City>(HeaderSource::from_source());
/// assert_eq!(subset.names(), &["AccentCity", "Population"]);
/// ```
pub trait Column: Copy + 'static {
    /// Every field, in declaration order.
    const ALL: &'static [Self];

    /// Header name of this field.
    fn name(self) -> &'static str;

    /// Position of this field in [`Column::ALL`].
    fn index(self) -> usize;
}

/// The logical fields to extract from each record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSubset {
    names: Vec<String>,
    header: HeaderSource,
}

impl FieldSubset {
    /// Requests `names`, in declaration order.
    pub fn new<I, S>(names: I, header: HeaderSource) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            header,
        }
    }

    /// Requests every field of `C`.
    pub fn of<C: Column>(header: HeaderSource) -> Self {
        Self::new(C::ALL.iter().map(|c| c.name()), header)
    }

    /// Requested names in declaration order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Where the header comes from.
    pub fn header_source(&self) -> &HeaderSource {
        &self.header
    }

    /// Resolves the requested names against `header`.
    ///
    /// # Errors
    ///
    /// [`CsvError::MissingColumn`] if a name is absent from the header and
    /// [`CsvError::DuplicateColumn`] if a name is requested twice. A name
    /// that appears twice in the header resolves to its first occurrence.
    pub fn resolve(&self, header: Vec<String>) -> Result<Projection, CsvError> {
        let mut physical = Vec::with_capacity(self.names.len());
        for (i, name) in self.names.iter().enumerate() {
            if self.names[..i].contains(name) {
                return Err(CsvError::DuplicateColumn { name: name.clone() });
            }
            let idx = header
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| CsvError::MissingColumn { name: name.clone() })?;
            physical.push(idx);
        }

        let mut indexes = physical.clone();
        indexes.sort_unstable();

        let mut skips = Vec::with_capacity(indexes.len());
        let mut next_column = 0;
        for &idx in &indexes {
            skips.push(idx - next_column);
            next_column = idx + 1;
        }

        // Indexes are distinct, so every lookup succeeds.
        let scan_positions = physical
            .iter()
            .map(|idx| indexes.binary_search(idx).unwrap_or_default())
            .collect();

        debug!(
            fields = self.names.len(),
            columns = header.len(),
            ?indexes,
            "resolved field subset"
        );

        Ok(Projection {
            names: self.names.clone(),
            header,
            indexes,
            skips,
            scan_positions,
        })
    }
}

/// A [`FieldSubset`] resolved against a concrete header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    names: Vec<String>,
    header: Vec<String>,
    indexes: Vec<usize>,
    skips: Vec<usize>,
    scan_positions: Vec<usize>,
}

impl Projection {
    /// The full header.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Requested names in declaration order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of requested fields.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if no fields were requested.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Physical column indexes of the requested fields, ascending.
    pub fn field_indexes(&self) -> &[usize] {
        &self.indexes
    }

    /// Columns to skip before each entry of [`field_indexes`](Self::field_indexes).
    pub fn skip_schedule(&self) -> &[usize] {
        &self.skips
    }

    /// Position in scan order of the field declared at `logical`.
    pub fn scan_position(&self, logical: usize) -> Option<usize> {
        self.scan_positions.get(logical).copied()
    }

    /// Position in scan order of the field called `name`.
    pub fn scan_position_of(&self, name: &str) -> Option<usize> {
        let logical = self.names.iter().position(|n| n == name)?;
        self.scan_position(logical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_projection_order() {
        let subset = FieldSubset::new(["C3", "C4", "C1"], HeaderSource::from_source());
        let p = subset.resolve(header(&["C1", "C2", "C3", "C4", "C5"])).unwrap();

        assert_eq!(p.field_indexes(), &[0, 2, 3]);
        assert_eq!(p.skip_schedule(), &[0, 1, 0]);
        assert_eq!(p.scan_position(0), Some(1));
        assert_eq!(p.scan_position(1), Some(2));
        assert_eq!(p.scan_position(2), Some(0));
        assert_eq!(p.scan_position(3), None);
        assert_eq!(p.scan_position_of("C1"), Some(0));
        assert_eq!(p.scan_position_of("C2"), None);
        assert_eq!(p.header().len(), 5);
    }

    #[test]
    fn test_skip_schedule_leading_gap() {
        let subset = FieldSubset::new(["E", "B"], HeaderSource::from_source());
        let p = subset.resolve(header(&["A", "B", "C", "D", "E"])).unwrap();
        assert_eq!(p.field_indexes(), &[1, 4]);
        assert_eq!(p.skip_schedule(), &[1, 2]);
    }

    #[test]
    fn test_missing_column() {
        let subset = FieldSubset::new(["C1", "C9"], HeaderSource::from_source());
        let err = subset.resolve(header(&["C1", "C2"])).unwrap_err();
        assert!(matches!(err, CsvError::MissingColumn { ref name } if name == "C9"));
    }

    #[test]
    fn test_duplicate_request() {
        let subset = FieldSubset::new(["C1", "C1"], HeaderSource::from_source());
        let err = subset.resolve(header(&["C1", "C2"])).unwrap_err();
        assert!(matches!(err, CsvError::DuplicateColumn { .. }));
    }

    #[test]
    fn test_repeated_header_name_uses_first() {
        let subset = FieldSubset::new(["X"], HeaderSource::from_source());
        let p = subset.resolve(header(&["A", "X", "X"])).unwrap();
        assert_eq!(p.field_indexes(), &[1]);
    }

    #[derive(Clone, Copy)]
    enum Sample {
        Second,
        First,
    }

    impl Column for Sample {
        const ALL: &'static [Self] = &[Sample::Second, Sample::First];
        fn name(self) -> &'static str {
            match self {
                Sample::Second => "b",
                Sample::First => "a",
            }
        }
        fn index(self) -> usize {
            self as usize
        }
    }

    #[test]
    fn test_subset_of_column_enum() {
        let subset = FieldSubset::of::<Sample>(HeaderSource::explicit(["a", "b"]));
        assert_eq!(subset.names(), &["b", "a"]);
        let HeaderSource::Explicit(names) = subset.header_source() else {
            panic!("expected explicit header");
        };
        let p = subset.resolve(names.clone()).unwrap();
        assert_eq!(p.scan_position(Sample::Second.index()), Some(1));
        assert_eq!(p.scan_position(Sample::First.index()), Some(0));
    }
}
