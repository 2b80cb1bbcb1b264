use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Challan range used for codes that have a description but no range entry.
pub const DEFAULT_CHALLAN_RANGE: AmountRange = AmountRange::new(500, 2000);

const STANDARD_ENTRIES: &[(u16, &str, u32, u32)] = &[
    (101, "Speeding above limit", 1500, 5000),
    (102, "Running red light", 1000, 3000),
    (103, "Wrong-side driving", 2000, 6000),
    (104, "No seatbelt", 500, 1500),
    (105, "Using mobile while driving", 800, 2500),
    (106, "Driving without license", 2000, 7000),
    (107, "Expired registration", 500, 2000),
    (108, "Illegal parking", 300, 1500),
    (109, "Helmet missing (two-wheeler)", 250, 1000),
    (110, "Overloading", 1000, 5000),
];

/// Inclusive integer range of rupee amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountRange {
    pub low: u32,
    pub high: u32,
}

impl AmountRange {
    pub const fn new(low: u32, high: u32) -> Self {
        Self { low, high }
    }

    /// Builds a range, rejecting reversed bounds.
    pub fn checked(low: u32, high: u32) -> Result<Self> {
        if low > high {
            return Err(Error::InvalidRange { low, high });
        }
        Ok(Self { low, high })
    }

    pub fn contains(&self, value: u32) -> bool {
        (self.low..=self.high).contains(&value)
    }
}

/// One catalogue row supplied to [`Catalogue::from_entries`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogueEntry {
    pub code: u16,
    pub description: String,
    /// `None` means the code draws from the catalogue's default range.
    pub challan: Option<AmountRange>,
}

/// Static mapping from violation code to description and challan range.
///
/// Codes are kept ordered so that a uniform pick over the key set is
/// reproducible for a given RNG stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalogue {
    descriptions: BTreeMap<u16, String>,
    challan_ranges: BTreeMap<u16, AmountRange>,
    default_range: AmountRange,
}

impl Catalogue {
    /// The built-in ten-code traffic catalogue.
    pub fn standard() -> Self {
        let mut descriptions = BTreeMap::new();
        let mut challan_ranges = BTreeMap::new();
        for (code, description, low, high) in STANDARD_ENTRIES {
            descriptions.insert(*code, (*description).to_string());
            challan_ranges.insert(*code, AmountRange::new(*low, *high));
        }
        Self {
            descriptions,
            challan_ranges,
            default_range: DEFAULT_CHALLAN_RANGE,
        }
    }

    pub fn from_entries(
        entries: impl IntoIterator<Item = CatalogueEntry>,
        default_range: AmountRange,
    ) -> Result<Self> {
        let default_range = AmountRange::checked(default_range.low, default_range.high)?;
        let mut descriptions = BTreeMap::new();
        let mut challan_ranges = BTreeMap::new();

        for entry in entries {
            if descriptions.contains_key(&entry.code) {
                return Err(Error::InvalidCatalogue(format!(
                    "duplicate violation code {}",
                    entry.code
                )));
            }
            if let Some(range) = entry.challan {
                challan_ranges.insert(entry.code, AmountRange::checked(range.low, range.high)?);
            }
            descriptions.insert(entry.code, entry.description);
        }

        if descriptions.is_empty() {
            return Err(Error::InvalidCatalogue(
                "catalogue has no violation codes".to_string(),
            ));
        }

        Ok(Self {
            descriptions,
            challan_ranges,
            default_range,
        })
    }

    /// Violation codes in ascending order.
    pub fn codes(&self) -> impl ExactSizeIterator<Item = u16> + '_ {
        self.descriptions.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.descriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
    }

    pub fn description(&self, code: u16) -> Option<&str> {
        self.descriptions.get(&code).map(String::as_str)
    }

    /// Challan range for `code`, falling back to the default range.
    pub fn challan_range(&self, code: u16) -> AmountRange {
        self.challan_ranges
            .get(&code)
            .copied()
            .unwrap_or(self.default_range)
    }

    pub fn default_range(&self) -> AmountRange {
        self.default_range
    }
}

impl Default for Catalogue {
    fn default() -> Self {
        Self::standard()
    }
}
