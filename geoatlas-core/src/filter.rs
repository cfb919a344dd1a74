//! Retention policy for populated places.

use std::collections::BTreeSet;

use crate::place::Place;

/// Smallest population a place needs to be kept.
pub const DEFAULT_MIN_POPULATION: i64 = 1000;

/// Countries whose places are kept regardless of population.
///
/// The source has no populated-class places with a population for these
/// territories.
pub const POPULATION_FILTER_EXEMPT: [&str; 5] = ["AN", "AQ", "BV", "CS", "HM"];

/// Outcome of evaluating a place against a [`PlaceFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retention {
    /// The place is loaded.
    Keep,
    /// The feature is not a populated place.
    NotPopulated,
    /// The population is missing.
    MissingPopulation,
    /// The population column does not hold an integer.
    MalformedPopulation,
    /// The population is below the threshold.
    BelowThreshold,
}

/// Decides which places are loaded into the atlas.
///
/// # Examples
/// ```
/// use geoatlas_core::{Place, PlaceFilter, Retention};
///
/// let filter = PlaceFilter::default();
/// let line = "1\tTown\tTown\t\t1.0\t2.0\tP\tPPL\tFR\t\t\t\t\t\t999\t\t\tEurope/Paris\t2020-01-01";
/// let place = Place::parse(line)?;
/// assert_eq!(filter.evaluate(&place), Retention::BelowThreshold);
/// # Ok::<(), geoatlas_core::RecordError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceFilter {
    min_population: i64,
    exempt: BTreeSet<String>,
}

impl Default for PlaceFilter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_POPULATION, POPULATION_FILTER_EXEMPT)
    }
}

impl PlaceFilter {
    /// Build a filter with an explicit threshold and exempt country set.
    pub fn new<I, S>(min_population: i64, exempt: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            min_population,
            exempt: exempt.into_iter().map(Into::into).collect(),
        }
    }

    /// Minimum population for non-exempt countries.
    #[must_use]
    pub const fn min_population(&self) -> i64 {
        self.min_population
    }

    /// Whether places of `country_code` bypass the population check.
    #[must_use]
    pub fn is_exempt(&self, country_code: &str) -> bool {
        self.exempt.contains(country_code)
    }

    /// Classify a place.
    #[must_use]
    pub fn evaluate(&self, place: &Place) -> Retention {
        if !place.is_populated_place() {
            return Retention::NotPopulated;
        }
        if self.is_exempt(&place.country_code) {
            return Retention::Keep;
        }
        if place.raw_population.trim().is_empty() {
            return Retention::MissingPopulation;
        }
        match place.population() {
            None => Retention::MalformedPopulation,
            Some(count) if count >= self.min_population => Retention::Keep,
            Some(_) => Retention::BelowThreshold,
        }
    }
}
