//! Categories of interest and the weighted preferences built from them.
//!
//! The category set is closed: every [`Preferences`] value carries a weight
//! for each of the seven categories, so downstream services never have to
//! guess a default for a missing key.
//!
//! # Examples
//! ```
//! use easytrip_core::Category;
//!
//! assert_eq!(Category::Culture.as_str(), "culture");
//! assert_eq!(Category::Spiritual.to_string(), "spiritual");
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Broad categories a visitor can weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Museums, monuments and cultural venues.
    Culture,
    /// Parks and natural landscapes.
    Nature,
    /// Restaurants, cafes and markets.
    Food,
    /// Shops and shopping districts.
    Shopping,
    /// Quiet places to rest.
    Relaxation,
    /// Churches, temples and other places of worship.
    Spiritual,
    /// Entertainment and nightlife.
    #[serde(alias = "entertaiment")]
    Entertainment,
}

impl Category {
    /// Every category in presentation order.
    pub const ALL: [Self; 7] = [
        Self::Culture,
        Self::Nature,
        Self::Food,
        Self::Shopping,
        Self::Relaxation,
        Self::Spiritual,
        Self::Entertainment,
    ];

    /// Return the category as a lowercase `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Culture => "culture",
            Self::Nature => "nature",
            Self::Food => "food",
            Self::Shopping => "shopping",
            Self::Relaxation => "relaxation",
            Self::Spiritual => "spiritual",
            Self::Entertainment => "entertainment",
        }
    }

    pub(crate) const fn slot(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "culture" => Ok(Self::Culture),
            "nature" => Ok(Self::Nature),
            "food" => Ok(Self::Food),
            "shopping" => Ok(Self::Shopping),
            "relaxation" => Ok(Self::Relaxation),
            "spiritual" => Ok(Self::Spiritual),
            // Older clients shipped the misspelt key.
            "entertainment" | "entertaiment" => Ok(Self::Entertainment),
            _ => Err(format!("unknown category '{s}'")),
        }
    }
}

/// Errors returned when building [`Preferences`] from an explicit map.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PreferencesError {
    /// A category had no weight.
    #[error("preferences are missing a weight for '{0}'")]
    MissingCategory(Category),
    /// A weight fell outside `0.0..=1.0`.
    #[error("weight {weight} for '{category}' must be between 0.0 and 1.0")]
    WeightOutOfRange {
        /// Category carrying the invalid weight.
        category: Category,
        /// Rejected value.
        weight: f64,
    },
}

/// Normalised category weights in the inclusive range `[0.0, 1.0]`.
///
/// Weights are independent; they are not required to sum to one.
///
/// # Examples
/// ```
/// use easytrip_core::{Category, Preferences};
///
/// let prefs = Preferences::uniform(0.0).with_weight(Category::Culture, 1.0);
/// assert_eq!(prefs.weight(Category::Culture), 1.0);
/// assert_eq!(prefs.weight(Category::Food), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<Category, f64>",
    into = "BTreeMap<Category, f64>"
)]
pub struct Preferences {
    weights: [f64; 7],
}

impl Preferences {
    /// Build preferences with the same weight for every category.
    ///
    /// The weight is clamped into `0.0..=1.0`; NaN becomes `0.0`.
    #[must_use]
    pub fn uniform(weight: f64) -> Self {
        Self {
            weights: [clamp_weight(weight); 7],
        }
    }

    /// Build preferences from an explicit map, requiring every category.
    ///
    /// # Errors
    /// Returns [`PreferencesError::MissingCategory`] when a category is absent
    /// and [`PreferencesError::WeightOutOfRange`] for weights outside
    /// `0.0..=1.0` (including NaN).
    pub fn from_map(map: &BTreeMap<Category, f64>) -> Result<Self, PreferencesError> {
        let mut weights = [0.0; 7];
        for (category, slot) in Category::ALL.into_iter().zip(weights.iter_mut()) {
            let weight = *map
                .get(&category)
                .ok_or(PreferencesError::MissingCategory(category))?;
            if !(0.0..=1.0).contains(&weight) {
                return Err(PreferencesError::WeightOutOfRange { category, weight });
            }
            *slot = weight;
        }
        Ok(Self { weights })
    }

    /// Return the weight for a category.
    #[must_use]
    pub fn weight(&self, category: Category) -> f64 {
        self.weights
            .get(category.slot())
            .copied()
            .unwrap_or_default()
    }

    /// Insert or update a weight, clamping it into `0.0..=1.0`.
    ///
    /// NaN is treated as no interest and stored as `0.0`.
    pub fn set_weight(&mut self, category: Category, weight: f64) {
        if let Some(slot) = self.weights.get_mut(category.slot()) {
            *slot = clamp_weight(weight);
        }
    }

    /// Set a weight while returning `self` for chaining.
    #[must_use]
    pub fn with_weight(mut self, category: Category, weight: f64) -> Self {
        self.set_weight(category, weight);
        self
    }

    /// Iterate over `(category, weight)` pairs in presentation order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        Category::ALL.into_iter().zip(self.weights.iter().copied())
    }
}

fn clamp_weight(weight: f64) -> f64 {
    if weight.is_nan() {
        0.0
    } else {
        weight.clamp(0.0, 1.0)
    }
}

impl TryFrom<BTreeMap<Category, f64>> for Preferences {
    type Error = PreferencesError;

    fn try_from(map: BTreeMap<Category, f64>) -> Result<Self, Self::Error> {
        Self::from_map(&map)
    }
}

impl From<Preferences> for BTreeMap<Category, f64> {
    fn from(value: Preferences) -> Self {
        value.iter().collect()
    }
}
