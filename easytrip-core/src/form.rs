//! Route form input and its validation.
//!
//! The form mirrors what a visitor fills in: two locations, seven preference
//! sliders on a `0..=100` scale, a transport mode and a free-time budget.
//! [`RouteForm::validate`] performs every check that can fail before any
//! external service is contacted.

use std::num::NonZeroU32;

use thiserror::Error;

use crate::{Category, Coordinate, Preferences, RouteRequest, Transport};

/// Default free-time budget offered by the form.
pub const DEFAULT_FREE_TIME_MINUTES: u32 = 120;
/// Smallest budget offered by the form control.
pub const MIN_FREE_TIME_MINUTES: u32 = 30;
/// Largest budget offered by the form control.
pub const MAX_FREE_TIME_MINUTES: u32 = 480;
/// Step of the form control.
pub const FREE_TIME_STEP_MINUTES: u32 = 15;
/// Upper bound of a preference slider.
pub const SLIDER_MAX: u8 = 100;

/// Which end of the route a value refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// The origin.
    Start,
    /// The destination.
    End,
}

impl Endpoint {
    /// Lowercase name used in messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A location entered either as free text or as a known coordinate.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationInput {
    /// Free-text address that still has to be geocoded.
    Address(String),
    /// A position that needs no geocoding.
    Coordinate(Coordinate),
}

impl LocationInput {
    fn is_blank(&self) -> bool {
        matches!(self, Self::Address(text) if text.trim().is_empty())
    }

    fn trimmed(&self) -> Self {
        match self {
            Self::Address(text) => Self::Address(text.trim().to_owned()),
            Self::Coordinate(coordinate) => Self::Coordinate(*coordinate),
        }
    }
}

impl From<&str> for LocationInput {
    fn from(value: &str) -> Self {
        Self::Address(value.to_owned())
    }
}

impl From<String> for LocationInput {
    fn from(value: String) -> Self {
        Self::Address(value)
    }
}

impl From<Coordinate> for LocationInput {
    fn from(value: Coordinate) -> Self {
        Self::Coordinate(value)
    }
}

/// Preference sliders on the UI's `0..=100` integer scale.
///
/// # Examples
/// ```
/// use easytrip_core::{Category, PreferenceSliders};
///
/// let sliders = PreferenceSliders::default().with(Category::Food, 80);
/// assert_eq!(sliders.get(Category::Food), 80);
/// assert_eq!(sliders.get(Category::Culture), 30);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreferenceSliders {
    values: [u8; 7],
}

impl Default for PreferenceSliders {
    fn default() -> Self {
        // culture, nature, food, shopping, relaxation, spiritual, entertainment
        Self {
            values: [30, 30, 10, 10, 10, 5, 5],
        }
    }
}

impl PreferenceSliders {
    /// Sliders with every category at zero.
    #[must_use]
    pub const fn zeroed() -> Self {
        Self { values: [0; 7] }
    }

    /// Current slider value for a category.
    #[must_use]
    pub fn get(&self, category: Category) -> u8 {
        self.values
            .get(category.slot())
            .copied()
            .unwrap_or_default()
    }

    /// Set a slider value.
    pub fn set(&mut self, category: Category, value: u8) {
        if let Some(slot) = self.values.get_mut(category.slot()) {
            *slot = value;
        }
    }

    /// Set a slider value while returning `self` for chaining.
    #[must_use]
    pub fn with(mut self, category: Category, value: u8) -> Self {
        self.set(category, value);
        self
    }

    /// Normalise the sliders into [`Preferences`] by dividing by 100.
    ///
    /// # Errors
    /// Returns [`InputError::PreferenceOutOfRange`] for sliders above 100.
    pub fn to_preferences(&self) -> Result<Preferences, InputError> {
        let mut preferences = Preferences::uniform(0.0);
        for category in Category::ALL {
            let value = self.get(category);
            if value > SLIDER_MAX {
                return Err(InputError::PreferenceOutOfRange { category, value });
            }
            preferences.set_weight(category, f64::from(value) / f64::from(SLIDER_MAX));
        }
        Ok(preferences)
    }
}

/// Errors detected while validating a [`RouteForm`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// A required address field was blank.
    #[error("the {endpoint} address is required")]
    BlankAddress {
        /// The blank field.
        endpoint: Endpoint,
    },
    /// The free-time budget was zero.
    #[error("free time must be a positive number of minutes")]
    NonPositiveFreeTime,
    /// A slider exceeded the `0..=100` scale.
    #[error("preference for '{category}' must be between 0 and 100, got {value}")]
    PreferenceOutOfRange {
        /// Offending category.
        category: Category,
        /// Rejected slider value.
        value: u8,
    },
}

/// Everything the visitor submits to build a route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteForm {
    /// Where the route starts.
    pub from: LocationInput,
    /// Where the route ends.
    pub to: LocationInput,
    /// Category sliders.
    pub sliders: PreferenceSliders,
    /// Transport mode.
    pub transport: Transport,
    /// Free-time budget in minutes.
    pub free_time_minutes: u32,
}

impl RouteForm {
    /// Create a form with default sliders, transport and budget.
    pub fn new(from: impl Into<LocationInput>, to: impl Into<LocationInput>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            sliders: PreferenceSliders::default(),
            transport: Transport::default(),
            free_time_minutes: DEFAULT_FREE_TIME_MINUTES,
        }
    }

    /// Replace the sliders.
    #[must_use]
    pub const fn with_sliders(mut self, sliders: PreferenceSliders) -> Self {
        self.sliders = sliders;
        self
    }

    /// Replace the transport mode.
    #[must_use]
    pub const fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    /// Replace the free-time budget.
    #[must_use]
    pub const fn with_free_time(mut self, minutes: u32) -> Self {
        self.free_time_minutes = minutes;
        self
    }

    /// Check the form before any external service is contacted.
    ///
    /// # Errors
    /// Returns [`InputError`] for blank addresses, a zero budget or sliders
    /// outside `0..=100`.
    pub fn validate(&self) -> Result<ValidatedForm, InputError> {
        if self.from.is_blank() {
            return Err(InputError::BlankAddress {
                endpoint: Endpoint::Start,
            });
        }
        if self.to.is_blank() {
            return Err(InputError::BlankAddress {
                endpoint: Endpoint::End,
            });
        }
        let free_time =
            NonZeroU32::new(self.free_time_minutes).ok_or(InputError::NonPositiveFreeTime)?;
        let preferences = self.sliders.to_preferences()?;
        Ok(ValidatedForm {
            from: self.from.trimmed(),
            to: self.to.trimmed(),
            preferences,
            transport: self.transport,
            free_time,
        })
    }
}

/// A form that passed validation and only awaits its endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedForm {
    from: LocationInput,
    to: LocationInput,
    preferences: Preferences,
    transport: Transport,
    free_time: NonZeroU32,
}

impl ValidatedForm {
    /// Trimmed origin input.
    #[must_use]
    pub const fn from(&self) -> &LocationInput {
        &self.from
    }

    /// Trimmed destination input.
    #[must_use]
    pub const fn to(&self) -> &LocationInput {
        &self.to
    }

    /// Normalised preferences.
    #[must_use]
    pub const fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Combine with the resolved endpoints into a [`RouteRequest`].
    #[must_use]
    pub fn into_request(self, start: Coordinate, end: Coordinate) -> RouteRequest {
        RouteRequest::new(start, end, self.preferences, self.transport, self.free_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "Rynok Square", Endpoint::Start)]
    #[case("   ", "Rynok Square", Endpoint::Start)]
    #[case("High Castle", "", Endpoint::End)]
    #[case("High Castle", "\t", Endpoint::End)]
    fn blank_addresses_are_rejected(
        #[case] from: &str,
        #[case] to: &str,
        #[case] endpoint: Endpoint,
    ) {
        let err = RouteForm::new(from, to).validate().expect_err("blank address");
        assert_eq!(err, InputError::BlankAddress { endpoint });
    }

    #[test]
    fn coordinate_inputs_skip_the_blank_check() {
        let form = RouteForm::new(Coordinate::new(1.0, 2.0), "Opera");
        let validated = form.validate().expect("valid form");
        assert_eq!(validated.from(), &LocationInput::Coordinate(Coordinate::new(1.0, 2.0)));
    }

    #[test]
    fn zero_free_time_is_rejected() {
        let err = RouteForm::new("a", "b")
            .with_free_time(0)
            .validate()
            .expect_err("zero budget");
        assert_eq!(err, InputError::NonPositiveFreeTime);
    }

    #[test]
    fn sliders_above_hundred_are_rejected() {
        let sliders = PreferenceSliders::zeroed().with(Category::Nature, 101);
        let err = RouteForm::new("a", "b")
            .with_sliders(sliders)
            .validate()
            .expect_err("slider out of range");
        assert_eq!(
            err,
            InputError::PreferenceOutOfRange {
                category: Category::Nature,
                value: 101
            }
        );
    }

    #[test]
    fn sliders_are_divided_by_one_hundred() {
        let sliders = PreferenceSliders::zeroed()
            .with(Category::Culture, 100)
            .with(Category::Food, 25);
        let prefs = sliders.to_preferences().expect("valid sliders");
        assert_eq!(prefs.weight(Category::Culture), 1.0);
        assert_eq!(prefs.weight(Category::Food), 0.25);
        assert_eq!(prefs.weight(Category::Spiritual), 0.0);
    }

    #[test]
    fn validated_form_builds_request() {
        let validated = RouteForm::new("  Opera  ", "Park")
            .with_transport(Transport::Walk)
            .with_free_time(60)
            .validate()
            .expect("valid form");
        assert_eq!(validated.from(), &LocationInput::Address("Opera".to_owned()));
        let request =
            validated.into_request(Coordinate::new(1.0, 1.0), Coordinate::new(2.0, 2.0));
        assert_eq!(request.transport(), Transport::Walk);
        assert_eq!(request.free_time_minutes().get(), 60);
        assert_eq!(request.preferences().weight(Category::Culture), 0.3);
    }
}
