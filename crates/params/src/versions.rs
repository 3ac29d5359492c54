//! Resolution of the staking parameter version that is active at a given Bitcoin height.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{
    errors::{ParamsError, ParamsResult},
    staking::StakingParams,
};

/// The full list of staking parameter versions published by the staking module.
///
/// The versions are kept sorted by activation height in descending order so that the lookup for a
/// height returns the most recent version that has already activated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<StakingParams>", into = "Vec<StakingParams>")]
pub struct GlobalParams {
    versions: Vec<StakingParams>,
}

/// The versions relevant to a given height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamsVersionInfo<'a> {
    /// The version active at the height, if any has activated yet.
    pub current: Option<&'a StakingParams>,

    /// The version that activates after [`Self::current`].
    pub next: Option<&'a StakingParams>,

    /// Whether a staking transaction confirmed now would land after the next version activates.
    pub is_approaching_next: bool,

    /// The activation height of the earliest version.
    pub first_activation_height: u64,
}

impl GlobalParams {
    /// Validates every version and builds the lookup table.
    pub fn new(mut versions: Vec<StakingParams>) -> ParamsResult<Self> {
        if versions.is_empty() {
            return Err(ParamsError::Empty);
        }

        let mut heights = BTreeSet::new();
        for version in &versions {
            version.validate()?;

            if !heights.insert(version.activation_height) {
                return Err(ParamsError::DuplicateActivationHeight(
                    version.activation_height,
                ));
            }
        }

        versions.sort_by(|a, b| b.activation_height.cmp(&a.activation_height));

        Ok(Self { versions })
    }

    /// Iterates over the versions, most recent activation first.
    pub fn versions(&self) -> impl Iterator<Item = &StakingParams> {
        self.versions.iter()
    }

    /// Returns the version active at `height`.
    pub fn version_at_height(&self, height: u64) -> Option<&StakingParams> {
        self.versions
            .iter()
            .find(|version| version.activation_height <= height)
    }

    /// Returns the current and upcoming versions for `height`.
    pub fn version_info(&self, height: u64) -> ParamsVersionInfo<'_> {
        let position = self
            .versions
            .iter()
            .position(|version| version.activation_height <= height);

        let (current, next) = match position {
            Some(0) => (self.versions.first(), None),
            Some(i) => (self.versions.get(i), self.versions.get(i - 1)),
            // nothing has activated yet, the earliest version is the next one.
            None => (None, self.versions.last()),
        };

        let is_approaching_next = next.is_some_and(|next| {
            height + u64::from(next.confirmation_depth) >= next.activation_height
        });

        let first_activation_height = self
            .versions
            .last()
            .map(|version| version.activation_height)
            .unwrap_or_default();

        ParamsVersionInfo {
            current,
            next,
            is_approaching_next,
            first_activation_height,
        }
    }
}

impl TryFrom<Vec<StakingParams>> for GlobalParams {
    type Error = ParamsError;

    fn try_from(versions: Vec<StakingParams>) -> Result<Self, Self::Error> {
        Self::new(versions)
    }
}

impl From<GlobalParams> for Vec<StakingParams> {
    fn from(params: GlobalParams) -> Self {
        params.versions
    }
}
