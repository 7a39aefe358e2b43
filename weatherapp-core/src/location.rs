use async_trait::async_trait;
use std::fmt::Debug;

use crate::model::Coordinates;

/// Source of the device position. A single best-effort fix, or none.
#[async_trait]
pub trait LocationProvider: Send + Sync + Debug {
    async fn locate(&self) -> Option<Coordinates>;
}

/// Position taken from configuration or the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocation(Option<Coordinates>);

impl FixedLocation {
    pub fn new(coords: Coordinates) -> Self {
        Self(Some(coords))
    }

    pub fn unknown() -> Self {
        Self(None)
    }
}

impl From<Option<Coordinates>> for FixedLocation {
    fn from(coords: Option<Coordinates>) -> Self {
        Self(coords)
    }
}

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn locate(&self) -> Option<Coordinates> {
        self.0
    }
}
