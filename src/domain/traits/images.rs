use std::fmt;

use async_trait::async_trait;

use crate::application::errors::FetchError;

/// What to ask the image API for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageTarget {
    /// Any breed, random image
    Any,
    /// A breed with no sub-breed qualifier
    Breed(String),
    /// A specific sub-breed of a breed
    SubBreed { breed: String, sub: String },
}

impl ImageTarget {
    /// The breed identifier as the remote API spells it.
    pub fn identifier(&self) -> Option<String> {
        match self {
            ImageTarget::Any => None,
            ImageTarget::Breed(breed) => Some(breed.clone()),
            ImageTarget::SubBreed { breed, sub } => Some(format!("{}-{}", breed, sub)),
        }
    }
}

impl fmt::Display for ImageTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.identifier() {
            Some(id) => write!(f, "{}", id),
            None => write!(f, "any"),
        }
    }
}

/// Source of random breed images
#[async_trait]
pub trait BreedImageSource: Send + Sync {
    /// Fetch one random image URL for the target.
    async fn random_image(&self, target: &ImageTarget) -> Result<String, FetchError>;
}
