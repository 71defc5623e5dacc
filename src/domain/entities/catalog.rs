//! Breed catalog - the breed/sub-breed mapping served by the remote API

use std::collections::HashMap;
use std::fmt;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;

/// Immutable breed catalog, loaded once at startup.
///
/// Keeps the entries in the order the remote payload listed them, so
/// rendered listings and keyboards stay stable across calls. Lookups go
/// through a side index; callers normalize names to lower case first.
#[derive(Debug, Clone, Default)]
pub struct BreedCatalog {
    entries: Vec<(String, Vec<String>)>,
    index: HashMap<String, usize>,
}

impl BreedCatalog {
    pub fn new(entries: Vec<(String, Vec<String>)>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, (breed, _))| (breed.clone(), i))
            .collect();
        Self { entries, index }
    }

    pub fn has_breed(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn sub_breeds(&self, name: &str) -> Option<&[String]> {
        self.index
            .get(name)
            .map(|&i| self.entries[i].1.as_slice())
    }

    /// Iterate breeds with their sub-breeds, in payload order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(breed, subs)| (breed.as_str(), subs.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the full breed listing: a header, one line per breed, and
    /// each sub-breed indented beneath its parent as "<sub> <breed>".
    pub fn render_listing(&self) -> String {
        let mut listing = String::from("Here is the list of all available breeds:\n");
        for (breed, subs) in self.iter() {
            listing.push_str(breed);
            listing.push('\n');
            for sub in subs {
                listing.push_str(&format!("   {} {}\n", sub, breed));
            }
        }
        listing
    }
}

// The remote payload is a JSON object; serde visits its entries in
// document order, which is the order the catalog must preserve.
impl<'de> Deserialize<'de> for BreedCatalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CatalogVisitor;

        impl<'de> Visitor<'de> for CatalogVisitor {
            type Value = BreedCatalog;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of breed names to sub-breed lists")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((breed, subs)) = map.next_entry::<String, Vec<String>>()? {
                    entries.push((breed, subs));
                }
                Ok(BreedCatalog::new(entries))
            }
        }

        deserializer.deserialize_map(CatalogVisitor)
    }
}
