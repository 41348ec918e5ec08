//! Dependency resolution engine: turns seed coordinates into the complete,
//! deduplicated set of transitively required coordinates.
//!
//! The pure lookups ([`properties`], [`inheritance`], [`imports`]) read
//! descriptors through [`resolved::DescriptorSource`]; the engine in
//! [`resolver`] drives fetching and owns the shared [`resolved::ResolvedSet`].

pub mod imports;
pub mod inheritance;
pub mod properties;
pub mod resolved;
pub mod resolver;
