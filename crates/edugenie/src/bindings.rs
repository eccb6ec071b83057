//! Capability to backend routing table.

use edugenie_core::{BackendKind, Capability};
use edugenie_error::{ConfigError, ConfigErrorKind, ConfigResult};
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

/// Which backend serves each capability.
///
/// Every capability always has a binding. The table is fixed once a
/// [`Coordinator`](crate::Coordinator) is built from it.
///
/// # Examples
///
/// ```
/// use edugenie::{BackendKind, Capability, CapabilityBindings};
///
/// let bindings = CapabilityBindings::default().bind(Capability::Quiz, BackendKind::Hosted);
/// assert_eq!(bindings.backend_for(Capability::Quiz), BackendKind::Hosted);
/// assert_eq!(bindings.backend_for(Capability::Explain), BackendKind::Local);
/// assert_eq!(bindings.backend_for(Capability::Image), BackendKind::Hosted);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityBindings(BTreeMap<Capability, BackendKind>);

impl Default for CapabilityBindings {
    fn default() -> Self {
        Self(
            Capability::iter()
                .map(|capability| (capability, capability.default_backend()))
                .collect(),
        )
    }
}

impl CapabilityBindings {
    /// Returns the table with one capability rebound.
    pub fn bind(mut self, capability: Capability, backend: BackendKind) -> Self {
        self.0.insert(capability, backend);
        self
    }

    /// The backend serving `capability`.
    pub fn backend_for(&self, capability: Capability) -> BackendKind {
        self.0
            .get(&capability)
            .copied()
            .unwrap_or_else(|| capability.default_backend())
    }

    /// Every binding, in capability order.
    pub fn iter(&self) -> impl Iterator<Item = (Capability, BackendKind)> + '_ {
        self.0.iter().map(|(c, b)| (*c, *b))
    }

    /// Builds a table from string pairs such as `("summarize_image", "hosted")`.
    ///
    /// Capability names accept `-` or `_` separators; backend names are
    /// case-insensitive. Unlisted capabilities keep their default.
    ///
    /// # Errors
    ///
    /// [`ConfigErrorKind::InvalidValue`] for an unknown capability or backend.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> ConfigResult<Self> {
        let mut bindings = Self::default();
        for (name, backend) in pairs {
            let key = format!("bindings.{}", name);
            let capability = name.replace('_', "-").parse::<Capability>().map_err(|_| {
                ConfigError::new(ConfigErrorKind::InvalidValue {
                    key: key.clone(),
                    message: format!("unknown capability \"{}\"", name),
                })
            })?;
            let backend = backend.trim().parse::<BackendKind>().map_err(|_| {
                ConfigError::new(ConfigErrorKind::InvalidValue {
                    key: key.clone(),
                    message: format!("expected \"local\" or \"hosted\", found \"{}\"", backend),
                })
            })?;
            bindings = bindings.bind(capability, backend);
        }
        Ok(bindings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_accept_either_separator() {
        let bindings =
            CapabilityBindings::from_pairs([("summarize_image", "HOSTED"), ("flashcards", "hosted")])
                .unwrap();
        assert_eq!(bindings.backend_for(Capability::SummarizeImage), BackendKind::Hosted);
        assert_eq!(bindings.backend_for(Capability::Flashcards), BackendKind::Hosted);
        assert_eq!(bindings.backend_for(Capability::Summarize), BackendKind::Local);
    }

    #[test]
    fn unknown_names_are_rejected() {
        let err = CapabilityBindings::from_pairs([("dance", "local")]).unwrap_err();
        assert!(matches!(err.kind, ConfigErrorKind::InvalidValue { ref key, .. } if key == "bindings.dance"));

        let err = CapabilityBindings::from_pairs([("quiz", "cloud")]).unwrap_err();
        assert!(matches!(err.kind, ConfigErrorKind::InvalidValue { .. }));
    }

    #[test]
    fn default_covers_every_capability() {
        assert_eq!(CapabilityBindings::default().iter().count(), Capability::iter().count());
    }
}
