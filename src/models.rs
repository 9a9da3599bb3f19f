//! Lookups into model assets. Reading model files is not part of this crate;
//! callers plug in whatever parser they have.

use std::collections::HashMap;

pub trait ModelLookup {
    /// Names of the health zones declared by `model_file`, or `None` if the
    /// model is unknown.
    fn health_zone_names(&self, model_file: &str) -> Option<Vec<String>>;
}

/// Knows no models.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoModels;

impl ModelLookup for NoModels {
    fn health_zone_names(&self, _model_file: &str) -> Option<Vec<String>> {
        None
    }
}

/// Fixed table of model data, mostly for tools and tests.
#[derive(Clone, Debug, Default)]
pub struct StaticModels {
    zones: HashMap<String, Vec<String>>,
}

impl StaticModels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_zones<I, S>(mut self, model_file: &str, zones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.zones.insert(
            model_file.to_string(),
            zones.into_iter().map(Into::into).collect(),
        );
        self
    }
}

impl ModelLookup for StaticModels {
    fn health_zone_names(&self, model_file: &str) -> Option<Vec<String>> {
        self.zones.get(model_file).cloned()
    }
}

pub struct ModelsWithCallback<F> {
    callback: F,
}

impl<F> ModelsWithCallback<F>
where
    F: Fn(&str) -> Option<Vec<String>>,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ModelLookup for ModelsWithCallback<F>
where
    F: Fn(&str) -> Option<Vec<String>>,
{
    fn health_zone_names(&self, model_file: &str) -> Option<Vec<String>> {
        (self.callback)(model_file)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn lookups() {
        let models = StaticModels::new().with_zones("hangar.mdl", ["roof", "walls"]);
        assert_eq!(
            models.health_zone_names("hangar.mdl"),
            Some(vec!["roof".to_string(), "walls".to_string()])
        );
        assert_eq!(models.health_zone_names("other.mdl"), None);
        assert_eq!(NoModels.health_zone_names("hangar.mdl"), None);

        let callback = ModelsWithCallback::new(|file: &str| {
            file.ends_with(".mdl").then(|| vec!["body".to_string()])
        });
        assert_eq!(callback.health_zone_names("a.mdl").map(|z| z.len()), Some(1));
        assert_eq!(callback.health_zone_names("a.txt"), None);
    }
}
