//! Engine configuration: the ordered name tables fresh names are drawn from.
//!
//! Every ladder ends in a numbered stem, so a free name always exists.

/// Preferred names in order, then `stem{first_index}`, `stem{first_index + 1}`, ...
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameLadder {
    names: Vec<String>,
    stem: String,
    first_index: u32,
}

impl NameLadder {
    pub fn new<S: Into<String>>(
        names: impl IntoIterator<Item = S>,
        stem: impl Into<String>,
        first_index: u32,
    ) -> Self {
        NameLadder {
            names: names.into_iter().map(Into::into).collect(),
            stem: stem.into(),
            first_index,
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// All candidates in order. The iterator never ends.
    pub fn candidates(&self) -> impl Iterator<Item = String> + '_ {
        let numbered = (self.first_index..).map(move |n| format!("{}{n}", self.stem));
        self.names.iter().cloned().chain(numbered)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// `for` loop counters.
    pub counter: NameLadder,
    /// `foreach` variables, after the collection and element type names.
    pub iteration: NameLadder,
    /// Parameters of merged lambdas.
    pub lambda_parameter: NameLadder,
    /// Local holding `collection.ToArray()` before indexing.
    pub materialized_array: NameLadder,
    /// Local holding an indexable collection that is not a plain name.
    pub materialized_items: NameLadder,
    /// Temporaries introduced by unchaining.
    pub temporary: NameLadder,
    /// Parameter of the lambda a method group is normalized into.
    pub placeholder: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            counter: NameLadder::new(["i", "k", "j", "index", "counter"], "index", 1),
            iteration: NameLadder::new(["item", "element", "value", "current"], "item", 1),
            lambda_parameter: NameLadder::new(["x", "y", "z"], "x", 1),
            materialized_array: NameLadder::new(["array"], "array", 1),
            materialized_items: NameLadder::new(["items"], "items", 1),
            temporary: NameLadder::new(Vec::<String>::new(), "newVar", 0),
            placeholder: "__arg".to_owned(),
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn with_counter_names(mut self, ladder: NameLadder) -> Self {
        self.counter = ladder;
        self
    }

    #[must_use]
    pub fn with_iteration_names(mut self, ladder: NameLadder) -> Self {
        self.iteration = ladder;
        self
    }

    #[must_use]
    pub fn with_lambda_parameter_names(mut self, ladder: NameLadder) -> Self {
        self.lambda_parameter = ladder;
        self
    }

    #[must_use]
    pub fn with_materialized_names(mut self, array: NameLadder, items: NameLadder) -> Self {
        self.materialized_array = array;
        self.materialized_items = items;
        self
    }

    #[must_use]
    pub fn with_temporary_stem(mut self, stem: impl Into<String>) -> Self {
        self.temporary = NameLadder::new(Vec::<String>::new(), stem, 0);
        self
    }

    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_ladder_order() {
        let config = EngineConfig::default();
        let names: Vec<_> = config.counter.candidates().take(7).collect();
        assert_eq!(names, ["i", "k", "j", "index", "counter", "index1", "index2"]);
    }

    #[test]
    fn test_temporary_ladder_starts_at_zero() {
        let config = EngineConfig::default().with_temporary_stem("tmp");
        let names: Vec<_> = config.temporary.candidates().take(3).collect();
        assert_eq!(names, ["tmp0", "tmp1", "tmp2"]);
    }
}
