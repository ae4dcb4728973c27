//! Typed builder for the engine's `-filter_complex` syntax.
//!
//! A graph is a list of chains. Each chain reads labeled input pads, applies filters in order and
//! writes labeled output pads:
//!
//! ```text
//! [0:a]aformat=sample_rates=44100,apad=whole_dur=5.000[a0];[a0][a1]concat=n=2:v=0:a=1[out]
//! ```
//!
//! Keeping the structure typed lets tests inspect which filters a segment got without parsing
//! the rendered text.

use std::fmt;

/// Stream kind selector for engine input references.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamKind {
    /// Audio streams (`a`).
    Audio,
    /// Video streams (`v`).
    Video,
}

impl StreamKind {
    fn specifier(self) -> &'static str {
        match self {
            Self::Audio => "a",
            Self::Video => "v",
        }
    }
}

/// A pad a chain reads from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamRef {
    /// A stream of an engine input file, e.g. `[2:a]`.
    Input {
        /// 0-based `-i` index.
        index: usize,
        /// Stream kind.
        kind: StreamKind,
    },
    /// An intermediate signal produced by another chain.
    Label(String),
}

impl StreamRef {
    /// Audio of input file `index`.
    pub fn input_audio(index: usize) -> Self {
        Self::Input {
            index,
            kind: StreamKind::Audio,
        }
    }

    /// Intermediate signal named `name`.
    pub fn label(name: impl Into<String>) -> Self {
        Self::Label(name.into())
    }
}

impl fmt::Display for StreamRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input { index, kind } => write!(f, "[{index}:{}]", kind.specifier()),
            Self::Label(name) => write!(f, "[{name}]"),
        }
    }
}

/// One filter argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterArg {
    /// Bare positional value.
    Positional(String),
    /// `key=value` option.
    Named(String, String),
}

/// A single filter invocation such as `atrim=0:4.000`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Filter {
    /// Filter name.
    pub name: String,
    /// Arguments in order.
    pub args: Vec<FilterArg>,
}

impl Filter {
    /// Filter with no arguments.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Append a positional argument.
    pub fn positional(mut self, value: impl fmt::Display) -> Self {
        self.args.push(FilterArg::Positional(value.to_string()));
        self
    }

    /// Append a `key=value` option.
    pub fn option(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.args
            .push(FilterArg::Named(key.into(), value.to_string()));
        self
    }

    /// Value of option `key`, if set.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.args.iter().find_map(|a| match a {
            FilterArg::Named(k, v) if k == key => Some(v.as_str()),
            _ => None,
        })
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            f.write_str(if i == 0 { "=" } else { ":" })?;
            match arg {
                FilterArg::Positional(v) => f.write_str(v)?,
                FilterArg::Named(k, v) => write!(f, "{k}={v}")?,
            }
        }
        Ok(())
    }
}

/// Inputs -> filters -> outputs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterChain {
    /// Pads read by the first filter. Empty for source filters.
    pub inputs: Vec<StreamRef>,
    /// Filters applied in order.
    pub filters: Vec<Filter>,
    /// Labels written by the last filter.
    pub outputs: Vec<String>,
}

impl FilterChain {
    /// Empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an input pad.
    pub fn input(mut self, input: StreamRef) -> Self {
        self.inputs.push(input);
        self
    }

    /// Append a filter.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Add an output label.
    pub fn output(mut self, label: impl Into<String>) -> Self {
        self.outputs.push(label.into());
        self
    }

    /// Names of the filters in this chain, in order.
    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name.as_str()).collect()
    }

    /// First filter called `name`.
    pub fn find(&self, name: &str) -> Option<&Filter> {
        self.filters.iter().find(|f| f.name == name)
    }
}

impl fmt::Display for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for input in &self.inputs {
            write!(f, "{input}")?;
        }
        for (i, filter) in self.filters.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{filter}")?;
        }
        for out in &self.outputs {
            write!(f, "[{out}]")?;
        }
        Ok(())
    }
}

/// Complete filter graph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterGraph {
    /// Chains in declaration order.
    pub chains: Vec<FilterChain>,
}

impl FilterGraph {
    /// Empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chain.
    pub fn push(&mut self, chain: FilterChain) {
        self.chains.push(chain);
    }

    /// Chain whose outputs include `label`.
    pub fn producer_of(&self, label: &str) -> Option<&FilterChain> {
        self.chains
            .iter()
            .find(|c| c.outputs.iter().any(|o| o == label))
    }

    /// Render to the engine's textual syntax.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FilterGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, chain) in self.chains.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{chain}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/graph.rs"]
mod tests;
