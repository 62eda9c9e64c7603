use crate::error::{Error, Result};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::BuildHasher;

/// A single name/value pair. Both parts are guaranteed non-blank.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Parameter<'a> {
    name: Cow<'a, str>,
    value: Cow<'a, str>,
}

impl<'a> Parameter<'a> {
    /// Build a parameter, rejecting an empty or whitespace-only name or value.
    pub fn new<TName, TValue>(name: TName, value: TValue) -> Result<Self>
    where
        TName: Into<Cow<'a, str>>,
        TValue: Into<Cow<'a, str>>,
    {
        let name = name.into();
        let value = value.into();
        if is_blank(&name) || is_blank(&value) {
            tracing::debug!(name = %name, "rejected blank oauth parameter");
            return Err(Error::InvalidParameter {
                name: name.into_owned(),
            });
        }
        Ok(Parameter { name, value })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn into_owned(self) -> Parameter<'static> {
        Parameter {
            name: Cow::Owned(self.name.into_owned()),
            value: Cow::Owned(self.value.into_owned()),
        }
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Ordered parameters, duplicates by name allowed.
///
/// Insertion order is kept for iteration only; signing order is computed by
/// the signer. Every mutating operation validates its input and leaves the set
/// untouched on failure.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParameterSet<'a> {
    parameters: Vec<Parameter<'a>>,
}

impl<'a> ParameterSet<'a> {
    pub fn new() -> Self {
        ParameterSet {
            parameters: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        ParameterSet {
            parameters: Vec::with_capacity(capacity),
        }
    }

    pub fn add(&mut self, parameter: Parameter<'a>) -> &mut Self {
        self.parameters.push(parameter);
        self
    }

    /// Validate and append a name/value pair.
    pub fn add_pair<TName, TValue>(&mut self, name: TName, value: TValue) -> Result<&mut Self>
    where
        TName: Into<Cow<'a, str>>,
        TValue: Into<Cow<'a, str>>,
    {
        let parameter = Parameter::new(name, value)?;
        Ok(self.add(parameter))
    }

    /// Append every pair, or none of them if any pair is invalid.
    pub fn add_range<I, TName, TValue>(&mut self, pairs: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (TName, TValue)>,
        TName: Into<Cow<'a, str>>,
        TValue: Into<Cow<'a, str>>,
    {
        let validated = pairs
            .into_iter()
            .map(|(k, v)| Parameter::new(k, v))
            .collect::<Result<Vec<_>>>()?;
        self.parameters.extend(validated);
        Ok(self)
    }

    /// Append every parameter of another set.
    pub fn extend_from(&mut self, other: &ParameterSet<'a>) -> &mut Self {
        self.parameters.extend(other.parameters.iter().cloned());
        self
    }

    /// Insert at `index`, shifting later elements. Returns false and leaves
    /// the set unchanged if `index > len`.
    pub fn insert(&mut self, index: usize, parameter: Parameter<'a>) -> bool {
        if index > self.parameters.len() {
            return false;
        }
        self.parameters.insert(index, parameter);
        true
    }

    /// Remove the first parameter equal to `parameter`.
    pub fn remove(&mut self, parameter: &Parameter<'_>) -> bool {
        match self.index_of(parameter) {
            Some(i) => {
                self.parameters.remove(i);
                true
            }
            None => false,
        }
    }

    /// Remove each given parameter once. True only if at least one parameter
    /// was given and every one of them was found.
    pub fn remove_all<'b, I>(&mut self, parameters: I) -> bool
    where
        I: IntoIterator<Item = &'b Parameter<'b>>,
    {
        let mut any = false;
        let mut all_removed = true;
        for p in parameters {
            any = true;
            all_removed &= self.remove(p);
        }
        any && all_removed
    }

    /// Remove every parameter named `name`, returning how many were dropped.
    pub fn remove_named(&mut self, name: &str) -> usize {
        let before = self.parameters.len();
        self.parameters.retain(|p| p.name() != name);
        before - self.parameters.len()
    }

    pub fn remove_at(&mut self, index: usize) -> Option<Parameter<'a>> {
        if index < self.parameters.len() {
            Some(self.parameters.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.parameters.clear();
    }

    pub fn contains(&self, parameter: &Parameter<'_>) -> bool {
        self.index_of(parameter).is_some()
    }

    pub fn index_of(&self, parameter: &Parameter<'_>) -> Option<usize> {
        self.parameters
            .iter()
            .position(|p| p.name == parameter.name && p.value == parameter.value)
    }

    /// Look a parameter up by name.
    ///
    /// When several parameters share the name, a synthetic parameter is
    /// returned whose value is all their values joined with `,` in insertion
    /// order.
    pub fn get(&self, name: &str) -> Option<Parameter<'a>> {
        let mut matches = self.parameters.iter().filter(|p| p.name() == name);
        let first = matches.next()?;
        let rest = matches.collect::<Vec<_>>();
        if rest.is_empty() {
            return Some(first.clone());
        }
        let value = std::iter::once(first)
            .chain(rest)
            .map(Parameter::value)
            .collect::<Vec<_>>()
            .join(",");
        Some(Parameter {
            name: first.name.clone(),
            value: Cow::Owned(value),
        })
    }

    pub fn get_index(&self, index: usize) -> Option<&Parameter<'a>> {
        self.parameters.get(index)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().map(Parameter::name)
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().map(Parameter::value)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Parameter<'a>> {
        self.parameters.iter()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Stable sort with a caller-supplied comparator.
    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&Parameter<'a>, &Parameter<'a>) -> Ordering,
    {
        self.parameters.sort_by(compare);
    }
}

impl<'a, TName, TValue> TryFrom<Vec<(TName, TValue)>> for ParameterSet<'a>
where
    TName: Into<Cow<'a, str>>,
    TValue: Into<Cow<'a, str>>,
{
    type Error = Error;

    fn try_from(pairs: Vec<(TName, TValue)>) -> Result<Self> {
        let mut set = ParameterSet::with_capacity(pairs.len());
        set.add_range(pairs)?;
        Ok(set)
    }
}

impl<'a, TName, TValue, S> TryFrom<HashMap<TName, TValue, S>> for ParameterSet<'a>
where
    TName: Into<Cow<'a, str>>,
    TValue: Into<Cow<'a, str>>,
    S: BuildHasher,
{
    type Error = Error;

    fn try_from(map: HashMap<TName, TValue, S>) -> Result<Self> {
        let mut set = ParameterSet::with_capacity(map.len());
        set.add_range(map)?;
        Ok(set)
    }
}

impl<'a> FromIterator<Parameter<'a>> for ParameterSet<'a> {
    fn from_iter<I: IntoIterator<Item = Parameter<'a>>>(iter: I) -> Self {
        ParameterSet {
            parameters: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for ParameterSet<'a> {
    type Item = Parameter<'a>;
    type IntoIter = std::vec::IntoIter<Parameter<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.parameters.into_iter()
    }
}

impl<'s, 'a> IntoIterator for &'s ParameterSet<'a> {
    type Item = &'s Parameter<'a>;
    type IntoIter = std::slice::Iter<'s, Parameter<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.parameters.iter()
    }
}
