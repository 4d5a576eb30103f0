use std::collections::HashMap;

/// A name's definitions: usually one, several when the name is duplicated.
#[derive(Debug, Clone, PartialEq)]
pub enum OneOrMany<T> {
    One(T),
    /// Two or more definitions in document order.
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// The definition that wins resolution.
    pub fn first(&self) -> &T {
        &self.as_slice()[0]
    }

    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::One(item) => std::slice::from_ref(item),
            OneOrMany::Many(items) => items,
        }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        match self {
            OneOrMany::One(item) => std::slice::from_mut(item),
            OneOrMany::Many(items) => items,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_duplicated(&self) -> bool {
        matches!(self, OneOrMany::Many(_))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    fn push(&mut self, item: T) {
        match self {
            OneOrMany::Many(items) => items.push(item),
            OneOrMany::One(_) => {
                let previous = std::mem::replace(self, OneOrMany::Many(Vec::with_capacity(2)));
                if let (OneOrMany::One(first), OneOrMany::Many(items)) = (previous, &mut *self) {
                    items.push(first);
                    items.push(item);
                }
            },
        }
    }
}

impl<'a, T> IntoIterator for &'a OneOrMany<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Name-keyed definitions that remember the order names first appeared in.
#[derive(Debug, Clone, PartialEq)]
pub struct Definitions<T> {
    entries: Vec<(String, OneOrMany<T>)>,
    index: HashMap<String, usize>,
}

impl<T> Default for Definitions<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> Definitions<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition under `name`, returning its position among that name's definitions.
    pub fn insert(&mut self, name: impl Into<String>, item: T) -> usize {
        let name = name.into();
        match self.index.get(&name) {
            Some(&slot) => {
                let defs = &mut self.entries[slot].1;
                defs.push(item);
                defs.len() - 1
            },
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, OneOrMany::One(item)));
                0
            },
        }
    }

    /// First definition of `name`.
    pub fn get(&self, name: &str) -> Option<&T> {
        self.get_all(name).map(OneOrMany::first)
    }

    pub fn get_all(&self, name: &str) -> Option<&OneOrMany<T>> {
        self.index.get(name).map(|&slot| &self.entries[slot].1)
    }

    /// The `position`-th definition of `name`.
    pub fn get_mut(&mut self, name: &str, position: usize) -> Option<&mut T> {
        let slot = *self.index.get(name)?;
        self.entries[slot].1.as_mut_slice().get_mut(position)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Names with their definitions, in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OneOrMany<T>)> {
        self.entries.iter().map(|(name, defs)| (name.as_str(), defs))
    }

    /// Every definition, duplicates included.
    pub fn all(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().flat_map(|(_, defs)| defs.iter())
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_insert_promotes_to_many() {
        let mut defs = Definitions::new();
        assert_eq!(defs.insert("_a_", 1), 0);
        assert_eq!(defs.insert("_b_", 2), 0);
        assert_eq!(defs.insert("_a_", 3), 1);

        let a = defs.get_all("_a_").expect("a");
        assert!(a.is_duplicated());
        assert_eq!(a.as_slice(), &[1, 3]);
        assert_eq!(defs.get("_a_"), Some(&1));
        assert!(!defs.get_all("_b_").unwrap().is_duplicated());
    }

    #[test]
    fn iteration_follows_first_appearance() {
        let mut defs = Definitions::new();
        defs.insert("_z_", 'z');
        defs.insert("_a_", 'a');
        defs.insert("_z_", 'y');
        let names: Vec<&str> = defs.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["_z_", "_a_"]);
        assert_eq!(defs.all().copied().collect::<String>(), "zya");
        assert_eq!(defs.len(), 2);
    }

    #[test]
    fn get_mut_addresses_one_definition() {
        let mut defs = Definitions::new();
        defs.insert("_a_", 1);
        defs.insert("_a_", 2);
        *defs.get_mut("_a_", 1).unwrap() = 20;
        assert_eq!(defs.get_all("_a_").unwrap().as_slice(), &[1, 20]);
        assert!(defs.get_mut("_a_", 2).is_none());
        assert!(defs.get_mut("_b_", 0).is_none());
    }
}
