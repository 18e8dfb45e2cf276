use std::borrow::Cow;
use std::fmt;

/// A map keyed by strings compared without regard to case.
///
/// Keys are kept sorted by their folded form and looked up by binary search.
/// The spelling of the first insertion is preserved for iteration.
#[derive(Clone)]
pub struct StrMap<T> {
    keys: Vec<Key>,
    values: Vec<T>,
}

#[derive(Clone)]
struct Key {
    folded: Box<str>,
    original: Box<str>,
}

impl<T> Default for StrMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> StrMap<T> {
    pub fn new() -> Self {
        Self {
            keys: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.find_index(&fold(key)).is_ok()
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        match self.find_index(&fold(key)) {
            Ok(i) => self.values.get(i),
            Err(_) => None,
        }
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut T> {
        match self.find_index(&fold(key)) {
            Ok(i) => self.values.get_mut(i),
            Err(_) => None,
        }
    }

    /// Returns the stored spelling of `key` together with its value.
    pub fn get_key_value(&self, key: &str) -> Option<(&str, &T)> {
        match self.find_index(&fold(key)) {
            Ok(i) => Some((&*self.keys[i].original, &self.values[i])),
            Err(_) => None,
        }
    }

    /// Inserts or replaces the value under `key`, returning the old value.
    pub fn insert(&mut self, key: &str, value: T) -> Option<T> {
        let folded = fold(key);
        match self.find_index(&folded) {
            Ok(i) => Some(std::mem::replace(&mut self.values[i], value)),
            Err(i) => {
                self.insert_at(i, folded, key, value);
                None
            }
        }
    }

    /// Inserts `value` only when `key` is absent. Returns whether it was inserted.
    pub fn try_insert(&mut self, key: &str, value: T) -> bool {
        let folded = fold(key);
        match self.find_index(&folded) {
            Ok(_) => false,
            Err(i) => {
                self.insert_at(i, folded, key, value);
                true
            }
        }
    }

    pub fn find_mut_with(&mut self, key: &str, f: impl FnOnce() -> T) -> &mut T {
        let folded = fold(key);
        let i = match self.find_index(&folded) {
            Ok(i) => i,
            Err(i) => {
                self.insert_at(i, folded, key, f());
                i
            }
        };
        &mut self.values[i]
    }

    pub fn remove(&mut self, key: &str) -> Option<T> {
        match self.find_index(&fold(key)) {
            Ok(i) => {
                self.keys.remove(i);
                Some(self.values.remove(i))
            }
            Err(_) => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> + '_ {
        self.keys
            .iter()
            .map(|k| &*k.original)
            .zip(self.values.iter())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.keys.iter().map(|k| &*k.original)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.values.iter()
    }

    fn insert_at(&mut self, i: usize, folded: Cow<'_, str>, key: &str, value: T) {
        self.keys.insert(
            i,
            Key {
                folded: folded.into(),
                original: key.into(),
            },
        );
        self.values.insert(i, value);
    }

    fn find_index(&self, key: &str) -> Result<usize, usize> {
        self.keys
            .binary_search_by(|k| k.folded.as_bytes().cmp(key.as_bytes()))
    }
}

impl<T: PartialEq> PartialEq for StrMap<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .keys
                .iter()
                .zip(other.keys.iter())
                .all(|(a, b)| a.folded == b.folded)
            && self.values == other.values
    }
}

impl<T: fmt::Debug> fmt::Debug for StrMap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: AsRef<str>, T> FromIterator<(K, T)> for StrMap<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k.as_ref(), v);
        }
        map
    }
}

impl<K: AsRef<str>, T> Extend<(K, T)> for StrMap<T> {
    fn extend<I: IntoIterator<Item = (K, T)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k.as_ref(), v);
        }
    }
}

fn fold(key: &str) -> Cow<'_, str> {
    if key.chars().any(char::is_uppercase) {
        Cow::Owned(key.to_lowercase())
    } else {
        Cow::Borrowed(key)
    }
}

pub(crate) fn eq_ignore_case(a: &str, b: &str) -> bool {
    if a.is_ascii() && b.is_ascii() {
        return a.eq_ignore_ascii_case(b);
    }
    fold(a) == fold(b)
}

fn char_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Length in bytes of the prefix of `hay` that equals `needle` ignoring case.
fn prefix_len_ignore_case(hay: &str, needle: &str) -> Option<usize> {
    let mut hay_chars = hay.char_indices();
    for n in needle.chars() {
        match hay_chars.next() {
            Some((_, h)) if char_eq_ignore_case(h, n) => {}
            _ => return None,
        }
    }
    Some(match hay_chars.next() {
        Some((i, _)) => i,
        None => hay.len(),
    })
}

/// Finds the last occurrence of `needle` in `hay` ignoring case, as a byte range.
pub(crate) fn rfind_ignore_case(hay: &str, needle: &str) -> Option<(usize, usize)> {
    if needle.is_empty() {
        return Some((hay.len(), hay.len()));
    }
    if hay.is_ascii() && needle.is_ascii() {
        let (h, n) = (hay.as_bytes(), needle.as_bytes());
        if n.len() > h.len() {
            return None;
        }
        return (0..=h.len() - n.len())
            .rev()
            .find(|&i| h[i..i + n.len()].eq_ignore_ascii_case(n))
            .map(|i| (i, i + n.len()));
    }
    hay.char_indices()
        .rev()
        .find_map(|(i, _)| prefix_len_ignore_case(&hay[i..], needle).map(|len| (i, i + len)))
}

pub(crate) fn ends_with_ignore_case(hay: &str, needle: &str) -> bool {
    match rfind_ignore_case(hay, needle) {
        Some((_, end)) => end == hay.len(),
        None => false,
    }
}
