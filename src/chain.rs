//! Chain: the entries of one bucket, in insertion order.

use core::borrow::Borrow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
}

#[derive(Debug, Clone)]
pub(crate) struct Chain<K, V> {
    entries: Vec<Entry<K, V>>,
}

impl<K, V> Default for Chain<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K, V> Chain<K, V> {
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Appends without checking for an existing key; callers guarantee uniqueness.
    pub(crate) fn push(&mut self, key: K, value: V) {
        self.entries.push(Entry { key, value });
    }

    pub(crate) fn push_entry(&mut self, entry: Entry<K, V>) {
        self.entries.push(entry);
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|e| (&e.key, &e.value))
    }

    pub(crate) fn into_entries(self) -> impl Iterator<Item = Entry<K, V>> {
        self.entries.into_iter()
    }
}

impl<K, V> Chain<K, V>
where
    K: Eq,
{
    fn position<Q>(&self, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.entries.iter().position(|e| e.key.borrow() == q)
    }

    pub(crate) fn get<Q>(&self, q: &Q) -> Option<&Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.position(q).map(|i| &self.entries[i])
    }

    pub(crate) fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.position(q).map(move |i| &mut self.entries[i])
    }

    /// Removes the entry with key `q`; the remaining entries keep their order.
    pub(crate) fn remove<Q>(&mut self, q: &Q) -> Option<Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.position(q).map(|i| self.entries.remove(i))
    }
}
