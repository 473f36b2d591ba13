//! Generational slot arena backing both handle tables.

use crate::handle::Key;

/// Result of looking up a key.
#[derive(Debug)]
pub(crate) enum Lookup<T> {
    Live(T),
    /// The key was issued and its object has since been removed.
    Retired,
    /// The key was never issued by this arena.
    Unknown,
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

#[derive(Debug)]
pub(crate) struct HandleArena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
    max_slots: u32,
}

impl<T> HandleArena<T> {
    pub(crate) fn new() -> Self {
        Self::with_max_slots(u32::MAX)
    }

    pub(crate) fn with_max_slots(max_slots: u32) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
            max_slots,
        }
    }

    /// Stores `value`, handing it back if no slot can be issued.
    pub(crate) fn insert(&mut self, value: T) -> Result<Key, T> {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            self.len += 1;
            return Ok(Key {
                index,
                generation: slot.generation,
            });
        }
        if self.slots.len() >= self.max_slots as usize {
            return Err(value);
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 1,
            value: Some(value),
        });
        self.len += 1;
        Ok(Key {
            index,
            generation: 1,
        })
    }

    pub(crate) fn get(&self, key: Key) -> Lookup<&T> {
        match self.slots.get(key.index as usize) {
            Some(slot) if slot.generation == key.generation => match &slot.value {
                Some(value) => Lookup::Live(value),
                None => Lookup::Retired,
            },
            Some(slot) if key.generation != 0 && key.generation < slot.generation => {
                Lookup::Retired
            }
            _ => Lookup::Unknown,
        }
    }

    pub(crate) fn get_mut(&mut self, key: Key) -> Lookup<&mut T> {
        match self.slots.get_mut(key.index as usize) {
            Some(slot) if slot.generation == key.generation => match &mut slot.value {
                Some(value) => Lookup::Live(value),
                None => Lookup::Retired,
            },
            Some(slot) if key.generation != 0 && key.generation < slot.generation => {
                Lookup::Retired
            }
            _ => Lookup::Unknown,
        }
    }

    /// Removes the value under `key` and retires the key.
    pub(crate) fn remove(&mut self, key: Key) -> Lookup<T> {
        match self.get(key) {
            Lookup::Live(_) => {}
            Lookup::Retired => return Lookup::Retired,
            Lookup::Unknown => return Lookup::Unknown,
        }
        let slot = &mut self.slots[key.index as usize];
        let Some(value) = slot.value.take() else {
            return Lookup::Retired;
        };
        self.len -= 1;
        // A slot whose generation would wrap is never reused.
        if let Some(next) = slot.generation.checked_add(1) {
            slot.generation = next;
            self.free.push(key.index);
        }
        Lookup::Live(value)
    }

    /// Removes every live value, retiring all keys.
    pub(crate) fn drain(&mut self) -> Vec<T> {
        let mut values = Vec::with_capacity(self.len);
        for index in 0..self.slots.len() {
            let slot = &self.slots[index];
            if slot.value.is_some() {
                let key = Key {
                    index: index as u32,
                    generation: slot.generation,
                };
                if let Lookup::Live(value) = self.remove(key) {
                    values.push(value);
                }
            }
        }
        values
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get_remove() {
        let mut arena = HandleArena::new();
        let key = arena.insert("a").unwrap();

        assert!(matches!(arena.get(key), Lookup::Live(&"a")));
        assert!(matches!(arena.remove(key), Lookup::Live("a")));
        assert!(matches!(arena.get(key), Lookup::Retired));
        assert!(matches!(arena.remove(key), Lookup::Retired));
        assert_eq!(arena.len(), 0);
    }

    #[test]
    fn test_reused_slot_gets_new_generation() {
        let mut arena = HandleArena::new();
        let first = arena.insert(1).unwrap();
        arena.remove(first);
        let second = arena.insert(2).unwrap();

        assert_eq!(first.index, second.index);
        assert_ne!(first.generation, second.generation);
        assert!(matches!(arena.get(first), Lookup::Retired));
        assert!(matches!(arena.get(second), Lookup::Live(&2)));
    }

    #[test]
    fn test_unknown_keys() {
        let mut arena = HandleArena::new();
        arena.insert(1).unwrap();

        let past_end = Key {
            index: 5,
            generation: 1,
        };
        let future = Key {
            index: 0,
            generation: 9,
        };
        assert!(matches!(arena.get(past_end), Lookup::Unknown));
        assert!(matches!(arena.get(future), Lookup::Unknown));
    }

    #[test]
    fn test_max_slots() {
        let mut arena = HandleArena::with_max_slots(2);
        let a = arena.insert('a').unwrap();
        arena.insert('b').unwrap();
        assert_eq!(arena.insert('c'), Err('c'));

        arena.remove(a);
        assert!(arena.insert('c').is_ok());
    }

    #[test]
    fn test_drain() {
        let mut arena = HandleArena::new();
        let a = arena.insert(1).unwrap();
        let b = arena.insert(2).unwrap();
        arena.insert(3).unwrap();
        arena.remove(b);

        assert_eq!(arena.drain(), vec![1, 3]);
        assert_eq!(arena.len(), 0);
        assert!(matches!(arena.get(a), Lookup::Retired));
    }
}
