// -------------------------------------------------------------------
// Versioned
// -------------------------------------------------------------------

/// A value that counts its mutable borrows, so derived data can tell
/// when it went stale.
#[derive(Debug, Clone, Default)]
pub struct Versioned<T> {
    version: u64,
    data: T,
}

impl<T> Versioned<T> {
    pub fn new(data: T) -> Self {
        Self { version: 0, data }
    }
    pub fn get(&self) -> &T {
        &self.data
    }
    pub fn get_mut(&mut self) -> &mut T {
        self.version = self.version.wrapping_add(1);
        &mut self.data
    }
    pub fn set(&mut self, data: T) {
        self.data = data;
        self.version = self.version.wrapping_add(1);
    }
    pub fn version(&self) -> u64 {
        self.version
    }
}

// -------------------------------------------------------------------
// Memoized
// -------------------------------------------------------------------

pub struct Memoized<S, K, V> {
    version: u64,
    cached: Option<(K, V)>,
    get_key: Box<dyn Fn(&S) -> K>,
    calc: Box<dyn Fn(&S) -> V>,
}

impl<S, K, V> Memoized<S, K, V>
where
    K: PartialEq,
{
    pub fn new(
        get_key: impl Fn(&S) -> K + 'static,
        calc: impl Fn(&S) -> V + 'static,
    ) -> Self {
        Self {
            version: 0,
            cached: None,
            get_key: Box::new(get_key),
            calc: Box::new(calc),
        }
    }

    /// Recompute only if the key changed; return a reference to the cached value.
    pub fn get<'a>(&'a mut self, store: &S) -> &'a V {
        let key = (self.get_key)(store);
        let (_, value) = match self.cached.take() {
            Some((last_key, value)) if last_key == key => {
                self.cached.insert((last_key, value))
            }
            _ => {
                self.version = self.version.wrapping_add(1);
                let value = (self.calc)(store);
                self.cached.insert((key, value))
            }
        };
        value
    }

    /// Number of recomputations so far.
    pub fn version(&self) -> u64 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn mutable_access_bumps_the_version() {
        let mut value = Versioned::new(vec![1, 2]);
        assert_eq!(value.version(), 0);
        let _ = value.get();
        assert_eq!(value.version(), 0);
        value.get_mut().push(3);
        value.set(vec![]);
        assert_eq!(value.version(), 2);
    }

    #[test]
    fn memoized_recomputes_only_on_key_change() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let mut doubled = Memoized::new(
            |s: &Versioned<i32>| s.version(),
            move |s: &Versioned<i32>| {
                counter.set(counter.get() + 1);
                s.get() * 2
            },
        );

        let mut source = Versioned::new(21);
        assert_eq!(*doubled.get(&source), 42);
        assert_eq!(*doubled.get(&source), 42);
        assert_eq!(calls.get(), 1);

        *source.get_mut() = 5;
        assert_eq!(*doubled.get(&source), 10);
        assert_eq!(calls.get(), 2);
        assert_eq!(doubled.version(), 2);
    }
}
