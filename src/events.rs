// src/events.rs

/// Callbacks fired after a store mutates.
pub struct Listeners<E> {
    callbacks: Vec<Box<dyn Fn(&E)>>,
}

impl<E> Listeners<E> {
    pub fn new() -> Self {
        Self { callbacks: Vec::new() }
    }

    pub fn subscribe(&mut self, callback: impl Fn(&E) + 'static) {
        self.callbacks.push(Box::new(callback));
    }

    pub fn emit(&self, event: &E) {
        for callback in &self.callbacks {
            callback(event);
        }
    }
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners").field("count", &self.callbacks.len()).finish()
    }
}
