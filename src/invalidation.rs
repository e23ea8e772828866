/// Tracks staleness of the student list view.
///
/// Every successful mutation bumps the generation and notifies listeners;
/// list consumers re-query when the generation they hold is behind.
#[derive(Default)]
pub struct ListInvalidation {
    generation: u64,
    listeners: Vec<Box<dyn FnMut(u64) + Send>>,
}

impl ListInvalidation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn subscribe(&mut self, listener: impl FnMut(u64) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn mark_stale(&mut self) -> u64 {
        self.generation += 1;
        for listener in &mut self.listeners {
            listener(self.generation);
        }
        self.generation
    }
}
