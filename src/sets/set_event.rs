/// A single change to a [`crate::sets::NumericSet`].
///
/// Interval-based sets report range granularity: one event per gap that was filled by an add and
/// one event per removed sub-range. Sparse sets report individual values. Callers rely on this
/// granularity to know exactly which sub-ranges changed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SetEvent<T> {
    RangeAdded { start: T, end: T },
    RangeRemoved { start: T, end: T },
    ValueAdded(T),
    ValueRemoved(T),
}

/// While a set is mutated, the changes it undergoes are captured as events in the event sink.
/// The registered listener tag is forwarded on every drained event, which lets one listener
/// demultiplex events from many registered sets.
///
/// Recording is off until a listener is registered, so sets that nobody observes pay nothing.
#[derive(Clone, Debug)]
pub(crate) struct SetEventSink<T> {
    enabled: bool,
    tag: u32,
    events: Vec<(u32, SetEvent<T>)>,
}

impl<T> Default for SetEventSink<T> {
    fn default() -> Self {
        SetEventSink {
            enabled: false,
            tag: 0,
            events: Vec::new(),
        }
    }
}

impl<T> SetEventSink<T> {
    pub(crate) fn register(&mut self, tag: u32) {
        self.enabled = true;
        self.tag = tag;
    }

    pub(crate) fn record(&mut self, event: SetEvent<T>) {
        if self.enabled {
            self.events.push((self.tag, event));
        }
    }

    pub(crate) fn drain(&mut self) -> std::vec::Drain<'_, (u32, SetEvent<T>)> {
        self.events.drain(..)
    }

    pub(crate) fn clear(&mut self) {
        self.events.clear();
    }
}
