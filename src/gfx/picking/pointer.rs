//! Pointer tracking and pointer-move observers.
//!
//! The tracker only converts coordinates. Picking reads the latest value once
//! per frame, so a burst of move events between two frames costs one pick.

use cgmath::Vector2;
use log::trace;

use super::selection::Selection;

/// A pointer move in surface pixel coordinates (origin top-left)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub client_x: f32,
    pub client_y: f32,
}

impl PointerEvent {
    pub fn new(client_x: f32, client_y: f32) -> Self {
        Self { client_x, client_y }
    }
}

/// Latest pointer position in normalized device coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerTracker {
    ndc: Vector2<f32>,
    width: f32,
    height: f32,
}

impl PointerTracker {
    /// Creates a tracker for a surface of the given pixel size.
    ///
    /// The pointer starts in the bottom-left corner (-1, -1) until the first
    /// move arrives.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            ndc: Vector2::new(-1.0, -1.0),
            width,
            height,
        }
    }

    /// Maps pixel coordinates to normalized device coordinates.
    ///
    /// Returns `None` for a surface with no area.
    pub fn to_ndc(client_x: f32, client_y: f32, width: f32, height: f32) -> Option<Vector2<f32>> {
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        Some(Vector2::new(
            (client_x / width) * 2.0 - 1.0,
            -(client_y / height) * 2.0 + 1.0,
        ))
    }

    pub fn ndc(&self) -> Vector2<f32> {
        self.ndc
    }

    pub fn surface_size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Records a pointer move. The previous value is kept when the surface
    /// has no area.
    pub fn on_move(&mut self, event: &PointerEvent) -> Vector2<f32> {
        match Self::to_ndc(event.client_x, event.client_y, self.width, self.height) {
            Some(ndc) => {
                trace!("pointer ndc ({:.3}, {:.3})", ndc.x, ndc.y);
                self.ndc = ndc;
            }
            None => trace!("pointer move ignored on empty surface"),
        }
        self.ndc
    }
}

/// Observer callback type
pub type PointerObserver = Box<dyn FnMut(&PointerEvent, &Selection)>;

/// Handle returned by [`PointerObservers::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Callbacks notified on every pointer move with the current selection
#[derive(Default)]
pub struct PointerObservers {
    observers: Vec<(ObserverId, PointerObserver)>,
    next_id: u64,
}

impl PointerObservers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, observer: F) -> ObserverId
    where
        F: FnMut(&PointerEvent, &Selection) + 'static,
    {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Removes an observer. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    /// Calls every observer in registration order
    pub fn notify(&mut self, event: &PointerEvent, selection: &Selection) {
        for (_, observer) in self.observers.iter_mut() {
            observer(event, selection);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, rc::Rc};

    #[test]
    fn test_ndc_mapping() {
        let mut tracker = PointerTracker::new(800.0, 600.0);
        assert_eq!(tracker.ndc(), Vector2::new(-1.0, -1.0));

        assert_eq!(tracker.on_move(&PointerEvent::new(400.0, 300.0)), Vector2::new(0.0, 0.0));
        assert_eq!(tracker.on_move(&PointerEvent::new(0.0, 0.0)), Vector2::new(-1.0, 1.0));
        assert_eq!(tracker.on_move(&PointerEvent::new(800.0, 600.0)), Vector2::new(1.0, -1.0));
        assert_eq!(tracker.on_move(&PointerEvent::new(200.0, 450.0)), Vector2::new(-0.5, -0.5));
    }

    #[test]
    fn test_last_value_wins() {
        let mut tracker = PointerTracker::new(100.0, 100.0);
        for x in [10.0, 20.0, 75.0] {
            tracker.on_move(&PointerEvent::new(x, 50.0));
        }
        assert_eq!(tracker.ndc(), Vector2::new(0.5, 0.0));
    }

    #[test]
    fn test_empty_surface_keeps_previous() {
        let mut tracker = PointerTracker::new(100.0, 100.0);
        tracker.on_move(&PointerEvent::new(50.0, 50.0));
        tracker.resize(0.0, 100.0);
        assert_eq!(tracker.on_move(&PointerEvent::new(10.0, 10.0)), Vector2::new(0.0, 0.0));
    }

    #[test]
    fn test_observers_in_order_and_unsubscribe() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut observers = PointerObservers::new();

        let first = {
            let calls = calls.clone();
            observers.subscribe(move |event, _| calls.borrow_mut().push(("first", event.client_x)))
        };
        {
            let calls = calls.clone();
            observers.subscribe(move |event, selection| {
                assert!(selection.is_empty());
                calls.borrow_mut().push(("second", event.client_x));
            });
        }

        let selection = Selection::new();
        observers.notify(&PointerEvent::new(3.0, 4.0), &selection);
        assert!(observers.unsubscribe(first));
        assert!(!observers.unsubscribe(first));
        observers.notify(&PointerEvent::new(5.0, 6.0), &selection);

        assert_eq!(
            *calls.borrow(),
            vec![("first", 3.0), ("second", 3.0), ("second", 5.0)]
        );
        assert_eq!(observers.len(), 1);
    }
}
