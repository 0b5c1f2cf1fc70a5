//! Attaching a [`ViewportController`] to a rendered map surface.
//!
//! The host abstracts the page: it owns the surface, the document and the
//! zoom-control shell, dispatches events to registered listeners and applies
//! view updates. Every listener shares one controller instance; the returned
//! [`Teardown`] removes all of them again.

use crate::core::config::MapConfig;
use crate::core::geo::Point;
use crate::core::viewport::{SurfaceRect, ViewportState};
use crate::input::events::{EventKind, EventResponse, InputEvent};
use crate::interaction::controller::{SurfaceView, ViewportController};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Where a listener is registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerTarget {
    /// The drawing surface (the `svg` inside `.map-container`)
    Surface,
    /// The whole document, so drags keep tracking outside the surface
    Document,
    /// The `.map-shell` around the map holding the zoom controls
    Shell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListenerOptions {
    pub capture: bool,
    /// `false` when the listener may call `preventDefault`
    pub passive: bool,
}

impl ListenerOptions {
    pub const ACTIVE: ListenerOptions = ListenerOptions {
        capture: false,
        passive: false,
    };
    pub const CAPTURE: ListenerOptions = ListenerOptions {
        capture: true,
        passive: false,
    };
}

/// Handle returned by [`MapHost::add_listener`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

pub type Listener = Box<dyn FnMut(&InputEvent) -> EventResponse>;

/// Page-side services a map interaction needs.
///
/// Methods take `&self` because listeners call back into the host while it
/// is dispatching.
pub trait MapHost {
    /// The container and its drawing surface are present
    fn has_surface(&self) -> bool;

    /// A zoom-control shell encloses the container
    fn has_shell(&self) -> bool;

    /// Current on-screen rectangle of the drawing surface
    fn surface_rect(&self) -> SurfaceRect;

    fn add_listener(
        &self,
        target: ListenerTarget,
        kind: EventKind,
        options: ListenerOptions,
        listener: Listener,
    ) -> ListenerId;

    fn remove_listener(&self, id: ListenerId);

    /// Applies the view box and the zoomed/grabbing surface flags
    fn apply_view(&self, view: &SurfaceView);
}

type Handler = fn(&mut ViewportController, &InputEvent, &SurfaceRect) -> EventResponse;

fn route(controller: &mut ViewportController, event: &InputEvent, rect: &SurfaceRect) -> EventResponse {
    controller.handle(event, rect)
}

fn click_capture(controller: &mut ViewportController, _: &InputEvent, _: &SurfaceRect) -> EventResponse {
    controller.suppress_click()
}

fn zoom_control(controller: &mut ViewportController, event: &InputEvent, _: &SurfaceRect) -> EventResponse {
    match event {
        InputEvent::Click {
            action: Some(action),
            ..
        } => controller.apply_action(*action),
        _ => EventResponse::IGNORED,
    }
}

const SURFACE_BINDINGS: [(EventKind, ListenerOptions, Handler); 8] = [
    (EventKind::Wheel, ListenerOptions::ACTIVE, route),
    (EventKind::MouseDown, ListenerOptions::ACTIVE, route),
    (EventKind::TouchStart, ListenerOptions::ACTIVE, route),
    (EventKind::TouchMove, ListenerOptions::ACTIVE, route),
    (EventKind::TouchEnd, ListenerOptions::ACTIVE, route),
    (EventKind::TouchCancel, ListenerOptions::ACTIVE, route),
    (EventKind::DoubleClick, ListenerOptions::ACTIVE, route),
    (EventKind::Click, ListenerOptions::CAPTURE, click_capture),
];

const DOCUMENT_BINDINGS: [(EventKind, ListenerOptions, Handler); 2] = [
    (EventKind::MouseMove, ListenerOptions::ACTIVE, route),
    (EventKind::MouseUp, ListenerOptions::ACTIVE, route),
];

fn bind<H: MapHost + 'static>(
    host: &Rc<H>,
    controller: &Rc<RefCell<ViewportController>>,
    handler: Handler,
) -> Listener {
    let host: Weak<H> = Rc::downgrade(host);
    let controller = Rc::clone(controller);
    Box::new(move |event| {
        let Some(host) = host.upgrade() else {
            return EventResponse::IGNORED;
        };
        let rect = host.surface_rect();
        let (response, view) = {
            let mut controller = controller.borrow_mut();
            let response = handler(&mut *controller, event, &rect);
            (response, controller.surface_view())
        };
        if response.redraw {
            host.apply_view(&view);
        }
        response
    })
}

/// Wires pan and zoom onto the host's map surface.
///
/// Returns `None` when the host has no surface to interact with. Otherwise
/// applies the initial view and returns the handle that removes every
/// listener again.
pub fn attach<H: MapHost + 'static>(host: Rc<H>, config: &MapConfig) -> Option<Teardown> {
    if !host.has_surface() {
        log::debug!("no map surface found, skipping interaction");
        return None;
    }

    let base_size = Point::new(config.canvas.width, config.canvas.height);
    let controller = Rc::new(RefCell::new(ViewportController::new(
        base_size,
        &config.interaction,
    )));

    let mut listeners = Vec::new();
    for (kind, options, handler) in SURFACE_BINDINGS {
        let listener = bind(&host, &controller, handler);
        listeners.push(host.add_listener(ListenerTarget::Surface, kind, options, listener));
    }
    for (kind, options, handler) in DOCUMENT_BINDINGS {
        let listener = bind(&host, &controller, handler);
        listeners.push(host.add_listener(ListenerTarget::Document, kind, options, listener));
    }
    if host.has_shell() {
        let listener = bind(&host, &controller, zoom_control);
        listeners.push(host.add_listener(
            ListenerTarget::Shell,
            EventKind::Click,
            ListenerOptions::default(),
            listener,
        ));
    }

    host.apply_view(&controller.borrow().surface_view());
    log::debug!("map interaction attached with {} listeners", listeners.len());

    Some(Teardown {
        host,
        controller,
        listeners,
    })
}

/// Live interaction on one surface; dropping it detaches every listener.
pub struct Teardown {
    host: Rc<dyn MapHost>,
    controller: Rc<RefCell<ViewportController>>,
    listeners: Vec<ListenerId>,
}

impl Teardown {
    /// Removes every registered listener. Calling it again does nothing.
    pub fn teardown(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        for id in self.listeners.drain(..) {
            self.host.remove_listener(id);
        }
        log::debug!("map interaction detached");
    }

    pub fn is_attached(&self) -> bool {
        !self.listeners.is_empty()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn state(&self) -> ViewportState {
        self.controller.borrow().state()
    }

    pub fn surface_view(&self) -> SurfaceView {
        self.controller.borrow().surface_view()
    }
}

impl Drop for Teardown {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for Teardown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Teardown")
            .field("listeners", &self.listeners)
            .field("state", &self.state())
            .finish()
    }
}

/// Holds the interaction of whichever map is currently rendered.
///
/// Re-rendering replaces the surface, so the previous interaction is always
/// torn down before the next one attaches.
#[derive(Debug, Default)]
pub struct InteractionSlot {
    current: Option<Teardown>,
}

impl InteractionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Detaches the previous map, then attaches to `host`.
    /// Returns whether the new surface is interactive.
    pub fn attach<H: MapHost + 'static>(&mut self, host: Rc<H>, config: &MapConfig) -> bool {
        self.detach();
        self.current = attach(host, config);
        self.current.is_some()
    }

    pub fn detach(&mut self) {
        if let Some(mut previous) = self.current.take() {
            previous.teardown();
        }
    }

    pub fn current(&self) -> Option<&Teardown> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::events::MapAction;
    use std::cell::Cell;

    type Registered = (ListenerId, ListenerTarget, EventKind, ListenerOptions);

    #[derive(Default)]
    struct FakeHost {
        shell: bool,
        next_id: Cell<u64>,
        registered: RefCell<Vec<Registered>>,
        listeners: RefCell<Vec<(ListenerId, Rc<RefCell<Listener>>)>>,
        views: RefCell<Vec<SurfaceView>>,
    }

    impl FakeHost {
        fn fire(&self, target: ListenerTarget, event: InputEvent) -> Vec<EventResponse> {
            let matching: Vec<Rc<RefCell<Listener>>> = {
                let registered = self.registered.borrow();
                let listeners = self.listeners.borrow();
                listeners
                    .iter()
                    .filter(|(id, _)| {
                        registered
                            .iter()
                            .any(|(r, t, k, _)| r == id && *t == target && *k == event.kind())
                    })
                    .map(|(_, l)| Rc::clone(l))
                    .collect()
            };
            matching
                .into_iter()
                .map(|l| {
                    let mut listener = l.borrow_mut();
                    (*listener)(&event)
                })
                .collect()
        }
    }

    impl MapHost for FakeHost {
        fn has_surface(&self) -> bool {
            true
        }

        fn has_shell(&self) -> bool {
            self.shell
        }

        fn surface_rect(&self) -> SurfaceRect {
            SurfaceRect::new(0.0, 0.0, 360.0, 280.0)
        }

        fn add_listener(
            &self,
            target: ListenerTarget,
            kind: EventKind,
            options: ListenerOptions,
            listener: Listener,
        ) -> ListenerId {
            let id = ListenerId(self.next_id.get());
            self.next_id.set(id.0 + 1);
            self.registered.borrow_mut().push((id, target, kind, options));
            self.listeners
                .borrow_mut()
                .push((id, Rc::new(RefCell::new(listener))));
            id
        }

        fn remove_listener(&self, id: ListenerId) {
            self.registered.borrow_mut().retain(|(r, ..)| *r != id);
            self.listeners.borrow_mut().retain(|(r, _)| *r != id);
        }

        fn apply_view(&self, view: &SurfaceView) {
            self.views.borrow_mut().push(*view);
        }
    }

    #[test]
    fn test_attach_registers_document_listeners() {
        let host = Rc::new(FakeHost::default());
        let teardown = attach(Rc::clone(&host), &MapConfig::default()).unwrap();

        let registered = host.registered.borrow();
        assert_eq!(teardown.listener_count(), 10);
        assert!(registered
            .iter()
            .any(|(_, t, k, _)| *t == ListenerTarget::Document && *k == EventKind::MouseUp));
        assert!(registered.iter().any(|(_, t, k, o)| *t == ListenerTarget::Surface
            && *k == EventKind::Click
            && o.capture));
        // initial view applied once
        assert_eq!(host.views.borrow().len(), 1);
        assert_eq!(host.views.borrow()[0].view_box.to_string(), "0 0 360 280");
    }

    #[test]
    fn test_teardown_is_idempotent_and_runs_on_drop() {
        let host = Rc::new(FakeHost {
            shell: true,
            ..FakeHost::default()
        });
        let mut teardown = attach(Rc::clone(&host), &MapConfig::default()).unwrap();
        assert_eq!(host.registered.borrow().len(), 11);

        teardown.teardown();
        teardown.teardown();
        assert!(!teardown.is_attached());
        assert!(host.registered.borrow().is_empty());

        let dropped = attach(Rc::clone(&host), &MapConfig::default());
        assert_eq!(host.registered.borrow().len(), 11);
        drop(dropped);
        assert!(host.registered.borrow().is_empty());
    }

    #[test]
    fn test_listeners_share_one_viewport() {
        let host = Rc::new(FakeHost {
            shell: true,
            ..FakeHost::default()
        });
        let teardown = attach(Rc::clone(&host), &MapConfig::default()).unwrap();

        host.fire(
            ListenerTarget::Shell,
            InputEvent::Click {
                position: Point::new(0.0, 0.0),
                action: Some(MapAction::ZoomIn),
            },
        );
        assert!((teardown.state().scale - 1.25).abs() < 1e-12);
        assert!(host.views.borrow().last().unwrap().zoomed);

        // drag on the surface, release on the document
        host.fire(
            ListenerTarget::Surface,
            InputEvent::MouseDown {
                position: Point::new(100.0, 100.0),
                button: crate::input::MouseButton::Left,
            },
        );
        assert!(host.views.borrow().last().unwrap().grabbing);
        host.fire(
            ListenerTarget::Document,
            InputEvent::MouseUp {
                position: Point::new(100.0, 100.0),
            },
        );
        assert!(!host.views.borrow().last().unwrap().grabbing);
    }

    #[test]
    fn test_slot_detaches_previous_map() {
        let first = Rc::new(FakeHost::default());
        let second = Rc::new(FakeHost::default());
        let mut slot = InteractionSlot::new();

        assert!(slot.attach(Rc::clone(&first), &MapConfig::default()));
        assert!(slot.attach(Rc::clone(&second), &MapConfig::default()));
        assert!(first.registered.borrow().is_empty());
        assert_eq!(second.registered.borrow().len(), 10);

        slot.detach();
        assert!(second.registered.borrow().is_empty());
        assert!(slot.current().is_none());
    }
}
