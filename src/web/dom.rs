//! [`MapHost`] over the browser DOM.
//!
//! Expects the markup the route map renderer emits: a `.map-container`
//! holding the `svg` surface, optionally inside a `.map-shell` that also
//! holds the `[data-map-action]` zoom buttons.

use crate::core::geo::Point;
use crate::core::viewport::SurfaceRect;
use crate::input::events::{
    EventKind, EventResponse, InputEvent, MapAction, MouseButton, TouchEventType, TouchPoint,
};
use crate::interaction::controller::SurfaceView;
use crate::interaction::host::{Listener, ListenerId, ListenerOptions, ListenerTarget, MapHost};
use fxhash::FxHashMap;
use std::cell::{Cell, RefCell};
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget, MouseEvent, TouchEvent,
    TouchList, WheelEvent,
};

const CONTAINER_SELECTOR: &str = ".map-container";
const SHELL_SELECTOR: &str = ".map-shell";
const ACTION_SELECTOR: &str = "[data-map-action]";
const ZOOMED_CLASS: &str = "map-zoomed";
const GRABBING_CLASS: &str = "map-grabbing";

struct Registration {
    target: EventTarget,
    kind: EventKind,
    capture: bool,
    closure: Closure<dyn FnMut(Event)>,
}

pub struct DomHost {
    document: Document,
    container: Option<Element>,
    surface: Option<Element>,
    shell: Option<Element>,
    registrations: RefCell<FxHashMap<u64, Registration>>,
    next_id: Cell<u64>,
}

impl DomHost {
    /// Looks up the map markup currently in `document`
    pub fn new(document: Document) -> Self {
        let container = document.query_selector(CONTAINER_SELECTOR).ok().flatten();
        let surface = container
            .as_ref()
            .and_then(|c| c.query_selector("svg").ok().flatten());
        let shell = container
            .as_ref()
            .and_then(|c| c.closest(SHELL_SELECTOR).ok().flatten());
        Self {
            document,
            container,
            surface,
            shell,
            registrations: RefCell::new(FxHashMap::default()),
            next_id: Cell::new(0),
        }
    }

    /// Host for the page's global document, if there is one
    pub fn from_window() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self::new(document))
    }

    fn target(&self, target: ListenerTarget) -> Option<EventTarget> {
        match target {
            ListenerTarget::Surface => self.surface.clone().map(Into::into),
            ListenerTarget::Document => Some(self.document.clone().into()),
            ListenerTarget::Shell => self.shell.clone().map(Into::into),
        }
    }

    fn toggle_class(&self, class: &str, on: bool) {
        let Some(container) = &self.container else {
            return;
        };
        if let Err(e) = container.class_list().toggle_with_force(class, on) {
            log::warn!("could not toggle {class}: {e:?}");
        }
    }
}

impl MapHost for DomHost {
    fn has_surface(&self) -> bool {
        self.container.is_some() && self.surface.is_some()
    }

    fn has_shell(&self) -> bool {
        self.shell.is_some()
    }

    fn surface_rect(&self) -> SurfaceRect {
        match &self.surface {
            Some(surface) => {
                let rect = surface.get_bounding_client_rect();
                SurfaceRect::new(rect.left(), rect.top(), rect.width(), rect.height())
            }
            None => SurfaceRect::new(0.0, 0.0, 0.0, 0.0),
        }
    }

    fn add_listener(
        &self,
        target: ListenerTarget,
        kind: EventKind,
        options: ListenerOptions,
        mut listener: Listener,
    ) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let Some(event_target) = self.target(target) else {
            log::warn!("no {target:?} element for {} listener", kind.dom_name());
            return id;
        };

        let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(input) = to_input_event(kind, &event) else {
                return;
            };
            let response = listener(&input);
            apply_response(&event, response);
        });

        let dom_options = AddEventListenerOptions::new();
        dom_options.set_capture(options.capture);
        dom_options.set_passive(options.passive);
        let added = event_target.add_event_listener_with_callback_and_add_event_listener_options(
            kind.dom_name(),
            closure.as_ref().unchecked_ref(),
            &dom_options,
        );
        if let Err(e) = added {
            log::warn!("could not add {} listener: {e:?}", kind.dom_name());
            return id;
        }

        self.registrations.borrow_mut().insert(
            id.0,
            Registration {
                target: event_target,
                kind,
                capture: options.capture,
                closure,
            },
        );
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        let Some(registration) = self.registrations.borrow_mut().remove(&id.0) else {
            return;
        };
        let removed = registration
            .target
            .remove_event_listener_with_callback_and_bool(
                registration.kind.dom_name(),
                registration.closure.as_ref().unchecked_ref(),
                registration.capture,
            );
        if let Err(e) = removed {
            log::warn!("could not remove {} listener: {e:?}", registration.kind.dom_name());
        }
    }

    fn apply_view(&self, view: &SurfaceView) {
        if let Some(surface) = &self.surface {
            if let Err(e) = surface.set_attribute("viewBox", &view.view_box.to_string()) {
                log::warn!("could not set viewBox: {e:?}");
            }
        }
        self.toggle_class(ZOOMED_CLASS, view.zoomed);
        self.toggle_class(GRABBING_CLASS, view.grabbing);
    }
}

fn client_position(event: &MouseEvent) -> Point {
    Point::new(f64::from(event.client_x()), f64::from(event.client_y()))
}

fn touch_points(list: &TouchList) -> Vec<TouchPoint> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|t| TouchPoint {
            id: u64::from(t.identifier().unsigned_abs()),
            position: Point::new(f64::from(t.client_x()), f64::from(t.client_y())),
        })
        .collect()
}

fn clicked_action(event: &Event) -> Option<MapAction> {
    let element = event.target()?.dyn_into::<Element>().ok()?;
    let button = element.closest(ACTION_SELECTOR).ok().flatten()?;
    button.get_attribute("data-map-action")?.parse().ok()
}

fn to_input_event(kind: EventKind, event: &Event) -> Option<InputEvent> {
    match kind {
        EventKind::Wheel => {
            let wheel = event.dyn_ref::<WheelEvent>()?;
            Some(InputEvent::Wheel {
                position: client_position(wheel),
                delta_y: wheel.delta_y(),
            })
        }
        EventKind::MouseDown => {
            let mouse = event.dyn_ref::<MouseEvent>()?;
            Some(InputEvent::MouseDown {
                position: client_position(mouse),
                button: MouseButton::from_dom(mouse.button()),
            })
        }
        EventKind::MouseMove => Some(InputEvent::MouseMove {
            position: client_position(event.dyn_ref::<MouseEvent>()?),
        }),
        EventKind::MouseUp => Some(InputEvent::MouseUp {
            position: client_position(event.dyn_ref::<MouseEvent>()?),
        }),
        EventKind::TouchStart
        | EventKind::TouchMove
        | EventKind::TouchEnd
        | EventKind::TouchCancel => {
            let touch = event.dyn_ref::<TouchEvent>()?;
            let event_type = match kind {
                EventKind::TouchStart => TouchEventType::Start,
                EventKind::TouchMove => TouchEventType::Move,
                EventKind::TouchCancel => TouchEventType::Cancel,
                _ => TouchEventType::End,
            };
            Some(InputEvent::Touch {
                event_type,
                touches: touch_points(&touch.touches()),
            })
        }
        EventKind::DoubleClick => Some(InputEvent::DoubleClick {
            position: client_position(event.dyn_ref::<MouseEvent>()?),
        }),
        EventKind::Click => Some(InputEvent::Click {
            position: event
                .dyn_ref::<MouseEvent>()
                .map(client_position)
                .unwrap_or(Point::new(0.0, 0.0)),
            action: clicked_action(event),
        }),
    }
}

fn apply_response(event: &Event, response: EventResponse) {
    if response.prevent_default {
        event.prevent_default();
    }
    if response.stop_propagation {
        event.stop_propagation();
    }
}
