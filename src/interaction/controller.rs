use crate::core::config::InteractionConfig;
use crate::core::geo::Point;
use crate::core::viewport::{SurfaceRect, ViewBox, Viewport, ViewportState};
use crate::input::events::{EventResponse, InputEvent, MapAction, TouchEventType, TouchPoint};
use crate::input::gestures::{touch_center, touch_distance, GestureState};

/// Everything a host needs to present the current view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceView {
    pub view_box: ViewBox,
    /// Scale is noticeably above the fit view
    pub zoomed: bool,
    /// A mouse drag is in progress
    pub grabbing: bool,
}

/// Turns raw input on one rendered map into viewport changes.
///
/// One controller owns one [`Viewport`]; nothing is shared between maps.
#[derive(Debug, Clone)]
pub struct ViewportController {
    viewport: Viewport,
    gesture: GestureState,
    drag_moved: bool,
    touch_moved: bool,
    drag_click_threshold: f64,
    touch_click_threshold: f64,
    zoom_step: f64,
    double_click_factor: f64,
}

impl ViewportController {
    pub fn new(base_size: Point, config: &InteractionConfig) -> Self {
        Self {
            viewport: Viewport::new(base_size, config),
            gesture: GestureState::Idle,
            drag_moved: false,
            touch_moved: false,
            drag_click_threshold: config.drag_click_threshold,
            touch_click_threshold: config.touch_click_threshold,
            zoom_step: config.zoom_step,
            double_click_factor: config.double_click_factor(),
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn state(&self) -> ViewportState {
        self.viewport.state()
    }

    pub fn gesture(&self) -> GestureState {
        self.gesture
    }

    /// A click is pending suppression after a drag or touch pan
    pub fn suppress_pending(&self) -> bool {
        self.drag_moved || self.touch_moved
    }

    pub fn surface_view(&self) -> SurfaceView {
        SurfaceView {
            view_box: self.viewport.view_box(),
            zoomed: self.viewport.is_zoomed(),
            grabbing: matches!(self.gesture, GestureState::Dragging { .. }),
        }
    }

    /// Dispatches one event. Clicks with an action run it; plain clicks go
    /// through marker-click suppression.
    pub fn handle(&mut self, event: &InputEvent, rect: &SurfaceRect) -> EventResponse {
        if rect.is_empty() && Self::needs_rect(event) {
            log::debug!("surface has no size, ignoring {:?}", event.kind());
            return EventResponse::IGNORED;
        }
        match event {
            InputEvent::Wheel { position, delta_y } => self.on_wheel(*position, *delta_y, rect),
            InputEvent::MouseDown { position, button } => {
                if button.is_primary() {
                    self.on_mouse_down(*position)
                } else {
                    EventResponse::IGNORED
                }
            }
            InputEvent::MouseMove { position } => self.on_mouse_move(*position, rect),
            InputEvent::MouseUp { .. } => self.on_mouse_up(),
            InputEvent::Touch {
                event_type,
                touches,
            } => match event_type {
                TouchEventType::Start => self.on_touch_start(touches, rect),
                TouchEventType::Move => self.on_touch_move(touches, rect),
                TouchEventType::End | TouchEventType::Cancel => self.on_touch_end(touches),
            },
            InputEvent::DoubleClick { position } => self.on_double_click(*position, rect),
            InputEvent::Click {
                action: Some(action),
                ..
            } => self.apply_action(*action),
            InputEvent::Click { action: None, .. } => self.suppress_click(),
        }
    }

    fn needs_rect(event: &InputEvent) -> bool {
        matches!(
            event,
            InputEvent::Wheel { .. }
                | InputEvent::MouseMove { .. }
                | InputEvent::Touch { .. }
                | InputEvent::DoubleClick { .. }
        )
    }

    pub fn on_wheel(&mut self, client: Point, delta_y: f64, rect: &SurfaceRect) -> EventResponse {
        let response = EventResponse::IGNORED.prevent_default();
        if delta_y == 0.0 {
            return response;
        }
        let focal = self.viewport.client_to_view(client, rect);
        let factor = if delta_y < 0.0 {
            self.zoom_step
        } else {
            1.0 / self.zoom_step
        };
        EventResponse {
            redraw: self.viewport.zoom_at(factor, focal),
            ..response
        }
    }

    pub fn on_mouse_down(&mut self, client: Point) -> EventResponse {
        if !self.gesture.is_idle() {
            return EventResponse::IGNORED;
        }
        self.gesture = GestureState::Dragging {
            start_client: client,
            start_origin: self.viewport.origin(),
        };
        self.drag_moved = false;
        log::trace!("drag start at ({}, {})", client.x, client.y);
        EventResponse::redraw().prevent_default()
    }

    pub fn on_mouse_move(&mut self, client: Point, rect: &SurfaceRect) -> EventResponse {
        let GestureState::Dragging {
            start_client,
            start_origin,
        } = self.gesture
        else {
            return EventResponse::IGNORED;
        };
        let delta = self
            .viewport
            .screen_delta_to_view(client.subtract(&start_client), rect);
        if delta.x.abs() > self.drag_click_threshold || delta.y.abs() > self.drag_click_threshold {
            self.drag_moved = true;
        }
        self.viewport.pan_from(start_origin, delta);
        EventResponse::redraw()
    }

    pub fn on_mouse_up(&mut self) -> EventResponse {
        if !matches!(self.gesture, GestureState::Dragging { .. }) {
            return EventResponse::IGNORED;
        }
        self.gesture = GestureState::Idle;
        EventResponse::redraw()
    }

    /// `touches` are all touches active after the change
    pub fn on_touch_start(&mut self, touches: &[TouchPoint], rect: &SurfaceRect) -> EventResponse {
        if matches!(self.gesture, GestureState::Dragging { .. }) {
            return EventResponse::IGNORED;
        }
        match touches {
            // a pinch still in progress reports both fingers here, so a lone
            // touch means the previous gesture was lost
            [only] => {
                self.gesture = GestureState::TouchPanning {
                    start_client: only.position,
                    start_origin: self.viewport.origin(),
                };
                self.touch_moved = false;
                EventResponse::IGNORED
            }
            [_, _, ..] => {
                let (Some(distance), Some(center)) = (touch_distance(touches), touch_center(touches))
                else {
                    return EventResponse::IGNORED;
                };
                self.gesture = GestureState::Pinching {
                    start_distance: distance,
                    start: self.viewport.state(),
                    focal: self.viewport.client_to_view(center, rect),
                };
                log::trace!("pinch start, distance {distance}");
                EventResponse::IGNORED.prevent_default()
            }
            [] => EventResponse::IGNORED,
        }
    }

    pub fn on_touch_move(&mut self, touches: &[TouchPoint], rect: &SurfaceRect) -> EventResponse {
        match (self.gesture, touches) {
            (
                GestureState::Pinching {
                    start_distance,
                    start,
                    focal,
                },
                [_, _, ..],
            ) => {
                let response = EventResponse::redraw().prevent_default();
                let Some(distance) = touch_distance(touches) else {
                    return response;
                };
                let factor = if start_distance > 0.0 {
                    distance / start_distance
                } else {
                    1.0
                };
                self.viewport.zoom_from(start, factor, focal);
                response
            }
            (
                GestureState::TouchPanning {
                    start_client,
                    start_origin,
                },
                [only],
            ) => {
                let delta = self
                    .viewport
                    .screen_delta_to_view(only.position.subtract(&start_client), rect);
                if delta.x.abs() > self.touch_click_threshold
                    || delta.y.abs() > self.touch_click_threshold
                {
                    self.touch_moved = true;
                }
                // page scroll is only taken over once the map is zoomed or clearly dragged
                let take_over = self.viewport.is_zoomed() || self.touch_moved;
                self.viewport.pan_from(start_origin, delta);
                EventResponse {
                    prevent_default: take_over,
                    ..EventResponse::redraw()
                }
            }
            _ => EventResponse::IGNORED,
        }
    }

    pub fn on_touch_end(&mut self, remaining: &[TouchPoint]) -> EventResponse {
        match self.gesture {
            GestureState::Pinching { .. } if remaining.len() < 2 => {
                self.gesture = GestureState::Idle;
            }
            GestureState::TouchPanning { .. } if remaining.is_empty() => {
                self.gesture = GestureState::Idle;
            }
            _ => {}
        }
        EventResponse::IGNORED
    }

    pub fn on_double_click(&mut self, client: Point, rect: &SurfaceRect) -> EventResponse {
        let focal = self.viewport.client_to_view(client, rect);
        EventResponse {
            redraw: self.viewport.zoom_at(self.double_click_factor, focal),
            ..EventResponse::IGNORED.prevent_default()
        }
    }

    /// Capture-phase click on the surface: swallows exactly one click after
    /// a drag or touch pan moved the view.
    pub fn suppress_click(&mut self) -> EventResponse {
        if !self.suppress_pending() {
            return EventResponse::IGNORED;
        }
        self.drag_moved = false;
        self.touch_moved = false;
        log::trace!("suppressed click after pan");
        EventResponse::consumed()
    }

    pub fn apply_action(&mut self, action: MapAction) -> EventResponse {
        let changed = match action {
            MapAction::ZoomIn => self.viewport.zoom_in(),
            MapAction::ZoomOut => self.viewport.zoom_out(),
            MapAction::ZoomReset => {
                self.viewport.reset();
                true
            }
        };
        EventResponse {
            redraw: changed,
            ..EventResponse::IGNORED
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::events::MouseButton;

    const EPSILON: f64 = 1e-9;

    fn controller() -> ViewportController {
        ViewportController::new(Point::new(360.0, 280.0), &InteractionConfig::default())
    }

    /// Surface drawn at twice the base size, offset in the page
    fn rect() -> SurfaceRect {
        SurfaceRect::new(100.0, 50.0, 720.0, 560.0)
    }

    fn touch(x: f64, y: f64) -> TouchPoint {
        TouchPoint::new(0, x, y)
    }

    fn touches(points: &[(f64, f64)]) -> Vec<TouchPoint> {
        points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| TouchPoint::new(i as u64, x, y))
            .collect()
    }

    #[test]
    fn test_wheel_zooms_toward_cursor() {
        let mut c = controller();
        let rect = rect();
        let client = Point::new(100.0 + 200.0, 50.0 + 100.0);
        let focal = c.viewport().client_to_view(client, &rect);

        let response = c.on_wheel(client, -120.0, &rect);
        assert!(response.prevent_default && response.redraw);
        assert!((c.state().scale - 1.25).abs() < EPSILON);

        let after = c.viewport().client_to_view(client, &rect);
        assert!((after.x - focal.x).abs() < EPSILON);
        assert!((after.y - focal.y).abs() < EPSILON);

        c.on_wheel(client, 120.0, &rect);
        assert!((c.state().scale - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_wheel_at_limit_is_a_noop() {
        let mut c = controller();
        let rect = rect();
        let client = Point::new(460.0, 330.0);
        for _ in 0..20 {
            c.on_wheel(client, -1.0, &rect);
        }
        assert_eq!(c.state().scale, 6.0);
        let response = c.on_wheel(client, -1.0, &rect);
        assert!(response.prevent_default);
        assert!(!response.redraw);
    }

    #[test]
    fn test_three_wheel_zooms_then_reset() {
        let mut c = controller();
        let rect = rect();
        for _ in 0..3 {
            c.on_wheel(Point::new(700.0, 500.0), -100.0, &rect);
        }
        assert!(c.viewport().is_zoomed());
        c.apply_action(MapAction::ZoomReset);
        assert_eq!(c.state(), ViewportState::default());
    }

    #[test]
    fn test_drag_pans_in_view_units() {
        let mut c = controller();
        let rect = rect();
        c.handle(
            &InputEvent::MouseDown {
                position: Point::new(400.0, 300.0),
                button: MouseButton::Left,
            },
            &rect,
        );
        assert!(c.surface_view().grabbing);

        // 40 screen px on a 2x surface is 20 geometry units
        c.on_mouse_move(Point::new(360.0, 300.0), &rect);
        assert!((c.state().origin.x - 20.0).abs() < EPSILON);
        assert!(c.suppress_pending());

        c.on_mouse_up();
        assert!(!c.surface_view().grabbing);
        assert!(c.gesture().is_idle());
    }

    #[test]
    fn test_secondary_button_does_not_drag() {
        let mut c = controller();
        let response = c.handle(
            &InputEvent::MouseDown {
                position: Point::new(400.0, 300.0),
                button: MouseButton::Right,
            },
            &rect(),
        );
        assert_eq!(response, EventResponse::IGNORED);
        assert!(c.gesture().is_idle());
    }

    #[test]
    fn test_mouse_move_without_drag_is_ignored() {
        let mut c = controller();
        assert_eq!(
            c.on_mouse_move(Point::new(10.0, 10.0), &rect()),
            EventResponse::IGNORED
        );
        assert_eq!(c.state(), ViewportState::default());
    }

    #[test]
    fn test_drag_is_clamped_to_margin() {
        let mut c = controller();
        let rect = rect();
        c.on_mouse_down(Point::new(400.0, 300.0));
        c.on_mouse_move(Point::new(-5000.0, -5000.0), &rect);
        assert!((c.state().origin.x - 360.0 * 0.75).abs() < EPSILON);
        assert!((c.state().origin.y - 280.0 * 0.75).abs() < EPSILON);
    }

    #[test]
    fn test_small_drag_does_not_suppress_click() {
        let mut c = controller();
        let rect = rect();
        c.on_mouse_down(Point::new(400.0, 300.0));
        // one screen pixel is half a geometry unit
        c.on_mouse_move(Point::new(401.0, 300.0), &rect);
        c.on_mouse_up();
        assert_eq!(c.suppress_click(), EventResponse::IGNORED);
    }

    #[test]
    fn test_click_after_drag_is_consumed_once() {
        let mut c = controller();
        let rect = rect();
        c.on_mouse_down(Point::new(400.0, 300.0));
        c.on_mouse_move(Point::new(300.0, 300.0), &rect);
        c.on_mouse_up();

        let first = c.handle(
            &InputEvent::Click {
                position: Point::new(300.0, 300.0),
                action: None,
            },
            &rect,
        );
        assert!(first.stop_propagation && first.prevent_default);

        let second = c.suppress_click();
        assert_eq!(second, EventResponse::IGNORED);
    }

    #[test]
    fn test_touch_pan_prevents_scroll_only_when_moved_or_zoomed() {
        let mut c = controller();
        let rect = rect();
        c.on_touch_start(&[touch(400.0, 300.0)], &rect);
        assert!(matches!(c.gesture(), GestureState::TouchPanning { .. }));

        let tiny = c.on_touch_move(&[touch(402.0, 300.0)], &rect);
        assert!(!tiny.prevent_default);

        let big = c.on_touch_move(&[touch(440.0, 300.0)], &rect);
        assert!(big.prevent_default);
        assert!((c.state().origin.x + 20.0).abs() < EPSILON);

        c.on_touch_end(&[]);
        assert!(c.gesture().is_idle());
        assert!(c.suppress_click().stop_propagation);
    }

    #[test]
    fn test_touch_pan_prevents_scroll_when_zoomed() {
        let mut c = controller();
        let rect = rect();
        c.apply_action(MapAction::ZoomIn);
        c.on_touch_start(&[touch(400.0, 300.0)], &rect);
        let response = c.on_touch_move(&[touch(401.0, 300.0)], &rect);
        assert!(response.prevent_default);
    }

    #[test]
    fn test_pinch_scales_from_gesture_start() {
        let mut c = controller();
        let rect = rect();
        let start = touches(&[(300.0, 300.0), (500.0, 300.0)]);
        let response = c.on_touch_start(&start, &rect);
        assert!(response.prevent_default);
        let focal = match c.gesture() {
            GestureState::Pinching { focal, .. } => focal,
            other => panic!("expected pinch, got {}", other.name()),
        };

        // spread to double distance in several frames
        for spread in [250.0, 300.0, 350.0, 400.0] {
            let frame = touches(&[(400.0 - spread / 2.0, 300.0), (400.0 + spread / 2.0, 300.0)]);
            c.on_touch_move(&frame, &rect);
        }
        let expected_scale = 400.0 / 200.0;
        assert!((c.state().scale - expected_scale).abs() < EPSILON);

        // focal stays under the original midpoint
        let midpoint = Point::new(400.0, 300.0);
        let now = c.viewport().client_to_view(midpoint, &rect);
        assert!((now.x - focal.x).abs() < EPSILON);
        assert!((now.y - focal.y).abs() < EPSILON);
    }

    #[test]
    fn test_pinch_is_clamped() {
        let mut c = controller();
        let rect = rect();
        c.on_touch_start(&touches(&[(390.0, 300.0), (410.0, 300.0)]), &rect);
        c.on_touch_move(&touches(&[(0.0, 300.0), (2000.0, 300.0)]), &rect);
        assert_eq!(c.state().scale, 6.0);
        c.on_touch_move(&touches(&[(399.0, 300.0), (401.0, 300.0)]), &rect);
        assert_eq!(c.state().scale, 0.5);
    }

    #[test]
    fn test_pinch_end_does_not_resume_pan() {
        let mut c = controller();
        let rect = rect();
        c.on_touch_start(&[touch(300.0, 300.0)], &rect);
        c.on_touch_start(&touches(&[(300.0, 300.0), (500.0, 300.0)]), &rect);
        assert!(matches!(c.gesture(), GestureState::Pinching { .. }));

        c.on_touch_end(&[touch(300.0, 300.0)]);
        assert!(c.gesture().is_idle());

        let before = c.state();
        let response = c.on_touch_move(&[touch(100.0, 100.0)], &rect);
        assert_eq!(response, EventResponse::IGNORED);
        assert_eq!(c.state(), before);
    }

    #[test]
    fn test_lone_touch_after_lost_pinch_pans() {
        let mut c = controller();
        let rect = rect();
        c.apply_action(MapAction::ZoomIn);
        c.on_touch_start(&touches(&[(300.0, 300.0), (500.0, 300.0)]), &rect);
        assert!(matches!(c.gesture(), GestureState::Pinching { .. }));

        // no end or cancel ever arrives for the pinch
        c.on_touch_start(&[touch(400.0, 300.0)], &rect);
        assert!(matches!(c.gesture(), GestureState::TouchPanning { .. }));
        let before = c.state().origin;
        let response = c.on_touch_move(&[touch(300.0, 300.0)], &rect);
        assert!(response.redraw);
        assert!(c.state().origin.x > before.x);
    }

    #[test]
    fn test_touch_cancel_ends_pinch() {
        let mut c = controller();
        let rect = rect();
        c.on_touch_start(&touches(&[(300.0, 300.0), (500.0, 300.0)]), &rect);
        let cancel = InputEvent::Touch {
            event_type: TouchEventType::Cancel,
            touches: vec![],
        };
        c.handle(&cancel, &rect);
        assert!(c.gesture().is_idle());
    }

    #[test]
    fn test_double_click_zooms_two_steps() {
        let mut c = controller();
        let response = c.on_double_click(Point::new(460.0, 330.0), &rect());
        assert!(response.prevent_default && response.redraw);
        assert!((c.state().scale - 1.5625).abs() < EPSILON);
        assert!(c.gesture().is_idle());
    }

    #[test]
    fn test_zoom_buttons_keep_view_center() {
        let mut c = controller();
        let center = c.viewport().view_center();
        assert!(c.apply_action(MapAction::ZoomIn).redraw);
        let after = c.viewport().view_center();
        assert!((after.x - center.x).abs() < EPSILON);
        assert!((after.y - center.y).abs() < EPSILON);
        c.apply_action(MapAction::ZoomOut);
        assert!((c.state().scale - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_empty_surface_is_ignored() {
        let mut c = controller();
        let empty = SurfaceRect::new(0.0, 0.0, 0.0, 0.0);
        let response = c.handle(
            &InputEvent::Wheel {
                position: Point::new(1.0, 1.0),
                delta_y: -1.0,
            },
            &empty,
        );
        assert_eq!(response, EventResponse::IGNORED);
        assert_eq!(c.state(), ViewportState::default());
    }

    #[test]
    fn test_wheel_during_drag_keeps_gesture() {
        let mut c = controller();
        let rect = rect();
        c.on_mouse_down(Point::new(400.0, 300.0));
        c.on_wheel(Point::new(400.0, 300.0), -1.0, &rect);
        assert!(matches!(c.gesture(), GestureState::Dragging { .. }));
    }
}
