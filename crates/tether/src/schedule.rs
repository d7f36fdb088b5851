//! # Before-Render Schedule
//!
//! Components that must see the frame's final poses run here, after all
//! simulation and input logic and right before rendering. The owning frame
//! loop calls [`BeforeRender::run`] once per frame; there is no global
//! callback list.
//!
//! ## Ordering
//!
//! Each component declares an integer priority. Lower priorities run first and
//! ties run in registration order. [`AXIS_CONSTRAINT_PRIORITY`] is one below
//! [`PARENT_FOLLOWER_PRIORITY`], so a follower always sees the constrained
//! pose of its node.
//!
//! ## Lifecycle
//!
//! ```text
//! add ──► active ──run──► initialize (once) ──► update every run
//!           ▲   │
//!  activate │   │ deactivate
//!           │   ▼
//!          inactive  (skipped by run, state kept)
//! ```
//!
//! Activation and deactivation are idempotent. Components are initialized
//! lazily, on the first run in which they are active, and all pending
//! initializations happen before any update of that run.

use std::any::Any;

use crate::scene::SceneGraph;

/// The interaction toolkit's before-render order.
pub const BEFORE_RENDER_ORDER: i32 = 100;

pub const AXIS_CONSTRAINT_PRIORITY: i32 = BEFORE_RENDER_ORDER + 1;

pub const PARENT_FOLLOWER_PRIORITY: i32 = AXIS_CONSTRAINT_PRIORITY + 1;

/// A component driven by the [`BeforeRender`] schedule.
pub trait FrameComponent<G: SceneGraph>: 'static {
    fn priority(&self) -> i32;

    /// Capture initial state. Called once, before the first update.
    fn initialize(&mut self, graph: &G);

    /// Discard and re-capture initial state.
    fn reinitialize(&mut self, graph: &G);

    fn update(&mut self, graph: &mut G);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Identifies a registered component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentHandle(u32);

struct Registered<G: SceneGraph> {
    handle: ComponentHandle,
    priority: i32,
    #[cfg(any(feature = "diagnostics", test))]
    name: String,
    active: bool,
    initialized: bool,
    component: Box<dyn FrameComponent<G>>,
}

/// Time spent in one component during the most recent run.
#[cfg(feature = "diagnostics")]
#[derive(Debug, Clone)]
pub struct ComponentTiming {
    pub name: String,
    pub duration_us: f64,
}

/// Priority-ordered list of before-render components.
pub struct BeforeRender<G: SceneGraph> {
    entries: Vec<Registered<G>>,
    next_handle: u32,
    #[cfg(feature = "diagnostics")]
    timings: Vec<ComponentTiming>,
}

impl<G: SceneGraph> BeforeRender<G> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_handle: 0,
            #[cfg(feature = "diagnostics")]
            timings: Vec::new(),
        }
    }

    /// Register an active component.
    pub fn add<C: FrameComponent<G>>(&mut self, component: C) -> ComponentHandle {
        self.insert(component, true)
    }

    /// Register a component that stays dormant until [`activate`](Self::activate)d.
    pub fn add_inactive<C: FrameComponent<G>>(&mut self, component: C) -> ComponentHandle {
        self.insert(component, false)
    }

    fn insert<C: FrameComponent<G>>(&mut self, component: C, active: bool) -> ComponentHandle {
        let handle = ComponentHandle(self.next_handle);
        self.next_handle += 1;
        let priority = component.priority();
        // After every entry of equal priority, keeping registration order.
        let at = self.entries.partition_point(|e| e.priority <= priority);
        self.entries.insert(
            at,
            Registered {
                handle,
                priority,
                #[cfg(any(feature = "diagnostics", test))]
                name: short_component_name(std::any::type_name::<C>()),
                active,
                initialized: false,
                component: Box::new(component),
            },
        );
        handle
    }

    /// Returns `true` if the component was inactive.
    pub fn activate(&mut self, handle: ComponentHandle) -> bool {
        self.set_active(handle, true)
    }

    /// Returns `true` if the component was active.
    pub fn deactivate(&mut self, handle: ComponentHandle) -> bool {
        self.set_active(handle, false)
    }

    fn set_active(&mut self, handle: ComponentHandle, active: bool) -> bool {
        match self.entry_mut(handle) {
            Some(entry) if entry.active != active => {
                entry.active = active;
                true
            }
            _ => false,
        }
    }

    pub fn is_active(&self, handle: ComponentHandle) -> bool {
        self.entry(handle).is_some_and(|e| e.active)
    }

    /// Unregister a component. Returns `false` for an unknown handle.
    pub fn remove(&mut self, handle: ComponentHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        self.entries.len() != before
    }

    /// Re-capture a component's initial state from the graph right away.
    pub fn reinitialize(&mut self, handle: ComponentHandle, graph: &G) -> bool {
        let Some(entry) = self.entry_mut(handle) else {
            return false;
        };
        entry.component.reinitialize(graph);
        entry.initialized = true;
        true
    }

    pub fn get<C: FrameComponent<G>>(&self, handle: ComponentHandle) -> Option<&C> {
        self.entry(handle)?.component.as_any().downcast_ref::<C>()
    }

    pub fn get_mut<C: FrameComponent<G>>(&mut self, handle: ComponentHandle) -> Option<&mut C> {
        self.entry_mut(handle)?.component.as_any_mut().downcast_mut::<C>()
    }

    /// Run one frame: initialize newly active components, then update every
    /// active component in priority order.
    pub fn run(&mut self, graph: &mut G) {
        for entry in self.entries.iter_mut().filter(|e| e.active && !e.initialized) {
            entry.component.initialize(graph);
            entry.initialized = true;
        }

        #[cfg(feature = "diagnostics")]
        {
            self.timings.clear();
            for entry in self.entries.iter_mut().filter(|e| e.active) {
                let start = std::time::Instant::now();
                entry.component.update(graph);
                self.timings.push(ComponentTiming {
                    name: entry.name.clone(),
                    duration_us: start.elapsed().as_secs_f64() * 1_000_000.0,
                });
            }
        }
        #[cfg(not(feature = "diagnostics"))]
        {
            for entry in self.entries.iter_mut().filter(|e| e.active) {
                entry.component.update(graph);
            }
        }
    }

    /// Per-component timings from the most recent [`run`](Self::run).
    #[cfg(feature = "diagnostics")]
    pub fn timings(&self) -> &[ComponentTiming] {
        &self.timings
    }

    /// Returns the number of registered components.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, handle: ComponentHandle) -> Option<&Registered<G>> {
        self.entries.iter().find(|e| e.handle == handle)
    }

    fn entry_mut(&mut self, handle: ComponentHandle) -> Option<&mut Registered<G>> {
        self.entries.iter_mut().find(|e| e.handle == handle)
    }
}

impl<G: SceneGraph> Default for BeforeRender<G> {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip module paths from a type name, generics included
/// (`tether::constraint::axis::AxisConstraint<tether::scene::NodeId>` →
/// `AxisConstraint<NodeId>`).
#[cfg(any(feature = "diagnostics", test))]
fn short_component_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();
    for ch in full.chars() {
        if ch.is_alphanumeric() || ch == '_' || ch == ':' {
            segment.push(ch);
        } else {
            out.push_str(segment.rsplit("::").next().unwrap_or(&segment));
            segment.clear();
            out.push(ch);
        }
    }
    out.push_str(segment.rsplit("::").next().unwrap_or(&segment));
    out
}
