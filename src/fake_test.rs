//! In-memory host used by the controller tests.
//!
//! `FakeSurface` records every element, style, and listener operation in a
//! shared `SurfaceState`; `FakeView` wraps a `DocStore` plus a
//! position-to-element map and records dispatched transactions.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::doc::{DocStore, Node, SelectedNode, Transaction};
use crate::geom::{Point, Rect, Size};
use crate::host::{EditorView, Layout, Surface};

pub type El = u32;

pub const CONTAINER: El = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    HandlePress,
    Scroll,
    Drag,
}

#[derive(Debug, Default)]
pub struct SurfaceState {
    pub container: Option<El>,
    pub positioned: bool,
    pub handle_fails: bool,
    pub next_id: El,
    pub handles: Vec<El>,
    pub handle_visible: HashMap<El, bool>,
    pub handle_at: HashMap<El, Point>,
    pub boxes: HashMap<El, Rect>,
    pub scroll: Point,
    pub styled: HashMap<El, Size>,
    pub natural: HashMap<El, Size>,
    pub listeners: HashMap<Binding, usize>,
    pub ever_bound: HashMap<Binding, usize>,
}

impl SurfaceState {
    pub fn live(&self, binding: Binding) -> usize {
        self.listeners.get(&binding).copied().unwrap_or(0)
    }

    pub fn total_live(&self) -> usize {
        self.listeners.values().sum()
    }
}

#[derive(Clone)]
pub struct FakeSurface {
    pub state: Rc<RefCell<SurfaceState>>,
}

impl FakeSurface {
    /// A surface with a container at the origin, 800x600, unscrolled.
    pub fn new() -> Self {
        let state = SurfaceState {
            container: Some(CONTAINER),
            next_id: 100,
            boxes: HashMap::from([(CONTAINER, Rect::new(0.0, 0.0, 800.0, 600.0))]),
            ..Default::default()
        };
        Self { state: Rc::new(RefCell::new(state)) }
    }

    pub fn without_container() -> Self {
        let surface = Self::new();
        surface.state.borrow_mut().container = None;
        surface
    }

    /// Register a rendered media element at `rect`.
    pub fn add_element(&self, id: El, rect: Rect, natural: Option<Size>) {
        let mut st = self.state.borrow_mut();
        st.boxes.insert(id, rect);
        if let Some(size) = natural {
            st.natural.insert(id, size);
        }
    }

    pub fn handle(&self) -> El {
        *self.state.borrow().handles.last().unwrap()
    }

    pub fn handle_at(&self) -> Option<Point> {
        let st = self.state.borrow();
        let handle = *st.handles.last()?;
        st.handle_at.get(&handle).copied()
    }

    pub fn styled(&self, id: El) -> Option<Size> {
        self.state.borrow().styled.get(&id).copied()
    }

    pub fn live(&self, binding: Binding) -> usize {
        self.state.borrow().live(binding)
    }

    pub fn total_live(&self) -> usize {
        self.state.borrow().total_live()
    }

    pub fn set_scroll(&self, x: f64, y: f64) {
        self.state.borrow_mut().scroll = Point::new(x, y);
    }

    fn bind(&self, binding: Binding) -> FakeListener {
        let mut st = self.state.borrow_mut();
        *st.listeners.entry(binding).or_default() += 1;
        *st.ever_bound.entry(binding).or_default() += 1;
        FakeListener { binding, state: Rc::clone(&self.state) }
    }
}

pub struct FakeListener {
    binding: Binding,
    state: Rc<RefCell<SurfaceState>>,
}

impl Drop for FakeListener {
    fn drop(&mut self) {
        let mut st = self.state.borrow_mut();
        if let Some(count) = st.listeners.get_mut(&self.binding) {
            *count -= 1;
        }
    }
}

impl Layout for FakeSurface {
    type Element = El;

    fn bounding_box_of(&self, element: &El) -> Rect {
        self.state.borrow().boxes.get(element).copied().unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0))
    }

    fn scroll_offset_of(&self, _container: &El) -> Point {
        self.state.borrow().scroll
    }
}

impl Surface for FakeSurface {
    type Listener = FakeListener;

    fn locate_container(&self) -> Option<El> {
        self.state.borrow().container
    }

    fn ensure_positioned(&self, _container: &El) {
        self.state.borrow_mut().positioned = true;
    }

    fn create_handle(&self, _container: &El, _size: f64) -> Option<El> {
        let mut st = self.state.borrow_mut();
        if st.handle_fails {
            return None;
        }
        let id = st.next_id;
        st.next_id += 1;
        st.handles.push(id);
        st.handle_visible.insert(id, false);
        Some(id)
    }

    fn remove_handle(&self, handle: &El) {
        let mut st = self.state.borrow_mut();
        st.handles.retain(|h| h != handle);
        st.handle_visible.remove(handle);
    }

    fn set_handle_visible(&self, handle: &El, visible: bool) {
        self.state.borrow_mut().handle_visible.insert(*handle, visible);
    }

    fn place_handle(&self, handle: &El, at: Point) {
        self.state.borrow_mut().handle_at.insert(*handle, at);
    }

    fn styled_size_of(&self, element: &El) -> Option<Size> {
        self.state.borrow().styled.get(element).copied()
    }

    fn natural_size_of(&self, element: &El) -> Option<Size> {
        self.state.borrow().natural.get(element).copied()
    }

    fn set_size(&self, element: &El, size: Size) {
        let mut st = self.state.borrow_mut();
        st.styled.insert(*element, size);
        if let Some(rect) = st.boxes.get_mut(element) {
            rect.width = size.width;
            rect.height = size.height;
        }
    }

    fn bind_handle_press(&self, _handle: &El) -> FakeListener {
        self.bind(Binding::HandlePress)
    }

    fn bind_container_scroll(&self, _container: &El) -> FakeListener {
        self.bind(Binding::Scroll)
    }

    fn bind_drag_tracking(&self) -> FakeListener {
        self.bind(Binding::Drag)
    }
}

#[derive(Default)]
pub struct FakeView {
    pub doc: RefCell<DocStore>,
    pub elements: RefCell<HashMap<usize, El>>,
    pub dispatched: RefCell<Vec<Transaction>>,
    pub coords: RefCell<HashMap<(i64, i64), usize>>,
}

impl FakeView {
    pub fn new(doc: DocStore) -> Self {
        Self { doc: RefCell::new(doc), ..Default::default() }
    }

    pub fn render(&self, position: usize, element: El) {
        self.elements.borrow_mut().insert(position, element);
    }

    pub fn unrender(&self, position: usize) {
        self.elements.borrow_mut().remove(&position);
    }

    pub fn select(&self, position: usize) {
        self.doc.borrow_mut().select(position).unwrap();
    }

    pub fn map_coords(&self, x: i64, y: i64, position: usize) {
        self.coords.borrow_mut().insert((x, y), position);
    }

    pub fn dispatched(&self) -> Vec<Transaction> {
        self.dispatched.borrow().clone()
    }
}

impl EditorView for FakeView {
    type Element = El;

    fn resolve_selection(&self) -> Option<SelectedNode> {
        self.doc.borrow().selection()
    }

    fn node_at(&self, position: usize) -> Option<Node> {
        self.doc.borrow().node_at(position).cloned()
    }

    fn element_for_position(&self, position: usize) -> Option<El> {
        self.elements.borrow().get(&position).copied()
    }

    #[allow(clippy::cast_possible_truncation)]
    fn position_at_coords(&self, point: Point) -> Option<usize> {
        self.coords.borrow().get(&(point.x as i64, point.y as i64)).copied()
    }

    fn dispatch(&self, tr: Transaction) {
        let _ = self.doc.borrow_mut().apply(&tr);
        self.dispatched.borrow_mut().push(tr);
    }
}
