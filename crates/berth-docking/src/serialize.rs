//! Binary layout streams.
//!
//! ## Stream format
//!
//! All integers are big-endian `i32`, floats are `f32` and booleans one byte.
//!
//! ```text
//! [version][write_properties][has_window]
//! [window subtree]?              pre-order
//! 4 x [bar subtree]              up, down, left, right
//! [root property blob]?          when write_properties
//! [location table]               count, then one location per node in pre-order
//! [detached views]               count, then [length][payload][location] per view
//! ```
//!
//! A node is `[type tag] fields children [property blob]?`:
//!
//! - view (1): `[length][payload]`, the payload written by the [`ViewSerializer`]
//! - split (2): `[horizontal][divider location]` then left and right
//! - tab (3): `[tab count][selected index]` then the tabs
//! - window bar: `[enabled][content size][tab count][selected index]` then the tabs
//!
//! A location is `[tag]` followed by `0` null, `1` root,
//! `2` split `[ref][direction][divider] parent` or `3` tab `[ref][index] parent`,
//! where `ref` is the pre-order index of the referenced node or `-1` when that
//! node was not written. A property blob is `[mask]` followed by the set values.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use berth_core::alloc::HashMap;
use berth_core::profiling::profile_function;

use crate::config::ConfigOverrides;
use crate::error::{DockError, DockResult};
use crate::location::WindowLocation;
use crate::node::{SplitData, View, WindowKind, WindowType};
use crate::tab_strip::TabStrip;
use crate::tree::DockingTree;
use crate::types::{Direction, KeyCode, WindowFlags, WindowId};

/// Newest stream version this engine reads and the one it writes.
pub const LAYOUT_VERSION: i32 = 1;

/// Deepest window or location nesting a stream may contain.
pub const MAX_NESTING_DEPTH: usize = 256;

const TAG_VIEW: i32 = 1;
const TAG_SPLIT: i32 = 2;
const TAG_TAB: i32 = 3;

const LOCATION_NULL: i32 = 0;
const LOCATION_ROOT: i32 = 1;
const LOCATION_SPLIT: i32 = 2;
const LOCATION_TAB: i32 = 3;

const PROP_EDGE_SPLIT_DISTANCE: i32 = 1 << 0;
const PROP_EDGE_SPLIT_FRACTION: i32 = 1 << 1;
const PROP_ABORT_DRAG_KEY: i32 = 1 << 2;
const PROP_RECURSIVE_TABS: i32 = 1 << 3;
const PROP_DOUBLE_CLICK_RESTORES: i32 = 1 << 4;
const PROP_DIVIDER_SIZE: i32 = 1 << 5;
const PROP_TAB_BAR_HEIGHT: i32 = 1 << 6;
const PROP_TAB_SPACING: i32 = 1 << 7;
const PROP_FLAGS: i32 = 1 << 8;
const PROP_WINDOW_BAR_SIZE: i32 = 1 << 9;
const PROP_DRAG_THRESHOLD: i32 = 1 << 10;

/// A view named by a layout stream.
pub enum ViewSource<C> {
    /// A view that already exists in the tree.
    Existing(WindowId),
    /// A view to create.
    New {
        title: String,
        icon: Option<String>,
        content: C,
    },
}

/// Encodes application views in layout streams.
///
/// The engine stores the payload as an opaque, length-prefixed blob.
pub trait ViewSerializer<C> {
    fn write_view(&self, view: &View<C>, out: &mut BytesMut) -> DockResult<()>;

    /// Decode one payload. `input` holds exactly the bytes `write_view` wrote.
    fn read_view(&mut self, input: &mut Bytes) -> DockResult<ViewSource<C>>;
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

struct LayoutWriter<'a, S> {
    serializer: &'a S,
    out: BytesMut,
    write_properties: bool,
    order: Vec<WindowId>,
}

impl<S> LayoutWriter<'_, S> {
    fn put_bool(&mut self, value: bool) {
        self.out.put_u8(u8::from(value));
    }

    fn put_index(&mut self, index: Option<usize>) {
        self.out.put_i32(index.map_or(-1, |index| index as i32));
    }

    fn put_properties(&mut self, overrides: &ConfigOverrides, flags: WindowFlags) {
        let mut mask = 0;
        let mut values = BytesMut::new();
        if let Some(v) = overrides.edge_split_distance {
            mask |= PROP_EDGE_SPLIT_DISTANCE;
            values.put_f32(v);
        }
        if let Some(v) = overrides.edge_split_fraction {
            mask |= PROP_EDGE_SPLIT_FRACTION;
            values.put_f32(v);
        }
        if let Some(v) = overrides.abort_drag_key {
            mask |= PROP_ABORT_DRAG_KEY;
            values.put_u32(v.0);
        }
        if let Some(v) = overrides.recursive_tabs_enabled {
            mask |= PROP_RECURSIVE_TABS;
            values.put_u8(u8::from(v));
        }
        if let Some(v) = overrides.double_click_restores_window {
            mask |= PROP_DOUBLE_CLICK_RESTORES;
            values.put_u8(u8::from(v));
        }
        if let Some(v) = overrides.divider_size {
            mask |= PROP_DIVIDER_SIZE;
            values.put_f32(v);
        }
        if let Some(v) = overrides.tab_bar_height {
            mask |= PROP_TAB_BAR_HEIGHT;
            values.put_f32(v);
        }
        if let Some(v) = overrides.tab_spacing {
            mask |= PROP_TAB_SPACING;
            values.put_f32(v);
        }
        if flags != WindowFlags::default() {
            mask |= PROP_FLAGS;
            values.put_u8(flags.bits());
        }
        if let Some(v) = overrides.window_bar_size {
            mask |= PROP_WINDOW_BAR_SIZE;
            values.put_f32(v);
        }
        if let Some(v) = overrides.drag_threshold {
            mask |= PROP_DRAG_THRESHOLD;
            values.put_f32(v);
        }
        self.out.put_i32(mask);
        self.out.put_slice(&values);
    }

    fn put_location(&mut self, location: &WindowLocation, index_of: &HashMap<WindowId, usize>) {
        let reference = |window: &WindowId| index_of.get(window).map_or(-1, |&index| index as i32);
        match location {
            WindowLocation::Null => self.out.put_i32(LOCATION_NULL),
            WindowLocation::Root => self.out.put_i32(LOCATION_ROOT),
            WindowLocation::Split {
                sibling,
                direction,
                divider,
                parent,
            } => {
                self.out.put_i32(LOCATION_SPLIT);
                self.out.put_i32(reference(sibling));
                self.out.put_i32(direction.index() as i32);
                self.out.put_f32(*divider);
                self.put_location(parent, index_of);
            }
            WindowLocation::Tab {
                tab_window,
                index,
                parent,
            } => {
                self.out.put_i32(LOCATION_TAB);
                self.out.put_i32(reference(tab_window));
                self.out.put_i32(*index as i32);
                self.put_location(parent, index_of);
            }
        }
    }

    fn put_view<C>(&mut self, view: &View<C>) -> DockResult<()>
    where
        S: ViewSerializer<C>,
    {
        let mut payload = BytesMut::new();
        self.serializer.write_view(view, &mut payload)?;
        self.out.put_i32(payload.len() as i32);
        self.out.put_slice(&payload);
        Ok(())
    }

    fn put_node<C>(&mut self, tree: &DockingTree<C>, window: WindowId) -> DockResult<()>
    where
        S: ViewSerializer<C>,
    {
        let node = tree.node(window)?;
        self.order.push(window);

        match &node.kind {
            WindowKind::View(view) => {
                self.out.put_i32(TAG_VIEW);
                self.put_view(view)?;
            }
            WindowKind::Split(split) => {
                let (Some(left), Some(right)) = (split.left, split.right) else {
                    return Err(DockError::InvalidLayout(format!(
                        "split {} is missing a child",
                        window
                    )));
                };
                self.out.put_i32(TAG_SPLIT);
                self.put_bool(split.horizontal);
                self.out.put_f32(split.divider_location);
                self.put_node(tree, left)?;
                self.put_node(tree, right)?;
            }
            WindowKind::Tab(strip) => {
                self.out.put_i32(TAG_TAB);
                self.out.put_i32(strip.len() as i32);
                self.put_index(strip.selected());
                for &child in strip.tabs() {
                    self.put_node(tree, child)?;
                }
            }
            WindowKind::Bar(_) | WindowKind::Root(_) => {
                return Err(DockError::InvalidWindowType(window));
            }
        }

        if self.write_properties {
            self.put_properties(&node.overrides, node.flags);
        }
        Ok(())
    }

    fn put_bar<C>(&mut self, tree: &DockingTree<C>, bar: WindowId) -> DockResult<()>
    where
        S: ViewSerializer<C>,
    {
        let node = tree.node(bar)?;
        let data = node.as_bar().ok_or(DockError::InvalidWindowType(bar))?;
        self.order.push(bar);

        self.put_bool(data.enabled);
        self.out.put_f32(data.content_size);
        self.out.put_i32(data.strip.len() as i32);
        self.put_index(data.strip.selected());
        for &child in data.strip.tabs() {
            self.put_node(tree, child)?;
        }
        if self.write_properties {
            self.put_properties(&node.overrides, node.flags);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
struct Properties {
    overrides: ConfigOverrides,
    flags: Option<WindowFlags>,
}

enum NodeRecord<C> {
    View {
        source: ViewSource<C>,
        properties: Option<Properties>,
    },
    Split {
        horizontal: bool,
        divider_location: f32,
        left: Box<NodeRecord<C>>,
        right: Box<NodeRecord<C>>,
        properties: Option<Properties>,
    },
    Tab {
        selected: Option<usize>,
        children: Vec<NodeRecord<C>>,
        properties: Option<Properties>,
    },
}

struct BarRecord<C> {
    enabled: bool,
    content_size: f32,
    selected: Option<usize>,
    children: Vec<NodeRecord<C>>,
    properties: Option<Properties>,
}

/// A location whose references are pre-order indices.
#[derive(Debug, Clone)]
enum LocationRecord {
    Null,
    Root,
    Split {
        reference: Option<usize>,
        direction: Direction,
        divider: f32,
        parent: Box<LocationRecord>,
    },
    Tab {
        reference: Option<usize>,
        index: usize,
        parent: Box<LocationRecord>,
    },
}

impl LocationRecord {
    /// Resolve against the windows built for the stream. Levels whose reference
    /// was not written collapse into their parent level.
    fn resolve(&self, order: &[WindowId]) -> WindowLocation {
        match self {
            LocationRecord::Null => WindowLocation::Null,
            LocationRecord::Root => WindowLocation::Root,
            LocationRecord::Split {
                reference,
                direction,
                divider,
                parent,
            } => match reference.and_then(|index| order.get(index)) {
                Some(&sibling) => WindowLocation::Split {
                    sibling,
                    direction: *direction,
                    divider: *divider,
                    parent: Box::new(parent.resolve(order)),
                },
                None => parent.resolve(order),
            },
            LocationRecord::Tab {
                reference,
                index,
                parent,
            } => match reference.and_then(|i| order.get(i)) {
                Some(&tab_window) => WindowLocation::Tab {
                    tab_window,
                    index: *index,
                    parent: Box::new(parent.resolve(order)),
                },
                None => parent.resolve(order),
            },
        }
    }
}

struct Layout<C> {
    window: Option<NodeRecord<C>>,
    bars: Vec<BarRecord<C>>,
    root_properties: Option<Properties>,
    locations: Vec<LocationRecord>,
    detached: Vec<(ViewSource<C>, LocationRecord)>,
}

struct LayoutReader<'a, C, S> {
    input: Bytes,
    serializer: &'a mut S,
    has_properties: bool,
    node_count: usize,
    depth: usize,
    existing: Vec<WindowId>,
    tree: &'a DockingTree<C>,
}

impl<C, S: ViewSerializer<C>> LayoutReader<'_, C, S> {
    fn need(&self, len: usize) -> DockResult<()> {
        if self.input.remaining() < len {
            return Err(DockError::UnexpectedEndOfStream);
        }
        Ok(())
    }

    fn get_i32(&mut self) -> DockResult<i32> {
        self.need(4)?;
        Ok(self.input.get_i32())
    }

    fn get_u32(&mut self) -> DockResult<u32> {
        self.need(4)?;
        Ok(self.input.get_u32())
    }

    fn get_f32(&mut self) -> DockResult<f32> {
        self.need(4)?;
        Ok(self.input.get_f32())
    }

    fn get_u8(&mut self) -> DockResult<u8> {
        self.need(1)?;
        Ok(self.input.get_u8())
    }

    fn get_bool(&mut self) -> DockResult<bool> {
        Ok(self.get_u8()? != 0)
    }

    fn get_count(&mut self) -> DockResult<usize> {
        let count = self.get_i32()?;
        usize::try_from(count)
            .map_err(|_| DockError::InvalidLayout(format!("negative count {}", count)))
    }

    fn get_selected(&mut self, count: usize) -> DockResult<Option<usize>> {
        match self.get_i32()? {
            -1 => Ok(None),
            index if index >= 0 && (index as usize) < count => Ok(Some(index as usize)),
            index => Err(DockError::InvalidLayout(format!(
                "selected index {} out of range for {} tabs",
                index, count
            ))),
        }
    }

    fn get_properties(&mut self) -> DockResult<Option<Properties>> {
        if !self.has_properties {
            return Ok(None);
        }
        let mask = self.get_i32()?;
        let mut properties = Properties::default();
        let overrides = &mut properties.overrides;
        if mask & PROP_EDGE_SPLIT_DISTANCE != 0 {
            overrides.edge_split_distance = Some(self.get_f32()?);
        }
        if mask & PROP_EDGE_SPLIT_FRACTION != 0 {
            overrides.edge_split_fraction = Some(self.get_f32()?);
        }
        if mask & PROP_ABORT_DRAG_KEY != 0 {
            overrides.abort_drag_key = Some(KeyCode(self.get_u32()?));
        }
        if mask & PROP_RECURSIVE_TABS != 0 {
            overrides.recursive_tabs_enabled = Some(self.get_bool()?);
        }
        if mask & PROP_DOUBLE_CLICK_RESTORES != 0 {
            overrides.double_click_restores_window = Some(self.get_bool()?);
        }
        if mask & PROP_DIVIDER_SIZE != 0 {
            overrides.divider_size = Some(self.get_f32()?);
        }
        if mask & PROP_TAB_BAR_HEIGHT != 0 {
            overrides.tab_bar_height = Some(self.get_f32()?);
        }
        if mask & PROP_TAB_SPACING != 0 {
            overrides.tab_spacing = Some(self.get_f32()?);
        }
        if mask & PROP_FLAGS != 0 {
            properties.flags = Some(WindowFlags::from_bits_truncate(self.get_u8()?));
        }
        if mask & PROP_WINDOW_BAR_SIZE != 0 {
            overrides.window_bar_size = Some(self.get_f32()?);
        }
        if mask & PROP_DRAG_THRESHOLD != 0 {
            overrides.drag_threshold = Some(self.get_f32()?);
        }
        Ok(Some(properties))
    }

    fn get_view(&mut self) -> DockResult<ViewSource<C>> {
        let len = self.get_count()?;
        self.need(len)?;
        let mut payload = self.input.split_to(len);
        let source = self.serializer.read_view(&mut payload)?;

        if let ViewSource::Existing(id) = &source {
            let id = *id;
            if self.tree.window_type(id) != Some(WindowType::View) {
                return Err(DockError::InvalidLayout(format!(
                    "{} does not name an existing view",
                    id
                )));
            }
            if self.existing.contains(&id) {
                return Err(DockError::InvalidLayout(format!("view {} appears twice", id)));
            }
            self.existing.push(id);
        }
        Ok(source)
    }

    fn enter(&mut self) -> DockResult<()> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(DockError::InvalidLayout(format!(
                "nesting deeper than {} levels",
                MAX_NESTING_DEPTH
            )));
        }
        self.depth += 1;
        Ok(())
    }

    fn get_node(&mut self) -> DockResult<NodeRecord<C>> {
        self.enter()?;
        let record = self.get_node_fields();
        self.depth -= 1;
        record
    }

    fn get_node_fields(&mut self) -> DockResult<NodeRecord<C>> {
        self.node_count += 1;
        let record = match self.get_i32()? {
            TAG_VIEW => {
                let source = self.get_view()?;
                NodeRecord::View {
                    source,
                    properties: self.get_properties()?,
                }
            }
            TAG_SPLIT => {
                let horizontal = self.get_bool()?;
                let divider_location = self.get_f32()?;
                let left = Box::new(self.get_node()?);
                let right = Box::new(self.get_node()?);
                NodeRecord::Split {
                    horizontal,
                    divider_location,
                    left,
                    right,
                    properties: self.get_properties()?,
                }
            }
            TAG_TAB => {
                let count = self.get_count()?;
                let selected = self.get_selected(count)?;
                let children = (0..count)
                    .map(|_| self.get_node())
                    .collect::<DockResult<Vec<_>>>()?;
                NodeRecord::Tab {
                    selected,
                    children,
                    properties: self.get_properties()?,
                }
            }
            tag => return Err(DockError::InvalidTypeTag(tag)),
        };
        Ok(record)
    }

    fn get_bar(&mut self) -> DockResult<BarRecord<C>> {
        self.node_count += 1;
        let enabled = self.get_bool()?;
        let content_size = self.get_f32()?;
        let count = self.get_count()?;
        let selected = self.get_selected(count)?;
        let children = (0..count)
            .map(|_| self.get_node())
            .collect::<DockResult<Vec<_>>>()?;
        Ok(BarRecord {
            enabled,
            content_size,
            selected,
            children,
            properties: self.get_properties()?,
        })
    }

    fn get_reference(&mut self) -> DockResult<Option<usize>> {
        match self.get_i32()? {
            -1 => Ok(None),
            index if index >= 0 && (index as usize) < self.node_count => Ok(Some(index as usize)),
            index => Err(DockError::InvalidLayout(format!(
                "location reference {} out of range",
                index
            ))),
        }
    }

    fn get_location(&mut self) -> DockResult<LocationRecord> {
        self.enter()?;
        let location = self.get_location_fields();
        self.depth -= 1;
        location
    }

    fn get_location_fields(&mut self) -> DockResult<LocationRecord> {
        let location = match self.get_i32()? {
            LOCATION_NULL => LocationRecord::Null,
            LOCATION_ROOT => LocationRecord::Root,
            LOCATION_SPLIT => {
                let reference = self.get_reference()?;
                let direction = self.get_i32()?;
                let direction = usize::try_from(direction)
                    .ok()
                    .and_then(Direction::from_index)
                    .ok_or_else(|| {
                        DockError::InvalidLayout(format!("invalid direction {}", direction))
                    })?;
                let divider = self.get_f32()?;
                LocationRecord::Split {
                    reference,
                    direction,
                    divider,
                    parent: Box::new(self.get_location()?),
                }
            }
            LOCATION_TAB => {
                let reference = self.get_reference()?;
                let index = self.get_count()?;
                LocationRecord::Tab {
                    reference,
                    index,
                    parent: Box::new(self.get_location()?),
                }
            }
            tag => return Err(DockError::InvalidLocationTag(tag)),
        };
        Ok(location)
    }

    fn get_layout(&mut self) -> DockResult<Layout<C>> {
        let version = self.get_i32()?;
        if version > LAYOUT_VERSION {
            return Err(DockError::UnsupportedVersion {
                found: version,
                supported: LAYOUT_VERSION,
            });
        }
        self.has_properties = self.get_bool()?;

        let window = if self.get_bool()? {
            Some(self.get_node()?)
        } else {
            None
        };
        let bars = (0..Direction::ALL.len())
            .map(|_| self.get_bar())
            .collect::<DockResult<Vec<_>>>()?;
        let root_properties = self.get_properties()?;

        let location_count = self.get_count()?;
        if location_count != self.node_count {
            return Err(DockError::InvalidLayout(format!(
                "{} locations for {} windows",
                location_count, self.node_count
            )));
        }
        let locations = (0..location_count)
            .map(|_| self.get_location())
            .collect::<DockResult<Vec<_>>>()?;

        let detached_count = self.get_count()?;
        let mut detached = Vec::new();
        for _ in 0..detached_count {
            let source = self.get_view()?;
            let location = self.get_location()?;
            detached.push((source, location));
        }

        Ok(Layout {
            window,
            bars,
            root_properties,
            locations,
            detached,
        })
    }
}

// ---------------------------------------------------------------------------
// Tree entry points
// ---------------------------------------------------------------------------

impl<C> DockingTree<C> {
    /// Encode the tree as a layout stream.
    ///
    /// `write_properties` adds each window's configuration overrides and flags.
    pub fn write<S: ViewSerializer<C>>(&self, serializer: &S, write_properties: bool) -> DockResult<Bytes> {
        profile_function!();

        let mut writer = LayoutWriter {
            serializer,
            out: BytesMut::new(),
            write_properties,
            order: Vec::new(),
        };
        writer.out.put_i32(LAYOUT_VERSION);
        writer.put_bool(write_properties);

        let root_window = self.root_window();
        writer.put_bool(root_window.is_some());
        if let Some(window) = root_window {
            writer.put_node(self, window)?;
        }
        for direction in Direction::ALL {
            writer.put_bar(self, self.window_bar(direction))?;
        }
        if write_properties {
            let root = self.node(self.root())?;
            writer.put_properties(&root.overrides, root.flags);
        }

        let index_of: HashMap<WindowId, usize> = writer
            .order
            .iter()
            .enumerate()
            .map(|(index, &window)| (window, index))
            .collect();
        let order = std::mem::take(&mut writer.order);
        writer.out.put_i32(order.len() as i32);
        for &window in &order {
            writer.put_location(self.node(window)?.last_location(), &index_of);
        }

        let detached: Vec<WindowId> = self
            .windows()
            .filter(|(_, node)| {
                node.window_type() == WindowType::View
                    && node.parent().is_none()
                    && !node.last_location().is_null()
            })
            .map(|(id, _)| id)
            .collect();
        writer.out.put_i32(detached.len() as i32);
        for id in detached {
            let node = self.node(id)?;
            if let Some(view) = node.as_view() {
                writer.put_view(view)?;
            }
            writer.put_location(node.last_location(), &index_of);
        }

        tracing::debug!(
            "Wrote layout: {} windows, {} bytes",
            order.len(),
            writer.out.len()
        );
        Ok(writer.out.freeze())
    }

    /// Replace the layout with one read from `input`.
    ///
    /// The whole stream is decoded before the tree is touched, so a malformed
    /// stream leaves the tree unchanged. Views the stream does not reuse stay
    /// alive but detached. Property blobs are applied only when
    /// `read_properties` is set.
    pub fn read<S: ViewSerializer<C>>(
        &mut self,
        input: Bytes,
        serializer: &mut S,
        read_properties: bool,
    ) -> DockResult<()> {
        profile_function!();

        let layout = LayoutReader {
            input,
            serializer,
            has_properties: false,
            node_count: 0,
            depth: 0,
            existing: Vec::new(),
            tree: self,
        }
        .get_layout()?;

        let root = self.root();
        let mut tx = self.begin_optimize(root);
        tx.clear_layout()?;

        let mut order = Vec::new();
        if let Some(record) = layout.window {
            let window = tx.build_node(record, &mut order, read_properties)?;
            if let Some(data) = tx.root_data_mut() {
                data.window = Some(window);
            }
            tx.node_mut(window)?.parent = Some(root);
        }
        for (direction, record) in Direction::ALL.into_iter().zip(layout.bars) {
            tx.build_bar(direction, record, &mut order, read_properties)?;
        }
        if read_properties
            && let Some(properties) = layout.root_properties
        {
            tx.apply_properties(root, properties)?;
        }

        for (&window, location) in order.iter().zip(&layout.locations) {
            tx.node_mut(window)?.last_location = location.resolve(&order);
        }
        for (source, location) in layout.detached {
            let view = match source {
                ViewSource::Existing(id) => {
                    tx.detach_for_move(id)?;
                    id
                }
                ViewSource::New {
                    title,
                    icon,
                    content,
                } => tx.create_view_with_icon(title, icon, content),
            };
            tx.node_mut(view)?.last_location = location.resolve(&order);
        }

        tx.fire_title_changed(root);
        tracing::debug!("Read layout: {} windows", order.len());
        Ok(())
    }

    /// Take every window out of the root and the bars. Containers are disposed
    /// and views are left detached.
    fn clear_layout(&mut self) -> DockResult<()> {
        let root = self.root();
        let mut tops: Vec<WindowId> = self.root_window().into_iter().collect();
        for direction in Direction::ALL {
            tops.extend(self.child_windows(self.window_bar(direction)));
        }

        for top in tops {
            let subtree = self.subtree(top);
            if let Some(parent) = self.parent(top) {
                self.raw_remove(parent, top)?;
            }
            for id in subtree {
                match self.window_type(id) {
                    Some(WindowType::View) => {
                        if let Some(node) = self.get_mut(id) {
                            node.parent = None;
                        }
                    }
                    Some(_) => self.dispose(id),
                    None => {}
                }
            }
        }
        if let Some(node) = self.get_mut(root) {
            node.last_focused_child = None;
        }
        Ok(())
    }

    fn build_node(
        &mut self,
        record: NodeRecord<C>,
        order: &mut Vec<WindowId>,
        read_properties: bool,
    ) -> DockResult<WindowId> {
        let (window, properties) = match record {
            NodeRecord::View { source, properties } => {
                let view = match source {
                    ViewSource::Existing(id) => {
                        self.detach_for_move(id)?;
                        id
                    }
                    ViewSource::New {
                        title,
                        icon,
                        content,
                    } => self.create_view_with_icon(title, icon, content),
                };
                order.push(view);
                (view, properties)
            }
            NodeRecord::Split {
                horizontal,
                divider_location,
                left,
                right,
                properties,
            } => {
                let split = self.alloc(WindowKind::Split(SplitData::new(horizontal, divider_location)));
                order.push(split);
                let left = self.build_node(*left, order, read_properties)?;
                let right = self.build_node(*right, order, read_properties)?;
                self.set_split_children(split, Some(left), Some(right))?;
                self.fire_title_changed(split);
                (split, properties)
            }
            NodeRecord::Tab {
                selected,
                children,
                properties,
            } => {
                let tab = self.alloc(WindowKind::Tab(TabStrip::new()));
                order.push(tab);
                for (index, child) in children.into_iter().enumerate() {
                    let child = self.build_node(child, order, read_properties)?;
                    self.raw_insert_tab(tab, child, index)?;
                }
                if let Some(strip) = self.node_mut(tab)?.kind.strip_mut() {
                    let selected = selected.or((!strip.is_empty()).then_some(0));
                    strip.select(selected);
                }
                self.fire_title_changed(tab);
                (tab, properties)
            }
        };

        if read_properties && let Some(properties) = properties {
            self.apply_properties(window, properties)?;
        }
        Ok(window)
    }

    fn build_bar(
        &mut self,
        direction: Direction,
        record: BarRecord<C>,
        order: &mut Vec<WindowId>,
        read_properties: bool,
    ) -> DockResult<()> {
        let bar = self.window_bar(direction);
        order.push(bar);
        for (index, child) in record.children.into_iter().enumerate() {
            let child = self.build_node(child, order, read_properties)?;
            self.raw_insert_tab(bar, child, index)?;
            self.node_mut(child)?.last_minimized_direction = Some(direction);
        }
        if let WindowKind::Bar(data) = &mut self.node_mut(bar)?.kind {
            data.enabled = record.enabled;
            data.content_size = record.content_size.max(0.0);
            data.strip.select(record.selected);
        }
        if read_properties && let Some(properties) = record.properties {
            self.apply_properties(bar, properties)?;
        }
        self.fire_title_changed(bar);
        Ok(())
    }

    fn apply_properties(&mut self, window: WindowId, properties: Properties) -> DockResult<()> {
        let node = self.node_mut(window)?;
        node.overrides = properties.overrides;
        node.flags = properties.flags.unwrap_or_default();
        Ok(())
    }
}
