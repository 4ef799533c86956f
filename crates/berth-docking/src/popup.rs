//! Context menus for windows.
//!
//! The engine does not draw menus. A [`PopupMenuFactory`] installed on the tree
//! decides which items a window's menu holds; the host shows them and hands the
//! chosen item back to [`DockingTree::activate_menu_item`].

use crate::error::DockResult;
use crate::tree::DockingTree;
use crate::types::{WindowFlags, WindowId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupMenuItem {
    Close,
    Minimize,
    Restore,
    /// Application-defined item, handled by the host.
    Custom(String),
}

/// Ordered menu items.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PopupMenu {
    pub items: Vec<PopupMenuItem>,
}

impl PopupMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item(mut self, item: PopupMenuItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Builds the context menu of a window.
pub trait PopupMenuFactory<C> {
    fn popup_menu(&self, tree: &DockingTree<C>, window: WindowId) -> Option<PopupMenu>;
}

/// Offers close, minimize and restore according to the window's flags and state.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardPopupMenuFactory;

impl<C> PopupMenuFactory<C> for StandardPopupMenuFactory {
    fn popup_menu(&self, tree: &DockingTree<C>, window: WindowId) -> Option<PopupMenu> {
        let flags = tree.flags(window);
        let mut menu = PopupMenu::new();
        if flags.contains(WindowFlags::CLOSABLE) && tree.is_attached(window) {
            menu = menu.item(PopupMenuItem::Close);
        }
        if tree.is_minimized(window) {
            if flags.contains(WindowFlags::RESTORABLE) {
                menu = menu.item(PopupMenuItem::Restore);
            }
        } else if flags.contains(WindowFlags::MINIMIZABLE) && tree.is_attached(window) {
            menu = menu.item(PopupMenuItem::Minimize);
        }
        (!menu.is_empty()).then_some(menu)
    }
}

impl<C> DockingTree<C> {
    /// Run a menu item chosen for `window`.
    ///
    /// Returns false for custom items, which the host handles itself.
    pub fn activate_menu_item(&mut self, window: WindowId, item: &PopupMenuItem) -> DockResult<bool> {
        match item {
            PopupMenuItem::Close => self.close(window)?,
            PopupMenuItem::Minimize => self.minimize(window, None)?,
            PopupMenuItem::Restore => self.restore(window)?,
            PopupMenuItem::Custom(_) => return Ok(false),
        }
        Ok(true)
    }
}
