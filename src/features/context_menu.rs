use serde::Serialize;

use crate::config::UiNames;
use crate::features::text::longest_text_in_subtree;
use crate::ui_tree::RegionNode;

#[derive(Debug, Clone, Serialize)]
pub struct ContextMenu {
    pub element: RegionNode,
    /// Top to bottom on screen.
    pub entries: Vec<ContextMenuEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContextMenuEntry {
    pub element: RegionNode,
    pub label: String,
}

impl ContextMenu {
    /// First entry whose label matches `text`, ignoring case.
    pub fn entry_with_label(&self, text: &str) -> Option<&ContextMenuEntry> {
        let wanted = text.to_lowercase();
        self.entries
            .iter()
            .find(|entry| entry.label.to_lowercase() == wanted)
    }
}

/// Open context menus, read from the menu layer directly below the root.
pub fn parse_context_menus(root: &RegionNode, names: &UiNames) -> Vec<ContextMenu> {
    let Some(layer) = root
        .children_with_region()
        .find(|node| node.type_name().to_lowercase() == names.menu_layer)
    else {
        return Vec::new();
    };

    layer
        .children_with_region()
        .filter(|node| node.type_name().to_lowercase().contains(&names.menu))
        .map(|menu| parse_context_menu(menu, names))
        .collect()
}

fn parse_context_menu(menu: &RegionNode, names: &UiNames) -> ContextMenu {
    let mut entries: Vec<ContextMenuEntry> = menu
        .descendants_with_region()
        .filter(|node| node.type_name().to_lowercase().contains(&names.menu_entry))
        .map(|entry| ContextMenuEntry {
            element: entry.clone(),
            label: longest_text_in_subtree(&entry.raw)
                .unwrap_or_default()
                .to_string(),
        })
        .collect();
    entries.sort_by_key(|entry| entry.element.region.y);

    ContextMenu {
        element: menu.clone(),
        entries,
    }
}
