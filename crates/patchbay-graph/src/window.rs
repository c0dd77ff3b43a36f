//! Window kinds and their per-node property keys.
//!
//! The graph does not host windows, but the document format records which
//! auxiliary windows were open per node, so the restore path has to be able
//! to enumerate the kinds and find their property keys. The window host in
//! patchbay-windows shares this type.

/// The kind of auxiliary UI surface a node can have open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowKind {
    /// The unit's own editor UI.
    Normal,
    /// Auto-generated parameter list.
    Generic,
    /// Program (preset) list.
    Programs,
    /// Parameter change debug log.
    Debug,
}

impl WindowKind {
    /// Every window kind, in persistence order.
    pub const ALL: [WindowKind; 4] = [
        WindowKind::Normal,
        WindowKind::Generic,
        WindowKind::Programs,
        WindowKind::Debug,
    ];

    /// The suffix used in property keys for this kind.
    pub fn type_name(self) -> &'static str {
        match self {
            WindowKind::Normal => "Normal",
            WindowKind::Generic => "Generic",
            WindowKind::Programs => "Programs",
            WindowKind::Debug => "Debug",
        }
    }

    /// Property key for the window's open/closed flag.
    pub fn open_prop(self) -> String {
        format!("uiopen_{}", self.type_name())
    }

    /// Property key for the window's last horizontal screen position.
    pub fn last_x_prop(self) -> String {
        format!("uiLastX_{}", self.type_name())
    }

    /// Property key for the window's last vertical screen position.
    pub fn last_y_prop(self) -> String {
        format!("uiLastY_{}", self.type_name())
    }
}
